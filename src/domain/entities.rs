//! Domain entities: core data structures

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// A WO facility location whose surrounding trees are monitored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    /// Unique site name
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Linear growth parameters for one species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesGrowth {
    /// Unique species name
    pub species: String,
    /// Height in metres at planting (age 0)
    pub initial_height: f64,
    /// Height gained per year in metres
    pub growth_per_year: f64,
}

/// One physical tree near a site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeRecord {
    /// Identifier, unique within its site
    pub id: String,
    pub species: String,
    /// Foreign key to `Site::name`
    #[serde(rename = "wo_name", alias = "site_name")]
    pub site_name: String,
    pub planted_year: i32,
    pub latitude: f64,
    pub longitude: f64,
}

/// A tree annotated with its derived height and risk flags.
///
/// Recomputed on every evaluation, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluatedTree {
    pub id: String,
    pub species: String,
    pub age: i32,
    /// Estimated height in metres
    pub current_height: f64,
    pub prune_recommended: bool,
    pub over_max: bool,
    pub near_limit: bool,
    pub latitude: f64,
    pub longitude: f64,
}

/// Wind measurement for a coordinate, in km/h.
///
/// `speed_kmh` is `None` when the provider answered but carried no usable value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WindReading {
    pub speed_kmh: Option<f64>,
}

impl WindReading {
    pub fn kmh(speed: f64) -> Self {
        Self {
            speed_kmh: Some(speed),
        }
    }

    /// The wind speed if it is a genuine measurement: finite and not negative.
    pub fn usable_speed(&self) -> Option<f64> {
        self.speed_kmh.filter(|s| s.is_finite() && *s >= 0.0)
    }
}

/// A tree that could not be evaluated, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnevaluableTree {
    pub id: String,
    pub species: String,
    pub reason: String,
}

impl UnevaluableTree {
    pub fn new(tree: &TreeRecord, error: &DomainError) -> Self {
        Self {
            id: tree.id.clone(),
            species: tree.species.clone(),
            reason: error.to_string(),
        }
    }
}
