//! Species growth lookup and current-height estimation

use std::collections::HashMap;

use crate::domain::entities::{SpeciesGrowth, TreeRecord};
use crate::domain::error::DomainError;

/// Maps species names to their linear growth parameters.
///
/// Built once from the growth table and never mutated.
#[derive(Debug, Clone, Default)]
pub struct GrowthModel {
    by_species: HashMap<String, SpeciesGrowth>,
}

impl GrowthModel {
    /// Build the model from growth rows. A later row for the same species wins.
    pub fn new(rows: impl IntoIterator<Item = SpeciesGrowth>) -> Self {
        let by_species = rows
            .into_iter()
            .map(|g| (g.species.clone(), g))
            .collect();
        Self { by_species }
    }

    /// Growth parameters for `species`, or `None` if the table has no entry.
    pub fn lookup(&self, species: &str) -> Option<&SpeciesGrowth> {
        self.by_species.get(species)
    }

    pub fn len(&self) -> usize {
        self.by_species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_species.is_empty()
    }
}

/// Age and height of a tree in a given evaluation year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightEstimate {
    pub age: i32,
    pub current_height: f64,
}

/// Derives a tree's current height from its planting year and species growth.
pub struct HeightEstimator;

impl HeightEstimator {
    /// `current_height = initial_height + growth_per_year * age`.
    ///
    /// A missing growth entry yields `SpeciesNotFound` rather than a zero height.
    /// Trees planted after `evaluation_year` (or so far back that the age
    /// overflows) yield `InvalidAge`. A negative result yields `NegativeHeight`,
    /// a NaN or infinite one `NonFiniteHeight`.
    pub fn estimate(
        tree: &TreeRecord,
        growth: Option<&SpeciesGrowth>,
        evaluation_year: i32,
    ) -> Result<HeightEstimate, DomainError> {
        let growth = growth.ok_or_else(|| DomainError::SpeciesNotFound {
            tree_id: tree.id.clone(),
            species: tree.species.clone(),
        })?;

        let age = evaluation_year
            .checked_sub(tree.planted_year)
            .filter(|age| *age >= 0)
            .ok_or_else(|| DomainError::InvalidAge {
                tree_id: tree.id.clone(),
                planted_year: tree.planted_year,
                evaluation_year,
            })?;

        let current_height = growth.initial_height + growth.growth_per_year * f64::from(age);
        if !current_height.is_finite() {
            return Err(DomainError::NonFiniteHeight {
                tree_id: tree.id.clone(),
                height: current_height,
            });
        }
        if current_height < 0.0 {
            return Err(DomainError::NegativeHeight {
                tree_id: tree.id.clone(),
                height: current_height,
            });
        }

        Ok(HeightEstimate {
            age,
            current_height,
        })
    }
}
