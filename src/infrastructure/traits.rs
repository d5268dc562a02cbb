//! I/O boundary traits for testability
//!
//! These traits abstract the external collaborators of the evaluation engine,
//! allowing services to be tested with in-memory implementations.

use thiserror::Error;

use crate::domain::{GrowthModel, Site, SpeciesGrowth, TreeRecord, WindReading};

/// Source of site reference data.
pub trait SiteCatalog: Send + Sync {
    /// All sites in catalog order.
    fn all(&self) -> Vec<Site>;

    /// Site with the given name, if any.
    fn by_name(&self, name: &str) -> Option<Site>;
}

/// Source of tree records.
pub trait TreeCatalog: Send + Sync {
    /// Trees belonging to a site, in catalog order.
    fn by_site(&self, site_name: &str) -> Vec<TreeRecord>;
}

/// Source of species growth parameters.
pub trait GrowthCatalog: Send + Sync {
    fn by_species(&self, species: &str) -> Option<SpeciesGrowth>;
}

impl GrowthCatalog for GrowthModel {
    fn by_species(&self, species: &str) -> Option<SpeciesGrowth> {
        self.lookup(species).cloned()
    }
}

/// Normalized failure of a wind lookup.
///
/// Transport, status, parsing and missing-field errors all collapse into this.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct WindFailure {
    pub reason: String,
}

impl WindFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Supplies the current wind speed at a coordinate.
pub trait WindProvider: Send + Sync {
    /// Called once per evaluation.
    fn fetch(&self, latitude: f64, longitude: f64) -> Result<WindReading, WindFailure>;
}

/// Item for FZF-style selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionItem {
    /// Display text shown in selector
    pub display: String,
    /// Actual value (e.g., site name)
    pub value: String,
}

impl SelectionItem {
    pub fn from_site(site: &Site) -> Self {
        Self {
            display: format!("{} ({:.5}, {:.5})", site.name, site.latitude, site.longitude),
            value: site.name.clone(),
        }
    }
}

/// Interactive FZF-style selector abstraction.
pub trait Selector: Send + Sync {
    /// Present items to user and return selected one.
    /// Returns None if user cancels (Esc/Ctrl-C).
    fn select_one(
        &self,
        items: &[SelectionItem],
        prompt: &str,
    ) -> Result<Option<SelectionItem>, String>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Wind provider returning a fixed speed, e.g. a value supplied on the command line.
#[derive(Debug, Clone, Copy)]
pub struct FixedWindProvider {
    speed_kmh: f64,
}

impl FixedWindProvider {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }
}

impl WindProvider for FixedWindProvider {
    fn fetch(&self, _latitude: f64, _longitude: f64) -> Result<WindReading, WindFailure> {
        Ok(WindReading::kmh(self.speed_kmh))
    }
}

/// Wind provider that always fails with the same reason.
#[derive(Debug, Clone)]
pub struct UnavailableWindProvider {
    reason: String,
}

impl UnavailableWindProvider {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl WindProvider for UnavailableWindProvider {
    fn fetch(&self, _latitude: f64, _longitude: f64) -> Result<WindReading, WindFailure> {
        Err(WindFailure::new(self.reason.clone()))
    }
}

/// Real selector implementation using skim (FZF-like).
#[derive(Debug, Default)]
pub struct SkimSelector;

impl Selector for SkimSelector {
    fn select_one(
        &self,
        items: &[SelectionItem],
        prompt: &str,
    ) -> Result<Option<SelectionItem>, String> {
        use skim::prelude::*;
        use std::io::Cursor;

        if items.is_empty() {
            return Ok(None);
        }

        let input = items
            .iter()
            .map(|i| i.display.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let options = SkimOptionsBuilder::default()
            .prompt(Some(prompt))
            .height(Some("50%"))
            .multi(false)
            .build()
            .map_err(|e| format!("failed to build skim options: {e}"))?;

        let item_reader = SkimItemReader::default();
        let items_arc = item_reader.of_bufread(Cursor::new(input));

        match Skim::run_with(&options, Some(items_arc)) {
            Some(out) if out.is_abort => Ok(None),
            Some(out) => Ok(out.selected_items.first().and_then(|selected| {
                let display = selected.output().to_string();
                items.iter().find(|i| i.display == display).cloned()
            })),
            None => Ok(None),
        }
    }
}
