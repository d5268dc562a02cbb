//! Catalogs of sites, trees and species growth
//!
//! Rows are kept in file order; the engine relies on that order for its output.

use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::{GrowthModel, Site, SpeciesGrowth, TreeRecord};
use crate::infrastructure::error::{InfraError, InfraResult};
use crate::infrastructure::traits::{GrowthCatalog, SiteCatalog, TreeCatalog};

/// Read-only snapshot of all reference data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    sites: Vec<Site>,
    trees: Vec<TreeRecord>,
    growth: GrowthModel,
}

impl InMemoryCatalog {
    pub fn new(sites: Vec<Site>, growth: Vec<SpeciesGrowth>, trees: Vec<TreeRecord>) -> Self {
        Self {
            sites,
            trees,
            growth: GrowthModel::new(growth),
        }
    }

    /// Load the three CSV tables.
    ///
    /// Expected headers:
    /// - sites: `name,latitude,longitude`
    /// - growth: `species,initial_height,growth_per_year`
    /// - trees: `id,species,wo_name,planted_year,latitude,longitude`
    pub fn from_csv(sites: &Path, growth: &Path, trees: &Path) -> InfraResult<Self> {
        let sites: Vec<Site> = read_csv(sites)?;
        let growth: Vec<SpeciesGrowth> = read_csv(growth)?;
        let trees: Vec<TreeRecord> = read_csv(trees)?;
        debug!(
            "loaded catalog: {} sites, {} species, {} trees",
            sites.len(),
            growth.len(),
            trees.len()
        );
        Ok(Self::new(sites, growth, trees))
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }
}

impl SiteCatalog for InMemoryCatalog {
    fn all(&self) -> Vec<Site> {
        self.sites.clone()
    }

    fn by_name(&self, name: &str) -> Option<Site> {
        self.sites.iter().find(|s| s.name == name).cloned()
    }
}

impl TreeCatalog for InMemoryCatalog {
    fn by_site(&self, site_name: &str) -> Vec<TreeRecord> {
        self.trees
            .iter()
            .filter(|t| t.site_name == site_name)
            .cloned()
            .collect()
    }
}

impl GrowthCatalog for InMemoryCatalog {
    fn by_species(&self, species: &str) -> Option<SpeciesGrowth> {
        self.growth.by_species(species)
    }
}

/// Deserialize every row of a headed CSV file, trimming whitespace.
fn read_csv<T: DeserializeOwned>(path: &Path) -> InfraResult<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| InfraError::csv(path, e))?;

    reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|e| InfraError::csv(path, e))
}
