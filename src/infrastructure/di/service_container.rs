//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::EvaluationEngine;
use crate::config::Settings;
use crate::infrastructure::catalog::InMemoryCatalog;
use crate::infrastructure::error::InfraResult;
use crate::infrastructure::meteoblue::MeteoblueWindProvider;
use crate::infrastructure::traits::{FixedWindProvider, WindProvider};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Reference data snapshot
    pub catalog: Arc<InMemoryCatalog>,

    /// Evaluation engine over `catalog`
    pub engine: EvaluationEngine,
}

impl ServiceContainer {
    /// Create a container backed by the CSV tables named in `settings`.
    pub fn new(settings: Settings) -> InfraResult<Self> {
        let catalog = InMemoryCatalog::from_csv(
            &settings.sites_path(),
            &settings.growth_path(),
            &settings.trees_path(),
        )?;
        Self::with_catalog(settings, catalog)
    }

    /// Create a container over an existing catalog (for testing).
    pub fn with_catalog(settings: Settings, catalog: InMemoryCatalog) -> InfraResult<Self> {
        let settings = Arc::new(settings);
        let catalog = Arc::new(catalog);
        let engine = EvaluationEngine::new(
            catalog.clone(),
            catalog.clone(),
            catalog.clone(),
            settings.thresholds,
        )?;

        Ok(Self {
            settings,
            catalog,
            engine,
        })
    }

    /// Wind provider: a fixed value if given, Meteoblue otherwise.
    pub fn wind_provider(&self, fixed_kmh: Option<f64>) -> Box<dyn WindProvider> {
        match fixed_kmh {
            Some(speed) => Box::new(FixedWindProvider::new(speed)),
            None => Box::new(MeteoblueWindProvider::new(&self.settings.meteoblue)),
        }
    }
}
