//! Tree evaluation engine
//!
//! Derives current height and risk flags for every tree around a site.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::application::{ApplicationError, ApplicationResult, EvaluationReport};
use crate::domain::{
    DomainError, EvaluatedTree, HeightEstimator, RiskClassifier, RiskThresholds, Site,
    TreeRecord, UnevaluableTree, WindReading,
};
use crate::infrastructure::traits::{GrowthCatalog, SiteCatalog, TreeCatalog, WindProvider};

/// Composition root of the evaluation core.
///
/// Reads only from the catalogs it is given; holds no mutable state.
pub struct EvaluationEngine {
    sites: Arc<dyn SiteCatalog>,
    trees: Arc<dyn TreeCatalog>,
    growth: Arc<dyn GrowthCatalog>,
    classifier: RiskClassifier,
}

impl EvaluationEngine {
    /// Fails with `Config` when `thresholds` are not finite, negative, or
    /// place `tolerance_min` above `wo_max_height`.
    pub fn new(
        sites: Arc<dyn SiteCatalog>,
        trees: Arc<dyn TreeCatalog>,
        growth: Arc<dyn GrowthCatalog>,
        thresholds: RiskThresholds,
    ) -> ApplicationResult<Self> {
        thresholds
            .validate()
            .map_err(|message| ApplicationError::Config { message })?;
        Ok(Self {
            sites,
            trees,
            growth,
            classifier: RiskClassifier::new(thresholds),
        })
    }

    pub fn thresholds(&self) -> &RiskThresholds {
        self.classifier.thresholds()
    }

    /// All sites in catalog order.
    pub fn sites(&self) -> Vec<Site> {
        self.sites.all()
    }

    pub fn resolve_site(&self, site_name: &str) -> ApplicationResult<Site> {
        self.sites
            .by_name(site_name)
            .ok_or_else(|| DomainError::SiteNotFound(site_name.to_string()).into())
    }

    /// Evaluate all trees of a site with an already obtained wind reading.
    ///
    /// Fails with `SiteNotFound` for an unknown site and `WindUnavailable`
    /// when `wind` is absent or carries no finite, non-negative speed.
    #[instrument(skip(self))]
    pub fn evaluate(
        &self,
        site_name: &str,
        evaluation_year: i32,
        wind: Option<WindReading>,
    ) -> ApplicationResult<EvaluationReport> {
        let site = self.resolve_site(site_name)?;
        let wind_speed = wind
            .as_ref()
            .and_then(WindReading::usable_speed)
            .ok_or_else(|| DomainError::WindUnavailable {
                reason: "no wind speed in reading".to_string(),
            })?;
        Ok(self.evaluate_site(site, evaluation_year, wind_speed))
    }

    /// Resolve the site, ask `provider` once for its wind, then evaluate.
    ///
    /// A provider failure aborts before any tree is looked at.
    #[instrument(skip(self, provider))]
    pub fn evaluate_with(
        &self,
        site_name: &str,
        evaluation_year: i32,
        provider: &dyn WindProvider,
    ) -> ApplicationResult<EvaluationReport> {
        let site = self.resolve_site(site_name)?;
        let reading = provider
            .fetch(site.latitude, site.longitude)
            .map_err(|e| DomainError::WindUnavailable { reason: e.reason })?;
        let wind_speed = reading
            .usable_speed()
            .ok_or_else(|| DomainError::WindUnavailable {
                reason: "provider returned no wind speed".to_string(),
            })?;
        Ok(self.evaluate_site(site, evaluation_year, wind_speed))
    }

    fn evaluate_site(&self, site: Site, evaluation_year: i32, wind_speed: f64) -> EvaluationReport {
        let records = self.trees.by_site(&site.name);
        debug!(
            "evaluating {} trees at {} (year {evaluation_year}, wind {wind_speed} km/h)",
            records.len(),
            site.name
        );

        let mut trees = Vec::with_capacity(records.len());
        let mut unevaluable = Vec::new();
        for record in &records {
            match self.evaluate_tree(record, evaluation_year, wind_speed) {
                Ok(tree) => trees.push(tree),
                Err(e) => {
                    warn!("tree {} not evaluable: {e}", record.id);
                    unevaluable.push(UnevaluableTree::new(record, &e));
                }
            }
        }

        EvaluationReport {
            site,
            evaluation_year,
            wind_speed_kmh: wind_speed,
            thresholds: *self.classifier.thresholds(),
            trees,
            unevaluable,
        }
    }

    fn evaluate_tree(
        &self,
        record: &TreeRecord,
        evaluation_year: i32,
        wind_speed: f64,
    ) -> Result<EvaluatedTree, DomainError> {
        let growth = self.growth.by_species(&record.species);
        let estimate = HeightEstimator::estimate(record, growth.as_ref(), evaluation_year)?;
        let flags = self.classifier.classify(estimate.current_height, wind_speed);

        Ok(EvaluatedTree {
            id: record.id.clone(),
            species: record.species.clone(),
            age: estimate.age,
            current_height: estimate.current_height,
            prune_recommended: flags.prune_recommended,
            over_max: flags.over_max,
            near_limit: flags.near_limit,
            latitude: record.latitude,
            longitude: record.longitude,
        })
    }
}
