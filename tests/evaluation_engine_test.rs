//! Tests for EvaluationEngine

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use approx::assert_relative_eq;

use woprune::application::services::EvaluationEngine;
use woprune::application::ApplicationError;
use woprune::domain::{DomainError, RiskThresholds, Site, SpeciesGrowth, TreeRecord, WindReading};
use woprune::infrastructure::traits::{
    FixedWindProvider, GrowthCatalog, TreeCatalog, UnavailableWindProvider,
};
use woprune::infrastructure::InMemoryCatalog;
use woprune::util::testing;

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

fn site(name: &str) -> Site {
    Site {
        name: name.to_string(),
        latitude: -6.2,
        longitude: 106.8,
    }
}

fn growth(species: &str, initial_height: f64, growth_per_year: f64) -> SpeciesGrowth {
    SpeciesGrowth {
        species: species.to_string(),
        initial_height,
        growth_per_year,
    }
}

fn tree(id: &str, species: &str, site: &str, planted_year: i32) -> TreeRecord {
    TreeRecord {
        id: id.to_string(),
        species: species.to_string(),
        site_name: site.to_string(),
        planted_year,
        latitude: -6.2,
        longitude: 106.8,
    }
}

/// Five trees at WO-A (one of an unknown species), one at WO-B.
fn catalog() -> InMemoryCatalog {
    InMemoryCatalog::new(
        vec![site("WO-A"), site("WO-B")],
        vec![
            growth("Mahoni", 2.0, 0.5),
            growth("Trembesi", 3.0, 1.5),
            growth("Angsana", 1.0, 1.0),
        ],
        vec![
            tree("A1", "Mahoni", "WO-A", 2015),
            tree("A2", "Trembesi", "WO-A", 2014),
            tree("B1", "Mahoni", "WO-B", 2000),
            tree("A3", "Unknown", "WO-A", 2010),
            tree("A4", "Angsana", "WO-A", 2006),
            tree("A5", "Trembesi", "WO-A", 2020),
        ],
    )
}

fn engine() -> EvaluationEngine {
    let catalog = Arc::new(catalog());
    EvaluationEngine::new(
        catalog.clone(),
        catalog.clone(),
        catalog,
        RiskThresholds::default(),
    )
    .unwrap()
}

#[test]
fn given_known_species_when_evaluating_then_height_from_linear_growth() {
    let report = engine()
        .evaluate("WO-A", 2025, Some(WindReading::kmh(10.0)))
        .unwrap();

    let a1 = report.trees.iter().find(|t| t.id == "A1").unwrap();
    assert_eq!(a1.age, 10);
    assert_relative_eq!(a1.current_height, 7.0);
    assert!(!a1.prune_recommended);
    assert!(!a1.over_max);
    assert!(!a1.near_limit);
}

#[test]
fn given_site_trees_when_evaluating_then_catalog_order_is_kept() {
    let report = engine()
        .evaluate("WO-A", 2025, Some(WindReading::kmh(40.0)))
        .unwrap();

    let ids: Vec<&str> = report.trees.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["A1", "A2", "A4", "A5"]);
}

#[test]
fn given_unknown_species_when_evaluating_then_other_trees_still_evaluated() {
    let report = engine()
        .evaluate("WO-A", 2025, Some(WindReading::kmh(40.0)))
        .unwrap();

    assert_eq!(report.trees.len(), 4);
    assert_eq!(report.unevaluable.len(), 1);
    assert_eq!(report.unevaluable[0].id, "A3");
    assert!(report.unevaluable[0].reason.contains("Unknown"));

    // excluded from every risk table
    for table in [report.prune_recommended(), report.over_max(), report.near_limit()] {
        assert!(table.iter().all(|t| t.id != "A3"));
    }
}

#[test]
fn given_strong_wind_when_evaluating_then_all_three_flags_assigned() {
    let report = engine()
        .evaluate("WO-A", 2025, Some(WindReading::kmh(45.0)))
        .unwrap();

    // A2: 3 + 1.5 * 11 = 19.5 -> near limit, prune
    let a2 = report.trees.iter().find(|t| t.id == "A2").unwrap();
    assert_relative_eq!(a2.current_height, 19.5);
    assert!(a2.prune_recommended && a2.near_limit && !a2.over_max);

    // A4: 1 + 1.0 * 19 = 20.0 -> exactly at ceiling
    let a4 = report.trees.iter().find(|t| t.id == "A4").unwrap();
    assert_relative_eq!(a4.current_height, 20.0);
    assert!(a4.near_limit && !a4.over_max);

    // A5: 3 + 1.5 * 5 = 10.5 -> prune only
    let a5 = report.trees.iter().find(|t| t.id == "A5").unwrap();
    assert!(a5.prune_recommended && !a5.near_limit && !a5.over_max);
}

#[test]
fn given_wind_at_threshold_when_evaluating_then_nothing_pruned() {
    let report = engine()
        .evaluate("WO-A", 2025, Some(WindReading::kmh(30.0)))
        .unwrap();
    assert!(report.prune_recommended().is_empty());

    let report = engine()
        .evaluate("WO-A", 2025, Some(WindReading::kmh(30.01)))
        .unwrap();
    let ids: Vec<&str> = report
        .prune_recommended()
        .iter()
        .map(|t| t.id.as_str())
        .collect();
    assert_eq!(ids, vec!["A2", "A4", "A5"]);
}

#[test]
fn given_same_inputs_when_evaluating_twice_then_identical_reports() {
    let engine = engine();
    let first = engine
        .evaluate("WO-A", 2025, Some(WindReading::kmh(33.3)))
        .unwrap();
    let second = engine
        .evaluate("WO-A", 2025, Some(WindReading::kmh(33.3)))
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn given_unknown_site_when_evaluating_then_site_not_found() {
    let err = engine()
        .evaluate("WO-Z", 2025, Some(WindReading::kmh(40.0)))
        .unwrap_err();
    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::SiteNotFound(ref name)) if name == "WO-Z"
    ));
}

#[test]
fn given_no_wind_reading_when_evaluating_then_wind_unavailable() {
    let engine = engine();
    for wind in [None, Some(WindReading::default()), Some(WindReading::kmh(f64::NAN))] {
        let err = engine.evaluate("WO-A", 2025, wind).unwrap_err();
        assert!(
            matches!(err, ApplicationError::Domain(DomainError::WindUnavailable { .. })),
            "wind {wind:?} should be fatal"
        );
    }
}

#[test]
fn given_future_planting_when_evaluating_then_tree_reported_invalid_age() {
    let report = engine()
        .evaluate("WO-A", 2018, Some(WindReading::kmh(40.0)))
        .unwrap();
    let a5 = report.unevaluable.iter().find(|t| t.id == "A5").unwrap();
    assert!(a5.reason.contains("2020"));
    assert!(report.trees.iter().all(|t| t.id != "A5"));
}

#[test]
fn given_fixed_provider_when_evaluating_with_then_uses_its_speed() {
    let report = engine()
        .evaluate_with("WO-B", 2025, &FixedWindProvider::new(50.0))
        .unwrap();
    assert_relative_eq!(report.wind_speed_kmh, 50.0);
    assert_eq!(report.trees.len(), 1);
    assert!(report.trees[0].prune_recommended);
}

/// Catalog that counts how often trees and growth were looked up.
struct CountingCatalog {
    inner: InMemoryCatalog,
    tree_lookups: AtomicUsize,
    growth_lookups: AtomicUsize,
}

impl TreeCatalog for CountingCatalog {
    fn by_site(&self, site_name: &str) -> Vec<TreeRecord> {
        self.tree_lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.by_site(site_name)
    }
}

impl GrowthCatalog for CountingCatalog {
    fn by_species(&self, species: &str) -> Option<SpeciesGrowth> {
        self.growth_lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.by_species(species)
    }
}

#[test]
fn given_failing_provider_when_evaluating_with_then_aborts_before_any_tree() {
    let sites = Arc::new(catalog());
    let counting = Arc::new(CountingCatalog {
        inner: catalog(),
        tree_lookups: AtomicUsize::new(0),
        growth_lookups: AtomicUsize::new(0),
    });
    let engine = EvaluationEngine::new(
        sites,
        counting.clone(),
        counting.clone(),
        RiskThresholds::default(),
    )
    .unwrap();

    let err = engine
        .evaluate_with("WO-A", 2025, &UnavailableWindProvider::new("HTTP 503"))
        .unwrap_err();

    assert_eq!(err.to_string(), "no wind data: HTTP 503");
    assert_eq!(counting.tree_lookups.load(Ordering::SeqCst), 0);
    assert_eq!(counting.growth_lookups.load(Ordering::SeqCst), 0);
}

#[test]
fn given_custom_thresholds_when_evaluating_then_engine_uses_them() {
    let catalog = Arc::new(catalog());
    let thresholds = RiskThresholds {
        height_threshold: 5.0,
        wind_threshold: 20.0,
        wo_max_height: 8.0,
        tolerance_min: 6.0,
    };
    let engine =
        EvaluationEngine::new(catalog.clone(), catalog.clone(), catalog, thresholds).unwrap();

    let report = engine
        .evaluate("WO-A", 2025, Some(WindReading::kmh(25.0)))
        .unwrap();
    let a1 = report.trees.iter().find(|t| t.id == "A1").unwrap();
    assert!(a1.prune_recommended);
    assert!(a1.near_limit);
    assert!(!a1.over_max);
    assert_eq!(report.thresholds, thresholds);
}

#[test]
fn given_inverted_tolerance_band_when_building_engine_then_config_error() {
    let catalog = Arc::new(catalog());
    let thresholds = RiskThresholds {
        tolerance_min: 25.0,
        ..RiskThresholds::default()
    };

    let result = EvaluationEngine::new(catalog.clone(), catalog.clone(), catalog, thresholds);

    match result {
        Err(ApplicationError::Config { message }) => {
            assert!(message.contains("tolerance_min"));
        }
        Err(e) => panic!("expected Config, got {e}"),
        Ok(_) => panic!("inverted band must be rejected"),
    }
}

#[test]
fn given_nan_max_height_when_building_engine_then_config_error() {
    let catalog = Arc::new(catalog());
    let thresholds = RiskThresholds {
        wo_max_height: f64::NAN,
        ..RiskThresholds::default()
    };

    let result = EvaluationEngine::new(catalog.clone(), catalog.clone(), catalog, thresholds);

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_extreme_planted_year_when_evaluating_then_tree_is_unevaluable() {
    let catalog = Arc::new(InMemoryCatalog::new(
        vec![site("WO-A")],
        vec![growth("Mahoni", 2.0, 0.5)],
        vec![
            tree("A1", "Mahoni", "WO-A", 2015),
            tree("BAD", "Mahoni", "WO-A", i32::MIN),
        ],
    ));
    let engine = EvaluationEngine::new(
        catalog.clone(),
        catalog.clone(),
        catalog,
        RiskThresholds::default(),
    )
    .unwrap();

    let report = engine
        .evaluate("WO-A", 2025, Some(WindReading::kmh(10.0)))
        .unwrap();

    let ids: Vec<&str> = report.trees.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["A1"]);
    assert_eq!(report.unevaluable.len(), 1);
    assert_eq!(report.unevaluable[0].id, "BAD");
}

#[test]
fn given_negative_wind_reading_when_evaluating_then_wind_unavailable() {
    let err = engine()
        .evaluate("WO-A", 2025, Some(WindReading::kmh(-5.0)))
        .unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::WindUnavailable { .. })
    ));
}
