//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent business rule violations.
///
/// `SiteNotFound` and `WindUnavailable` abort an evaluation. The remaining
/// variants concern a single tree and only exclude that tree.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("no site named '{0}'")]
    SiteNotFound(String),

    #[error("no growth data for species '{species}'")]
    SpeciesNotFound { tree_id: String, species: String },

    #[error("no wind data: {reason}")]
    WindUnavailable { reason: String },

    #[error("planting year {planted_year} gives no valid age in {evaluation_year}")]
    InvalidAge {
        tree_id: String,
        planted_year: i32,
        evaluation_year: i32,
    },

    #[error("estimated height {height:.2} m is negative")]
    NegativeHeight { tree_id: String, height: f64 },

    #[error("estimated height {height} is not a finite number")]
    NonFiniteHeight { tree_id: String, height: f64 },
}
