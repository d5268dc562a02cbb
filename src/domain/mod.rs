//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod entities;
pub mod error;
pub mod growth;
pub mod risk;

pub use entities::*;
pub use error::DomainError;
pub use growth::{GrowthModel, HeightEstimate, HeightEstimator};
pub use risk::{MarkerColor, RiskClassifier, RiskFlags, RiskThresholds};
