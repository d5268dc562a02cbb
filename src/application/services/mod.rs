//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (SiteCatalog, WindProvider, etc.)
//! but are themselves concrete structs, not traits.

mod evaluation;

pub use evaluation::EvaluationEngine;
