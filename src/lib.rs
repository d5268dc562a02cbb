//! Tree pruning recommendations around WO sites.
//!
//! Estimates each tree's current height from its planting year and species
//! growth rate, then flags it against the site's height ceiling and the local
//! wind speed.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
