//! Crate-level test suites.
//!
//! - `scenarios.rs`: worked movement scenarios and whole-jump properties
//! - `terrain.rs`: controllers moving through parsed level layouts
//! - `determinism.rs`: identical inputs produce identical trajectories
//! - `helpers.rs`: shared fixtures

mod helpers;

// Re-export for convenience
pub use helpers::*;
