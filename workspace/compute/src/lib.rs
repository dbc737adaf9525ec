//! Rental return analysis.
//!
//! [`analysis::engine`] turns a [`analysis::Scenario`] into its derived
//! metrics, [`analysis::normalize`] builds scenarios out of loosely typed
//! client input and [`analysis::store`] persists one scenario per property.

pub mod analysis;
pub mod error;

pub use analysis::{
    DbScenarioStore, LineItem, Scenario, ScenarioRecord, ScenarioStore, analyze, compute_metrics,
    normalize,
};
