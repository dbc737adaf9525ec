pub mod engine;
pub mod normalize;
pub mod scenario;
pub mod store;

pub use engine::{analyze, compute_metrics};
pub use normalize::normalize;
pub use scenario::{DEFAULT_SCENARIO_NAME, LineItem, PLACEHOLDER_SLOTS, Scenario};
pub use store::{DbScenarioStore, ScenarioRecord, ScenarioStore};
