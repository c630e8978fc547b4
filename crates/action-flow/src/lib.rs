//! Scenario orchestration layer
//!
//! Composes resolution, actions, navigation observation and domain
//! classification into the reusable scenarios the test suites share:
//! - External-link verification with guaranteed context restoration
//! - Form submission against an expected success or validation-error branch
//! - Page-wide sweep of every distinct external link

pub mod context;
pub mod errors;
pub mod executor;
pub mod external_link;
pub mod form_submission;
pub mod sweep;
pub mod types;

pub use context::BrowsingContextSet;
pub use errors::FlowError;
pub use executor::{DefaultScenarioExecutor, ScenarioExecutor};
pub use external_link::is_followable;
pub use types::{
    FieldValue, FormField, FormFlowState, FormScenario, LinkFlowState, ScenarioOutcome,
    ScenarioReport, SkipReason, SweepReport,
};
