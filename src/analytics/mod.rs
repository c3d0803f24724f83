//! Route analytics derivation.
//!
//! Normalizes loosely-typed route records from a prediction payload, derives
//! per-route metrics and ranks, aggregates run-level statistics, and renders
//! templated summaries. Every function here is pure and total: malformed or
//! partial payloads degrade to zero/empty values instead of failing.

pub mod aggregate;
pub mod derive;
pub mod explain;
pub mod normalize;
pub mod planner;
pub mod status;
pub mod summary;
pub mod table;
pub mod template;
pub mod types;
pub mod utility;

pub use aggregate::derive_run_level_analytics;
pub use derive::derive_route_analytics;
pub use planner::{derive_navigation_summary, derive_planner_summary};
pub use summary::{
    derive_human_readable_summaries, derive_route_insight_bullets, derive_run_summary_bullets,
};
pub use table::{FlattenedComparisonRow, flatten_comparison_table};
pub use types::{
    CongestionConsistency, DerivedRouteAnalytics, HumanReadableSummaries, NavigationSummary,
    PlannerSummary, Prediction, PredictionContext, RouteInput, RunLevelAnalytics,
};
