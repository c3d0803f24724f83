use tracing::debug;

use crate::analytics::aggregate::derive_run_level_analytics;
use crate::analytics::derive::derive_route_analytics;
use crate::analytics::summary::{
    alternatives, derive_human_readable_summaries, recommended_route, time_saved_text,
};
use crate::analytics::table::flatten_comparison_table;
use crate::analytics::types::{NavigationSummary, PlannerSummary, Prediction};
use crate::config::AnalyticsConfig;

/// Bundles per-route analytics, run aggregates, summaries and the flattened
/// table for one prediction payload.
pub fn derive_planner_summary(prediction: &Prediction, config: &AnalyticsConfig) -> PlannerSummary {
    let routes = derive_route_analytics(&prediction.routes, config);
    let run = derive_run_level_analytics(&prediction.routes, &routes);
    let summaries = derive_human_readable_summaries(&routes, &run, &config.templates);
    let flattened_table = flatten_comparison_table(&routes);

    debug!(
        total_routes = run.total_routes,
        fastest = %run.fastest_route_name,
        safest = %run.safest_route_name,
        consistency = %run.congestion_consistency_indicator,
        "Planner summary derived"
    );

    PlannerSummary {
        run,
        routes,
        summaries,
        flattened_table,
    }
}

/// The rank-1 route, how much it saves over the alternatives, and how many
/// alternatives there are. The message is empty when nothing is ranked 1.
pub fn derive_navigation_summary(
    prediction: &Prediction,
    config: &AnalyticsConfig,
) -> NavigationSummary {
    let derived = derive_route_analytics(&prediction.routes, config);
    let recommended = recommended_route(&derived).cloned();
    let alternatives_count = alternatives(&derived).count();

    let time_saved_message = match &recommended {
        Some(_) => time_saved_text(&derived, &config.templates),
        None => String::new(),
    };

    debug!(
        recommended = recommended.as_ref().map(|r| r.name.as_str()).unwrap_or(""),
        alternatives = alternatives_count,
        "Navigation summary derived"
    );

    NavigationSummary {
        recommended_route: recommended,
        time_saved_message,
        alternatives_count,
    }
}
