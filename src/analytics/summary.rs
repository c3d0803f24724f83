//! Natural-language summaries and bullet lists built from templates.

use crate::analytics::template::{TemplateVars, interpolate};
use crate::analytics::types::{DerivedRouteAnalytics, HumanReadableSummaries, RunLevelAnalytics};
use crate::config::SummaryTemplates;

/// The first route ranked 1 by the backend, if any.
pub fn recommended_route(derived: &[DerivedRouteAnalytics]) -> Option<&DerivedRouteAnalytics> {
    derived.iter().find(|d| d.rank == 1)
}

/// Every route not ranked 1.
pub fn alternatives(derived: &[DerivedRouteAnalytics]) -> impl Iterator<Item = &DerivedRouteAnalytics> {
    derived.iter().filter(|d| d.rank != 1)
}

/// Largest `time_saved_vs_best_route` among the alternatives, 0 when there are none.
pub fn max_time_saved(derived: &[DerivedRouteAnalytics]) -> f64 {
    alternatives(derived)
        .map(|d| d.time_saved_vs_best_route)
        .reduce(f64::max)
        .unwrap_or(0.0)
}

pub fn time_saved_text(derived: &[DerivedRouteAnalytics], templates: &SummaryTemplates) -> String {
    let best_route = recommended_route(derived)
        .map(|rec| rec.name.as_str())
        .unwrap_or("");

    interpolate(
        &templates.time_saved_vs_alternatives,
        &TemplateVars::new()
            .set("max_saved", max_time_saved(derived))
            .set("best_route", best_route),
    )
}

pub fn why_recommended_text(route: &DerivedRouteAnalytics, templates: &SummaryTemplates) -> String {
    interpolate(
        &templates.why_recommended,
        &TemplateVars::new()
            .set("route_name", &route.name)
            .set("total_time", route.predicted_time_min)
            .set("base", route.base_time_min)
            .set("delay", route.predicted_delay_min),
    )
}

pub fn derive_human_readable_summaries(
    derived: &[DerivedRouteAnalytics],
    run: &RunLevelAnalytics,
    templates: &SummaryTemplates,
) -> HumanReadableSummaries {
    let why_recommended = recommended_route(derived)
        .map(|rec| why_recommended_text(rec, templates))
        .unwrap_or_default();

    let congestion_consistency = interpolate(
        &templates.congestion_consistency,
        &TemplateVars::new().set("indicator", run.congestion_consistency_indicator.as_str()),
    );

    HumanReadableSummaries {
        why_recommended,
        time_saved_vs_alternatives: time_saved_text(derived, templates),
        congestion_consistency,
    }
}

/// One insight line per route, in input order.
pub fn derive_route_insight_bullets(
    derived: &[DerivedRouteAnalytics],
    templates: &SummaryTemplates,
) -> Vec<String> {
    derived
        .iter()
        .map(|d| {
            interpolate(
                &templates.route_insight,
                &TemplateVars::new()
                    .set("name", &d.name)
                    .set("distance", d.distance_km)
                    .set("total", d.predicted_time_min)
                    .set("base", d.base_time_min)
                    .set("delay", d.predicted_delay_min)
                    .set("risk", &d.risk)
                    .set("congestion", &d.congestion_level),
            )
        })
        .collect()
}

/// Count, fastest, safest and average-delay lines. Empty for an empty run.
pub fn derive_run_summary_bullets(
    run: &RunLevelAnalytics,
    templates: &SummaryTemplates,
) -> Vec<String> {
    let mut bullets = Vec::new();
    if run.total_routes == 0 {
        return bullets;
    }

    bullets.push(interpolate(
        &templates.run_summary_total,
        &TemplateVars::new().set("count", run.total_routes),
    ));
    if !run.fastest_route_name.is_empty() {
        bullets.push(interpolate(
            &templates.run_summary_fastest,
            &TemplateVars::new().set("name", &run.fastest_route_name),
        ));
    }
    if !run.safest_route_name.is_empty() {
        bullets.push(interpolate(
            &templates.run_summary_safest,
            &TemplateVars::new().set("name", &run.safest_route_name),
        ));
    }
    bullets.push(interpolate(
        &templates.run_summary_avg_delay,
        &TemplateVars::new().set("value", run.average_delay),
    ));

    bullets
}
