//! "Why this route" explanation: ranking text, delay breakdown and context notes.

use serde::Serialize;

use crate::analytics::summary::why_recommended_text;
use crate::analytics::template::{TemplateVars, interpolate};
use crate::analytics::types::{DerivedRouteAnalytics, NavigationSummary, PredictionContext};
use crate::config::{AnalyticsConfig, SummaryTemplates};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Explanation {
    pub ranking_text: Option<String>,
    pub delay_breakdown: Option<String>,
    pub notes: Vec<String>,
}

/// `base + delay = total` for a route, or `None` when all three are zero.
pub fn delay_breakdown(route: &DerivedRouteAnalytics, templates: &SummaryTemplates) -> Option<String> {
    let (base, delay, total) = (
        route.base_time_min,
        route.predicted_delay_min,
        route.predicted_time_min,
    );
    if base == 0.0 && delay == 0.0 && total == 0.0 {
        return None;
    }

    Some(interpolate(
        &templates.delay_breakdown,
        &TemplateVars::new()
            .set("base", base)
            .set("delay", delay)
            .set("total", total),
    ))
}

/// Context notes: peak hour (if flagged), weekend or weekday, then the
/// backend's weather note when present.
pub fn context_notes(
    context: &PredictionContext,
    travel_day: Option<&str>,
    config: &AnalyticsConfig,
) -> Vec<String> {
    let templates = &config.templates;
    let mut notes = Vec::new();

    if context.peak_hour_flag == Some(true) {
        notes.push(templates.peak_hour_note.clone());
    }

    if travel_day.is_some_and(|day| config.is_weekend(day)) {
        notes.push(templates.weekend_note.clone());
    } else {
        notes.push(templates.weekday_note.clone());
    }

    if let Some(note) = context.weather_impact_note.as_deref().filter(|n| !n.is_empty()) {
        notes.push(note.to_string());
    }

    notes
}

pub fn explain_recommendation(
    nav: &NavigationSummary,
    context: &PredictionContext,
    travel_day: Option<&str>,
    config: &AnalyticsConfig,
) -> Explanation {
    let route = nav.recommended_route.as_ref();

    Explanation {
        ranking_text: route.map(|r| why_recommended_text(r, &config.templates)),
        delay_breakdown: route.and_then(|r| delay_breakdown(r, &config.templates)),
        notes: context_notes(context, travel_day, config),
    }
}
