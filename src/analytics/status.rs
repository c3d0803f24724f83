use serde::Serialize;
use std::fmt;

use crate::analytics::types::DerivedRouteAnalytics;
use crate::config::AnalyticsConfig;

/// Badge variant for a risk or congestion label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusVariant {
    Low,
    Medium,
    High,
    Default,
}

impl StatusVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusVariant::Low => "low",
            StatusVariant::Medium => "medium",
            StatusVariant::High => "high",
            StatusVariant::Default => "default",
        }
    }
}

impl fmt::Display for StatusVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Badge variants for a route's risk and congestion labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RouteBadges {
    pub risk: StatusVariant,
    pub congestion: StatusVariant,
}

pub fn route_badges(route: &DerivedRouteAnalytics) -> RouteBadges {
    RouteBadges {
        risk: status_variant(&route.risk),
        congestion: status_variant(&route.congestion_level),
    }
}

/// Maps a free-form label onto a badge variant.
///
/// | Label (any case)      | Variant   |
/// |-----------------------|-----------|
/// | `low`, `light`        | `Low`     |
/// | `medium`, `moderate`  | `Medium`  |
/// | `high`, `heavy`       | `High`    |
/// | anything else / empty | `Default` |
pub fn status_variant(label: &str) -> StatusVariant {
    match label.to_lowercase().as_str() {
        "low" | "light" => StatusVariant::Low,
        "medium" | "moderate" => StatusVariant::Medium,
        "high" | "heavy" => StatusVariant::High,
        _ => StatusVariant::Default,
    }
}

/// A route is high-risk when the backend labels it exactly `High` or its
/// score reaches `threshold`.
pub fn is_high_risk(risk: &str, risk_score: Option<f64>, threshold: f64) -> bool {
    risk == "High" || risk_score.is_some_and(|score| score >= threshold)
}

pub fn high_risk_routes<'a>(
    derived: &'a [DerivedRouteAnalytics],
    config: &AnalyticsConfig,
) -> Vec<&'a DerivedRouteAnalytics> {
    derived
        .iter()
        .filter(|d| is_high_risk(&d.risk, Some(d.risk_score), config.alerts.risk_score_alert))
        .collect()
}
