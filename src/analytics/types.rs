//! Data types used by the derivation pipeline.

use serde::Serialize;
use std::fmt;

/// One candidate route as sent by the backend, after key-spelling resolution
/// but before defaulting. `None` means no candidate key held a usable value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RouteInput {
    pub rank: Option<i64>,
    pub name: Option<String>,
    pub distance_km: Option<f64>,
    pub base_time_min: Option<f64>,
    pub predicted_delay_min: Option<f64>,
    pub predicted_time_min: Option<f64>,
    pub risk: Option<String>,
    pub congestion_level: Option<String>,
    pub risk_score: Option<f64>,
}

/// A [`RouteInput`] with every defaulting rule applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRoute {
    pub rank: i64,
    pub name: String,
    pub distance_km: f64,
    pub base_time_min: f64,
    pub predicted_delay_min: f64,
    /// Reported total, or base + delay when the backend omitted it.
    pub predicted_time_min: f64,
    pub risk: String,
    pub congestion_level: String,
    pub risk_score: f64,
}

/// Prediction-level fields that sit next to `routes` in the payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PredictionContext {
    pub confidence: Option<String>,
    pub congestion_level: Option<String>,
    pub risk_score: Option<f64>,
    pub peak_hour_flag: Option<bool>,
    pub weather_impact_note: Option<String>,
}

/// A whole prediction response, normalized.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Prediction {
    pub routes: Vec<RouteInput>,
    pub context: PredictionContext,
}

/// Canonical per-route analytics record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedRouteAnalytics {
    pub rank: i64,
    pub route_id: String,
    pub name: String,
    pub distance_km: f64,
    pub base_time_min: f64,
    pub predicted_delay_min: f64,
    pub predicted_time_min: f64,
    pub risk: String,
    #[serde(rename = "congestionLevel")]
    pub congestion_level: String,
    #[serde(rename = "riskScore")]
    pub risk_score: f64,
    pub delay_percentage: f64,
    pub time_saved_vs_best_route: f64,
    pub efficiency_km_per_min: f64,
    pub relative_risk_rank: usize,
    pub relative_congestion_rank: usize,
}

/// How congestion labels are distributed across the routes of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CongestionConsistency {
    /// Every route shares one label.
    Consistent,
    /// Every route has a distinct label.
    Varied,
    Mixed,
    /// No routes to classify.
    #[default]
    #[serde(rename = "")]
    Undetermined,
}

impl CongestionConsistency {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Consistent => "consistent",
            Self::Varied => "varied",
            Self::Mixed => "mixed",
            Self::Undetermined => "",
        }
    }
}

impl fmt::Display for CongestionConsistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregates over every route of a single prediction run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunLevelAnalytics {
    pub total_routes: usize,
    pub fastest_route_id: String,
    pub fastest_route_name: String,
    pub safest_route_id: String,
    pub safest_route_name: String,
    pub average_delay: f64,
    pub delay_variance: f64,
    pub risk_spread_across_routes: f64,
    pub congestion_consistency_indicator: CongestionConsistency,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HumanReadableSummaries {
    pub why_recommended: String,
    pub time_saved_vs_alternatives: String,
    pub congestion_consistency: String,
}

/// Everything the planner view shows for one prediction payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannerSummary {
    pub run: RunLevelAnalytics,
    pub routes: Vec<DerivedRouteAnalytics>,
    pub summaries: HumanReadableSummaries,
    pub flattened_table: Vec<crate::analytics::table::FlattenedComparisonRow>,
}

/// The recommended route and how much it saves over the alternatives.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavigationSummary {
    pub recommended_route: Option<DerivedRouteAnalytics>,
    pub time_saved_message: String,
    pub alternatives_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consistency_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&CongestionConsistency::Varied).unwrap(),
            "\"varied\""
        );
        assert_eq!(
            serde_json::to_string(&CongestionConsistency::Undetermined).unwrap(),
            "\"\""
        );
    }

    #[test]
    fn test_derived_route_uses_backend_key_names() {
        let route = DerivedRouteAnalytics {
            rank: 1,
            route_id: "route_1".to_string(),
            name: "A".to_string(),
            distance_km: 10.0,
            base_time_min: 20.0,
            predicted_delay_min: 5.0,
            predicted_time_min: 25.0,
            risk: "Low".to_string(),
            congestion_level: "Light".to_string(),
            risk_score: 10.0,
            delay_percentage: 25.0,
            time_saved_vs_best_route: 0.0,
            efficiency_km_per_min: 0.4,
            relative_risk_rank: 1,
            relative_congestion_rank: 1,
        };
        let value = serde_json::to_value(&route).unwrap();
        assert_eq!(value["congestionLevel"], "Light");
        assert_eq!(value["riskScore"], 10.0);
        assert!(value.get("congestion_level").is_none());
    }
}
