//! Configuration for the analytics layer and the backend client.
//!
//! Everything the derivation functions need (templates, the congestion
//! ordering table, alert thresholds) lives in [`AnalyticsConfig`] and is passed
//! in explicitly. A JSON file may override any subset of the defaults:
//! ```json
//! {
//!   "congestion_order": ["light", "moderate", "heavy", "gridlock"],
//!   "alerts": { "risk_score_alert": 80 },
//!   "api": { "base_url": "http://traffic.internal:8000" }
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable that overrides [`ApiConfig::base_url`].
pub const API_BASE_URL_ENV: &str = "ROUTE_API_BASE_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub templates: SummaryTemplates,
    /// Congestion labels from least to most severe, lower-cased.
    pub congestion_order: Vec<String>,
    pub alerts: AlertConfig,
    pub weekend_days: Vec<String>,
    pub api: ApiConfig,
}

/// Text templates with `{placeholder}` tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryTemplates {
    pub why_recommended: String,
    pub time_saved_vs_alternatives: String,
    pub congestion_consistency: String,
    pub run_summary_total: String,
    pub run_summary_fastest: String,
    pub run_summary_safest: String,
    pub run_summary_avg_delay: String,
    pub route_insight: String,
    pub delay_breakdown: String,
    pub peak_hour_note: String,
    pub weekend_note: String,
    pub weekday_note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    pub risk_score_alert: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub prediction_path: String,
    pub incident_path: String,
}

impl AnalyticsConfig {
    /// Loads the config from a JSON file at `path`. Missing keys keep their defaults.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed reading config: {path}"))?;
        Self::from_json(&content).with_context(|| format!("failed parsing config: {path}"))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Applies [`API_BASE_URL_ENV`] if it is set and non-blank.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(base_url) = std::env::var(API_BASE_URL_ENV) {
            let base_url = base_url.trim();
            if !base_url.is_empty() {
                self.api.base_url = base_url.to_string();
            }
        }
        self
    }

    /// Position of `label` in the severity order (case-insensitive), or
    /// `congestion_order.len()` for labels outside it.
    pub fn congestion_severity(&self, label: &str) -> usize {
        let label = label.to_lowercase();
        self.congestion_order
            .iter()
            .position(|known| known.to_lowercase() == label)
            .unwrap_or(self.congestion_order.len())
    }

    pub fn is_weekend(&self, travel_day: &str) -> bool {
        let day = travel_day.to_lowercase();
        self.weekend_days.iter().any(|d| d.to_lowercase() == day)
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            templates: SummaryTemplates::default(),
            congestion_order: vec![
                "light".to_string(),
                "moderate".to_string(),
                "heavy".to_string(),
            ],
            alerts: AlertConfig::default(),
            weekend_days: vec!["saturday".to_string(), "sunday".to_string()],
            api: ApiConfig::default(),
        }
    }
}

impl Default for SummaryTemplates {
    fn default() -> Self {
        Self {
            why_recommended: "Route {route_name} is recommended with total time {total_time} mins (base {base} + delay {delay})."
                .to_string(),
            time_saved_vs_alternatives:
                "Up to {max_saved} mins can be saved vs alternatives. Best route: {best_route}."
                    .to_string(),
            congestion_consistency: "Congestion across routes is {indicator}.".to_string(),
            run_summary_total: "{count} route(s) available.".to_string(),
            run_summary_fastest: "Fastest: {name}.".to_string(),
            run_summary_safest: "Safest: {name}.".to_string(),
            run_summary_avg_delay: "Average delay: {value} mins.".to_string(),
            route_insight: "• {name}: {distance} km, {total} mins total (base {base} + delay {delay}), {risk} risk, {congestion} congestion."
                .to_string(),
            delay_breakdown: "{base} + {delay} = {total} mins".to_string(),
            peak_hour_note: "Travel during peak hours — expect higher congestion.".to_string(),
            weekend_note: "Weekend travel — patterns may differ from weekdays.".to_string(),
            weekday_note: "Weekday travel.".to_string(),
        }
    }
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            risk_score_alert: 70.0,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            prediction_path: "/predict-route".to_string(),
            incident_path: "/report-incident".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_congestion_severity() {
        let config = AnalyticsConfig::default();
        assert_eq!(config.congestion_severity("Light"), 0);
        assert_eq!(config.congestion_severity("MODERATE"), 1);
        assert_eq!(config.congestion_severity("heavy"), 2);
        assert_eq!(config.congestion_severity("Unknown"), 3);
        assert_eq!(config.congestion_severity(""), 3);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = AnalyticsConfig::from_json(
            r#"{"alerts": {"risk_score_alert": 80}, "api": {"base_url": "http://example.test"}}"#,
        )
        .unwrap();

        assert_eq!(config.alerts.risk_score_alert, 80.0);
        assert_eq!(config.api.base_url, "http://example.test");
        assert_eq!(config.api.prediction_path, "/predict-route");
        assert_eq!(config.templates, SummaryTemplates::default());
        assert_eq!(config.congestion_order.len(), 3);
    }

    #[test]
    fn test_custom_template_override() {
        let config =
            AnalyticsConfig::from_json(r#"{"templates": {"run_summary_total": "{count} options"}}"#)
                .unwrap();
        assert_eq!(config.templates.run_summary_total, "{count} options");
        assert_eq!(config.templates.run_summary_fastest, "Fastest: {name}.");
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(AnalyticsConfig::from_json("{not json").is_err());
    }

    #[test]
    fn test_is_weekend_case_insensitive() {
        let config = AnalyticsConfig::default();
        assert!(config.is_weekend("Saturday"));
        assert!(config.is_weekend("sunday"));
        assert!(!config.is_weekend("Monday"));
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let path = format!(
            "{}/route_analytics_missing_config.json",
            std::env::temp_dir().display()
        );
        let _ = std::fs::remove_file(&path);
        assert!(AnalyticsConfig::load(&path).is_err());
    }
}
