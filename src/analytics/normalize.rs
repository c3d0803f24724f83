//! Field resolution for loosely-typed backend route records.
//!
//! The backend (and older payloads saved from it) spell the same logical field
//! several ways: `distance_km` vs `distance`, `base_time_min` vs `baseTime` vs
//! `duration_min`, and so on. Each logical field has a fixed, ordered list of
//! candidate keys; the first candidate holding a usable value wins. Nothing in
//! here fails: missing or malformed values resolve to `None`, and
//! [`RouteInput::resolve`] turns those into the documented defaults.

use serde_json::{Map, Value};

use crate::analytics::template::format_number;
use crate::analytics::types::{Prediction, PredictionContext, ResolvedRoute, RouteInput};

pub const RANK_KEYS: &[&str] = &["rank"];
pub const NAME_KEYS: &[&str] = &["name", "route"];
pub const DISTANCE_KEYS: &[&str] = &["distance_km", "distance", "distanceKm"];
pub const BASE_TIME_KEYS: &[&str] = &["base_time_min", "baseTime", "duration_min", "baseTimeMin"];
pub const DELAY_KEYS: &[&str] = &[
    "predicted_delay_min",
    "predictedDelay",
    "predicted_delay",
    "predictedDelayMin",
];
pub const TOTAL_TIME_KEYS: &[&str] = &[
    "predicted_time_min",
    "predicted_time",
    "predictedTime",
    "predictedTimeMin",
];
pub const RISK_KEYS: &[&str] = &["risk"];
pub const CONGESTION_KEYS: &[&str] = &["congestionLevel", "congestion_level"];
pub const RISK_SCORE_KEYS: &[&str] = &["riskScore", "risk_score"];

const UNKNOWN_LABEL: &str = "Unknown";

/// Returns the first candidate value that is a JSON number.
pub fn number_field(record: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find_map(Value::as_f64)
}

/// Like [`number_field`], defaulting to 0.
pub fn resolve_number(record: &Map<String, Value>, keys: &[&str]) -> f64 {
    number_field(record, keys).unwrap_or(0.0)
}

/// Returns the first candidate that coerces to a non-empty string.
pub fn string_field(record: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .filter_map(coerce_string)
        .find(|s| !s.is_empty())
}

/// Like [`string_field`], defaulting to the empty string.
pub fn resolve_string(record: &Map<String, Value>, keys: &[&str]) -> String {
    string_field(record, keys).unwrap_or_default()
}

/// Returns the first candidate that is an integral JSON number.
pub fn integer_field(record: &Map<String, Value>, keys: &[&str]) -> Option<i64> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find_map(as_integer)
}

fn as_integer(value: &Value) -> Option<i64> {
    if let Some(i) = value.as_i64() {
        return Some(i);
    }
    let f = value.as_f64()?;
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// Plain string coercion. `null` has no string form.
fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(match n.as_i64() {
            Some(i) => i.to_string(),
            None => n
                .as_f64()
                .map(format_number)
                .unwrap_or_else(|| n.to_string()),
        }),
        other => Some(other.to_string()),
    }
}

impl RouteInput {
    /// Resolves every logical field from a raw route record. Non-object values
    /// produce an all-`None` record.
    pub fn from_value(value: &Value) -> Self {
        let Some(record) = value.as_object() else {
            return Self::default();
        };

        Self {
            rank: integer_field(record, RANK_KEYS),
            name: string_field(record, NAME_KEYS),
            distance_km: number_field(record, DISTANCE_KEYS),
            base_time_min: number_field(record, BASE_TIME_KEYS),
            predicted_delay_min: number_field(record, DELAY_KEYS),
            predicted_time_min: number_field(record, TOTAL_TIME_KEYS),
            risk: string_field(record, RISK_KEYS),
            congestion_level: string_field(record, CONGESTION_KEYS),
            risk_score: number_field(record, RISK_SCORE_KEYS),
        }
    }

    /// Applies the defaulting rules for the route at `index` in its run.
    pub fn resolve(&self, index: usize) -> ResolvedRoute {
        let position = index as i64 + 1;
        let base = self.base_time_min.unwrap_or(0.0);
        let delay = self.predicted_delay_min.unwrap_or(0.0);

        ResolvedRoute {
            rank: self.rank.unwrap_or(position),
            name: self
                .name
                .clone()
                .unwrap_or_else(|| format!("Route {position}")),
            distance_km: self.distance_km.unwrap_or(0.0),
            base_time_min: base,
            predicted_delay_min: delay,
            predicted_time_min: self.predicted_time_min.unwrap_or(base + delay),
            risk: self
                .risk
                .clone()
                .unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
            congestion_level: self
                .congestion_level
                .clone()
                .unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
            risk_score: self.risk_score.unwrap_or(0.0),
        }
    }
}

impl Prediction {
    /// Normalizes a decoded prediction response. A missing or non-array
    /// `routes` field yields no routes.
    pub fn from_value(value: &Value) -> Self {
        let routes = value
            .get("routes")
            .and_then(Value::as_array)
            .map(|routes| routes.iter().map(RouteInput::from_value).collect())
            .unwrap_or_default();

        let context = match value.as_object() {
            Some(record) => PredictionContext {
                confidence: string_field(record, &["confidence"]),
                congestion_level: string_field(record, CONGESTION_KEYS),
                risk_score: number_field(record, RISK_SCORE_KEYS),
                peak_hour_flag: record.get("peakHourFlag").and_then(Value::as_bool),
                weather_impact_note: string_field(record, &["weatherImpactNote"]),
            },
            None => PredictionContext::default(),
        };

        Self { routes, context }
    }
}
