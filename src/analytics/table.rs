//! Flat, ordered key → primitive rows for tabular display and CSV export.

use serde::Serialize;
use serde::ser::SerializeMap;
use std::fmt;

use crate::analytics::template::format_number;
use crate::analytics::types::DerivedRouteAnalytics;

/// Column keys of a [`FlattenedComparisonRow`], in display order.
pub const COMPARISON_COLUMNS: [&str; 15] = [
    "rank",
    "route_id",
    "name",
    "distance_km",
    "base_time_min",
    "predicted_delay_min",
    "predicted_time_min",
    "risk",
    "congestionLevel",
    "riskScore",
    "delay_percentage",
    "time_saved_vs_best_route",
    "efficiency_km_per_min",
    "relative_risk_rank",
    "relative_congestion_rank",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Integer(i64),
    Number(f64),
    Text(String),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Number(n) => f.write_str(&format_number(*n)),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

/// One derived route as ordered `(column, value)` cells. Serializes as a JSON
/// object with keys in [`COMPARISON_COLUMNS`] order.
#[derive(Debug, Clone, PartialEq)]
pub struct FlattenedComparisonRow {
    cells: Vec<(&'static str, CellValue)>,
}

impl FlattenedComparisonRow {
    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.cells.iter().map(|(k, _)| *k)
    }

    pub fn values(&self) -> impl Iterator<Item = &CellValue> {
        self.cells.iter().map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl From<&DerivedRouteAnalytics> for FlattenedComparisonRow {
    fn from(d: &DerivedRouteAnalytics) -> Self {
        let values = [
            CellValue::Integer(d.rank),
            CellValue::Text(d.route_id.clone()),
            CellValue::Text(d.name.clone()),
            CellValue::Number(d.distance_km),
            CellValue::Number(d.base_time_min),
            CellValue::Number(d.predicted_delay_min),
            CellValue::Number(d.predicted_time_min),
            CellValue::Text(d.risk.clone()),
            CellValue::Text(d.congestion_level.clone()),
            CellValue::Number(d.risk_score),
            CellValue::Number(d.delay_percentage),
            CellValue::Number(d.time_saved_vs_best_route),
            CellValue::Number(d.efficiency_km_per_min),
            CellValue::Integer(d.relative_risk_rank as i64),
            CellValue::Integer(d.relative_congestion_rank as i64),
        ];

        Self {
            cells: COMPARISON_COLUMNS.into_iter().zip(values).collect(),
        }
    }
}

impl Serialize for FlattenedComparisonRow {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (key, value) in &self.cells {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Projects each derived route into a flat row, in input order.
pub fn flatten_comparison_table(derived: &[DerivedRouteAnalytics]) -> Vec<FlattenedComparisonRow> {
    derived.iter().map(FlattenedComparisonRow::from).collect()
}
