//! Output formatting and export for derived analytics.
//!
//! Supports log-based pretty-printing, JSON serialization, and CSV/JSON export
//! of the flattened comparison table.

use anyhow::{Context, Result, bail};
use chrono::Utc;
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

use crate::analytics::table::{COMPARISON_COLUMNS, FlattenedComparisonRow};
use crate::analytics::types::PlannerSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    /// Picks the format from a path's extension (`.json` or `.csv`, any case).
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);
        match ext.as_deref() {
            Some("json") => Ok(ExportFormat::Json),
            Some("csv") => Ok(ExportFormat::Csv),
            _ => bail!(
                "cannot infer export format from {}; use a .json or .csv extension",
                path.display()
            ),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

/// `prediction-<unix millis>.<ext>` in the current directory.
pub fn default_export_path(format: ExportFormat) -> String {
    format!(
        "prediction-{}.{}",
        Utc::now().timestamp_millis(),
        format.extension()
    )
}

/// Logs a planner summary using Rust's debug pretty-print format.
pub fn print_pretty(summary: &PlannerSummary) {
    debug!("{:#?}", summary);
}

/// Logs any serializable output as pretty-printed JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Logs each line of a bullet list.
pub fn print_bullets(title: &str, bullets: &[String]) {
    for bullet in bullets {
        info!(section = title, "{}", bullet);
    }
}

/// Renders comparison rows as CSV with a header line. An empty table still
/// gets its header.
pub fn render_csv(rows: &[FlattenedComparisonRow]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    write_rows(&mut writer, rows)?;
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

/// Writes comparison rows to a CSV file, replacing any existing file.
pub fn write_csv(path: &str, rows: &[FlattenedComparisonRow]) -> Result<()> {
    debug!(path, rows = rows.len(), "Writing CSV export");

    let file = File::create(path).with_context(|| format!("failed creating {path}"))?;
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
    write_rows(&mut writer, rows)?;
    writer.flush()?;

    Ok(())
}

fn write_rows<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    rows: &[FlattenedComparisonRow],
) -> Result<()> {
    writer.write_record(COMPARISON_COLUMNS)?;
    for row in rows {
        writer.write_record(row.values().map(|v| v.to_string()))?;
    }
    Ok(())
}

/// Writes any serializable output to a pretty-printed JSON file.
pub fn write_json<T: Serialize + ?Sized>(path: &str, value: &T) -> Result<()> {
    debug!(path, "Writing JSON export");
    let body = serde_json::to_string_pretty(value)?;
    std::fs::write(path, body).with_context(|| format!("failed writing {path}"))?;
    Ok(())
}

/// Exports a planner summary: the flattened table for CSV, the whole
/// summary for JSON.
pub fn export_summary(path: &str, summary: &PlannerSummary) -> Result<ExportFormat> {
    let format = ExportFormat::from_path(Path::new(path))?;
    match format {
        ExportFormat::Csv => write_csv(path, &summary.flattened_table)?,
        ExportFormat::Json => write_json(path, summary)?,
    }
    info!(path, format = format.extension(), "Export written");
    Ok(format)
}
