//! CLI entry point for the route analytics tool.
//!
//! Provides subcommands for analyzing saved or live route predictions,
//! summarizing the recommended route, requesting new predictions from the
//! backend, and reporting incidents.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use route_analytics::analytics::explain::explain_recommendation;
use route_analytics::analytics::status::{high_risk_routes, route_badges};
use route_analytics::analytics::types::{Prediction, PredictionContext};
use route_analytics::analytics::{
    derive_navigation_summary, derive_planner_summary, derive_route_insight_bullets,
    derive_run_summary_bullets,
};
use route_analytics::config::AnalyticsConfig;
use route_analytics::fetch::{
    BasicClient, IncidentReport, PredictionRequest, Weather, fetch_bytes, fetch_prediction,
    report_incident,
};
use route_analytics::output::{
    ExportFormat, default_export_path, export_summary, print_bullets, print_json, print_pretty,
};
use route_analytics::parser::parse_prediction;
use std::ffi::OsStr;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "route_analytics")]
#[command(about = "Derive comparison analytics from traffic route predictions", long_about = None)]
struct Cli {
    /// JSON config overriding templates, thresholds and the API location
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Pretty,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a prediction payload from a file or URL
    Analyze {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        #[arg(short, long, value_enum, default_value = "pretty")]
        format: OutputFormat,

        /// Write the comparison table (.csv) or full summary (.json).
        /// Without a path, writes prediction-<millis>.csv
        #[arg(short, long, value_name = "PATH")]
        export: Option<Option<String>>,
    },
    /// Summarize the recommended route of a prediction payload
    Navigate {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// Day of travel, used for the weekend/weekday note
        #[arg(long)]
        travel_day: Option<String>,
    },
    /// Request a prediction from the backend and analyze it
    Predict {
        #[arg(long)]
        source: String,

        #[arg(long)]
        destination: String,

        /// Day of travel, e.g. monday
        #[arg(long)]
        day: String,

        /// Departure time, HH:MM
        #[arg(long)]
        time: String,

        /// clear, fog, rain, snow or extreme
        #[arg(long, default_value = "clear")]
        weather: Weather,

        /// Write the comparison table (.csv) or full summary (.json).
        /// Without a path, writes prediction-<millis>.csv
        #[arg(short, long, value_name = "PATH")]
        export: Option<Option<String>>,
    },
    /// Report a traffic incident to the backend
    ReportIncident {
        #[arg(long)]
        location: String,

        /// Incident type, e.g. accident or roadwork
        #[arg(long = "type")]
        incident_type: String,

        #[arg(long)]
        severity: String,

        #[arg(long)]
        description: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/route_analytics.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("route_analytics.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AnalyticsConfig::load(path)?,
        None => AnalyticsConfig::default(),
    }
    .with_env_overrides();

    match cli.command {
        Commands::Analyze {
            source,
            format,
            export,
        } => {
            let bytes = fetcher(&source).await?;
            let prediction = parse_prediction(&bytes)?;
            analyze(&prediction, &config, format, export)?;
        }
        Commands::Navigate { source, travel_day } => {
            let bytes = fetcher(&source).await?;
            let prediction = parse_prediction(&bytes)?;
            let nav = derive_navigation_summary(&prediction, &config);
            log_context(&prediction.context);

            match &nav.recommended_route {
                Some(route) => info!(
                    route = %route.name,
                    total_min = route.predicted_time_min,
                    risk = %route.risk,
                    alternatives = nav.alternatives_count,
                    "Recommended route"
                ),
                None => warn!("No route is ranked first"),
            }
            if !nav.time_saved_message.is_empty() {
                info!("{}", nav.time_saved_message);
            }

            let explanation =
                explain_recommendation(&nav, &prediction.context, travel_day.as_deref(), &config);
            if let Some(text) = &explanation.ranking_text {
                info!(section = "why", "{}", text);
            }
            if let Some(text) = &explanation.delay_breakdown {
                info!(section = "delay", "{}", text);
            }
            print_bullets("notes", &explanation.notes);
        }
        Commands::Predict {
            source,
            destination,
            day,
            time,
            weather,
            export,
        } => {
            let request = PredictionRequest {
                source,
                destination,
                travel_day: day,
                travel_time: time,
                weather,
            };
            let client = BasicClient::new()?;
            let prediction = fetch_prediction(&client, &config.api, &request).await?;
            analyze(&prediction, &config, OutputFormat::Pretty, export)?;
        }
        Commands::ReportIncident {
            location,
            incident_type,
            severity,
            description,
        } => {
            let report = IncidentReport {
                location,
                incident_type,
                severity,
                description,
            };
            let client = BasicClient::new()?;
            report_incident(&client, &config.api, &report).await?;
            info!(location = %report.location, "Incident reported");
        }
    }

    Ok(())
}

/// Loads prediction data from a local file path or fetches it over HTTP.
#[tracing::instrument(fields(source = %url))]
async fn fetcher(url: &str) -> Result<Vec<u8>> {
    let bytes = if url.starts_with("http") {
        let client = BasicClient::new()?;
        fetch_bytes(&client, url).await?
    } else {
        std::fs::read(url)?
    };
    Ok(bytes)
}

/// Logs the prediction-level fields the backend reports alongside the routes.
fn log_context(context: &PredictionContext) {
    info!(
        confidence = context.confidence.as_deref().unwrap_or("Unknown"),
        congestion = context.congestion_level.as_deref().unwrap_or("Unknown"),
        risk_score = context.risk_score,
        peak_hour = context.peak_hour_flag.unwrap_or(false),
        "Prediction context"
    );
}

/// Prints the planner summary, flags high-risk routes and writes the
/// optional export.
fn analyze(
    prediction: &Prediction,
    config: &AnalyticsConfig,
    format: OutputFormat,
    export: Option<Option<String>>,
) -> Result<()> {
    let summary = derive_planner_summary(prediction, config);

    if summary.routes.is_empty() {
        warn!("Prediction contains no routes");
    }

    match format {
        OutputFormat::Json => print_json(&summary)?,
        OutputFormat::Pretty => {
            print_pretty(&summary);
            for route in &summary.routes {
                let badges = route_badges(route);
                info!(
                    rank = route.rank,
                    route = %route.name,
                    total_min = route.predicted_time_min,
                    risk = %route.risk,
                    risk_badge = %badges.risk,
                    congestion = %route.congestion_level,
                    congestion_badge = %badges.congestion,
                    "Route"
                );
            }
            print_bullets(
                "routes",
                &derive_route_insight_bullets(&summary.routes, &config.templates),
            );
            print_bullets(
                "run",
                &derive_run_summary_bullets(&summary.run, &config.templates),
            );
            for text in [
                &summary.summaries.why_recommended,
                &summary.summaries.time_saved_vs_alternatives,
                &summary.summaries.congestion_consistency,
            ] {
                if !text.is_empty() {
                    info!(section = "summary", "{}", text);
                }
            }
        }
    }

    log_context(&prediction.context);

    for route in high_risk_routes(&summary.routes, config) {
        warn!(
            route = %route.name,
            risk = %route.risk,
            badge = %route_badges(route).risk,
            risk_score = route.risk_score,
            "High-risk route"
        );
    }

    if let Some(path) = export {
        let path = path.unwrap_or_else(|| default_export_path(ExportFormat::Csv));
        export_summary(&path, &summary)?;
    }

    Ok(())
}
