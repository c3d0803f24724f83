//! Backend calls: route prediction and incident reporting.
//!
//! Each call is a single request. Failures surface as errors carrying the
//! backend's `detail` message when it sends one; nothing is retried.

use anyhow::{Context, Result, anyhow, bail};
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

use super::HttpClient;
use crate::analytics::types::Prediction;
use crate::config::ApiConfig;
use crate::parser::parse_prediction;

/// Weather conditions the backend model was trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Weather {
    Clear,
    Fog,
    Rain,
    Snow,
    Extreme,
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Weather::Clear => "Clear",
            Weather::Fog => "Fog",
            Weather::Rain => "Rain",
            Weather::Snow => "Snow",
            Weather::Extreme => "Extreme",
        };
        f.write_str(label)
    }
}

impl FromStr for Weather {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "clear" => Ok(Weather::Clear),
            "fog" => Ok(Weather::Fog),
            "rain" => Ok(Weather::Rain),
            "snow" => Ok(Weather::Snow),
            "extreme" => Ok(Weather::Extreme),
            _ => bail!("unknown weather '{s}' (expected clear, fog, rain, snow or extreme)"),
        }
    }
}

/// Body of `POST /predict-route`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRequest {
    pub source: String,
    pub destination: String,
    /// Day of travel, e.g. `monday`.
    pub travel_day: String,
    /// `HH:MM`, 24-hour.
    pub travel_time: String,
    pub weather: Weather,
}

/// Body of `POST /report-incident`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncidentReport {
    pub location: String,
    #[serde(rename = "type")]
    pub incident_type: String,
    pub severity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Joins `base` and `path` with exactly one slash. `None` when either is blank.
pub fn build_url(base: &str, path: &str) -> Option<String> {
    let base = base.trim();
    let base = base.strip_suffix('/').unwrap_or(base);
    let path = path.trim();
    if base.is_empty() || path.is_empty() {
        return None;
    }
    let sep = if path.starts_with('/') { "" } else { "/" };
    Some(format!("{base}{sep}{path}"))
}

/// Requests route predictions and normalizes the response.
#[tracing::instrument(
    skip(client, api, request),
    fields(source = %request.source, destination = %request.destination, weather = %request.weather)
)]
pub async fn fetch_prediction<C: HttpClient>(
    client: &C,
    api: &ApiConfig,
    request: &PredictionRequest,
) -> Result<Prediction> {
    let url = build_url(&api.base_url, &api.prediction_path).context("API not configured")?;

    let resp = post_json(client, &url, request).await?;
    if !resp.status().is_success() {
        return Err(response_error(resp, "Prediction request failed").await);
    }

    let bytes = resp.bytes().await?;
    debug!(bytes = bytes.len(), "Prediction response received");
    parse_prediction(&bytes).context("backend returned malformed prediction JSON")
}

/// Submits an incident report.
#[tracing::instrument(skip(client, api, report), fields(location = %report.location))]
pub async fn report_incident<C: HttpClient>(
    client: &C,
    api: &ApiConfig,
    report: &IncidentReport,
) -> Result<()> {
    let url = build_url(&api.base_url, &api.incident_path).context("API not configured")?;

    let resp = post_json(client, &url, report).await?;
    if !resp.status().is_success() {
        return Err(response_error(resp, "Incident report failed").await);
    }
    Ok(())
}

async fn post_json<C: HttpClient, T: Serialize + ?Sized>(
    client: &C,
    url: &str,
    body: &T,
) -> Result<reqwest::Response> {
    let mut req = reqwest::Request::new(reqwest::Method::POST, url.parse()?);
    req.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    *req.body_mut() = Some(serde_json::to_vec(body)?.into());

    Ok(client.execute(req).await?)
}

/// Builds the error for a non-2xx response: the backend's `detail` if it sent
/// one, else the status reason, else `fallback`.
async fn response_error(resp: reqwest::Response, fallback: &str) -> anyhow::Error {
    let status = resp.status();
    let detail = resp.json::<Value>().await.ok().and_then(|body| error_detail(&body));
    let message = detail
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| fallback.to_string());

    warn!(status = status.as_u16(), message = %message, "Backend request failed");
    anyhow!("{message} (HTTP {})", status.as_u16())
}

fn error_detail(body: &Value) -> Option<String> {
    match body.get("detail")? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    struct UnreachableClient;

    #[async_trait]
    impl HttpClient for UnreachableClient {
        async fn execute(&self, _req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
            unreachable!("no request should be sent")
        }
    }

    #[test]
    fn test_build_url() {
        assert_eq!(
            build_url("http://localhost:8000", "/predict-route").as_deref(),
            Some("http://localhost:8000/predict-route")
        );
        assert_eq!(
            build_url("http://localhost:8000/", "/predict-route").as_deref(),
            Some("http://localhost:8000/predict-route")
        );
        assert_eq!(
            build_url("http://localhost:8000", "report-incident").as_deref(),
            Some("http://localhost:8000/report-incident")
        );
        assert_eq!(build_url("", "/predict-route"), None);
        assert_eq!(build_url("http://localhost:8000", "  "), None);
    }

    #[test]
    fn test_weather_parsing() {
        assert_eq!("rain".parse::<Weather>().unwrap(), Weather::Rain);
        assert_eq!("Extreme".parse::<Weather>().unwrap(), Weather::Extreme);
        assert!("hail".parse::<Weather>().is_err());
        assert_eq!(Weather::Fog.to_string(), "Fog");
    }

    #[test]
    fn test_prediction_request_body() {
        let request = PredictionRequest {
            source: "MG Road".to_string(),
            destination: "Whitefield".to_string(),
            travel_day: "monday".to_string(),
            travel_time: "18:30".to_string(),
            weather: Weather::Rain,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "source": "MG Road",
                "destination": "Whitefield",
                "travel_day": "monday",
                "travel_time": "18:30",
                "weather": "Rain"
            })
        );
    }

    #[test]
    fn test_incident_report_body() {
        let report = IncidentReport {
            location: "Silk Board".to_string(),
            incident_type: "accident".to_string(),
            severity: "high".to_string(),
            description: None,
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["type"], "accident");
        assert!(value.get("description").is_none());
    }

    #[test]
    fn test_error_detail() {
        assert_eq!(
            error_detail(&json!({"detail": "No routes found"})).as_deref(),
            Some("No routes found")
        );
        assert_eq!(
            error_detail(&json!({"detail": [{"msg": "field required"}]})).as_deref(),
            Some(r#"[{"msg":"field required"}]"#)
        );
        assert_eq!(error_detail(&json!({"detail": ""})), None);
        assert_eq!(error_detail(&json!({"error": "x"})), None);
    }

    #[tokio::test]
    async fn test_fetch_prediction_requires_configured_api() {
        let api = ApiConfig {
            base_url: String::new(),
            ..ApiConfig::default()
        };
        let request = PredictionRequest {
            source: "a".to_string(),
            destination: "b".to_string(),
            travel_day: "monday".to_string(),
            travel_time: "09:00".to_string(),
            weather: Weather::Clear,
        };

        let err = fetch_prediction(&UnreachableClient, &api, &request)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "API not configured");
    }
}
