//! HTTP access to the prediction backend.
//!
//! [`HttpClient`] is the transport seam; [`BasicClient`] is the reqwest-backed
//! implementation. The [`api`] module builds the backend calls on top of it.

pub mod api;
mod basic;

pub use api::{IncidentReport, PredictionRequest, Weather, fetch_prediction, report_incident};
pub use basic::BasicClient;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Request, Response};

/// Executes prepared requests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}

/// GETs `url` and returns the body. Non-2xx statuses are errors.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?.error_for_status()?;
    Ok(resp.bytes().await?.to_vec())
}
