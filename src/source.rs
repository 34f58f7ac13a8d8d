//! Upstream alert source: the PAGASA CAP alert feed.
//!
//! One GET per cycle with a hard timeout.  Network and HTTP failures are
//! kept apart from payloads that arrive but do not have the expected
//! shape, so the caller can report them differently.  Nothing is retried
//! here.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::alert::RawAlert;

pub const DEFAULT_API_URL: &str = "https://panahon.gov.ph/api/v1/cap-alerts";
const USER_AGENT: &str = "BataanWeather-App/1.0";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),
    #[error("upstream returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid API response structure: {0}")]
    InvalidPayload(String),
}

impl FetchError {
    /// HTTP status, when the upstream answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// ─────────────────────────── Payload types ───────────────────────────────

#[derive(Deserialize)]
struct Envelope {
    success: Option<bool>,
    data: Option<EnvelopeData>,
}

#[derive(Deserialize)]
struct EnvelopeData {
    #[serde(default)]
    alert_count: Option<u64>,
    alert_data: Option<serde_json::Value>,
}

/// Validate the response envelope and decode the alert list.
pub fn parse_payload(body: &str) -> Result<Vec<RawAlert>, FetchError> {
    let envelope: Envelope = serde_json::from_str(body)
        .map_err(|e| FetchError::InvalidPayload(format!("not a JSON object: {e}")))?;

    if envelope.success != Some(true) {
        return Err(FetchError::InvalidPayload("`success` is not true".into()));
    }
    let data = envelope
        .data
        .ok_or_else(|| FetchError::InvalidPayload("missing `data`".into()))?;
    let Some(raw @ serde_json::Value::Array(_)) = data.alert_data else {
        return Err(FetchError::InvalidPayload(
            "`data.alert_data` is not an array".into(),
        ));
    };

    let alerts: Vec<RawAlert> = serde_json::from_value(raw)
        .map_err(|e| FetchError::InvalidPayload(format!("malformed alert: {e}")))?;

    if let Some(count) = data.alert_count {
        if count as usize != alerts.len() {
            debug!("alert_count={count} but {} alerts received", alerts.len());
        }
    }
    Ok(alerts)
}

// ─────────────────────────── AlertSource ─────────────────────────────────

/// HTTP client for the alert feed.  Constructed once, reused every cycle.
pub struct AlertSource {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl AlertSource {
    /// Build from environment variables.
    ///
    /// | Env var              | Default                                      |
    /// |----------------------|----------------------------------------------|
    /// | `ALERTS_API_URL`     | `https://panahon.gov.ph/api/v1/cap-alerts`   |
    /// | `FETCH_TIMEOUT_SECS` | `30`                                         |
    pub fn from_env() -> Self {
        let endpoint =
            std::env::var("ALERTS_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());
        let timeout_secs: u64 = std::env::var("FETCH_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|v| *v > 0)
            .unwrap_or(30);

        Self::new(endpoint, Duration::from_secs(timeout_secs))
    }

    pub fn new(endpoint: String, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            timeout,
        }
    }

    /// Fetch the raw response body.  Non-2xx is an error.
    pub async fn fetch_body(&self) -> Result<String, FetchError> {
        info!("Fetching alerts from {}", self.endpoint);

        let response = self
            .client
            .get(&self.endpoint)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header(reqwest::header::ACCEPT, "application/json")
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        info!("API response status: {status}");
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response.text().await.map_err(|e| self.classify(e))
    }

    /// Fetch and decode the current alert list.
    pub async fn fetch(&self) -> Result<Vec<RawAlert>, FetchError> {
        let body = self.fetch_body().await?;
        parse_payload(&body)
    }

    fn classify(&self, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Network(e)
        }
    }
}

impl std::fmt::Display for AlertSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "AlertSource(endpoint={}, timeout={}s)",
            self.endpoint,
            self.timeout.as_secs(),
        )
    }
}
