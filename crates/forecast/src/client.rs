use chrono::{DateTime, Utc};
use foundation::math::GeoPoint;
use futures_util::future::BoxFuture;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::reading::PredictionReading;

pub const DEFAULT_PREDICTION_URL: &str = "http://127.0.0.1:5000/predict";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionRequest {
    pub lat: f64,
    pub lon: f64,
    /// Serialized as RFC 3339 in UTC.
    pub date: DateTime<Utc>,
}

impl PredictionRequest {
    pub fn new(point: GeoPoint, date: DateTime<Utc>) -> Self {
        Self {
            lat: point.lat_deg,
            lon: point.lon_deg,
            date,
        }
    }
}

#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    #[error("{status}: {message}")]
    Rejected {
        status: reqwest::StatusCode,
        message: String,
    },
    #[error("invalid prediction response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl PredictionError {
    /// Short text for the prediction panel.
    pub fn inline_message(&self) -> String {
        match self {
            PredictionError::Rejected { status, message } => {
                format!("Error {}: {message}", status.as_u16())
            }
            other => format!("Error: {other}"),
        }
    }
}

pub trait PredictionBackend: Send + Sync {
    fn predict(&self, request: PredictionRequest) -> BoxFuture<'_, Result<PredictionReading, PredictionError>>;
}

/// JSON-over-HTTP prediction service.
pub struct HttpPredictionClient {
    url: String,
    client: reqwest::Client,
}

impl HttpPredictionClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(url, reqwest::Client::new())
    }

    pub fn with_client(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }
}

/// The message of a rejected request: the body's `error` field when there
/// is one, otherwise the body as received.
fn rejection_message(text: &str) -> String {
    match serde_json::from_str::<Value>(text) {
        Ok(v) => match v.get("error").and_then(|e| e.as_str()) {
            Some(e) => e.to_string(),
            None => v.to_string(),
        },
        Err(_) => text.trim().to_string(),
    }
}

impl PredictionBackend for HttpPredictionClient {
    fn predict(&self, request: PredictionRequest) -> BoxFuture<'_, Result<PredictionReading, PredictionError>> {
        Box::pin(async move {
            let resp = self.client.post(&self.url).json(&request).send().await?;
            let status = resp.status();
            let text = resp.text().await?;

            if !status.is_success() {
                return Err(PredictionError::Rejected {
                    status,
                    message: rejection_message(&text),
                });
            }

            let body: Value = serde_json::from_str(&text)?;
            let reading = PredictionReading::from_response(&body);
            if let Some(warning) = body.get("warning").and_then(|w| w.as_str()) {
                tracing::warn!(warning, "prediction backend warning");
            }
            Ok(reading)
        })
    }
}
