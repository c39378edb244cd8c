// Port for the rectifier backend HTTP API
use crate::domain::telemetry::DataPayload;
use async_trait::async_trait;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StateResponse {
    #[serde(default)]
    pub state: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogListResponse {
    #[serde(default)]
    pub files: Option<Vec<String>>,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },
    #[error("malformed response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// `GET /api/state`
    async fn fetch_state(&self) -> Result<StateResponse, ApiError>;

    /// `GET /api/data`
    async fn fetch_data(&self) -> Result<DataPayload, ApiError>;

    /// `GET /api/logs`
    async fn list_logs(&self) -> Result<LogListResponse, ApiError>;

    /// URL the latest CSV log is downloaded from
    fn latest_log_url(&self) -> String;

    /// URL a named CSV log is downloaded from
    fn log_url(&self, filename: &str) -> String;
}
