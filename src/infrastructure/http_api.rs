// reqwest implementation of the rectifier backend API
use crate::application::dashboard_api::{ApiError, DashboardApi, LogListResponse, StateResponse};
use crate::domain::telemetry::DataPayload;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const STATE_PATH: &str = "/api/state";
pub const DATA_PATH: &str = "/api/data";
pub const LOGS_PATH: &str = "/api/logs";

#[derive(Debug, Clone)]
pub struct HttpDashboardApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpDashboardApi {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> anyhow::Result<Self> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: build_client(timeout)?,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                endpoint: path.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                endpoint: path.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|source| ApiError::Transport {
            endpoint: path.to_string(),
            source,
        })?;

        serde_json::from_slice(&body).map_err(|source| ApiError::Decode {
            endpoint: path.to_string(),
            source,
        })
    }
}

/// Client that asks every intermediary to bypass its cache.
pub fn build_client(timeout: Option<Duration>) -> anyhow::Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-cache, no-store"),
    );
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));

    let mut builder = reqwest::Client::builder().default_headers(headers);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }

    builder.build().context("Failed to build HTTP client")
}

#[async_trait]
impl DashboardApi for HttpDashboardApi {
    async fn fetch_state(&self) -> Result<StateResponse, ApiError> {
        self.get_json(STATE_PATH).await
    }

    async fn fetch_data(&self) -> Result<DataPayload, ApiError> {
        self.get_json(DATA_PATH).await
    }

    async fn list_logs(&self) -> Result<LogListResponse, ApiError> {
        self.get_json(LOGS_PATH).await
    }

    fn latest_log_url(&self) -> String {
        self.url(&format!("{}/latest", LOGS_PATH))
    }

    fn log_url(&self, filename: &str) -> String {
        self.url(&format!("{}/{}", LOGS_PATH, urlencoding::encode(filename)))
    }
}
