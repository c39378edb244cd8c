// In-memory fakes for the application ports
use crate::application::dashboard_api::{
    ApiError, DashboardApi, LogListResponse, StateResponse,
};
use crate::application::presenter::{Downloader, Presenter};
use crate::domain::activity::LogLevel;
use crate::domain::telemetry::{DataPayload, TelemetrySample};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::Notify;

#[derive(Debug, Clone)]
pub enum Reply {
    Json(serde_json::Value),
    Fail,
}

/// Scripted backend. Replies are consumed in order; the last one repeats.
#[derive(Default)]
pub struct FakeApi {
    state_replies: Mutex<VecDeque<Reply>>,
    data_replies: Mutex<VecDeque<Reply>>,
    log_replies: Mutex<VecDeque<Reply>>,
    pub state_calls: AtomicUsize,
    pub data_calls: AtomicUsize,
    gate: Option<Notify>,
}

impl FakeApi {
    pub fn with_state(self, reply: Reply) -> Self {
        self.state_replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn with_data(self, reply: Reply) -> Self {
        self.data_replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn with_logs(self, reply: Reply) -> Self {
        self.log_replies.lock().unwrap().push_back(reply);
        self
    }

    /// Hold every data request until `release` is called.
    pub fn gated(mut self) -> Self {
        self.gate = Some(Notify::new());
        self
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    fn next<T: DeserializeOwned>(
        replies: &Mutex<VecDeque<Reply>>,
        endpoint: &str,
    ) -> Result<T, ApiError> {
        let reply = {
            let mut replies = replies.lock().unwrap();
            if replies.len() > 1 {
                replies.pop_front()
            } else {
                replies.front().cloned()
            }
        };

        match reply {
            Some(Reply::Json(value)) => {
                serde_json::from_value(value).map_err(|source| ApiError::Decode {
                    endpoint: endpoint.to_string(),
                    source,
                })
            }
            Some(Reply::Fail) | None => Err(ApiError::Status {
                endpoint: endpoint.to_string(),
                status: 503,
            }),
        }
    }
}

#[async_trait]
impl DashboardApi for FakeApi {
    async fn fetch_state(&self) -> Result<StateResponse, ApiError> {
        self.state_calls.fetch_add(1, Ordering::SeqCst);
        Self::next(&self.state_replies, "/api/state")
    }

    async fn fetch_data(&self) -> Result<DataPayload, ApiError> {
        self.data_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        Self::next(&self.data_replies, "/api/data")
    }

    async fn list_logs(&self) -> Result<LogListResponse, ApiError> {
        Self::next(&self.log_replies, "/api/logs")
    }

    fn latest_log_url(&self) -> String {
        "http://backend/api/logs/latest".to_string()
    }

    fn log_url(&self, filename: &str) -> String {
        format!("http://backend/api/logs/{}", urlencoding::encode(filename))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PresenterEvent {
    Render(TelemetrySample),
    Indicator(bool, String),
    Log(String, LogLevel),
}

#[derive(Default)]
pub struct RecordingPresenter {
    events: Mutex<Vec<PresenterEvent>>,
}

impl RecordingPresenter {
    pub fn event_count(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn renders(&self) -> Vec<TelemetrySample> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| match event {
                PresenterEvent::Render(sample) => Some(sample.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn indicators(&self) -> Vec<(bool, String)> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| match event {
                PresenterEvent::Indicator(online, label) => Some((*online, label.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn logs(&self) -> Vec<(String, LogLevel)> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| match event {
                PresenterEvent::Log(message, level) => Some((message.clone(), *level)),
                _ => None,
            })
            .collect()
    }
}

impl Presenter for RecordingPresenter {
    fn render(&self, sample: &TelemetrySample) {
        self.events
            .lock()
            .unwrap()
            .push(PresenterEvent::Render(sample.clone()));
    }

    fn set_connection_indicator(&self, online: bool, label: &str) {
        self.events
            .lock()
            .unwrap()
            .push(PresenterEvent::Indicator(online, label.to_string()));
    }

    fn log(&self, message: &str, level: LogLevel) {
        self.events
            .lock()
            .unwrap()
            .push(PresenterEvent::Log(message.to_string(), level));
    }
}

#[derive(Default)]
pub struct RecordingDownloader {
    urls: Mutex<Vec<String>>,
}

impl RecordingDownloader {
    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

impl Downloader for RecordingDownloader {
    fn navigate_to(&self, url: &str) {
        self.urls.lock().unwrap().push(url.to_string());
    }
}
