// Poller - Periodic status and telemetry polling with staleness tracking
use crate::application::dashboard_api::DashboardApi;
use crate::application::presenter::Presenter;
use crate::domain::activity::LogLevel;
use crate::domain::connection::ConnectionState;
use crate::domain::telemetry::DataReading;
use serde::Deserialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Decides whether a sample timestamp counts as new data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatermarkPolicy {
    /// Any timestamp different from the watermark, older ones included.
    #[default]
    AnyChange,
    /// Only timestamps strictly greater than the watermark.
    Increasing,
}

impl WatermarkPolicy {
    fn accepts(self, timestamp: f64, watermark: f64) -> bool {
        match self {
            WatermarkPolicy::AnyChange => timestamp != watermark,
            WatermarkPolicy::Increasing => timestamp > watermark,
        }
    }
}

#[derive(Debug, Default)]
pub struct PollerState {
    last_timestamp: Mutex<f64>,
    polling_in_flight: AtomicBool,
}

impl PollerState {
    pub fn last_timestamp(&self) -> f64 {
        *self.last_timestamp.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_polling_in_flight(&self) -> bool {
        self.polling_in_flight.load(Ordering::Acquire)
    }

    fn try_begin_poll(&self) -> Option<InFlightGuard<'_>> {
        self.polling_in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard(&self.polling_in_flight))
    }
}

/// Clears the in-flight flag on every exit path of a data poll.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TelemetryOutcome {
    /// A previous data poll was still running.
    Skipped,
    Waiting,
    Invalid,
    /// Backend alive, sample already seen.
    Unchanged,
    Rendered,
    Failed,
}

#[derive(Clone)]
pub struct Poller {
    api: Arc<dyn DashboardApi>,
    presenter: Arc<dyn Presenter>,
    state: Arc<PollerState>,
    interval: Duration,
    policy: WatermarkPolicy,
    timer: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl Poller {
    pub fn new(
        api: Arc<dyn DashboardApi>,
        presenter: Arc<dyn Presenter>,
        interval: Duration,
        policy: WatermarkPolicy,
    ) -> Self {
        Self {
            api,
            presenter,
            state: Arc::new(PollerState::default()),
            interval,
            policy,
            timer: Arc::new(Mutex::new(None)),
        }
    }

    pub fn state(&self) -> &PollerState {
        &self.state
    }

    /// Query `/api/state` and update the connection indicator.
    ///
    /// Failures never escape: an unreachable or misbehaving backend is shown
    /// as `NO SERVER`.
    pub async fn poll_connection_status(&self) -> ConnectionState {
        let connection = match self.api.fetch_state().await {
            Ok(response) => ConnectionState::from_backend_value(response.state.as_ref()),
            Err(e) => {
                tracing::debug!("State polling failed: {}", e);
                ConnectionState::NoServer
            }
        };

        self.show(&connection);
        connection
    }

    /// Query `/api/data` and render the sample if it is new.
    pub async fn poll_telemetry(&self) -> TelemetryOutcome {
        let Some(_in_flight) = self.state.try_begin_poll() else {
            tracing::debug!("Data poll still in flight, skipping");
            return TelemetryOutcome::Skipped;
        };

        match self.api.fetch_data().await {
            Ok(payload) => self.apply_reading(payload.classify()),
            Err(e) => {
                tracing::warn!("Data polling failed: {}", e);
                self.show(&ConnectionState::Error);
                self.presenter.log("Data polling failed", LogLevel::Err);
                TelemetryOutcome::Failed
            }
        }
    }

    fn apply_reading(&self, reading: DataReading) -> TelemetryOutcome {
        match reading {
            DataReading::Waiting => {
                self.show(&ConnectionState::Waiting);
                TelemetryOutcome::Waiting
            }
            DataReading::Invalid => {
                self.presenter.log("Invalid data received", LogLevel::Err);
                TelemetryOutcome::Invalid
            }
            DataReading::Sample(sample) => {
                {
                    let mut watermark = self
                        .state
                        .last_timestamp
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner);

                    if !self.policy.accepts(sample.timestamp, *watermark) {
                        return TelemetryOutcome::Unchanged;
                    }
                    *watermark = sample.timestamp;
                }

                tracing::debug!("New telemetry sample at {}", sample.timestamp);
                self.presenter.render(&sample);
                self.show(&ConnectionState::Live);
                TelemetryOutcome::Rendered
            }
        }
    }

    fn show(&self, connection: &ConnectionState) {
        self.presenter
            .set_connection_indicator(connection.is_online(), connection.label());
    }

    /// Start the repeating poll timer, replacing any timer already running.
    ///
    /// Every tick fires a status poll and a data poll as independent tasks;
    /// the timer never waits for them.
    pub fn start_polling(&self) {
        let mut timer = self.timer.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = timer.take() {
            previous.abort();
        }

        let poller = self.clone();
        let period = self.interval;
        *timer = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                poller.tick();
            }
        }));

        tracing::info!("Polling every {:?}", period);
    }

    pub fn stop_polling(&self) {
        if let Some(handle) = self
            .timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            handle.abort();
            tracing::info!("Polling stopped");
        }
    }

    pub fn is_polling(&self) -> bool {
        self.timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn tick(&self) {
        let status = self.clone();
        tokio::spawn(async move {
            status.poll_connection_status().await;
        });

        let data = self.clone();
        tokio::spawn(async move {
            data.poll_telemetry().await;
        });
    }
}
