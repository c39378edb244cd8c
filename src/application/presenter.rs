// Ports for rendering and downloads
use crate::domain::activity::LogLevel;
use crate::domain::telemetry::TelemetrySample;

pub trait Presenter: Send + Sync {
    fn render(&self, sample: &TelemetrySample);

    fn set_connection_indicator(&self, online: bool, label: &str);

    fn log(&self, message: &str, level: LogLevel);
}

/// Triggers a file download. There is no completion signal.
pub trait Downloader: Send + Sync {
    fn navigate_to(&self, url: &str);
}
