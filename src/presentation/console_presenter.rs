// Terminal presenter for telemetry, connection state and the activity log
use crate::application::presenter::Presenter;
use crate::domain::activity::LogLevel;
use crate::domain::telemetry::TelemetrySample;
use chrono::{Local, NaiveTime};
use std::io::Write;
use std::sync::{Mutex, PoisonError};

pub struct ConsolePresenter<W: Write + Send> {
    out: Mutex<W>,
    indicator: Mutex<Option<(bool, String)>>,
}

impl ConsolePresenter<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> ConsolePresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
            indicator: Mutex::new(None),
        }
    }

    fn write_line(&self, line: &str) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = writeln!(out, "{}", line).and_then(|_| out.flush()) {
            tracing::warn!("Failed to write to console: {}", e);
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> Presenter for ConsolePresenter<W> {
    fn render(&self, sample: &TelemetrySample) {
        self.write_line(&format_sample(sample));
    }

    fn set_connection_indicator(&self, online: bool, label: &str) {
        {
            let mut current = self.indicator.lock().unwrap_or_else(PoisonError::into_inner);
            if current
                .as_ref()
                .is_some_and(|(was_online, was_label)| *was_online == online && was_label == label)
            {
                return;
            }
            *current = Some((online, label.to_string()));
        }

        tracing::debug!("Connection indicator: {} (online={})", label, online);
        self.write_line(&format_indicator(online, label));
    }

    fn log(&self, message: &str, level: LogLevel) {
        self.write_line(&format_log_line(Local::now().time(), message, level));
    }
}

pub fn format_sample(sample: &TelemetrySample) -> String {
    format!(
        "V {} V | I {} A | P {} | polarity {}",
        fixed_2(sample.actual_voltage),
        fixed_2(sample.actual_current),
        sample
            .power
            .as_ref()
            .map_or_else(|| "--".to_string(), ToString::to_string),
        sample.polarity.as_deref().unwrap_or("--"),
    )
}

fn fixed_2(value: Option<f64>) -> String {
    value.map_or_else(|| "--".to_string(), |v| format!("{:.2}", v))
}

pub fn format_indicator(online: bool, label: &str) -> String {
    let dot = if online { "●" } else { "○" };
    format!("{} {}", dot, label)
}

pub fn format_log_line(time: NaiveTime, message: &str, level: LogLevel) -> String {
    format!("[{}] {} {}", time.format("%H:%M:%S"), level.icon(), message)
}
