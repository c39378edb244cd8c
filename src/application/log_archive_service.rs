// Log archive service - Use cases for listing and downloading CSV logs
use crate::application::dashboard_api::DashboardApi;
use crate::application::presenter::{Downloader, Presenter};
use crate::domain::activity::LogLevel;
use std::sync::Arc;

#[derive(Clone)]
pub struct LogArchiveService {
    api: Arc<dyn DashboardApi>,
    presenter: Arc<dyn Presenter>,
    downloader: Arc<dyn Downloader>,
}

impl LogArchiveService {
    pub fn new(
        api: Arc<dyn DashboardApi>,
        presenter: Arc<dyn Presenter>,
        downloader: Arc<dyn Downloader>,
    ) -> Self {
        Self {
            api,
            presenter,
            downloader,
        }
    }

    /// List the CSV logs on the backend into the activity log.
    pub async fn show_log_files(&self) -> Vec<String> {
        self.presenter.log("Fetching CSV files...", LogLevel::Info);

        let files = match self.api.list_logs().await {
            Ok(response) => response.files.unwrap_or_default(),
            Err(e) => {
                tracing::warn!("Error fetching CSV list: {}", e);
                self.presenter.log("Failed to fetch CSV list", LogLevel::Err);
                return Vec::new();
            }
        };

        if files.is_empty() {
            self.presenter.log("No CSV files found", LogLevel::Info);
            return files;
        }

        for file in &files {
            self.presenter.log(&format!("CSV → {}", file), LogLevel::Ok);
        }

        files
    }

    pub fn download_latest_csv(&self) {
        self.presenter.log("Downloading latest CSV...", LogLevel::Info);
        self.downloader.navigate_to(&self.api.latest_log_url());
    }

    pub fn download_log(&self, filename: &str) {
        let filename = filename.trim();
        if filename.is_empty() {
            return;
        }

        self.downloader.navigate_to(&self.api.log_url(filename));
    }
}
