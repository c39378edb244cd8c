// Main entry point - Dependency injection and polling startup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::application::log_archive_service::LogArchiveService;
use crate::application::poller::Poller;
use crate::application::presenter::Presenter;
use crate::domain::activity::LogLevel;
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::http_api::{build_client, HttpDashboardApi};
use crate::infrastructure::http_downloader::HttpDownloader;
use crate::presentation::app_state::AppState;
use crate::presentation::commands::{run_commands, spawn_stdin_reader};
use crate::presentation::console_presenter::ConsolePresenter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing on stderr so it stays out of the dashboard output
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let config = load_dashboard_config()?;
    tracing::info!("Rectifier dashboard polling {}", config.backend.base_url);

    // Create adapters (infrastructure layer)
    let timeout = config.backend.request_timeout();
    let api = Arc::new(HttpDashboardApi::new(&config.backend.base_url, timeout)?);
    let downloader = Arc::new(HttpDownloader::new(
        build_client(timeout)?,
        config.downloads.dir.clone(),
    ));
    let presenter: Arc<dyn Presenter> = Arc::new(ConsolePresenter::stdout());

    // Create services (application layer)
    let poller = Poller::new(
        api.clone(),
        presenter.clone(),
        config.polling.interval(),
        config.polling.watermark_policy,
    );
    let log_archive = LogArchiveService::new(api, presenter.clone(), downloader);

    let state = AppState {
        poller,
        log_archive,
        presenter,
    };

    state.presenter.log("Dashboard initialized", LogLevel::Info);
    state.poller.start_polling();

    tokio::select! {
        quit = run_commands(&state, spawn_stdin_reader()) => {
            // Input closed; keep polling until interrupted
            if !quit {
                tokio::signal::ctrl_c().await?;
            }
        }
        result = tokio::signal::ctrl_c() => result?,
    }

    state.poller.stop_polling();
    tracing::info!("Dashboard stopped");

    Ok(())
}
