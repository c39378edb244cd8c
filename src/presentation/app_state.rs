// Application state shared by the operator command loop
use crate::application::log_archive_service::LogArchiveService;
use crate::application::poller::Poller;
use crate::application::presenter::Presenter;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub poller: Poller,
    pub log_archive: LogArchiveService,
    pub presenter: Arc<dyn Presenter>,
}
