// Application layer - Use cases and ports
pub mod dashboard_api;
pub mod log_archive_service;
pub mod poller;
pub mod presenter;

#[cfg(test)]
pub mod test_support;
