// Presentation layer - Terminal output and operator commands
pub mod app_state;
pub mod commands;
pub mod console_presenter;
