// Domain layer - Telemetry and connection models
pub mod activity;
pub mod connection;
pub mod telemetry;
