/// Application configuration from environment variables and config.toml
pub mod app;

/// Schema creation from entity definitions (used by tests and local setup)
pub mod database;
