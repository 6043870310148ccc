//! Application configuration loading.
//!
//! The backend URL and anonymous API key come from `PLANMONI_BACKEND_URL` and
//! `PLANMONI_ANON_KEY`, with an optional `config.toml` as a fallback source.
//! Missing configuration is not fatal: the app degrades to a mock backend that
//! returns empty reads and configuration errors on writes, rather than
//! crashing at startup.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::warn;

/// Environment variable naming the backend URL.
pub const BACKEND_URL_VAR: &str = "PLANMONI_BACKEND_URL";
/// Environment variable naming the anonymous API key.
pub const ANON_KEY_VAR: &str = "PLANMONI_ANON_KEY";

/// Resolved application configuration.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Backend connection URL, if configured
    pub backend_url: Option<String>,
    /// Anonymous API key presented to the hosted backend, if configured
    pub anon_key: Option<String>,
}

/// Shape of the optional config.toml file.
#[derive(Debug, Deserialize)]
struct FileConfig {
    backend: Option<BackendSection>,
}

#[derive(Debug, Deserialize)]
struct BackendSection {
    url: Option<String>,
    anon_key: Option<String>,
}

impl AppConfig {
    /// Reads configuration from the environment only.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            backend_url: std::env::var(BACKEND_URL_VAR).ok().filter(|v| !v.is_empty()),
            anon_key: std::env::var(ANON_KEY_VAR).ok().filter(|v| !v.is_empty()),
        }
    }

    /// Parses configuration from a TOML file.
    ///
    /// # Errors
    /// Returns `Error::Config` if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
            message: format!("Failed to read config file: {e}"),
        })?;

        let parsed: FileConfig = toml::from_str(&contents).map_err(|e| Error::Config {
            message: format!("Failed to parse config.toml: {e}"),
        })?;

        let backend = parsed.backend;
        Ok(Self {
            backend_url: backend.as_ref().and_then(|b| b.url.clone()),
            anon_key: backend.and_then(|b| b.anon_key),
        })
    }

    /// Loads configuration: environment first, `config.toml` filling any gaps.
    ///
    /// Never fails; an unreadable config file is logged and ignored so startup
    /// can proceed in mock mode.
    #[must_use]
    pub fn load() -> Self {
        let mut config = Self::from_env();

        if (config.backend_url.is_none() || config.anon_key.is_none())
            && Path::new("config.toml").exists()
        {
            match Self::from_file("config.toml") {
                Ok(file) => {
                    config.backend_url = config.backend_url.or(file.backend_url);
                    config.anon_key = config.anon_key.or(file.anon_key);
                }
                Err(e) => warn!(error = %e, "ignoring unreadable config.toml"),
            }
        }

        if !config.is_configured() {
            warn!(
                "backend not configured ({BACKEND_URL_VAR} / {ANON_KEY_VAR} missing); \
                 running in mock mode"
            );
        }

        config
    }

    /// True when both the URL and the anonymous key are present.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.backend_url.is_some() && self.anon_key.is_some()
    }
}
