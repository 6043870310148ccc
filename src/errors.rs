//! Unified error types and result handling for the Planmoni client core.

use thiserror::Error;

/// All errors the client core can produce.
///
/// Load failures surface to callers as human-readable strings stored on the
/// affected collection; mutation failures are logged at the store boundary and
/// never propagate past it.
#[derive(Debug, Error)]
pub enum Error {
    /// The backend is not configured (missing environment variables) or the
    /// configuration file is unreadable. Writes in mock mode return this.
    #[error("Configuration error: {message}")]
    Config {
        /// What was missing or malformed.
        message: String,
    },

    /// A backend query or mutation failed.
    #[error("Backend error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// A record referenced by id does not exist for the current user.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind, e.g. `"event"`.
        entity: &'static str,
        /// The id that was looked up.
        id: String,
    },

    /// The realtime change feed misbehaved (closed, or lagged beyond recovery).
    #[error("Change feed error: {message}")]
    Feed {
        /// What went wrong with the feed.
        message: String,
    },

    /// A change payload or cached record failed to (de)serialize during merge.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Reading the configuration file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An environment variable was unset or not valid unicode.
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

/// Convenience `Result` type using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
