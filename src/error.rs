//! Error types for a daily stats sync run
//!
//! Nothing is retried. Every variant surfaces to `main`, which maps it to a
//! non-zero exit code.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Garmin login failed: {0}")]
    Auth(String),

    #[error("Garmin request failed: {0}")]
    Fetch(String),

    #[error("Missing data in Garmin response: {path}")]
    MissingData { path: String },

    #[error("Notion query failed: {0}")]
    RemoteQuery(String),

    #[error("Notion write failed: {0}")]
    RemoteWrite(String),
}

impl SyncError {
    pub fn missing(path: impl Into<String>) -> Self {
        SyncError::MissingData { path: path.into() }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            SyncError::Config(_) => 2,
            SyncError::Auth(_) => 3,
            SyncError::Fetch(_)
            | SyncError::MissingData { .. }
            | SyncError::RemoteQuery(_)
            | SyncError::RemoteWrite(_) => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
