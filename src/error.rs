use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the dashboard library.
///
/// Malformed fields inside a record never produce one of these; they degrade
/// to sentinel values instead. Only a structurally unusable input or a failed
/// read/write reaches the caller.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid field layout in {path}: {reason}")]
    Layout { path: PathBuf, reason: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl DashboardError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
