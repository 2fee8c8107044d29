use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the task engine and its stores
#[derive(Debug, Error)]
pub enum TaskError {
    /// Bad user input (empty title, non-positive estimate, unknown status...)
    #[error("{0}")]
    Validation(String),

    /// Task index outside the addressed day
    #[error("invalid task index {index} (the day has {len} task(s))")]
    Index { index: usize, len: usize },

    /// Store file exists but could not be read or written
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Store file exists but its content is not a valid bucket mapping
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl TaskError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
