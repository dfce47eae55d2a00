use crate::domain::TaskId;
use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of the durable store backing a collection
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode or decode {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Errors surfaced by the tracking engine
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    #[error("no statistics archived for {0}")]
    StatsNotFound(NaiveDate),

    #[error("invalid task: {0}")]
    Validation(String),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

pub type Result<T, E = TrackerError> = std::result::Result<T, E>;
