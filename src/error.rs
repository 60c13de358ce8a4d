//! Error types for workq.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A required argument was missing or inconsistent with the others.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("the queue is empty")]
    Empty,

    #[error("config error: {0}")]
    Config(String),

    #[error("plan error: {0}")]
    Plan(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
