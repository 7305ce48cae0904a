//! Initialisation errors
//!
//! Per-frame work is total; only building a game can fail.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, Error>;
