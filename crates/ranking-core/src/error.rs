//! Error types for ranking-core

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Dataset source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Unrecognized dataset shape: {0}")]
    InvalidPayload(String),
}
