//! Error types for geotrace-core

use thiserror::Error;

/// Main error type for the geotrace-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Location feed error
    #[error("location feed error: {0}")]
    Feed(String),

    /// Upload/transport error
    #[error("upload error: {0}")]
    Upload(String),
}

/// Result type alias for geotrace-core
pub type Result<T> = std::result::Result<T, Error>;
