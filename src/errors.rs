use thiserror::Error;
use std::io;
use std::path::PathBuf;

/// Custom error types for PancreaScan
#[derive(Error, Debug)]
pub enum PancreaScanError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Scan rejected: {0}")]
    GateRejected(String),

    #[error("CSV output error: {0}")]
    CsvOutput(#[from] csv::Error),

    #[error("Model serialization error: {0}")]
    ModelSerde(#[from] serde_json::Error),

    #[error("Training error: {0}")]
    Training(String),

    #[error("Invalid input path: {0}")]
    InvalidPath(PathBuf),

    #[error("Unexpected error: {0}")]
    Other(String),
}

/// Type alias for Result with our custom error type
pub type Result<T> = std::result::Result<T, PancreaScanError>;
