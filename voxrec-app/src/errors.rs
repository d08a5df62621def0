//! Error types for the demo pipeline.

use std::path::PathBuf;
use thiserror::Error;
use voxrec_capture::CaptureError;
use voxrec_data::DataError;
use voxrec_model::ModelError;

/// Errors that can stop a reconstruction run.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Input error: {0}")]
    Capture(#[from] CaptureError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Export error: {0}")]
    Data(#[from] DataError),

    #[error("Failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
