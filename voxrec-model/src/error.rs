use std::path::PathBuf;
use thiserror::Error;

/// Errors from loading, fetching or running a reconstruction network.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Unknown network variant '{0}' (expected one of GRUNet, LSTMNet, ResidualGRUNet)")]
    UnknownVariant(String),

    #[error("Failed to download {url}: {reason}")]
    Download { url: String, reason: String },

    #[error("Weights file {0} is missing after download")]
    MissingWeights(PathBuf),

    #[error("Failed to load model from {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: ort::Error,
    },

    #[error("Inference error: {0}")]
    Inference(#[from] ort::Error),

    #[error("Invalid network input: {0}")]
    InvalidInput(String),

    #[error("Invalid network output: {0}")]
    InvalidOutput(String),

    #[error("Tensor shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
