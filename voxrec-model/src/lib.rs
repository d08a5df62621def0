//! Voxrec Model Crate
//!
//! Everything between a preprocessed [`ImageBatch`](voxrec_capture::ImageBatch)
//! and a [`ProbabilityGrid`](voxrec_data::ProbabilityGrid):
//!
//! - [`variant`]: the named network variants and where their weights live
//! - [`weights`]: fetching pretrained weights when they are missing locally
//! - [`predictor`]: the inference seam, with an ONNX Runtime backend in [`onnx`]
//! - [`solver`]: single-shot inference wrapper and output decoding

mod error;
pub mod onnx;
pub mod predictor;
pub mod solver;
pub mod variant;
pub mod weights;

pub use error::ModelError;
pub use onnx::OnnxNetwork;
pub use predictor::VoxelPredictor;
pub use solver::{OCCUPIED_CHANNEL, Prediction, Solver};
pub use variant::NetworkVariant;
pub use weights::{CurlFetcher, Fetcher, WeightsLocation, ensure_weights};
