//! Common view source types and traits.

use image::RgbImage;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while collecting input views.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("No usable images found in {0}")]
    NoViews(PathBuf),

    #[error("View {index} has size {actual:?}, expected {expected:?}")]
    SizeMismatch {
        index: usize,
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("Invalid preprocessing config: {0}")]
    InvalidConfig(String),

    #[error("Tensor shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single preprocessed input view.
#[derive(Debug, Clone)]
pub struct ViewImage {
    /// RGB image at network resolution.
    pub image: RgbImage,
    /// File the view was decoded from.
    pub path: PathBuf,
    /// Position of the view in the batch.
    pub index: usize,
}

impl ViewImage {
    pub fn new(image: RgbImage, path: PathBuf, index: usize) -> Self {
        Self { image, path, index }
    }

    /// Get image dimensions (width, height).
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

/// Trait for sources that yield input views one at a time.
pub trait ViewSource {
    /// Get the next view. Returns `None` once the source is exhausted.
    fn next_view(&mut self) -> Result<Option<ViewImage>, CaptureError>;

    /// Upper bound on the number of views left, if known.
    fn len_hint(&self) -> Option<usize>;

    /// Location the views come from, used in logs and errors.
    fn origin(&self) -> &Path;
}
