//! Voxrec Capture - input views for reconstruction
//!
//! This crate turns images on disk into the batch tensor the reconstruction
//! network consumes:
//!
//! - [`DirectorySource`] enumerates and decodes the files of one directory
//! - [`preprocess`] resizes, flattens transparency and converts to RGB
//! - [`ImageBatch`] stacks normalized views into a `(views, 1, 3, H, W)` tensor
//!
//! ## Example
//!
//! ```ignore
//! use voxrec_capture::{DirectorySource, ImageBatch, PreprocessConfig};
//!
//! let mut source = DirectorySource::open("input/chair1", PreprocessConfig::default())?
//!     .with_limit(3);
//! let batch = ImageBatch::collect(&mut source)?;
//! ```

mod batch;
mod directory;
mod preprocess;
mod source;

pub use batch::ImageBatch;
pub use directory::DirectorySource;
pub use preprocess::{DEFAULT_IMAGE_SIZE, PreprocessConfig, preprocess, to_chw};
pub use source::{CaptureError, ViewImage, ViewSource};
