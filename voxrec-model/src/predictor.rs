//! The inference seam between the solver and a concrete network backend.

use crate::ModelError;
use ndarray::{Array5, ArrayView5};

/// A network mapping an input batch to a voxel probability volume.
///
/// Input layout is `(views, batch, channels, height, width)`; output layout is
/// `(batch, n_vox, classes, n_vox, n_vox)` with class 1 meaning occupied.
pub trait VoxelPredictor {
    fn predict(&self, input: ArrayView5<'_, f32>) -> Result<Array5<f32>, ModelError>;

    /// Name used in logs.
    fn name(&self) -> &str;
}
