use thiserror::Error;

/// Errors produced while manipulating or exporting voxel data.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Grid shape mismatch: {left:?} vs {right:?}")]
    ShapeMismatch { left: [usize; 3], right: [usize; 3] },

    #[error("Mesh has {0} vertices, more than u32 face indices can address")]
    MeshTooLarge(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
