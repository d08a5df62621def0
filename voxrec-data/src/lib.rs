//! Voxrec Data Crate
//!
//! CPU-side voxel grids produced by the reconstruction network, plus the
//! conversions used to hand them to other tools: surface meshing, OBJ export
//! and a plain-text probability dump.

mod error;
pub mod export;
pub mod mesh;
pub mod voxel;

pub use error::DataError;
pub use export::{voxel_to_obj, write_obj, write_obj_to, write_text, write_text_to};
pub use mesh::{MeshOptions, VoxelMesh};
pub use voxel::{DEFAULT_VOXEL_THRESHOLD, OccupancyGrid, ProbabilityGrid};
