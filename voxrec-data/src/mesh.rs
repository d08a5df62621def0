//! Cube-per-voxel surface meshes.

use crate::{DataError, OccupancyGrid};
use glam::Vec3;

/// Corners of a unit cube, indexed as in [`CUBE_FACES`].
const CUBE_VERTICES: [Vec3; 8] = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(0.0, 0.0, 1.0),
    Vec3::new(0.0, 1.0, 0.0),
    Vec3::new(0.0, 1.0, 1.0),
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(1.0, 0.0, 1.0),
    Vec3::new(1.0, 1.0, 0.0),
    Vec3::new(1.0, 1.0, 1.0),
];

/// Two triangles per cube side, zero-based into [`CUBE_VERTICES`].
const CUBE_FACES: [[u32; 3]; 12] = [
    [0, 1, 2],
    [1, 3, 2],
    [2, 3, 6],
    [3, 7, 6],
    [0, 2, 6],
    [0, 6, 4],
    [0, 5, 1],
    [0, 4, 5],
    [6, 7, 5],
    [6, 5, 4],
    [1, 7, 3],
    [1, 5, 7],
];

/// Options controlling how voxels are turned into cubes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshOptions {
    /// Edge length of one cube in output units.
    pub scale: f32,
    /// Distance between neighbouring cube origins, in cube edges.
    pub spacing: f32,
    /// Only emit voxels with an exposed side.
    pub surface_only: bool,
}

impl MeshOptions {
    /// Emit every occupied voxel, hidden ones included.
    pub fn full() -> Self {
        Self {
            surface_only: false,
            ..Self::default()
        }
    }
}

impl Default for MeshOptions {
    fn default() -> Self {
        Self {
            scale: 0.01,
            spacing: 1.1,
            surface_only: true,
        }
    }
}

/// Triangle soup with zero-based vertex indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VoxelMesh {
    pub vertices: Vec<Vec3>,
    pub faces: Vec<[u32; 3]>,
}

impl VoxelMesh {
    /// Build one slightly separated cube per selected occupied voxel.
    ///
    /// Fails with [`DataError::MeshTooLarge`] once face indices no longer fit
    /// in `u32`.
    #[tracing::instrument(skip_all, fields(occupied = grid.occupied_count()))]
    pub fn from_occupancy(grid: &OccupancyGrid, options: &MeshOptions) -> Result<Self, DataError> {
        let mut mesh = VoxelMesh::default();

        for [i, j, k] in grid.occupied() {
            if options.surface_only && !grid.is_surface(i, j, k) {
                continue;
            }
            let origin = Vec3::new(i as f32, j as f32, k as f32) * options.spacing;
            let base = next_vertex_index(mesh.vertices.len())?;
            mesh.vertices
                .extend(CUBE_VERTICES.iter().map(|&c| (c + origin) * options.scale));
            mesh.faces
                .extend(CUBE_FACES.iter().map(|f| [f[0] + base, f[1] + base, f[2] + base]));
        }

        tracing::debug!(
            "Built voxel mesh: {} vertices, {} faces",
            mesh.vertices.len(),
            mesh.faces.len()
        );
        Ok(mesh)
    }

    /// Number of cubes in the mesh.
    pub fn cube_count(&self) -> usize {
        self.vertices.len() / CUBE_VERTICES.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

/// Index of the first vertex of a cube appended after `len` vertices.
fn next_vertex_index(len: usize) -> Result<u32, DataError> {
    len.checked_add(CUBE_VERTICES.len() - 1)
        .and_then(|last| u32::try_from(last).ok())
        .map(|_| len as u32)
        .ok_or(DataError::MeshTooLarge(len))
}
