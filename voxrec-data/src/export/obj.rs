//! Wavefront OBJ export.

use crate::{DataError, MeshOptions, OccupancyGrid, VoxelMesh};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Write a mesh as OBJ to any writer. Face indices are emitted 1-based.
pub fn write_obj_to<W: Write>(mut writer: W, mesh: &VoxelMesh) -> Result<(), DataError> {
    writeln!(writer, "g")?;
    writeln!(writer, "# {} vertex", mesh.vertices.len())?;
    for v in &mesh.vertices {
        writeln!(writer, "v {:.6} {:.6} {:.6}", v.x, v.y, v.z)?;
    }
    writeln!(writer, "# {} faces", mesh.faces.len())?;
    for [a, b, c] in &mesh.faces {
        writeln!(writer, "f {} {} {}", a + 1, b + 1, c + 1)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a mesh as OBJ to `path`, replacing any existing file.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn write_obj(path: &Path, mesh: &VoxelMesh) -> Result<(), DataError> {
    let file = File::create(path)?;
    write_obj_to(BufWriter::new(file), mesh)?;
    info!(
        "Wrote OBJ mesh: {} vertices, {} faces",
        mesh.vertices.len(),
        mesh.faces.len()
    );
    Ok(())
}

/// Mesh an occupancy grid and write it as OBJ.
pub fn voxel_to_obj(
    path: &Path,
    grid: &OccupancyGrid,
    options: &MeshOptions,
) -> Result<VoxelMesh, DataError> {
    let mesh = VoxelMesh::from_occupancy(grid, options)?;
    write_obj(path, &mesh)?;
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_obj_layout() {
        let mut grid = OccupancyGrid::empty([2, 2, 2]);
        grid.set(0, 0, 0, true);
        let mesh = VoxelMesh::from_occupancy(&grid, &MeshOptions::default()).unwrap();

        let mut out = Vec::new();
        write_obj_to(&mut out, &mesh).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "g");
        assert_eq!(lines[1], "# 8 vertex");
        assert_eq!(lines[2], "v 0.000000 0.000000 0.000000");
        assert_eq!(lines[3], "v 0.000000 0.000000 0.010000");
        assert_eq!(lines[10], "# 12 faces");
        assert_eq!(lines[11], "f 1 2 3");
        assert_eq!(lines.len(), 1 + 1 + 8 + 1 + 12);
    }

    #[test]
    fn test_empty_mesh_still_has_headers() {
        let mut out = Vec::new();
        write_obj_to(&mut out, &VoxelMesh::default()).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "g\n# 0 vertex\n# 0 faces\n");
    }

    #[test]
    fn test_voxel_to_obj_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prediction.obj");
        let mut grid = OccupancyGrid::empty([3, 3, 3]);
        grid.set(1, 1, 1, true);
        grid.set(2, 1, 1, true);

        let mesh = voxel_to_obj(&path, &grid, &MeshOptions::default()).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(mesh.cube_count(), 2);
        assert_eq!(written.lines().filter(|l| l.starts_with("v ")).count(), 16);
        assert_eq!(written.lines().filter(|l| l.starts_with("f ")).count(), 24);
    }

    #[test]
    fn test_write_obj_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.obj");
        let result = write_obj(&path, &VoxelMesh::default());
        assert!(matches!(result, Err(DataError::Io(_))));
    }
}
