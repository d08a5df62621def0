//! Probability and occupancy voxel grids.
//!
//! Both grids are 3D arrays indexed `(i, j, k)` in the same axis
//! order the network emits them.

use crate::DataError;
use ndarray::{Array3, ArrayView3};

/// Cutoff applied to occupancy probabilities when none is configured.
pub const DEFAULT_VOXEL_THRESHOLD: f32 = 0.4;

/// Per-voxel occupancy probabilities in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityGrid {
    values: Array3<f32>,
}

impl ProbabilityGrid {
    /// Wrap an owned probability array.
    pub fn new(values: Array3<f32>) -> Self {
        Self { values }
    }

    /// Copy a borrowed view into a new grid.
    pub fn from_view(values: ArrayView3<'_, f32>) -> Self {
        Self {
            values: values.to_owned(),
        }
    }

    /// Grid dimensions `[d0, d1, d2]`.
    pub fn dims(&self) -> [usize; 3] {
        let (a, b, c) = self.values.dim();
        [a, b, c]
    }

    pub fn get(&self, i: usize, j: usize, k: usize) -> Option<f32> {
        self.values.get((i, j, k)).copied()
    }

    pub fn values(&self) -> &Array3<f32> {
        &self.values
    }

    /// Mark voxels whose probability is strictly greater than `threshold`.
    pub fn threshold(&self, threshold: f32) -> OccupancyGrid {
        OccupancyGrid::new(self.values.mapv(|p| p > threshold))
    }
}

/// Binary occupancy grid.
#[derive(Debug, Clone, PartialEq)]
pub struct OccupancyGrid {
    cells: Array3<bool>,
}

impl OccupancyGrid {
    pub fn new(cells: Array3<bool>) -> Self {
        Self { cells }
    }

    /// An empty grid with the given dimensions.
    pub fn empty(dims: [usize; 3]) -> Self {
        Self {
            cells: Array3::from_elem((dims[0], dims[1], dims[2]), false),
        }
    }

    pub fn dims(&self) -> [usize; 3] {
        let (a, b, c) = self.cells.dim();
        [a, b, c]
    }

    pub fn is_occupied(&self, i: usize, j: usize, k: usize) -> bool {
        self.cells.get((i, j, k)).copied().unwrap_or(false)
    }

    pub fn set(&mut self, i: usize, j: usize, k: usize, occupied: bool) {
        if let Some(cell) = self.cells.get_mut((i, j, k)) {
            *cell = occupied;
        }
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Iterate over the indices of occupied voxels in row-major order.
    pub fn occupied(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        self.cells
            .indexed_iter()
            .filter(|(_, c)| **c)
            .map(|((i, j, k), _)| [i, j, k])
    }

    /// Whether an occupied voxel has at least one exposed side.
    ///
    /// Voxels on the grid boundary always count as exposed. Interior voxels
    /// are exposed when any of their 26 neighbours is empty.
    pub fn is_surface(&self, i: usize, j: usize, k: usize) -> bool {
        if !self.is_occupied(i, j, k) {
            return false;
        }
        let [d0, d1, d2] = self.dims();
        if i == 0 || j == 0 || k == 0 || i + 1 >= d0 || j + 1 >= d1 || k + 1 >= d2 {
            return true;
        }
        for ni in i - 1..=i + 1 {
            for nj in j - 1..=j + 1 {
                for nk in k - 1..=k + 1 {
                    if !self.cells[(ni, nj, nk)] {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Intersection over union with another grid of the same shape.
    ///
    /// Two empty grids are considered identical and score 1.0.
    pub fn iou(&self, other: &OccupancyGrid) -> Result<f32, DataError> {
        if self.dims() != other.dims() {
            return Err(DataError::ShapeMismatch {
                left: self.dims(),
                right: other.dims(),
            });
        }
        let (intersection, union) = self.cells.iter().zip(other.cells.iter()).fold(
            (0usize, 0usize),
            |(inter, uni), (&a, &b)| (inter + (a && b) as usize, uni + (a || b) as usize),
        );
        if union == 0 {
            return Ok(1.0);
        }
        Ok(intersection as f32 / union as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(n: usize) -> OccupancyGrid {
        OccupancyGrid::new(Array3::from_elem((n, n, n), true))
    }

    #[test]
    fn test_threshold_is_strict() {
        let mut values = Array3::zeros((2, 2, 2));
        values[(0, 0, 0)] = 0.4;
        values[(1, 1, 1)] = 0.41;
        values[(0, 1, 0)] = 0.9;
        let occupancy = ProbabilityGrid::new(values).threshold(DEFAULT_VOXEL_THRESHOLD);

        assert!(!occupancy.is_occupied(0, 0, 0));
        assert!(occupancy.is_occupied(1, 1, 1));
        assert!(occupancy.is_occupied(0, 1, 0));
        assert_eq!(occupancy.occupied_count(), 2);
    }

    #[test]
    fn test_occupied_iteration_order() {
        let mut grid = OccupancyGrid::empty([2, 2, 2]);
        grid.set(1, 0, 1, true);
        grid.set(0, 1, 0, true);
        let cells: Vec<_> = grid.occupied().collect();
        assert_eq!(cells, vec![[0, 1, 0], [1, 0, 1]]);
    }

    #[test]
    fn test_interior_voxel_is_hidden() {
        let grid = solid(3);
        assert!(!grid.is_surface(1, 1, 1));
        assert!(grid.is_surface(0, 1, 1));
        assert!(grid.is_surface(2, 2, 2));
    }

    #[test]
    fn test_interior_voxel_with_empty_diagonal_neighbour_is_surface() {
        let mut grid = solid(3);
        grid.set(0, 0, 0, false);
        assert!(grid.is_surface(1, 1, 1));
    }

    #[test]
    fn test_empty_voxel_is_not_surface() {
        let grid = OccupancyGrid::empty([3, 3, 3]);
        assert!(!grid.is_surface(1, 1, 1));
    }

    #[test]
    fn test_iou() {
        let mut a = OccupancyGrid::empty([2, 2, 2]);
        let mut b = OccupancyGrid::empty([2, 2, 2]);
        a.set(0, 0, 0, true);
        a.set(1, 0, 0, true);
        b.set(1, 0, 0, true);
        b.set(1, 1, 1, true);
        let iou = a.iou(&b).unwrap();
        assert!((iou - 1.0 / 3.0).abs() < 1e-6);

        let empty = OccupancyGrid::empty([2, 2, 2]);
        assert_eq!(empty.iou(&empty).unwrap(), 1.0);
    }

    #[test]
    fn test_iou_shape_mismatch() {
        let a = OccupancyGrid::empty([2, 2, 2]);
        let b = OccupancyGrid::empty([3, 2, 2]);
        assert!(matches!(a.iou(&b), Err(DataError::ShapeMismatch { .. })));
    }
}
