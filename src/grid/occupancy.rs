//! Dense boolean occupancy storage.

use crate::error::{Result, VoxelError};

/// Integer position `[x, y, z]` of a voxel inside a grid.
pub type VoxelCoord = [usize; 3];

/// Number of cells in a grid of `shape`, or `None` if it overflows `usize`.
#[inline]
pub fn cell_count(shape: [usize; 3]) -> Option<usize> {
    shape[0].checked_mul(shape[1])?.checked_mul(shape[2])
}

/// A dense boolean voxel grid with shape `[nx, ny, nz]`.
///
/// Cells are stored in x-major order: `index = (x * ny + y) * nz + z`, so
/// iterating the storage visits occupied cells sorted by `x`, then `y`, then `z`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoxelGrid {
    shape: [usize; 3],
    data: Vec<bool>,
}

impl VoxelGrid {
    /// Create an empty grid of the given shape.
    pub fn new(shape: [usize; 3]) -> Self {
        Self {
            shape,
            data: vec![false; shape[0] * shape[1] * shape[2]],
        }
    }

    /// Create a fully occupied grid of the given shape.
    pub fn filled(shape: [usize; 3]) -> Self {
        Self {
            shape,
            data: vec![true; shape[0] * shape[1] * shape[2]],
        }
    }

    /// Wrap existing occupancy data laid out in x-major order.
    pub fn from_data(shape: [usize; 3], data: Vec<bool>) -> Result<Self> {
        let expected = shape[0] * shape[1] * shape[2];
        if data.len() != expected {
            return Err(VoxelError::DataLength {
                shape,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// Build a grid with the given occupied coordinates.
    ///
    /// Fails if any coordinate lies outside `shape`.
    pub fn from_coords(shape: [usize; 3], coords: &[VoxelCoord]) -> Result<Self> {
        let mut grid = Self::new(shape);
        for &c in coords {
            if !grid.contains(c) {
                return Err(VoxelError::invalid_param(
                    "coordinate",
                    format!("{:?}", c),
                    "outside grid bounds",
                ));
            }
            grid.set(c, true);
        }
        Ok(grid)
    }

    /// Grid dimensions `[nx, ny, nz]`.
    #[inline]
    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    /// Total number of cells (occupied or not).
    #[inline]
    pub fn num_cells(&self) -> usize {
        self.data.len()
    }

    /// Raw occupancy data in x-major order.
    #[inline]
    pub fn data(&self) -> &[bool] {
        &self.data
    }

    /// Whether `coord` lies inside the grid bounds.
    #[inline]
    pub fn contains(&self, coord: VoxelCoord) -> bool {
        coord[0] < self.shape[0] && coord[1] < self.shape[1] && coord[2] < self.shape[2]
    }

    /// Linear storage index of an in-bounds coordinate.
    #[inline]
    pub fn index(&self, [x, y, z]: VoxelCoord) -> usize {
        (x * self.shape[1] + y) * self.shape[2] + z
    }

    /// Occupancy at `coord`. Out-of-bounds cells read as empty.
    #[inline]
    pub fn get(&self, coord: VoxelCoord) -> bool {
        self.contains(coord) && self.data[self.index(coord)]
    }

    /// Occupancy at a signed position. Anything outside the grid reads as empty.
    #[inline]
    pub fn get_signed(&self, x: isize, y: isize, z: isize) -> bool {
        if x < 0 || y < 0 || z < 0 {
            return false;
        }
        self.get([x as usize, y as usize, z as usize])
    }

    /// Set occupancy at an in-bounds coordinate.
    ///
    /// # Panics
    ///
    /// Panics if `coord` is outside the grid.
    #[inline]
    pub fn set(&mut self, coord: VoxelCoord, occupied: bool) {
        assert!(
            self.contains(coord),
            "voxel {:?} outside grid of shape {:?}",
            coord,
            self.shape
        );
        let i = self.index(coord);
        self.data[i] = occupied;
    }

    /// Number of occupied voxels.
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }

    /// Whether no voxel is occupied.
    pub fn is_vacant(&self) -> bool {
        !self.data.iter().any(|&v| v)
    }

    /// Coordinate of a linear storage index.
    #[inline]
    pub fn coord_of(&self, index: usize) -> VoxelCoord {
        let [_, ny, nz] = self.shape;
        [index / (ny * nz), (index / nz) % ny, index % nz]
    }

    /// Iterate over occupied coordinates in x-major order.
    pub fn occupied(&self) -> impl Iterator<Item = VoxelCoord> + '_ {
        self.data
            .iter()
            .enumerate()
            .filter(|(_, &v)| v)
            .map(move |(i, _)| self.coord_of(i))
    }

    /// Collect the occupied coordinates (the voxel coordinate set).
    pub fn coords(&self) -> Vec<VoxelCoord> {
        self.occupied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_roundtrip() {
        let grid = VoxelGrid::new([3, 4, 5]);
        for i in 0..grid.num_cells() {
            assert_eq!(grid.index(grid.coord_of(i)), i);
        }
    }

    #[test]
    fn test_coords_are_x_major() {
        let grid = VoxelGrid::from_coords([2, 2, 2], &[[1, 0, 0], [0, 1, 1], [0, 0, 1]]).unwrap();
        assert_eq!(grid.coords(), vec![[0, 0, 1], [0, 1, 1], [1, 0, 0]]);
        assert_eq!(grid.count(), 3);
    }

    #[test]
    fn test_from_coords_out_of_bounds() {
        let err = VoxelGrid::from_coords([2, 2, 2], &[[2, 0, 0]]).unwrap_err();
        assert!(matches!(err, VoxelError::InvalidParameter { .. }));
    }

    #[test]
    fn test_from_data_length_mismatch() {
        let err = VoxelGrid::from_data([2, 2, 2], vec![true; 7]).unwrap_err();
        assert!(matches!(err, VoxelError::DataLength { expected: 8, actual: 7, .. }));
    }

    #[test]
    fn test_signed_access_outside_is_empty() {
        let grid = VoxelGrid::filled([1, 1, 1]);
        assert!(grid.get_signed(0, 0, 0));
        assert!(!grid.get_signed(-1, 0, 0));
        assert!(!grid.get_signed(0, 1, 0));
    }

    #[test]
    fn test_cell_count_overflow() {
        assert_eq!(cell_count([2, 3, 4]), Some(24));
        assert_eq!(cell_count([0, usize::MAX, usize::MAX]), Some(0));
        assert_eq!(cell_count([usize::MAX, 2, 1]), None);
    }

    #[test]
    fn test_zero_sized_grid() {
        let grid = VoxelGrid::new([0, 3, 3]);
        assert_eq!(grid.num_cells(), 0);
        assert!(grid.is_vacant());
        assert!(grid.coords().is_empty());
    }
}
