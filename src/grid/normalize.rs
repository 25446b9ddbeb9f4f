//! Padding grids to a common bounding shape.

use crate::error::{Result, VoxelError};

use super::{cell_count, VoxelGrid};

/// Elementwise maximum of two grid shapes.
#[inline]
pub fn common_shape(a: [usize; 3], b: [usize; 3]) -> [usize; 3] {
    [a[0].max(b[0]), a[1].max(b[1]), a[2].max(b[2])]
}

/// Pad `grid` with empty cells up to `target`, keeping content at the origin corner.
///
/// Returns [`VoxelError::PadTooSmall`] if `target` is smaller than the grid in
/// any dimension, or [`VoxelError::GridTooLarge`] if the target cell count
/// overflows.
pub fn pad_to(grid: &VoxelGrid, target: [usize; 3]) -> Result<VoxelGrid> {
    let shape = grid.shape();
    if (0..3).any(|i| target[i] < shape[i]) {
        return Err(VoxelError::PadTooSmall { shape, target });
    }
    if shape == target {
        return Ok(grid.clone());
    }

    let cells = cell_count(target).ok_or(VoxelError::GridTooLarge {
        shape: target,
        max_cells: usize::MAX,
    })?;
    let mut padded = vec![false; cells];
    let row = shape[2];
    if row > 0 {
        for x in 0..shape[0] {
            for y in 0..shape[1] {
                let src = (x * shape[1] + y) * shape[2];
                let dst = (x * target[1] + y) * target[2];
                padded[dst..dst + row].copy_from_slice(&grid.data()[src..src + row]);
            }
        }
    }

    VoxelGrid::from_data(target, padded)
}

/// Pad both grids to the elementwise maximum of their shapes.
pub fn normalize_pair(a: &VoxelGrid, b: &VoxelGrid) -> Result<(VoxelGrid, VoxelGrid)> {
    let target = common_shape(a.shape(), b.shape());
    Ok((pad_to(a, target)?, pad_to(b, target)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_grid() -> VoxelGrid {
        VoxelGrid::from_coords([2, 3, 1], &[[0, 0, 0], [1, 2, 0], [0, 1, 0]]).unwrap()
    }

    #[test]
    fn test_pad_preserves_content() {
        let grid = sample_grid();
        let padded = pad_to(&grid, [4, 3, 5]).unwrap();

        assert_eq!(padded.shape(), [4, 3, 5]);
        assert_eq!(padded.count(), grid.count());
        for c in grid.occupied() {
            assert!(padded.get(c), "voxel {:?} lost by padding", c);
        }
    }

    #[test]
    fn test_pad_new_cells_are_empty() {
        let padded = pad_to(&VoxelGrid::filled([1, 1, 1]), [2, 2, 2]).unwrap();
        assert_eq!(padded.coords(), vec![[0, 0, 0]]);
    }

    #[test]
    fn test_pad_to_smaller_fails() {
        let err = pad_to(&sample_grid(), [2, 2, 2]).unwrap_err();
        assert!(matches!(
            err,
            VoxelError::PadTooSmall {
                shape: [2, 3, 1],
                target: [2, 2, 2]
            }
        ));
    }

    #[test]
    fn test_normalize_pair_uses_elementwise_max() {
        let a = VoxelGrid::filled([3, 1, 2]);
        let b = VoxelGrid::filled([1, 4, 1]);
        let (pa, pb) = normalize_pair(&a, &b).unwrap();

        assert_eq!(pa.shape(), [3, 4, 2]);
        assert_eq!(pb.shape(), [3, 4, 2]);
        assert_eq!(pa.count(), 6);
        assert_eq!(pb.count(), 4);
    }

    #[test]
    fn test_pad_to_overflowing_shape_fails() {
        let grid = VoxelGrid::filled([1, 1, 1]);
        let result = pad_to(&grid, [usize::MAX, 2, 1]);
        assert!(matches!(result, Err(VoxelError::GridTooLarge { .. })));
    }

    #[test]
    fn test_pad_zero_depth_grid() {
        let padded = pad_to(&VoxelGrid::new([2, 2, 0]), [2, 2, 3]).unwrap();
        assert_eq!(padded.shape(), [2, 2, 3]);
        assert!(padded.is_vacant());
    }
}
