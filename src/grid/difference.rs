//! Symmetric set difference between two aligned grids.

use crate::error::{Result, VoxelError};

use super::VoxelGrid;

/// The two exclusive parts of a symmetric difference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetDifference {
    /// Voxels occupied in `a` but not in `b` (`a ∧ ¬b`).
    pub exclusive_a: VoxelGrid,
    /// Voxels occupied in `b` but not in `a` (`b ∧ ¬a`).
    pub exclusive_b: VoxelGrid,
}

/// Compute `a ∧ ¬b` and `b ∧ ¬a` for two grids of identical shape.
///
/// Grids must already be normalized; a shape mismatch returns
/// [`VoxelError::ShapeMismatch`].
pub fn set_difference(a: &VoxelGrid, b: &VoxelGrid) -> Result<SetDifference> {
    if a.shape() != b.shape() {
        return Err(VoxelError::ShapeMismatch {
            left: a.shape(),
            right: b.shape(),
        });
    }

    let (only_a, only_b): (Vec<bool>, Vec<bool>) = a
        .data()
        .iter()
        .zip(b.data())
        .map(|(&va, &vb)| (va && !vb, vb && !va))
        .unzip();

    Ok(SetDifference {
        exclusive_a: VoxelGrid::from_data(a.shape(), only_a)?,
        exclusive_b: VoxelGrid::from_data(b.shape(), only_b)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difference_partitions_xor() {
        let a = VoxelGrid::from_coords([2, 2, 2], &[[0, 0, 0], [0, 1, 0], [1, 1, 1]]).unwrap();
        let b = VoxelGrid::from_coords([2, 2, 2], &[[0, 1, 0], [1, 0, 0]]).unwrap();
        let diff = set_difference(&a, &b).unwrap();

        for i in 0..a.num_cells() {
            let ea = diff.exclusive_a.data()[i];
            let eb = diff.exclusive_b.data()[i];
            assert!(!(ea && eb), "exclusive sets overlap at cell {}", i);
            assert_eq!(ea || eb, a.data()[i] ^ b.data()[i]);
        }
        assert_eq!(diff.exclusive_a.coords(), vec![[0, 0, 0], [1, 1, 1]]);
        assert_eq!(diff.exclusive_b.coords(), vec![[1, 0, 0]]);
    }

    #[test]
    fn test_difference_with_self_is_empty() {
        let a = VoxelGrid::filled([3, 2, 1]);
        let diff = set_difference(&a, &a).unwrap();
        assert!(diff.exclusive_a.is_vacant());
        assert!(diff.exclusive_b.is_vacant());
    }

    #[test]
    fn test_difference_shape_mismatch() {
        let err = set_difference(&VoxelGrid::new([1, 2, 3]), &VoxelGrid::new([1, 2, 2])).unwrap_err();
        assert!(matches!(err, VoxelError::ShapeMismatch { .. }));
    }
}
