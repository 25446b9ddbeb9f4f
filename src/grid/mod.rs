//! Boolean voxel grids and the set operations performed on them.
//!
//! A [`VoxelGrid`] is a dense 3D occupancy array at unit resolution. Grids are
//! produced by voxelization (see [`crate::mesh::voxelize`]) and are treated as
//! immutable afterwards: normalization and differencing always return new
//! grids.
//!
//! # Example
//!
//! ```
//! use voxwork::grid::{normalize_pair, set_difference, VoxelGrid};
//!
//! let full = VoxelGrid::filled([2, 2, 2]);
//! let mut partial = VoxelGrid::filled([2, 2, 1]);
//! partial.set([0, 0, 0], false);
//!
//! let (a, b) = normalize_pair(&full, &partial).unwrap();
//! assert_eq!(a.shape(), [2, 2, 2]);
//! assert_eq!(b.count(), partial.count());
//!
//! let diff = set_difference(&a, &b).unwrap();
//! assert_eq!(diff.exclusive_a.count(), 5);
//! assert_eq!(diff.exclusive_b.count(), 0);
//! ```

mod difference;
mod normalize;
mod occupancy;

pub use difference::{set_difference, SetDifference};
pub use normalize::{common_shape, normalize_pair, pad_to};
pub use occupancy::{cell_count, VoxelCoord, VoxelGrid};
