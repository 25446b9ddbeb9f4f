//! Shape analysis and comparison algorithms.
//!
//! - **Compactness**: discrete compactness from exposed voxel faces
//! - **Cost matrix**: pairwise Euclidean distances between voxel sets
//! - **Assignment**: exact minimum-cost bipartite matching ("work")
//! - **Batch**: compactness ranking and comparison of many shapes against a reference
//!
//! # Example
//!
//! ```
//! use voxwork::algo::{assignment, cost};
//! use voxwork::grid::VoxelGrid;
//!
//! let a = VoxelGrid::filled([2, 1, 1]);
//! let b = VoxelGrid::from_coords([3, 1, 1], &[[2, 0, 0]]).unwrap();
//!
//! let matrix = cost::build_cost_matrix(&a.coords(), &b.coords());
//! let result = assignment::solve(&matrix).unwrap();
//! assert_eq!(result.total_work, 1.0);
//! ```

pub mod assignment;
pub mod batch;
pub mod compactness;
pub mod cost;
pub mod progress;

pub use progress::Progress;
