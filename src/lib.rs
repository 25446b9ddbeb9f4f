//! # Voxwork
//!
//! Voxel-based shape comparison by compactness ranking and minimum-cost
//! matching.
//!
//! Given a batch of 3D shapes, voxwork voxelizes each one, scores it by
//! discrete compactness, picks the most compact shape as the reference, and
//! measures every shape against it. The measure is the *work*: the minimum
//! total Euclidean distance of a one-to-one matching between the reference's
//! voxels and the voxels the candidate occupies but the reference does not.
//!
//! ## Features
//!
//! - **Dense voxel grids** with padding and set difference ([`grid`])
//! - **Discrete compactness** with an explicit undefined state ([`algo::compactness`])
//! - **Exact assignment** via the Hungarian method ([`algo::assignment`])
//! - **Parallel batches** with per-shape failure isolation ([`algo::batch`])
//! - **Mesh input** from OBJ and STL, principal-axis alignment and voxelization
//!   ([`io`], [`mesh`])
//!
//! ## Quick Start
//!
//! ```no_run
//! use voxwork::prelude::*;
//!
//! let files = voxwork::io::find_mesh_files("shapes/").unwrap();
//! let loader = MeshVoxelizer::new(LoadOptions::default());
//! let report = BatchComparator::new(BatchOptions::default())
//!     .run_files(&files, &loader)
//!     .unwrap();
//!
//! println!("reference: {:?}", report.reference);
//! for result in report.compared() {
//!     println!("{}: {} positive voxels, work {}", result.name, result.positive_voxels, result.total_work);
//! }
//! ```
//!
//! ## Comparing Grids Directly
//!
//! ```
//! use voxwork::prelude::*;
//!
//! let reference = VoxelGrid::filled([2, 1, 1]);
//! let candidate = VoxelGrid::filled([3, 1, 1]);
//!
//! // One extra voxel at x = 2, matched to the reference voxel at x = 1.
//! let (positive, work) = compare_pair(&reference, &candidate, None).unwrap();
//! assert_eq!(positive, 1);
//! assert_eq!(work, 1.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod grid;
pub mod io;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// ```
/// use voxwork::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::assignment::{solve, AssignmentResult};
    pub use crate::algo::batch::{
        compare_pair, select_reference, ArtifactSink, BatchComparator, BatchOptions, BatchReport,
        ComparisonResult, ShapeLoader, ShapeOutcome,
    };
    pub use crate::algo::compactness::{compactness, Compactness};
    pub use crate::algo::cost::{build_cost_matrix, CostMatrix};
    pub use crate::algo::Progress;
    pub use crate::error::{Result, VoxelError};
    pub use crate::grid::{normalize_pair, set_difference, VoxelCoord, VoxelGrid};
    pub use crate::io::{LoadOptions, MeshVoxelizer};
    pub use crate::mesh::{TriangleMesh, VoxelizeOptions};
}

// Re-export nalgebra types for convenience
pub use nalgebra;

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_full_cube_against_notched_cube() {
        let full = VoxelGrid::filled([2, 2, 2]);
        let mut notched = VoxelGrid::filled([2, 2, 2]);
        notched.set([1, 1, 1], false);

        let (a, b) = normalize_pair(&full, &notched).unwrap();
        let diff = set_difference(&a, &b).unwrap();
        assert_eq!(diff.exclusive_a.count(), 1);
        assert!(diff.exclusive_b.is_vacant());

        // The notched cube exposes more faces per voxel, so it ranks higher.
        let scores = [compactness(&full), compactness(&notched)];
        assert_eq!(select_reference(&scores), Some(1));

        let report = BatchComparator::new(BatchOptions::default())
            .run_grids(vec![("full".into(), full), ("notched".into(), notched)])
            .unwrap();
        assert_eq!(report.reference.as_deref(), Some("notched"));

        // Against the notched reference, the full cube has one extra voxel at
        // distance 1 from its nearest neighbours.
        let full = report.get("full").unwrap();
        assert_eq!(full.positive_voxels, 1);
        assert_eq!(full.total_work, 1.0);
    }
}
