//! Discrete compactness of a voxel grid.
//!
//! For every occupied voxel the six axis-aligned neighbours are inspected; a
//! face is *exposed* when the neighbour is empty or lies outside the grid. With
//! `Ac` the total number of exposed faces and `n` the number of occupied
//! voxels:
//!
//! ```text
//! Ac_min = n - 1
//! Ac_max = 3 * (n - n^(2/3))
//! compactness = (Ac - Ac_min) / (Ac_max - Ac_min)
//! ```
//!
//! The score is undefined when `Ac_max == Ac_min`, which happens for a single
//! voxel; grids with fewer than two voxels are reported as
//! [`Compactness::Undefined`] rather than producing a division by zero.
//!
//! # References
//!
//! - Bribiesca, E. (2008). "An easy measure of compactness for 2D and 3D
//!   shapes." Pattern Recognition 41(2).

use rayon::prelude::*;
use serde::{Serialize, Serializer};

use crate::grid::VoxelGrid;

/// Offsets of the six face-adjacent neighbours.
const NEIGHBOURS: [[isize; 3]; 6] = [
    [1, 0, 0],
    [-1, 0, 0],
    [0, 1, 0],
    [0, -1, 0],
    [0, 0, 1],
    [0, 0, -1],
];

/// Compactness score of a single grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Compactness {
    /// A well-defined score.
    Defined(f64),
    /// The formula's denominator vanishes (fewer than two occupied voxels).
    Undefined {
        /// Number of occupied voxels in the grid.
        voxels: usize,
    },
}

impl Compactness {
    /// The score, or `None` for the undefined sentinel.
    #[inline]
    pub fn value(&self) -> Option<f64> {
        match *self {
            Compactness::Defined(v) => Some(v),
            Compactness::Undefined { .. } => None,
        }
    }

    /// Whether the score can take part in reference ranking.
    #[inline]
    pub fn is_defined(&self) -> bool {
        matches!(self, Compactness::Defined(_))
    }
}

impl std::fmt::Display for Compactness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Compactness::Defined(v) => write!(f, "{}", v),
            Compactness::Undefined { .. } => f.write_str("undefined"),
        }
    }
}

// Serialized as a number, or null when undefined.
impl Serialize for Compactness {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value().serialize(serializer)
    }
}

/// Total number of exposed faces over all occupied voxels.
///
/// Cells on the grid boundary always count their outward faces as exposed.
pub fn exposed_faces(grid: &VoxelGrid) -> usize {
    let [nx, ny, nz] = grid.shape();

    (0..nx)
        .into_par_iter()
        .map(|x| {
            let mut exposed = 0;
            for y in 0..ny {
                for z in 0..nz {
                    if !grid.get([x, y, z]) {
                        continue;
                    }
                    for [dx, dy, dz] in NEIGHBOURS {
                        let occupied = grid.get_signed(
                            x as isize + dx,
                            y as isize + dy,
                            z as isize + dz,
                        );
                        if !occupied {
                            exposed += 1;
                        }
                    }
                }
            }
            exposed
        })
        .sum()
}

/// Compactness from an occupied voxel count and an exposed face count.
pub fn compactness_from_counts(voxels: usize, contact_area: usize) -> Compactness {
    if voxels < 2 {
        return Compactness::Undefined { voxels };
    }

    let n = voxels as f64;
    let ac_min = n - 1.0;
    let ac_max = 3.0 * (n - n.powf(2.0 / 3.0));
    let denom = ac_max - ac_min;
    if denom.abs() <= f64::EPSILON * n {
        return Compactness::Undefined { voxels };
    }

    Compactness::Defined((contact_area as f64 - ac_min) / denom)
}

/// Compute the discrete compactness of a grid.
///
/// # Example
///
/// ```
/// use voxwork::algo::compactness::{compactness, Compactness};
/// use voxwork::grid::VoxelGrid;
///
/// let cube = VoxelGrid::filled([2, 2, 2]);
/// let score = compactness(&cube).value().unwrap();
/// assert!((score - 3.4).abs() < 1e-9);
///
/// let single = VoxelGrid::filled([1, 1, 1]);
/// assert_eq!(compactness(&single), Compactness::Undefined { voxels: 1 });
/// ```
pub fn compactness(grid: &VoxelGrid) -> Compactness {
    compactness_from_counts(grid.count(), exposed_faces(grid))
}
