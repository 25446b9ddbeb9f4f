//! Exact minimum-cost bipartite matching.
//!
//! Solves the rectangular linear assignment problem with the Hungarian
//! method in its shortest-augmenting-path form (Kuhn–Munkres with dual
//! potentials). For an `n x m` matrix with `n <= m` the running time is
//! `O(n^2 m)`; taller matrices are solved on their transpose.
//!
//! Every row of the smaller side is matched to a distinct column of the
//! larger side; unmatched rows or columns contribute no cost.
//!
//! # References
//!
//! - Kuhn, H. W. (1955). "The Hungarian method for the assignment problem."
//!   Naval Research Logistics Quarterly 2.
//! - Jonker, R. & Volgenant, A. (1987). "A shortest augmenting path algorithm
//!   for dense and sparse linear assignment problems." Computing 38.

use crate::error::{Result, VoxelError};

use super::cost::CostMatrix;

/// Result of solving an assignment problem.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentResult {
    /// Matched `(row, column)` pairs, sorted by row.
    pub pairs: Vec<(usize, usize)>,
    /// Sum of the costs of the matched cells.
    pub total_work: f64,
}

impl AssignmentResult {
    /// The empty matching with zero cost.
    pub fn empty() -> Self {
        Self {
            pairs: Vec::new(),
            total_work: 0.0,
        }
    }

    /// Number of matched pairs.
    #[inline]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether nothing was matched.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Column assigned to `row`, if any.
    pub fn column_of(&self, row: usize) -> Option<usize> {
        self.pairs
            .binary_search_by_key(&row, |&(r, _)| r)
            .ok()
            .map(|i| self.pairs[i].1)
    }
}

/// Compute a minimum-total-cost matching over a cost matrix.
///
/// A matrix with a zero dimension yields [`AssignmentResult::empty`]. Entries
/// must be finite; NaN or infinite costs return [`VoxelError::InvalidCost`].
///
/// # Example
///
/// ```
/// use voxwork::algo::assignment::solve;
/// use voxwork::algo::cost::CostMatrix;
///
/// let m = CostMatrix::from_rows(&[vec![2.0, 1.0], vec![1.0, 2.0]]).unwrap();
/// let result = solve(&m).unwrap();
/// assert_eq!(result.pairs, vec![(0, 1), (1, 0)]);
/// assert_eq!(result.total_work, 2.0);
/// ```
pub fn solve(cost: &CostMatrix) -> Result<AssignmentResult> {
    if cost.is_degenerate() {
        return Ok(AssignmentResult::empty());
    }

    for row in 0..cost.rows() {
        for (col, value) in cost.row(row).enumerate() {
            if !value.is_finite() {
                return Err(VoxelError::InvalidCost { row, col, value });
            }
        }
    }

    let transposed = cost.rows() > cost.cols();
    let mut pairs = if transposed {
        hungarian(cost.cols(), cost.rows(), |i, j| cost.get(j, i))
            .into_iter()
            .map(|(c, r)| (r, c))
            .collect::<Vec<_>>()
    } else {
        hungarian(cost.rows(), cost.cols(), |i, j| cost.get(i, j))
    };
    pairs.sort_unstable();

    let total_work = pairs.iter().map(|&(r, c)| cost.get(r, c)).sum();

    Ok(AssignmentResult { pairs, total_work })
}

/// Hungarian method for `n <= m`. Returns `(row, col)` for every row.
///
/// Uses 1-based internal indexing with a virtual column 0 as the augmenting
/// path root.
fn hungarian<F>(n: usize, m: usize, cost: F) -> Vec<(usize, usize)>
where
    F: Fn(usize, usize) -> f64,
{
    debug_assert!(n <= m);

    // Row and column potentials.
    let mut u = vec![0.0_f64; n + 1];
    let mut v = vec![0.0_f64; m + 1];
    // p[j]: row matched to column j (0 = free). way[j]: previous column on the path.
    let mut p = vec![0usize; m + 1];
    let mut way = vec![0usize; m + 1];

    let mut minv = vec![0.0_f64; m + 1];
    let mut used = vec![false; m + 1];

    for i in 1..=n {
        p[0] = i;
        let mut j0 = 0;
        minv.iter_mut().for_each(|x| *x = f64::INFINITY);
        used.iter_mut().for_each(|x| *x = false);

        loop {
            used[j0] = true;
            let i0 = p[j0];
            let mut delta = f64::INFINITY;
            let mut j1 = 0;

            for j in 1..=m {
                if used[j] {
                    continue;
                }
                let reduced = cost(i0 - 1, j - 1) - u[i0] - v[j];
                if reduced < minv[j] {
                    minv[j] = reduced;
                    way[j] = j0;
                }
                if minv[j] < delta {
                    delta = minv[j];
                    j1 = j;
                }
            }

            for j in 0..=m {
                if used[j] {
                    u[p[j]] += delta;
                    v[j] -= delta;
                } else {
                    minv[j] -= delta;
                }
            }

            j0 = j1;
            if p[j0] == 0 {
                break;
            }
        }

        // Flip the augmenting path.
        loop {
            let j1 = way[j0];
            p[j0] = p[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    (1..=m)
        .filter(|&j| p[j] != 0)
        .map(|j| (p[j] - 1, j - 1))
        .collect()
}
