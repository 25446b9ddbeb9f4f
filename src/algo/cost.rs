//! Pairwise distance matrices between voxel coordinate sets.

use nalgebra::DMatrix;
use rayon::prelude::*;

use crate::error::{Result, VoxelError};
use crate::grid::VoxelCoord;

/// Dense, possibly rectangular matrix of non-negative costs.
///
/// Rows index the first coordinate set, columns the second. Either dimension
/// may be zero.
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix {
    matrix: DMatrix<f64>,
}

impl CostMatrix {
    /// Build a matrix from row-major values.
    pub fn from_row_slice(rows: usize, cols: usize, values: &[f64]) -> Result<Self> {
        if values.len() != rows * cols {
            return Err(VoxelError::invalid_param(
                "values",
                values.len(),
                "length must equal rows * cols",
            ));
        }
        Ok(Self {
            matrix: DMatrix::from_row_slice(rows, cols, values),
        })
    }

    /// Build a matrix from nested rows. All rows must have the same length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != cols) {
            return Err(VoxelError::invalid_param(
                "rows",
                rows.len(),
                "rows must have equal length",
            ));
        }
        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        Self::from_row_slice(rows.len(), cols, &flat)
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.matrix.nrows()
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.matrix.ncols()
    }

    /// Entry at `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.matrix[(row, col)]
    }

    /// Whether either dimension is zero.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.rows() == 0 || self.cols() == 0
    }

    /// Iterate the values of one row.
    pub fn row(&self, row: usize) -> impl Iterator<Item = f64> + '_ {
        (0..self.cols()).map(move |col| self.matrix[(row, col)])
    }

    /// Copy of this matrix with every entry rounded to `decimals` places.
    pub fn rounded(&self, decimals: u32) -> Self {
        Self {
            matrix: self.matrix.map(|v| round_to(v, decimals)),
        }
    }

    /// The underlying nalgebra matrix.
    #[inline]
    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }
}

/// Round `value` to a fixed number of decimal places.
#[inline]
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}

/// Euclidean distance between two voxel positions.
#[inline]
pub fn euclidean(a: &VoxelCoord, b: &VoxelCoord) -> f64 {
    let dx = a[0] as f64 - b[0] as f64;
    let dy = a[1] as f64 - b[1] as f64;
    let dz = a[2] as f64 - b[2] as f64;
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Build the `|a| x |b|` matrix of Euclidean distances between two coordinate sets.
///
/// Rows are computed in parallel. Empty inputs yield a matrix with a zero
/// dimension.
///
/// # Example
///
/// ```
/// use voxwork::algo::cost::build_cost_matrix;
///
/// let m = build_cost_matrix(&[[0, 0, 0], [3, 4, 0]], &[[0, 0, 0]]);
/// assert_eq!((m.rows(), m.cols()), (2, 1));
/// assert_eq!(m.get(1, 0), 5.0);
/// ```
pub fn build_cost_matrix(a: &[VoxelCoord], b: &[VoxelCoord]) -> CostMatrix {
    if a.is_empty() || b.is_empty() {
        return CostMatrix {
            matrix: DMatrix::zeros(a.len(), b.len()),
        };
    }

    let values: Vec<f64> = a
        .par_iter()
        .flat_map_iter(|pa| b.iter().map(move |pb| euclidean(pa, pb)))
        .collect();

    CostMatrix {
        matrix: DMatrix::from_row_slice(a.len(), b.len(), &values),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_shape_and_entries() {
        let a = [[0, 0, 0], [1, 2, 2], [4, 0, 0]];
        let b = [[0, 0, 0], [1, 2, 2]];
        let m = build_cost_matrix(&a, &b);

        assert_eq!((m.rows(), m.cols()), (3, 2));
        for i in 0..a.len() {
            for j in 0..b.len() {
                let v = m.get(i, j);
                assert!(v >= 0.0);
                assert_eq!(v == 0.0, a[i] == b[j]);
            }
        }
        assert_relative_eq!(m.get(1, 0), 3.0);
        assert_relative_eq!(m.get(2, 1), 13.0_f64.sqrt());
    }

    #[test]
    fn test_empty_inputs_give_zero_dimension() {
        let m = build_cost_matrix(&[[1, 1, 1]], &[]);
        assert_eq!((m.rows(), m.cols()), (1, 0));
        assert!(m.is_degenerate());

        let m = build_cost_matrix(&[], &[[1, 1, 1], [0, 0, 0]]);
        assert_eq!((m.rows(), m.cols()), (0, 2));
    }

    #[test]
    fn test_rounding() {
        assert_eq!(round_to(2.0_f64.sqrt(), 2), 1.41);
        let m = build_cost_matrix(&[[0, 0, 0]], &[[1, 1, 1]]).rounded(2);
        assert_eq!(m.get(0, 0), 1.73);
    }

    #[test]
    fn test_from_rows_rejects_ragged_input() {
        assert!(CostMatrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]).is_err());
        let m = CostMatrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(m.row(1).collect::<Vec<_>>(), vec![3.0, 4.0]);
    }
}
