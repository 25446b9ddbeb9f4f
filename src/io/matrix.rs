//! Plain-text cost matrix dumps.
//!
//! One matrix row per line, values separated by a single space and printed
//! with exactly two decimals.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::algo::cost::CostMatrix;
use crate::error::Result;

/// Write `matrix` in the two-decimal text format.
pub fn write_cost_matrix<W: Write>(writer: &mut W, matrix: &CostMatrix) -> Result<()> {
    for row in 0..matrix.rows() {
        let mut first = true;
        for value in matrix.row(row) {
            if !first {
                writer.write_all(b" ")?;
            }
            write!(writer, "{:.2}", value)?;
            first = false;
        }
        writer.write_all(b"\n")?;
    }
    Ok(())
}

/// Save `matrix` to `path`.
pub fn save_cost_matrix<P: AsRef<Path>>(matrix: &CostMatrix, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write_cost_matrix(&mut writer, matrix)?;
    writer.flush()?;
    Ok(())
}

/// Conventional file name for the cost matrix of shape `name`.
pub fn cost_matrix_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("cost_matrix_{}.txt", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::cost::build_cost_matrix;
    use tempfile::TempDir;

    #[test]
    fn test_two_decimal_rows() {
        let m = build_cost_matrix(&[[0, 0, 0], [1, 1, 0]], &[[0, 0, 0], [1, 1, 1], [3, 0, 0]]);
        let mut out = Vec::new();
        write_cost_matrix(&mut out, &m).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "0.00 1.73 3.00\n1.41 1.00 2.24\n"
        );
    }

    #[test]
    fn test_empty_matrix_writes_nothing() {
        let mut out = Vec::new();
        write_cost_matrix(&mut out, &build_cost_matrix(&[], &[[0, 0, 0]])).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_save_uses_conventional_name() {
        let dir = TempDir::new().unwrap();
        let path = cost_matrix_path(dir.path(), "cat.obj");
        save_cost_matrix(&build_cost_matrix(&[[0, 0, 0]], &[[0, 0, 2]]), &path).unwrap();

        assert!(path.ends_with("cost_matrix_cat.obj.txt"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "2.00\n");
    }
}
