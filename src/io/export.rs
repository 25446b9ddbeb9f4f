//! Writing comparison artifacts to directories.

use std::path::{Path, PathBuf};

use crate::algo::batch::{ArtifactSink, ComparisonGrids};
use crate::algo::cost::CostMatrix;
use crate::error::Result;

use super::{base_name, cad, matrix};

/// [`ArtifactSink`] that writes cost matrices and CAD scripts to disk.
///
/// Files are labelled with the full shape name, extension included, so
/// `cube.obj` and `cube.stl` never share an artifact.
///
/// With a CAD directory, each comparison of `b` against reference `a` writes
/// `b.scr` (padded candidate), `Vox+_a_VS_b.scr` and `Vox+_b_VS_a.scr`
/// (exclusive sets). The reference itself is written as `a.scr` during its
/// self comparison, so its file is unpadded.
#[derive(Debug, Clone, Default)]
pub struct ArtifactDir {
    /// Directory for `cost_matrix_<name>.txt` files.
    pub cost_matrices: Option<PathBuf>,
    /// Directory for `.scr` scripts.
    pub cad: Option<PathBuf>,
}

impl ArtifactDir {
    /// Write cost matrices into `dir`.
    pub fn with_cost_matrices<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.cost_matrices = Some(dir.into());
        self
    }

    /// Write CAD scripts into `dir`.
    pub fn with_cad<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.cad = Some(dir.into());
        self
    }

    /// Create the configured directories.
    pub fn create_dirs(&self) -> Result<()> {
        for dir in [&self.cost_matrices, &self.cad].into_iter().flatten() {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}

fn label(name: &str) -> String {
    base_name(Path::new(name))
}

impl ArtifactSink for ArtifactDir {
    fn comparison(&self, reference: &str, candidate: &str, grids: ComparisonGrids<'_>) -> Result<()> {
        let Some(dir) = &self.cad else {
            return Ok(());
        };
        let a = label(reference);
        let b = label(candidate);

        if grids.is_reference {
            cad::save_cad_script(grids.reference, dir, &a)?;
            return Ok(());
        }
        cad::save_cad_script(grids.candidate, dir, &b)?;
        cad::save_cad_script(&grids.difference.exclusive_a, dir, &format!("Vox+_{}_VS_{}", a, b))?;
        cad::save_cad_script(&grids.difference.exclusive_b, dir, &format!("Vox+_{}_VS_{}", b, a))?;
        Ok(())
    }

    fn cost_matrix(&self, candidate: &str, matrix: &CostMatrix) -> Result<()> {
        if let Some(dir) = &self.cost_matrices {
            matrix::save_cost_matrix(matrix, matrix::cost_matrix_path(dir, &label(candidate)))?;
        }
        Ok(())
    }
}
