//! CAD command scripts that rebuild a voxel grid as unit boxes.
//!
//! Each occupied voxel becomes one `_box` command drawn from its centre:
//!
//! ```text
//! _box
//! C
//! x,y,z
//! C
//! 1
//! ```
//!
//! Records follow x-major voxel order. The output is byte-exact for downstream
//! CAD tooling: `\n` line endings, no header, no trailing blank line.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::grid::VoxelGrid;

/// Write one box record per occupied voxel.
pub fn write_cad_script<W: Write>(writer: &mut W, grid: &VoxelGrid) -> Result<()> {
    for [x, y, z] in grid.occupied() {
        write!(writer, "_box\nC\n{},{},{}\nC\n1\n", x, y, z)?;
    }
    Ok(())
}

/// Save the script for `grid` as `<dir>/<label>.scr` and return the path.
pub fn save_cad_script(grid: &VoxelGrid, dir: &Path, label: &str) -> Result<PathBuf> {
    let path = dir.join(format!("{}.scr", label));
    let mut writer = BufWriter::new(File::create(&path)?);
    write_cad_script(&mut writer, grid)?;
    writer.flush()?;
    Ok(path)
}
