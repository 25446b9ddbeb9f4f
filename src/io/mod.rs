//! File I/O: mesh loading and saving, shape loading, and the artifacts written
//! by a comparison run.
//!
//! # Mesh Formats
//!
//! | Format | Extension | Load | Save | Notes |
//! |--------|-----------|------|------|-------|
//! | Wavefront OBJ | `.obj` | ✓ | ✓ | Polygons are triangulated on load |
//! | STL | `.stl` | ✓ | ✓ | Binary and ASCII |
//!
//! # Artifacts
//!
//! - [`report`]: per-shape result table (CSV or JSON)
//! - [`matrix`]: plain-text cost matrices with two decimals
//! - [`cad`]: box-per-voxel CAD command scripts
//! - [`export`]: an artifact sink writing the above into directories
//!
//! # Usage
//!
//! ```no_run
//! use voxwork::io::{load, save};
//!
//! let mesh = load("model.obj").unwrap();
//! save(&mesh, "model.stl").unwrap();
//! ```

pub mod cad;
pub mod export;
pub mod matrix;
pub mod obj;
pub mod report;
pub mod shape;
pub mod stl;

pub use export::ArtifactDir;
pub use crate::algo::batch::LoadedShape;
pub use shape::{load_shape, LoadOptions, MeshVoxelizer};

use std::path::{Path, PathBuf};

use crate::error::{Result, VoxelError};
use crate::mesh::TriangleMesh;

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Wavefront OBJ format.
    Obj,
    /// STL (stereolithography) format.
    Stl,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "obj" => Some(Format::Obj),
            "stl" => Some(Format::Stl),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }
}

fn detect(path: &Path) -> Result<Format> {
    Format::from_path(path).ok_or_else(|| VoxelError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })
}

/// Load a mesh from a file with automatic format detection.
pub fn load<P: AsRef<Path>>(path: P) -> Result<TriangleMesh> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Obj => obj::load(path),
        Format::Stl => stl::load(path),
    }
}

/// Save a mesh to a file with automatic format detection.
pub fn save<P: AsRef<Path>>(mesh: &TriangleMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Obj => obj::save(mesh, path),
        Format::Stl => stl::save(mesh, path),
    }
}

/// List the mesh files of a supported format in `dir`, sorted by file name.
///
/// The order is the "first seen" order used for tie-breaking during reference
/// selection.
pub fn find_mesh_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir.as_ref())? {
        let path = entry?.path();
        if path.is_file() && Format::from_path(&path).is_some() {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Final component of `path`, extension kept, used to label artifacts.
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_format_detection() {
        assert_eq!(Format::from_path("a/b/Cube.OBJ"), Some(Format::Obj));
        assert_eq!(Format::from_path("part.stl"), Some(Format::Stl));
        assert_eq!(Format::from_path("scene.ply"), None);
        assert!(matches!(
            load("mesh.ply"),
            Err(VoxelError::UnsupportedFormat { extension }) if extension == "ply"
        ));
    }

    #[test]
    fn test_find_mesh_files_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        for name in ["b.obj", "a.stl", "notes.txt", "c.OBJ"] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }

        let names: Vec<String> = find_mesh_files(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.stl", "b.obj", "c.OBJ"]);
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name(Path::new("dir/Sphere1_9824.obj")), "Sphere1_9824.obj");
        assert_eq!(base_name(Path::new("cube.stl")), "cube.stl");
    }
}
