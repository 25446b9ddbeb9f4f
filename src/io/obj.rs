//! Wavefront OBJ format support.
//!
//! Loading goes through `tobj` with triangulation enabled; all objects in the
//! file are merged into one mesh. Saving writes plain `v`/`f` records.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;

use crate::error::{Result, VoxelError};
use crate::mesh::TriangleMesh;

/// Load a mesh from an OBJ file.
///
/// # Example
///
/// ```no_run
/// use voxwork::io::obj;
///
/// let mesh = obj::load("model.obj").unwrap();
/// println!("{} triangles", mesh.num_faces());
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<TriangleMesh> {
    let path = path.as_ref();
    let options = tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    };

    let (models, _materials) =
        tobj::load_obj(path, &options).map_err(|e| VoxelError::LoadError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let mut vertices: Vec<Point3<f64>> = Vec::new();
    let mut faces: Vec<[usize; 3]> = Vec::new();

    for model in &models {
        let mesh = &model.mesh;
        let offset = vertices.len();

        vertices.extend(
            mesh.positions
                .chunks_exact(3)
                .map(|p| Point3::new(p[0] as f64, p[1] as f64, p[2] as f64)),
        );
        faces.extend(mesh.indices.chunks_exact(3).map(|t| {
            [
                offset + t[0] as usize,
                offset + t[1] as usize,
                offset + t[2] as usize,
            ]
        }));
    }

    if faces.is_empty() {
        return Err(VoxelError::LoadError {
            path: path.to_path_buf(),
            message: "OBJ file contains no triangles".to_string(),
        });
    }

    TriangleMesh::new(vertices, faces)
}

/// Save a mesh as OBJ.
pub fn save<P: AsRef<Path>>(mesh: &TriangleMesh, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);

    for v in mesh.vertices() {
        writeln!(writer, "v {} {} {}", v.x, v.y, v.z)?;
    }
    for f in mesh.faces() {
        writeln!(writer, "f {} {} {}", f[0] + 1, f[1] + 1, f[2] + 1)?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::box_mesh;
    use approx::assert_relative_eq;
    use tempfile::TempDir;

    #[test]
    fn test_save_then_load_box() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("box.obj");
        let mesh = box_mesh(Point3::origin(), Point3::new(2.0, 3.0, 4.0));

        save(&mesh, &path).unwrap();
        let loaded = load(&path).unwrap();

        assert_eq!(loaded.num_vertices(), 8);
        assert_eq!(loaded.num_faces(), 12);
        assert_relative_eq!(loaded.volume(), 24.0, epsilon = 1e-6);
    }

    #[test]
    fn test_quads_are_triangulated() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("quad.obj");
        std::fs::write(&path, "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n").unwrap();

        let mesh = load(&path).unwrap();
        assert_eq!(mesh.num_faces(), 2);
    }

    #[test]
    fn test_missing_file() {
        let err = load("/definitely/not/here.obj").unwrap_err();
        assert!(matches!(err, VoxelError::LoadError { .. }));
    }
}
