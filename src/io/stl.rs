//! STL (stereolithography) format support.
//!
//! Binary and ASCII files are both accepted on load; saving writes binary STL.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use nalgebra::{Point3, Vector3};

use crate::error::{Result, VoxelError};
use crate::mesh::TriangleMesh;

/// Load a mesh from an STL file.
///
/// `stl_io` already merges coincident corners into an indexed mesh, so no
/// further vertex welding is done here. Degenerate triangles are dropped.
pub fn load<P: AsRef<Path>>(path: P) -> Result<TriangleMesh> {
    let path = path.as_ref();
    let mut file = File::open(path)?;

    let stl = stl_io::read_stl(&mut file).map_err(|e| VoxelError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let vertices: Vec<Point3<f64>> = stl
        .vertices
        .iter()
        .map(|v| Point3::new(v[0] as f64, v[1] as f64, v[2] as f64))
        .collect();

    let faces: Vec<[usize; 3]> = stl
        .faces
        .iter()
        .map(|tri| tri.vertices)
        .filter(|&[i0, i1, i2]| i0 != i1 && i1 != i2 && i0 != i2)
        .collect();

    if faces.is_empty() {
        return Err(VoxelError::LoadError {
            path: path.to_path_buf(),
            message: "STL file contains no valid triangles".to_string(),
        });
    }

    TriangleMesh::new(vertices, faces)
}

/// Save a mesh to a binary STL file.
pub fn save<P: AsRef<Path>>(mesh: &TriangleMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let triangles: Vec<stl_io::Triangle> = (0..mesh.num_faces())
        .map(|f| {
            let [p0, p1, p2] = mesh.triangle(f);
            let n = (p1 - p0).cross(&(p2 - p0)).try_normalize(0.0).unwrap_or_else(Vector3::zeros);

            stl_io::Triangle {
                normal: stl_io::Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                vertices: [
                    stl_io::Vertex::new([p0.x as f32, p0.y as f32, p0.z as f32]),
                    stl_io::Vertex::new([p1.x as f32, p1.y as f32, p1.z as f32]),
                    stl_io::Vertex::new([p2.x as f32, p2.y as f32, p2.z as f32]),
                ],
            }
        })
        .collect();

    stl_io::write_stl(&mut writer, triangles.iter()).map_err(|e| VoxelError::SaveError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

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
        let path = dir.path().join("box.stl");
        let mesh = box_mesh(Point3::origin(), Point3::new(1.0, 2.0, 3.0));

        save(&mesh, &path).unwrap();
        let loaded = load(&path).unwrap();

        assert_eq!(loaded.num_faces(), 12);
        assert_eq!(loaded.num_vertices(), 8);
        assert_relative_eq!(loaded.volume(), 6.0, epsilon = 1e-5);
    }
}
