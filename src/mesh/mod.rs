//! Triangle meshes and their conversion to voxel grids.
//!
//! Meshes only exist on the way into the comparison pipeline: they are loaded
//! from disk (see [`crate::io`]), pose-normalized with
//! [`align_principal_axes`], and turned into a [`VoxelGrid`](crate::grid::VoxelGrid)
//! with [`voxelize`].
//!
//! ```
//! use voxwork::mesh::{voxelize, TriangleMesh, VoxelizeOptions};
//! use nalgebra::Point3;
//!
//! let mesh = TriangleMesh::new(
//!     vec![
//!         Point3::new(0.0, 0.0, 0.0),
//!         Point3::new(3.0, 0.0, 0.0),
//!         Point3::new(0.0, 3.0, 0.0),
//!     ],
//!     vec![[0, 1, 2]],
//! )
//! .unwrap();
//!
//! let grid = voxelize(&mesh, &VoxelizeOptions::default()).unwrap();
//! assert_eq!(grid.shape(), [4, 4, 1]);
//! ```

mod align;
mod scale;
mod voxelize;

pub use align::align_principal_axes;
pub use scale::{scale_to_voxel_volume, voxel_volume, ScaleOptions};
pub use voxelize::{voxelize, VoxelizeOptions, DEFAULT_MAX_CELLS};

use nalgebra::{Point3, Vector3};

use crate::error::{Result, VoxelError};

/// An indexed triangle soup.
///
/// No topological requirements are imposed: faces may be non-manifold or the
/// surface may be open. Voxelization only needs the triangles themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleMesh {
    vertices: Vec<Point3<f64>>,
    faces: Vec<[usize; 3]>,
}

impl TriangleMesh {
    /// Create a mesh, validating that every face references an existing vertex.
    pub fn new(vertices: Vec<Point3<f64>>, faces: Vec<[usize; 3]>) -> Result<Self> {
        if faces.is_empty() {
            return Err(VoxelError::EmptyMesh);
        }
        for (face, f) in faces.iter().enumerate() {
            if let Some(&vertex) = f.iter().find(|&&v| v >= vertices.len()) {
                return Err(VoxelError::InvalidVertexIndex { face, vertex });
            }
        }
        Ok(Self { vertices, faces })
    }

    /// Vertex positions.
    #[inline]
    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    /// Triangles as vertex index triples.
    #[inline]
    pub fn faces(&self) -> &[[usize; 3]] {
        &self.faces
    }

    /// Number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Corner positions of a triangle.
    #[inline]
    pub fn triangle(&self, face: usize) -> [Point3<f64>; 3] {
        let [a, b, c] = self.faces[face];
        [self.vertices[a], self.vertices[b], self.vertices[c]]
    }

    /// Axis-aligned bounding box `(min, max)`, or `None` without vertices.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = *self.vertices.first()?;
        let mut min = first;
        let mut max = first;

        for v in &self.vertices {
            for i in 0..3 {
                min[i] = min[i].min(v[i]);
                max[i] = max[i].max(v[i]);
            }
        }

        Some((min, max))
    }

    /// Bounding box side lengths.
    pub fn extents(&self) -> Vector3<f64> {
        self.bounding_box()
            .map(|(min, max)| max - min)
            .unwrap_or_else(Vector3::zeros)
    }

    /// Mean vertex position.
    pub fn centroid(&self) -> Point3<f64> {
        if self.vertices.is_empty() {
            return Point3::origin();
        }
        let sum = self
            .vertices
            .iter()
            .fold(Vector3::zeros(), |acc, v| acc + v.coords);
        Point3::from(sum / self.vertices.len() as f64)
    }

    /// Enclosed volume from the signed tetrahedron sum.
    ///
    /// Only meaningful for closed surfaces; the absolute value is returned so
    /// that the winding order does not matter.
    pub fn volume(&self) -> f64 {
        let signed: f64 = (0..self.faces.len())
            .map(|f| {
                let [a, b, c] = self.triangle(f);
                a.coords.dot(&b.coords.cross(&c.coords))
            })
            .sum();
        (signed / 6.0).abs()
    }

    /// Move every vertex by `offset`.
    pub fn translate(&mut self, offset: Vector3<f64>) {
        for v in &mut self.vertices {
            *v += offset;
        }
    }

    /// Scale every vertex about the origin.
    pub fn scale(&mut self, factor: f64) {
        for v in &mut self.vertices {
            v.coords *= factor;
        }
    }

    /// Replace vertex positions, keeping the faces.
    pub(crate) fn with_vertices(&self, vertices: Vec<Point3<f64>>) -> Self {
        debug_assert_eq!(vertices.len(), self.vertices.len());
        Self {
            vertices,
            faces: self.faces.clone(),
        }
    }
}

/// Build an axis-aligned box mesh spanning `min` to `max`.
pub fn box_mesh(min: Point3<f64>, max: Point3<f64>) -> TriangleMesh {
    let vertices = vec![
        Point3::new(min.x, min.y, min.z),
        Point3::new(max.x, min.y, min.z),
        Point3::new(max.x, max.y, min.z),
        Point3::new(min.x, max.y, min.z),
        Point3::new(min.x, min.y, max.z),
        Point3::new(max.x, min.y, max.z),
        Point3::new(max.x, max.y, max.z),
        Point3::new(min.x, max.y, max.z),
    ];
    let faces = vec![
        [0, 2, 1],
        [0, 3, 2],
        [4, 5, 6],
        [4, 6, 7],
        [0, 1, 5],
        [0, 5, 4],
        [1, 2, 6],
        [1, 6, 5],
        [2, 3, 7],
        [2, 7, 6],
        [3, 0, 4],
        [3, 4, 7],
    ];
    TriangleMesh { vertices, faces }
}
