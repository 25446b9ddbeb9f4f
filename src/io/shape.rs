//! Turning a mesh file into a voxel grid.

use std::path::Path;

use log::debug;

use crate::algo::batch::{LoadedShape, ShapeLoader};
use crate::error::Result;
use crate::mesh::{align_principal_axes, voxelize, VoxelizeOptions};

/// Options for loading a shape from a mesh file.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Rotate the mesh into its principal-axis frame before voxelizing (default: true).
    pub align: bool,

    /// Voxelization parameters.
    pub voxelize: VoxelizeOptions,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            align: true,
            voxelize: VoxelizeOptions::default(),
        }
    }
}

impl LoadOptions {
    /// Set whether principal-axis alignment is applied.
    pub fn with_align(mut self, align: bool) -> Self {
        self.align = align;
        self
    }

    /// Set the voxelization parameters.
    pub fn with_voxelize(mut self, voxelize: VoxelizeOptions) -> Self {
        self.voxelize = voxelize;
        self
    }
}

/// Load, optionally align, and voxelize a mesh file.
pub fn load_shape<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<LoadedShape> {
    let path = path.as_ref();
    let mesh = super::load(path)?;
    let mesh = if options.align {
        align_principal_axes(&mesh)
    } else {
        mesh
    };

    let grid = voxelize(&mesh, &options.voxelize)?;
    let shape = LoadedShape {
        volume: mesh.volume(),
        extents: mesh.extents(),
        grid,
    };

    debug!(
        "{}: {} faces, volume {:.3}, grid {:?} with {} voxels",
        path.display(),
        mesh.num_faces(),
        shape.volume,
        shape.grid.shape(),
        shape.grid.count()
    );

    Ok(shape)
}

/// [`ShapeLoader`] that reads mesh files from disk.
#[derive(Debug, Clone, Default)]
pub struct MeshVoxelizer {
    /// Options applied to every file.
    pub options: LoadOptions,
}

impl MeshVoxelizer {
    /// Create a loader with the given options.
    pub fn new(options: LoadOptions) -> Self {
        Self { options }
    }
}

impl ShapeLoader for MeshVoxelizer {
    fn load(&self, path: &Path) -> Result<LoadedShape> {
        load_shape(path, &self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::obj;
    use crate::mesh::box_mesh;
    use approx::assert_relative_eq;
    use nalgebra::{Point3, Vector3};
    use tempfile::TempDir;

    #[test]
    fn test_load_shape_reports_volume_and_extents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("slab.obj");
        obj::save(&box_mesh(Point3::origin(), Point3::new(2.0, 6.0, 4.0)), &path).unwrap();

        let shape = load_shape(&path, &LoadOptions::default()).unwrap();
        assert_relative_eq!(shape.volume, 48.0, epsilon = 1e-6);
        assert_relative_eq!(shape.extents, Vector3::new(6.0, 4.0, 2.0), epsilon = 1e-6);
        assert_eq!(shape.grid.shape(), [7, 5, 3]);
    }

    #[test]
    fn test_loader_without_alignment_keeps_axes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("slab.obj");
        obj::save(&box_mesh(Point3::origin(), Point3::new(2.0, 6.0, 4.0)), &path).unwrap();

        let loader = MeshVoxelizer::new(LoadOptions::default().with_align(false));
        let shape = loader.load(&path).unwrap();
        assert_eq!(shape.grid.shape(), [3, 7, 5]);
        assert_relative_eq!(shape.extents, Vector3::new(2.0, 6.0, 4.0), epsilon = 1e-6);
    }
}
