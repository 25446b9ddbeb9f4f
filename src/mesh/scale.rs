//! Rescaling meshes to a common voxel volume.

use log::debug;

use crate::error::{Result, VoxelError};
use crate::grid::VoxelGrid;

use super::{voxelize, TriangleMesh, VoxelizeOptions};

/// Volume covered by the occupied voxels of a grid.
#[inline]
pub fn voxel_volume(grid: &VoxelGrid, pitch: f64) -> f64 {
    grid.count() as f64 * pitch.powi(3)
}

/// Options for [`scale_to_voxel_volume`].
#[derive(Debug, Clone)]
pub struct ScaleOptions {
    /// Accepted absolute deviation from the target volume (default: 100).
    pub tolerance: f64,

    /// Maximum number of rescaling steps (default: 50).
    pub max_iterations: usize,

    /// Voxelization used to measure the volume.
    pub voxelize: VoxelizeOptions,
}

impl Default for ScaleOptions {
    fn default() -> Self {
        Self {
            tolerance: 100.0,
            max_iterations: 50,
            voxelize: VoxelizeOptions::default(),
        }
    }
}

impl ScaleOptions {
    /// Set the accepted deviation.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the iteration limit.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the voxelization used for measuring.
    pub fn with_voxelize(mut self, voxelize: VoxelizeOptions) -> Self {
        self.voxelize = voxelize;
        self
    }
}

/// Uniformly scale a mesh until its voxel volume is within tolerance of `target`.
///
/// Each step scales by `(target / current)^(1/3)` about the origin and
/// re-voxelizes. Returns the scaled mesh and its final voxel volume.
///
/// # Errors
///
/// [`VoxelError::ConvergenceFailed`] if the tolerance is not met within
/// `max_iterations` steps; [`VoxelError::InvalidParameter`] for a
/// non-positive target or a mesh that voxelizes to nothing.
pub fn scale_to_voxel_volume(
    mesh: &TriangleMesh,
    target: f64,
    options: &ScaleOptions,
) -> Result<(TriangleMesh, f64)> {
    if !target.is_finite() || target <= 0.0 {
        return Err(VoxelError::invalid_param("target", target, "must be positive and finite"));
    }

    let measure = |m: &TriangleMesh| -> Result<f64> {
        Ok(voxel_volume(&voxelize(m, &options.voxelize)?, options.voxelize.pitch))
    };

    let mut scaled = mesh.clone();
    let mut current = measure(&scaled)?;
    debug!("initial voxel volume {:.1}, target {:.1}", current, target);

    for _ in 0..options.max_iterations {
        if (current - target).abs() <= options.tolerance {
            return Ok((scaled, current));
        }
        if current <= 0.0 {
            return Err(VoxelError::invalid_param("mesh", "empty", "voxelizes to zero volume"));
        }

        scaled.scale((target / current).cbrt());
        current = measure(&scaled)?;
        debug!("rescaled voxel volume {:.1}", current);
    }

    if (current - target).abs() <= options.tolerance {
        Ok((scaled, current))
    } else {
        Err(VoxelError::ConvergenceFailed {
            iterations: options.max_iterations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::box_mesh;
    use nalgebra::Point3;

    #[test]
    fn test_voxel_volume_uses_pitch() {
        let grid = VoxelGrid::filled([2, 2, 2]);
        assert_eq!(voxel_volume(&grid, 1.0), 8.0);
        assert_eq!(voxel_volume(&grid, 0.5), 1.0);
    }

    #[test]
    fn test_scales_box_towards_target() {
        let mesh = box_mesh(Point3::origin(), Point3::new(4.0, 4.0, 4.0));
        let options = ScaleOptions::default()
            .with_tolerance(30.0)
            .with_voxelize(VoxelizeOptions::default().with_fill(true));

        let (scaled, volume) = scale_to_voxel_volume(&mesh, 1000.0, &options).unwrap();
        assert!((volume - 1000.0).abs() <= 30.0, "volume {}", volume);
        assert!(scaled.extents().x > 4.0);
    }

    #[test]
    fn test_already_within_tolerance_is_unchanged() {
        let mesh = box_mesh(Point3::origin(), Point3::new(4.0, 4.0, 4.0));
        let options = ScaleOptions::default().with_voxelize(VoxelizeOptions::default().with_fill(true));
        let (scaled, volume) = scale_to_voxel_volume(&mesh, 125.0, &options).unwrap();
        assert_eq!(volume, 125.0);
        assert_eq!(scaled, mesh);
    }

    #[test]
    fn test_zero_iterations_fails() {
        let mesh = box_mesh(Point3::origin(), Point3::new(4.0, 4.0, 4.0));
        let options = ScaleOptions::default().with_tolerance(0.0).with_max_iterations(0);
        let err = scale_to_voxel_volume(&mesh, 1000.0, &options).unwrap_err();
        assert!(matches!(err, VoxelError::ConvergenceFailed { iterations: 0 }));
    }
}
