//! Conversion of triangle meshes into voxel grids.
//!
//! Surface voxelization samples every triangle on a barycentric lattice whose
//! spacing never exceeds half the voxel pitch, and marks the voxel containing
//! each sample. Voxel `i` along an axis covers `[(i - 0.5) * pitch, (i + 0.5) * pitch)`
//! in model space, so a sample `p` lands in voxel `round(p / pitch)`. The
//! grid origin is the smallest such index over the mesh vertices.
//!
//! With [`VoxelizeOptions::fill`] the enclosed interior is added by flood
//! filling the exterior from the grid boundary.

use std::collections::VecDeque;

use nalgebra::Point3;
use rayon::prelude::*;

use crate::error::{Result, VoxelError};
use crate::grid::{cell_count, VoxelGrid};

use super::TriangleMesh;

/// Default cell limit: 256 MiB of occupancy per grid.
pub const DEFAULT_MAX_CELLS: usize = 1 << 28;

/// Options for voxelization.
#[derive(Debug, Clone)]
pub struct VoxelizeOptions {
    /// Edge length of one voxel in model units (default: 1.0).
    pub pitch: f64,

    /// Whether to fill the enclosed interior (default: false, surface only).
    pub fill: bool,

    /// Largest grid, in cells, a mesh may voxelize to (default: 2^28).
    pub max_cells: usize,
}

impl Default for VoxelizeOptions {
    fn default() -> Self {
        Self {
            pitch: 1.0,
            fill: false,
            max_cells: DEFAULT_MAX_CELLS,
        }
    }
}

impl VoxelizeOptions {
    /// Set the voxel pitch.
    pub fn with_pitch(mut self, pitch: f64) -> Self {
        self.pitch = pitch;
        self
    }

    /// Set whether the interior is filled.
    pub fn with_fill(mut self, fill: bool) -> Self {
        self.fill = fill;
        self
    }

    /// Set the largest allowed grid size in cells.
    pub fn with_max_cells(mut self, max_cells: usize) -> Self {
        self.max_cells = max_cells;
        self
    }
}

/// Voxelize a mesh at the configured pitch.
///
/// # Errors
///
/// Returns [`VoxelError::InvalidParameter`] if the pitch is not a positive
/// finite number or the mesh has non-finite coordinates,
/// [`VoxelError::EmptyMesh`] if the mesh has no vertices, and
/// [`VoxelError::GridTooLarge`] if the grid would exceed
/// [`VoxelizeOptions::max_cells`].
pub fn voxelize(mesh: &TriangleMesh, options: &VoxelizeOptions) -> Result<VoxelGrid> {
    let pitch = options.pitch;
    if !pitch.is_finite() || pitch <= 0.0 {
        return Err(VoxelError::invalid_param("pitch", pitch, "must be positive and finite"));
    }
    let (min, max) = mesh.bounding_box().ok_or(VoxelError::EmptyMesh)?;

    if !(0..3).all(|i| min[i].is_finite() && max[i].is_finite()) {
        return Err(VoxelError::invalid_param(
            "mesh bounds",
            format!("{:?} .. {:?}", min, max),
            "must be finite",
        ));
    }

    let origin = [0, 1, 2].map(|i| (min[i] / pitch).round() as i64);
    let upper = [0, 1, 2].map(|i| (max[i] / pitch).round() as i64);
    let shape = [0, 1, 2].map(|i| {
        upper[i]
            .checked_sub(origin[i])
            .and_then(|span| span.checked_add(1))
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(usize::MAX)
    });
    let cells = cell_count(shape)
        .filter(|&cells| cells <= options.max_cells)
        .ok_or(VoxelError::GridTooLarge {
            shape,
            max_cells: options.max_cells,
        })?;

    let locate = |p: &Point3<f64>| -> [usize; 3] {
        [0, 1, 2].map(|i| {
            let idx = (p[i] / pitch).round() as i64 - origin[i];
            idx.clamp(0, shape[i] as i64 - 1) as usize
        })
    };

    let spacing = pitch / 2.0;
    let layout = VoxelGrid::new(shape);

    let occupancy = (0..mesh.num_faces())
        .into_par_iter()
        .fold(
            || vec![false; cells],
            |mut acc, face| {
                let [a, b, c] = mesh.triangle(face);
                let longest = nalgebra::distance(&a, &b)
                    .max(nalgebra::distance(&b, &c))
                    .max(nalgebra::distance(&c, &a));
                let divisions = ((longest / spacing).ceil() as usize).max(1);
                let step = 1.0 / divisions as f64;
                let ab = b - a;
                let ac = c - a;

                for ui in 0..=divisions {
                    for wi in 0..=(divisions - ui) {
                        let p = a + ab * (ui as f64 * step) + ac * (wi as f64 * step);
                        acc[layout.index(locate(&p))] = true;
                    }
                }
                acc
            },
        )
        .reduce(
            || vec![false; cells],
            |mut a, b| {
                a.iter_mut().zip(b).for_each(|(x, y)| *x |= y);
                a
            },
        );

    let grid = VoxelGrid::from_data(shape, occupancy)?;
    Ok(if options.fill { fill_interior(&grid) } else { grid })
}

/// Mark every empty cell that is not 6-connected to the grid boundary through
/// empty cells.
fn fill_interior(grid: &VoxelGrid) -> VoxelGrid {
    let shape = grid.shape();
    let mut exterior = vec![false; grid.num_cells()];
    let mut queue = VecDeque::new();

    for i in 0..grid.num_cells() {
        let [x, y, z] = grid.coord_of(i);
        let on_boundary = (0..3).any(|k| [x, y, z][k] == 0 || [x, y, z][k] + 1 == shape[k]);
        if on_boundary && !grid.data()[i] {
            exterior[i] = true;
            queue.push_back([x, y, z]);
        }
    }

    while let Some([x, y, z]) = queue.pop_front() {
        let neighbours = [
            [x.wrapping_sub(1), y, z],
            [x + 1, y, z],
            [x, y.wrapping_sub(1), z],
            [x, y + 1, z],
            [x, y, z.wrapping_sub(1)],
            [x, y, z + 1],
        ];
        for n in neighbours {
            if !grid.contains(n) {
                continue;
            }
            let i = grid.index(n);
            if !grid.data()[i] && !exterior[i] {
                exterior[i] = true;
                queue.push_back(n);
            }
        }
    }

    let mut filled = grid.clone();
    for (i, outside) in exterior.into_iter().enumerate() {
        if !outside {
            filled.set(grid.coord_of(i), true);
        }
    }
    filled
}
