//! Error types for voxwork.
//!
//! This module defines all error types used throughout the library.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`VoxelError`].
pub type Result<T> = std::result::Result<T, VoxelError>;

/// Errors that can occur while loading, voxelizing, or comparing shapes.
#[derive(Error, Debug)]
pub enum VoxelError {
    /// Two grids that must share a shape do not.
    #[error("grid shape mismatch: {left:?} vs {right:?}")]
    ShapeMismatch {
        /// Shape of the first grid.
        left: [usize; 3],
        /// Shape of the second grid.
        right: [usize; 3],
    },

    /// A padding target is smaller than the grid in some dimension.
    #[error("cannot pad grid of shape {shape:?} to smaller target {target:?}")]
    PadTooSmall {
        /// Shape of the grid being padded.
        shape: [usize; 3],
        /// Requested target shape.
        target: [usize; 3],
    },

    /// Occupancy data length does not match the declared grid shape.
    #[error("shape {shape:?} needs {expected} cells but {actual} were provided")]
    DataLength {
        /// Declared shape.
        shape: [usize; 3],
        /// Number of cells implied by the shape.
        expected: usize,
        /// Number of cells provided.
        actual: usize,
    },

    /// A cost matrix entry is NaN or infinite.
    #[error("cost matrix entry ({row}, {col}) is not finite: {value}")]
    InvalidCost {
        /// Row of the offending entry.
        row: usize,
        /// Column of the offending entry.
        col: usize,
        /// The offending value.
        value: f64,
    },

    /// The mesh has no faces.
    #[error("mesh has no faces")]
    EmptyMesh,

    /// A face references a vertex that does not exist.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error loading mesh from file.
    #[error("failed to load mesh from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Error saving mesh to file.
    #[error("failed to save mesh to {path}: {message}")]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },

    /// A grid would hold more cells than allowed.
    #[error("grid of shape {shape:?} exceeds the limit of {max_cells} cells")]
    GridTooLarge {
        /// Requested shape; axes that do not fit in `usize` saturate.
        shape: [usize; 3],
        /// Largest allowed cell count.
        max_cells: usize,
    },

    /// The worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),

    /// Algorithm failed to converge.
    #[error("algorithm failed to converge after {iterations} iterations")]
    ConvergenceFailed {
        /// Number of iterations attempted.
        iterations: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl VoxelError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        VoxelError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}
