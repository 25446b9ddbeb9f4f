//! Ranking and comparing a batch of shapes against a reference.
//!
//! A run proceeds in four steps:
//!
//! 1. **Load**: obtain every shape's voxel grid and compute its compactness.
//!    Shapes are independent, so this runs on the worker pool.
//! 2. **Select reference**: the shape with the strictly greatest defined
//!    compactness; ties go to the shape seen first.
//! 3. **Compare**: normalize every shape against the reference, compute the
//!    exclusive voxel sets and, unless the shape is the reference itself, the
//!    minimum-cost matching of the reference's voxels onto the candidate's
//!    exclusive voxels ("work").
//! 4. **Aggregate**: one [`ShapeOutcome`] per input, in input order.
//!
//! Tasks only read their own shape and the shared reference. Each task returns
//! its outcome by value and the coordinating thread collects them, so no
//! shared mutable state is written during the parallel phases.
//!
//! A failing shape (unreadable file, precondition violation during the
//! comparison) is recorded as a [`ShapeFailure`] and the rest of the batch
//! proceeds. With [`BatchOptions::fail_fast`] the first failure cancels every
//! task that has not started yet.
//!
//! # Example
//!
//! ```
//! use voxwork::algo::batch::{BatchComparator, BatchOptions};
//! use voxwork::grid::VoxelGrid;
//!
//! let mut dented = VoxelGrid::filled([3, 3, 3]);
//! dented.set([1, 1, 2], false);
//! let shapes = vec![
//!     ("cube".to_string(), VoxelGrid::filled([3, 3, 3])),
//!     ("dented".to_string(), dented),
//! ];
//!
//! let report = BatchComparator::new(BatchOptions::default()).run_grids(shapes).unwrap();
//! assert_eq!(report.reference.as_deref(), Some("dented"));
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use log::{debug, info, warn};
use nalgebra::Vector3;
use rayon::prelude::*;
use serde::Serialize;

use crate::error::{Result, VoxelError};
use crate::grid::{normalize_pair, set_difference, SetDifference, VoxelGrid};

use super::assignment::solve;
use super::compactness::{compactness, Compactness};
use super::cost::{build_cost_matrix, CostMatrix};
use super::Progress;

/// A voxelized shape together with scalar properties of its mesh.
#[derive(Debug, Clone)]
pub struct LoadedShape {
    /// Occupancy grid at the configured pitch.
    pub grid: VoxelGrid,
    /// Enclosed mesh volume.
    pub volume: f64,
    /// Bounding box side lengths after alignment.
    pub extents: Vector3<f64>,
}

/// Source of shapes for file-based batches.
pub trait ShapeLoader: Sync {
    /// Produce the voxelized shape stored at `path`.
    fn load(&self, path: &Path) -> Result<LoadedShape>;
}

/// Normalized grids of one comparison, handed to an [`ArtifactSink`].
#[derive(Debug, Clone, Copy)]
pub struct ComparisonGrids<'a> {
    /// Reference grid padded to the common shape.
    pub reference: &'a VoxelGrid,
    /// Candidate grid padded to the common shape.
    pub candidate: &'a VoxelGrid,
    /// Exclusive sets of reference (`exclusive_a`) and candidate (`exclusive_b`).
    pub difference: &'a SetDifference,
    /// Whether this is the reference compared against itself.
    pub is_reference: bool,
}

/// Receiver for debug and export artifacts produced during comparison.
///
/// Both hooks default to doing nothing. Errors are logged and do not fail the
/// comparison.
pub trait ArtifactSink: Sync {
    /// Called with the normalized grids of every comparison, including the
    /// reference against itself.
    fn comparison(&self, _reference: &str, _candidate: &str, _grids: ComparisonGrids<'_>) -> Result<()> {
        Ok(())
    }

    /// Called with the cost matrix that was solved for `candidate`.
    fn cost_matrix(&self, _candidate: &str, _matrix: &CostMatrix) -> Result<()> {
        Ok(())
    }
}

/// Options for a batch comparison.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Whether to run per-shape tasks on the worker pool (default: true).
    pub parallel: bool,

    /// Size of a dedicated worker pool. `None` uses rayon's global pool.
    pub threads: Option<usize>,

    /// Round costs to this many decimals before solving (default: 2).
    /// `None` solves on exact distances.
    pub decimals: Option<u32>,

    /// Cancel tasks that have not started once any shape fails (default: false).
    pub fail_fast: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            threads: None,
            decimals: Some(2),
            fail_fast: false,
        }
    }
}

impl BatchOptions {
    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Run on a dedicated pool with `threads` workers.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Set cost rounding.
    pub fn with_decimals(mut self, decimals: Option<u32>) -> Self {
        self.decimals = decimals;
        self
    }

    /// Set fail-fast cancellation.
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }
}

/// A loaded shape with its compactness.
#[derive(Debug, Clone)]
pub struct ShapeRecord {
    /// Identifier, usually the source file name.
    pub name: String,
    /// Occupancy grid.
    pub grid: VoxelGrid,
    /// Compactness score.
    pub compactness: Compactness,
}

/// Comparison of one shape against the reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    /// Shape identifier.
    pub name: String,
    /// Compactness score (`null` in JSON when undefined).
    pub compactness: Compactness,
    /// Voxels occupied by this shape but not by the reference.
    pub positive_voxels: usize,
    /// Minimum total distance matching reference voxels to the positive voxels.
    pub total_work: f64,
    /// Whether this shape is the reference.
    pub is_reference: bool,
}

/// Step at which a shape failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Loading or voxelizing.
    Load,
    /// Comparing against the reference.
    Compare,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Load => f.write_str("load"),
            Stage::Compare => f.write_str("compare"),
        }
    }
}

/// A shape excluded from the results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapeFailure {
    /// Shape identifier.
    pub name: String,
    /// Step that failed.
    pub stage: Stage,
    /// Human-readable cause.
    pub reason: String,
}

/// Final state of one input shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ShapeOutcome {
    /// The shape was compared against the reference.
    Compared(ComparisonResult),
    /// The shape could not be processed.
    Failed(ShapeFailure),
}

impl ShapeOutcome {
    /// Identifier of the shape.
    pub fn name(&self) -> &str {
        match self {
            ShapeOutcome::Compared(r) => &r.name,
            ShapeOutcome::Failed(f) => &f.name,
        }
    }
}

/// Aggregated result of a batch run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    /// Name of the reference shape, if any shape had a defined compactness.
    pub reference: Option<String>,
    /// One outcome per input shape, in input order.
    pub outcomes: Vec<ShapeOutcome>,
}

impl BatchReport {
    /// Successfully compared shapes.
    pub fn compared(&self) -> impl Iterator<Item = &ComparisonResult> {
        self.outcomes.iter().filter_map(|o| match o {
            ShapeOutcome::Compared(r) => Some(r),
            ShapeOutcome::Failed(_) => None,
        })
    }

    /// Failed shapes.
    pub fn failures(&self) -> impl Iterator<Item = &ShapeFailure> {
        self.outcomes.iter().filter_map(|o| match o {
            ShapeOutcome::Failed(f) => Some(f),
            ShapeOutcome::Compared(_) => None,
        })
    }

    /// Result for the shape named `name`.
    pub fn get(&self, name: &str) -> Option<&ComparisonResult> {
        self.compared().find(|r| r.name == name)
    }
}

/// Index of the shape with the strictly greatest defined compactness.
///
/// Undefined scores are skipped; among equal maxima the first one wins.
pub fn select_reference(scores: &[Compactness]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, score) in scores.iter().enumerate() {
        let Some(value) = score.value() else {
            continue;
        };
        if best.map_or(true, |(_, b)| value > b) {
            best = Some((i, value));
        }
    }
    best.map(|(i, _)| i)
}

/// Work needed to explain `candidate`'s voxels that are absent from `reference`.
///
/// Returns `(positive_voxels, total_work)`. Both grids are normalized first;
/// an empty exclusive set short-circuits to zero work without solving.
pub fn compare_pair(
    reference: &VoxelGrid,
    candidate: &VoxelGrid,
    decimals: Option<u32>,
) -> Result<(usize, f64)> {
    let (reference, candidate) = normalize_pair(reference, candidate)?;
    let difference = set_difference(&reference, &candidate)?;
    work_against(&reference, &difference.exclusive_b, decimals, |_| {})
}

fn work_against<F>(
    reference: &VoxelGrid,
    positive: &VoxelGrid,
    decimals: Option<u32>,
    on_matrix: F,
) -> Result<(usize, f64)>
where
    F: FnOnce(&CostMatrix),
{
    let targets = positive.coords();
    if targets.is_empty() {
        return Ok((0, 0.0));
    }

    let matrix = build_cost_matrix(&reference.coords(), &targets);
    let matrix = match decimals {
        Some(d) => matrix.rounded(d),
        None => matrix,
    };
    on_matrix(&matrix);

    Ok((targets.len(), solve(&matrix)?.total_work))
}

/// Orchestrates compactness ranking and comparison over a batch of shapes.
pub struct BatchComparator<'a> {
    options: BatchOptions,
    sink: Option<&'a dyn ArtifactSink>,
    progress: Option<&'a Progress>,
}

impl<'a> BatchComparator<'a> {
    /// Create a comparator with the given options.
    pub fn new(options: BatchOptions) -> Self {
        Self {
            options,
            sink: None,
            progress: None,
        }
    }

    /// Send artifacts of every comparison to `sink`.
    pub fn with_sink(mut self, sink: &'a dyn ArtifactSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Report progress through `progress`.
    pub fn with_progress(mut self, progress: &'a Progress) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Run over mesh files. Shapes are named by file name.
    pub fn run_files<L: ShapeLoader>(&self, paths: &[PathBuf], loader: &L) -> Result<BatchReport> {
        let names = paths
            .iter()
            .map(|p| {
                p.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| p.display().to_string())
            })
            .collect();
        self.install(|| {
            self.execute(names, |i| {
                let shape = loader.load(&paths[i])?;
                let e = shape.extents;
                debug!(
                    "{}: mesh volume {:.3}, extents {:.3} x {:.3} x {:.3}",
                    paths[i].display(),
                    shape.volume,
                    e.x,
                    e.y,
                    e.z
                );
                Ok(shape.grid)
            })
        })
    }

    /// Run over grids that are already in memory.
    pub fn run_grids(&self, shapes: Vec<(String, VoxelGrid)>) -> Result<BatchReport> {
        let (names, grids): (Vec<String>, Vec<VoxelGrid>) = shapes.into_iter().unzip();
        self.install(|| self.execute(names, |i| Ok(grids[i].clone())))
    }

    /// Run `f` on the configured worker pool.
    fn install<R, F>(&self, f: F) -> Result<R>
    where
        R: Send,
        F: FnOnce() -> R + Send,
    {
        match self.options.threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| VoxelError::ThreadPool(e.to_string()))?;
                Ok(pool.install(f))
            }
            None => Ok(f()),
        }
    }

    /// Apply `f` to every index, in parallel unless disabled. Output keeps index order.
    fn map_tasks<R, F>(&self, count: usize, f: F) -> Vec<R>
    where
        R: Send,
        F: Fn(usize) -> R + Sync + Send,
    {
        if self.options.parallel {
            (0..count).into_par_iter().map(f).collect()
        } else {
            (0..count).map(f).collect()
        }
    }

    fn report(&self, done: &AtomicUsize, total: usize, stage: usize, message: &str) {
        let current = done.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(progress) = self.progress {
            progress.report_stage(current, total, stage, 2, message);
        }
    }

    fn execute<F>(&self, names: Vec<String>, load: F) -> BatchReport
    where
        F: Fn(usize) -> Result<VoxelGrid> + Sync + Send,
    {
        let total = names.len();
        let cancelled = AtomicBool::new(false);
        let fail = |name: &str, stage: Stage, reason: String| {
            warn!("{} failed during {}: {}", name, stage, reason);
            if self.options.fail_fast {
                cancelled.store(true, Ordering::SeqCst);
            }
            ShapeFailure {
                name: name.to_string(),
                stage,
                reason,
            }
        };
        let cancellation = |name: &str, stage: Stage| ShapeFailure {
            name: name.to_string(),
            stage,
            reason: "cancelled after an earlier failure".to_string(),
        };

        info!("loading {} shapes", total);
        let loaded_count = AtomicUsize::new(0);
        let loaded: Vec<std::result::Result<ShapeRecord, ShapeFailure>> =
            self.map_tasks(total, |i| {
                let name = &names[i];
                let outcome = if cancelled.load(Ordering::SeqCst) {
                    Err(cancellation(name, Stage::Load))
                } else {
                    match load(i) {
                        Ok(grid) => {
                            let score = compactness(&grid);
                            debug!("{}: {} voxels, compactness {}", name, grid.count(), score);
                            Ok(ShapeRecord {
                                name: name.clone(),
                                grid,
                                compactness: score,
                            })
                        }
                        Err(e) => Err(fail(name, Stage::Load, e.to_string())),
                    }
                };
                self.report(&loaded_count, total, 0, name);
                outcome
            });

        let scores: Vec<Compactness> = loaded
            .iter()
            .map(|r| match r {
                Ok(record) => record.compactness,
                Err(_) => Compactness::Undefined { voxels: 0 },
            })
            .collect();

        let selected = select_reference(&scores)
            .and_then(|i| loaded[i].as_ref().ok().map(|record| (i, record)));
        let Some((reference_index, reference)) = selected else {
            warn!("no shape has a defined compactness; nothing to compare against");
            if let Some(progress) = self.progress {
                progress.report_stage(total, total, 1, 2, "no reference");
            }
            let outcomes = loaded
                .into_iter()
                .map(|r| {
                    ShapeOutcome::Failed(r.map_or_else(
                        |failure| failure,
                        |record| ShapeFailure {
                            name: record.name,
                            stage: Stage::Compare,
                            reason: "no shape with a defined compactness to use as reference"
                                .to_string(),
                        },
                    ))
                })
                .collect();
            return BatchReport {
                reference: None,
                outcomes,
            };
        };

        info!(
            "reference: {} (compactness {})",
            reference.name, reference.compactness
        );

        let compared_count = AtomicUsize::new(0);
        let outcomes = self.map_tasks(total, |i| {
            let outcome = match &loaded[i] {
                Err(failure) => ShapeOutcome::Failed(failure.clone()),
                Ok(record) if cancelled.load(Ordering::SeqCst) => {
                    ShapeOutcome::Failed(cancellation(&record.name, Stage::Compare))
                }
                Ok(record) => match self.compare_one(reference, record, i == reference_index) {
                    Ok(result) => {
                        debug!(
                            "{}: {} positive voxels, work {}",
                            result.name, result.positive_voxels, result.total_work
                        );
                        ShapeOutcome::Compared(result)
                    }
                    Err(e) => {
                        ShapeOutcome::Failed(fail(&record.name, Stage::Compare, e.to_string()))
                    }
                },
            };
            self.report(&compared_count, total, 1, &names[i]);
            outcome
        });

        let failed = outcomes
            .iter()
            .filter(|o| matches!(o, ShapeOutcome::Failed(_)))
            .count();
        info!("compared {} shapes, {} failed", total - failed, failed);

        BatchReport {
            reference: Some(reference.name.clone()),
            outcomes,
        }
    }

    fn compare_one(
        &self,
        reference: &ShapeRecord,
        candidate: &ShapeRecord,
        is_reference: bool,
    ) -> Result<ComparisonResult> {
        let (ref_grid, cand_grid) = normalize_pair(&reference.grid, &candidate.grid)?;
        let difference = set_difference(&ref_grid, &cand_grid)?;

        if let Some(sink) = self.sink {
            let grids = ComparisonGrids {
                reference: &ref_grid,
                candidate: &cand_grid,
                difference: &difference,
                is_reference,
            };
            if let Err(e) = sink.comparison(&reference.name, &candidate.name, grids) {
                warn!("failed to export grids for {}: {}", candidate.name, e);
            }
        }

        let (positive_voxels, total_work) = if is_reference {
            (0, 0.0)
        } else {
            work_against(
                &ref_grid,
                &difference.exclusive_b,
                self.options.decimals,
                |matrix| {
                    if let Some(sink) = self.sink {
                        if let Err(e) = sink.cost_matrix(&candidate.name, matrix) {
                            warn!("failed to export cost matrix for {}: {}", candidate.name, e);
                        }
                    }
                },
            )?
        };

        Ok(ComparisonResult {
            name: candidate.name.clone(),
            compactness: candidate.compactness,
            positive_voxels,
            total_work,
            is_reference,
        })
    }
}
