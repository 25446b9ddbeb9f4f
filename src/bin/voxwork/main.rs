//! Voxwork CLI - voxel shape comparison tool.
//!
//! Usage: voxwork <COMMAND> [OPTIONS] <INPUT> [OUTPUT]
//!
//! Run `voxwork --help` for available commands.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use log::info;

use voxwork::algo::batch::{BatchComparator, BatchOptions, ShapeOutcome};
use voxwork::algo::compactness::compactness;
use voxwork::algo::Progress;
use voxwork::io::{self, cad, report, ArtifactDir, LoadOptions, MeshVoxelizer};
use voxwork::mesh::{
    align_principal_axes, scale_to_voxel_volume, voxel_volume, voxelize, ScaleOptions, VoxelizeOptions,
    DEFAULT_MAX_CELLS,
};

#[derive(Parser)]
#[command(name = "voxwork")]
#[command(author, version, about = "Voxel shape comparison CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that voxelizes a mesh.
#[derive(Args, Clone)]
struct VoxelArgs {
    /// Voxel edge length
    #[arg(short, long, default_value = "1.0")]
    pitch: f64,

    /// Fill the interior of closed meshes
    #[arg(long)]
    fill: bool,

    /// Skip principal-axis alignment
    #[arg(long)]
    no_align: bool,

    /// Reject shapes whose grid would exceed this many cells
    #[arg(long, default_value_t = DEFAULT_MAX_CELLS)]
    max_cells: usize,
}

impl VoxelArgs {
    fn voxelize_options(&self) -> VoxelizeOptions {
        VoxelizeOptions::default()
            .with_pitch(self.pitch)
            .with_fill(self.fill)
            .with_max_cells(self.max_cells)
    }

    fn load_options(&self) -> LoadOptions {
        LoadOptions::default()
            .with_align(!self.no_align)
            .with_voxelize(self.voxelize_options())
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Rank every mesh in a directory and compare each against the most compact one
    Compare {
        /// Directory containing .obj / .stl files
        dir: PathBuf,

        #[command(flatten)]
        voxel: VoxelArgs,

        /// Write the report as CSV
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the report as JSON
        #[arg(long)]
        json: Option<PathBuf>,

        /// Decimals to round costs to before solving
        #[arg(long, default_value = "2")]
        decimals: u32,

        /// Solve on exact distances instead of rounded ones
        #[arg(long, conflicts_with = "decimals")]
        exact: bool,

        /// Directory for cost matrix dumps
        #[arg(long)]
        cost_matrices: Option<PathBuf>,

        /// Directory for CAD scripts of every compared grid
        #[arg(long)]
        cad: Option<PathBuf>,

        /// Number of worker threads (default: all cores)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Use single-threaded execution
        #[arg(long)]
        sequential: bool,

        /// Stop scheduling new shapes after the first failure
        #[arg(long)]
        fail_fast: bool,
    },

    /// Print the compactness of each mesh
    Compactness {
        /// Input mesh files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        voxel: VoxelArgs,
    },

    /// Display mesh and voxelization information
    Info {
        /// Input mesh file
        input: PathBuf,

        #[command(flatten)]
        voxel: VoxelArgs,
    },

    /// Write a CAD box script for a voxelized mesh
    Cad {
        /// Input mesh file
        input: PathBuf,

        /// Output script file
        output: PathBuf,

        #[command(flatten)]
        voxel: VoxelArgs,
    },

    /// Scale a mesh until its voxelized volume matches a target
    Scale {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// Target voxel volume
        #[arg(short, long)]
        target: f64,

        /// Accepted absolute deviation from the target
        #[arg(long, default_value = "100.0")]
        tolerance: f64,

        /// Maximum number of rescaling steps
        #[arg(long, default_value = "50")]
        max_iterations: usize,

        /// Voxel edge length
        #[arg(short, long, default_value = "1.0")]
        pitch: f64,

        /// Measure filled volume instead of surface voxels
        #[arg(long)]
        fill: bool,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Compare {
            dir,
            voxel,
            output,
            json,
            decimals,
            exact,
            cost_matrices,
            cad,
            threads,
            sequential,
            fail_fast,
        } => {
            let mut options = BatchOptions::default()
                .with_parallel(!sequential)
                .with_decimals(if exact { None } else { Some(decimals) })
                .with_fail_fast(fail_fast);
            if let Some(threads) = threads {
                options = options.with_threads(threads);
            }
            let artifacts = ArtifactDir {
                cost_matrices,
                cad,
            };
            cmd_compare(&dir, &voxel, options, &artifacts, output.as_deref(), json.as_deref())?;
        }

        Commands::Compactness { files, voxel } => {
            cmd_compactness(&files, &voxel)?;
        }

        Commands::Info { input, voxel } => {
            cmd_info(&input, &voxel)?;
        }

        Commands::Cad {
            input,
            output,
            voxel,
        } => {
            cmd_cad(&input, &output, &voxel)?;
        }

        Commands::Scale {
            input,
            output,
            target,
            tolerance,
            max_iterations,
            pitch,
            fill,
        } => {
            let options = ScaleOptions::default()
                .with_tolerance(tolerance)
                .with_max_iterations(max_iterations)
                .with_voxelize(VoxelizeOptions::default().with_pitch(pitch).with_fill(fill));
            cmd_scale(&input, &output, target, &options)?;
        }
    }

    Ok(())
}

/// Create a progress reporter that displays a progress bar on the terminal.
fn create_progress() -> Progress {
    let max_percent = Arc::new(AtomicUsize::new(0)); // Track highest percent seen (monotonic)

    Progress::new(move |current, total, message| {
        if total == 0 {
            return;
        }

        let raw_percent = if current >= total {
            100
        } else {
            ((current * 100) + (total / 2)) / total
        };

        // Workers finish out of order; only move forward.
        let previous = max_percent.fetch_max(raw_percent, Ordering::Relaxed);
        if raw_percent <= previous && raw_percent != 100 {
            return;
        }
        let percent = raw_percent.max(previous);

        let bar_width = 30;
        let filled = (percent * bar_width) / 100;
        let bar = "=".repeat(filled);
        let space = " ".repeat(bar_width - filled);

        eprint!("\r[{}{}] {:3}% {:<40}", bar, space, percent, message);
        let _ = std::io::stderr().flush();

        if current >= total {
            eprintln!();
        }
    })
}

fn cmd_compare(
    dir: &Path,
    voxel: &VoxelArgs,
    options: BatchOptions,
    artifacts: &ArtifactDir,
    output: Option<&Path>,
    json: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let files = io::find_mesh_files(dir)?;
    if files.is_empty() {
        return Err(format!("no .obj or .stl files in {}", dir.display()).into());
    }
    artifacts.create_dirs()?;

    let mode = if options.parallel { "parallel" } else { "sequential" };
    println!("Comparing {} shapes in {} ({})...", files.len(), dir.display(), mode);

    let loader = MeshVoxelizer::new(voxel.load_options());
    let progress = create_progress();

    let start = Instant::now();
    let batch = BatchComparator::new(options)
        .with_sink(artifacts)
        .with_progress(&progress)
        .run_files(&files, &loader)?;
    let elapsed = start.elapsed();

    println!("\nCompactness:");
    for outcome in &batch.outcomes {
        match outcome {
            ShapeOutcome::Compared(r) => println!("  {}: {}", r.name, r.compactness),
            ShapeOutcome::Failed(f) => println!("  {}: failed ({}: {})", f.name, f.stage, f.reason),
        }
    }

    match &batch.reference {
        Some(name) => println!("\nReference: {}", name),
        None => println!("\nReference: none (no shape has a defined compactness)"),
    }

    println!("\n{:<30} {:>10} {:>14}", "Shape", "Positive", "Work");
    for r in batch.compared() {
        println!("{:<30} {:>10} {:>14.2}", r.name, r.positive_voxels, r.total_work);
    }
    println!("\nDone in {:.2?}", elapsed);

    if let Some(path) = output {
        report::save_csv(&batch, path)?;
        info!("wrote {}", path.display());
    }
    if let Some(path) = json {
        report::save_json(&batch, path)?;
        info!("wrote {}", path.display());
    }

    let failed = batch.failures().count();
    if failed > 0 {
        return Err(format!("{} of {} shapes failed", failed, batch.outcomes.len()).into());
    }

    Ok(())
}

fn cmd_compactness(files: &[PathBuf], voxel: &VoxelArgs) -> Result<(), Box<dyn std::error::Error>> {
    let options = voxel.load_options();
    for path in files {
        let shape = io::load_shape(path, &options)?;
        println!("{}: {}", path.display(), compactness(&shape.grid));
    }
    Ok(())
}

fn cmd_info(input: &Path, voxel: &VoxelArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = io::load(input)?;

    println!("File: {}", input.display());
    println!("Vertices: {}", mesh.num_vertices());
    println!("Faces: {}", mesh.num_faces());
    println!("Volume: {:.6}", mesh.volume());

    let mesh = if voxel.no_align {
        mesh
    } else {
        align_principal_axes(&mesh)
    };
    let extents = mesh.extents();
    println!("Extents: {:.3} x {:.3} x {:.3}", extents.x, extents.y, extents.z);

    let grid = voxelize(&mesh, &voxel.voxelize_options())?;
    let [nx, ny, nz] = grid.shape();
    println!("Grid: {} x {} x {} (pitch {})", nx, ny, nz, voxel.pitch);
    println!("Voxels: {}", grid.count());
    println!("Voxel volume: {:.3}", voxel_volume(&grid, voxel.pitch));
    println!("Compactness: {}", compactness(&grid));

    Ok(())
}

fn cmd_cad(input: &Path, output: &Path, voxel: &VoxelArgs) -> Result<(), Box<dyn std::error::Error>> {
    let shape = io::load_shape(input, &voxel.load_options())?;

    let mut writer = BufWriter::new(File::create(output)?);
    cad::write_cad_script(&mut writer, &shape.grid)?;
    writer.flush()?;

    println!("Saved: {} ({} boxes)", output.display(), shape.grid.count());
    Ok(())
}

fn cmd_scale(
    input: &Path,
    output: &Path,
    target: f64,
    options: &ScaleOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = io::load(input)?;
    println!("Loaded: {} vertices, {} faces", mesh.num_vertices(), mesh.num_faces());

    let start = Instant::now();
    let (scaled, volume) = scale_to_voxel_volume(&mesh, target, options)?;
    let elapsed = start.elapsed();

    println!("Voxel volume: {:.3} (target {:.3} ± {})", volume, target, options.tolerance);
    io::save(&scaled, output)?;
    println!("Saved: {} ({:.2?})", output.display(), elapsed);

    Ok(())
}
