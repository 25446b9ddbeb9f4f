//! End-to-end batch comparison over mesh files on disk.

use nalgebra::Point3;
use tempfile::TempDir;
use voxwork::algo::batch::Stage;
use voxwork::io::{self, report, ArtifactDir};
use voxwork::mesh::box_mesh;
use voxwork::prelude::*;

fn write_box(dir: &TempDir, name: &str, max: [f64; 3]) {
    let mesh = box_mesh(Point3::origin(), Point3::new(max[0], max[1], max[2]));
    io::save(&mesh, dir.path().join(name)).unwrap();
}

fn shapes_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_box(&dir, "cube_a.obj", [2.0, 2.0, 2.0]);
    write_box(&dir, "cube_b.stl", [2.0, 2.0, 2.0]);
    write_box(&dir, "slab.obj", [4.0, 3.0, 1.0]);
    std::fs::write(dir.path().join("broken.obj"), "this is not a mesh\n").unwrap();
    std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
    dir
}

#[test]
fn test_compare_directory() {
    let dir = shapes_dir();
    let files = io::find_mesh_files(dir.path()).unwrap();
    assert_eq!(files.len(), 4);

    let loader = MeshVoxelizer::new(LoadOptions::default().with_align(false));
    let batch = BatchComparator::new(BatchOptions::default())
        .run_files(&files, &loader)
        .unwrap();

    let names: Vec<&str> = batch.outcomes.iter().map(|o| o.name()).collect();
    assert_eq!(names, vec!["broken.obj", "cube_a.obj", "cube_b.stl", "slab.obj"]);

    let failure = batch.failures().next().unwrap();
    assert_eq!(failure.name, "broken.obj");
    assert_eq!(failure.stage, Stage::Load);
    assert_eq!(batch.compared().count(), 3);

    // Same geometry through different formats voxelizes identically.
    let a = batch.get("cube_a.obj").unwrap();
    let b = batch.get("cube_b.stl").unwrap();
    assert_eq!(a.compactness, b.compactness);

    let reference_name = batch.reference.clone().unwrap();
    let reference = batch.get(&reference_name).unwrap();
    assert!(reference.is_reference);
    assert_eq!(reference.positive_voxels, 0);
    assert_eq!(reference.total_work, 0.0);

    let scores: Vec<Compactness> = batch.compared().map(|r| r.compactness).collect();
    let best = select_reference(&scores).unwrap();
    assert_eq!(batch.compared().nth(best).unwrap().name, reference_name);

    // Every result matches a direct pairwise comparison of the loaded grids.
    let reference_grid = loader.load(&dir.path().join(&reference_name)).unwrap();
    for result in batch.compared() {
        let grid = loader.load(&dir.path().join(&result.name)).unwrap();
        let (positive, work) = compare_pair(&reference_grid.grid, &grid.grid, Some(2)).unwrap();
        assert_eq!(result.positive_voxels, positive, "{}", result.name);
        assert!((result.total_work - work).abs() < 1e-9, "{}", result.name);
    }
}

#[test]
fn test_reports_and_artifacts() {
    let dir = shapes_dir();
    let out = TempDir::new().unwrap();
    let files = io::find_mesh_files(dir.path()).unwrap();

    let artifacts = ArtifactDir::default()
        .with_cad(out.path().join("cad"))
        .with_cost_matrices(out.path().join("costs"));
    artifacts.create_dirs().unwrap();

    let loader = MeshVoxelizer::new(LoadOptions::default());
    let batch = BatchComparator::new(BatchOptions::default().with_threads(2))
        .with_sink(&artifacts)
        .run_files(&files, &loader)
        .unwrap();

    let csv_path = out.path().join("report.csv");
    report::save_csv(&batch, &csv_path).unwrap();
    let csv = std::fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], report::CSV_HEADER);
    assert!(lines[1].starts_with("broken.obj,,,,"));
    assert!(lines[1].contains("failed: load:"));
    assert_eq!(lines.iter().filter(|l| l.ends_with(",reference")).count(), 1);

    let json_path = out.path().join("report.json");
    report::save_json(&batch, &json_path).unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(json["outcomes"].as_array().unwrap().len(), 4);

    let reference = batch.reference.clone().unwrap();
    assert!(out.path().join("cad").join(format!("{}.scr", reference)).is_file());

    for result in batch.compared().filter(|r| r.positive_voxels > 0) {
        let matrix = out.path().join("costs").join(format!("cost_matrix_{}.txt", result.name));
        let text = std::fs::read_to_string(&matrix).unwrap();
        let cols = text.lines().next().unwrap().split(' ').count();
        assert_eq!(cols, result.positive_voxels);
    }
}
