//! End-to-end runs of the fixed builders.

use approx::assert_relative_eq;
use meshgen::builders::{hamburg, BuildOptions, Builder};
use meshgen::io::vtk;
use meshgen::prelude::*;

fn sequential() -> BuildOptions {
    BuildOptions::new().with_parallel(false)
}

#[test]
fn hamburg_grid_is_closed_and_uniform() {
    let tria = hamburg::coarse_grid().unwrap();
    assert_eq!(tria.n_vertices(), hamburg::N_VERTICES);
    assert_eq!(tria.n_active_cells(), hamburg::N_CELLS);
    assert!(tria
        .active_cells()
        .iter()
        .flat_map(|c| c.vertices.iter())
        .all(|&v| v < hamburg::N_VERTICES));
    assert_relative_eq!(tria.total_measure(), 244.0 * 4.0e6, max_relative = 1e-12);
}

#[test]
fn extrusion_triples_cells() {
    for builder in Builder::ALL {
        let surface = builder.coarse_surface().unwrap();
        let recipe = builder.recipe();
        let volume = extrude_triangulation(
            &surface,
            recipe.n_layers,
            recipe.height,
            &ExtrudeOptions::default(),
        )
        .unwrap();
        assert_eq!(volume.n_active_cells(), 3 * surface.n_active_cells(), "{}", builder);
        assert_eq!(volume.n_vertices(), 4 * surface.n_vertices(), "{}", builder);
    }
}

#[test]
fn refinement_scales_cell_counts() {
    let pair = Builder::ShiftCube.build(&sequential()).unwrap();
    let coarse = Builder::ShiftCube.coarse_surface().unwrap().n_active_cells();
    let levels = Builder::ShiftCube.recipe().refinements as u32;

    assert_eq!(pair.surface.n_active_cells(), coarse * 4usize.pow(levels));
    assert_eq!(pair.volume.n_active_cells(), 3 * coarse * 8usize.pow(levels));
}

#[test]
fn run_writes_loadable_files() {
    let dir = tempfile::tempdir().unwrap();
    let reports = Builder::Hamburg.run(dir.path(), &sequential()).unwrap();
    assert_eq!(reports.len(), 2);

    assert_eq!(reports[0].path, dir.path().join("Hamburg_2D.vtk"));
    assert_eq!(reports[1].path, dir.path().join("Hamburg_3D.vtk"));

    for (report, dim) in reports.iter().zip([2, 3]) {
        assert!(std::fs::metadata(&report.path).unwrap().len() > 0);
        assert_eq!(report.info.dimension, dim);

        let grid = vtk::load(&report.path).unwrap();
        assert_eq!(grid.dimension(), dim);
        assert_eq!(grid.n_cells_of_dimension(dim), report.info.n_active_cells);
    }

    let grid = vtk::load(&reports[1].path).unwrap();
    let volume = grid.into_triangulation::<3>().unwrap();
    assert_relative_eq!(volume.total_measure(), 244.0 * 4.0e6 * 1500.0, max_relative = 1e-12);
}

#[test]
fn run_creates_output_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("out").join("meshes");
    let reports = Builder::Hamburg.run(&nested, &sequential()).unwrap();
    assert!(reports.iter().all(|r| r.path.starts_with(&nested) && r.path.exists()));
}

#[test]
fn reruns_are_byte_identical() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();

    let a = Builder::ShiftCube.run(first.path(), &sequential()).unwrap();
    let b = Builder::ShiftCube.run(second.path(), &BuildOptions::new()).unwrap();

    for (ra, rb) in a.iter().zip(&b) {
        let bytes_a = std::fs::read(&ra.path).unwrap();
        let bytes_b = std::fs::read(&rb.path).unwrap();
        assert!(bytes_a == bytes_b, "{} differs", ra.path.display());
    }
}
