//! Benchmarks for mesh operations.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use meshgen::prelude::*;
use meshgen::builders::hamburg;

fn bench_mesh_construction(c: &mut Criterion) {
    c.bench_function("hamburg_coarse_grid", |b| {
        b.iter(|| hamburg::coarse_grid().unwrap());
    });

    c.bench_function("cube_with_cylindrical_hole", |b| {
        b.iter(|| hyper_cube_with_cylindrical_hole(0.25, 1.0).unwrap());
    });

    c.bench_function("cheese_3x2", |b| {
        b.iter(|| cheese([3, 2]).unwrap());
    });
}

fn bench_extrusion(c: &mut Criterion) {
    let surface = hamburg::coarse_grid().unwrap();

    let mut group = c.benchmark_group("extrude_hamburg");
    for n_layers in [1, 3, 10] {
        group.bench_with_input(BenchmarkId::from_parameter(n_layers), &n_layers, |b, &n| {
            b.iter(|| extrude_triangulation(&surface, n, 1500.0, &ExtrudeOptions::default()).unwrap());
        });
    }
    group.finish();
}

fn bench_refinement(c: &mut Criterion) {
    let surface = hamburg::coarse_grid().unwrap();
    let volume = extrude_triangulation(&surface, 3, 1500.0, &ExtrudeOptions::default()).unwrap();

    let mut group = c.benchmark_group("refine_hamburg_3d");
    group.sample_size(10);
    for parallel in [true, false] {
        let label = if parallel { "parallel" } else { "sequential" };
        let options = RefineOptions::new(2).with_parallel(parallel);
        group.bench_function(label, |b| {
            b.iter(|| {
                let mut tria = volume.clone();
                refine_global(&mut tria, &options);
                tria
            });
        });
    }
    group.finish();

    let plane = hyper_cube_with_cylindrical_hole(0.25, 1.0).unwrap();
    c.bench_function("refine_cube_hole_2d_x4", |b| {
        b.iter(|| {
            let mut tria = plane.clone();
            refine_global(&mut tria, &RefineOptions::new(4));
            tria
        });
    });
}

criterion_group!(benches, bench_mesh_construction, bench_extrusion, bench_refinement);
criterion_main!(benches);
