//! Vertex transformations.
//!
//! These functions move vertices without touching connectivity. They are
//! meant for coarse or refined triangulations alike; the caller is
//! responsible for keeping cells positively oriented.

use nalgebra::{Point, Point2, Rotation2, SVector};
use rayon::prelude::*;

use crate::mesh::Triangulation;

/// Apply `f` to every vertex, in parallel.
///
/// # Example
///
/// ```
/// use meshgen::algo::transform::transform;
/// use meshgen::generate::hyper_rectangle;
/// use nalgebra::Point2;
///
/// let mut tria = hyper_rectangle(Point2::new(0.0, 0.0), Point2::new(1.0, 1.0), false).unwrap();
/// transform(&mut tria, |p| Point2::new(p.x, p.y * p.y));
/// ```
pub fn transform<const DIM: usize, F>(tria: &mut Triangulation<DIM>, f: F)
where
    F: Fn(&Point<f64, DIM>) -> Point<f64, DIM> + Sync + Send,
{
    transform_with(tria, f, true);
}

/// Apply `f` to every vertex, on the rayon pool when `parallel` is set.
pub fn transform_with<const DIM: usize, F>(tria: &mut Triangulation<DIM>, f: F, parallel: bool)
where
    F: Fn(&Point<f64, DIM>) -> Point<f64, DIM> + Sync + Send,
{
    if parallel {
        tria.vertices.par_iter_mut().for_each(|p| *p = f(&*p));
    } else {
        tria.vertices.iter_mut().for_each(|p| *p = f(&*p));
    }
}

/// Translate every vertex by `offset`.
pub fn shift<const DIM: usize>(tria: &mut Triangulation<DIM>, offset: SVector<f64, DIM>) {
    transform(tria, |p| p + offset);
}

/// Scale every vertex about the origin.
pub fn scale<const DIM: usize>(tria: &mut Triangulation<DIM>, factor: f64) {
    transform(tria, |p| Point::from(p.coords * factor));
}

/// Rotate a 2D triangulation about the origin by `angle` radians.
pub fn rotate(tria: &mut Triangulation<2>, angle: f64) {
    let rotation = Rotation2::new(angle);
    transform(tria, |p: &Point2<f64>| rotation.transform_point(p));
}

/// Translate the vertices matching `predicate` by `offset`.
///
/// Each vertex is visited once, no matter how many cells share it. Returns
/// the number of vertices moved.
pub fn shift_vertices_where<const DIM: usize, P>(
    tria: &mut Triangulation<DIM>,
    predicate: P,
    offset: SVector<f64, DIM>,
) -> usize
where
    P: Fn(&Point<f64, DIM>) -> bool,
{
    let mut moved = 0;
    for p in tria.vertices.iter_mut().filter(|p| predicate(p)) {
        *p += offset;
        moved += 1;
    }
    moved
}
