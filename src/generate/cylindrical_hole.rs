//! Square with a circular hole.

use std::f64::consts::PI;

use nalgebra::Point2;

use crate::error::{MeshError, Result};
use crate::mesh::{
    create_triangulation, CellData, FaceData, ManifoldId, PolarManifold, SubCellData, Triangulation2,
};

/// Number of cells around the hole.
const N_SECTORS: usize = 8;

/// Manifold id of the hole boundary.
pub const HOLE_MANIFOLD_ID: ManifoldId = 0;

/// The square `[-outer_radius, outer_radius]^2` with a hole of `inner_radius`
/// around the origin.
///
/// The mesh is a ring of eight cells. Vertices `0..8` lie on the square
/// (corners at odd indices) and vertices `8..16` on the hole, both numbered
/// counter-clockwise from the positive x axis. Faces on the hole carry
/// manifold id [`HOLE_MANIFOLD_ID`] with a [`PolarManifold`] attached, so
/// refinement keeps them on the circle.
///
/// # Example
///
/// ```
/// use meshgen::generate::hyper_cube_with_cylindrical_hole;
///
/// let tria = hyper_cube_with_cylindrical_hole(0.25, 1.0).unwrap();
/// assert_eq!(tria.n_vertices(), 16);
/// assert_eq!(tria.n_active_cells(), 8);
/// ```
pub fn hyper_cube_with_cylindrical_hole(
    inner_radius: f64,
    outer_radius: f64,
) -> Result<Triangulation2> {
    if inner_radius.is_nan() || inner_radius <= 0.0 {
        return Err(MeshError::invalid_param(
            "inner_radius",
            inner_radius,
            "must be positive",
        ));
    }
    if outer_radius.is_nan() || outer_radius <= inner_radius {
        return Err(MeshError::invalid_param(
            "outer_radius",
            outer_radius,
            "must be larger than the inner radius",
        ));
    }

    let direction = |i: usize| {
        let angle = 2.0 * PI * i as f64 / N_SECTORS as f64;
        (angle.cos(), angle.sin())
    };

    let mut vertices = Vec::with_capacity(2 * N_SECTORS);
    for i in 0..N_SECTORS {
        let (x, y) = direction(i);
        if i % 2 == 1 {
            // diagonal directions land on the square's corners
            vertices.push(Point2::new(
                outer_radius * x.signum(),
                outer_radius * y.signum(),
            ));
        } else {
            vertices.push(Point2::new(
                round_off(outer_radius * x),
                round_off(outer_radius * y),
            ));
        }
    }
    for i in 0..N_SECTORS {
        let (x, y) = direction(i);
        vertices.push(Point2::new(inner_radius * x, inner_radius * y));
    }

    let mut cells = Vec::with_capacity(N_SECTORS);
    let mut subcell = SubCellData::default();
    for i in 0..N_SECTORS {
        let next = (i + 1) % N_SECTORS;
        cells.push(CellData::new(vec![i, next, N_SECTORS + i, N_SECTORS + next]));
        subcell.faces.push(
            FaceData::new(vec![N_SECTORS + i, N_SECTORS + next]).with_manifold_id(HOLE_MANIFOLD_ID),
        );
    }

    let mut tria = create_triangulation(vertices, cells, subcell)?;
    tria.set_manifold(HOLE_MANIFOLD_ID, PolarManifold::new(Point2::origin()));
    Ok(tria)
}

/// Snap values within rounding distance of zero to exactly zero.
fn round_off(x: f64) -> f64 {
    if x.abs() < 1e-12 {
        0.0
    } else {
        x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::refine::{refine_global, RefineOptions};
    use approx::assert_relative_eq;

    #[test]
    fn test_layout() {
        let tria = hyper_cube_with_cylindrical_hole(0.25, 1.0).unwrap();

        assert_eq!(tria.n_vertices(), 16);
        assert_eq!(tria.n_active_cells(), 8);
        assert!(tria.is_valid());
        assert_eq!(tria.vertices()[0], Point2::new(1.0, 0.0));
        assert_eq!(tria.vertices()[1], Point2::new(1.0, 1.0));
        assert_eq!(tria.vertices()[2], Point2::new(0.0, 1.0));
        assert_eq!(tria.vertices()[5], Point2::new(-1.0, -1.0));
        assert_relative_eq!(tria.vertices()[10].coords.norm(), 0.25, epsilon = 1e-15);

        let (min, max) = tria.bounding_box().unwrap();
        assert_eq!(min, Point2::new(-1.0, -1.0));
        assert_eq!(max, Point2::new(1.0, 1.0));
    }

    #[test]
    fn test_coarse_area() {
        let tria = hyper_cube_with_cylindrical_hole(0.25, 1.0).unwrap();
        // square minus the inscribed octagon
        let octagon = 2.0 * 2f64.sqrt() * 0.25 * 0.25;
        assert_relative_eq!(tria.total_measure(), 4.0 - octagon, epsilon = 1e-12);
    }

    #[test]
    fn test_hole_tags() {
        let tria = hyper_cube_with_cylindrical_hole(0.25, 1.0).unwrap();
        assert_eq!(tria.tagged_faces().count(), 8);
        assert_eq!(tria.manifold_id(&[8, 9]), Some(HOLE_MANIFOLD_ID));
        assert!(tria.manifold(HOLE_MANIFOLD_ID).is_some());
        assert_eq!(tria.boundary_faces().len(), 16);
    }

    #[test]
    fn test_refined_hole_approaches_circle() {
        let mut tria = hyper_cube_with_cylindrical_hole(0.25, 1.0).unwrap();
        refine_global(&mut tria, &RefineOptions::new(3));

        assert_eq!(tria.n_active_cells(), 8 * 64);
        let hole = std::f64::consts::PI * 0.25 * 0.25;
        assert_relative_eq!(tria.total_measure(), 4.0 - hole, epsilon = 1e-3);
        for face in tria.tagged_faces() {
            for &v in &face.vertices {
                assert_relative_eq!(tria.vertices()[v].coords.norm(), 0.25, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_invalid_radii() {
        assert!(hyper_cube_with_cylindrical_hole(0.0, 1.0).is_err());
        assert!(hyper_cube_with_cylindrical_hole(1.0, 1.0).is_err());
        assert!(hyper_cube_with_cylindrical_hole(2.0, 1.0).is_err());
    }
}
