//! Axis-aligned rectangles and boxes.

use nalgebra::Point;

use crate::error::{MeshError, Result};
use crate::mesh::cell::{face_vertices, faces_per_cell, vertices_per_cell};
use crate::mesh::{create_triangulation, CellData, FaceData, SubCellData, Triangulation};

/// A single cell spanning the box with opposite corners `p1` and `p2`.
pub fn hyper_rectangle<const DIM: usize>(
    p1: Point<f64, DIM>,
    p2: Point<f64, DIM>,
    colorize: bool,
) -> Result<Triangulation<DIM>> {
    subdivided_hyper_rectangle([1; DIM], p1, p2, colorize)
}

/// A structured grid of `repetitions[d]` cells along each axis.
///
/// The corners may be given in any order; they are normalised so that cells
/// are positively oriented. Vertices are numbered with x varying fastest.
///
/// With `colorize`, boundary faces get the id `2 * d + s` where `d` is the
/// axis they are normal to and `s` is 0 on the low side and 1 on the high
/// side: x-min 0, x-max 1, y-min 2, y-max 3, z-min 4, z-max 5.
///
/// # Example
///
/// ```
/// use meshgen::generate::subdivided_hyper_rectangle;
/// use nalgebra::Point2;
///
/// let tria = subdivided_hyper_rectangle(
///     [3, 2],
///     Point2::new(1.0, -1.0),
///     Point2::new(4.0, 1.0),
///     false,
/// ).unwrap();
/// assert_eq!(tria.n_vertices(), 12);
/// assert_eq!(tria.n_active_cells(), 6);
/// ```
pub fn subdivided_hyper_rectangle<const DIM: usize>(
    repetitions: [usize; DIM],
    p1: Point<f64, DIM>,
    p2: Point<f64, DIM>,
    colorize: bool,
) -> Result<Triangulation<DIM>> {
    let mut lo = p1;
    let mut hi = p2;
    for d in 0..DIM {
        if repetitions[d] == 0 {
            return Err(MeshError::invalid_param(
                "repetitions",
                format!("{:?}", repetitions),
                "every direction needs at least one cell",
            ));
        }
        if p1[d] == p2[d] {
            return Err(MeshError::invalid_param(
                "corners",
                format!("{} and {}", p1, p2),
                "box has zero extent",
            ));
        }
        lo[d] = p1[d].min(p2[d]);
        hi[d] = p1[d].max(p2[d]);
    }

    let points_per_axis: Vec<usize> = repetitions.iter().map(|&r| r + 1).collect();
    let point_stride = strides(&points_per_axis);
    let n_points: usize = points_per_axis.iter().product();

    let vertices: Vec<Point<f64, DIM>> = (0..n_points)
        .map(|i| {
            let mut p = lo;
            for d in 0..DIM {
                let k = (i / point_stride[d]) % points_per_axis[d];
                p[d] = lo[d] + (hi[d] - lo[d]) * k as f64 / repetitions[d] as f64;
            }
            p
        })
        .collect();

    let cell_stride = strides(&repetitions);
    let n_cells: usize = repetitions.iter().product();
    let mut cells = Vec::with_capacity(n_cells);
    let mut subcell = SubCellData::default();

    for c in 0..n_cells {
        let index: Vec<usize> = (0..DIM)
            .map(|d| (c / cell_stride[d]) % repetitions[d])
            .collect();
        let base: usize = (0..DIM).map(|d| index[d] * point_stride[d]).sum();
        let corners: Vec<usize> = (0..vertices_per_cell(DIM))
            .map(|v| base + (0..DIM).map(|d| ((v >> d) & 1) * point_stride[d]).sum::<usize>())
            .collect();

        if colorize {
            for face in 0..faces_per_cell(DIM) {
                let (axis, side) = (face / 2, face % 2);
                let on_boundary = if side == 0 {
                    index[axis] == 0
                } else {
                    index[axis] + 1 == repetitions[axis]
                };
                if on_boundary {
                    subcell.faces.push(
                        FaceData::new(
                            face_vertices(DIM, face).iter().map(|&lv| corners[lv]).collect(),
                        )
                        .with_boundary_id(face as u32),
                    );
                }
            }
        }

        cells.push(CellData::new(corners));
    }

    create_triangulation(vertices, cells, subcell)
}

/// Offsets of a row-major (first axis fastest) multi-index.
fn strides(extent: &[usize]) -> Vec<usize> {
    let mut stride = Vec::with_capacity(extent.len());
    let mut s = 1;
    for &n in extent {
        stride.push(s);
        s *= n;
    }
    stride
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Point2, Point3};

    #[test]
    fn test_unit_square() {
        let tria = hyper_rectangle(Point2::new(0.0, 0.0), Point2::new(1.0, 1.0), false).unwrap();
        assert_eq!(tria.n_vertices(), 4);
        assert_eq!(tria.active_cells()[0].vertices, vec![0, 1, 2, 3]);
        assert_relative_eq!(tria.total_measure(), 1.0);
    }

    #[test]
    fn test_subdivided_rect_numbering() {
        let tria = subdivided_hyper_rectangle(
            [3, 2],
            Point2::new(1.0, -1.0),
            Point2::new(4.0, 1.0),
            false,
        )
        .unwrap();

        assert_eq!(tria.n_vertices(), 12);
        assert_eq!(tria.n_active_cells(), 6);
        assert_eq!(tria.active_cells()[0].vertices, vec![0, 1, 4, 5]);
        assert_eq!(tria.active_cells()[5].vertices, vec![6, 7, 10, 11]);
        assert_eq!(tria.vertices()[5], Point2::new(2.0, 0.0));
        assert_relative_eq!(tria.total_measure(), 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_corners_normalised() {
        let tria = subdivided_hyper_rectangle(
            [2, 2],
            Point2::new(1.0, 1.0),
            Point2::new(-1.0, -1.0),
            false,
        )
        .unwrap();
        assert!(tria.is_valid());
        assert_eq!(tria.vertices()[0], Point2::new(-1.0, -1.0));
    }

    #[test]
    fn test_colorize() {
        let tria = subdivided_hyper_rectangle(
            [2, 1],
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 1.0),
            true,
        )
        .unwrap();

        assert_eq!(tria.boundary_id(&[0, 3]), Some(0));
        assert_eq!(tria.boundary_id(&[2, 5]), Some(1));
        assert_eq!(tria.boundary_id(&[0, 1]), Some(2));
        assert_eq!(tria.boundary_id(&[4, 5]), Some(3));
        assert_eq!(tria.max_boundary_id(), 3);
    }

    #[test]
    fn test_box() {
        let tria = subdivided_hyper_rectangle(
            [2, 2, 2],
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 2.0, 3.0),
            true,
        )
        .unwrap();

        assert_eq!(tria.n_vertices(), 27);
        assert_eq!(tria.n_active_cells(), 8);
        assert!(tria.is_valid());
        assert_relative_eq!(tria.total_measure(), 6.0, epsilon = 1e-12);
        assert_eq!(tria.max_boundary_id(), 5);
    }

    #[test]
    fn test_invalid_arguments() {
        assert!(subdivided_hyper_rectangle(
            [0, 2],
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
            false
        )
        .is_err());
        assert!(hyper_rectangle(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), false).is_err());
    }
}
