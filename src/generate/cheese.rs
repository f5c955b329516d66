//! Rectangular plate with a regular pattern of square holes.

use nalgebra::Point2;

use crate::error::{MeshError, Result};
use crate::mesh::{create_triangulation, CellData, SubCellData, Triangulation2};

/// A grid of unit cells with `holes[0] x holes[1]` square holes.
///
/// The plate spans `[0, 2 * holes[0] + 1] x [0, 2 * holes[1] + 1]`. Every
/// cell whose column and row are both odd is left out, which leaves each
/// hole surrounded by a ring of cells.
///
/// # Example
///
/// ```
/// use meshgen::generate::cheese;
///
/// let tria = cheese([3, 2]).unwrap();
/// assert_eq!(tria.n_vertices(), 48);
/// assert_eq!(tria.n_active_cells(), 29);
/// ```
pub fn cheese(holes: [usize; 2]) -> Result<Triangulation2> {
    if holes.contains(&0) {
        return Err(MeshError::invalid_param(
            "holes",
            format!("{:?}", holes),
            "need at least one hole per direction",
        ));
    }

    let nx = 2 * holes[0] + 1;
    let ny = 2 * holes[1] + 1;

    let mut vertices = Vec::with_capacity((nx + 1) * (ny + 1));
    for j in 0..=ny {
        for i in 0..=nx {
            vertices.push(Point2::new(i as f64, j as f64));
        }
    }

    let mut cells = Vec::new();
    for j in 0..ny {
        for i in 0..nx {
            if i % 2 == 1 && j % 2 == 1 {
                continue;
            }
            let n00 = j * (nx + 1) + i;
            let n01 = n00 + nx + 1;
            cells.push(CellData::new(vec![n00, n00 + 1, n01, n01 + 1]));
        }
    }

    create_triangulation(vertices, cells, SubCellData::default())
}
