//! Reference-cell geometry for tensor-product cells.
//!
//! Cells are lines, quadrilaterals or hexahedra whose vertices are stored in
//! lexicographic order: local vertex `v` sits at the reference coordinates
//! given by its bits, x in bit 0, y in bit 1, z in bit 2. Every topological
//! and geometric rule in this module is written once in terms of those bits
//! and therefore works for any dimension up to three.
//!
//! ```text
//!   2-------3        6-------7
//!   |       |       /|      /|
//!   |       |      4-------5 |
//!   |       |      | 2-----|-3
//!   0-------1      |/      |/
//!                  0-------1
//! ```

use nalgebra::Point;

/// Number of vertices of a cell of the given dimension.
#[inline]
pub const fn vertices_per_cell(dim: usize) -> usize {
    1 << dim
}

/// Number of vertices of a face of a cell of the given dimension.
#[inline]
pub const fn vertices_per_face(dim: usize) -> usize {
    1 << (dim - 1)
}

/// Number of faces of a cell of the given dimension.
#[inline]
pub const fn faces_per_cell(dim: usize) -> usize {
    2 * dim
}

/// Number of children created by isotropic refinement.
#[inline]
pub const fn children_per_cell(dim: usize) -> usize {
    1 << dim
}

/// Local vertex indices of face `face` in lexicographic face order.
///
/// Face `2 * d + s` is the face normal to axis `d` on side `s` (0 = low,
/// 1 = high). Its vertices are the cell vertices whose bit `d` equals `s`,
/// ordered by the remaining bits.
pub fn face_vertices(dim: usize, face: usize) -> Vec<usize> {
    debug_assert!(face < faces_per_cell(dim));
    let axis = face / 2;
    let side = face % 2;
    (0..vertices_per_cell(dim))
        .filter(|v| (v >> axis) & 1 == side)
        .collect()
}

/// Position of child `child`'s local vertex `vertex` on the refinement lattice.
///
/// Isotropic refinement places `3^dim` points on a lattice with coordinates
/// in `{0, 1, 2}` per axis; 0 and 2 are the parent's own vertices and 1 is a
/// midpoint along that axis.
#[inline]
pub fn child_lattice_point(dim: usize, child: usize, vertex: usize) -> [u8; 3] {
    let mut lattice = [0u8; 3];
    for (axis, slot) in lattice.iter_mut().enumerate().take(dim) {
        *slot = (((child >> axis) & 1) + ((vertex >> axis) & 1)) as u8;
    }
    lattice
}

/// Parent-local vertices spanning the sub-entity at a lattice point.
///
/// A lattice point with `k` coordinates equal to 1 is the centre of a
/// `k`-dimensional sub-entity (vertex, edge midpoint, face centre or cell
/// centre) and is spanned by `2^k` parent vertices.
pub fn lattice_support(dim: usize, lattice: [u8; 3]) -> Vec<usize> {
    let mut support = vec![0usize];
    for (axis, &m) in lattice.iter().enumerate().take(dim) {
        match m {
            0 => {}
            2 => support.iter_mut().for_each(|v| *v |= 1 << axis),
            _ => {
                let high: Vec<usize> = support.iter().map(|v| v | (1 << axis)).collect();
                support.extend(high);
            }
        }
    }
    support.sort_unstable();
    support
}

/// Multilinear shape function derivatives at reference point `xi`.
///
/// Returns the Jacobian matrix (row = physical coordinate, column =
/// reference direction) of the map from the unit cell to the cell with the
/// given vertices, padded to 3x3 with the identity.
fn jacobian<const DIM: usize>(points: &[Point<f64, DIM>], xi: [f64; 3]) -> [[f64; 3]; 3] {
    let mut j = [[0.0; 3]; 3];
    for (d, row) in j.iter_mut().enumerate().skip(DIM) {
        row[d] = 1.0;
    }

    for (v, p) in points.iter().enumerate() {
        for col in 0..DIM {
            // d/dxi_col of prod_k (bit_k ? xi_k : 1 - xi_k)
            let mut dn = if (v >> col) & 1 == 1 { 1.0 } else { -1.0 };
            for k in 0..DIM {
                if k != col {
                    dn *= if (v >> k) & 1 == 1 { xi[k] } else { 1.0 - xi[k] };
                }
            }
            for row in 0..DIM {
                j[row][col] += p[row] * dn;
            }
        }
    }
    j
}

fn determinant(m: [[f64; 3]; 3]) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

/// Jacobian determinants at each vertex of the cell.
///
/// A cell is correctly oriented and non-degenerate when all of them are
/// strictly positive.
pub fn corner_jacobians<const DIM: usize>(points: &[Point<f64, DIM>]) -> Vec<f64> {
    (0..points.len())
        .map(|v| {
            let mut xi = [0.0; 3];
            for (axis, x) in xi.iter_mut().enumerate().take(DIM) {
                *x = ((v >> axis) & 1) as f64;
            }
            determinant(jacobian(points, xi))
        })
        .collect()
}

/// Signed measure (length, area or volume) of a multilinear cell.
///
/// Integrates the Jacobian determinant with the two-point Gauss rule per
/// axis, which is exact for multilinear maps.
pub fn measure<const DIM: usize>(points: &[Point<f64, DIM>]) -> f64 {
    let g = 0.5 / 3f64.sqrt();
    let nodes = [0.5 - g, 0.5 + g];
    let weight = 1.0 / vertices_per_cell(DIM) as f64;

    (0..vertices_per_cell(DIM))
        .map(|q| {
            let mut xi = [0.0; 3];
            for (axis, x) in xi.iter_mut().enumerate().take(DIM) {
                *x = nodes[(q >> axis) & 1];
            }
            determinant(jacobian(points, xi)) * weight
        })
        .sum()
}

/// Permutation from lexicographic to VTK vertex order.
pub fn vtk_ordering(dim: usize) -> &'static [usize] {
    match dim {
        1 => &[0, 1],
        2 => &[0, 1, 3, 2],
        _ => &[0, 1, 3, 2, 4, 5, 7, 6],
    }
}

/// VTK cell type code of a cell with the given dimension.
pub fn vtk_cell_type(dim: usize) -> u8 {
    match dim {
        1 => 3,
        2 => 9,
        _ => 12,
    }
}
