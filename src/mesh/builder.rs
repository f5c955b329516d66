//! Triangulation construction utilities.
//!
//! This module builds coarse triangulations from explicit vertex and cell
//! lists, as produced by shape generators, hard-coded tables or mesh files.

use nalgebra::{Point, Point2, Point3};

use super::cell;
use super::triangulation::{CellData, FaceKey, SubCellData, Triangulation};
use crate::error::{MeshError, Result};

/// Build a coarse triangulation from vertices, cells and optional face tags.
///
/// Cell vertices are given in lexicographic order (see
/// [`cell`](super::cell)). Every cell is checked for vertex count, index
/// range, repeated vertices and orientation; the first violation is
/// reported.
///
/// # Example
/// ```
/// use meshgen::mesh::{create_triangulation, CellData, SubCellData, Triangulation2};
/// use nalgebra::Point2;
///
/// let vertices = vec![
///     Point2::new(0.0, 0.0),
///     Point2::new(1.0, 0.0),
///     Point2::new(0.0, 1.0),
///     Point2::new(1.0, 1.0),
/// ];
/// let cells = vec![CellData::new(vec![0, 1, 2, 3])];
///
/// let tria: Triangulation2 = create_triangulation(vertices, cells, SubCellData::default()).unwrap();
/// assert_eq!(tria.n_active_cells(), 1);
/// ```
pub fn create_triangulation<const DIM: usize>(
    vertices: Vec<Point<f64, DIM>>,
    cells: Vec<CellData>,
    subcell_data: SubCellData,
) -> Result<Triangulation<DIM>> {
    if cells.is_empty() {
        return Err(MeshError::EmptyMesh);
    }

    let expected = cell::vertices_per_cell(DIM);
    for (ci, c) in cells.iter().enumerate() {
        if c.vertices.len() != expected {
            return Err(MeshError::WrongVertexCount {
                cell: ci,
                found: c.vertices.len(),
                expected,
            });
        }
        for &vi in &c.vertices {
            if vi >= vertices.len() {
                return Err(MeshError::InvalidVertexIndex { cell: ci, vertex: vi });
            }
        }
        for (i, &a) in c.vertices.iter().enumerate() {
            if c.vertices[i + 1..].contains(&a) {
                return Err(MeshError::DegenerateCell { cell: ci });
            }
        }

        let points: Vec<Point<f64, DIM>> = c.vertices.iter().map(|&v| vertices[v]).collect();
        if let Some((vertex, &jacobian)) = cell::corner_jacobians(&points)
            .iter()
            .enumerate()
            .find(|(_, &j)| j <= 0.0)
        {
            return Err(MeshError::InvertedCell {
                cell: ci,
                vertex,
                jacobian,
            });
        }
    }

    let mut tria = Triangulation::new();
    tria.vertices = vertices;
    tria.levels.push(
        cells
            .into_iter()
            .map(|mut c| {
                c.parent = None;
                c.level = 0;
                c
            })
            .collect(),
    );

    let face_len = cell::vertices_per_face(DIM);
    let cell_faces = tria.face_keys();
    for (fi, face) in subcell_data.faces.into_iter().enumerate() {
        if face.vertices.len() != face_len {
            return Err(MeshError::invalid_param(
                "subcell face",
                fi,
                "face has the wrong number of vertices",
            ));
        }
        if let Some(&vertex) = face.vertices.iter().find(|&&v| v >= tria.vertices.len()) {
            return Err(MeshError::InvalidVertexIndex { cell: fi, vertex });
        }
        let key = FaceKey::new(&face.vertices);
        if !cell_faces.contains(&key) {
            return Err(MeshError::invalid_param(
                "subcell face",
                fi,
                "not a face of any cell",
            ));
        }
        tria.tag_face(key, &face.vertices, |f| {
            f.boundary_id = face.boundary_id;
            f.manifold_id = face.manifold_id;
        });
    }

    log::debug!(
        "created {}D triangulation: {} vertices, {} cells, {} tagged faces",
        DIM,
        tria.n_vertices(),
        tria.n_active_cells(),
        tria.faces.len()
    );

    Ok(tria)
}

/// Build a 2D triangulation from vertices and quadrilaterals.
///
/// # Arguments
/// * `vertices` - List of vertex positions
/// * `cells` - List of quads, each as `[v0, v1, v2, v3]` in lexicographic order
pub fn build_from_quads(vertices: &[Point2<f64>], cells: &[[usize; 4]]) -> Result<Triangulation<2>> {
    create_triangulation(
        vertices.to_vec(),
        cells.iter().map(|c| CellData::new(c.to_vec())).collect(),
        SubCellData::default(),
    )
}

/// Build a 3D triangulation from vertices and hexahedra.
///
/// # Arguments
/// * `vertices` - List of vertex positions
/// * `cells` - List of hexahedra, each as eight indices in lexicographic order
pub fn build_from_hexes(vertices: &[Point3<f64>], cells: &[[usize; 8]]) -> Result<Triangulation<3>> {
    create_triangulation(
        vertices.to_vec(),
        cells.iter().map(|c| CellData::new(c.to_vec())).collect(),
        SubCellData::default(),
    )
}

/// Convert the active cells back to a vertex/cell list representation.
///
/// Returns (vertices, cells) tuple.
pub fn to_cell_vertex<const DIM: usize>(
    tria: &Triangulation<DIM>,
) -> (Vec<Point<f64, DIM>>, Vec<Vec<usize>>) {
    let cells = tria
        .active_cells()
        .iter()
        .map(|c| c.vertices.clone())
        .collect();
    (tria.vertices().to_vec(), cells)
}

/// Face tags of a triangulation as [`SubCellData`], for rebuilding.
pub fn to_subcell_data<const DIM: usize>(tria: &Triangulation<DIM>) -> SubCellData {
    SubCellData {
        faces: tria.tagged_faces().cloned().collect(),
    }
}
