//! Extrusion of planar quadrilateral meshes into hexahedral layers.

use nalgebra::Point3;

use crate::error::{MeshError, Result};
use crate::mesh::{
    create_triangulation, CellData, FaceData, FaceKey, SubCellData, Triangulation2,
    Triangulation3, FLAT_MANIFOLD_ID,
};

/// Options for [`extrude_triangulation`].
#[derive(Debug, Clone, Default)]
pub struct ExtrudeOptions {
    /// Copy manifold ids of cells and boundary faces to the extruded mesh
    /// (default: false).
    pub copy_manifold_ids: bool,
}

impl ExtrudeOptions {
    /// Keep manifold ids of cells and lateral faces.
    pub fn with_manifold_ids(mut self) -> Self {
        self.copy_manifold_ids = true;
        self
    }
}

/// Extrude a coarse 2D triangulation into `n_layers` layers of hexahedra
/// between `z = 0` and `z = height`.
///
/// Vertex `v` of the input at slice `s` becomes vertex `s * n + v`, where
/// `n` is the input's vertex count. Cells are numbered input cell first,
/// then layer. The result has `n_layers` times as many cells.
///
/// Lateral boundary faces keep the boundary id of the 2D face they come
/// from. The bottom face gets `b + 1` and the top face `b + 2`, where `b` is
/// the largest boundary id of the input. Material ids are kept.
///
/// # Example
///
/// ```
/// use meshgen::generate::{cheese, extrude_triangulation, ExtrudeOptions};
///
/// let plate = cheese([3, 2]).unwrap();
/// let block = extrude_triangulation(&plate, 3, 2.0, &ExtrudeOptions::default()).unwrap();
/// assert_eq!(block.n_active_cells(), 3 * 29);
/// ```
pub fn extrude_triangulation(
    input: &Triangulation2,
    n_layers: usize,
    height: f64,
    options: &ExtrudeOptions,
) -> Result<Triangulation3> {
    if !input.is_coarse() {
        return Err(MeshError::NotCoarse {
            operation: "extrude_triangulation",
            levels: input.n_levels(),
        });
    }
    if n_layers == 0 {
        return Err(MeshError::invalid_param(
            "n_layers",
            n_layers,
            "need at least one layer",
        ));
    }
    if height.is_nan() || height <= 0.0 {
        return Err(MeshError::invalid_param("height", height, "must be positive"));
    }

    let n = input.n_vertices();
    let mut vertices = Vec::with_capacity(n * (n_layers + 1));
    for s in 0..=n_layers {
        let z = height * s as f64 / n_layers as f64;
        vertices.extend(input.vertices().iter().map(|p| Point3::new(p.x, p.y, z)));
    }

    let lift = |vs: &[usize], s: usize| -> Vec<usize> {
        vs.iter()
            .map(|&v| v + s * n)
            .chain(vs.iter().map(|&v| v + (s + 1) * n))
            .collect()
    };

    let bottom_id = input.max_boundary_id() + 1;
    let top_id = bottom_id + 1;

    let mut cells = Vec::with_capacity(input.n_active_cells() * n_layers);
    let mut subcell = SubCellData::default();
    for c in input.active_cells() {
        for s in 0..n_layers {
            let mut cell = CellData::new(lift(&c.vertices, s)).with_material_id(c.material_id);
            if options.copy_manifold_ids {
                cell.manifold_id = c.manifold_id;
            }
            cells.push(cell);
        }

        let bottom: Vec<usize> = c.vertices.clone();
        let top: Vec<usize> = c.vertices.iter().map(|&v| v + n_layers * n).collect();
        subcell.faces.push(FaceData::new(bottom).with_boundary_id(bottom_id));
        subcell.faces.push(FaceData::new(top).with_boundary_id(top_id));
    }

    for face in input.boundary_faces() {
        let tags = input.faces.get(&FaceKey::new(&face.vertices));
        let boundary_id = tags.map_or(0, |f| f.boundary_id);
        let manifold_id = match tags {
            Some(f) if options.copy_manifold_ids => f.manifold_id,
            _ => FLAT_MANIFOLD_ID,
        };
        if boundary_id == 0 && manifold_id == FLAT_MANIFOLD_ID {
            continue;
        }
        for s in 0..n_layers {
            subcell.faces.push(FaceData {
                vertices: lift(&face.vertices, s),
                boundary_id,
                manifold_id,
            });
        }
    }

    let tria = create_triangulation(vertices, cells, subcell)?;
    log::debug!(
        "extruded {} cells into {} layers: {} hexahedra",
        input.n_active_cells(),
        n_layers,
        tria.n_active_cells()
    );
    Ok(tria)
}
