//! Union of two coarse triangulations.

use std::collections::HashMap;

use nalgebra::Point;

use crate::error::{MeshError, Result};
use crate::mesh::{
    create_triangulation, CellData, FaceData, SubCellData, Triangulation, FLAT_MANIFOLD_ID,
};

/// Options for [`merge_triangulations`].
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Vertices closer than this in every coordinate are merged.
    pub tolerance: f64,

    /// Copy cell and face manifold ids (default: false).
    pub copy_manifold_ids: bool,

    /// Copy face boundary ids (default: false).
    pub copy_boundary_ids: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            tolerance: 1e-12,
            copy_manifold_ids: false,
            copy_boundary_ids: false,
        }
    }
}

impl MergeOptions {
    /// Set the duplicate-vertex tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Keep manifold ids of cells and faces.
    pub fn with_manifold_ids(mut self) -> Self {
        self.copy_manifold_ids = true;
        self
    }

    /// Keep boundary ids of faces.
    pub fn with_boundary_ids(mut self) -> Self {
        self.copy_boundary_ids = true;
        self
    }
}

/// Merge two coarse triangulations into one.
///
/// The cells of `a` come first, followed by those of `b`. Vertices that
/// coincide within `options.tolerance` (max-norm) are merged, so the two
/// parts are connected where they touch. Material ids are always kept;
/// manifold and boundary ids only on request. Manifold objects are not
/// carried over and must be attached to the result again.
///
/// The touching parts must match vertex for vertex; the result would not be
/// conforming otherwise.
///
/// # Example
///
/// ```
/// use meshgen::generate::{
///     hyper_cube_with_cylindrical_hole, merge_triangulations, subdivided_hyper_rectangle,
///     MergeOptions,
/// };
/// use nalgebra::Point2;
///
/// let hole = hyper_cube_with_cylindrical_hole(0.25, 1.0).unwrap();
/// let rect = subdivided_hyper_rectangle(
///     [3, 2],
///     Point2::new(1.0, -1.0),
///     Point2::new(4.0, 1.0),
///     false,
/// ).unwrap();
///
/// let merged = merge_triangulations(&hole, &rect, &MergeOptions::default()).unwrap();
/// assert_eq!(merged.n_vertices(), 25);
/// assert_eq!(merged.n_active_cells(), 14);
/// ```
pub fn merge_triangulations<const DIM: usize>(
    a: &Triangulation<DIM>,
    b: &Triangulation<DIM>,
    options: &MergeOptions,
) -> Result<Triangulation<DIM>> {
    for tria in [a, b] {
        if !tria.is_coarse() {
            return Err(MeshError::NotCoarse {
                operation: "merge_triangulations",
                levels: tria.n_levels(),
            });
        }
    }
    if options.tolerance.is_nan() || options.tolerance < 0.0 {
        return Err(MeshError::invalid_param(
            "tolerance",
            options.tolerance,
            "must be non-negative",
        ));
    }

    let mut index = VertexIndex::new(options.tolerance, a.n_vertices() + b.n_vertices());
    let mut cells = Vec::with_capacity(a.n_active_cells() + b.n_active_cells());
    let mut subcell = SubCellData::default();

    for tria in [a, b] {
        let renumber: Vec<usize> = tria
            .vertices()
            .iter()
            .map(|p| index.find_or_add(*p))
            .collect();

        for c in tria.active_cells() {
            let mut cell = CellData::new(c.vertices.iter().map(|&v| renumber[v]).collect())
                .with_material_id(c.material_id);
            if options.copy_manifold_ids {
                cell.manifold_id = c.manifold_id;
            }
            cells.push(cell);
        }

        for f in tria.tagged_faces() {
            let mut face = FaceData::new(f.vertices.iter().map(|&v| renumber[v]).collect());
            if options.copy_boundary_ids {
                face.boundary_id = f.boundary_id;
            }
            if options.copy_manifold_ids {
                face.manifold_id = f.manifold_id;
            }
            if face.boundary_id != 0 || face.manifold_id != FLAT_MANIFOLD_ID {
                subcell.faces.push(face);
            }
        }
    }

    let vertices = index.vertices;
    log::debug!(
        "merged triangulations: {} + {} vertices -> {} vertices, {} cells",
        a.n_vertices(),
        b.n_vertices(),
        vertices.len(),
        cells.len()
    );

    create_triangulation(vertices, cells, subcell)
}

/// Merged vertices, hashed by grid cells at least as wide as the tolerance.
struct VertexIndex<const DIM: usize> {
    vertices: Vec<Point<f64, DIM>>,
    buckets: HashMap<[i64; DIM], Vec<usize>>,
    tolerance: f64,
    cell_size: f64,
}

impl<const DIM: usize> VertexIndex<DIM> {
    fn new(tolerance: f64, capacity: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(capacity),
            buckets: HashMap::with_capacity(capacity),
            tolerance,
            cell_size: (2.0 * tolerance).max(1e-9),
        }
    }

    fn bucket(&self, p: &Point<f64, DIM>) -> [i64; DIM] {
        std::array::from_fn(|d| (p[d] / self.cell_size).floor() as i64)
    }

    /// Index of the earliest vertex within tolerance of `p`, adding `p` if
    /// there is none.
    fn find_or_add(&mut self, p: Point<f64, DIM>) -> usize {
        let home = self.bucket(&p);

        // home bucket and its 3^DIM - 1 neighbours
        let mut found: Option<usize> = None;
        for n in 0..3usize.pow(DIM as u32) {
            let mut key = home;
            let mut rest = n;
            for k in key.iter_mut() {
                *k = k.saturating_add((rest % 3) as i64 - 1);
                rest /= 3;
            }
            let Some(candidates) = self.buckets.get(&key) else {
                continue;
            };
            for &i in candidates {
                if (self.vertices[i] - p).amax() <= self.tolerance {
                    found = Some(found.map_or(i, |f| f.min(i)));
                }
            }
        }
        if let Some(i) = found {
            return i;
        }

        let i = self.vertices.len();
        self.vertices.push(p);
        self.buckets.entry(home).or_default().push(i);
        i
    }
}
