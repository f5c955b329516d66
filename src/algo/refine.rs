//! Uniform (global) refinement.
//!
//! Every active cell is split isotropically into `2^DIM` children: a
//! quadrilateral into four, a hexahedron into eight. New vertices appear at
//! edge midpoints, face centres and cell centres. Each of them is created
//! exactly once, however many cells share the entity, so the refined mesh
//! stays conforming.
//!
//! # Geometry
//!
//! A new point is computed from the parent vertices spanning its entity.
//! If that entity lies on a face carrying a manifold id with an attached
//! [`Manifold`](crate::mesh::Manifold), the manifold places the point;
//! otherwise the cell's own manifold id is used, falling back to the flat
//! average. Child faces inherit boundary and manifold ids from their parent
//! face.
//!
//! # Example
//!
//! ```
//! use meshgen::algo::refine::{refine_global, RefineOptions};
//! use meshgen::generate::subdivided_hyper_rectangle;
//! use nalgebra::Point2;
//!
//! let mut tria = subdivided_hyper_rectangle(
//!     [3, 2],
//!     Point2::new(1.0, -1.0),
//!     Point2::new(4.0, 1.0),
//!     false,
//! ).unwrap();
//!
//! refine_global(&mut tria, &RefineOptions::new(2));
//! assert_eq!(tria.n_active_cells(), 6 * 16);
//! ```

use std::collections::{BTreeMap, HashMap};

use nalgebra::Point;
use rayon::prelude::*;

use crate::algo::Progress;
use crate::mesh::cell::{child_lattice_point, children_per_cell, lattice_support, vertices_per_cell};
use crate::mesh::{
    CellData, FaceData, FaceKey, FlatManifold, Manifold, ManifoldId,
    Triangulation, FLAT_MANIFOLD_ID,
};

/// Options for global refinement.
#[derive(Debug, Clone)]
pub struct RefineOptions {
    /// Number of refinement levels to apply.
    pub levels: usize,

    /// Whether to compute new vertex positions in parallel (default: true).
    pub parallel: bool,
}

impl RefineOptions {
    /// Create options for the given number of levels.
    pub fn new(levels: usize) -> Self {
        Self {
            levels,
            parallel: true,
        }
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for RefineOptions {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Refine every active cell `options.levels` times.
///
/// After `n` levels a 2D triangulation has `4^n` times as many active cells
/// and a 3D triangulation `8^n` times as many.
pub fn refine_global<const DIM: usize>(tria: &mut Triangulation<DIM>, options: &RefineOptions) {
    refine_global_with_progress(tria, options, &Progress::none());
}

/// Global refinement with progress reporting.
pub fn refine_global_with_progress<const DIM: usize>(
    tria: &mut Triangulation<DIM>,
    options: &RefineOptions,
    progress: &Progress,
) {
    if options.levels == 0 || tria.is_empty() {
        return;
    }

    for level in 0..options.levels {
        progress.report(level, options.levels, "Refining");
        refine_once(tria, options.parallel);
        log::debug!(
            "refined {}D triangulation, level {}: {} active cells, {} vertices",
            DIM,
            tria.n_levels() - 1,
            tria.n_active_cells(),
            tria.n_vertices()
        );
    }
    progress.finish(options.levels, "Refining");
}

/// Identity of a sub-entity: the sorted parent vertices spanning it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
struct EntityKey([usize; 8]);

impl EntityKey {
    fn new(vertices: &[usize]) -> Self {
        let mut key = [usize::MAX; 8];
        key[..vertices.len()].copy_from_slice(vertices);
        key.sort_unstable();
        Self(key)
    }
}

/// How to compute a new vertex.
struct NewVertex {
    support: Vec<usize>,
    manifold_id: ManifoldId,
}

/// Reference lattice shared by all cells of one dimension.
struct Lattice {
    /// Parent-local support of each lattice point (`3^dim` of them).
    support: Vec<Vec<usize>>,
    /// Lattice point of each (child, vertex) pair.
    child_vertices: Vec<Vec<usize>>,
}

impl Lattice {
    fn new(dim: usize) -> Self {
        let n_points = 3usize.pow(dim as u32);
        let support = (0..n_points)
            .map(|i| lattice_support(dim, Self::decode(i)))
            .collect();
        let child_vertices = (0..children_per_cell(dim))
            .map(|c| {
                (0..vertices_per_cell(dim))
                    .map(|v| Self::encode(child_lattice_point(dim, c, v)))
                    .collect()
            })
            .collect();
        Self {
            support,
            child_vertices,
        }
    }

    fn decode(index: usize) -> [u8; 3] {
        [(index % 3) as u8, ((index / 3) % 3) as u8, ((index / 9) % 3) as u8]
    }

    fn encode(point: [u8; 3]) -> usize {
        point[0] as usize + 3 * point[1] as usize + 9 * point[2] as usize
    }
}

/// Manifold ids of every sub-entity lying on a tagged face.
fn entity_manifolds<const DIM: usize>(tria: &Triangulation<DIM>) -> HashMap<EntityKey, ManifoldId> {
    let face_lattice = Lattice::new(DIM - 1);
    let mut map = HashMap::new();
    for face in tria.faces.values() {
        if face.manifold_id == FLAT_MANIFOLD_ID {
            continue;
        }
        for support in face_lattice.support.iter().filter(|s| s.len() > 1) {
            let global: Vec<usize> = support.iter().map(|&lv| face.vertices[lv]).collect();
            map.entry(EntityKey::new(&global)).or_insert(face.manifold_id);
        }
    }
    map
}

/// Perform one level of global refinement.
fn refine_once<const DIM: usize>(tria: &mut Triangulation<DIM>, parallel: bool) {
    let lattice = Lattice::new(DIM);
    let on_manifold = entity_manifolds(tria);

    let parents = tria.active_cells();
    let n_old = tria.vertices.len();
    let mut created: HashMap<EntityKey, usize> = HashMap::new();
    let mut recipes: Vec<NewVertex> = Vec::new();
    let mut children: Vec<CellData> = Vec::with_capacity(parents.len() * children_per_cell(DIM));
    let mut lattice_vertex = vec![0usize; lattice.support.len()];

    for (pi, parent) in parents.iter().enumerate() {
        for (slot, support) in lattice_vertex.iter_mut().zip(&lattice.support) {
            if support.len() == 1 {
                *slot = parent.vertices[support[0]];
                continue;
            }
            let global: Vec<usize> = support.iter().map(|&lv| parent.vertices[lv]).collect();
            let key = EntityKey::new(&global);
            *slot = *created.entry(key).or_insert_with(|| {
                recipes.push(NewVertex {
                    manifold_id: on_manifold.get(&key).copied().unwrap_or(parent.manifold_id),
                    support: global,
                });
                n_old + recipes.len() - 1
            });
        }

        for child in &lattice.child_vertices {
            children.push(CellData {
                vertices: child.iter().map(|&m| lattice_vertex[m]).collect(),
                material_id: parent.material_id,
                manifold_id: parent.manifold_id,
                parent: Some(pi),
                level: parent.level + 1,
            });
        }
    }

    let vertices = &tria.vertices;
    let manifolds = &tria.manifolds;
    let place = |recipe: &NewVertex| -> Point<f64, DIM> {
        let points: Vec<Point<f64, DIM>> = recipe.support.iter().map(|&v| vertices[v]).collect();
        let weights = vec![1.0 / points.len() as f64; points.len()];
        match manifolds.get(&recipe.manifold_id) {
            Some(manifold) => manifold.new_point(&points, &weights),
            None => FlatManifold.new_point(&points, &weights),
        }
    };
    let new_points: Vec<Point<f64, DIM>> = if parallel {
        recipes.par_iter().map(place).collect()
    } else {
        recipes.iter().map(place).collect()
    };

    tria.vertices.extend(new_points);
    tria.levels.push(children);
    tria.faces = refine_faces(DIM - 1, &tria.faces, &created);
}

/// Split every tagged face into its children, keeping the tags.
fn refine_faces(
    face_dim: usize,
    faces: &BTreeMap<FaceKey, FaceData>,
    created: &HashMap<EntityKey, usize>,
) -> BTreeMap<FaceKey, FaceData> {
    let mut refined = BTreeMap::new();
    if faces.is_empty() {
        return refined;
    }
    let lattice = Lattice::new(face_dim);

    for face in faces.values() {
        let resolve = |support: &Vec<usize>| -> Option<usize> {
            if support.len() == 1 {
                return Some(face.vertices[support[0]]);
            }
            let global: Vec<usize> = support.iter().map(|&lv| face.vertices[lv]).collect();
            created.get(&EntityKey::new(&global)).copied()
        };
        let points: Option<Vec<usize>> = lattice.support.iter().map(resolve).collect();
        let Some(points) = points else {
            log::debug!("dropping tags of face {:?}: not a face of any cell", face.vertices);
            continue;
        };

        for child in &lattice.child_vertices {
            let vertices: Vec<usize> = child.iter().map(|&m| points[m]).collect();
            refined.insert(
                FaceKey::new(&vertices),
                FaceData {
                    vertices,
                    boundary_id: face.boundary_id,
                    manifold_id: face.manifold_id,
                },
            );
        }
    }
    refined
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{build_from_hexes, build_from_quads, PolarManifold};
    use nalgebra::{Point2, Point3};

    fn unit_square() -> Triangulation<2> {
        let vertices = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 1.0),
        ];
        build_from_quads(&vertices, &[[0, 1, 2, 3]]).unwrap()
    }

    fn two_cubes() -> Triangulation<3> {
        let mut vertices = Vec::new();
        for z in 0..2 {
            for y in 0..2 {
                for x in 0..3 {
                    vertices.push(Point3::new(x as f64, y as f64, z as f64));
                }
            }
        }
        let idx = |x: usize, y: usize, z: usize| z * 6 + y * 3 + x;
        let hex = |x: usize| {
            [
                idx(x, 0, 0),
                idx(x + 1, 0, 0),
                idx(x, 1, 0),
                idx(x + 1, 1, 0),
                idx(x, 0, 1),
                idx(x + 1, 0, 1),
                idx(x, 1, 1),
                idx(x + 1, 1, 1),
            ]
        };
        build_from_hexes(&vertices, &[hex(0), hex(1)]).unwrap()
    }

    #[test]
    fn test_zero_levels_is_noop() {
        let mut tria = unit_square();
        refine_global(&mut tria, &RefineOptions::new(0));
        assert_eq!(tria.n_active_cells(), 1);
        assert_eq!(tria.n_levels(), 1);
    }

    #[test]
    fn test_square_once() {
        let mut tria = unit_square();
        refine_global(&mut tria, &RefineOptions::new(1));

        assert_eq!(tria.n_active_cells(), 4);
        assert_eq!(tria.n_cells(), 5);
        assert_eq!(tria.n_levels(), 2);
        // 4 corners + 4 edge midpoints + 1 centre
        assert_eq!(tria.n_vertices(), 9);
        assert!(tria.is_valid());
        assert!((tria.total_measure() - 1.0).abs() < 1e-12);
        assert!(tria.active_cells().iter().all(|c| c.parent() == Some(0) && c.level() == 1));
    }

    #[test]
    fn test_square_scaling() {
        let mut tria = unit_square();
        refine_global(&mut tria, &RefineOptions::new(3));
        assert_eq!(tria.n_active_cells(), 64);
        // (2^3 + 1)^2 vertices on a structured grid
        assert_eq!(tria.n_vertices(), 81);
        assert!(tria.is_valid());
    }

    #[test]
    fn test_shared_entities_created_once() {
        let mut tria = two_cubes();
        refine_global(&mut tria, &RefineOptions::new(1));

        assert_eq!(tria.n_active_cells(), 16);
        // 5 x 3 x 3 lattice
        assert_eq!(tria.n_vertices(), 45);
        assert!(tria.is_valid());
        assert!((tria.total_measure() - 2.0).abs() < 1e-12);
        assert_eq!(tria.boundary_faces().len(), 2 * 4 * 5);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut a = two_cubes();
        let mut b = two_cubes();
        refine_global(&mut a, &RefineOptions::new(2));
        refine_global(&mut b, &RefineOptions::new(2).sequential());

        assert_eq!(a.vertices(), b.vertices());
        assert_eq!(a.active_cells(), b.active_cells());
    }

    #[test]
    fn test_refine_after_rejected_tag() {
        let mut tria = crate::generate::cheese([1, 1]).unwrap();
        // opposite corners of the plate share no cell
        assert!(tria.set_boundary_id(&[0, 15], 3).is_err());

        refine_global(&mut tria, &RefineOptions::new(1));
        assert_eq!(tria.n_active_cells(), 8 * 4);
        assert_eq!(tria.tagged_faces().count(), 0);
    }

    #[test]
    fn test_tags_inherited() {
        let mut tria = unit_square();
        tria.set_boundary_id(&[0, 1], 4).unwrap();
        tria.cell_mut(crate::mesh::CellId::new(0)).material_id = 2;
        refine_global(&mut tria, &RefineOptions::new(2));

        let tagged: Vec<_> = tria.tagged_faces().collect();
        assert_eq!(tagged.len(), 4);
        assert!(tagged.iter().all(|f| f.boundary_id == 4));
        assert!(tagged
            .iter()
            .all(|f| f.vertices.iter().all(|&v| tria.vertices()[v].y == 0.0)));
        assert!(tria.active_cells().iter().all(|c| c.material_id == 2));
    }

    #[test]
    fn test_manifold_places_boundary_points() {
        // quarter annulus, radii 1 and 2
        let vertices = vec![
            Point2::new(2.0, 0.0),
            Point2::new(0.0, 2.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        ];
        let mut tria = build_from_quads(&vertices, &[[0, 1, 2, 3]]).unwrap();
        tria.set_manifold_id(&[2, 3], 0).unwrap();
        tria.set_manifold(0, PolarManifold::new(Point2::origin()));

        refine_global(&mut tria, &RefineOptions::new(2));

        let inner: Vec<usize> = tria
            .tagged_faces()
            .flat_map(|f| f.vertices.clone())
            .collect();
        assert_eq!(tria.tagged_faces().count(), 4);
        for v in inner {
            let r = tria.vertices()[v].coords.norm();
            assert!((r - 1.0).abs() < 1e-12, "vertex {} at radius {}", v, r);
        }
    }

    #[test]
    fn test_progress_steps() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let progress = Progress::new(move |_, _, _| {
            counter.fetch_add(1, Ordering::Relaxed);
        });

        let mut tria = unit_square();
        refine_global_with_progress(&mut tria, &RefineOptions::new(3), &progress);
        // one report per level plus the final one
        assert_eq!(calls.load(Ordering::Relaxed), 4);
    }
}
