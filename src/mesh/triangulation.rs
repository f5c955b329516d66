//! The triangulation data structure.
//!
//! A [`Triangulation`] owns vertex positions and a hierarchy of cells. Level
//! 0 holds the coarse cells it was created with; every global refinement
//! appends a level whose cells point back at their parents. Only cells on the
//! finest level are *active*: they are what geometry queries and file output
//! operate on.
//!
//! Faces are not stored explicitly. A face is identified by its vertices
//! ([`FaceKey`]) and only faces carrying a non-default boundary id or a
//! manifold id are recorded.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use nalgebra::Point;

use super::cell;
use crate::error::{MeshError, Result};
use super::index::{
    BoundaryId, CellId, ManifoldId, MaterialId, VertexId, FLAT_MANIFOLD_ID,
    INTERNAL_FACE_BOUNDARY_ID,
};
use super::manifold::Manifold;

/// A 2D triangulation of quadrilaterals.
pub type Triangulation2 = Triangulation<2>;

/// A 3D triangulation of hexahedra.
pub type Triangulation3 = Triangulation<3>;

/// A cell: vertex indices in lexicographic order plus tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellData {
    /// Global vertex indices, `2^DIM` of them, in lexicographic order.
    pub vertices: Vec<usize>,
    /// Material id, copied to children on refinement.
    pub material_id: MaterialId,
    /// Manifold used for points created in the cell interior.
    pub manifold_id: ManifoldId,
    pub(crate) parent: Option<usize>,
    pub(crate) level: usize,
}

impl CellData {
    /// Create a coarse cell with default tags.
    pub fn new(vertices: Vec<usize>) -> Self {
        Self {
            vertices,
            material_id: 0,
            manifold_id: FLAT_MANIFOLD_ID,
            parent: None,
            level: 0,
        }
    }

    /// Set the material id.
    pub fn with_material_id(mut self, material_id: MaterialId) -> Self {
        self.material_id = material_id;
        self
    }

    /// Set the manifold id.
    pub fn with_manifold_id(mut self, manifold_id: ManifoldId) -> Self {
        self.manifold_id = manifold_id;
        self
    }

    /// Index of the parent cell on the previous level.
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// Refinement level of the cell.
    pub fn level(&self) -> usize {
        self.level
    }
}

/// Tags of a face, with its vertices in lexicographic face order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaceData {
    /// Global vertex indices of the face.
    pub vertices: Vec<usize>,
    /// Boundary id of the face.
    pub boundary_id: BoundaryId,
    /// Manifold id of the face.
    pub manifold_id: ManifoldId,
}

impl FaceData {
    /// Create face data with default tags.
    pub fn new(vertices: Vec<usize>) -> Self {
        Self {
            vertices,
            boundary_id: 0,
            manifold_id: FLAT_MANIFOLD_ID,
        }
    }

    /// Set the boundary id.
    pub fn with_boundary_id(mut self, boundary_id: BoundaryId) -> Self {
        self.boundary_id = boundary_id;
        self
    }

    /// Set the manifold id.
    pub fn with_manifold_id(mut self, manifold_id: ManifoldId) -> Self {
        self.manifold_id = manifold_id;
        self
    }

    fn is_default(&self) -> bool {
        self.boundary_id == 0 && self.manifold_id == FLAT_MANIFOLD_ID
    }
}

/// Optional face tags supplied when a triangulation is created.
#[derive(Debug, Clone, Default)]
pub struct SubCellData {
    /// Tagged faces.
    pub faces: Vec<FaceData>,
}

/// Order-independent identity of a face: its sorted vertex indices.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceKey([usize; 4]);

impl FaceKey {
    /// Build the key of a face with one to four vertices.
    pub fn try_new(vertices: &[usize]) -> Option<Self> {
        if vertices.is_empty() || vertices.len() > 4 {
            return None;
        }
        let mut key = [usize::MAX; 4];
        key[..vertices.len()].copy_from_slice(vertices);
        key.sort_unstable();
        Some(Self(key))
    }

    /// Key of a face taken from a cell, which has at most four vertices.
    pub(crate) fn new(vertices: &[usize]) -> Self {
        let mut key = [usize::MAX; 4];
        key[..vertices.len()].copy_from_slice(vertices);
        key.sort_unstable();
        Self(key)
    }

    /// The sorted vertex indices.
    pub fn vertices(&self) -> &[usize] {
        let n = self.0.iter().take_while(|&&v| v != usize::MAX).count();
        &self.0[..n]
    }
}

/// A face of an active cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Face {
    /// The active cell the face belongs to.
    pub cell: CellId,
    /// Local face number within the cell.
    pub face_no: usize,
    /// Global vertex indices in lexicographic face order.
    pub vertices: Vec<usize>,
}

/// A mesh of quadrilaterals (`DIM = 2`) or hexahedra (`DIM = 3`).
#[derive(Debug, Clone)]
pub struct Triangulation<const DIM: usize> {
    pub(crate) vertices: Vec<Point<f64, DIM>>,
    pub(crate) levels: Vec<Vec<CellData>>,
    pub(crate) faces: BTreeMap<FaceKey, FaceData>,
    pub(crate) manifolds: BTreeMap<ManifoldId, Arc<dyn Manifold<DIM>>>,
}

impl<const DIM: usize> Default for Triangulation<DIM> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const DIM: usize> Triangulation<DIM> {
    /// Create an empty triangulation.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            levels: Vec::new(),
            faces: BTreeMap::new(),
            manifolds: BTreeMap::new(),
        }
    }

    // ==================== Accessors ====================

    /// Spatial dimension.
    #[inline]
    pub fn dimension(&self) -> usize {
        DIM
    }

    /// Number of vertices, including those created by refinement.
    #[inline]
    pub fn n_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of levels in the cell hierarchy.
    #[inline]
    pub fn n_levels(&self) -> usize {
        self.levels.len()
    }

    /// Number of cells on all levels.
    pub fn n_cells(&self) -> usize {
        self.levels.iter().map(Vec::len).sum()
    }

    /// Number of active (finest level) cells.
    #[inline]
    pub fn n_active_cells(&self) -> usize {
        self.active_cells().len()
    }

    /// True if no cell has been refined.
    #[inline]
    pub fn is_coarse(&self) -> bool {
        self.levels.len() <= 1
    }

    /// True if the triangulation has no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n_active_cells() == 0
    }

    /// All vertex positions.
    #[inline]
    pub fn vertices(&self) -> &[Point<f64, DIM>] {
        &self.vertices
    }

    /// Position of a vertex.
    #[inline]
    pub fn vertex(&self, v: VertexId) -> &Point<f64, DIM> {
        &self.vertices[v.index()]
    }

    /// Move a vertex.
    #[inline]
    pub fn set_vertex(&mut self, v: VertexId, position: Point<f64, DIM>) {
        self.vertices[v.index()] = position;
    }

    /// Iterate over all vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    /// Cells on the finest level.
    #[inline]
    pub fn active_cells(&self) -> &[CellData] {
        self.levels.last().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Cells on a given level.
    pub fn level_cells(&self, level: usize) -> &[CellData] {
        self.levels.get(level).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate over active cell IDs.
    pub fn active_cell_ids(&self) -> impl Iterator<Item = CellId> + '_ {
        (0..self.n_active_cells()).map(CellId::new)
    }

    /// An active cell.
    #[inline]
    pub fn cell(&self, c: CellId) -> &CellData {
        &self.active_cells()[c.index()]
    }

    /// Mutable access to an active cell's tags.
    #[inline]
    pub fn cell_mut(&mut self, c: CellId) -> &mut CellData {
        let cells = self.levels.last_mut().map(Vec::as_mut_slice).unwrap_or(&mut []);
        &mut cells[c.index()]
    }

    /// Vertex positions of an active cell in lexicographic order.
    pub fn cell_points(&self, c: CellId) -> Vec<Point<f64, DIM>> {
        self.cell(c).vertices.iter().map(|&v| self.vertices[v]).collect()
    }

    // ==================== Geometry ====================

    /// Area (2D) or volume (3D) of an active cell.
    pub fn cell_measure(&self, c: CellId) -> f64 {
        cell::measure(&self.cell_points(c))
    }

    /// Vertex average of an active cell.
    pub fn cell_center(&self, c: CellId) -> Point<f64, DIM> {
        let points = self.cell_points(c);
        let sum = points
            .iter()
            .fold(nalgebra::SVector::<f64, DIM>::zeros(), |acc, p| acc + p.coords);
        Point::from(sum / points.len() as f64)
    }

    /// Sum of all active cell measures.
    pub fn total_measure(&self) -> f64 {
        self.active_cell_ids().map(|c| self.cell_measure(c)).sum()
    }

    /// Compute the axis-aligned bounding box of all vertices.
    pub fn bounding_box(&self) -> Option<(Point<f64, DIM>, Point<f64, DIM>)> {
        let first = self.vertices.first()?;

        let mut min = *first;
        let mut max = *first;
        for v in &self.vertices {
            for i in 0..DIM {
                min[i] = min[i].min(v[i]);
                max[i] = max[i].max(v[i]);
            }
        }

        Some((min, max))
    }

    // ==================== Topology ====================

    /// Faces of active cells that no other active cell shares.
    pub fn boundary_faces(&self) -> Vec<Face> {
        let mut count: HashMap<FaceKey, usize> = HashMap::new();
        let mut faces = Vec::new();
        for c in self.active_cell_ids() {
            let cell = self.cell(c);
            for face_no in 0..cell::faces_per_cell(DIM) {
                let vertices: Vec<usize> = cell::face_vertices(DIM, face_no)
                    .into_iter()
                    .map(|lv| cell.vertices[lv])
                    .collect();
                *count.entry(FaceKey::new(&vertices)).or_insert(0) += 1;
                faces.push(Face {
                    cell: c,
                    face_no,
                    vertices,
                });
            }
        }

        faces.retain(|f| count[&FaceKey::new(&f.vertices)] == 1);
        faces
    }

    /// Check that every cell references existing, distinct vertices and is
    /// positively oriented.
    pub fn is_valid(&self) -> bool {
        let n = cell::vertices_per_cell(DIM);
        self.active_cells().iter().all(|c| {
            c.vertices.len() == n
                && c.vertices.iter().all(|&v| v < self.vertices.len())
                && cell::corner_jacobians(
                    &c.vertices.iter().map(|&v| self.vertices[v]).collect::<Vec<_>>(),
                )
                .iter()
                .all(|&j| j > 0.0)
        })
    }

    // ==================== Face tags ====================

    /// Keys of all faces of active cells.
    pub(crate) fn face_keys(&self) -> HashSet<FaceKey> {
        self.active_cells()
            .iter()
            .flat_map(|c| cell_face_keys::<DIM>(c))
            .collect()
    }

    /// Key of the face with the given vertices and the number of active
    /// cells sharing it, or `None` if no active cell has such a face.
    fn lookup_face(&self, vertices: &[usize]) -> Option<(FaceKey, usize)> {
        if vertices.len() != cell::vertices_per_face(DIM) {
            return None;
        }
        let key = FaceKey::try_new(vertices)?;
        let shared = self
            .active_cells()
            .iter()
            .filter(|c| vertices.iter().all(|v| c.vertices.contains(v)))
            .filter(|c| cell_face_keys::<DIM>(c).any(|k| k == key))
            .count();
        (shared > 0).then_some((key, shared))
    }

    /// Update the tags of a known face, forgetting it once both are default.
    pub(crate) fn tag_face<F>(&mut self, key: FaceKey, vertices: &[usize], update: F)
    where
        F: FnOnce(&mut FaceData),
    {
        let face = self
            .faces
            .entry(key)
            .or_insert_with(|| FaceData::new(vertices.to_vec()));
        update(face);
        if face.is_default() {
            self.faces.remove(&key);
        }
    }

    fn not_a_face(vertices: &[usize]) -> MeshError {
        MeshError::invalid_param(
            "face",
            format!("{:?}", vertices),
            "not a face of an active cell",
        )
    }

    /// Set the boundary id of the face with the given vertices.
    ///
    /// The vertices should be given in lexicographic face order; that order
    /// is used when faces are written to files. Vertex lists that are not a
    /// face of an active cell are rejected.
    pub fn set_boundary_id(&mut self, vertices: &[usize], boundary_id: BoundaryId) -> Result<()> {
        let (key, _) = self
            .lookup_face(vertices)
            .ok_or_else(|| Self::not_a_face(vertices))?;
        self.tag_face(key, vertices, |f| f.boundary_id = boundary_id);
        Ok(())
    }

    /// Boundary id of the face with the given vertices.
    ///
    /// Faces shared by two active cells report
    /// [`INTERNAL_FACE_BOUNDARY_ID`]; untagged boundary faces report 0.
    /// Returns `None` if the vertices are not a face of an active cell.
    ///
    /// The face is looked up by scanning the active cells, so each call costs
    /// time linear in the number of cells. Use [`boundary_faces`] or
    /// [`tagged_faces`] to visit many faces.
    ///
    /// [`boundary_faces`]: Self::boundary_faces
    /// [`tagged_faces`]: Self::tagged_faces
    pub fn boundary_id(&self, vertices: &[usize]) -> Option<BoundaryId> {
        let (key, shared) = self.lookup_face(vertices)?;
        Some(match self.faces.get(&key) {
            Some(face) => face.boundary_id,
            None if shared == 1 => 0,
            None => INTERNAL_FACE_BOUNDARY_ID,
        })
    }

    /// Set the manifold id of the face with the given vertices.
    pub fn set_manifold_id(&mut self, vertices: &[usize], manifold_id: ManifoldId) -> Result<()> {
        let (key, _) = self
            .lookup_face(vertices)
            .ok_or_else(|| Self::not_a_face(vertices))?;
        self.tag_face(key, vertices, |f| f.manifold_id = manifold_id);
        Ok(())
    }

    /// Manifold id of the face with the given vertices, or `None` if they
    /// are not a face of an active cell. Costs a scan of the active cells.
    pub fn manifold_id(&self, vertices: &[usize]) -> Option<ManifoldId> {
        let (key, _) = self.lookup_face(vertices)?;
        Some(self.faces.get(&key).map_or(FLAT_MANIFOLD_ID, |f| f.manifold_id))
    }

    /// Set the manifold id of every boundary face.
    pub fn set_all_manifold_ids_on_boundary(&mut self, manifold_id: ManifoldId) {
        for face in self.boundary_faces() {
            let key = FaceKey::new(&face.vertices);
            self.tag_face(key, &face.vertices, |f| f.manifold_id = manifold_id);
        }
    }

    /// Faces with a non-default boundary id or manifold id, in key order.
    pub fn tagged_faces(&self) -> impl Iterator<Item = &FaceData> + '_ {
        self.faces.values()
    }

    /// Largest boundary id among boundary faces (0 when none is tagged).
    pub fn max_boundary_id(&self) -> BoundaryId {
        self.faces
            .values()
            .map(|f| f.boundary_id)
            .filter(|&id| id != INTERNAL_FACE_BOUNDARY_ID)
            .max()
            .unwrap_or(0)
    }

    // ==================== Manifolds ====================

    /// Attach a manifold to an id.
    pub fn set_manifold<M: Manifold<DIM> + 'static>(&mut self, id: ManifoldId, manifold: M) {
        self.manifolds.insert(id, Arc::new(manifold));
    }

    /// Detach the manifold with the given id.
    pub fn reset_manifold(&mut self, id: ManifoldId) {
        self.manifolds.remove(&id);
    }

    /// The manifold attached to an id, if any.
    pub fn manifold(&self, id: ManifoldId) -> Option<&dyn Manifold<DIM>> {
        self.manifolds.get(&id).map(|m| m.as_ref())
    }

    /// Ids that have a manifold attached.
    pub fn manifold_ids(&self) -> impl Iterator<Item = ManifoldId> + '_ {
        self.manifolds.keys().copied()
    }

    /// Summary used for console reports.
    pub fn info(&self) -> MeshInfo {
        let bounds = self.bounding_box().map(|(min, max)| {
            let mut lo = [0.0; 3];
            let mut hi = [0.0; 3];
            for d in 0..DIM {
                lo[d] = min[d];
                hi[d] = max[d];
            }
            (lo, hi)
        });
        MeshInfo {
            dimension: DIM,
            n_vertices: self.n_vertices(),
            n_active_cells: self.n_active_cells(),
            n_levels: self.n_levels(),
            bounding_box: bounds,
            total_measure: self.total_measure(),
        }
    }
}

/// Keys of the faces of one cell.
fn cell_face_keys<const DIM: usize>(c: &CellData) -> impl Iterator<Item = FaceKey> + '_ {
    (0..cell::faces_per_cell(DIM)).map(move |face_no| {
        let face: Vec<usize> = cell::face_vertices(DIM, face_no)
            .into_iter()
            .map(|lv| c.vertices[lv])
            .collect();
        FaceKey::new(&face)
    })
}

/// Summary of a triangulation.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshInfo {
    /// Spatial dimension.
    pub dimension: usize,
    /// Number of vertices.
    pub n_vertices: usize,
    /// Number of active cells.
    pub n_active_cells: usize,
    /// Number of refinement levels.
    pub n_levels: usize,
    /// Bounding box padded to three coordinates.
    pub bounding_box: Option<([f64; 3], [f64; 3])>,
    /// Total area or volume.
    pub total_measure: f64,
}

impl fmt::Display for MeshInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Mesh info:")?;
        writeln!(f, " dimension: {}", self.dimension)?;
        write!(f, " no. of cells: {}", self.n_active_cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::build_from_quads;
    use nalgebra::Point2;

    fn two_quads() -> Triangulation2 {
        let vertices = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(2.0, 1.0),
        ];
        build_from_quads(&vertices, &[[0, 1, 3, 4], [1, 2, 4, 5]]).unwrap()
    }

    #[test]
    fn test_empty() {
        let tria = Triangulation3::new();
        assert_eq!(tria.n_vertices(), 0);
        assert_eq!(tria.n_active_cells(), 0);
        assert!(tria.is_empty());
        assert!(tria.bounding_box().is_none());
        assert!(tria.is_valid());
    }

    #[test]
    fn test_face_key_is_order_independent() {
        assert_eq!(FaceKey::new(&[3, 1]), FaceKey::new(&[1, 3]));
        assert_eq!(FaceKey::new(&[4, 2, 9, 1]).vertices(), &[1, 2, 4, 9]);
    }

    #[test]
    fn test_counts_and_geometry() {
        let tria = two_quads();
        assert_eq!(tria.n_vertices(), 6);
        assert_eq!(tria.n_active_cells(), 2);
        assert_eq!(tria.n_levels(), 1);
        assert!(tria.is_coarse());
        assert!((tria.total_measure() - 2.0).abs() < 1e-12);

        let c = tria.cell_center(CellId::new(1));
        assert!((c.x - 1.5).abs() < 1e-12);
        assert!((c.y - 0.5).abs() < 1e-12);

        let (min, max) = tria.bounding_box().unwrap();
        assert_eq!(min, Point2::new(0.0, 0.0));
        assert_eq!(max, Point2::new(2.0, 1.0));
    }

    #[test]
    fn test_boundary_faces() {
        let tria = two_quads();
        let faces = tria.boundary_faces();
        // 8 faces in total, the shared one is interior
        assert_eq!(faces.len(), 6);
        assert!(faces.iter().all(|f| FaceKey::new(&f.vertices) != FaceKey::new(&[1, 4])));
    }

    #[test]
    fn test_face_tags() {
        let mut tria = two_quads();
        assert_eq!(tria.boundary_id(&[0, 1]), Some(0));
        assert_eq!(tria.boundary_id(&[1, 4]), Some(INTERNAL_FACE_BOUNDARY_ID));

        tria.set_boundary_id(&[0, 3], 7).unwrap();
        tria.set_manifold_id(&[2, 5], 1).unwrap();
        assert_eq!(tria.boundary_id(&[3, 0]), Some(7));
        assert_eq!(tria.manifold_id(&[5, 2]), Some(1));
        assert_eq!(tria.manifold_id(&[0, 1]), Some(FLAT_MANIFOLD_ID));
        assert_eq!(tria.max_boundary_id(), 7);
        assert_eq!(tria.tagged_faces().count(), 2);

        // resetting to defaults forgets the face
        tria.set_boundary_id(&[0, 3], 0).unwrap();
        assert_eq!(tria.tagged_faces().count(), 1);
    }

    #[test]
    fn test_face_tags_reject_non_faces() {
        let mut tria = two_quads();

        // diagonal of the first quad
        assert!(matches!(
            tria.set_boundary_id(&[0, 4], 3),
            Err(MeshError::InvalidParameter { name: "face", .. })
        ));
        // too many vertices for a 2D face
        assert!(tria.set_boundary_id(&[0, 1, 2, 3, 4], 1).is_err());
        assert!(tria.set_manifold_id(&[0, 1, 2], 1).is_err());
        assert!(tria.set_manifold_id(&[], 1).is_err());
        assert_eq!(tria.tagged_faces().count(), 0);

        assert_eq!(tria.boundary_id(&[0, 4]), None);
        assert_eq!(tria.boundary_id(&[0, 1, 2, 3, 4]), None);
        assert_eq!(tria.manifold_id(&[0, 1, 2, 3, 4, 5]), None);
        assert_eq!(tria.manifold_id(&[7, 8]), None);
    }

    #[test]
    fn test_face_key() {
        assert_eq!(FaceKey::try_new(&[3, 1]).unwrap().vertices(), &[1, 3]);
        assert!(FaceKey::try_new(&[]).is_none());
        assert!(FaceKey::try_new(&[0, 1, 2, 3, 4]).is_none());
    }

    #[test]
    fn test_manifold_ids_on_boundary() {
        let mut tria = two_quads();
        tria.set_all_manifold_ids_on_boundary(3);
        assert_eq!(tria.tagged_faces().count(), 6);
        assert!(tria.tagged_faces().all(|f| f.manifold_id == 3));
    }

    #[test]
    fn test_info_display() {
        let info = two_quads().info();
        assert_eq!(info.n_active_cells, 2);
        assert_eq!(
            info.to_string(),
            "Mesh info:\n dimension: 2\n no. of cells: 2"
        );
    }
}
