//! Core mesh data structures.
//!
//! This module provides the triangulation representation and related types
//! for quadrilateral (2D) and hexahedral (3D) meshes.
//!
//! # Overview
//!
//! The primary type is [`Triangulation`], parameterized by its spatial
//! dimension. It owns vertex positions and a level hierarchy of cells; the
//! cells on the finest level are the *active* cells.
//!
//! # Vertex Ordering
//!
//! Cell vertices are stored in lexicographic order, x varying fastest. A
//! quadrilateral is `[(0,0), (1,0), (0,1), (1,1)]` in reference coordinates,
//! not the counter-clockwise order used by most polygon formats. See
//! [`cell`] for the reference-cell rules.
//!
//! # Construction
//!
//! Triangulations are typically produced by the generators in
//! [`generate`](crate::generate) or from explicit lists:
//!
//! ```
//! use meshgen::mesh::build_from_quads;
//! use nalgebra::Point2;
//!
//! let vertices = vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(1.0, 0.0),
//!     Point2::new(0.0, 1.0),
//!     Point2::new(1.0, 1.0),
//! ];
//! let tria = build_from_quads(&vertices, &[[0, 1, 2, 3]]).unwrap();
//! assert_eq!(tria.n_active_cells(), 1);
//! ```

mod builder;
pub mod cell;
mod index;
pub mod manifold;
mod triangulation;

pub use builder::{
    build_from_hexes, build_from_quads, create_triangulation, to_cell_vertex, to_subcell_data,
};
pub use index::{
    BoundaryId, CellId, ManifoldId, MaterialId, VertexId, FLAT_MANIFOLD_ID,
    INTERNAL_FACE_BOUNDARY_ID,
};
pub use manifold::{CylindricalManifold, FlatManifold, Manifold, PolarManifold};
pub use triangulation::{
    CellData, Face, FaceData, FaceKey, MeshInfo, SubCellData, Triangulation, Triangulation2,
    Triangulation3,
};
