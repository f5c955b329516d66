//! Shape generators.
//!
//! Functions that build coarse triangulations of common domains, and the
//! operations that combine them:
//!
//! - [`hyper_rectangle`], [`subdivided_hyper_rectangle`]: axis-aligned boxes
//! - [`hyper_cube_with_cylindrical_hole`]: square around a circular hole
//! - [`cheese`]: plate with a regular pattern of square holes
//! - [`merge_triangulations`]: union of two meshes sharing vertices
//! - [`extrude_triangulation`]: 2D quadrilaterals to 3D hexahedral layers
//!
//! All generators return [`Result`](crate::error::Result) and validate their
//! arguments.

mod cheese;
mod cylindrical_hole;
mod extrude;
mod merge;
mod rectangle;

pub use cheese::cheese;
pub use cylindrical_hole::{hyper_cube_with_cylindrical_hole, HOLE_MANIFOLD_ID};
pub use extrude::{extrude_triangulation, ExtrudeOptions};
pub use merge::{merge_triangulations, MergeOptions};
pub use rectangle::{hyper_rectangle, subdivided_hyper_rectangle};
