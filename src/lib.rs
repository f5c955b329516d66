//! # meshgen
//!
//! Quadrilateral and hexahedral mesh generation.
//!
//! meshgen builds coarse 2D meshes of simple domains, extrudes them into 3D
//! hexahedral meshes, refines both uniformly and writes them as VTK files
//! for ParaView or VisIt.
//!
//! ## Features
//!
//! - **Triangulations**: quad (2D) and hex (3D) meshes with a refinement hierarchy
//! - **Shape generators**: rectangles, a square with a hole, perforated plates
//! - **Merging and extrusion**: combine 2D meshes, lift them into hexahedral layers
//! - **Curved boundaries**: manifolds place refined vertices on circles and cylinders
//! - **File formats**: legacy VTK (read and write) and VTK XML (write)
//!
//! ## Quick Start
//!
//! ```no_run
//! use meshgen::prelude::*;
//!
//! let plate = cheese([3, 2]).unwrap();
//! let mut block = extrude_triangulation(&plate, 3, 2.0, &ExtrudeOptions::default()).unwrap();
//! refine_global(&mut block, &RefineOptions::new(2));
//!
//! println!("{}", block.info());
//! meshgen::io::save(&block, "cheese_3D.vtk").unwrap();
//! ```
//!
//! ## Building Meshes Programmatically
//!
//! Cell vertices are listed in lexicographic order, x varying fastest:
//!
//! ```
//! use meshgen::prelude::*;
//! use nalgebra::Point2;
//!
//! let vertices = vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(1.0, 0.0),
//!     Point2::new(2.0, 0.0),
//!     Point2::new(0.0, 1.0),
//!     Point2::new(1.0, 1.0),
//!     Point2::new(2.0, 1.0),
//! ];
//! let cells = [[0, 1, 3, 4], [1, 2, 4, 5]];
//!
//! let mut tria = build_from_quads(&vertices, &cells).unwrap();
//! refine_global(&mut tria, &RefineOptions::new(1));
//! assert_eq!(tria.n_active_cells(), 8);
//! assert_eq!(tria.n_vertices(), 15);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod builders;
pub mod error;
pub mod generate;
pub mod io;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use meshgen::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::refine::{refine_global, RefineOptions};
    pub use crate::algo::Progress;
    pub use crate::builders::{BuildOptions, Builder};
    pub use crate::error::{MeshError, Result};
    pub use crate::generate::{
        cheese, extrude_triangulation, hyper_cube_with_cylindrical_hole, hyper_rectangle,
        merge_triangulations, subdivided_hyper_rectangle, ExtrudeOptions, MergeOptions,
    };
    pub use crate::mesh::{
        build_from_hexes, build_from_quads, CellData, CellId, Manifold, SubCellData,
        Triangulation, Triangulation2, Triangulation3, VertexId,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_cube_hole_pipeline() {
        let plane = hyper_cube_with_cylindrical_hole(0.25, 1.0).unwrap();
        let mut block = extrude_triangulation(&plane, 3, 2.0, &ExtrudeOptions::default()).unwrap();
        assert_eq!(block.n_active_cells(), 24);

        refine_global(&mut block, &RefineOptions::new(1));
        assert_eq!(block.n_active_cells(), 24 * 8);
        assert!(block.is_valid());

        // flat refinement of a prism keeps the volume
        let expected = plane.total_measure() * 2.0;
        assert!((block.total_measure() - expected).abs() < 1e-10);
    }
}
