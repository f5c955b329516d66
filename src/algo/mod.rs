//! Mesh processing algorithms.
//!
//! - **Refinement**: uniform isotropic refinement with manifold-aware vertex placement
//! - **Transformation**: moving vertices (shift, scale, rotate, arbitrary maps)

pub mod progress;
pub mod refine;
pub mod transform;

pub use progress::Progress;
