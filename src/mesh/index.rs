//! Index and id types for triangulation entities.
//!
//! Vertices and cells are addressed through type-safe index wrappers so that
//! a vertex index can never be handed to an accessor expecting a cell. The
//! remaining ids (material, boundary, manifold) are plain integers tagged on
//! cells and faces, mirroring the usual finite-element conventions.

use std::fmt::{self, Debug};

/// Material id attached to a cell.
pub type MaterialId = u32;

/// Boundary id attached to a boundary face.
pub type BoundaryId = u32;

/// Manifold id attached to a cell or face.
///
/// [`FLAT_MANIFOLD_ID`] marks entities without curved geometry.
pub type ManifoldId = u32;

/// Manifold id of entities that are refined with straight midpoints.
pub const FLAT_MANIFOLD_ID: ManifoldId = u32::MAX;

/// Boundary id reported for faces shared by two cells.
pub const INTERNAL_FACE_BOUNDARY_ID: BoundaryId = 255;

/// A type-safe vertex index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct VertexId(u32);

/// A type-safe index of a cell on the active (finest) level.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct CellId(u32);

const INVALID: u32 = u32::MAX;

macro_rules! impl_index_type {
    ($name:ident, $display:literal) => {
        impl $name {
            /// Create a new index from a raw value.
            #[inline]
            pub fn new(index: usize) -> Self {
                debug_assert!(index < INVALID as usize, "index {} too large", index);
                Self(index as u32)
            }

            /// Create an invalid/null index.
            #[inline]
            pub fn invalid() -> Self {
                Self(INVALID)
            }

            /// Get the raw index value.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// Check if this is a valid (non-null) index.
            #[inline]
            pub fn is_valid(self) -> bool {
                self.0 != INVALID
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, "{}({})", $display, self.index())
                } else {
                    write!(f, "{}(INVALID)", $display)
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::invalid()
            }
        }

        impl From<usize> for $name {
            fn from(v: usize) -> Self {
                Self::new(v)
            }
        }
    };
}

impl_index_type!(VertexId, "V");
impl_index_type!(CellId, "C");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_id() {
        let v = VertexId::new(42);
        assert_eq!(v.index(), 42);
        assert!(v.is_valid());

        let invalid = VertexId::invalid();
        assert!(!invalid.is_valid());
        assert_eq!(VertexId::default(), invalid);
    }

    #[test]
    fn test_from_usize() {
        let c: CellId = 7.into();
        assert_eq!(c.index(), 7);
    }

    #[test]
    fn test_debug_format() {
        assert_eq!(format!("{:?}", VertexId::new(42)), "V(42)");
        assert_eq!(format!("{:?}", CellId::new(3)), "C(3)");
        assert_eq!(format!("{:?}", CellId::invalid()), "C(INVALID)");
    }
}
