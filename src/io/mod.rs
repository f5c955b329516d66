//! Mesh file I/O.
//!
//! # Supported Formats
//!
//! | Format | Extension | Load | Save | Notes |
//! |--------|-----------|------|------|-------|
//! | Legacy VTK | `.vtk` | ✓ | ✓ | ASCII unstructured grid |
//! | VTK XML | `.vtu` | ✗ | ✓ | ASCII data arrays |
//!
//! # Usage
//!
//! The easiest way to save a mesh is using the automatic format detection:
//!
//! ```no_run
//! use meshgen::generate::cheese;
//! use meshgen::io::save;
//!
//! let tria = cheese([3, 2]).unwrap();
//! save(&tria, "cheese_2D.vtk").unwrap();
//! save(&tria, "cheese_2D.vtu").unwrap();
//! ```
//!
//! Written legacy files can be read back for inspection:
//!
//! ```no_run
//! use meshgen::io::vtk;
//!
//! let grid = vtk::load("cheese_2D.vtk").unwrap();
//! println!("{} points, {} cells", grid.n_points(), grid.n_cells());
//! ```

pub mod vtk;
pub mod vtu;

use std::path::Path;

use crate::error::{MeshError, Result};
use crate::mesh::Triangulation;

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Legacy VTK format.
    Vtk,
    /// VTK XML unstructured grid.
    Vtu,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "vtk" => Some(Format::Vtk),
            "vtu" => Some(Format::Vtu),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }
}

/// Save a triangulation to a file with automatic format detection.
///
/// The format is determined by the file extension.
pub fn save<const DIM: usize, P: AsRef<Path>>(tria: &Triangulation<DIM>, path: P) -> Result<()> {
    let path = path.as_ref();
    let format = Format::from_path(path).ok_or_else(|| MeshError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })?;

    match format {
        Format::Vtk => vtk::save(tria, path),
        Format::Vtu => vtu::save(tria, path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::cheese;

    #[test]
    fn test_format_detection() {
        assert_eq!(Format::from_path("a/b/mesh_2D.vtk"), Some(Format::Vtk));
        assert_eq!(Format::from_path("mesh.VTU"), Some(Format::Vtu));
        assert_eq!(Format::from_path("mesh.stl"), None);
        assert_eq!(Format::from_path("mesh"), None);
    }

    #[test]
    fn test_save_unsupported() {
        let tria = cheese([1, 1]).unwrap();
        let result = save(&tria, "mesh.obj");
        assert!(matches!(
            result,
            Err(MeshError::UnsupportedFormat { extension }) if extension == "obj"
        ));
    }
}
