//! Error types for meshgen.
//!
//! This module defines all error types used throughout the library.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur during mesh operations.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The triangulation has no cells.
    #[error("triangulation has no cells")]
    EmptyMesh,

    /// A cell lists the wrong number of vertices for the dimension.
    #[error("cell {cell} has {found} vertices, expected {expected}")]
    WrongVertexCount {
        /// The cell index.
        cell: usize,
        /// Number of vertices given.
        found: usize,
        /// Number of vertices a cell of this dimension has.
        expected: usize,
    },

    /// A cell references an invalid vertex index.
    #[error("cell {cell} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The cell index.
        cell: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A cell uses the same vertex more than once.
    #[error("cell {cell} is degenerate (has duplicate vertices)")]
    DegenerateCell {
        /// The cell index.
        cell: usize,
    },

    /// A cell is inverted or collapsed (non-positive Jacobian at a vertex).
    #[error("cell {cell} is inverted or degenerate (jacobian {jacobian:e} at local vertex {vertex})")]
    InvertedCell {
        /// The cell index.
        cell: usize,
        /// Local vertex where the Jacobian is non-positive.
        vertex: usize,
        /// The offending Jacobian determinant.
        jacobian: f64,
    },

    /// The operation needs a triangulation without refined cells.
    #[error("{operation} requires a coarse triangulation, found {levels} levels")]
    NotCoarse {
        /// Name of the operation.
        operation: &'static str,
        /// Number of levels in the triangulation.
        levels: usize,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error loading mesh from file.
    #[error("failed to load mesh from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Error saving mesh to file.
    #[error("failed to save mesh to {path}: {message}")]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Malformed content while parsing a mesh file.
    #[error("parse error at line {line}: {message}")]
    Parse {
        /// One-based line number.
        line: usize,
        /// Description of the problem.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Create a parse error at a one-based line number.
    pub fn parse<M: Into<String>>(line: usize, message: M) -> Self {
        MeshError::Parse {
            line,
            message: message.into(),
        }
    }
}
