//! Error types for surface file parsing.

use thiserror::Error;

/// Errors raised while reading a FreeSurfer surface file.
#[derive(Error, Debug)]
pub enum SurfaceError {
    /// The file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The three-byte magic number is not a known surface type.
    #[error("not a FreeSurfer surface file (magic 0x{0:06x})")]
    InvalidMagic(u32),

    /// The header declares counts the file cannot hold.
    #[error("invalid element counts: {vertices} vertices, {faces} faces")]
    InvalidCount { vertices: i64, faces: i64 },

    /// A morphometry file stores more than one value per vertex.
    #[error("unsupported values per vertex: {0}")]
    InvalidValuesPerVertex(i32),

    /// The file ends before the declared data.
    #[error("surface file is truncated")]
    Truncated,

    /// The volume-geometry footer is malformed.
    #[error("error parsing volume info: {0}")]
    InvalidFooter(String),
}

/// A specialized Result type for surface parsing.
pub type Result<T> = std::result::Result<T, SurfaceError>;

/// Maps an early end of input to [`SurfaceError::Truncated`].
pub(crate) fn truncated(err: std::io::Error) -> SurfaceError {
    if err.kind() == std::io::ErrorKind::UnexpectedEof {
        SurfaceError::Truncated
    } else {
        SurfaceError::Io(err)
    }
}
