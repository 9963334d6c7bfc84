//! Error types for fsmesh-rs.

use thiserror::Error;

/// The main error type for fsmesh-core operations.
#[derive(Error, Debug)]
pub enum FsMeshError {
    /// The global context has not been initialized.
    #[error("fsmesh not initialized - call fsmesh_rs::init() first")]
    NotInitialized,

    /// The global context has already been initialized.
    #[error("fsmesh already initialized")]
    AlreadyInitialized,

    /// A required geometry metadata key is absent.
    #[error("missing volume geometry key '{0}'")]
    MissingKey(String),

    /// A geometry metadata value could not be interpreted.
    #[error("invalid value '{value}' for volume geometry key '{key}'")]
    InvalidMetadataValue { key: String, value: String },

    /// The tkreg affine cannot be inverted (a zero or non-finite voxel size).
    #[error("singular tkreg affine - voxel sizes must be non-zero")]
    SingularTransform,

    /// A face references a vertex beyond the end of the vertex array.
    #[error("face {face} references vertex {index}, but the mesh has {num_vertices} vertices")]
    FaceIndexOutOfRange {
        face: usize,
        index: i64,
        num_vertices: usize,
    },

    /// A face holds a negative vertex index.
    #[error("face {face} holds negative vertex index {index}")]
    NegativeFaceIndex { face: usize, index: i64 },

    /// A per-vertex scalar array does not match the mesh.
    #[error("scalar '{name}' has {found} values, but the mesh has {expected} vertices")]
    ScalarCountMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    /// A model with the given name already exists.
    #[error("model '{0}' already exists")]
    ModelExists(String),

    /// A model with the given id was not found.
    #[error("model '{0}' not found")]
    ModelNotFound(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for fsmesh-core operations.
pub type Result<T> = std::result::Result<T, FsMeshError>;
