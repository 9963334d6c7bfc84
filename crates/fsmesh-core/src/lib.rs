//! Core abstractions for fsmesh-rs.
//!
//! This crate provides the types shared by the surface loader:
//! - [`VolGeom`] and the tkreg/scanner affines derived from it
//! - [`VolumeInfo`], the volume-geometry footer of surface files
//! - [`TriangleMesh`] and per-vertex normal computation
//! - The [`ModelRegistry`] seam and its in-memory [`Registry`]
//! - Global state and configuration options

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Vertex indices are u32 by construction
#![allow(clippy::cast_possible_truncation)]

pub mod error;
pub mod footer;
pub mod mesh;
pub mod normals;
pub mod options;
pub mod registry;
pub mod state;
pub mod volgeom;

pub use error::{FsMeshError, Result};
pub use footer::{VolumeInfo, FOOTER_KEYS};
pub use mesh::TriangleMesh;
pub use normals::NormalsOptions;
pub use options::{LoadOptions, Options};
pub use registry::{ModelNode, ModelRegistry, Registry};
pub use state::{with_context, with_context_mut, Context};
pub use volgeom::{apply_affine, from_matvec, MghHeader, VolGeom};

// Re-export glam types for convenience
pub use glam::{DMat3, DMat4, DVec3, Vec3};
