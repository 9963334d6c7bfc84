//! fsmesh-rs: load FreeSurfer surfaces as scanner-space triangle meshes.
//!
//! FreeSurfer stores surface vertices in tkreg RAS space. This crate reads a
//! surface file, rebuilds the volume geometry from its footer and maps every
//! vertex to scanner RAS space, so the mesh lines up with the volume it was
//! reconstructed from.
//!
//! # Quick Start
//!
//! ```no_run
//! use fsmesh_rs::*;
//!
//! fn main() -> Result<()> {
//!     init()?;
//!
//!     if let Some(model) = load_surface("subjects/bert/surf/lh.white") {
//!         println!("{} has {:?} vertices", model.name(), model.num_vertices());
//!     }
//!
//!     shutdown();
//!     Ok(())
//! }
//! ```
//!
//! Without the global registry, [`read_surface_as_mesh`] returns the mesh
//! directly and [`create_and_load_named`] works against any
//! [`ModelRegistry`].
//!
//! # Geometry
//!
//! - [`VolGeom`] - voxel grid description with the tkreg and scanner affines
//! - [`VolGeom::tkreg2scanner`] - the transform applied to every vertex
//!
//! # Overlays
//!
//! [`load_overlay`] attaches per-vertex morphometry (`lh.curv`, `rh.sulc`,
//! `lh.thickness`) to the loaded models of the matching hemisphere.

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

mod init;
mod loader;
mod model;
mod reader;

pub use init::{init, init_with_options, is_initialized, shutdown};
pub use loader::{
    attach_scalar_overlay, create_and_load_named, default_base_name, hemisphere_of,
    load_scalar_overlay, read_model_node, read_surface_as_mesh, surface_to_mesh,
    try_read_model_node, LoadError, LoadErrorKind,
};
pub use model::{
    get_model, load_overlay, load_surface, load_surface_named, load_surface_with, num_models,
    remove_all_models, remove_model, ModelHandle,
};
pub use reader::{LoadProperties, OverlayProperties, ScalarOverlayReader, SurfaceFileReader};

// Re-export core types
pub use fsmesh_core::{
    apply_affine, from_matvec,
    error::{FsMeshError, Result},
    options::{LoadOptions, Options},
    registry::{ModelNode, ModelRegistry, Registry},
    state::{with_context, with_context_mut, Context},
    MghHeader, NormalsOptions, TriangleMesh, VolGeom, VolumeInfo, DMat3, DMat4, DVec3, Vec3,
};

// Re-export io types
pub use fsmesh_io::{
    is_surface_file, parse_geometry, parse_morph_data, read_geometry, read_morph_data,
    SurfaceError, SurfaceGeometry, OVERLAY_EXTENSIONS, SURFACE_EXTENSIONS,
};
