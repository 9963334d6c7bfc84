//! FreeSurfer surface file reading for fsmesh-rs.
//!
//! [`read_geometry`] returns the raw vertices, faces and volume-geometry
//! footer of a surface file. Vertices are left in tkreg space; mapping them
//! to scanner space is the loader's job. [`read_morph_data`] reads the
//! per-vertex overlays (`lh.curv`, `lh.thickness`, ...) that accompany them.

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod curv;
mod error;
mod footer;
pub mod surf;

use std::path::Path;

pub use curv::{parse_morph_data, read_morph_data, NEW_CURV_MAGIC};
pub use error::{Result, SurfaceError};
pub use surf::{
    has_surface_magic, parse_geometry, read_geometry, split_quad, SurfaceGeometry,
    NEW_QUAD_MAGIC, QUAD_MAGIC, TRIANGLE_MAGIC,
};

/// File name extensions of FreeSurfer surfaces (`lh.white`, `rh.pial`, ...).
pub const SURFACE_EXTENSIONS: [&str; 6] = ["orig", "inflated", "sphere", "white", "smoothwm", "pial"];

/// File name extensions of per-vertex morphometry overlays (`lh.curv`, ...).
pub const OVERLAY_EXTENSIONS: [&str; 4] = ["curv", "sulc", "area", "thickness"];

/// Whether the path ends in one of [`SURFACE_EXTENSIONS`].
pub fn is_surface_file(path: impl AsRef<Path>) -> bool {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SURFACE_EXTENSIONS.contains(&ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_extensions() {
        assert!(is_surface_file("subjects/bert/surf/lh.white"));
        assert!(is_surface_file("rh.smoothwm"));
        assert!(!is_surface_file("lh.thickness"));
        assert!(!is_surface_file("orig"));
    }
}
