//! Volume-geometry footer of FreeSurfer surface files.
//!
//! Triangle surface files may end with a block of `key = value` lines describing
//! the volume the surface was generated from. Every field is optional: files
//! written by older tools carry no footer at all.

use serde::{Deserialize, Serialize};

/// Footer keys, in the order they appear in a surface file.
pub const FOOTER_KEYS: [&str; 8] = [
    "valid",
    "filename",
    "volume",
    "voxelsize",
    "xras",
    "yras",
    "zras",
    "cras",
];

/// Parsed contents of a surface file's volume-geometry footer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VolumeInfo {
    /// Validity flag as written (`"1  # volume info valid"` in most files).
    pub valid: Option<String>,
    /// Path of the volume the geometry was taken from.
    pub filename: Option<String>,
    /// Voxel grid dimensions.
    pub volume: Option<[i32; 3]>,
    /// Voxel spacing in millimetres.
    pub voxelsize: Option<[f64; 3]>,
    /// Scanner direction of the first grid axis.
    pub xras: Option<[f64; 3]>,
    /// Scanner direction of the second grid axis.
    pub yras: Option<[f64; 3]>,
    /// Scanner direction of the third grid axis.
    pub zras: Option<[f64; 3]>,
    /// Scanner coordinate of the volume centre.
    pub cras: Option<[f64; 3]>,
}

impl VolumeInfo {
    /// Returns true if no footer field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
