//! Configuration options for fsmesh.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::normals::NormalsOptions;

/// Global configuration options for fsmesh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Defaults used by loads that do not pass their own options.
    pub load: LoadOptions,
}

impl Options {
    /// Parses options from a JSON string. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads options from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

/// Options for converting one surface file into a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Whether to compute per-vertex normals.
    pub calculate_normals: bool,

    /// Normal computation policy.
    pub normals: NormalsOptions,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            calculate_normals: true,
            normals: NormalsOptions::default(),
        }
    }
}

impl LoadOptions {
    /// Returns these options with normal computation switched on or off.
    #[must_use]
    pub fn with_normals(mut self, calculate_normals: bool) -> Self {
        self.calculate_normals = calculate_normals;
        self
    }
}
