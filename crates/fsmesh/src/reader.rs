//! File reader entry point for hosts with a generic "load file" dialog.

use std::path::{Path, PathBuf};

use fsmesh_core::{LoadOptions, ModelRegistry};
use fsmesh_io::{OVERLAY_EXTENSIONS, SURFACE_EXTENSIONS};
use serde::{Deserialize, Serialize};

use crate::loader::{attach_scalar_overlay, create_and_load_named};

/// Properties of a single load request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadProperties {
    /// Surface file to read.
    pub file_name: PathBuf,
    /// Model name; derived from the file name when absent.
    #[serde(default)]
    pub name: Option<String>,
    /// Conversion options.
    #[serde(default)]
    pub options: LoadOptions,
}

impl LoadProperties {
    /// Creates load properties for `file_name` with default options.
    pub fn new(file_name: impl Into<PathBuf>) -> Self {
        Self {
            file_name: file_name.into(),
            name: None,
            options: LoadOptions::default(),
        }
    }

    /// Sets the model name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Reader for FreeSurfer surface models.
#[derive(Debug, Default)]
pub struct SurfaceFileReader {
    loaded_nodes: Vec<String>,
    user_messages: Vec<String>,
}

impl SurfaceFileReader {
    /// Creates a new reader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Human-readable description of the file type.
    pub fn description(&self) -> &'static str {
        "FreeSurfer model"
    }

    /// Identifier of the file type.
    pub fn file_type(&self) -> &'static str {
        "FreeSurfer model"
    }

    /// File dialog filters, e.g. `FreeSurfer model (*.orig *.inflated ... )`.
    pub fn extensions(&self) -> Vec<String> {
        let patterns: String = SURFACE_EXTENSIONS
            .iter()
            .map(|ext| format!("*.{ext} "))
            .collect();
        vec![format!("FreeSurfer model ({patterns})")]
    }

    /// Whether this reader accepts the file. Surface files carry no reliable
    /// extension, so every file is accepted and validated while loading.
    pub fn can_load_file(&self, _path: impl AsRef<Path>) -> bool {
        true
    }

    /// Loads the file described by `properties` into a new model.
    ///
    /// On success the new model id is available from [`Self::loaded_nodes`];
    /// on failure a message is recorded in [`Self::user_messages`].
    pub fn load<R: ModelRegistry + ?Sized>(
        &mut self,
        registry: &mut R,
        properties: &LoadProperties,
    ) -> bool {
        self.loaded_nodes.clear();
        let base_name = properties.name.as_deref().unwrap_or_default();

        match create_and_load_named(
            registry,
            &properties.file_name,
            base_name,
            &properties.options,
        ) {
            Some(id) => {
                self.loaded_nodes.push(id);
                true
            }
            None => {
                self.user_messages.push(format!(
                    "Could not load file: {}",
                    properties.file_name.display()
                ));
                false
            }
        }
    }

    /// Ids of the models created by the last successful load.
    pub fn loaded_nodes(&self) -> &[String] {
        &self.loaded_nodes
    }

    /// Messages for the user, one per failed load.
    pub fn user_messages(&self) -> &[String] {
        &self.user_messages
    }
}

/// Properties of a single overlay load request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayProperties {
    /// Morphometry file to read.
    pub file_name: PathBuf,
    /// Model the overlay is attached to.
    pub model_id: String,
}

/// Reader for per-vertex scalar overlays of loaded surface models.
#[derive(Debug, Default)]
pub struct ScalarOverlayReader {
    user_messages: Vec<String>,
}

impl ScalarOverlayReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn description(&self) -> &'static str {
        "FreeSurfer scalar overlay"
    }

    pub fn file_type(&self) -> &'static str {
        "FreeSurferScalarOverlayFile"
    }

    /// File dialog filters, one per overlay kind.
    pub fn extensions(&self) -> Vec<String> {
        OVERLAY_EXTENSIONS.iter().map(|ext| format!("*.{ext}")).collect()
    }

    /// Reads the overlay and attaches it to the model, whatever its hemisphere.
    pub fn load<R: ModelRegistry + ?Sized>(
        &mut self,
        registry: &mut R,
        properties: &OverlayProperties,
    ) -> bool {
        match attach_scalar_overlay(registry, &properties.model_id, &properties.file_name) {
            Ok(()) => true,
            Err(err) => {
                log::error!(
                    "failed to load overlay {} ({:?}): {err}",
                    properties.file_name.display(),
                    err.kind()
                );
                self.user_messages.push(format!(
                    "Could not load scalar overlay: {}",
                    properties.file_name.display()
                ));
                false
            }
        }
    }

    /// Messages for the user, one per failed load.
    pub fn user_messages(&self) -> &[String] {
        &self.user_messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fsmesh_core::Registry;

    #[test]
    fn test_extensions_filter() {
        let reader = SurfaceFileReader::new();
        assert_eq!(
            reader.extensions(),
            vec!["FreeSurfer model (*.orig *.inflated *.sphere *.white *.smoothwm *.pial )"]
        );
        assert_eq!(reader.description(), "FreeSurfer model");
        assert!(reader.can_load_file("anything.txt"));
    }

    #[test]
    fn test_failed_load_records_message() {
        let mut registry = Registry::new();
        let mut reader = SurfaceFileReader::new();
        let properties = LoadProperties::new("/nonexistent/lh.white").with_name("left");

        assert!(!reader.load(&mut registry, &properties));
        assert!(reader.loaded_nodes().is_empty());
        assert_eq!(
            reader.user_messages(),
            &["Could not load file: /nonexistent/lh.white".to_string()]
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_overlay_reader_missing_model() {
        let mut registry = Registry::new();
        let mut reader = ScalarOverlayReader::new();
        assert_eq!(reader.extensions(), ["*.curv", "*.sulc", "*.area", "*.thickness"]);

        let properties = OverlayProperties {
            file_name: "/nonexistent/lh.curv".into(),
            model_id: "ModelNode1".to_string(),
        };
        assert!(!reader.load(&mut registry, &properties));
        assert_eq!(
            reader.user_messages(),
            &["Could not load scalar overlay: /nonexistent/lh.curv".to_string()]
        );
    }
}
