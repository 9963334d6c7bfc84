//! Conversion of surface files into scanner-space meshes.
//!
//! The pipeline is:
//! 1. parse the file ([`fsmesh_io::read_geometry`])
//! 2. build a [`VolGeom`] from its footer
//! 3. map every vertex through `tkreg2scanner`, keeping single precision
//! 4. assemble a [`TriangleMesh`], optionally with normals
//!
//! Per-vertex overlays (`lh.curv`, `lh.thickness`) are attached afterwards
//! with [`load_scalar_overlay`].

use std::path::Path;

use fsmesh_core::{
    apply_affine, FsMeshError, LoadOptions, ModelRegistry, TriangleMesh, VolGeom,
};
use fsmesh_io::{SurfaceError, SurfaceGeometry};
use thiserror::Error;

/// Why a surface could not be loaded.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The file is missing or not a valid surface file.
    #[error("failed to parse surface file: {0}")]
    Parse(#[from] SurfaceError),

    /// The volume-geometry footer is missing or incomplete.
    #[error("invalid volume geometry: {0}")]
    Metadata(#[source] FsMeshError),

    /// The tkreg to scanner affine cannot be computed.
    #[error("cannot map tkreg to scanner space: {0}")]
    Transform(#[source] FsMeshError),

    /// The faces do not form a valid mesh over the vertices.
    #[error("cannot assemble mesh: {0}")]
    MeshAssembly(#[source] FsMeshError),

    /// The target model is not in the registry.
    #[error("cannot store mesh: {0}")]
    Registry(#[source] FsMeshError),
}

/// Coarse classification of a [`LoadError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadErrorKind {
    Parse,
    Metadata,
    Transform,
    MeshAssembly,
    Registry,
}

impl LoadError {
    /// Returns the kind of failure.
    pub fn kind(&self) -> LoadErrorKind {
        match self {
            Self::Parse(_) => LoadErrorKind::Parse,
            Self::Metadata(_) => LoadErrorKind::Metadata,
            Self::Transform(_) => LoadErrorKind::Transform,
            Self::MeshAssembly(_) => LoadErrorKind::MeshAssembly,
            Self::Registry(_) => LoadErrorKind::Registry,
        }
    }
}

/// Reads a surface file and converts it into a scanner-space mesh.
pub fn read_surface_as_mesh(
    path: impl AsRef<Path>,
    options: &LoadOptions,
) -> Result<TriangleMesh, LoadError> {
    let surface = fsmesh_io::read_geometry(path)?;
    surface_to_mesh(surface, options)
}

/// Converts parsed surface contents into a scanner-space mesh.
pub fn surface_to_mesh(
    surface: SurfaceGeometry,
    options: &LoadOptions,
) -> Result<TriangleMesh, LoadError> {
    let geom = VolGeom::from_surf_footer(&surface.volume_info).map_err(LoadError::Metadata)?;
    let affine = geom.tkreg2scanner().map_err(LoadError::Transform)?;

    let vertices = apply_affine(&affine, &surface.vertices);
    let mesh = TriangleMesh::from_signed_faces(vertices, &surface.faces)
        .map_err(LoadError::MeshAssembly)?;

    if options.calculate_normals {
        Ok(mesh.with_normals(&options.normals))
    } else {
        Ok(mesh)
    }
}

/// Loads a surface file into an existing model.
pub fn try_read_model_node<R: ModelRegistry + ?Sized>(
    registry: &mut R,
    id: &str,
    path: impl AsRef<Path>,
    options: &LoadOptions,
) -> Result<(), LoadError> {
    let mesh = read_surface_as_mesh(path, options)?;
    registry.set_model_mesh(id, mesh).map_err(LoadError::Registry)
}

/// Loads a surface file into an existing model.
///
/// Returns false, after logging the cause, if the load fails; the model is
/// left untouched in that case.
pub fn read_model_node<R: ModelRegistry + ?Sized>(
    registry: &mut R,
    id: &str,
    path: impl AsRef<Path>,
    options: &LoadOptions,
) -> bool {
    let path = path.as_ref();
    match try_read_model_node(registry, id, path, options) {
        Ok(()) => {
            log::info!("loaded surface {} into {id}", path.display());
            true
        }
        Err(err) => {
            log::error!(
                "failed to load surface {} ({:?}): {err}",
                path.display(),
                err.kind()
            );
            false
        }
    }
}

/// Creates a uniquely named model and loads a surface file into it.
///
/// An empty `base_name` is replaced by [`default_base_name`]. On failure the
/// new model is removed again and `None` is returned.
pub fn create_and_load_named<R: ModelRegistry + ?Sized>(
    registry: &mut R,
    path: impl AsRef<Path>,
    base_name: &str,
    options: &LoadOptions,
) -> Option<String> {
    let path = path.as_ref();
    let base_name = if base_name.is_empty() {
        default_base_name(path)
    } else {
        base_name.to_string()
    };
    let name = registry.generate_unique_name(&base_name);

    let id = match registry.add_model(&name) {
        Ok(id) => id,
        Err(err) => {
            log::error!("cannot create model '{name}': {err}");
            return None;
        }
    };

    if read_model_node(registry, &id, path, options) {
        Some(id)
    } else {
        registry.remove_model(&id);
        None
    }
}

/// Reads a per-vertex overlay and attaches it to the models of the same hemisphere.
///
/// The overlay is stored under its file name (`lh.curv`) on every model in
/// `model_ids` whose name starts with the same hemisphere (`lh_white`,
/// `lh.pial`). Models without a mesh, or that already carry the overlay, are
/// skipped. Returns false if the file cannot be read, if any match has a
/// different vertex count, or if no model received the overlay.
pub fn load_scalar_overlay<R: ModelRegistry + ?Sized>(
    registry: &mut R,
    path: impl AsRef<Path>,
    model_ids: &[String],
) -> bool {
    let path = path.as_ref();
    let name = overlay_name(path);
    let hemisphere = hemisphere_of(&name);

    let values = match fsmesh_io::read_morph_data(path) {
        Ok(values) => values,
        Err(err) => {
            log::error!("failed to read overlay {}: {err}", path.display());
            return false;
        }
    };

    let mut success = true;
    let mut attached = 0;
    for id in model_ids {
        if registry
            .model_name(id)
            .map_or(true, |model| hemisphere_of(model) != hemisphere)
        {
            continue;
        }
        let Some(mesh) = registry.model_mesh_mut(id) else {
            continue;
        };
        if mesh.has_vertex_scalar(&name) {
            continue;
        }
        match mesh.add_vertex_scalar(name.as_str(), values.clone()) {
            Ok(()) => attached += 1,
            Err(err) => {
                log::error!("cannot attach overlay to {id}: {err}");
                success = false;
            }
        }
    }

    if attached == 0 {
        log::warn!("overlay {name} matched no loaded {hemisphere} surface");
    } else {
        log::info!("attached overlay {name} to {attached} model(s)");
    }
    success && attached > 0
}

/// Reads a per-vertex overlay and attaches it to one model, whatever its name.
pub fn attach_scalar_overlay<R: ModelRegistry + ?Sized>(
    registry: &mut R,
    id: &str,
    path: impl AsRef<Path>,
) -> Result<(), LoadError> {
    let path = path.as_ref();
    let values = fsmesh_io::read_morph_data(path)?;
    let mesh = registry
        .model_mesh_mut(id)
        .ok_or_else(|| LoadError::Registry(FsMeshError::ModelNotFound(id.to_string())))?;
    mesh.add_vertex_scalar(overlay_name(path), values)
        .map_err(LoadError::MeshAssembly)
}

/// File name of an overlay, used as its scalar name.
fn overlay_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Hemisphere prefix of a surface or overlay name: `lh.white`, `lh_white_1`
/// and `lh.curv` all give `lh`.
pub fn hemisphere_of(name: &str) -> &str {
    name.split(|c| c == '.' || c == '_').next().unwrap_or(name)
}

/// Default model name for a surface file: `lh.white` becomes `lh_white`.
pub fn default_base_name(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    format!("{stem}_{ext}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use fsmesh_core::{Vec3, VolumeInfo};

    fn footer() -> VolumeInfo {
        VolumeInfo {
            valid: Some("1".to_string()),
            filename: None,
            volume: Some([256, 256, 256]),
            voxelsize: Some([1.0, 1.0, 1.0]),
            xras: Some([-1.0, 0.0, 0.0]),
            yras: Some([0.0, 0.0, -1.0]),
            zras: Some([0.0, 1.0, 0.0]),
            cras: Some([10.0, -20.0, 30.0]),
        }
    }

    fn surface() -> SurfaceGeometry {
        SurfaceGeometry {
            vertices: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            faces: vec![[0, 1, 2]],
            create_stamp: None,
            volume_info: footer(),
        }
    }

    #[test]
    fn test_default_base_name() {
        assert_eq!(default_base_name("/subjects/bert/surf/lh.white"), "lh_white");
        assert_eq!(default_base_name("rh.pial.T1"), "rh.pial_T1");
        assert_eq!(default_base_name("surface"), "surface_");
    }

    #[test]
    fn test_surface_to_mesh_translates_by_cras() {
        let options = LoadOptions::default().with_normals(false);
        let mesh = surface_to_mesh(surface(), &options).unwrap();
        assert_eq!(mesh.vertices()[1], Vec3::new(11.0, -20.0, 30.0));
        assert!(!mesh.has_normals());
    }

    #[test]
    fn test_error_kinds() {
        let options = LoadOptions::default();

        let mut missing = surface();
        missing.volume_info = VolumeInfo::default();
        let err = surface_to_mesh(missing, &options).unwrap_err();
        assert_eq!(err.kind(), LoadErrorKind::Metadata);

        let mut flat = surface();
        flat.volume_info.voxelsize = Some([1.0, 0.0, 1.0]);
        let err = surface_to_mesh(flat, &options).unwrap_err();
        assert_eq!(err.kind(), LoadErrorKind::Transform);

        let mut broken = surface();
        broken.faces = vec![[0, 1, 7]];
        let err = surface_to_mesh(broken, &options).unwrap_err();
        assert_eq!(err.kind(), LoadErrorKind::MeshAssembly);

        let err = read_surface_as_mesh("/nonexistent/lh.white", &options).unwrap_err();
        assert_eq!(err.kind(), LoadErrorKind::Parse);
    }

    #[test]
    fn test_hemisphere_of() {
        assert_eq!(hemisphere_of("lh.white"), "lh");
        assert_eq!(hemisphere_of("lh_white_1"), "lh");
        assert_eq!(hemisphere_of("rh.thickness"), "rh");
        assert_eq!(hemisphere_of("cortex"), "cortex");
        assert_ne!(hemisphere_of("rh_pial"), hemisphere_of("lh.curv"));
    }
}
