use std::path::Path;

use fsmesh_core::state::{try_with_context, try_with_context_mut};
use fsmesh_core::{LoadOptions, TriangleMesh};

use crate::loader::{create_and_load_named, load_scalar_overlay};

/// Loads a surface file into a new model in the global registry.
///
/// The model is named after the file (`lh.white` becomes `lh_white`) and uses
/// the global load options. Returns `None` if fsmesh is not initialized or
/// the load fails; the cause is logged.
pub fn load_surface(path: impl AsRef<Path>) -> Option<ModelHandle> {
    let options = try_with_context(|ctx| ctx.options.load)?;
    load_surface_with(path, "", &options)
}

/// Loads a surface file into a new model called `name` (made unique).
pub fn load_surface_named(
    path: impl AsRef<Path>,
    name: &str,
    calculate_normals: bool,
) -> Option<ModelHandle> {
    let options = try_with_context(|ctx| ctx.options.load)?.with_normals(calculate_normals);
    load_surface_with(path, name, &options)
}

/// Loads a surface file with explicit options.
pub fn load_surface_with(
    path: impl AsRef<Path>,
    name: &str,
    options: &LoadOptions,
) -> Option<ModelHandle> {
    try_with_context_mut(|ctx| {
        let id = create_and_load_named(&mut ctx.registry, path, name, options)?;
        let name = ctx.registry.get(&id)?.name().to_string();
        Some(ModelHandle { id, name })
    })
    .flatten()
}

/// Attaches a per-vertex overlay (`lh.curv`, ...) to every loaded model of
/// the same hemisphere. Returns false if it reached no model.
pub fn load_overlay(path: impl AsRef<Path>) -> bool {
    try_with_context_mut(|ctx| {
        let ids: Vec<String> = ctx.registry.iter().map(|m| m.id().to_string()).collect();
        load_scalar_overlay(&mut ctx.registry, path, &ids)
    })
    .unwrap_or(false)
}

/// Gets a loaded model by name.
#[must_use]
pub fn get_model(name: &str) -> Option<ModelHandle> {
    try_with_context(|ctx| {
        ctx.registry.get_by_name(name).map(|model| ModelHandle {
            id: model.id().to_string(),
            name: model.name().to_string(),
        })
    })
    .flatten()
}

/// Removes a model by name.
pub fn remove_model(name: &str) {
    try_with_context_mut(|ctx| {
        if let Some(id) = ctx.registry.get_by_name(name).map(|m| m.id().to_string()) {
            fsmesh_core::ModelRegistry::remove_model(&mut ctx.registry, &id);
        }
    });
}

/// Removes all models.
pub fn remove_all_models() {
    try_with_context_mut(|ctx| ctx.registry.clear());
}

/// Returns the number of loaded models.
#[must_use]
pub fn num_models() -> usize {
    try_with_context(|ctx| ctx.registry.len()).unwrap_or(0)
}

/// Handle for a model in the global registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelHandle {
    id: String,
    name: String,
}

impl ModelHandle {
    /// Returns the registry id of this model.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the name of this model.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs `f` on the model's mesh.
    ///
    /// Returns `None` if the model no longer exists.
    pub fn with_mesh<F, R>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&TriangleMesh) -> R,
    {
        try_with_context(|ctx| ctx.registry.get(&self.id)?.mesh().map(f)).flatten()
    }

    /// Returns a copy of the named per-vertex scalar array.
    #[must_use]
    pub fn vertex_scalar(&self, name: &str) -> Option<Vec<f32>> {
        self.with_mesh(|mesh| mesh.vertex_scalar(name).map(<[f32]>::to_vec))
            .flatten()
    }

    /// Returns the number of vertices of the model's mesh.
    #[must_use]
    pub fn num_vertices(&self) -> Option<usize> {
        self.with_mesh(TriangleMesh::num_vertices)
    }
}
