//! Model registry for managing loaded surface models.

use std::collections::HashMap;

use crate::error::{FsMeshError, Result};
use crate::mesh::TriangleMesh;

/// A named model slot that may hold a mesh.
#[derive(Debug, Clone)]
pub struct ModelNode {
    id: String,
    name: String,
    mesh: Option<TriangleMesh>,
}

impl ModelNode {
    /// Returns the registry id of this model.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the display name of this model.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the mesh, if one has been loaded.
    pub fn mesh(&self) -> Option<&TriangleMesh> {
        self.mesh.as_ref()
    }
}

/// Object registry the loader creates models in.
///
/// Hosts with their own scene graph implement this; [`Registry`] is the
/// in-memory implementation.
pub trait ModelRegistry {
    /// Returns `base` if no model uses it, otherwise `base_N` for the first free N.
    fn generate_unique_name(&self, base: &str) -> String;

    /// Creates an empty model and returns its id.
    fn add_model(&mut self, name: &str) -> Result<String>;

    /// Stores `mesh` on the model with the given id.
    fn set_model_mesh(&mut self, id: &str, mesh: TriangleMesh) -> Result<()>;

    /// Removes a model, returning whether it existed.
    fn remove_model(&mut self, id: &str) -> bool;

    /// Checks if a model with the given id exists.
    fn contains_model(&self, id: &str) -> bool;

    /// Returns the name of the model with the given id.
    fn model_name(&self, id: &str) -> Option<&str>;

    /// Returns the mesh of the model with the given id, if it has one.
    fn model_mesh_mut(&mut self, id: &str) -> Option<&mut TriangleMesh>;
}

/// In-memory registry of models, keyed by id.
#[derive(Debug, Default)]
pub struct Registry {
    models: HashMap<String, ModelNode>,
    next_id: usize,
}

impl Registry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets a model by id.
    pub fn get(&self, id: &str) -> Option<&ModelNode> {
        self.models.get(id)
    }

    /// Gets a model by display name.
    pub fn get_by_name(&self, name: &str) -> Option<&ModelNode> {
        self.models.values().find(|m| m.name == name)
    }

    /// Checks if a model with the given display name exists.
    pub fn contains_name(&self, name: &str) -> bool {
        self.get_by_name(name).is_some()
    }

    /// Removes all models from the registry.
    pub fn clear(&mut self) {
        self.models.clear();
    }

    /// Returns an iterator over all models.
    pub fn iter(&self) -> impl Iterator<Item = &ModelNode> {
        self.models.values()
    }

    /// Returns the number of registered models.
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Returns true if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl ModelRegistry for Registry {
    fn generate_unique_name(&self, base: &str) -> String {
        if !self.contains_name(base) {
            return base.to_string();
        }
        (1..)
            .map(|n| format!("{base}_{n}"))
            .find(|candidate| !self.contains_name(candidate))
            .unwrap_or_else(|| base.to_string())
    }

    fn add_model(&mut self, name: &str) -> Result<String> {
        if self.contains_name(name) {
            return Err(FsMeshError::ModelExists(name.to_string()));
        }

        self.next_id += 1;
        let id = format!("ModelNode{}", self.next_id);
        log::debug!("adding model '{name}' as {id}");
        self.models.insert(
            id.clone(),
            ModelNode {
                id: id.clone(),
                name: name.to_string(),
                mesh: None,
            },
        );
        Ok(id)
    }

    fn set_model_mesh(&mut self, id: &str, mesh: TriangleMesh) -> Result<()> {
        let model = self
            .models
            .get_mut(id)
            .ok_or_else(|| FsMeshError::ModelNotFound(id.to_string()))?;
        model.mesh = Some(mesh);
        Ok(())
    }

    fn remove_model(&mut self, id: &str) -> bool {
        self.models.remove(id).is_some()
    }

    fn contains_model(&self, id: &str) -> bool {
        self.models.contains_key(id)
    }

    fn model_name(&self, id: &str) -> Option<&str> {
        self.models.get(id).map(|m| m.name.as_str())
    }

    fn model_mesh_mut(&mut self, id: &str) -> Option<&mut TriangleMesh> {
        self.models.get_mut(id)?.mesh.as_mut()
    }
}
