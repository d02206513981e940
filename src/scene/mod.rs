mod collection;
mod material;
pub mod materials;
mod object;

pub use collection::{CollectionData, CollectionId};
pub use material::{MaterialData, MaterialId};
pub use object::{ObjectData, ObjectId, SourceFace, SourceMesh};

use crate::error::SceneError;
use slotmap::SlotMap;

/// Central arena that owns all scene objects, materials and collections.
///
/// Entities reference each other via typed IDs (generational indices), so a
/// removed object can never be confused with one inserted later.
#[derive(Debug, Default)]
pub struct Scene {
    objects: SlotMap<ObjectId, ObjectData>,
    materials: SlotMap<MaterialId, MaterialData>,
    collections: SlotMap<CollectionId, CollectionData>,
}

impl Scene {
    /// Creates a new, empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Object operations ---

    /// Inserts an object and returns its ID.
    pub fn add_object(&mut self, data: ObjectData) -> ObjectId {
        self.objects.insert(data)
    }

    /// Returns a reference to the object data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the scene.
    pub fn object(&self, id: ObjectId) -> Result<&ObjectData, SceneError> {
        self.objects
            .get(id)
            .ok_or_else(|| SceneError::EntityNotFound(format!("object {id:?}")))
    }

    /// Returns a mutable reference to the object data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the scene.
    pub fn object_mut(&mut self, id: ObjectId) -> Result<&mut ObjectData, SceneError> {
        self.objects
            .get_mut(id)
            .ok_or_else(|| SceneError::EntityNotFound(format!("object {id:?}")))
    }

    /// Removes an object, unlinking it from every collection and orphaning its children.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the scene.
    pub fn remove_object(&mut self, id: ObjectId) -> Result<ObjectData, SceneError> {
        let data = self
            .objects
            .remove(id)
            .ok_or_else(|| SceneError::EntityNotFound(format!("object {id:?}")))?;
        for collection in self.collections.values_mut() {
            collection.objects.retain(|&o| o != id);
        }
        for object in self.objects.values_mut() {
            if object.parent == Some(id) {
                object.parent = None;
            }
        }
        Ok(data)
    }

    /// Iterates over all objects.
    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &ObjectData)> {
        self.objects.iter()
    }

    /// Number of objects in the scene.
    #[must_use]
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Objects whose parent is `parent`.
    #[must_use]
    pub fn children_of(&self, parent: ObjectId) -> Vec<ObjectId> {
        self.objects
            .iter()
            .filter(|(_, o)| o.parent == Some(parent))
            .map(|(id, _)| id)
            .collect()
    }

    /// Name of the object's parent, or the object's own name when it has none.
    ///
    /// # Errors
    ///
    /// Returns an error if the object or its parent is missing.
    pub fn parent_name(&self, id: ObjectId) -> Result<&str, SceneError> {
        let object = self.object(id)?;
        match object.parent {
            Some(parent) => Ok(&self.object(parent)?.name),
            None => Ok(&object.name),
        }
    }

    // --- Material operations ---

    /// Inserts a material and returns its ID.
    pub fn add_material(&mut self, data: MaterialData) -> MaterialId {
        self.materials.insert(data)
    }

    /// Returns a reference to the material data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the scene.
    pub fn material(&self, id: MaterialId) -> Result<&MaterialData, SceneError> {
        self.materials
            .get(id)
            .ok_or_else(|| SceneError::EntityNotFound(format!("material {id:?}")))
    }

    /// Removes a material and clears every object slot that referenced it.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the scene.
    pub fn remove_material(&mut self, id: MaterialId) -> Result<MaterialData, SceneError> {
        let data = self
            .materials
            .remove(id)
            .ok_or_else(|| SceneError::EntityNotFound(format!("material {id:?}")))?;
        for object in self.objects.values_mut() {
            for slot in &mut object.material_slots {
                if *slot == Some(id) {
                    *slot = None;
                }
            }
        }
        Ok(data)
    }

    /// Iterates over all materials in slot order.
    pub fn materials(&self) -> impl Iterator<Item = (MaterialId, &MaterialData)> {
        self.materials.iter()
    }

    // --- Collection operations ---

    /// Returns the collection named `name`, creating it if absent.
    pub fn collection_or_create(&mut self, name: &str) -> CollectionId {
        if let Some(id) = self.collection_by_name(name) {
            return id;
        }
        self.collections.insert(CollectionData {
            name: name.to_owned(),
            objects: Vec::new(),
        })
    }

    /// Looks up a collection by name.
    #[must_use]
    pub fn collection_by_name(&self, name: &str) -> Option<CollectionId> {
        self.collections
            .iter()
            .find(|(_, c)| c.name == name)
            .map(|(id, _)| id)
    }

    /// Returns a reference to the collection data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the scene.
    pub fn collection(&self, id: CollectionId) -> Result<&CollectionData, SceneError> {
        self.collections
            .get(id)
            .ok_or_else(|| SceneError::EntityNotFound(format!("collection {id:?}")))
    }

    /// Links an object into a collection. Linking twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the object or collection is not found.
    pub fn link(&mut self, collection: CollectionId, object: ObjectId) -> Result<(), SceneError> {
        self.object(object)?;
        let data = self
            .collections
            .get_mut(collection)
            .ok_or_else(|| SceneError::EntityNotFound(format!("collection {collection:?}")))?;
        if !data.objects.contains(&object) {
            data.objects.push(object);
        }
        Ok(())
    }

    /// Unlinks an object from a collection. Returns `true` if it was linked.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection is not found.
    pub fn unlink(
        &mut self,
        collection: CollectionId,
        object: ObjectId,
    ) -> Result<bool, SceneError> {
        let data = self
            .collections
            .get_mut(collection)
            .ok_or_else(|| SceneError::EntityNotFound(format!("collection {collection:?}")))?;
        let before = data.objects.len();
        data.objects.retain(|&o| o != object);
        Ok(data.objects.len() != before)
    }
}
