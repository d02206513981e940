use super::object::ObjectId;

slotmap::new_key_type! {
    /// Unique identifier for a collection in the scene.
    pub struct CollectionId;
}

/// A named container of objects.
#[derive(Debug, Clone, Default)]
pub struct CollectionData {
    /// Collection name, unique within a scene.
    pub name: String,
    /// Linked objects in link order.
    pub objects: Vec<ObjectId>,
}
