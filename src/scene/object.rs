use crate::math::{Matrix4, Point3};

use super::material::MaterialId;

slotmap::new_key_type! {
    /// Unique identifier for an object in the scene.
    pub struct ObjectId;
}

/// A face of a source mesh, indexing into its object's local slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFace {
    /// Local vertex indices in winding order.
    pub vertices: Vec<usize>,
    /// Index into the owning object's material slots.
    pub material_slot: usize,
}

impl SourceFace {
    /// Creates a new source face.
    #[must_use]
    pub fn new(vertices: Vec<usize>, material_slot: usize) -> Self {
        Self {
            vertices,
            material_slot,
        }
    }
}

/// Mesh data as authored, in the object's local frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceMesh {
    /// Local vertex positions.
    pub positions: Vec<Point3>,
    /// Faces over `positions`.
    pub faces: Vec<SourceFace>,
}

/// Data associated with a scene object.
#[derive(Debug, Clone)]
pub struct ObjectData {
    /// Display name; also the group key for parent-less objects.
    pub name: String,
    /// Parent object, if any.
    pub parent: Option<ObjectId>,
    /// Mesh payload. `None` for non-mesh objects such as grouping empties.
    pub mesh: Option<SourceMesh>,
    /// Local-to-world transform.
    pub world_transform: Matrix4,
    /// Material slots; `None` marks an unassigned slot.
    pub material_slots: Vec<Option<MaterialId>>,
}

impl ObjectData {
    /// Creates a mesh object with an identity transform and no slots.
    #[must_use]
    pub fn mesh(name: impl Into<String>, mesh: SourceMesh) -> Self {
        Self {
            name: name.into(),
            parent: None,
            mesh: Some(mesh),
            world_transform: Matrix4::identity(),
            material_slots: Vec::new(),
        }
    }

    /// Creates an object without mesh data.
    #[must_use]
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            mesh: None,
            world_transform: Matrix4::identity(),
            material_slots: Vec::new(),
        }
    }

    /// Sets the parent.
    #[must_use]
    pub fn with_parent(mut self, parent: ObjectId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Sets the world transform.
    #[must_use]
    pub fn with_transform(mut self, transform: Matrix4) -> Self {
        self.world_transform = transform;
        self
    }

    /// Sets the material slots.
    #[must_use]
    pub fn with_slots(mut self, slots: Vec<Option<MaterialId>>) -> Self {
        self.material_slots = slots;
        self
    }
}
