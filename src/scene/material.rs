slotmap::new_key_type! {
    /// Unique identifier for a material. Equality is identity, not name.
    pub struct MaterialId;
}

/// Data associated with a material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialData {
    /// Display name. Several materials may share one.
    pub name: String,
}

impl MaterialData {
    /// Creates a new material with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
