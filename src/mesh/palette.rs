use crate::scene::MaterialId;

/// One palette slot: a material, or the "no material" sentinel.
pub type PaletteEntry = Option<MaterialId>;

/// Ordered, identity-unique list of materials referenced by a mesh.
///
/// Entries are compared by [`MaterialId`] (slotmap key) identity, never by
/// name, so two distinct materials that share a name stay distinct.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterialPalette {
    entries: Vec<PaletteEntry>,
}

impl MaterialPalette {
    /// Creates an empty palette.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the index of `entry`, appending it if it has not been seen yet.
    pub fn intern(&mut self, entry: PaletteEntry) -> usize {
        if let Some(idx) = self.entries.iter().position(|e| *e == entry) {
            return idx;
        }
        self.entries.push(entry);
        self.entries.len() - 1
    }

    /// Returns the entry at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<PaletteEntry> {
        self.entries.get(index).copied()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the palette has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in palette order.
    #[must_use]
    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }
}
