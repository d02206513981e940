use std::collections::HashSet;

use crate::error::SceneError;
use crate::scene::{ObjectId, Scene};

/// Objects combined into one shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectGroup {
    /// The shared parent, or the member itself for a parent-less object.
    pub key: ObjectId,
    /// Name of the key object; prefixes the result object's name.
    pub name: String,
    /// Members in selection order.
    pub members: Vec<ObjectId>,
}

/// Partitions `selection` by parent.
///
/// A parent-less object keys its own group, so selecting a parent together
/// with its children puts all of them in one group. Groups appear in the
/// order their first member was selected; duplicate selections are ignored.
///
/// # Errors
///
/// Returns an error if a selected object or its parent is not in the scene.
pub fn partition_by_parent(
    scene: &Scene,
    selection: &[ObjectId],
) -> Result<Vec<ObjectGroup>, SceneError> {
    let mut groups: Vec<ObjectGroup> = Vec::new();
    let mut seen: HashSet<ObjectId> = HashSet::with_capacity(selection.len());

    for &id in selection {
        if !seen.insert(id) {
            continue;
        }
        let key = scene.object(id)?.parent.unwrap_or(id);
        match groups.iter_mut().find(|g| g.key == key) {
            Some(group) => group.members.push(id),
            None => groups.push(ObjectGroup {
                key,
                name: scene.parent_name(id)?.to_owned(),
                members: vec![id],
            }),
        }
    }
    Ok(groups)
}
