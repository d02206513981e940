//! Material bookkeeping that runs around the shell pipeline: consolidating
//! numbered duplicates (`Wall.001`, `Wall.002`) and purging orphans.

use std::collections::HashSet;

use tracing::{debug, info};

use super::{MaterialData, MaterialId, Scene};

/// Materials sharing a base name, and the material that replaced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialGroup {
    /// Shared name with digit runs removed.
    pub base_name: String,
    /// Grouped materials in slot order.
    pub members: Vec<MaterialId>,
    /// The newly created `"{base}_Group"` material.
    pub replacement: MaterialId,
}

/// Material name with every run of digits removed.
///
/// `"Wall.001"` and `"Wall.17"` both reduce to `"Wall."`. Digits of any
/// script count (`"Wand٣"` reduces to `"Wand"`), as do other numeric
/// characters such as `'½'`.
#[must_use]
pub fn base_name(name: &str) -> String {
    name.chars().filter(|c| !c.is_numeric()).collect()
}

/// Consolidates materials whose names differ only in their digits.
///
/// Every group with at least two members gets a fresh `"{base}_Group"`
/// material and all object slots pointing at a member are reassigned to it.
/// The old materials are left in place; [`purge_unused_materials`] removes
/// them once nothing references them.
pub fn group_similar_materials(scene: &mut Scene) -> Vec<MaterialGroup> {
    let mut buckets: Vec<(String, Vec<MaterialId>)> = Vec::new();
    for (id, data) in scene.materials() {
        let base = base_name(&data.name);
        match buckets.iter_mut().find(|(b, _)| *b == base) {
            Some((_, members)) => members.push(id),
            None => buckets.push((base, vec![id])),
        }
    }

    let mut groups = Vec::new();
    for (base, members) in buckets {
        if members.len() < 2 {
            continue;
        }
        let replacement = scene.add_material(MaterialData::new(format!("{base}_Group")));
        let member_set: HashSet<MaterialId> = members.iter().copied().collect();

        let mut reassigned = 0usize;
        for (_, object) in scene.objects.iter_mut() {
            for slot in &mut object.material_slots {
                if slot.is_some_and(|m| member_set.contains(&m)) {
                    *slot = Some(replacement);
                    reassigned += 1;
                }
            }
        }
        debug!(base = %base, members = members.len(), reassigned, "grouped materials");

        groups.push(MaterialGroup {
            base_name: base,
            members,
            replacement,
        });
    }

    info!(groups = groups.len(), "material grouping finished");
    groups
}

/// Removes every material that no object slot references.
///
/// Returns the number of materials removed.
pub fn purge_unused_materials(scene: &mut Scene) -> usize {
    let used: HashSet<MaterialId> = scene
        .objects()
        .flat_map(|(_, o)| o.material_slots.iter().flatten().copied())
        .collect();

    let unused: Vec<MaterialId> = scene
        .materials()
        .map(|(id, _)| id)
        .filter(|id| !used.contains(id))
        .collect();

    let count = unused.len();
    for id in unused {
        scene.materials.remove(id);
    }
    info!(removed = count, "purged unused materials");
    count
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::scene::ObjectData;

    #[test]
    fn base_name_strips_digit_runs() {
        assert_eq!(base_name("Wall.001"), "Wall.");
        assert_eq!(base_name("Glas2Scheibe10"), "GlasScheibe");
        assert_eq!(base_name("Beton"), "Beton");
        assert_eq!(base_name("Wand\u{663}"), "Wand");
        assert_eq!(base_name("Glas\u{ff11}\u{ff12}"), "Glas");
    }

    #[test]
    fn numbered_duplicates_are_grouped() {
        let mut scene = Scene::new();
        let w1 = scene.add_material(MaterialData::new("Wall.001"));
        let glass = scene.add_material(MaterialData::new("Glass"));
        let w2 = scene.add_material(MaterialData::new("Wall.002"));
        let a = scene.add_object(ObjectData::empty("A").with_slots(vec![Some(w1), Some(glass)]));
        let b = scene.add_object(ObjectData::empty("B").with_slots(vec![None, Some(w2)]));

        let groups = group_similar_materials(&mut scene);
        assert_eq!(groups.len(), 1);
        let group = &groups[0];
        assert_eq!(group.base_name, "Wall.");
        assert_eq!(group.members, vec![w1, w2]);
        assert_eq!(scene.material(group.replacement).unwrap().name, "Wall._Group");

        let r = Some(group.replacement);
        assert_eq!(scene.object(a).unwrap().material_slots, vec![r, Some(glass)]);
        assert_eq!(scene.object(b).unwrap().material_slots, vec![None, r]);
    }

    #[test]
    fn purge_removes_only_unreferenced() {
        let mut scene = Scene::new();
        let used = scene.add_material(MaterialData::new("Used"));
        let orphan = scene.add_material(MaterialData::new("Orphan"));
        scene.add_object(ObjectData::empty("A").with_slots(vec![Some(used), None]));

        assert_eq!(purge_unused_materials(&mut scene), 1);
        assert!(scene.material(used).is_ok());
        assert!(scene.material(orphan).is_err());
        assert_eq!(purge_unused_materials(&mut scene), 0);
    }

    #[test]
    fn grouping_then_purge_leaves_replacements() {
        let mut scene = Scene::new();
        let m1 = scene.add_material(MaterialData::new("Floor1"));
        let m2 = scene.add_material(MaterialData::new("Floor2"));
        scene.add_object(ObjectData::empty("A").with_slots(vec![Some(m1), Some(m2)]));

        let groups = group_similar_materials(&mut scene);
        assert_eq!(purge_unused_materials(&mut scene), 2);
        let names: Vec<_> = scene.materials().map(|(_, m)| m.name.clone()).collect();
        assert_eq!(names, vec!["Floor_Group".to_owned()]);
        assert_eq!(groups[0].members, vec![m1, m2]);
    }
}
