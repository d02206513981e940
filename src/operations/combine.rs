use tracing::debug;

use crate::error::{CombineError, MalformedReason, Result};
use crate::math::{transform_point, Matrix4};
use crate::mesh::{Face, Mesh};
use crate::params::EmptySlotPolicy;
use crate::scene::{MaterialId, ObjectData, ObjectId, SourceMesh};

/// One input to [`CombineMeshes`]: a source mesh with its frame and slots.
#[derive(Debug, Clone, Copy)]
pub struct MeshSource<'a> {
    /// Object the mesh belongs to, reported on malformed data.
    pub object: ObjectId,
    /// Local-frame mesh data.
    pub mesh: &'a SourceMesh,
    /// Local-to-world transform.
    pub transform: &'a Matrix4,
    /// Local material slots.
    pub slots: &'a [Option<MaterialId>],
}

impl<'a> MeshSource<'a> {
    /// Borrows a scene object as a combiner input. `None` for non-mesh objects.
    #[must_use]
    pub fn from_object(object: ObjectId, data: &'a ObjectData) -> Option<Self> {
        data.mesh.as_ref().map(|mesh| Self {
            object,
            mesh,
            transform: &data.world_transform,
            slots: &data.material_slots,
        })
    }
}

/// Merges source meshes into one world-space mesh with a shared palette.
pub struct CombineMeshes<'a> {
    sources: &'a [MeshSource<'a>],
    policy: EmptySlotPolicy,
}

impl<'a> CombineMeshes<'a> {
    /// Creates a new `CombineMeshes` operation.
    #[must_use]
    pub fn new(sources: &'a [MeshSource<'a>], policy: EmptySlotPolicy) -> Self {
        Self { sources, policy }
    }

    /// Executes the combination.
    ///
    /// Vertices are transformed to world space and appended in source order;
    /// each source's loops are shifted by the running vertex offset. The
    /// palette collects slot materials in first-seen order, so the same
    /// sources in the same order always produce the same palette.
    ///
    /// # Errors
    ///
    /// Returns [`CombineError::MalformedSource`] for a face whose loop is
    /// shorter than three vertices, indexes past its source's vertices, or
    /// names a slot the source does not have (or an unassigned slot under
    /// [`EmptySlotPolicy::Reject`]).
    pub fn execute(&self) -> Result<Mesh> {
        let mut combined = Mesh::new();
        let mut offset = 0usize;

        for source in self.sources {
            let lookup = self.slot_lookup(&mut combined, source.slots);
            let vertex_count = source.mesh.positions.len();

            combined.faces.reserve(source.mesh.faces.len());
            for (face_idx, face) in source.mesh.faces.iter().enumerate() {
                let malformed = |reason| CombineError::MalformedSource {
                    object: source.object,
                    face: face_idx,
                    reason,
                };

                if face.vertices.len() < 3 {
                    return Err(malformed(MalformedReason::ShortLoop(face.vertices.len())).into());
                }
                if let Some(&index) = face.vertices.iter().find(|&&v| v >= vertex_count) {
                    return Err(malformed(MalformedReason::VertexIndex {
                        index,
                        count: vertex_count,
                    })
                    .into());
                }

                let material = if source.slots.is_empty() {
                    self.unassigned(&mut combined).ok_or_else(|| {
                        malformed(MalformedReason::UnassignedSlot {
                            slot: face.material_slot,
                        })
                    })?
                } else {
                    match lookup.get(face.material_slot) {
                        Some(Some(idx)) => *idx,
                        Some(None) => {
                            return Err(malformed(MalformedReason::UnassignedSlot {
                                slot: face.material_slot,
                            })
                            .into())
                        }
                        None => {
                            return Err(malformed(MalformedReason::MaterialSlot {
                                slot: face.material_slot,
                                count: source.slots.len(),
                            })
                            .into())
                        }
                    }
                };

                let vertices = face.vertices.iter().map(|&v| v + offset).collect();
                combined.faces.push(Face::new(vertices, material));
            }

            combined.vertices.extend(
                source
                    .mesh
                    .positions
                    .iter()
                    .map(|p| transform_point(source.transform, p)),
            );
            offset += vertex_count;

            debug!(
                object = ?source.object,
                vertices = vertex_count,
                faces = source.mesh.faces.len(),
                "combined source mesh"
            );
        }

        Ok(combined)
    }

    /// Builds the slot → palette index table for one source.
    ///
    /// Every slot is interned, used or not. `None` marks an unassigned slot
    /// that the policy rejects.
    fn slot_lookup(&self, mesh: &mut Mesh, slots: &[Option<MaterialId>]) -> Vec<Option<usize>> {
        slots
            .iter()
            .map(|slot| match slot {
                Some(material) => Some(mesh.palette.intern(Some(*material))),
                None => self.unassigned(mesh),
            })
            .collect()
    }

    /// Palette index for an unassigned slot under the current policy.
    fn unassigned(&self, mesh: &mut Mesh) -> Option<usize> {
        match self.policy {
            EmptySlotPolicy::NoMaterial => Some(mesh.palette.intern(None)),
            EmptySlotPolicy::Reject => None,
        }
    }
}

/// Combines `sources` into one mesh. See [`CombineMeshes::execute`].
///
/// # Errors
///
/// Returns an error if any source face is malformed.
pub fn combine(sources: &[MeshSource<'_>], policy: EmptySlotPolicy) -> Result<Mesh> {
    CombineMeshes::new(sources, policy).execute()
}
