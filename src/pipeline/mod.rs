//! Group-wise driver: partition, process, and swap in result objects.
//!
//! Groups are computed against a shared `&Scene` (in parallel when
//! [`ShellParams::parallel`] is set) and committed afterwards one at a time,
//! so the scene has a single writer.

mod group;
mod report;

pub use group::{partition_by_parent, ObjectGroup};
pub use report::{GroupFailure, GroupReport, PipelineReport};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::mesh::Mesh;
use crate::operations::{combine, filter_extremal, simplify, MeshSource};
use crate::params::ShellParams;
use crate::scene::{ObjectData, ObjectId, Scene, SourceFace, SourceMesh};

/// Suffix appended to a group's name to name its result object.
pub const RESULT_SUFFIX: &str = "_CombinedObject";

/// A group's finished shell, ready to be committed.
#[derive(Debug)]
struct GroupShell {
    mesh: Mesh,
    interior_faces_removed: usize,
    degenerate: bool,
    converged: bool,
}

/// Replaces each parent group of the selection with one shell object.
pub struct ShellPipeline {
    params: ShellParams,
}

impl ShellPipeline {
    /// Creates a new pipeline.
    #[must_use]
    pub fn new(params: ShellParams) -> Self {
        Self { params }
    }

    /// Parameters this pipeline runs with.
    #[must_use]
    pub fn params(&self) -> &ShellParams {
        &self.params
    }

    /// Runs the pipeline over `selection`.
    ///
    /// For every group, the members' meshes are combined, simplified and
    /// filtered. The members are then removed from the scene and a single
    /// `"{group}_CombinedObject"` is linked into the output collection.
    /// A group whose processing fails keeps its originals and is listed in
    /// [`PipelineReport::failures`]; the other groups still commit.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters are invalid or a selected object
    /// (or its parent) is not in the scene.
    pub fn execute(&self, scene: &mut Scene, selection: &[ObjectId]) -> Result<PipelineReport> {
        self.params.validate()?;

        if selection.is_empty() {
            info!("no objects selected; nothing to do");
            return Ok(PipelineReport::empty_selection());
        }

        let groups = partition_by_parent(scene, selection)?;
        info!(
            objects = selection.len(),
            groups = groups.len(),
            parallel = self.params.parallel,
            "building shells"
        );

        let shared: &Scene = scene;
        let shells: Vec<Result<Option<GroupShell>>> = if self.params.parallel {
            groups
                .par_iter()
                .map(|group| process_group(shared, group, &self.params))
                .collect()
        } else {
            groups
                .iter()
                .map(|group| process_group(shared, group, &self.params))
                .collect()
        };

        let mut report = PipelineReport::default();
        for (group, shell) in groups.into_iter().zip(shells) {
            match shell {
                Ok(Some(shell)) => report.groups.push(self.commit(scene, group, shell)?),
                Ok(None) => {
                    debug!(group = %group.name, "group has no mesh members; skipped");
                    report.skipped.push(group.name);
                }
                Err(error) => {
                    warn!(group = %group.name, %error, "group failed; originals kept");
                    report.failures.push(GroupFailure {
                        name: group.name,
                        error,
                    });
                }
            }
        }

        info!(
            replaced = report.groups.len(),
            skipped = report.skipped.len(),
            failed = report.failures.len(),
            "shell pipeline finished"
        );
        Ok(report)
    }

    /// Swaps the group's members for its shell.
    fn commit(
        &self,
        scene: &mut Scene,
        group: ObjectGroup,
        shell: GroupShell,
    ) -> Result<GroupReport> {
        for &member in &group.members {
            scene.remove_object(member)?;
        }

        let faces = shell.mesh.faces.len();
        let vertices = shell.mesh.vertices.len();
        let name = format!("{}{RESULT_SUFFIX}", group.name);
        let result = scene.add_object(into_object(name, shell.mesh));
        let collection = scene.collection_or_create(&self.params.output_collection);
        scene.link(collection, result)?;

        info!(
            group = %group.name,
            members = group.members.len(),
            faces,
            vertices,
            "group replaced by shell"
        );
        Ok(GroupReport {
            name: group.name,
            result,
            removed: group.members,
            faces,
            vertices,
            interior_faces_removed: shell.interior_faces_removed,
            degenerate: shell.degenerate,
            converged: shell.converged,
        })
    }
}

/// Combine, simplify, filter and optionally reseal one group.
/// `None` if no member carries a mesh.
fn process_group(
    scene: &Scene,
    group: &ObjectGroup,
    params: &ShellParams,
) -> Result<Option<GroupShell>> {
    let mut sources = Vec::with_capacity(group.members.len());
    for &id in &group.members {
        if let Some(source) = MeshSource::from_object(id, scene.object(id)?) {
            sources.push(source);
        }
    }
    if sources.is_empty() {
        return Ok(None);
    }

    let combined = combine(&sources, params.empty_slot_policy)?;
    debug!(
        group = %group.name,
        sources = sources.len(),
        faces = combined.faces.len(),
        vertices = combined.vertices.len(),
        "combined"
    );

    let simplified = simplify(combined, params)?;
    let mut converged = simplified.converged;
    let filtered = filter_extremal(simplified.mesh, params)?;
    let degenerate = filtered.is_degenerate();
    if degenerate {
        warn!(group = %group.name, "filtered shell has no faces");
    }

    let mut mesh = filtered.mesh;
    if params.reseal_seams && !degenerate {
        let resealed = simplify(mesh, params)?;
        converged &= resealed.converged;
        mesh = resealed.mesh;
    }

    Ok(Some(GroupShell {
        mesh,
        interior_faces_removed: filtered.removed_faces,
        degenerate,
        converged,
    }))
}

/// Wraps a world-space mesh as a parent-less object with an identity transform.
fn into_object(name: String, mesh: Mesh) -> ObjectData {
    let slots = mesh.palette.entries().to_vec();
    let faces = mesh
        .faces
        .into_iter()
        .map(|face| SourceFace::new(face.vertices, face.material))
        .collect();
    let source = SourceMesh {
        positions: mesh.vertices,
        faces,
    };
    ObjectData::mesh(name, source).with_slots(slots)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{CombineError, ShellError};
    use crate::math::{Matrix4, Vector3};
    use crate::mesh::fixtures::unit_cube;
    use crate::params::DEFAULT_OUTPUT_COLLECTION;
    use crate::scene::{MaterialData, MaterialId};

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn cube_mesh() -> SourceMesh {
        let cube = unit_cube();
        SourceMesh {
            positions: cube.vertices,
            faces: cube
                .faces
                .into_iter()
                .map(|f| SourceFace::new(f.vertices, 0))
                .collect(),
        }
    }

    fn cube_at(name: &str, offset: Vector3, material: MaterialId) -> ObjectData {
        ObjectData::mesh(name, cube_mesh())
            .with_transform(Matrix4::new_translation(&offset))
            .with_slots(vec![Some(material)])
    }

    /// Two unit cubes stacked along z under one parent.
    fn stacked_scene() -> (Scene, ObjectId, [ObjectId; 2]) {
        let mut scene = Scene::new();
        let concrete = scene.add_material(MaterialData::new("Concrete"));
        let haus = scene.add_object(ObjectData::empty("Haus"));
        let eg = scene.add_object(
            cube_at("EG", Vector3::zeros(), concrete).with_parent(haus),
        );
        let og = scene.add_object(
            cube_at("OG", Vector3::new(0.0, 0.0, 1.0), concrete).with_parent(haus),
        );
        (scene, haus, [eg, og])
    }

    #[test]
    fn stacked_cubes_become_one_shell() {
        init_tracing();
        let (mut scene, haus, members) = stacked_scene();

        let report = ShellPipeline::new(ShellParams::default())
            .execute(&mut scene, &members)
            .unwrap();

        assert!(report.is_success());
        assert_eq!(report.groups.len(), 1);
        let group = &report.groups[0];
        assert_eq!(group.name, "Haus");
        assert_eq!(group.faces, 6);
        assert_eq!(group.vertices, 8);
        assert_eq!(group.interior_faces_removed, 2);
        assert!(!group.degenerate);
        assert!(group.converged);

        for id in members {
            assert!(scene.object(id).is_err());
        }
        // The unselected parent stays in place.
        assert!(scene.object(haus).is_ok());

        let result = scene.object(group.result).unwrap();
        assert_eq!(result.name, "Haus_CombinedObject");
        assert!(result.parent.is_none());
        assert_eq!(result.world_transform, Matrix4::identity());
        let mesh = result.mesh.as_ref().unwrap();
        assert_eq!(mesh.faces.len(), 6);
        assert_eq!(mesh.positions.len(), 8);
        assert!(mesh.positions.iter().all(|p| p.z == 0.0 || p.z == 2.0));
        assert_eq!(result.material_slots.len(), 1);

        let collection = scene.collection_by_name(DEFAULT_OUTPUT_COLLECTION).unwrap();
        assert_eq!(scene.collection(collection).unwrap().objects, vec![group.result]);
    }

    #[test]
    fn empty_selection_is_reported_not_failed() {
        let (mut scene, _, _) = stacked_scene();
        let before = scene.object_count();

        let report = ShellPipeline::new(ShellParams::default())
            .execute(&mut scene, &[])
            .unwrap();

        assert!(report.empty_selection);
        assert!(report.groups.is_empty());
        assert_eq!(scene.object_count(), before);
        assert!(scene.collection_by_name(DEFAULT_OUTPUT_COLLECTION).is_none());
    }

    #[test]
    fn failing_group_keeps_its_originals() {
        init_tracing();
        let mut scene = Scene::new();
        let concrete = scene.add_material(MaterialData::new("Concrete"));
        let good = scene.add_object(cube_at("Garage", Vector3::zeros(), concrete));
        let mut broken_mesh = cube_mesh();
        broken_mesh.faces[3].vertices[1] = 42;
        let broken = scene.add_object(
            ObjectData::mesh("Schuppen", broken_mesh).with_slots(vec![Some(concrete)]),
        );

        let report = ShellPipeline::new(ShellParams::default())
            .execute(&mut scene, &[good, broken])
            .unwrap();

        assert!(!report.is_success());
        assert_eq!(report.groups.len(), 1);
        assert_eq!(report.groups[0].name, "Garage");
        assert!(scene.object(good).is_err());

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].name, "Schuppen");
        assert!(matches!(
            report.failures[0].error,
            ShellError::Combine(CombineError::MalformedSource { object, face: 3, .. })
                if object == broken
        ));
        assert_eq!(scene.object(broken).unwrap().name, "Schuppen");
    }

    #[test]
    fn meshless_groups_are_skipped() {
        let mut scene = Scene::new();
        let lamp = scene.add_object(ObjectData::empty("Lamp"));

        let report = ShellPipeline::new(ShellParams::default())
            .execute(&mut scene, &[lamp])
            .unwrap();

        assert!(report.groups.is_empty());
        assert_eq!(report.skipped, vec!["Lamp".to_owned()]);
        assert!(scene.object(lamp).is_ok());
    }

    #[test]
    fn sequential_run_matches_parallel_run() {
        let run = |parallel: bool| {
            let (mut scene, _, members) = stacked_scene();
            let params = ShellParams::default().with_parallel(parallel);
            let report = ShellPipeline::new(params)
                .execute(&mut scene, &members)
                .unwrap();
            let result = scene.object(report.groups[0].result).unwrap();
            result.mesh.clone().unwrap()
        };
        assert_eq!(run(true), run(false));
    }

    #[test]
    fn results_go_to_the_configured_collection() {
        let (mut scene, _, members) = stacked_scene();
        let params = ShellParams::default().with_output_collection("Bestand");

        let report = ShellPipeline::new(params)
            .execute(&mut scene, &members)
            .unwrap();

        let collection = scene.collection_by_name("Bestand").unwrap();
        assert_eq!(
            scene.collection(collection).unwrap().objects,
            vec![report.groups[0].result]
        );
        assert!(scene.collection_by_name(DEFAULT_OUTPUT_COLLECTION).is_none());
    }

    #[test]
    fn invalid_params_abort_before_touching_the_scene() {
        let (mut scene, _, members) = stacked_scene();
        let before = scene.object_count();
        let mut params = ShellParams::default();
        params.max_iterations = 0;

        let err = ShellPipeline::new(params)
            .execute(&mut scene, &members)
            .unwrap_err();

        assert!(matches!(err, ShellError::Params(_)));
        assert_eq!(scene.object_count(), before);
    }
}
