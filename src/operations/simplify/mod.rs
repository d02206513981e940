//! Coplanar edge dissolution.
//!
//! Adjacent faces whose dihedral angle stays within a tolerance and which
//! carry the same material are fused into larger polygons, repeatedly, until
//! a pass fuses nothing. Exactly straight-through vertices left on the fused
//! boundaries are then dropped and unreferenced vertices pruned.

mod collinear;
mod dissolve;
mod weld;

use tracing::{debug, warn};

use crate::error::Result;
use crate::math::TOLERANCE;
use crate::mesh::Mesh;
use crate::params::ShellParams;

use self::collinear::dissolve_collinear;
use self::dissolve::{dissolve_pass, Region};
use self::weld::unify_coincident;

/// Result of a simplification run.
#[derive(Debug, Clone)]
pub struct SimplifyOutcome {
    /// The simplified mesh.
    pub mesh: Mesh,
    /// Dissolution passes executed.
    pub passes: usize,
    /// Shared edges removed by face fusion.
    pub dissolved_edges: usize,
    /// Vertex uses removed as straight-through boundary points.
    pub collinear_removed: usize,
    /// `false` if the pass limit was hit before a pass fused nothing.
    pub converged: bool,
}

/// Dissolves edges between coplanar faces of equal material.
pub struct DissolveCoplanar {
    angle_tolerance: f64,
    weld_tolerance: f64,
    max_iterations: usize,
}

impl DissolveCoplanar {
    /// Creates a new `DissolveCoplanar` operation.
    #[must_use]
    pub fn new(angle_tolerance: f64, weld_tolerance: f64, max_iterations: usize) -> Self {
        Self {
            angle_tolerance,
            weld_tolerance,
            max_iterations,
        }
    }

    /// Creates the operation from pipeline parameters.
    #[must_use]
    pub fn from_params(params: &ShellParams) -> Self {
        Self::new(
            params.angle_tolerance,
            params.weld_tolerance,
            params.max_iterations,
        )
    }

    /// Executes the dissolution.
    ///
    /// Faces meeting at coincident positions are treated as adjacent even if
    /// they came from different source meshes; their loops are rewritten to
    /// the lowest vertex index at each position. A fusion is refused when any
    /// two faces that would end up in one polygon differ by more than the
    /// angle tolerance, so gradual bends stay split. Output faces are ordered by
    /// their lowest input face, so running the operation again at the same
    /// tolerance returns an identical mesh.
    ///
    /// # Errors
    ///
    /// Returns an error if the input mesh violates its index invariants.
    pub fn execute(&self, mut mesh: Mesh) -> Result<SimplifyOutcome> {
        mesh.validate()?;

        let collapsed = unify_coincident(&mut mesh, self.weld_tolerance);
        if collapsed > 0 {
            debug!(collapsed, "dropped faces collapsed by coincident vertices");
        }

        let mut regions: Vec<Region> = std::mem::take(&mut mesh.faces)
            .into_iter()
            .map(|face| Region::new(face, &mesh.vertices))
            .collect();
        let mut passes = 0;
        let mut dissolved_edges = 0;
        let mut converged = false;
        while passes < self.max_iterations {
            passes += 1;
            let result = dissolve_pass(regions, &mesh.vertices, self.angle_tolerance);
            regions = result.regions;
            dissolved_edges += result.dissolved;
            debug!(
                pass = passes,
                dissolved = result.dissolved,
                rejected = result.rejected,
                faces = regions.len(),
                "dissolution pass"
            );
            if result.dissolved == 0 {
                converged = true;
                break;
            }
        }
        mesh.faces = regions.into_iter().map(|region| region.face).collect();

        if !converged {
            warn!(
                passes,
                max_iterations = self.max_iterations,
                "coplanar dissolution did not converge; keeping partial result"
            );
        }

        let collinear_removed = dissolve_collinear(&mut mesh, TOLERANCE);
        mesh.prune_unreferenced();

        Ok(SimplifyOutcome {
            mesh,
            passes,
            dissolved_edges,
            collinear_removed,
            converged,
        })
    }
}

/// Simplifies `mesh` with the tolerances in `params`. See [`DissolveCoplanar::execute`].
///
/// # Errors
///
/// Returns an error if the input mesh violates its index invariants.
pub fn simplify(mesh: Mesh, params: &ShellParams) -> Result<SimplifyOutcome> {
    DissolveCoplanar::from_params(params).execute(mesh)
}
