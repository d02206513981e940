use tracing::{debug, warn};

use crate::error::Result;
use crate::math::polygon_3d::mean_z;
use crate::mesh::Mesh;
use crate::params::ShellParams;

/// Result of extremal face filtering.
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    /// The filtered shell.
    pub mesh: Mesh,
    /// Horizontal faces removed as interior partitions.
    pub removed_faces: usize,
    /// Vertices pruned after face removal.
    pub pruned_vertices: usize,
    /// Global `(z_min, z_max)` of the input, `None` for a faceless mesh.
    pub z_range: Option<(f64, f64)>,
}

impl FilterOutcome {
    /// `true` if filtering left no faces at all.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.mesh.faces.is_empty()
    }
}

/// Keeps only the top and bottom horizontal faces plus every non-horizontal face.
pub struct FilterExtremal {
    z_tolerance: f64,
    normal_tolerance: f64,
}

impl FilterExtremal {
    /// Creates a new `FilterExtremal` operation.
    #[must_use]
    pub fn new(z_tolerance: f64, normal_tolerance: f64) -> Self {
        Self {
            z_tolerance,
            normal_tolerance,
        }
    }

    /// Creates the operation from pipeline parameters.
    #[must_use]
    pub fn from_params(params: &ShellParams) -> Self {
        Self::new(params.z_tolerance, params.normal_tolerance)
    }

    /// Executes the filter.
    ///
    /// A face is horizontal when `|normal.z|` is within `normal_tolerance` of
    /// one. A horizontal face survives only if the mean z of its loop is within
    /// `z_tolerance` of the lowest or highest z referenced by any face.
    /// Faces without a defined normal are never horizontal.
    ///
    /// # Errors
    ///
    /// Returns an error if the input mesh violates its index invariants.
    pub fn execute(&self, mut mesh: Mesh) -> Result<FilterOutcome> {
        mesh.validate()?;

        let Some((z_min, z_max)) = mesh.z_range() else {
            return Ok(FilterOutcome {
                mesh,
                removed_faces: 0,
                pruned_vertices: 0,
                z_range: None,
            });
        };

        let before = mesh.faces.len();
        let vertices = &mesh.vertices;
        mesh.faces.retain(|face| {
            let Some(normal) = face.normal(vertices) else {
                return true;
            };
            if (normal.z.abs() - 1.0).abs() > self.normal_tolerance {
                return true;
            }
            let z = mean_z(&face.points(vertices));
            (z - z_min).abs() <= self.z_tolerance || (z - z_max).abs() <= self.z_tolerance
        });
        let removed_faces = before - mesh.faces.len();
        let pruned_vertices = mesh.prune_unreferenced();

        debug!(z_min, z_max, removed_faces, pruned_vertices, "filtered interior horizontal faces");
        if mesh.faces.is_empty() {
            warn!(removed_faces, "filter removed every face; result is an empty shell");
        }

        Ok(FilterOutcome {
            mesh,
            removed_faces,
            pruned_vertices,
            z_range: Some((z_min, z_max)),
        })
    }
}

/// Filters `mesh` with the tolerances in `params`. See [`FilterExtremal::execute`].
///
/// # Errors
///
/// Returns an error if the input mesh violates its index invariants.
pub fn filter_extremal(mesh: Mesh, params: &ShellParams) -> Result<FilterOutcome> {
    FilterExtremal::from_params(params).execute(mesh)
}
