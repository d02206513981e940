use std::fmt;

use crate::error::ShellError;
use crate::scene::ObjectId;

/// Summary of one group that was replaced by a shell object.
#[derive(Debug, Clone)]
pub struct GroupReport {
    /// Group name (parent name or own name).
    pub name: String,
    /// The inserted result object.
    pub result: ObjectId,
    /// Group members removed from the scene.
    pub removed: Vec<ObjectId>,
    /// Faces in the final shell.
    pub faces: usize,
    /// Vertices in the final shell.
    pub vertices: usize,
    /// Interior horizontal faces removed by the filter.
    pub interior_faces_removed: usize,
    /// `true` if the filter left no faces.
    pub degenerate: bool,
    /// `false` if any dissolution run hit its pass limit.
    pub converged: bool,
}

/// A group whose pipeline failed; its members were left untouched.
#[derive(Debug)]
pub struct GroupFailure {
    /// Group name.
    pub name: String,
    /// The failure.
    pub error: ShellError,
}

/// Outcome of a pipeline run.
#[derive(Debug, Default)]
pub struct PipelineReport {
    /// The run was invoked with nothing selected.
    pub empty_selection: bool,
    /// Groups replaced by a result object, in group order.
    pub groups: Vec<GroupReport>,
    /// Groups skipped because none of their members carry a mesh.
    pub skipped: Vec<String>,
    /// Groups whose pipeline failed.
    pub failures: Vec<GroupFailure>,
}

impl PipelineReport {
    /// Report for an empty selection.
    #[must_use]
    pub fn empty_selection() -> Self {
        Self {
            empty_selection: true,
            ..Self::default()
        }
    }

    /// `true` if every group was processed without failure.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for PipelineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.empty_selection {
            return write!(f, "Shell pipeline: nothing selected");
        }
        write!(
            f,
            "Shell pipeline: {} replaced, {} skipped, {} failed",
            self.groups.len(),
            self.skipped.len(),
            self.failures.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_summarizes_counts() {
        assert_eq!(
            PipelineReport::empty_selection().to_string(),
            "Shell pipeline: nothing selected"
        );
        let report = PipelineReport {
            skipped: vec!["Lamp".into()],
            ..PipelineReport::default()
        };
        assert_eq!(report.to_string(), "Shell pipeline: 0 replaced, 1 skipped, 0 failed");
        assert!(report.is_success());
    }
}
