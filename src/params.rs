//! Tolerances and switches for the shell pipeline.

use crate::error::ParamsError;

/// Name of the collection results are linked into by default.
pub const DEFAULT_OUTPUT_COLLECTION: &str = "Gebäude";

/// What the combiner does with a face whose material slot is unassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptySlotPolicy {
    /// Map the face to the shared "no material" palette entry.
    #[default]
    NoMaterial,
    /// Fail the group with a malformed-source error.
    Reject,
}

/// Parameters for combining, simplifying and filtering a group.
#[derive(Debug, Clone)]
pub struct ShellParams {
    /// Maximum dihedral angle (radians) for coplanar dissolution. Default: 1°
    pub angle_tolerance: f64,

    /// Distance within which a horizontal face counts as lying on the
    /// global minimum or maximum z. Default: 1e-5
    pub z_tolerance: f64,

    /// Allowed deviation of `|normal.z|` from 1 for a face to count as
    /// horizontal. Default: 1e-5
    pub normal_tolerance: f64,

    /// Grid size for treating vertices as coincident during dissolution.
    /// Default: 1e-6
    pub weld_tolerance: f64,

    /// Upper bound on dissolution passes before giving up. Default: 64
    pub max_iterations: usize,

    /// Handling of unassigned material slots. Default: `NoMaterial`
    pub empty_slot_policy: EmptySlotPolicy,

    /// Collection that receives the result objects. Default: `"Gebäude"`
    pub output_collection: String,

    /// Re-run dissolution after filtering so walls split only by removed
    /// interior floors merge back together. Default: true
    pub reseal_seams: bool,

    /// Process groups in parallel. Default: true
    pub parallel: bool,
}

impl Default for ShellParams {
    fn default() -> Self {
        Self {
            angle_tolerance: 1.0_f64.to_radians(),
            z_tolerance: 1e-5,
            normal_tolerance: 1e-5,
            weld_tolerance: 1e-6,
            max_iterations: 64,
            empty_slot_policy: EmptySlotPolicy::NoMaterial,
            output_collection: DEFAULT_OUTPUT_COLLECTION.to_owned(),
            reseal_seams: true,
            parallel: true,
        }
    }
}

impl ShellParams {
    /// Strict params: unassigned slots are rejected and only exactly
    /// coplanar faces are dissolved.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            angle_tolerance: 1e-6,
            empty_slot_policy: EmptySlotPolicy::Reject,
            ..Default::default()
        }
    }

    /// Set the coplanar angle tolerance in degrees.
    #[must_use]
    pub fn with_angle_tolerance_degrees(mut self, degrees: f64) -> Self {
        self.angle_tolerance = degrees.to_radians();
        self
    }

    /// Set the extremal z tolerance.
    #[must_use]
    pub const fn with_z_tolerance(mut self, tolerance: f64) -> Self {
        self.z_tolerance = tolerance;
        self
    }

    /// Set the horizontal-normal tolerance.
    #[must_use]
    pub const fn with_normal_tolerance(mut self, tolerance: f64) -> Self {
        self.normal_tolerance = tolerance;
        self
    }

    /// Set the dissolution pass limit.
    #[must_use]
    pub const fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Set the empty slot policy.
    #[must_use]
    pub const fn with_empty_slot_policy(mut self, policy: EmptySlotPolicy) -> Self {
        self.empty_slot_policy = policy;
        self
    }

    /// Set the output collection name.
    #[must_use]
    pub fn with_output_collection(mut self, name: impl Into<String>) -> Self {
        self.output_collection = name.into();
        self
    }

    /// Enable or disable seam resealing.
    #[must_use]
    pub const fn with_reseal_seams(mut self, reseal: bool) -> Self {
        self.reseal_seams = reseal;
        self
    }

    /// Enable or disable parallel group processing.
    #[must_use]
    pub const fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Checks that every tolerance is finite and non-negative.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field.
    pub fn validate(&self) -> Result<(), ParamsError> {
        let tolerances = [
            ("angle_tolerance", self.angle_tolerance),
            ("z_tolerance", self.z_tolerance),
            ("normal_tolerance", self.normal_tolerance),
            ("weld_tolerance", self.weld_tolerance),
        ];
        for (name, value) in tolerances {
            if !value.is_finite() || value < 0.0 {
                return Err(ParamsError::InvalidTolerance { name, value });
            }
        }
        if self.max_iterations == 0 {
            return Err(ParamsError::ZeroIterations);
        }
        if self.output_collection.is_empty() {
            return Err(ParamsError::EmptyCollectionName);
        }
        Ok(())
    }
}
