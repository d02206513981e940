use thiserror::Error;

use crate::scene::ObjectId;

/// Top-level error type for the cellshell pipeline.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error(transparent)]
    Combine(#[from] CombineError),

    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Params(#[from] ParamsError),
}

/// Errors raised while merging source meshes.
#[derive(Debug, Error)]
pub enum CombineError {
    /// A source object violates its own index contract.
    #[error("malformed source {object:?}, face {face}: {reason}")]
    MalformedSource {
        object: ObjectId,
        face: usize,
        reason: MalformedReason,
    },
}

/// The specific contract a malformed source face breaks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedReason {
    #[error("vertex index {index} exceeds vertex count {count}")]
    VertexIndex { index: usize, count: usize },

    #[error("material slot {slot} exceeds slot count {count}")]
    MaterialSlot { slot: usize, count: usize },

    #[error("material slot {slot} is unassigned")]
    UnassignedSlot { slot: usize },

    #[error("loop has {0} vertices, at least 3 are required")]
    ShortLoop(usize),
}

/// Errors related to mesh integrity.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("face {face} references vertex {index} but the mesh has {count} vertices")]
    VertexOutOfRange {
        face: usize,
        index: usize,
        count: usize,
    },

    #[error("face {face} references material {index} but the palette has {count} entries")]
    MaterialOutOfRange {
        face: usize,
        index: usize,
        count: usize,
    },

    #[error("face {face} has {len} vertices, at least 3 are required")]
    ShortLoop { face: usize, len: usize },
}

/// Errors raised by the scene collaborator.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),
}

/// Errors raised by invalid pipeline parameters.
#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("{name} = {value} must be finite and non-negative")]
    InvalidTolerance { name: &'static str, value: f64 },

    #[error("max_iterations must be at least 1")]
    ZeroIterations,

    #[error("output collection name must not be empty")]
    EmptyCollectionName,
}

/// Convenience type alias for results using [`ShellError`].
pub type Result<T> = std::result::Result<T, ShellError>;
