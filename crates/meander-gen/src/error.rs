use expr_resolver::ResolveError;
use meander_kernel::KernelError;
use meander_types::{Bound, PickResult, ShapeName};

/// Fatal errors that abort a generation run.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GenerateError {
    #[error("turns must be at least 1, got {turns}")]
    InvalidTurns { turns: u32 },

    #[error("segment {index}: cannot resolve {bound} '{expr}': {source}")]
    Expression {
        index: u32,
        bound: Bound,
        expr: String,
        #[source]
        source: ResolveError,
    },

    /// `bound` is the upper bound of the empty axis (`Xmax`, `Ymax` or `Zmax`).
    #[error("segment {index} is degenerate: {bound} {max} is not above {min}")]
    DegenerateSegment {
        index: u32,
        bound: Bound,
        min: f64,
        max: f64,
    },

    #[error("kernel error: {0}")]
    Kernel(#[from] KernelError),
}

/// Errors from the pick-then-chamfer step of a single segment.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ChamferError {
    #[error("could not resolve edge/vertex/face on {shape}: {pick:?}")]
    PickResolutionFailed { shape: ShapeName, pick: PickResult },

    #[error("chamfer on {shape} rejected: {source}")]
    Kernel {
        shape: ShapeName,
        #[source]
        source: KernelError,
    },

    /// The chamfer was accepted but could not be committed.
    #[error("commit after chamfer on {shape} failed: {source}")]
    Commit {
        shape: ShapeName,
        #[source]
        source: KernelError,
    },
}

/// Errors while loading a generator configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    ParseError(String),

    #[error("turns must be at least 1")]
    InvalidTurns,

    #[error("missing required parameters: {}", .0.join(", "))]
    MissingParameters(Vec<String>),

    #[error("chamfer angle {0} must lie strictly between 0 and 90 degrees")]
    InvalidChamferAngle(f64),

    #[error("chamfer value expression is empty")]
    EmptyChamferValue,

    #[error("invalid chamfer value: {0}")]
    InvalidChamferValue(String),
}
