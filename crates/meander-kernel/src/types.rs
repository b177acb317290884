use serde::{Deserialize, Serialize};

use expr_resolver::ResolveError;

// Re-export shared types from meander-types
pub use meander_types::{ExprRange, Expression, ParameterSet, ShapeName};

/// Returned by the pickers when nothing lies at the sampled coordinate.
pub const NO_ENTITY: i64 = -1;

/// Axis-aligned box creation request. Ranges stay symbolic; the kernel
/// substitutes its own design variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxSpec {
    pub shape: ShapeName,
    pub material: String,
    pub x: ExprRange,
    pub y: ExprRange,
    pub z: ExprRange,
}

/// Edge selection anchored at one of its endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSelection {
    pub shape: ShapeName,
    pub edge_id: i64,
    /// Endpoint of the edge that anchors the chamfer reference.
    pub vertex_id: i64,
}

/// Chamfer applied to the currently selected edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChamferSpec {
    pub shape: ShapeName,
    /// Face adjacent to the selected edge along which `value` is measured.
    pub face_id: i64,
    /// Chamfer distance, left symbolic (e.g. `w_meander_gap`).
    pub value: Expression,
    /// Bevel angle in degrees, measured from the reference face.
    pub angle_deg: f64,
    /// Equal distances on both faces; `angle_deg` is ignored when set.
    pub symmetric: bool,
}

impl ChamferSpec {
    /// Distances along the reference face and along the other adjacent face.
    pub fn distances(&self, value: f64) -> Result<(f64, f64), KernelError> {
        if self.symmetric {
            return Ok((value, value));
        }
        if !(self.angle_deg > 0.0 && self.angle_deg < 90.0) {
            return Err(KernelError::ChamferFailed {
                reason: format!("chamfer angle {} must lie in (0, 90) degrees", self.angle_deg),
            });
        }
        Ok((value, value * self.angle_deg.to_radians().tan()))
    }
}

/// Errors from kernel operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum KernelError {
    #[error("shape already exists: {shape}")]
    DuplicateShape { shape: ShapeName },

    #[error("shape not found in committed model: {shape}")]
    ShapeNotFound { shape: ShapeName },

    #[error("entity {id} not found on {shape}")]
    EntityNotFound { shape: ShapeName, id: i64 },

    #[error("cannot resolve '{expr}': {source}")]
    Expression {
        expr: String,
        #[source]
        source: ResolveError,
    },

    #[error("invalid box {shape}: {reason}")]
    InvalidBox { shape: ShapeName, reason: String },

    #[error("invalid selection on {shape}: {reason}")]
    InvalidSelection { shape: ShapeName, reason: String },

    #[error("no edge selected on {shape}")]
    NoSelection { shape: ShapeName },

    #[error("chamfer failed: {reason}")]
    ChamferFailed { reason: String },

    #[error("operation not supported: {operation}")]
    NotSupported { operation: String },

    #[error("kernel error: {message}")]
    Other { message: String },
}

/// Resolve a kernel-side expression, wrapping resolver failures.
pub(crate) fn resolve(expr: &Expression, params: &ParameterSet) -> Result<f64, KernelError> {
    expr_resolver::evaluate(expr, params).map_err(|source| KernelError::Expression {
        expr: expr.to_string(),
        source,
    })
}

/// Resolve the six box ranges into `(min, max)` corners.
pub(crate) fn resolve_box(
    spec: &BoxSpec,
    params: &ParameterSet,
) -> Result<([f64; 3], [f64; 3]), KernelError> {
    let mut min = [0.0; 3];
    let mut max = [0.0; 3];
    for (i, range) in [&spec.x, &spec.y, &spec.z].into_iter().enumerate() {
        min[i] = resolve(&range.min, params)?;
        max[i] = resolve(&range.max, params)?;
        if min[i] >= max[i] {
            return Err(KernelError::InvalidBox {
                shape: spec.shape.clone(),
                reason: format!(
                    "empty range on axis {}: [{}, {}]",
                    ["x", "y", "z"][i],
                    min[i],
                    max[i]
                ),
            });
        }
    }
    Ok((min, max))
}
