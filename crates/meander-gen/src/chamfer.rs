//! Coordinate-based edge picking and chamfering of a committed segment.

use tracing::debug;

use meander_kernel::{ChamferSpec, EdgeSelection, GeometryKernel, KernelError, NO_ENTITY};
use meander_types::{Expression, PickResult, ShapeName};

use crate::error::ChamferError;

/// Sample coordinates derived from a segment's representative point.
///
/// The halved coordinates assume an axis-aligned box whose lower z (and, for
/// the face sample, lower y) is at or below zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickSamples {
    point: [f64; 3],
}

impl PickSamples {
    pub fn new(point: [f64; 3]) -> Self {
        Self { point }
    }

    /// Midway up the vertical edge through the point.
    pub fn edge(&self) -> [f64; 3] {
        let [x, y, z] = self.point;
        [x, y, z / 2.0]
    }

    pub fn vertex(&self) -> [f64; 3] {
        self.point
    }

    /// On the face at `x`, below the point.
    pub fn face(&self) -> [f64; 3] {
        let [x, y, z] = self.point;
        [x, y / 2.0, z / 2.0]
    }
}

/// Resolve a pick, treating a kernel error as "nothing found".
fn pick_or_miss(
    shape: &ShapeName,
    what: &str,
    result: Result<i64, KernelError>,
) -> i64 {
    result.unwrap_or_else(|e| {
        debug!(%shape, what, error = %e, "pick failed");
        NO_ENTITY
    })
}

/// Pick the edge, vertex and face near `pick_point` on a committed shape,
/// then chamfer that edge and commit the result.
pub fn apply_chamfer_to_picked_edge(
    kernel: &mut dyn GeometryKernel,
    shape: &ShapeName,
    pick_point: [f64; 3],
    value: &Expression,
    angle_deg: f64,
) -> Result<PickResult, ChamferError> {
    let samples = PickSamples::new(pick_point);
    debug!(
        %shape,
        edge = ?samples.edge(),
        vertex = ?samples.vertex(),
        face = ?samples.face(),
        "pick samples"
    );

    let edge_id = pick_or_miss(shape, "edge", kernel.pick_edge(shape, samples.edge()));
    let vertex_id = pick_or_miss(shape, "vertex", kernel.pick_vertex(shape, samples.vertex()));
    let face_id = pick_or_miss(shape, "face", kernel.pick_face(shape, samples.face()));
    let pick = PickResult {
        edge_id,
        vertex_id,
        face_id,
    };

    if !pick.is_valid() {
        return Err(ChamferError::PickResolutionFailed {
            shape: shape.clone(),
            pick,
        });
    }

    let rejected = |source| ChamferError::Kernel {
        shape: shape.clone(),
        source,
    };
    kernel
        .select_edge(&EdgeSelection {
            shape: shape.clone(),
            edge_id,
            vertex_id,
        })
        .map_err(rejected)?;
    kernel
        .chamfer(&ChamferSpec {
            shape: shape.clone(),
            face_id,
            value: value.clone(),
            angle_deg,
            symmetric: false,
        })
        .map_err(rejected)?;
    kernel.commit().map_err(|source| ChamferError::Commit {
        shape: shape.clone(),
        source,
    })?;

    Ok(pick)
}
