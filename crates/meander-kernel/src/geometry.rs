//! Kernel-independent solid description and point queries.
//!
//! Every solid the meander needs is a right prism: a convex polygon profile
//! swept along one coordinate axis. A box is a rectangular profile; a box
//! with one chamfered edge parallel to the sweep axis is a pentagon.

use crate::types::KernelError;

/// Absolute tolerance for coordinate picking and vertex matching.
pub const PICK_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Coordinate indices `(u, v)` of the profile plane, ordered so that
    /// `u × v` points along `+self`.
    pub fn profile_indices(self) -> (usize, usize) {
        match self {
            Axis::X => (1, 2),
            Axis::Y => (2, 0),
            Axis::Z => (0, 1),
        }
    }

    pub fn unit(self) -> [f64; 3] {
        let mut d = [0.0; 3];
        d[self.index()] = 1.0;
        d
    }

    fn from_index(i: usize) -> Option<Self> {
        match i {
            0 => Some(Axis::X),
            1 => Some(Axis::Y),
            2 => Some(Axis::Z),
            _ => None,
        }
    }
}

/// Vertex, edge and face lists of a prism, referencing vertices by index.
#[derive(Debug, Clone)]
pub struct PrismTopology {
    pub vertices: Vec<[f64; 3]>,
    /// `(start, end)` vertex indices.
    pub edges: Vec<(usize, usize)>,
    /// Vertex loops, outward-facing counter-clockwise.
    pub faces: Vec<Vec<usize>>,
}

/// A convex polygon (counter-clockwise about `+axis`) swept from `start` to `end`.
#[derive(Debug, Clone, PartialEq)]
pub struct Prism {
    pub axis: Axis,
    pub profile: Vec<[f64; 2]>,
    pub start: f64,
    pub end: f64,
}

impl Prism {
    /// Axis-aligned box between two corners, swept along Z.
    pub fn from_box(min: [f64; 3], max: [f64; 3]) -> Self {
        Self {
            axis: Axis::Z,
            profile: vec![
                [min[0], min[1]],
                [max[0], min[1]],
                [max[0], max[1]],
                [min[0], max[1]],
            ],
            start: min[2],
            end: max[2],
        }
    }

    /// Lift profile point `k` to 3D at sweep coordinate `w`.
    pub fn lift(&self, k: usize, w: f64) -> [f64; 3] {
        let (ui, vi) = self.axis.profile_indices();
        let mut p = [0.0; 3];
        p[self.axis.index()] = w;
        p[ui] = self.profile[k][0];
        p[vi] = self.profile[k][1];
        p
    }

    /// Project a 3D point onto the profile plane.
    pub fn project(&self, p: [f64; 3]) -> [f64; 2] {
        let (ui, vi) = self.axis.profile_indices();
        [p[ui], p[vi]]
    }

    /// Axis-aligned bounding box as `(min, max)`.
    pub fn bounding_box(&self) -> ([f64; 3], [f64; 3]) {
        let mut min = [f64::MAX; 3];
        let mut max = [f64::MIN; 3];
        for k in 0..self.profile.len() {
            for w in [self.start, self.end] {
                let p = self.lift(k, w);
                for i in 0..3 {
                    min[i] = min[i].min(p[i]);
                    max[i] = max[i].max(p[i]);
                }
            }
        }
        (min, max)
    }

    /// True when the solid is still an untouched axis-aligned box.
    pub fn is_box(&self) -> bool {
        if self.profile.len() != 4 {
            return false;
        }
        let (min, max) = self.bounding_box();
        (0..4).all(|k| {
            let p = self.lift(k, self.start);
            (0..3).all(|i| {
                i == self.axis.index()
                    || (p[i] - min[i]).abs() < PICK_TOLERANCE
                    || (p[i] - max[i]).abs() < PICK_TOLERANCE
            })
        })
    }

    /// Re-express a box as a prism swept along `axis`.
    pub fn reoriented(&self, axis: Axis) -> Option<Prism> {
        if axis == self.axis {
            return Some(self.clone());
        }
        if !self.is_box() {
            return None;
        }
        let (min, max) = self.bounding_box();
        let (ui, vi) = axis.profile_indices();
        Some(Prism {
            axis,
            profile: vec![
                [min[ui], min[vi]],
                [max[ui], min[vi]],
                [max[ui], max[vi]],
                [min[ui], max[vi]],
            ],
            start: min[axis.index()],
            end: max[axis.index()],
        })
    }

    pub fn topology(&self) -> PrismTopology {
        let n = self.profile.len();
        let mut vertices = Vec::with_capacity(2 * n);
        for k in 0..n {
            vertices.push(self.lift(k, self.start));
        }
        for k in 0..n {
            vertices.push(self.lift(k, self.end));
        }

        let mut edges = Vec::with_capacity(3 * n);
        // Bottom ring, top ring, then laterals
        for k in 0..n {
            edges.push((k, (k + 1) % n));
        }
        for k in 0..n {
            edges.push((n + k, n + (k + 1) % n));
        }
        for k in 0..n {
            edges.push((k, n + k));
        }

        let mut faces = Vec::with_capacity(n + 2);
        for k in 0..n {
            let k1 = (k + 1) % n;
            faces.push(vec![k, k1, n + k1, n + k]);
        }
        faces.push((0..n).rev().collect());
        faces.push((n..2 * n).collect());

        PrismTopology {
            vertices,
            edges,
            faces,
        }
    }

    /// Profile index whose lifted position matches `p` in the profile plane.
    fn corner_at(&self, p: [f64; 3]) -> Option<usize> {
        let q = self.project(p);
        self.profile
            .iter()
            .position(|c| (c[0] - q[0]).abs() < PICK_TOLERANCE && (c[1] - q[1]).abs() < PICK_TOLERANCE)
    }
}

/// Which side of a profile corner a chamfer distance is measured along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    /// Towards profile point `k - 1`.
    Previous,
    /// Towards profile point `k + 1`.
    Next,
}

/// Cut the edge `(a, b)` of `prism` with a planar bevel.
///
/// `reference_face` is the vertex loop of one of the two faces adjacent to
/// the edge; `distance` is measured along it, `other_distance` along the
/// second adjacent face. Only edges parallel to the sweep axis are cut, so a
/// box is first reoriented along the edge direction.
pub fn chamfer_prism(
    prism: &Prism,
    edge: ([f64; 3], [f64; 3]),
    reference_face: &[[f64; 3]],
    distance: f64,
    other_distance: f64,
) -> Result<Prism, KernelError> {
    if distance <= 0.0 || other_distance <= 0.0 {
        return Err(KernelError::ChamferFailed {
            reason: "chamfer distance must be positive".to_string(),
        });
    }

    let (a, b) = edge;
    let dir = sub(b, a);
    let axis = (0..3)
        .filter(|&i| dir[i].abs() > PICK_TOLERANCE)
        .collect::<Vec<_>>();
    let axis = match axis.as_slice() {
        [i] => Axis::from_index(*i),
        _ => None,
    }
    .ok_or_else(|| KernelError::NotSupported {
        operation: "chamfer of a non axis-aligned edge".to_string(),
    })?;

    let prism = prism
        .reoriented(axis)
        .ok_or_else(|| KernelError::NotSupported {
            operation: format!("chamfer across the {:?} sweep of a modified solid", prism.axis),
        })?;

    let touches = |p: [f64; 3]| {
        reference_face
            .iter()
            .any(|q| norm(sub(*q, p)) < PICK_TOLERANCE)
    };
    if !(touches(a) && touches(b)) {
        return Err(KernelError::ChamferFailed {
            reason: "reference face is not adjacent to the edge".to_string(),
        });
    }

    let n = prism.profile.len();
    let k = prism.corner_at(a).ok_or_else(|| KernelError::ChamferFailed {
        reason: "edge does not lie on the solid".to_string(),
    })?;
    let prev = (k + n - 1) % n;
    let next = (k + 1) % n;

    let on_face = |idx: usize| {
        let target = prism.profile[idx];
        reference_face.iter().any(|p| {
            let q = prism.project(*p);
            (q[0] - target[0]).abs() < PICK_TOLERANCE && (q[1] - target[1]).abs() < PICK_TOLERANCE
        })
    };
    let side = if on_face(prev) {
        Side::Previous
    } else if on_face(next) {
        Side::Next
    } else {
        return Err(KernelError::ChamferFailed {
            reason: "reference face is not adjacent to the edge".to_string(),
        });
    };

    let (d_prev, d_next) = match side {
        Side::Previous => (distance, other_distance),
        Side::Next => (other_distance, distance),
    };

    let corner = prism.profile[k];
    let cut_prev = step_towards(corner, prism.profile[prev], d_prev)?;
    let cut_next = step_towards(corner, prism.profile[next], d_next)?;

    let mut profile = Vec::with_capacity(n + 1);
    for (i, p) in prism.profile.iter().enumerate() {
        if i == k {
            profile.push(cut_prev);
            profile.push(cut_next);
        } else {
            profile.push(*p);
        }
    }

    Ok(Prism { profile, ..prism })
}

/// Point at `distance` from `from` towards `to`; must stay strictly inside the side.
fn step_towards(from: [f64; 2], to: [f64; 2], distance: f64) -> Result<[f64; 2], KernelError> {
    let d = [to[0] - from[0], to[1] - from[1]];
    let len = (d[0] * d[0] + d[1] * d[1]).sqrt();
    if distance >= len - PICK_TOLERANCE {
        return Err(KernelError::ChamferFailed {
            reason: format!(
                "chamfer distance {:.6} does not fit on a side of length {:.6}",
                distance, len
            ),
        });
    }
    Ok([from[0] + d[0] / len * distance, from[1] + d[1] / len * distance])
}

pub(crate) fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn norm(a: [f64; 3]) -> f64 {
    dot(a, a).sqrt()
}

/// Whether `p` lies within `tol` of the segment `a`-`b`.
pub fn point_on_segment(p: [f64; 3], a: [f64; 3], b: [f64; 3], tol: f64) -> bool {
    let ab = sub(b, a);
    let len2 = dot(ab, ab);
    if len2 < tol * tol {
        return norm(sub(p, a)) <= tol;
    }
    let t = (dot(sub(p, a), ab) / len2).clamp(0.0, 1.0);
    let closest = [a[0] + ab[0] * t, a[1] + ab[1] * t, a[2] + ab[2] * t];
    norm(sub(p, closest)) <= tol
}

/// Whether `p` lies on the planar convex polygon `loop_pts` (boundary included).
pub fn point_on_convex_polygon(p: [f64; 3], loop_pts: &[[f64; 3]], tol: f64) -> bool {
    if loop_pts.len() < 3 {
        return false;
    }

    // Newell normal
    let mut n = [0.0; 3];
    for i in 0..loop_pts.len() {
        let c = loop_pts[i];
        let d = loop_pts[(i + 1) % loop_pts.len()];
        n[0] += (c[1] - d[1]) * (c[2] + d[2]);
        n[1] += (c[2] - d[2]) * (c[0] + d[0]);
        n[2] += (c[0] - d[0]) * (c[1] + d[1]);
    }
    let n_len = norm(n);
    if n_len < tol * tol {
        return false;
    }
    let n = [n[0] / n_len, n[1] / n_len, n[2] / n_len];

    if dot(sub(p, loop_pts[0]), n).abs() > tol {
        return false;
    }

    (0..loop_pts.len()).all(|i| {
        let a = loop_pts[i];
        let b = loop_pts[(i + 1) % loop_pts.len()];
        let ab = sub(b, a);
        dot(cross(ab, sub(p, a)), n) >= -tol * norm(ab)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Prism {
        Prism::from_box([0.0, 0.0, 0.0], [2.0, 3.0, 1.0])
    }

    #[test]
    fn test_box_topology_counts() {
        let topo = unit_box().topology();
        assert_eq!(topo.vertices.len(), 8);
        assert_eq!(topo.edges.len(), 12);
        assert_eq!(topo.faces.len(), 6);
        let euler = topo.vertices.len() as i64 - topo.edges.len() as i64 + topo.faces.len() as i64;
        assert_eq!(euler, 2, "Euler formula must hold");
    }

    #[test]
    fn test_is_box_and_reorient() {
        let b = unit_box();
        assert!(b.is_box());
        let along_x = b.reoriented(Axis::X).unwrap();
        assert_eq!(along_x.bounding_box(), b.bounding_box());
        assert_eq!((along_x.start, along_x.end), (0.0, 2.0));
    }

    #[test]
    fn test_point_on_segment() {
        let a = [0.0, 0.0, 0.0];
        let b = [0.0, 0.0, 2.0];
        assert!(point_on_segment([0.0, 0.0, 1.0], a, b, 1e-9));
        assert!(!point_on_segment([0.0, 0.0, 2.5], a, b, 1e-9));
        assert!(!point_on_segment([0.1, 0.0, 1.0], a, b, 1e-9));
    }

    #[test]
    fn test_point_on_polygon() {
        let square = [
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [1.0, 1.0, 1.0],
            [1.0, 0.0, 1.0],
        ];
        assert!(point_on_convex_polygon([1.0, 0.5, 0.5], &square, 1e-9));
        assert!(point_on_convex_polygon([1.0, 1.0, 1.0], &square, 1e-9));
        assert!(!point_on_convex_polygon([1.0, 1.5, 0.5], &square, 1e-9));
        assert!(!point_on_convex_polygon([1.1, 0.5, 0.5], &square, 1e-9));
    }

    #[test]
    fn test_chamfer_vertical_edge_makes_pentagon() {
        let b = unit_box();
        // Vertical edge at (2, 3), reference face x = 2
        let edge = ([2.0, 3.0, 0.0], [2.0, 3.0, 1.0]);
        let face = [
            [2.0, 0.0, 0.0],
            [2.0, 3.0, 0.0],
            [2.0, 3.0, 1.0],
            [2.0, 0.0, 1.0],
        ];
        let cut = chamfer_prism(&b, edge, &face, 0.5, 0.25).unwrap();
        assert_eq!(cut.profile.len(), 5);
        assert!(cut.profile.contains(&[2.0, 2.5]));
        assert!(cut.profile.contains(&[1.75, 3.0]));

        let topo = cut.topology();
        assert_eq!(
            (topo.vertices.len(), topo.edges.len(), topo.faces.len()),
            (10, 15, 7)
        );
    }

    #[test]
    fn test_chamfer_horizontal_edge_reorients_box() {
        let b = unit_box();
        // Top edge along x at y = 3, z = 1; reference face is the top (z = 1)
        let edge = ([0.0, 3.0, 1.0], [2.0, 3.0, 1.0]);
        let top = [
            [0.0, 0.0, 1.0],
            [2.0, 0.0, 1.0],
            [2.0, 3.0, 1.0],
            [0.0, 3.0, 1.0],
        ];
        let cut = chamfer_prism(&b, edge, &top, 0.5, 0.5).unwrap();
        assert_eq!(cut.axis, Axis::X);
        assert_eq!(cut.profile.len(), 5);
        // (y, z) profile gains the cut points
        assert!(cut.profile.contains(&[2.5, 1.0]));
        assert!(cut.profile.contains(&[3.0, 0.5]));
    }

    #[test]
    fn test_chamfer_too_large_fails() {
        let b = unit_box();
        let edge = ([2.0, 3.0, 0.0], [2.0, 3.0, 1.0]);
        let face = [
            [2.0, 0.0, 0.0],
            [2.0, 3.0, 0.0],
            [2.0, 3.0, 1.0],
            [2.0, 0.0, 1.0],
        ];
        let err = chamfer_prism(&b, edge, &face, 0.5, 2.5).unwrap_err();
        assert!(matches!(err, KernelError::ChamferFailed { .. }));
    }

    #[test]
    fn test_chamfer_with_unrelated_face_fails() {
        let b = unit_box();
        let edge = ([2.0, 3.0, 0.0], [2.0, 3.0, 1.0]);
        let left = [
            [0.0, 0.0, 0.0],
            [0.0, 0.0, 1.0],
            [0.0, 3.0, 1.0],
            [0.0, 3.0, 0.0],
        ];
        assert!(chamfer_prism(&b, edge, &left, 0.5, 0.5).is_err());
    }
}
