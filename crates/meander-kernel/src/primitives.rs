//! Solid builders on top of truck's sweep API.
//!
//! truck has no built-in box, so everything is successive sweeps.

use truck_modeling::builder;
use truck_modeling::topology::{Solid, Wire};
use truck_modeling::{Point3, Vector3};

use crate::geometry::Prism;
use crate::types::KernelError;

/// Create an axis-aligned box solid via successive translational sweeps.
pub fn make_box(min: [f64; 3], max: [f64; 3]) -> Solid {
    let v = builder::vertex(Point3::new(min[0], min[1], min[2]));
    let edge = builder::tsweep(&v, Vector3::new(max[0] - min[0], 0.0, 0.0));
    let face = builder::tsweep(&edge, Vector3::new(0.0, max[1] - min[1], 0.0));
    builder::tsweep(&face, Vector3::new(0.0, 0.0, max[2] - min[2]))
}

/// Create a prism solid: closed profile wire → planar face → translational sweep.
pub fn make_prism(prism: &Prism) -> Result<Solid, KernelError> {
    let n = prism.profile.len();
    if n < 3 {
        return Err(KernelError::Other {
            message: "prism profile has fewer than 3 points".to_string(),
        });
    }

    let pts: Vec<Point3> = (0..n)
        .map(|k| {
            let p = prism.lift(k, prism.start);
            Point3::new(p[0], p[1], p[2])
        })
        .collect();

    // Create all vertices first so edges share endpoints.
    let vertices: Vec<_> = pts.iter().map(|&p| builder::vertex(p)).collect();
    let wire: Wire = (0..n)
        .map(|i| builder::line(&vertices[i], &vertices[(i + 1) % n]))
        .collect();

    let face = builder::try_attach_plane(&[wire]).map_err(|e| KernelError::Other {
        message: format!("failed to create profile face: {}", e),
    })?;

    let u = prism.axis.unit();
    let len = prism.end - prism.start;
    Ok(builder::tsweep(
        &face,
        Vector3::new(u[0] * len, u[1] * len, u[2] * len),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(solid: &Solid) -> (usize, usize, usize) {
        let shell = &solid.boundaries()[0];
        let faces = shell.face_iter().count();
        let mut edge_ids = std::collections::HashSet::new();
        for edge in shell.edge_iter() {
            edge_ids.insert(edge.id());
        }
        let mut vert_ids = std::collections::HashSet::new();
        for v in shell.vertex_iter() {
            vert_ids.insert(v.id());
        }
        (vert_ids.len(), edge_ids.len(), faces)
    }

    #[test]
    fn test_make_box_topology() {
        let solid = make_box([1.0, -5.0, 0.0], [2.0, 4.0, 1.0]);
        assert_eq!(solid.boundaries().len(), 1, "Box should have 1 shell");
        assert_eq!(counts(&solid), (8, 12, 6));
    }

    #[test]
    fn test_make_box_dimensions() {
        let solid = make_box([1.0, -5.0, 0.0], [2.0, 4.0, 1.0]);
        let shell = &solid.boundaries()[0];

        let mut min = [f64::MAX; 3];
        let mut max = [f64::MIN; 3];
        for v in shell.vertex_iter() {
            let p = v.point();
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }

        let eps = 1e-10;
        assert!((min[0] - 1.0).abs() < eps && (max[0] - 2.0).abs() < eps);
        assert!((min[1] + 5.0).abs() < eps && (max[1] - 4.0).abs() < eps);
        assert!((min[2]).abs() < eps && (max[2] - 1.0).abs() < eps);
    }

    #[test]
    fn test_make_pentagon_prism() {
        let prism = Prism {
            axis: crate::geometry::Axis::Z,
            profile: vec![[0.0, 0.0], [2.0, 0.0], [2.0, 2.5], [1.5, 3.0], [0.0, 3.0]],
            start: 0.0,
            end: 1.0,
        };
        let solid = make_prism(&prism).unwrap();
        assert_eq!(counts(&solid), (10, 15, 7));
    }
}
