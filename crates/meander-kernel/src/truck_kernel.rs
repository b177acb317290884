//! TruckKernel: real geometry kernel wrapping truck's API.

use std::collections::{BTreeMap, HashSet};

use tracing::{debug, instrument};
use truck_modeling::topology::{Edge, Face, Solid, Vertex};
use truck_modeling::Point3;

use crate::geometry::{self, Prism, PICK_TOLERANCE};
use crate::primitives;
use crate::traits::GeometryKernel;
use crate::types::*;

// Entity ids are `slot * 10000 + offset + index`: faces from offset 0,
// edges from 1000, vertices from 2000.
const ID_STRIDE: i64 = 10000;
const EDGE_OFFSET: i64 = 1000;
const VERTEX_OFFSET: i64 = 2000;

struct TruckShape {
    /// 1-based creation order; prefixes every entity id of the shape.
    slot: i64,
    material: String,
    prism: Prism,
    solid: Solid,
}

impl TruckShape {
    fn faces(&self) -> Vec<Face> {
        let mut faces = Vec::new();
        for shell in self.solid.boundaries().iter() {
            for face in shell.face_iter() {
                faces.push(face.clone());
            }
        }
        faces
    }

    fn edges(&self) -> Vec<Edge> {
        let mut seen = HashSet::new();
        let mut edges = Vec::new();
        for shell in self.solid.boundaries().iter() {
            for edge in shell.edge_iter() {
                if seen.insert(edge.id()) {
                    edges.push(edge.clone());
                }
            }
        }
        edges
    }

    fn vertices(&self) -> Vec<Vertex> {
        let mut seen = HashSet::new();
        let mut vertices = Vec::new();
        for shell in self.solid.boundaries().iter() {
            for v in shell.vertex_iter() {
                if seen.insert(v.id()) {
                    vertices.push(v.clone());
                }
            }
        }
        vertices
    }

    fn face_id(&self, index: usize) -> i64 {
        self.slot * ID_STRIDE + index as i64
    }

    fn edge_id(&self, index: usize) -> i64 {
        self.slot * ID_STRIDE + EDGE_OFFSET + index as i64
    }

    fn vertex_id(&self, index: usize) -> i64 {
        self.slot * ID_STRIDE + VERTEX_OFFSET + index as i64
    }

    /// Index of an entity id within this shape's range `[offset, offset + 1000)`.
    fn local_index(&self, id: i64, offset: i64) -> Option<usize> {
        let local = id - self.slot * ID_STRIDE - offset;
        (0..EDGE_OFFSET).contains(&local).then_some(local as usize)
    }

    fn edge_segment(&self, id: i64) -> Option<([f64; 3], [f64; 3])> {
        let edge = self.edges().into_iter().nth(self.local_index(id, EDGE_OFFSET)?)?;
        Some((coords(edge.front().point()), coords(edge.back().point())))
    }

    fn face_loop(&self, id: i64) -> Option<Vec<[f64; 3]>> {
        let face = self.faces().into_iter().nth(self.local_index(id, 0)?)?;
        Some(face_loop(&face))
    }
}

fn coords(p: Point3) -> [f64; 3] {
    [p.x, p.y, p.z]
}

fn face_loop(face: &Face) -> Vec<[f64; 3]> {
    let mut pts = Vec::new();
    for wire in face.boundaries() {
        for v in wire.vertex_iter() {
            pts.push(coords(v.point()));
        }
    }
    pts
}

/// Real geometry kernel backed by the truck BREP library.
pub struct TruckKernel {
    next_slot: i64,
    params: ParameterSet,
    committed: BTreeMap<ShapeName, TruckShape>,
    pending: BTreeMap<ShapeName, TruckShape>,
    selection: Option<EdgeSelection>,
}

impl TruckKernel {
    pub fn new() -> Self {
        Self {
            next_slot: 1,
            params: ParameterSet::new(),
            committed: BTreeMap::new(),
            pending: BTreeMap::new(),
            selection: None,
        }
    }

    fn alloc_slot(&mut self) -> i64 {
        let slot = self.next_slot;
        self.next_slot += 1;
        slot
    }

    /// Committed truck solid by qualified name.
    pub fn solid(&self, shape: &ShapeName) -> Option<&Solid> {
        self.committed.get(shape).map(|s| &s.solid)
    }

    /// Material of a committed shape.
    pub fn material(&self, shape: &ShapeName) -> Option<&str> {
        self.committed.get(shape).map(|s| s.material.as_str())
    }

    /// Committed prism description, e.g. to inspect chamfer cuts.
    pub fn prism(&self, shape: &ShapeName) -> Option<&Prism> {
        self.committed.get(shape).map(|s| &s.prism)
    }

    fn visible(&self, shape: &ShapeName) -> Result<&TruckShape, KernelError> {
        self.committed
            .get(shape)
            .ok_or_else(|| KernelError::ShapeNotFound {
                shape: shape.clone(),
            })
    }
}

impl Default for TruckKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometryKernel for TruckKernel {
    fn define_parameters(&mut self, params: &ParameterSet) -> Result<(), KernelError> {
        self.params = params.clone();
        Ok(())
    }

    #[instrument(skip(self, spec), fields(shape = %spec.shape))]
    fn create_box(&mut self, spec: &BoxSpec) -> Result<ShapeName, KernelError> {
        if self.committed.contains_key(&spec.shape) || self.pending.contains_key(&spec.shape) {
            return Err(KernelError::DuplicateShape {
                shape: spec.shape.clone(),
            });
        }

        let (min, max) = resolve_box(spec, &self.params)?;
        debug!(?min, ?max, "creating box solid");

        let slot = self.alloc_slot();
        self.pending.insert(
            spec.shape.clone(),
            TruckShape {
                slot,
                material: spec.material.clone(),
                prism: Prism::from_box(min, max),
                solid: primitives::make_box(min, max),
            },
        );
        Ok(spec.shape.clone())
    }

    fn commit(&mut self) -> Result<(), KernelError> {
        let staged = std::mem::take(&mut self.pending);
        self.committed.extend(staged);
        Ok(())
    }

    fn pick_edge(&mut self, shape: &ShapeName, point: [f64; 3]) -> Result<i64, KernelError> {
        let s = self.visible(shape)?;
        Ok(s.edges()
            .iter()
            .position(|e| {
                let a = coords(e.front().point());
                let b = coords(e.back().point());
                geometry::point_on_segment(point, a, b, PICK_TOLERANCE)
            })
            .map(|i| s.edge_id(i))
            .unwrap_or(NO_ENTITY))
    }

    fn pick_vertex(&mut self, shape: &ShapeName, point: [f64; 3]) -> Result<i64, KernelError> {
        let s = self.visible(shape)?;
        Ok(s.vertices()
            .iter()
            .position(|v| {
                let p = coords(v.point());
                geometry::point_on_segment(point, p, p, PICK_TOLERANCE)
            })
            .map(|i| s.vertex_id(i))
            .unwrap_or(NO_ENTITY))
    }

    fn pick_face(&mut self, shape: &ShapeName, point: [f64; 3]) -> Result<i64, KernelError> {
        let s = self.visible(shape)?;
        Ok(s.faces()
            .iter()
            .position(|f| geometry::point_on_convex_polygon(point, &face_loop(f), PICK_TOLERANCE))
            .map(|i| s.face_id(i))
            .unwrap_or(NO_ENTITY))
    }

    fn select_edge(&mut self, selection: &EdgeSelection) -> Result<(), KernelError> {
        let s = self.visible(&selection.shape)?;
        let (a, b) = s
            .edge_segment(selection.edge_id)
            .ok_or_else(|| KernelError::EntityNotFound {
                shape: selection.shape.clone(),
                id: selection.edge_id,
            })?;
        let anchor = s
            .local_index(selection.vertex_id, VERTEX_OFFSET)
            .and_then(|i| s.vertices().into_iter().nth(i))
            .map(|v| coords(v.point()))
            .ok_or_else(|| KernelError::EntityNotFound {
                shape: selection.shape.clone(),
                id: selection.vertex_id,
            })?;

        let is_endpoint = |p: [f64; 3]| geometry::point_on_segment(anchor, p, p, PICK_TOLERANCE);
        if !(is_endpoint(a) || is_endpoint(b)) {
            return Err(KernelError::InvalidSelection {
                shape: selection.shape.clone(),
                reason: format!(
                    "vertex {} is not an endpoint of edge {}",
                    selection.vertex_id, selection.edge_id
                ),
            });
        }

        self.selection = Some(selection.clone());
        Ok(())
    }

    fn chamfer(&mut self, spec: &ChamferSpec) -> Result<(), KernelError> {
        let selection = self
            .selection
            .take()
            .filter(|sel| sel.shape == spec.shape)
            .ok_or_else(|| KernelError::NoSelection {
                shape: spec.shape.clone(),
            })?;

        let source = self.visible(&spec.shape)?;
        let not_found = |id| KernelError::EntityNotFound {
            shape: spec.shape.clone(),
            id,
        };
        let edge = source
            .edge_segment(selection.edge_id)
            .ok_or_else(|| not_found(selection.edge_id))?;
        let face = source
            .face_loop(spec.face_id)
            .ok_or_else(|| not_found(spec.face_id))?;

        let value = resolve(&spec.value, &self.params)?;
        let (distance, other) = spec.distances(value)?;
        let prism = geometry::chamfer_prism(&source.prism, edge, &face, distance, other)?;
        let solid = primitives::make_prism(&prism)?;
        debug!(shape = %spec.shape, distance, other, "chamfer staged");

        let rebuilt = TruckShape {
            slot: source.slot,
            material: source.material.clone(),
            prism,
            solid,
        };
        self.pending.insert(spec.shape.clone(), rebuilt);
        Ok(())
    }
}
