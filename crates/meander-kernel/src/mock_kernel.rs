//! MockKernel: deterministic recording test double implementing GeometryKernel.
//!
//! Keeps real prism geometry so coordinate picking behaves like a kernel,
//! separates staged from committed state, and records every call so tests
//! can assert ordering contracts (create → commit → pick → select → chamfer).

use std::collections::{BTreeMap, BTreeSet};

use crate::geometry::{self, Prism, PICK_TOLERANCE};
use crate::traits::GeometryKernel;
use crate::types::*;

/// A mock vertex with known position.
#[derive(Debug, Clone)]
struct MockVertex {
    id: i64,
    position: [f64; 3],
}

/// A mock edge with known endpoints.
#[derive(Debug, Clone)]
struct MockEdge {
    id: i64,
    start: i64,
    end: i64,
}

/// A mock planar face with its boundary loop.
#[derive(Debug, Clone)]
struct MockFace {
    id: i64,
    loop_positions: Vec<[f64; 3]>,
}

/// A solid held by the mock kernel.
#[derive(Debug, Clone)]
pub struct MockShape {
    pub material: String,
    pub prism: Prism,
    /// Chamfers applied to this shape, oldest first.
    pub chamfers: Vec<ChamferSpec>,
    vertices: Vec<MockVertex>,
    edges: Vec<MockEdge>,
    faces: Vec<MockFace>,
}

impl MockShape {
    /// `(vertices, edges, faces)`.
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.vertices.len(), self.edges.len(), self.faces.len())
    }

    pub fn bounding_box(&self) -> ([f64; 3], [f64; 3]) {
        self.prism.bounding_box()
    }

    pub fn vertex_ids(&self) -> Vec<i64> {
        self.vertices.iter().map(|v| v.id).collect()
    }

    pub fn edge_ids(&self) -> Vec<i64> {
        self.edges.iter().map(|e| e.id).collect()
    }

    pub fn face_ids(&self) -> Vec<i64> {
        self.faces.iter().map(|f| f.id).collect()
    }

    fn position(&self, vertex: i64) -> Option<[f64; 3]> {
        self.vertices
            .iter()
            .find(|v| v.id == vertex)
            .map(|v| v.position)
    }

    fn edge(&self, id: i64) -> Option<&MockEdge> {
        self.edges.iter().find(|e| e.id == id)
    }

    fn edge_segment(&self, edge: &MockEdge) -> Option<([f64; 3], [f64; 3])> {
        Some((self.position(edge.start)?, self.position(edge.end)?))
    }
}

/// One recorded kernel call.
#[derive(Debug, Clone, PartialEq)]
pub enum KernelCall {
    DefineParameters { count: usize },
    CreateBox(BoxSpec),
    Commit,
    PickEdge { shape: ShapeName, point: [f64; 3] },
    PickVertex { shape: ShapeName, point: [f64; 3] },
    PickFace { shape: ShapeName, point: [f64; 3] },
    SelectEdge(EdgeSelection),
    Chamfer(ChamferSpec),
}

impl KernelCall {
    pub fn is_pick(&self) -> bool {
        matches!(
            self,
            KernelCall::PickEdge { .. } | KernelCall::PickVertex { .. } | KernelCall::PickFace { .. }
        )
    }

    /// Shape the call targets, if any.
    pub fn shape(&self) -> Option<&ShapeName> {
        match self {
            KernelCall::DefineParameters { .. } | KernelCall::Commit => None,
            KernelCall::CreateBox(spec) => Some(&spec.shape),
            KernelCall::PickEdge { shape, .. }
            | KernelCall::PickVertex { shape, .. }
            | KernelCall::PickFace { shape, .. } => Some(shape),
            KernelCall::SelectEdge(sel) => Some(&sel.shape),
            KernelCall::Chamfer(spec) => Some(&spec.shape),
        }
    }
}

/// Deterministic recording double for the geometry kernel.
pub struct MockKernel {
    next_id: i64,
    params: ParameterSet,
    committed: BTreeMap<ShapeName, MockShape>,
    pending: BTreeMap<ShapeName, MockShape>,
    selection: Option<EdgeSelection>,
    calls: Vec<KernelCall>,
    /// Shapes whose picks always miss.
    failing_picks: BTreeSet<ShapeName>,
}

impl MockKernel {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            params: ParameterSet::new(),
            committed: BTreeMap::new(),
            pending: BTreeMap::new(),
            selection: None,
            calls: Vec::new(),
            failing_picks: BTreeSet::new(),
        }
    }

    fn alloc_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> &[KernelCall] {
        &self.calls
    }

    /// Committed shape by qualified name.
    pub fn shape(&self, name: &ShapeName) -> Option<&MockShape> {
        self.committed.get(name)
    }

    pub fn is_committed(&self, name: &ShapeName) -> bool {
        self.committed.contains_key(name)
    }

    /// Number of staged creations or modifications awaiting commit.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Make every pick against `shape` miss, as a kernel does when the
    /// sampled coordinate falls outside the solid.
    pub fn fail_picks_for(&mut self, shape: ShapeName) {
        self.failing_picks.insert(shape);
    }

    /// Build a shape with freshly allocated entity ids.
    fn build_shape(&mut self, material: String, prism: Prism, chamfers: Vec<ChamferSpec>) -> MockShape {
        let topo = prism.topology();

        let vertices: Vec<MockVertex> = topo
            .vertices
            .iter()
            .map(|&position| MockVertex {
                id: self.alloc_id(),
                position,
            })
            .collect();

        let edges: Vec<MockEdge> = topo
            .edges
            .iter()
            .map(|&(s, e)| MockEdge {
                id: self.alloc_id(),
                start: vertices[s].id,
                end: vertices[e].id,
            })
            .collect();

        let faces: Vec<MockFace> = topo
            .faces
            .iter()
            .map(|loop_indices| MockFace {
                id: self.alloc_id(),
                loop_positions: loop_indices.iter().map(|&i| topo.vertices[i]).collect(),
            })
            .collect();

        MockShape {
            material,
            prism,
            chamfers,
            vertices,
            edges,
            faces,
        }
    }

    fn visible(&self, shape: &ShapeName) -> Result<&MockShape, KernelError> {
        self.committed
            .get(shape)
            .ok_or_else(|| KernelError::ShapeNotFound {
                shape: shape.clone(),
            })
    }

    /// Shared prologue for the three pickers.
    fn pickable(&self, shape: &ShapeName) -> Result<Option<&MockShape>, KernelError> {
        let s = self.visible(shape)?;
        if self.failing_picks.contains(shape) {
            return Ok(None);
        }
        Ok(Some(s))
    }
}

impl Default for MockKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometryKernel for MockKernel {
    fn define_parameters(&mut self, params: &ParameterSet) -> Result<(), KernelError> {
        self.calls.push(KernelCall::DefineParameters {
            count: params.len(),
        });
        self.params = params.clone();
        Ok(())
    }

    fn create_box(&mut self, spec: &BoxSpec) -> Result<ShapeName, KernelError> {
        self.calls.push(KernelCall::CreateBox(spec.clone()));

        if self.committed.contains_key(&spec.shape) || self.pending.contains_key(&spec.shape) {
            return Err(KernelError::DuplicateShape {
                shape: spec.shape.clone(),
            });
        }

        let (min, max) = resolve_box(spec, &self.params)?;
        let shape = self.build_shape(spec.material.clone(), Prism::from_box(min, max), Vec::new());
        self.pending.insert(spec.shape.clone(), shape);
        Ok(spec.shape.clone())
    }

    fn commit(&mut self) -> Result<(), KernelError> {
        self.calls.push(KernelCall::Commit);
        let staged = std::mem::take(&mut self.pending);
        self.committed.extend(staged);
        Ok(())
    }

    fn pick_edge(&mut self, shape: &ShapeName, point: [f64; 3]) -> Result<i64, KernelError> {
        self.calls.push(KernelCall::PickEdge {
            shape: shape.clone(),
            point,
        });
        let Some(s) = self.pickable(shape)? else {
            return Ok(NO_ENTITY);
        };
        Ok(s.edges
            .iter()
            .find(|e| {
                s.edge_segment(e)
                    .is_some_and(|(a, b)| geometry::point_on_segment(point, a, b, PICK_TOLERANCE))
            })
            .map(|e| e.id)
            .unwrap_or(NO_ENTITY))
    }

    fn pick_vertex(&mut self, shape: &ShapeName, point: [f64; 3]) -> Result<i64, KernelError> {
        self.calls.push(KernelCall::PickVertex {
            shape: shape.clone(),
            point,
        });
        let Some(s) = self.pickable(shape)? else {
            return Ok(NO_ENTITY);
        };
        Ok(s.vertices
            .iter()
            .find(|v| geometry::point_on_segment(point, v.position, v.position, PICK_TOLERANCE))
            .map(|v| v.id)
            .unwrap_or(NO_ENTITY))
    }

    fn pick_face(&mut self, shape: &ShapeName, point: [f64; 3]) -> Result<i64, KernelError> {
        self.calls.push(KernelCall::PickFace {
            shape: shape.clone(),
            point,
        });
        let Some(s) = self.pickable(shape)? else {
            return Ok(NO_ENTITY);
        };
        Ok(s.faces
            .iter()
            .find(|f| geometry::point_on_convex_polygon(point, &f.loop_positions, PICK_TOLERANCE))
            .map(|f| f.id)
            .unwrap_or(NO_ENTITY))
    }

    fn select_edge(&mut self, selection: &EdgeSelection) -> Result<(), KernelError> {
        self.calls.push(KernelCall::SelectEdge(selection.clone()));

        let s = self.visible(&selection.shape)?;
        let edge = s.edge(selection.edge_id).ok_or_else(|| KernelError::EntityNotFound {
            shape: selection.shape.clone(),
            id: selection.edge_id,
        })?;
        if edge.start != selection.vertex_id && edge.end != selection.vertex_id {
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
        self.calls.push(KernelCall::Chamfer(spec.clone()));

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
            .edge(selection.edge_id)
            .and_then(|e| source.edge_segment(e))
            .ok_or_else(|| not_found(selection.edge_id))?;
        let face = source
            .faces
            .iter()
            .find(|f| f.id == spec.face_id)
            .ok_or_else(|| not_found(spec.face_id))?;

        let value = resolve(&spec.value, &self.params)?;
        let (distance, other) = spec.distances(value)?;
        let prism = geometry::chamfer_prism(&source.prism, edge, &face.loop_positions, distance, other)?;

        let material = source.material.clone();
        let mut chamfers = source.chamfers.clone();
        chamfers.push(spec.clone());

        let rebuilt = self.build_shape(material, prism, chamfers);
        self.pending.insert(spec.shape.clone(), rebuilt);
        Ok(())
    }
}
