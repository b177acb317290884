use crate::types::*;

/// Geometry kernel capability consumed by the meander generator.
/// Implemented by TruckKernel (wraps real truck) and MockKernel (recording test double).
///
/// Mutations are staged until [`commit`](GeometryKernel::commit); pickers only
/// see committed geometry, so a freshly created box must be committed before
/// any pick against it.
pub trait GeometryKernel {
    /// Publish design variables used to substitute symbolic ranges and values.
    fn define_parameters(&mut self, params: &ParameterSet) -> Result<(), KernelError>;

    /// Create an axis-aligned box solid. Names are unique per model.
    fn create_box(&mut self, spec: &BoxSpec) -> Result<ShapeName, KernelError>;

    /// Flush pending creations and modifications into the committed model.
    fn commit(&mut self) -> Result<(), KernelError>;

    /// Id of the committed edge passing through `point`, or a non-positive id.
    fn pick_edge(&mut self, shape: &ShapeName, point: [f64; 3]) -> Result<i64, KernelError>;

    /// Id of the committed vertex at `point`, or a non-positive id.
    fn pick_vertex(&mut self, shape: &ShapeName, point: [f64; 3]) -> Result<i64, KernelError>;

    /// Id of the committed face containing `point`, or a non-positive id.
    fn pick_face(&mut self, shape: &ShapeName, point: [f64; 3]) -> Result<i64, KernelError>;

    /// Make `selection` the current edge selection.
    fn select_edge(&mut self, selection: &EdgeSelection) -> Result<(), KernelError>;

    /// Chamfer the currently selected edge. Staged until the next commit.
    fn chamfer(&mut self, spec: &ChamferSpec) -> Result<(), KernelError>;
}
