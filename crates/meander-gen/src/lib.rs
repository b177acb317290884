//! Meander trace generation for a rectangular antenna patch.
//!
//! Plans a sequence of box segments from symbolic bounding-box formulas,
//! emits them through a [`GeometryKernel`], and chamfers the outer corner of
//! each segment that fits inside the patch.

pub mod chamfer;
pub mod config;
pub mod error;
pub mod generator;
pub mod layout;
pub mod report;

pub use chamfer::{apply_chamfer_to_picked_edge, PickSamples};
pub use config::{load_config, GeneratorConfig, DEFAULT_NAME_PREFIX};
pub use error::{ChamferError, ConfigError, GenerateError};
pub use generator::{generate_segments, plan_segments, MeanderGenerator, PlannedSegment};
pub use report::{ChamferOutcome, GenerationReport, SegmentReport};

pub use meander_kernel::GeometryKernel;
pub use meander_types::{
    Bound, Expression, ParameterSet, PickResult, ResolvedBounds, Segment, SegmentBounds,
    SegmentVariant, ShapeName,
};
