use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use meander_kernel::{BoxSpec, GeometryKernel};
use meander_types::{
    Bound, Expression, ParameterSet, ResolvedBounds, Segment, SegmentVariant, ShapeName,
};

use crate::chamfer::apply_chamfer_to_picked_edge;
use crate::config::{GeneratorConfig, DEFAULT_NAME_PREFIX};
use crate::error::{ChamferError, GenerateError};
use crate::layout;
use crate::report::{ChamferOutcome, GenerationReport, SegmentReport};

/// A segment with its bounds already evaluated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedSegment {
    pub segment: Segment,
    pub resolved: ResolvedBounds,
}

fn resolve(
    index: u32,
    bound: Bound,
    expr: &Expression,
    params: &ParameterSet,
) -> Result<f64, GenerateError> {
    expr_resolver::evaluate(expr, params).map_err(|source| GenerateError::Expression {
        index,
        bound,
        expr: expr.to_string(),
        source,
    })
}

fn non_empty(index: u32, bound: Bound, min: f64, max: f64) -> Result<(), GenerateError> {
    if min < max {
        Ok(())
    } else {
        Err(GenerateError::DegenerateSegment {
            index,
            bound,
            min,
            max,
        })
    }
}

/// Plan one segment: evaluate its bounds and decide whether it must be capped.
fn plan_segment(
    index: u32,
    name: String,
    params: &ParameterSet,
) -> Result<PlannedSegment, GenerateError> {
    let mut bounds = layout::segment_bounds(index);
    let at = |bound, expr: &Expression| resolve(index, bound, expr, params);

    let xmin = at(Bound::Xmin, &bounds.xmin)?;
    let xmax = at(Bound::Xmax, &bounds.xmax)?;
    non_empty(index, Bound::Xmax, xmin, xmax)?;
    let ymin = at(Bound::Ymin, &bounds.ymin)?;
    let zmin = at(Bound::Zmin, &bounds.zmin)?;
    let zmax = at(Bound::Zmax, &bounds.zmax)?;
    non_empty(index, Bound::Zmax, zmin, zmax)?;

    let provisional = at(Bound::Ymax, &bounds.ymax)?;
    let upper = at(Bound::PatchUpper, &layout::patch_upper_bound())?;

    // The capped ymax is taken as-is; it is not tested against the patch again.
    let (variant, ymax) = if provisional <= upper {
        (SegmentVariant::Normal, provisional)
    } else {
        bounds.ymax = layout::capped_ymax();
        (SegmentVariant::Capped, at(Bound::Ymax, &bounds.ymax)?)
    };
    non_empty(index, Bound::Ymax, ymin, ymax)?;

    Ok(PlannedSegment {
        segment: Segment {
            index,
            name,
            bounds,
            variant,
        },
        resolved: ResolvedBounds {
            xmin,
            xmax,
            ymin,
            ymax,
            zmin,
            zmax,
        },
    })
}

fn plan_named(
    turns: u32,
    params: &ParameterSet,
    name: impl Fn(u32) -> String,
) -> Result<Vec<PlannedSegment>, GenerateError> {
    if turns == 0 {
        return Err(GenerateError::InvalidTurns { turns });
    }
    (1..=turns)
        .map(|index| plan_segment(index, name(index), params))
        .collect()
}

/// Plan `turns` segments with default naming, keeping the resolved bounds.
pub fn plan_segments(
    turns: u32,
    params: &ParameterSet,
) -> Result<Vec<PlannedSegment>, GenerateError> {
    plan_named(turns, params, |i| format!("{}{}", DEFAULT_NAME_PREFIX, i))
}

/// Plan `turns` segments without touching a kernel.
pub fn generate_segments(turns: u32, params: &ParameterSet) -> Result<Vec<Segment>, GenerateError> {
    Ok(plan_segments(turns, params)?
        .into_iter()
        .map(|p| p.segment)
        .collect())
}

/// Emits a planned meander into a geometry kernel.
pub struct MeanderGenerator {
    config: GeneratorConfig,
}

impl MeanderGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn plan(&self) -> Result<Vec<PlannedSegment>, GenerateError> {
        plan_named(self.config.turns, &self.config.parameters, |i| {
            self.config.segment_name(i)
        })
    }

    /// Create every segment in order, committing each before it is picked,
    /// and chamfer the ones that fit inside the patch.
    ///
    /// Pick and chamfer failures are recorded in the report; everything
    /// else aborts the run.
    #[instrument(skip_all, fields(turns = self.config.turns, component = %self.config.component))]
    pub fn run(&self, kernel: &mut dyn GeometryKernel) -> Result<GenerationReport, GenerateError> {
        let planned = self.plan()?;
        info!(segments = planned.len(), "generating meander");

        kernel.define_parameters(&self.config.parameters)?;

        let mut report = GenerationReport::default();
        for PlannedSegment { segment, resolved } in planned {
            debug!(index = segment.index, ?resolved, variant = ?segment.variant, "segment planned");

            let shape = kernel.create_box(&BoxSpec {
                shape: ShapeName::new(&self.config.component, &segment.name),
                material: self.config.material.clone(),
                x: segment.bounds.x_range(),
                y: segment.bounds.y_range(),
                z: segment.bounds.z_range(),
            })?;
            kernel.commit()?;

            let outcome = match segment.variant {
                SegmentVariant::Capped => ChamferOutcome::SkippedCapped,
                SegmentVariant::Normal => self.chamfer(kernel, &shape, &resolved, &mut report)?,
            };
            info!(%shape, variant = ?segment.variant, ?outcome, "segment emitted");

            report.segments.push(SegmentReport {
                segment,
                resolved,
                shape,
                outcome,
            });
        }

        info!(
            chamfered = report.chamfered_count(),
            first_capped = ?report.first_capped_index(),
            warnings = report.warnings.len(),
            "meander complete"
        );
        Ok(report)
    }

    fn chamfer(
        &self,
        kernel: &mut dyn GeometryKernel,
        shape: &ShapeName,
        resolved: &ResolvedBounds,
        report: &mut GenerationReport,
    ) -> Result<ChamferOutcome, GenerateError> {
        let result = apply_chamfer_to_picked_edge(
            kernel,
            shape,
            resolved.outer_top_corner(),
            &self.config.chamfer_value,
            self.config.chamfer_angle_deg,
        );

        match result {
            Ok(pick) => Ok(ChamferOutcome::Applied(pick)),
            Err(ChamferError::PickResolutionFailed { shape, pick }) => {
                warn!(%shape, ?pick, "could not pick chamfer edge, segment left unchamfered");
                report
                    .warnings
                    .push(format!("{}: edge pick failed, chamfer skipped", shape));
                Ok(ChamferOutcome::PickFailed(pick))
            }
            Err(err @ ChamferError::Kernel { .. }) => {
                warn!(%shape, error = %err, "chamfer rejected, segment left unchamfered");
                report.warnings.push(err.to_string());
                Ok(ChamferOutcome::Failed(err.to_string()))
            }
            Err(ChamferError::Commit { source, .. }) => Err(GenerateError::Kernel(source)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn reference_params() -> ParameterSet {
        ParameterSet::new()
            .with("x_patch1", 0.0)
            .with("l_patch", 10.0)
            .with("y_patch1", 0.0)
            .with("w_meander", 1.0)
            .with("w_meander_gap", 0.5)
            .with("w_chamfer_patch", 0.2)
            .with("ts", 0.0)
            .with("tp", 1.0)
    }

    #[test]
    fn test_reference_first_segment() {
        let plan = plan_segments(1, &reference_params()).unwrap();
        let r = plan[0].resolved;
        assert_relative_eq!(r.xmin, -2.5);
        assert_relative_eq!(r.xmax, -1.5);
        assert_relative_eq!(r.ymin, -5.0);
        assert_relative_eq!(r.ymax, 4.0);
        assert_eq!(plan[0].segment.variant, SegmentVariant::Capped);
        assert_eq!(plan[0].segment.bounds.ymax, layout::capped_ymax());
    }

    #[test]
    fn test_zero_turns_rejected() {
        let err = generate_segments(0, &reference_params()).unwrap_err();
        assert!(matches!(err, GenerateError::InvalidTurns { turns: 0 }));
    }

    #[test]
    fn test_degenerate_width() {
        let params = reference_params().with("w_meander", -1.0);
        let err = generate_segments(2, &params).unwrap_err();
        assert!(matches!(
            err,
            GenerateError::DegenerateSegment {
                index: 1,
                bound: Bound::Xmax,
                ..
            }
        ));
    }

    #[test]
    fn test_capped_ymax_below_ymin_rejected() {
        // capped ymax = 0.5 - 2 lies under ymin = -0.5
        let params = reference_params()
            .with("l_patch", 1.0)
            .with("w_meander", 2.0)
            .with("w_chamfer_patch", 0.0);
        match plan_segments(1, &params).unwrap_err() {
            GenerateError::DegenerateSegment {
                index,
                bound,
                min,
                max,
            } => {
                assert_eq!(index, 1);
                assert_eq!(bound, Bound::Ymax);
                assert_relative_eq!(min, -0.5);
                assert_relative_eq!(max, -1.5);
            }
            other => panic!("expected degenerate segment, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_thickness_rejected() {
        let err = generate_segments(1, &reference_params().with("tp", 0.0)).unwrap_err();
        assert!(matches!(
            err,
            GenerateError::DegenerateSegment {
                bound: Bound::Zmax,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_parameter_names_bound() {
        let mut params = ParameterSet::new();
        for (name, value) in reference_params().iter().filter(|(n, _)| *n != "tp") {
            params.insert(name, value);
        }
        match generate_segments(3, &params).unwrap_err() {
            GenerateError::Expression {
                index, bound, expr, ..
            } => {
                assert_eq!(index, 1);
                assert_eq!(bound, Bound::Zmax);
                assert_eq!(expr, "ts + tp");
            }
            other => panic!("expected expression error, got {:?}", other),
        }
    }
}
