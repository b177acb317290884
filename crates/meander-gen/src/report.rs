use serde::{Deserialize, Serialize};

use meander_types::{PickResult, ResolvedBounds, Segment, ShapeName};

/// What happened to a segment's chamfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail")]
pub enum ChamferOutcome {
    Applied(PickResult),
    /// Capped segments are never chamfered.
    SkippedCapped,
    /// At least one picker returned a non-positive id.
    PickFailed(PickResult),
    /// The kernel rejected the selection or the chamfer itself.
    Failed(String),
}

impl ChamferOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ChamferOutcome::Applied(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentReport {
    pub segment: Segment,
    pub resolved: ResolvedBounds,
    pub shape: ShapeName,
    pub outcome: ChamferOutcome,
}

/// Result of a generation run, in segment order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub segments: Vec<SegmentReport>,
    /// One entry per recoverable failure, naming the shape.
    pub warnings: Vec<String>,
}

impl GenerationReport {
    /// Index of the first segment that overran the patch.
    pub fn first_capped_index(&self) -> Option<u32> {
        self.segments
            .iter()
            .find(|s| s.segment.is_capped())
            .map(|s| s.segment.index)
    }

    pub fn chamfered_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| s.outcome.is_applied())
            .count()
    }

    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meander_types::{Expression, SegmentBounds, SegmentVariant};

    fn segment_report(index: u32, variant: SegmentVariant, outcome: ChamferOutcome) -> SegmentReport {
        let e = || Expression::new("0");
        SegmentReport {
            segment: Segment {
                index,
                name: format!("s{}", index),
                bounds: SegmentBounds {
                    xmin: e(),
                    xmax: e(),
                    ymin: e(),
                    ymax: e(),
                    zmin: e(),
                    zmax: e(),
                },
                variant,
            },
            resolved: ResolvedBounds {
                xmin: 0.0,
                xmax: 1.0,
                ymin: 0.0,
                ymax: 1.0,
                zmin: 0.0,
                zmax: 1.0,
            },
            shape: ShapeName::new("C", format!("s{}", index)),
            outcome,
        }
    }

    #[test]
    fn test_summary_helpers() {
        let pick = PickResult {
            edge_id: 1,
            vertex_id: 2,
            face_id: 3,
        };
        let report = GenerationReport {
            segments: vec![
                segment_report(1, SegmentVariant::Normal, ChamferOutcome::Applied(pick)),
                segment_report(2, SegmentVariant::Normal, ChamferOutcome::Failed("x".into())),
                segment_report(3, SegmentVariant::Capped, ChamferOutcome::SkippedCapped),
            ],
            warnings: vec!["x".into()],
        };
        assert_eq!(report.first_capped_index(), Some(3));
        assert_eq!(report.chamfered_count(), 1);
    }

    #[test]
    fn test_empty_report() {
        let report = GenerationReport::default();
        assert_eq!(report.first_capped_index(), None);
        assert_eq!(report.chamfered_count(), 0);
    }

    #[test]
    fn test_outcome_json_shape() {
        let json = serde_json::to_value(ChamferOutcome::SkippedCapped).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "SkippedCapped" }));
    }
}
