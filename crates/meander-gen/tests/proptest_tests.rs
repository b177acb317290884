//! Property-based tests for segment planning and emission using `proptest`.

use proptest::prelude::*;

use meander_gen::*;
use meander_kernel::{KernelCall, MockKernel};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

/// Patch geometry where every box has a non-empty extent on all three axes.
fn arb_params() -> impl Strategy<Value = ParameterSet> {
    (
        (-10.0f64..10.0, 5.0f64..50.0, -10.0f64..10.0),
        (0.1f64..3.0, 0.1f64..2.0, 0.0f64..4.0),
        (0.0f64..2.0, 0.1f64..2.0),
    )
        .prop_map(|((x, l, y), (w, gap, wcp), (ts, tp))| {
            ParameterSet::new()
                .with("x_patch1", x)
                .with("l_patch", l)
                .with("y_patch1", y)
                .with("w_meander", w)
                .with("w_meander_gap", gap)
                .with("w_chamfer_patch", wcp)
                .with("ts", ts)
                .with("tp", tp)
        })
}

fn arb_turns() -> impl Strategy<Value = u32> {
    1u32..12
}

fn provisional_ymax(index: u32, params: &ParameterSet) -> f64 {
    expr_resolver::evaluate(&layout::segment_bounds(index).ymax, params).unwrap()
}

fn patch_upper(params: &ParameterSet) -> f64 {
    expr_resolver::evaluate(&layout::patch_upper_bound(), params).unwrap()
}

// ---------------------------------------------------------------------------
// Planning
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn plan_has_one_segment_per_turn(turns in arb_turns(), params in arb_params()) {
        let plan = plan_segments(turns, &params).unwrap();
        prop_assert_eq!(plan.len(), turns as usize);
        for (k, p) in plan.iter().enumerate() {
            prop_assert_eq!(p.segment.index, k as u32 + 1);
            prop_assert_eq!(&p.segment.name, &format!("meander_LU2_{}", k + 1));
        }
    }

    #[test]
    fn segments_advance_along_x(turns in arb_turns(), params in arb_params()) {
        let plan = plan_segments(turns, &params).unwrap();
        for p in &plan {
            prop_assert!(p.resolved.xmin < p.resolved.xmax);
        }
        for pair in plan.windows(2) {
            prop_assert!(pair[0].resolved.xmin < pair[1].resolved.xmin);
            prop_assert!(pair[0].resolved.xmax < pair[1].resolved.xmin);
        }
    }

    #[test]
    fn provisional_ymax_grows_with_index(turns in 2u32..12, params in arb_params()) {
        for i in 1..turns {
            prop_assert!(provisional_ymax(i, &params) < provisional_ymax(i + 1, &params));
        }
    }

    #[test]
    fn capped_iff_provisional_overruns(turns in arb_turns(), params in arb_params()) {
        let upper = patch_upper(&params);
        let w = params.get("w_meander").unwrap();
        for p in plan_segments(turns, &params).unwrap() {
            let overruns = provisional_ymax(p.segment.index, &params) > upper;
            prop_assert_eq!(p.segment.is_capped(), overruns);
            if overruns {
                prop_assert!((p.resolved.ymax - (upper - w)).abs() < 1e-9);
            } else {
                prop_assert!(p.resolved.ymax <= upper);
            }
        }
    }

    #[test]
    fn once_capped_stays_capped(turns in arb_turns(), params in arb_params()) {
        let segments = generate_segments(turns, &params).unwrap();
        if let Some(first) = segments.iter().position(|s| s.is_capped()) {
            prop_assert!(segments[first..].iter().all(|s| s.is_capped()));
        }
    }

    #[test]
    fn planning_is_deterministic(turns in arb_turns(), params in arb_params()) {
        prop_assert_eq!(
            generate_segments(turns, &params).unwrap(),
            generate_segments(turns, &params).unwrap()
        );
    }
}

// ---------------------------------------------------------------------------
// Emission against the recording kernel
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn capped_and_chamfered_are_exclusive(turns in 1u32..6, params in arb_params()) {
        let mut kernel = MockKernel::new();
        let report = MeanderGenerator::new(GeneratorConfig::new(params).with_turns(turns))
            .run(&mut kernel)
            .unwrap();
        prop_assert_eq!(report.segments.len(), turns as usize);

        for seg in &report.segments {
            let touching: Vec<&KernelCall> = kernel
                .calls()
                .iter()
                .filter(|c| c.shape() == Some(&seg.shape))
                .collect();
            let picks = touching.iter().filter(|c| c.is_pick()).count();
            let chamfers = touching
                .iter()
                .filter(|c| matches!(c, KernelCall::Chamfer(_)))
                .count();

            if seg.segment.is_capped() {
                prop_assert_eq!(&seg.outcome, &ChamferOutcome::SkippedCapped);
                prop_assert_eq!(picks, 0);
                prop_assert_eq!(chamfers, 0);
            } else {
                prop_assert_ne!(&seg.outcome, &ChamferOutcome::SkippedCapped);
                prop_assert_eq!(picks, 3);
                prop_assert!(chamfers <= 1);
                if seg.outcome.is_applied() {
                    prop_assert_eq!(chamfers, 1);
                }
            }
        }
    }

    #[test]
    fn emission_is_deterministic(turns in 1u32..6, params in arb_params()) {
        let config = GeneratorConfig::new(params).with_turns(turns);
        let mut a = MockKernel::new();
        let mut b = MockKernel::new();
        let ra = MeanderGenerator::new(config.clone()).run(&mut a).unwrap();
        let rb = MeanderGenerator::new(config).run(&mut b).unwrap();
        prop_assert_eq!(ra, rb);
        prop_assert_eq!(a.calls(), b.calls());
    }
}
