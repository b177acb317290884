//! Bounding-box formulas of the meander segments.
//!
//! Index-dependent coefficients are substituted as literals so the kernel
//! receives plain parameter arithmetic.

use meander_types::{Expression, SegmentBounds};

/// Provisional bounds of segment `index` (1-based), before the patch test.
pub fn segment_bounds(index: u32) -> SegmentBounds {
    let i = u64::from(index);
    let gap_coeff = 2.0 * index as f64 - 0.5;

    SegmentBounds {
        xmin: Expression::new(format!(
            "x_patch1 - l_patch/2 + w_meander*({}) + w_meander_gap*({})",
            2 * i,
            2 * i - 1
        )),
        xmax: Expression::new(format!(
            "x_patch1 - l_patch/2 + w_meander*({}) + w_meander_gap*({})",
            2 * i + 1,
            2 * i - 1
        )),
        ymin: Expression::new("y_patch1 - l_patch/2"),
        ymax: Expression::new(format!(
            "y_patch1 + l_patch/2 - w_chamfer_patch + w_meander*({}) + w_meander_gap*({}) - w_meander/sqrt(2)",
            2 * i,
            gap_coeff
        )),
        zmin: Expression::new("ts"),
        zmax: Expression::new("ts + tp"),
    }
}

/// Upper y edge of the patch.
pub fn patch_upper_bound() -> Expression {
    Expression::new("y_patch1 + l_patch/2")
}

/// ymax of a segment pulled back inside the patch.
pub fn capped_ymax() -> Expression {
    Expression::new("y_patch1 + l_patch/2 - w_meander")
}
