use serde::{Deserialize, Serialize};
use std::fmt;

use crate::expression::{ExprRange, Expression};

/// Whether a segment fits inside the patch or had to be pulled back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SegmentVariant {
    /// Fits inside the patch envelope; gets a chamfer.
    Normal,
    /// Provisional ymax overran the patch; ymax was truncated and no chamfer is applied.
    Capped,
}

/// Identifies one of the six bounding-box formulas of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bound {
    Xmin,
    Xmax,
    Ymin,
    Ymax,
    Zmin,
    Zmax,
    /// The patch's static upper y edge used by the boundary test.
    PatchUpper,
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Bound::Xmin => "xmin",
            Bound::Xmax => "xmax",
            Bound::Ymin => "ymin",
            Bound::Ymax => "ymax",
            Bound::Zmin => "zmin",
            Bound::Zmax => "zmax",
            Bound::PatchUpper => "patch upper bound",
        };
        f.write_str(name)
    }
}

/// Symbolic bounding box of a segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentBounds {
    pub xmin: Expression,
    pub xmax: Expression,
    pub ymin: Expression,
    pub ymax: Expression,
    pub zmin: Expression,
    pub zmax: Expression,
}

impl SegmentBounds {
    pub fn x_range(&self) -> ExprRange {
        ExprRange::new(self.xmin.clone(), self.xmax.clone())
    }

    pub fn y_range(&self) -> ExprRange {
        ExprRange::new(self.ymin.clone(), self.ymax.clone())
    }

    pub fn z_range(&self) -> ExprRange {
        ExprRange::new(self.zmin.clone(), self.zmax.clone())
    }
}

/// Numeric bounding box after resolving a [`SegmentBounds`] against a parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedBounds {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
    pub zmin: f64,
    pub zmax: f64,
}

impl ResolvedBounds {
    /// Outer top corner `(xmax, ymax, zmax)`, where the trace turns.
    pub fn outer_top_corner(&self) -> [f64; 3] {
        [self.xmax, self.ymax, self.zmax]
    }
}

/// One rectangular trace element of the meander.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// 1-based position along the meander.
    pub index: u32,
    pub name: String,
    pub bounds: SegmentBounds,
    pub variant: SegmentVariant,
}

impl Segment {
    pub fn is_capped(&self) -> bool {
        self.variant == SegmentVariant::Capped
    }
}

/// Qualified kernel name of a shape: `<component>:<name>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShapeName {
    pub component: String,
    pub name: String,
}

impl ShapeName {
    pub fn new(component: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ShapeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.component, self.name)
    }
}
