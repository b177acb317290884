use serde::{Deserialize, Serialize};
use std::fmt;

/// Symbolic arithmetic text over parameter names, e.g. `x_patch1 - l_patch/2`.
///
/// Kept as text all the way down to the kernel so the finished model stays
/// parametric. Evaluation lives in the `expr-resolver` crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Expression(String);

impl Expression {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Expression {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Expression {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A `(min, max)` pair of expressions along one axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExprRange {
    pub min: Expression,
    pub max: Expression,
}

impl ExprRange {
    pub fn new(min: impl Into<Expression>, max: impl Into<Expression>) -> Self {
        Self {
            min: min.into(),
            max: max.into(),
        }
    }
}
