use meander_types::{Expression, ParameterSet};

use crate::error::ResolveError;
use crate::parser::{parse, BinaryOp, Expr};

impl Expr {
    /// Evaluate against `params`. Does not check the result for finiteness.
    pub fn eval(&self, params: &ParameterSet) -> Result<f64, ResolveError> {
        Ok(match self {
            Expr::Number(v) => *v,
            Expr::Param(name) => params
                .get(name)
                .ok_or_else(|| ResolveError::UnknownParameter { name: name.clone() })?,
            Expr::Neg(inner) => -inner.eval(params)?,
            Expr::Sqrt(inner) => inner.eval(params)?.sqrt(),
            Expr::Binary { op, lhs, rhs } => {
                let a = lhs.eval(params)?;
                let b = rhs.eval(params)?;
                match op {
                    BinaryOp::Add => a + b,
                    BinaryOp::Sub => a - b,
                    BinaryOp::Mul => a * b,
                    BinaryOp::Div => a / b,
                }
            }
        })
    }
}

/// Parse and evaluate `expr` against `params`.
pub fn evaluate(expr: &Expression, params: &ParameterSet) -> Result<f64, ResolveError> {
    evaluate_str(expr.as_str(), params)
}

/// Like [`evaluate`], for raw text.
pub fn evaluate_str(source: &str, params: &ParameterSet) -> Result<f64, ResolveError> {
    let value = parse(source)?.eval(params)?;
    if !value.is_finite() {
        return Err(ResolveError::NonFinite {
            expr: source.to_string(),
        });
    }
    Ok(value)
}
