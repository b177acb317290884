//! Error types for expression resolution.

/// Errors raised while parsing or evaluating an expression.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResolveError {
    /// The expression references a name the parameter set does not define.
    #[error("unknown parameter '{name}'")]
    UnknownParameter { name: String },

    /// Lexical or syntax error.
    #[error("malformed expression '{expr}' at offset {offset}: {message}")]
    MalformedExpression {
        expr: String,
        /// Byte offset into `expr` where the problem was detected.
        offset: usize,
        message: String,
    },

    /// Evaluation produced NaN or an infinity (division by zero, sqrt of a negative).
    #[error("expression '{expr}' does not evaluate to a finite number")]
    NonFinite { expr: String },
}

impl ResolveError {
    pub(crate) fn malformed(expr: &str, offset: usize, message: impl Into<String>) -> Self {
        Self::MalformedExpression {
            expr: expr.to_string(),
            offset,
            message: message.into(),
        }
    }
}
