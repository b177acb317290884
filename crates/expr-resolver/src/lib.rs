//! Arithmetic expression resolver for symbolic design parameters.
//!
//! Parses formulas such as `x_patch1 - l_patch/2 + w_meander*2` into an
//! [`Expr`] tree and evaluates them against a [`ParameterSet`]. Supports
//! `+ - * /`, unary sign, parentheses and `sqrt(..)` with the usual
//! precedence.

mod error;
mod eval;
mod lexer;
mod parser;

pub use error::ResolveError;
pub use eval::{evaluate, evaluate_str};
pub use parser::{parse, BinaryOp, Expr, MAX_NESTING};

pub use meander_types::{Expression, ParameterSet};
