//! Recursive-descent parser producing an [`Expr`] tree.
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('+' | '-') unary | primary
//! primary := number | ident | ident '(' expr ')' | '(' expr ')'
//! ```

use std::collections::BTreeSet;

use crate::error::ResolveError;
use crate::lexer::{Lexer, SpannedToken, Token};

/// Deepest expression tree accepted by [`parse`], counting signs,
/// parentheses, calls and chained operators.
pub const MAX_NESTING: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// Parsed arithmetic expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    /// Reference to a named parameter.
    Param(String),
    Neg(Box<Expr>),
    Sqrt(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

impl Expr {
    /// Names of all parameters referenced by this expression, sorted and deduplicated.
    pub fn parameters(&self) -> BTreeSet<&str> {
        let mut names = BTreeSet::new();
        self.collect_parameters(&mut names);
        names
    }

    fn collect_parameters<'a>(&'a self, out: &mut BTreeSet<&'a str>) {
        match self {
            Expr::Number(_) => {}
            Expr::Param(name) => {
                out.insert(name.as_str());
            }
            Expr::Neg(inner) | Expr::Sqrt(inner) => inner.collect_parameters(out),
            Expr::Binary { lhs, rhs, .. } => {
                lhs.collect_parameters(out);
                rhs.collect_parameters(out);
            }
        }
    }
}

/// Parse expression text into an [`Expr`].
pub fn parse(source: &str) -> Result<Expr, ResolveError> {
    let tokens = Lexer::new(source).tokenize()?;
    let mut parser = Parser {
        source,
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.expr()?;
    if let Some(tok) = parser.tokens.get(parser.pos) {
        return Err(ResolveError::malformed(
            source,
            tok.offset,
            format!("unexpected trailing {:?}", tok.token),
        ));
    }
    Ok(expr)
}

struct Parser<'a> {
    source: &'a str,
    tokens: Vec<SpannedToken>,
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    fn next(&mut self) -> Option<SpannedToken> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    /// Offset of the current token, or the end of input.
    fn offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|t| t.offset)
            .unwrap_or(self.source.len())
    }

    fn error(&self, message: impl Into<String>) -> ResolveError {
        ResolveError::malformed(self.source, self.offset(), message)
    }

    fn expect(&mut self, expected: Token) -> Result<(), ResolveError> {
        if self.peek() == Some(&expected) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(format!("expected {:?}", expected)))
        }
    }

    /// Enter one more level of the tree, failing past [`MAX_NESTING`].
    fn descend(&mut self) -> Result<(), ResolveError> {
        if self.depth >= MAX_NESTING {
            return Err(self.error(format!("nesting too deep (limit {})", MAX_NESTING)));
        }
        self.depth += 1;
        Ok(())
    }

    // Operator chains deepen the left spine, so each operator counts as a level.
    fn expr(&mut self) -> Result<Expr, ResolveError> {
        let base = self.depth;
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => {
                    self.depth = base;
                    return Ok(lhs);
                }
            };
            self.descend()?;
            self.pos += 1;
            let rhs = self.term()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn term(&mut self) -> Result<Expr, ResolveError> {
        let base = self.depth;
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => {
                    self.depth = base;
                    return Ok(lhs);
                }
            };
            self.descend()?;
            self.pos += 1;
            let rhs = self.unary()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    // Signs, parentheses and calls all recurse through here.
    fn unary(&mut self) -> Result<Expr, ResolveError> {
        self.descend()?;
        let result = self.signed();
        self.depth -= 1;
        result
    }

    fn signed(&mut self) -> Result<Expr, ResolveError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                Ok(Expr::Neg(Box::new(self.unary()?)))
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.unary()
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<Expr, ResolveError> {
        let offset = self.offset();
        let Some(tok) = self.next() else {
            return Err(self.error("unexpected end of expression"));
        };

        match tok.token {
            Token::Number(v) => Ok(Expr::Number(v)),
            Token::Ident(name) => {
                if self.peek() != Some(&Token::LParen) {
                    return Ok(Expr::Param(name));
                }
                if name != "sqrt" {
                    return Err(ResolveError::malformed(
                        self.source,
                        offset,
                        format!("unknown function '{}'", name),
                    ));
                }
                self.pos += 1;
                let arg = self.expr()?;
                self.expect(Token::RParen)?;
                Ok(Expr::Sqrt(Box::new(arg)))
            }
            Token::LParen => {
                let inner = self.expr()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            other => Err(ResolveError::malformed(
                self.source,
                offset,
                format!("unexpected {:?}", other),
            )),
        }
    }
}
