//! Tokenizer for parameter expressions.
//!
//! Handles:
//! - Numbers (e.g., `2`, `0.5`, `.25`, `1.5e-3`)
//! - Identifiers (e.g., `w_meander`, `sqrt`)
//! - Operators `+ - * /` and parentheses

use crate::error::ResolveError;

/// A token in an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

/// A token with the byte offset where it starts.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub offset: usize,
}

pub struct Lexer<'a> {
    source: &'a str,
    input: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            input: source.as_bytes(),
            pos: 0,
        }
    }

    /// Tokenize the entire input.
    pub fn tokenize(&mut self) -> Result<Vec<SpannedToken>, ResolveError> {
        let mut tokens = Vec::new();
        while let Some(tok) = self.next_token()? {
            tokens.push(tok);
        }
        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Option<SpannedToken>, ResolveError> {
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.pos += 1;
        }

        let Some(ch) = self.peek() else {
            return Ok(None);
        };
        let offset = self.pos;

        let token = match ch {
            b'+' => self.single(Token::Plus),
            b'-' => self.single(Token::Minus),
            b'*' => self.single(Token::Star),
            b'/' => self.single(Token::Slash),
            b'(' => self.single(Token::LParen),
            b')' => self.single(Token::RParen),
            b'0'..=b'9' | b'.' => self.read_number()?,
            b'A'..=b'Z' | b'a'..=b'z' | b'_' => self.read_ident(),
            _ => {
                // Report the full (possibly multi-byte) character.
                let bad = self.source[offset..].chars().next().unwrap_or('?');
                return Err(ResolveError::malformed(
                    self.source,
                    offset,
                    format!("unexpected character '{}'", bad),
                ));
            }
        };

        Ok(Some(SpannedToken { token, offset }))
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn single(&mut self, token: Token) -> Token {
        self.pos += 1;
        token
    }

    fn eat_digits(&mut self) -> usize {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        self.pos - start
    }

    fn read_number(&mut self) -> Result<Token, ResolveError> {
        let start = self.pos;
        let mut digits = self.eat_digits();
        if self.peek() == Some(b'.') {
            self.pos += 1;
            digits += self.eat_digits();
        }
        if digits == 0 {
            return Err(ResolveError::malformed(
                self.source,
                start,
                "expected digits in number",
            ));
        }

        if matches!(self.peek(), Some(b'e' | b'E')) {
            let exp_start = self.pos;
            self.pos += 1;
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            if self.eat_digits() == 0 {
                return Err(ResolveError::malformed(
                    self.source,
                    exp_start,
                    "exponent has no digits",
                ));
            }
        }

        let text = &self.source[start..self.pos];
        text.parse::<f64>()
            .map(Token::Number)
            .map_err(|e| ResolveError::malformed(self.source, start, format!("bad number '{}': {}", text, e)))
    }

    fn read_ident(&mut self) -> Token {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == b'_')
        {
            self.pos += 1;
        }
        Token::Ident(self.source[start..self.pos].to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<Token> {
        Lexer::new(src)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.token)
            .collect()
    }

    #[test]
    fn test_tokenize_formula() {
        assert_eq!(
            kinds("w_meander*2 + .5"),
            vec![
                Token::Ident("w_meander".into()),
                Token::Star,
                Token::Number(2.0),
                Token::Plus,
                Token::Number(0.5),
            ]
        );
    }

    #[test]
    fn test_tokenize_exponent() {
        assert_eq!(kinds("1.5e-3"), vec![Token::Number(1.5e-3)]);
        assert_eq!(kinds("2E2"), vec![Token::Number(200.0)]);
    }

    #[test]
    fn test_offsets_skip_whitespace() {
        let tokens = Lexer::new("  a +b").tokenize().unwrap();
        let offsets: Vec<usize> = tokens.iter().map(|t| t.offset).collect();
        assert_eq!(offsets, vec![2, 4, 5]);
    }

    #[test]
    fn test_unexpected_character() {
        let err = Lexer::new("a % b").tokenize().unwrap_err();
        match err {
            ResolveError::MalformedExpression { offset, .. } => assert_eq!(offset, 2),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_bare_dot_and_empty_exponent_rejected() {
        assert!(Lexer::new(".").tokenize().is_err());
        assert!(Lexer::new("3e").tokenize().is_err());
    }
}
