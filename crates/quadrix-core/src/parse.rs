//! Infix expression parser.
//!
//! Accepts the usual calculator notation: numbers (`2`, `0.5`, `1e-3`),
//! identifiers, `+ - * /`, powers written `**` or `^`, parentheses, calls of
//! the functions in [`Func`], and the constants `pi` and `E`.
//!
//! Powers are right-associative and bind tighter than unary minus, so
//! `-x**2` reads as `-(x**2)` and `2**-1` as `2**(-1)`.
//!
//! Nesting of parentheses, calls, signs and exponents is capped at
//! [`MAX_DEPTH`] levels; deeper input is rejected instead of exhausting the
//! stack.

use crate::arena::ExprArena;
use crate::error::ParseError;
use crate::expr::Func;
use crate::handle::ExprHandle;

/// Deepest nesting the parser accepts.
pub const MAX_DEPTH: usize = 256;

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Result<Vec<(usize, Token)>, ParseError> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        let start = i;
        match c {
            b' ' | b'\t' | b'\n' | b'\r' => {
                i += 1;
                continue;
            }
            b'+' => tokens.push((start, Token::Plus)),
            b'-' => tokens.push((start, Token::Minus)),
            b'/' => tokens.push((start, Token::Slash)),
            b'^' => tokens.push((start, Token::Caret)),
            b'(' => tokens.push((start, Token::LParen)),
            b')' => tokens.push((start, Token::RParen)),
            b'*' => {
                if bytes.get(i + 1) == Some(&b'*') {
                    i += 1;
                    tokens.push((start, Token::Caret));
                } else {
                    tokens.push((start, Token::Star));
                }
            }
            b'0'..=b'9' | b'.' => {
                i = scan_number(bytes, i);
                let text = &input[start..i];
                let value = text
                    .parse::<f64>()
                    .map_err(|_| ParseError::new(start, format!("invalid number `{text}`")))?;
                tokens.push((start, Token::Number(value)));
                continue;
            }
            c if c.is_ascii_alphabetic() || c == b'_' => {
                while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                    i += 1;
                }
                tokens.push((start, Token::Ident(input[start..i].to_string())));
                continue;
            }
            _ => {
                let ch = input[start..].chars().next().unwrap_or('?');
                return Err(ParseError::new(start, format!("unexpected character `{ch}`")));
            }
        }
        i += 1;
    }

    Ok(tokens)
}

fn scan_number(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
        i += 1;
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        if j < bytes.len() && bytes[j].is_ascii_digit() {
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            i = j;
        }
    }
    i
}

/// Recursive-descent parser writing into an arena.
pub struct Parser<'a> {
    arena: &'a mut ExprArena,
    tokens: Vec<(usize, Token)>,
    pos: usize,
    end: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Tokenizes `input` for parsing into `arena`.
    ///
    /// # Errors
    ///
    /// Returns an error on characters outside the grammar.
    pub fn new(arena: &'a mut ExprArena, input: &str) -> Result<Self, ParseError> {
        Ok(Self {
            arena,
            tokens: tokenize(input)?,
            pos: 0,
            end: input.len(),
            depth: 0,
        })
    }

    /// Parses the whole input as one expression.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, unbalanced, or has trailing tokens.
    pub fn parse(mut self) -> Result<ExprHandle, ParseError> {
        if self.tokens.is_empty() {
            return Err(ParseError::new(0, "empty expression"));
        }
        let root = self.additive()?;
        if let Some((at, tok)) = self.tokens.get(self.pos) {
            return Err(ParseError::new(*at, format!("unexpected token {tok:?}")));
        }
        Ok(root)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(_, t)| t)
    }

    fn offset(&self) -> usize {
        self.tokens.get(self.pos).map_or(self.end, |(at, _)| *at)
    }

    fn bump(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).map(|(_, t)| t.clone());
        self.pos += 1;
        tok
    }

    fn additive(&mut self) -> Result<ExprHandle, ParseError> {
        let mut lhs = self.multiplicative()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.bump();
                    let rhs = self.multiplicative()?;
                    lhs = self.arena.add(smallvec::smallvec![lhs, rhs]);
                }
                Some(Token::Minus) => {
                    self.bump();
                    let rhs = self.multiplicative()?;
                    lhs = self.arena.sub(lhs, rhs);
                }
                _ => return Ok(lhs),
            }
        }
    }

    fn multiplicative(&mut self) -> Result<ExprHandle, ParseError> {
        let mut lhs = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.bump();
                    let rhs = self.unary()?;
                    lhs = self.arena.mul(smallvec::smallvec![lhs, rhs]);
                }
                Some(Token::Slash) => {
                    self.bump();
                    let rhs = self.unary()?;
                    lhs = self.arena.div(lhs, rhs);
                }
                _ => return Ok(lhs),
            }
        }
    }

    // Every nested construct re-enters here, so this is the one place depth is counted.
    fn unary(&mut self) -> Result<ExprHandle, ParseError> {
        if self.depth >= MAX_DEPTH {
            return Err(ParseError::new(self.offset(), "expression nested too deeply"));
        }
        self.depth += 1;
        let result = self.unary_inner();
        self.depth -= 1;
        result
    }

    fn unary_inner(&mut self) -> Result<ExprHandle, ParseError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.bump();
                let arg = self.unary()?;
                Ok(self.arena.neg(arg))
            }
            Some(Token::Plus) => {
                self.bump();
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<ExprHandle, ParseError> {
        let base = self.primary()?;
        if self.peek() == Some(&Token::Caret) {
            self.bump();
            let exp = self.unary()?;
            return Ok(self.arena.pow(base, exp));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<ExprHandle, ParseError> {
        let at = self.offset();
        match self.bump() {
            Some(Token::Number(v)) => Ok(self.arena.number(v)),
            Some(Token::Ident(name)) => {
                if self.peek() == Some(&Token::LParen) {
                    let func = Func::from_name(&name)
                        .ok_or_else(|| ParseError::new(at, format!("unknown function `{name}`")))?;
                    self.bump();
                    let arg = self.additive()?;
                    self.expect_rparen()?;
                    return Ok(self.arena.call(func, arg));
                }
                Ok(match name.as_str() {
                    "pi" => self.arena.number(std::f64::consts::PI),
                    "E" => self.arena.number(std::f64::consts::E),
                    _ => self.arena.symbol(&name),
                })
            }
            Some(Token::LParen) => {
                let inner = self.additive()?;
                self.expect_rparen()?;
                Ok(inner)
            }
            Some(tok) => Err(ParseError::new(at, format!("unexpected token {tok:?}"))),
            None => Err(ParseError::new(at, "unexpected end of input")),
        }
    }

    fn expect_rparen(&mut self) -> Result<(), ParseError> {
        let at = self.offset();
        match self.bump() {
            Some(Token::RParen) => Ok(()),
            _ => Err(ParseError::new(at, "expected `)`")),
        }
    }
}

/// Parses `input` into `arena`.
///
/// # Errors
///
/// Returns a [`ParseError`] describing the first problem found.
pub fn parse_into(arena: &mut ExprArena, input: &str) -> Result<ExprHandle, ParseError> {
    Parser::new(arena, input)?.parse()
}
