//! Errors raised by the expression engine.

use thiserror::Error;

/// Malformed expression text.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("cannot parse expression at offset {position}: {message}")]
pub struct ParseError {
    /// Byte offset in the input where parsing stopped.
    pub position: usize,
    /// What the parser expected or found.
    pub message: String,
}

impl ParseError {
    pub(crate) fn new(position: usize, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }
}

/// Errors from evaluating or analysing an expression.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The input text is not a valid expression.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Numeric evaluation met a symbol with no value.
    #[error("symbol `{0}` has no value")]
    UnboundSymbol(String),

    /// A degree was requested for an expression that is not a polynomial.
    #[error("expression is not a polynomial in `{var}`")]
    NonPolynomial {
        /// The variable the degree was requested in.
        var: String,
    },
}
