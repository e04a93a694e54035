//! Errors surfaced by quadrature methods and sessions.

use quadrix_calculus::CalculusError;
use quadrix_core::{CoreError, ParseError};
use thiserror::Error;

/// Failure of a quadrature request.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum QuadratureError {
    /// The partition count is zero, negative or not an integer.
    #[error("partition count must be a positive integer, got {0}")]
    InvalidPartitionCount(String),

    /// Romberg extrapolation was asked for an odd order.
    #[error("Romberg order must be even, got {0}")]
    OddOrderRequested(usize),

    /// Romberg extrapolation was asked for an order below 2.
    #[error("Romberg order must be at least 2, got {0}")]
    InvalidRombergOrder(usize),

    /// `errors(kind)` received a name that is not in the error kind table.
    #[error("unknown error kind `{0}`")]
    UnknownErrorKind(String),

    /// Function or bound text could not be parsed.
    #[error("cannot parse `{text}`: {source}")]
    UnparsableExpression {
        /// The offending text.
        text: String,
        /// Where and why parsing failed.
        #[source]
        source: ParseError,
    },

    /// An expression mentions a variable the method does not integrate.
    #[error("symbol `{0}` is not an integration variable")]
    UnboundSymbol(String),

    /// The bounds do not fit the requested method.
    #[error("invalid domain: {0}")]
    InvalidDomain(String),

    /// Errors were requested before any method was evaluated.
    #[error("no method has been evaluated yet")]
    NoSolution,
}

/// Result alias for quadrature operations.
pub type Result<T> = std::result::Result<T, QuadratureError>;

impl From<CoreError> for QuadratureError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::Parse(source) => Self::UnparsableExpression {
                text: String::new(),
                source,
            },
            CoreError::UnboundSymbol(s) => Self::UnboundSymbol(s),
            CoreError::NonPolynomial { var } => {
                Self::InvalidDomain(format!("expression is not a polynomial in `{var}`"))
            }
        }
    }
}

impl From<CalculusError> for QuadratureError {
    fn from(e: CalculusError) -> Self {
        match e {
            CalculusError::FreeSymbol { symbol } => Self::UnboundSymbol(symbol),
            CalculusError::Core(e) => e.into(),
        }
    }
}
