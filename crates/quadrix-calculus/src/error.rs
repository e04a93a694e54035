//! Errors of the calculus routines.

use quadrix_core::CoreError;
use thiserror::Error;

/// Failure to compute a reference integral.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CalculusError {
    /// The integrand or a bound mentions a variable that is not integrated.
    #[error("`{symbol}` is neither the integration variable nor a bound variable")]
    FreeSymbol {
        /// The stray symbol.
        symbol: String,
    },

    /// The expression engine failed.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Failure to locate the real roots of an equation on an interval.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum SolveError {
    /// The function vanishes everywhere, so every point is a root.
    #[error("equation is identically zero on [{lo}, {hi}]")]
    IdenticallyZero {
        /// Lower end of the search interval.
        lo: f64,
        /// Upper end of the search interval.
        hi: f64,
    },

    /// The function is not finite somewhere on the interval.
    #[error("equation is not finite at {at}")]
    NonFinite {
        /// A point where the function is infinite or undefined.
        at: f64,
    },

    /// The function mentions a variable other than the unknown.
    #[error("equation has a free symbol `{0}`")]
    FreeSymbol(String),
}
