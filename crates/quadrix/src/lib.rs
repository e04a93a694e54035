//! # Quadrix
//!
//! Fixed-node numerical integration with auditable step traces.
//!
//! Quadrix approximates definite integrals with the Trapezoidal, Simpson 1/3
//! and Simpson 3/8 rules, extends them to double integrals and Romberg
//! extrapolation, estimates truncation errors from symbolic derivatives, and
//! records every intermediate quantity as a LaTeX step.
//!
//! ## Features
//!
//! - **Symbolic Core**: Arena-allocated expressions with hash-consing
//! - **Simplification**: Equality saturation via e-graphs, for readable traces
//! - **Reference Integrals**: Power rule for polynomials, adaptive
//!   Gauss-Kronrod otherwise
//! - **Quadrature**: Simple, composite, double and Romberg methods
//!
//! ## Quick Start
//!
//! ```rust
//! use quadrix::prelude::*;
//!
//! let mut session = IntegrationSession::parse("sin(x)", "0", "pi").unwrap();
//! let value = session.composite(Rule::Simpson13, 4).unwrap().value;
//! assert!((value - 2.0).abs() < 1e-3);
//!
//! let report = session.errors().unwrap();
//! assert!(report.get(ErrorKind::True).unwrap().abs() < 1e-3);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub use quadrix_calculus as calculus;
pub use quadrix_core as core;
pub use quadrix_quadrature as quadrature;
pub use quadrix_simplify as simplify;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use quadrix_calculus::{definite_integral, ExactOptions};
    pub use quadrix_core::Expression;
    pub use quadrix_quadrature::{
        composite, double, evaluate, evaluate_batch, romberg, simple, DoubleProblem, ErrorKind,
        ErrorReport, Evaluation, IntegrationSession, Method, Partitions, Problem,
        QuadratureError, QuadratureOptions, Request, Rule, Step, Trace,
    };
    pub use quadrix_simplify::Simplifier;
}
