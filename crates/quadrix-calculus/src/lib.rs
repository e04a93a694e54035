//! # quadrix-calculus
//!
//! Reference calculus for the quadrix quadrature toolkit.
//!
//! - [`definite_integral`]: power rule for polynomials, adaptive
//!   Gauss-Kronrod otherwise
//! - [`iterated_integral`]: double integrals whose inner limits may depend on
//!   the outer variable
//! - [`critical_points`]: real roots of `g(x) = 0` on a closed interval
//!
//! # Example
//!
//! ```
//! use quadrix_calculus::{definite_integral, ExactOptions};
//! use quadrix_core::Expression;
//!
//! let f = Expression::parse("3*x**2").unwrap();
//! let v = definite_integral(&f, "x", 0.0, 2.0, &ExactOptions::default()).unwrap();
//! assert!((v.value - 8.0).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod definite;
pub mod error;
pub mod numerical;
pub mod options;
pub mod roots;

pub use definite::{definite_integral, iterated_integral, ExactValue, Region, Via};
pub use error::{CalculusError, SolveError};
pub use options::ExactOptions;
pub use roots::critical_points;
