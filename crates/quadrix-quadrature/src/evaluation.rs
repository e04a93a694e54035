//! The result of one method applied to one problem.

use quadrix_calculus::{definite_integral, iterated_integral, ExactOptions, Region};
use quadrix_core::Expression;
use serde::Serialize;

use crate::error::{QuadratureError, Result};
use crate::estimate::{ErrorFields, ErrorKind, ErrorReport};
use crate::problem::{X, Y};
use crate::trace::Trace;

/// The region an evaluation integrated over.
#[derive(Clone, Debug)]
pub enum Domain {
    /// `x ∈ [a, b]`.
    Single {
        /// Lower limit.
        a: f64,
        /// Upper limit.
        b: f64,
    },
    /// `x ∈ inner`, `y ∈ outer`.
    Rectangular {
        /// Limits of `x`.
        inner: (f64, f64),
        /// Limits of `y`.
        outer: (f64, f64),
    },
    /// `x ∈ outer`, `y ∈ [inner.0(x), inner.1(x)]`.
    VariableLimit {
        /// Limits of `y` as functions of `x`.
        inner: (Expression, Expression),
        /// Limits of `x`.
        outer: (f64, f64),
    },
}

/// Value, error fields and trace of one method run.
#[derive(Clone, Debug, Serialize)]
pub struct Evaluation {
    /// Method name, e.g. `Composite Simpson 1/3`.
    pub method: String,
    /// The approximation.
    pub value: f64,
    /// Error estimates; unset when not computed.
    pub errors: ErrorFields,
    /// Steps in computation order.
    pub trace: Trace,
    /// Integrand.
    #[serde(skip)]
    pub expr: Expression,
    /// Integration region.
    #[serde(skip)]
    pub domain: Domain,
}

impl Evaluation {
    /// Reference value over the full domain: a single integral for
    /// one-dimensional methods, an iterated integral for double ones.
    ///
    /// # Errors
    ///
    /// Fails if the backend cannot integrate the integrand.
    pub fn exact(&self, opts: &ExactOptions) -> Result<f64> {
        let v = match &self.domain {
            Domain::Single { a, b } => definite_integral(&self.expr, X, *a, *b, opts)?,
            Domain::Rectangular { inner, outer } => {
                let (lo, hi) = (Expression::number(inner.0), Expression::number(inner.1));
                let region = Region {
                    inner_var: X,
                    inner: (&lo, &hi),
                    outer_var: Y,
                    outer: *outer,
                };
                iterated_integral(&self.expr, &region, opts)?
            }
            Domain::VariableLimit { inner, outer } => {
                let region = Region {
                    inner_var: Y,
                    inner: (&inner.0, &inner.1),
                    outer_var: X,
                    outer: *outer,
                };
                iterated_integral(&self.expr, &region, opts)?
            }
        };
        Ok(v.value)
    }

    /// Reference value as a single integral in `x` over the first interval,
    /// whatever the method.
    ///
    /// # Errors
    ///
    /// * [`QuadratureError::UnboundSymbol`] when the integrand also depends
    ///   on `y`.
    /// * [`QuadratureError::InvalidDomain`] when that interval has
    ///   expression bounds.
    pub fn exact_single(&self, opts: &ExactOptions) -> Result<f64> {
        let (a, b) = match &self.domain {
            Domain::Single { a, b } => (*a, *b),
            Domain::Rectangular { inner, .. } => *inner,
            Domain::VariableLimit { inner, .. } => {
                match (inner.0.as_number(), inner.1.as_number()) {
                    (Some(a), Some(b)) => (a, b),
                    _ => {
                        return Err(QuadratureError::InvalidDomain(format!(
                            "cannot integrate in x between {} and {}",
                            inner.0, inner.1
                        )))
                    }
                }
            }
        };
        Ok(definite_integral(&self.expr, X, a, b, opts)?.value)
    }

    /// All error quantities, with true and relative errors against
    /// [`Evaluation::exact`].
    ///
    /// # Errors
    ///
    /// Fails as [`Evaluation::exact`] does.
    pub fn report(&self, opts: &ExactOptions) -> Result<ErrorReport> {
        let exact = self.exact(opts)?;
        let mut fields = self.errors;
        fields.true_error = Some(exact - self.value);
        fields.relative = Some(relative_error(self.value, exact));
        Ok(ErrorReport::new(exact, fields))
    }

    /// One error quantity. True and relative errors use
    /// [`Evaluation::exact_single`]; the rest are the stored fields.
    ///
    /// # Errors
    ///
    /// Fails as [`Evaluation::exact_single`] does.
    pub fn error(&self, kind: ErrorKind, opts: &ExactOptions) -> Result<Option<f64>> {
        match kind {
            ErrorKind::True => Ok(Some(self.exact_single(opts)? - self.value)),
            ErrorKind::Relative => Ok(Some(relative_error(self.value, self.exact_single(opts)?))),
            _ => Ok(self.errors.get(kind)),
        }
    }
}

/// `(1 - solution / exact) · 100`.
fn relative_error(solution: f64, exact: f64) -> f64 {
    (1.0 - solution / exact) * 100.0
}
