//! Immutable problem descriptors.
//!
//! Every method is a pure function of one of these. Single integrals are in
//! `x`. Double integrals are in `x` and `y`: a rectangular domain integrates
//! `x` first, a variable-limit domain integrates `y` first between limits
//! that depend on `x`.

use std::fmt;

use quadrix_core::{format_number, Expression};

use crate::error::{QuadratureError, Result};

/// Variable of single integrals.
pub const X: &str = "x";
/// Second variable of double integrals.
pub const Y: &str = "y";

/// Parses function text, attaching the text to any error.
///
/// # Errors
///
/// Returns [`QuadratureError::UnparsableExpression`] for malformed text.
pub fn parse_expression(text: &str) -> Result<Expression> {
    Expression::parse(text).map_err(|source| QuadratureError::UnparsableExpression {
        text: text.to_string(),
        source,
    })
}

/// One end of an interval.
#[derive(Clone, Debug)]
pub enum Bound {
    /// A number.
    Value(f64),
    /// An expression, used for inner limits of variable-limit domains.
    Expr(Expression),
}

impl Bound {
    /// Parses a bound, folding constant text such as `pi/2` to a number.
    ///
    /// # Errors
    ///
    /// Returns [`QuadratureError::UnparsableExpression`] for malformed text.
    pub fn parse(text: &str) -> Result<Self> {
        Ok(Self::from(parse_expression(text)?))
    }

    /// The numeric value, if the bound is constant.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(*v),
            Self::Expr(e) => e.as_number(),
        }
    }

    /// The bound as an expression.
    #[must_use]
    pub fn to_expression(&self) -> Expression {
        match self {
            Self::Value(v) => Expression::number(*v),
            Self::Expr(e) => e.clone(),
        }
    }

    /// LaTeX rendering for traces.
    #[must_use]
    pub fn to_latex(&self) -> String {
        match self {
            Self::Value(v) => format_number(*v),
            Self::Expr(e) => e.to_latex(),
        }
    }
}

impl From<f64> for Bound {
    fn from(v: f64) -> Self {
        Self::Value(v)
    }
}

impl From<Expression> for Bound {
    fn from(e: Expression) -> Self {
        match e.as_number() {
            Some(v) => Self::Value(v),
            None => Self::Expr(e),
        }
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.write_str(&format_number(*v)),
            Self::Expr(e) => write!(f, "{e}"),
        }
    }
}

/// A `(lower, upper)` pair of bounds.
#[derive(Clone, Debug)]
pub struct Interval {
    /// Lower bound.
    pub lower: Bound,
    /// Upper bound.
    pub upper: Bound,
}

impl Interval {
    /// Creates an interval.
    pub fn new(lower: impl Into<Bound>, upper: impl Into<Bound>) -> Self {
        Self {
            lower: lower.into(),
            upper: upper.into(),
        }
    }

    /// Parses both bounds.
    ///
    /// # Errors
    ///
    /// Returns [`QuadratureError::UnparsableExpression`] for malformed text.
    pub fn parse(lower: &str, upper: &str) -> Result<Self> {
        Ok(Self {
            lower: Bound::parse(lower)?,
            upper: Bound::parse(upper)?,
        })
    }

    /// Both bounds as numbers, if both are constant.
    #[must_use]
    pub fn numeric(&self) -> Option<(f64, f64)> {
        Some((self.lower.as_number()?, self.upper.as_number()?))
    }

    pub(crate) fn require_numeric(&self, role: &str) -> Result<(f64, f64)> {
        self.numeric().ok_or_else(|| {
            QuadratureError::InvalidDomain(format!(
                "{role} interval [{}, {}] must be numeric",
                self.lower, self.upper
            ))
        })
    }
}

impl From<(f64, f64)> for Interval {
    fn from((a, b): (f64, f64)) -> Self {
        Self::new(a, b)
    }
}

/// `∫_a^b f(x) dx`.
#[derive(Clone, Debug)]
pub struct Problem {
    expr: Expression,
    a: f64,
    b: f64,
}

impl Problem {
    /// Creates a problem.
    ///
    /// # Errors
    ///
    /// Returns [`QuadratureError::UnboundSymbol`] if `expr` mentions a
    /// variable other than `x`.
    pub fn new(expr: Expression, a: f64, b: f64) -> Result<Self> {
        if let Some(s) = expr.free_symbols().into_iter().find(|s| s != X) {
            return Err(QuadratureError::UnboundSymbol(s));
        }
        Ok(Self { expr, a, b })
    }

    /// Parses the integrand.
    ///
    /// # Errors
    ///
    /// Fails as [`parse_expression`] and [`Problem::new`] do.
    pub fn parse(text: &str, a: f64, b: f64) -> Result<Self> {
        Self::new(parse_expression(text)?, a, b)
    }

    /// The integrand.
    #[must_use]
    pub fn expr(&self) -> &Expression {
        &self.expr
    }

    /// Lower limit.
    #[must_use]
    pub fn a(&self) -> f64 {
        self.a
    }

    /// Upper limit.
    #[must_use]
    pub fn b(&self) -> f64 {
        self.b
    }

    /// `f(t)`.
    pub(crate) fn f(&self, t: f64) -> Result<f64> {
        Ok(self.expr.eval_at(X, t)?)
    }
}

/// `∫∫ f(x, y)` over an inner interval integrated first and a numeric outer
/// interval.
///
/// A numeric inner interval is the rectangle `x ∈ inner`, `y ∈ outer`. An
/// inner interval with expression bounds is the region `x ∈ outer`,
/// `y ∈ [lower(x), upper(x)]`.
#[derive(Clone, Debug)]
pub struct DoubleProblem {
    expr: Expression,
    inner: Interval,
    outer: Interval,
}

impl DoubleProblem {
    /// Creates a problem.
    ///
    /// # Errors
    ///
    /// * [`QuadratureError::UnboundSymbol`] if `expr` mentions anything but
    ///   `x` and `y`, or an inner bound anything but `x`.
    pub fn new(expr: Expression, inner: Interval, outer: Interval) -> Result<Self> {
        if let Some(s) = expr.free_symbols().into_iter().find(|s| s != X && s != Y) {
            return Err(QuadratureError::UnboundSymbol(s));
        }
        for bound in [&inner.lower, &inner.upper] {
            if let Bound::Expr(e) = bound {
                if let Some(s) = e.free_symbols().into_iter().find(|s| s != X) {
                    return Err(QuadratureError::UnboundSymbol(s));
                }
            }
        }
        Ok(Self { expr, inner, outer })
    }

    /// Parses the integrand and all four bounds.
    ///
    /// # Errors
    ///
    /// Fails as [`parse_expression`] and [`DoubleProblem::new`] do.
    pub fn parse(text: &str, inner: (&str, &str), outer: (&str, &str)) -> Result<Self> {
        Self::new(
            parse_expression(text)?,
            Interval::parse(inner.0, inner.1)?,
            Interval::parse(outer.0, outer.1)?,
        )
    }

    /// The integrand.
    #[must_use]
    pub fn expr(&self) -> &Expression {
        &self.expr
    }

    /// The interval integrated first.
    #[must_use]
    pub fn inner(&self) -> &Interval {
        &self.inner
    }

    /// The interval integrated last.
    #[must_use]
    pub fn outer(&self) -> &Interval {
        &self.outer
    }

    /// True when the inner limits are both numbers.
    #[must_use]
    pub fn is_rectangular(&self) -> bool {
        self.inner.numeric().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_bound_text_folds_to_number() {
        let b = Bound::parse("pi/2").unwrap();
        assert!((b.as_number().unwrap() - std::f64::consts::FRAC_PI_2).abs() < 1e-15);
        assert!(Bound::parse("x**2").unwrap().as_number().is_none());
    }

    #[test]
    fn test_problem_rejects_stray_symbols() {
        assert!(matches!(
            Problem::parse("x*z", 0.0, 1.0),
            Err(QuadratureError::UnboundSymbol(s)) if s == "z"
        ));
        assert!(matches!(
            Problem::parse("x +* 1", 0.0, 1.0),
            Err(QuadratureError::UnparsableExpression { .. })
        ));
    }

    #[test]
    fn test_double_problem_modes() {
        let rect = DoubleProblem::parse("x*y", ("0", "1"), ("0", "2")).unwrap();
        assert!(rect.is_rectangular());
        let region = DoubleProblem::parse("x*y", ("x**2", "x"), ("0", "1")).unwrap();
        assert!(!region.is_rectangular());
        assert!(DoubleProblem::parse("x*y", ("y", "1"), ("0", "1")).is_err());
    }
}
