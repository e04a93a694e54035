//! Reference values of definite and iterated integrals.
//!
//! Polynomials integrate exactly by the power rule. Everything else goes to
//! adaptive Gauss-Kronrod, which for the smooth integrands quadrature rules
//! are applied to agrees with the closed form to near machine precision.

use quadrix_core::Expression;
use tracing::{debug, instrument, warn};

use crate::error::CalculusError;
use crate::numerical::adaptive_integrate;
use crate::options::ExactOptions;

/// How a reference value was obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Via {
    /// Antiderivative of a polynomial, evaluated at the bounds.
    PowerRule,
    /// Adaptive G7K15 over the given number of subintervals.
    GaussKronrod {
        /// Subintervals in the final partition.
        intervals: usize,
        /// Whether the tolerance was met.
        converged: bool,
    },
}

/// A reference integral.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExactValue {
    /// The integral.
    pub value: f64,
    /// Estimated absolute error; zero for the power rule.
    pub error: f64,
    /// Which path produced the value.
    pub via: Via,
}

/// Region of an iterated integral `∫_c^d ∫_{lo(t)}^{hi(t)} f dv dt`.
#[derive(Clone, Copy, Debug)]
pub struct Region<'a> {
    /// Variable of the inner integral.
    pub inner_var: &'a str,
    /// Inner limits; may mention the outer variable.
    pub inner: (&'a Expression, &'a Expression),
    /// Variable of the outer integral.
    pub outer_var: &'a str,
    /// Numeric outer limits.
    pub outer: (f64, f64),
}

fn check_symbols(expr: &Expression, allowed: &[&str]) -> Result<(), CalculusError> {
    match expr
        .free_symbols()
        .into_iter()
        .find(|s| !allowed.contains(&s.as_str()))
    {
        Some(symbol) => Err(CalculusError::FreeSymbol { symbol }),
        None => Ok(()),
    }
}

/// `∫_lo^hi expr d(var)`.
///
/// # Errors
///
/// Returns [`CalculusError::FreeSymbol`] if `expr` mentions any variable
/// besides `var`.
#[instrument(level = "debug", skip_all, fields(var = var, lo = lo, hi = hi))]
pub fn definite_integral(
    expr: &Expression,
    var: &str,
    lo: f64,
    hi: f64,
    opts: &ExactOptions,
) -> Result<ExactValue, CalculusError> {
    check_symbols(expr, &[var])?;

    if let Some(poly) = expr.as_polynomial(var) {
        debug!(degree = poly.degree(), "power rule");
        return Ok(ExactValue {
            value: poly.integrate(lo, hi),
            error: 0.0,
            via: Via::PowerRule,
        });
    }

    let f = |x: f64| expr.eval_at(var, x).unwrap_or(f64::NAN);
    let r = adaptive_integrate(
        &f,
        lo,
        hi,
        opts.tolerance,
        opts.tolerance,
        opts.max_subdivisions,
    );
    if !r.converged {
        warn!(
            error = r.error,
            intervals = r.intervals,
            "reference integral did not reach tolerance"
        );
    }
    Ok(ExactValue {
        value: r.value,
        error: r.error,
        via: Via::GaussKronrod {
            intervals: r.intervals,
            converged: r.converged,
        },
    })
}

/// `∫_c^d ∫_{lo(t)}^{hi(t)} f dv dt` over a [`Region`].
///
/// The inner integral is taken with [`definite_integral`] at every outer
/// node, so polynomial inner integrands are exact.
///
/// # Errors
///
/// Returns [`CalculusError::FreeSymbol`] if `f` mentions a variable other
/// than the two integration variables, or a limit mentions anything but the
/// outer variable.
#[instrument(level = "debug", skip_all, fields(outer = ?region.outer))]
pub fn iterated_integral(
    f: &Expression,
    region: &Region<'_>,
    opts: &ExactOptions,
) -> Result<ExactValue, CalculusError> {
    check_symbols(f, &[region.inner_var, region.outer_var])?;
    check_symbols(region.inner.0, &[region.outer_var])?;
    check_symbols(region.inner.1, &[region.outer_var])?;

    let slice = |t: f64| -> Result<f64, CalculusError> {
        let lo = region.inner.0.eval_at(region.outer_var, t)?;
        let hi = region.inner.1.eval_at(region.outer_var, t)?;
        let g = f.substitute(region.outer_var, t);
        Ok(definite_integral(&g, region.inner_var, lo, hi, opts)?.value)
    };
    let outer = |t: f64| slice(t).unwrap_or(f64::NAN);

    let (c, d) = region.outer;
    let r = adaptive_integrate(
        &outer,
        c,
        d,
        opts.tolerance,
        opts.tolerance,
        opts.max_subdivisions,
    );
    if !r.converged {
        warn!(error = r.error, "iterated integral did not reach tolerance");
    }
    Ok(ExactValue {
        value: r.value,
        error: r.error,
        via: Via::GaussKronrod {
            intervals: r.intervals,
            converged: r.converged,
        },
    })
}
