//! A stateful convenience wrapper over the pure methods.
//!
//! A session holds one integrand and its intervals. Each method call
//! replaces the current result and appends its steps to the session trace;
//! the trace is never reordered or pruned.

use quadrix_core::Expression;
use tracing::debug;

use crate::error::{QuadratureError, Result};
use crate::estimate::{ErrorFields, ErrorKind, ErrorReport};
use crate::evaluation::Evaluation;
use crate::method::{evaluate, Integral, Method};
use crate::options::QuadratureOptions;
use crate::partitions::Partitions;
use crate::problem::{parse_expression, DoubleProblem, Interval, Problem};
use crate::rule::Rule;
use crate::trace::Trace;

/// An integrand, its intervals, the latest result and the accumulated trace.
#[derive(Clone, Debug)]
pub struct IntegrationSession {
    expr: Expression,
    interval: Interval,
    second_interval: Option<Interval>,
    options: QuadratureOptions,
    current: Option<Evaluation>,
    trace: Trace,
}

impl IntegrationSession {
    /// Creates a session with default options.
    #[must_use]
    pub fn new(expr: Expression, interval: impl Into<Interval>) -> Self {
        Self {
            expr,
            interval: interval.into(),
            second_interval: None,
            options: QuadratureOptions::default(),
            current: None,
            trace: Trace::new(),
        }
    }

    /// Parses the function and interval text.
    ///
    /// # Errors
    ///
    /// Returns [`QuadratureError::UnparsableExpression`] for malformed text.
    pub fn parse(function: &str, lower: &str, upper: &str) -> Result<Self> {
        Ok(Self::new(
            parse_expression(function)?,
            Interval::parse(lower, upper)?,
        ))
    }

    /// Replaces the options.
    #[must_use]
    pub fn with_options(mut self, options: QuadratureOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the interval integrated last by double methods.
    pub fn set_second_interval(&mut self, interval: impl Into<Interval>) {
        self.second_interval = Some(interval.into());
    }

    /// The integrand.
    #[must_use]
    pub fn expr(&self) -> &Expression {
        &self.expr
    }

    /// The first interval.
    #[must_use]
    pub fn interval(&self) -> &Interval {
        &self.interval
    }

    /// The second interval, once a double method has been set up.
    #[must_use]
    pub fn second_interval(&self) -> Option<&Interval> {
        self.second_interval.as_ref()
    }

    /// The options.
    #[must_use]
    pub fn options(&self) -> &QuadratureOptions {
        &self.options
    }

    /// The simple rule.
    ///
    /// # Errors
    ///
    /// Fails if the interval is not numeric or the integrand mentions a
    /// variable other than `x`.
    pub fn simple(&mut self, rule: Rule) -> Result<&Evaluation> {
        self.run(Method::Simple { rule })
    }

    /// The composite rule. `n` may be any integer type or an integral `f64`.
    ///
    /// # Errors
    ///
    /// Returns [`QuadratureError::InvalidPartitionCount`] for a count that is
    /// not a positive integer, and fails as [`Self::simple`] does.
    pub fn composite<N>(&mut self, rule: Rule, n: N) -> Result<&Evaluation>
    where
        N: TryInto<Partitions, Error = QuadratureError>,
    {
        let partitions = n.try_into()?;
        self.run(Method::Composite { rule, partitions })
    }

    /// A double integral with `outer` as the interval integrated last.
    ///
    /// # Errors
    ///
    /// Fails on malformed bound text, an invalid count, or as
    /// [`double`](crate::double()) does.
    pub fn double<N>(&mut self, rule: Rule, outer: (&str, &str), n: N) -> Result<&Evaluation>
    where
        N: TryInto<Partitions, Error = QuadratureError>,
    {
        let partitions = n.try_into()?;
        let outer = Interval::parse(outer.0, outer.1)?;
        let problem = DoubleProblem::new(self.expr.clone(), self.interval.clone(), outer.clone())?;
        let ev = evaluate(&problem.into(), Method::Double { rule, partitions }, &self.options)?;
        self.second_interval = Some(outer);
        Ok(self.record(ev))
    }

    /// Romberg extrapolation of the given even order.
    ///
    /// # Errors
    ///
    /// Fails as [`romberg`](crate::romberg()) does.
    pub fn romberg(&mut self, rule: Rule, order: usize) -> Result<&Evaluation> {
        self.run(Method::Romberg { rule, order })
    }

    /// Runs `method`, makes its result current and appends its trace.
    ///
    /// # Errors
    ///
    /// * [`QuadratureError::InvalidDomain`] for a double method without a
    ///   second interval, or a one-dimensional method over symbolic bounds.
    /// * Anything the method raises. The session is unchanged on error.
    pub fn run(&mut self, method: Method) -> Result<&Evaluation> {
        let integral = self.integral(method)?;
        let ev = evaluate(&integral, method, &self.options)?;
        Ok(self.record(ev))
    }

    fn record(&mut self, ev: Evaluation) -> &Evaluation {
        debug!(method = %ev.method, value = ev.value, steps = ev.trace.len(), "session result");
        self.trace.append(ev.trace.clone());
        self.current.insert(ev)
    }

    fn integral(&self, method: Method) -> Result<Integral> {
        if method.is_double() {
            let outer = self.second_interval.clone().ok_or_else(|| {
                QuadratureError::InvalidDomain("no second interval set".to_string())
            })?;
            return Ok(DoubleProblem::new(self.expr.clone(), self.interval.clone(), outer)?.into());
        }
        let (a, b) = self.interval.require_numeric("integration")?;
        Ok(Problem::new(self.expr.clone(), a, b)?.into())
    }

    /// The latest result.
    #[must_use]
    pub fn current(&self) -> Option<&Evaluation> {
        self.current.as_ref()
    }

    /// The latest approximation.
    #[must_use]
    pub fn solution(&self) -> Option<f64> {
        self.current.as_ref().map(|e| e.value)
    }

    /// The latest method name.
    #[must_use]
    pub fn method_name(&self) -> Option<&str> {
        self.current.as_ref().map(|e| e.method.as_str())
    }

    /// The latest error fields.
    #[must_use]
    pub fn error_fields(&self) -> Option<&ErrorFields> {
        self.current.as_ref().map(|e| &e.errors)
    }

    /// Every step recorded so far.
    #[must_use]
    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    /// Every error quantity of the latest result. True and relative errors
    /// are recomputed against the exact value over the full domain and
    /// stored.
    ///
    /// # Errors
    ///
    /// * [`QuadratureError::NoSolution`] before any method has run.
    /// * Anything the exact integral raises.
    pub fn errors(&mut self) -> Result<ErrorReport> {
        let ev = self.current.as_mut().ok_or(QuadratureError::NoSolution)?;
        let report = ev.report(&self.options.exact)?;
        ev.errors.true_error = report.get(ErrorKind::True);
        ev.errors.relative = report.get(ErrorKind::Relative);
        Ok(report)
    }

    /// One error quantity by name, e.g. `"verdadero"` or `"bound"`.
    ///
    /// True and relative errors are recomputed against the single integral
    /// in `x` over the first interval, even after a double method, and
    /// stored.
    ///
    /// # Errors
    ///
    /// * [`QuadratureError::UnknownErrorKind`] for an unknown name.
    /// * [`QuadratureError::NoSolution`] before any method has run.
    /// * Anything the exact integral raises.
    pub fn error(&mut self, name: &str) -> Result<Option<f64>> {
        let kind: ErrorKind = name.parse()?;
        let ev = self.current.as_mut().ok_or(QuadratureError::NoSolution)?;
        let value = ev.error(kind, &self.options.exact)?;
        if matches!(kind, ErrorKind::True | ErrorKind::Relative) {
            ev.errors.set(kind, value);
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(f: &str, a: &str, b: &str) -> IntegrationSession {
        IntegrationSession::parse(f, a, b)
            .unwrap()
            .with_options(QuadratureOptions::default().with_simplify_trace(false))
    }

    #[test]
    fn test_results_overwrite_and_traces_accumulate() {
        let mut s = session("x**2", "0", "1");
        let first = s.composite(Rule::Trapezoidal, 2).unwrap().trace.len();
        assert_eq!(s.method_name(), Some("Composite Trapezoidal"));
        let second = s.simple(Rule::Simpson13).unwrap().trace.len();
        assert_eq!(s.method_name(), Some("Simpson 1/3"));
        assert!((s.solution().unwrap() - 1.0 / 3.0).abs() < 1e-15);
        assert_eq!(s.trace().len(), first + second);
    }

    #[test]
    fn test_invalid_partition_counts() {
        let mut s = session("x", "0", "1");
        for bad in [0_i64, -1] {
            assert!(matches!(
                s.composite(Rule::Trapezoidal, bad),
                Err(QuadratureError::InvalidPartitionCount(_))
            ));
        }
        assert!(matches!(
            s.composite(Rule::Trapezoidal, 2.5),
            Err(QuadratureError::InvalidPartitionCount(_))
        ));
        assert!(s.current().is_none());
        assert!(s.trace().is_empty());
        assert!(s.composite(Rule::Trapezoidal, 3.0).is_ok());
    }

    #[test]
    fn test_errors_before_any_method() {
        let mut s = session("x", "0", "1");
        assert_eq!(s.errors().unwrap_err(), QuadratureError::NoSolution);
        assert_eq!(s.error("total").unwrap_err(), QuadratureError::NoSolution);
        assert!(matches!(
            s.error("nonsense"),
            Err(QuadratureError::UnknownErrorKind(_))
        ));
    }

    #[test]
    fn test_true_error_is_exact_minus_solution() {
        let mut s = session("exp(x)", "0", "1");
        let value = s.composite(Rule::Trapezoidal, 4).unwrap().value;
        let exact = std::f64::consts::E - 1.0;
        let report = s.errors().unwrap();
        assert!((report.exact() - exact).abs() < 1e-12);
        assert!((report.get(ErrorKind::True).unwrap() - (exact - value)).abs() < 1e-12);
        let relative = (1.0 - value / exact) * 100.0;
        assert!((report.get(ErrorKind::Relative).unwrap() - relative).abs() < 1e-9);
        assert_eq!(s.error_fields().unwrap().true_error, report.get(ErrorKind::True));
        let t = s.error("verdadero").unwrap().unwrap();
        assert!((t - (exact - value)).abs() < 1e-12);
    }

    #[test]
    fn test_named_errors_read_stored_fields() {
        let mut s = session("x**3", "0", "2");
        s.composite(Rule::Trapezoidal, 2).unwrap();
        assert_eq!(s.error("Cota").unwrap(), s.error_fields().unwrap().bound);
        assert_eq!(s.error("estimado").unwrap(), None);
    }

    #[test]
    fn test_double_in_session() {
        let mut s = session("x*y", "0", "1");
        let ev = s.double(Rule::Trapezoidal, ("0", "1"), 2).unwrap();
        assert!((ev.value - 0.25).abs() < 1e-12);
        let report = s.errors().unwrap();
        assert!((report.exact() - 0.25).abs() < 1e-12);
        // The one-dimensional reference cannot bind y.
        assert!(matches!(
            s.error("verdadero"),
            Err(QuadratureError::UnboundSymbol(y)) if y == "y"
        ));
    }

    #[test]
    fn test_failed_double_leaves_session_untouched() {
        let mut s = session("x*y", "0", "1");
        s.composite(Rule::Trapezoidal, 2).unwrap();
        let steps = s.trace().len();
        assert!(matches!(
            s.double(Rule::Trapezoidal, ("0", "x"), 2),
            Err(QuadratureError::InvalidDomain(_))
        ));
        assert!(s.second_interval().is_none());
        assert_eq!(s.trace().len(), steps);
        assert_eq!(s.method_name(), Some("Composite Trapezoidal"));

        s.double(Rule::Trapezoidal, ("0", "1"), 2).unwrap();
        assert!(s.double(Rule::Trapezoidal, ("0", "y"), 2).is_err());
        assert_eq!(s.second_interval().and_then(Interval::numeric), Some((0.0, 1.0)));
    }

    #[test]
    fn test_one_dimensional_methods_need_numeric_bounds() {
        let mut s = session("x", "0", "x");
        assert!(matches!(
            s.simple(Rule::Trapezoidal),
            Err(QuadratureError::InvalidDomain(_))
        ));
        assert!(matches!(
            s.run(Method::Double {
                rule: Rule::Trapezoidal,
                partitions: Partitions::ONE
            }),
            Err(QuadratureError::InvalidDomain(_))
        ));
    }

    #[test]
    fn test_romberg_resets_errors() {
        let mut s = session("sin(x)", "0", "pi");
        s.composite(Rule::Trapezoidal, 2).unwrap();
        assert!(s.error_fields().unwrap().total.is_some());
        s.romberg(Rule::Trapezoidal, 4).unwrap();
        assert!(s.error_fields().unwrap().is_empty());
        assert_eq!(s.method_name(), Some("Romberg Composite Trapezoidal O(h^4)"));
        assert!(matches!(
            s.romberg(Rule::Trapezoidal, 3),
            Err(QuadratureError::OddOrderRequested(3))
        ));
    }
}
