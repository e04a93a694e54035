//! Derivative-based error estimates and error reports.

use std::fmt;
use std::str::FromStr;

use quadrix_calculus::{critical_points, definite_integral};
use quadrix_core::Expression;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use tracing::debug;

use crate::error::{QuadratureError, Result};
use crate::options::QuadratureOptions;
use crate::partitions::Partitions;
use crate::rule::Rule;
use crate::trace::{num, Step};

/// A named error quantity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Truncation term evaluated at one point.
    Total,
    /// `exact - solution`.
    True,
    /// `(1 - solution / exact) · 100`.
    Relative,
    /// Truncation term with the derivative averaged by integration.
    Approximate,
    /// Truncation term with the derivative maximised (simple trapezoid).
    Estimated,
    /// Truncation term with the derivative maximised.
    Bound,
}

/// Accepted names, lowercase.
const KIND_NAMES: [(&str, ErrorKind); 12] = [
    ("total", ErrorKind::Total),
    ("verdadero", ErrorKind::True),
    ("true", ErrorKind::True),
    ("relativo", ErrorKind::Relative),
    ("relative", ErrorKind::Relative),
    ("aproximado", ErrorKind::Approximate),
    ("approximate", ErrorKind::Approximate),
    ("estimado", ErrorKind::Estimated),
    ("estimated", ErrorKind::Estimated),
    ("cota", ErrorKind::Bound),
    ("bound", ErrorKind::Bound),
    ("error", ErrorKind::Total),
];

impl ErrorKind {
    /// Report order.
    pub const ALL: [ErrorKind; 6] = [
        ErrorKind::Total,
        ErrorKind::True,
        ErrorKind::Relative,
        ErrorKind::Approximate,
        ErrorKind::Estimated,
        ErrorKind::Bound,
    ];

    /// Report label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ErrorKind::Total => "Total",
            ErrorKind::True => "Verdadero",
            ErrorKind::Relative => "Relativo",
            ErrorKind::Approximate => "Aproximado",
            ErrorKind::Estimated => "Estimado",
            ErrorKind::Bound => "Cota",
        }
    }

    /// Looks a name up in the table, ignoring case and surrounding blanks.
    #[must_use]
    pub fn lookup(name: &str) -> Option<Self> {
        let key = name.trim().to_lowercase();
        KIND_NAMES
            .iter()
            .find(|(n, _)| *n == key)
            .map(|&(_, kind)| kind)
    }
}

impl FromStr for ErrorKind {
    type Err = QuadratureError;

    fn from_str(s: &str) -> Result<Self> {
        Self::lookup(s).ok_or_else(|| QuadratureError::UnknownErrorKind(s.to_string()))
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error quantities of one evaluation; `None` is unset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct ErrorFields {
    /// See [`ErrorKind::Total`].
    pub total: Option<f64>,
    /// See [`ErrorKind::True`].
    pub true_error: Option<f64>,
    /// See [`ErrorKind::Relative`].
    pub relative: Option<f64>,
    /// See [`ErrorKind::Approximate`].
    pub approximate: Option<f64>,
    /// See [`ErrorKind::Estimated`].
    pub estimated: Option<f64>,
    /// See [`ErrorKind::Bound`].
    pub bound: Option<f64>,
}

impl ErrorFields {
    /// The field for `kind`.
    #[must_use]
    pub fn get(&self, kind: ErrorKind) -> Option<f64> {
        match kind {
            ErrorKind::Total => self.total,
            ErrorKind::True => self.true_error,
            ErrorKind::Relative => self.relative,
            ErrorKind::Approximate => self.approximate,
            ErrorKind::Estimated => self.estimated,
            ErrorKind::Bound => self.bound,
        }
    }

    /// Sets the field for `kind`.
    pub fn set(&mut self, kind: ErrorKind, value: Option<f64>) {
        let slot = match kind {
            ErrorKind::Total => &mut self.total,
            ErrorKind::True => &mut self.true_error,
            ErrorKind::Relative => &mut self.relative,
            ErrorKind::Approximate => &mut self.approximate,
            ErrorKind::Estimated => &mut self.estimated,
            ErrorKind::Bound => &mut self.bound,
        };
        *slot = value;
    }

    /// Unsets every field.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// True if no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        ErrorKind::ALL.iter().all(|&k| self.get(k).is_none())
    }

    /// A trace step listing the set fields.
    pub(crate) fn step(&self) -> Step {
        let set: Vec<String> = ErrorKind::ALL
            .iter()
            .filter_map(|&k| self.get(k).map(|v| format!("E_{{{}}} = {}", k.label(), num(v))))
            .collect();
        Step::new("Estimate the errors", "", set.join(", \\ "))
    }
}

/// Every error quantity in report order, with the reference value used.
#[derive(Clone, Debug, PartialEq)]
pub struct ErrorReport {
    exact: f64,
    fields: ErrorFields,
}

impl ErrorReport {
    pub(crate) fn new(exact: f64, fields: ErrorFields) -> Self {
        Self { exact, fields }
    }

    /// The reference integral.
    #[must_use]
    pub fn exact(&self) -> f64 {
        self.exact
    }

    /// The value for `kind`.
    #[must_use]
    pub fn get(&self, kind: ErrorKind) -> Option<f64> {
        self.fields.get(kind)
    }

    /// The underlying fields.
    #[must_use]
    pub fn fields(&self) -> &ErrorFields {
        &self.fields
    }

    /// `(kind, value)` pairs in report order.
    pub fn iter(&self) -> impl Iterator<Item = (ErrorKind, Option<f64>)> + '_ {
        ErrorKind::ALL.iter().map(|&k| (k, self.fields.get(k)))
    }
}

impl Serialize for ErrorReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(ErrorKind::ALL.len()))?;
        for (kind, value) in self.iter() {
            map.serialize_entry(kind.label(), &value)?;
        }
        map.end()
    }
}

/// Error formulas for one integrand over `[a, b]`.
///
/// Maximum searches differentiate the integrand itself, then evaluate the
/// function they are given at the critical points found.
pub struct ErrorEstimator<'a> {
    expr: &'a Expression,
    var: &'a str,
    a: f64,
    b: f64,
    options: &'a QuadratureOptions,
}

impl<'a> ErrorEstimator<'a> {
    /// An estimator for `expr` in `var` over `[a, b]`.
    #[must_use]
    pub fn new(
        expr: &'a Expression,
        var: &'a str,
        a: f64,
        b: f64,
        options: &'a QuadratureOptions,
    ) -> Self {
        Self {
            expr,
            var,
            a,
            b,
            options,
        }
    }

    fn derivative(&self, order: usize) -> Expression {
        self.expr.nth_derivative(self.var, order)
    }

    fn at(&self, g: &Expression, x: f64) -> Result<f64> {
        Ok(g.eval_at(self.var, x)?)
    }

    fn integral(&self, g: &Expression, lo: f64, hi: f64) -> Result<f64> {
        Ok(definite_integral(g, self.var, lo, hi, &self.options.exact)?.value)
    }

    /// `max |f|` over the critical points of the `degree`-th derivative of
    /// the integrand in `[a, b]`, together with `a` and `b`.
    ///
    /// If no critical points can be found only the endpoints are used.
    ///
    /// # Errors
    ///
    /// Fails if `f` cannot be evaluated.
    pub fn maximum(&self, degree: usize, f: &Expression) -> Result<f64> {
        let g = self.derivative(degree);
        let mut candidates =
            match critical_points(&g, self.var, self.a, self.b, self.options.root_scan_cells) {
                Ok(points) => points,
                Err(e) => {
                    debug!(error = %e, degree, "no critical points, using endpoints");
                    Vec::new()
                }
            };
        candidates.push(self.a);
        candidates.push(self.b);
        let mut best = f64::NAN;
        for c in candidates {
            best = best.max(self.at(f, c)?.abs());
        }
        Ok(best)
    }

    /// Errors of the simple rule.
    ///
    /// # Errors
    ///
    /// Fails if a derivative cannot be evaluated or integrated.
    pub fn simple(&self, rule: Rule) -> Result<ErrorFields> {
        let (a, b) = (self.a, self.b);
        let w = b - a;
        let mut out = ErrorFields::default();
        match rule {
            Rule::Trapezoidal => {
                let d2 = self.derivative(2);
                let average = self.integral(&d2, a, b)? / w;
                let k = w.powi(3) / 12.0;
                out.approximate = Some(-k * average);
                out.estimated = Some(k * self.maximum(3, &d2)?);
                out.total = Some(-k * self.at(&d2, (w / 2.0).floor())?);
            }
            Rule::Simpson13 => {
                let d3 = self.derivative(3);
                let d4 = self.derivative(4);
                out.approximate = Some(self.integral(&d4, a, b)?);
                out.bound = Some(w.powi(3) / 12.0 * self.maximum(4, &d3)?);
            }
            Rule::Simpson38 => {
                let h = w / 3.0;
                let (x0, x2, x3) = (a, a + 2.0 * h, b);
                let d3 = self.derivative(3);
                let d4 = self.derivative(4);
                out.approximate =
                    Some(-(h.powi(5) / 90.0) * (self.integral(&d4, x0, x2)? / (x3 - x0)));
                out.bound = Some(((x3 - x0).powi(5) / 6480.0 * self.maximum(4, &d3)?).abs());
            }
        }
        Ok(out)
    }

    /// Errors of the composite rule with `n` panels of step `h`.
    ///
    /// # Errors
    ///
    /// Fails if a derivative cannot be evaluated or integrated.
    pub fn composite(&self, rule: Rule, n: Partitions, h: f64) -> Result<ErrorFields> {
        let (a, b) = (self.a, self.b);
        let w = b - a;
        let mid = (a + b) / 2.0;
        let mut out = ErrorFields::default();
        match rule {
            Rule::Trapezoidal => {
                let d2 = self.derivative(2);
                let k = w * h * h / 12.0;
                out.total = Some((-k * self.at(&d2, mid)?).abs());
                out.approximate = Some(-(h * h / 12.0) * self.integral(&d2, a, b)?);
                out.bound = Some(k * self.maximum(3, &d2)?);
            }
            Rule::Simpson13 | Rule::Simpson38 => {
                let d4 = self.derivative(4);
                let denom = if rule == Rule::Simpson13 { 180.0 } else { 80.0 };
                let h4 = h.powi(4);
                out.total = Some(if rule == Rule::Simpson13 {
                    #[allow(clippy::cast_precision_loss)]
                    let n4 = (n.get() as f64).powi(4);
                    -(w.powi(5) / (180.0 * n4)) * self.at(&d4, mid)?
                } else {
                    -(w / 80.0) * h4 * self.at(&d4, mid)?
                });
                out.approximate = Some(-(h4 / denom) * self.integral(&d4, a, b)?);
                out.bound = Some(w * h4 / denom * self.maximum(5, &d4)?);
            }
        }
        Ok(out)
    }
}
