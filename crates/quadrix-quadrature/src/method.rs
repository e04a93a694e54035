//! Method dispatch and parallel batch evaluation.

use std::fmt;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::double::double;
use crate::error::{QuadratureError, Result};
use crate::evaluation::Evaluation;
use crate::options::QuadratureOptions;
use crate::partitions::Partitions;
use crate::problem::{DoubleProblem, Problem};
use crate::romberg::romberg;
use crate::rule::Rule;
use crate::single::{composite, simple};

/// A quadrature method with its parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Method {
    /// The simple rule.
    Simple {
        /// Rule family.
        rule: Rule,
    },
    /// The composite rule with `partitions` panels.
    Composite {
        /// Rule family.
        rule: Rule,
        /// Panel count.
        partitions: Partitions,
    },
    /// The composite rule in both directions of a double integral.
    Double {
        /// Rule family.
        rule: Rule,
        /// Panel count, shared by both directions.
        partitions: Partitions,
    },
    /// Romberg extrapolation over the composite rule.
    Romberg {
        /// Base rule family.
        rule: Rule,
        /// Even order `O(h^order)`.
        order: usize,
    },
}

impl Method {
    /// The rule family.
    #[must_use]
    pub fn rule(self) -> Rule {
        match self {
            Method::Simple { rule }
            | Method::Composite { rule, .. }
            | Method::Double { rule, .. }
            | Method::Romberg { rule, .. } => rule,
        }
    }

    /// True for methods over two variables.
    #[must_use]
    pub fn is_double(self) -> bool {
        matches!(self, Method::Double { .. })
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Simple { rule } => write!(f, "{rule}"),
            Method::Composite { rule, partitions } => write!(f, "Composite {rule} (n = {partitions})"),
            Method::Double { rule, partitions } => write!(f, "Double Composite {rule} (n = {partitions})"),
            Method::Romberg { rule, order } => write!(f, "Romberg Composite {rule} O(h^{order})"),
        }
    }
}

/// A single or double integral.
#[derive(Clone, Debug)]
pub enum Integral {
    /// `∫ f(x) dx`.
    Single(Problem),
    /// `∫∫ f(x, y)`.
    Double(DoubleProblem),
}

impl From<Problem> for Integral {
    fn from(p: Problem) -> Self {
        Self::Single(p)
    }
}

impl From<DoubleProblem> for Integral {
    fn from(p: DoubleProblem) -> Self {
        Self::Double(p)
    }
}

/// One unit of batch work.
#[derive(Clone, Debug)]
pub struct Request {
    /// The integral.
    pub integral: Integral,
    /// How to approximate it.
    pub method: Method,
}

impl Request {
    /// Creates a request.
    pub fn new(integral: impl Into<Integral>, method: Method) -> Self {
        Self {
            integral: integral.into(),
            method,
        }
    }
}

/// Applies `method` to `integral`.
///
/// # Errors
///
/// * [`QuadratureError::InvalidDomain`] when a double method meets a single
///   integral or the other way round.
/// * Anything the method raises.
pub fn evaluate(
    integral: &Integral,
    method: Method,
    options: &QuadratureOptions,
) -> Result<Evaluation> {
    match (integral, method) {
        (Integral::Single(p), Method::Simple { rule }) => simple(rule, p, options),
        (Integral::Single(p), Method::Composite { rule, partitions }) => {
            composite(rule, p, partitions, options)
        }
        (Integral::Single(p), Method::Romberg { rule, order }) => romberg(rule, p, order, options),
        (Integral::Double(p), Method::Double { rule, partitions }) => {
            double(rule, p, partitions, options)
        }
        (Integral::Single(_), m) => Err(QuadratureError::InvalidDomain(format!(
            "{m} needs a double integral"
        ))),
        (Integral::Double(_), m) => Err(QuadratureError::InvalidDomain(format!(
            "{m} needs a single integral"
        ))),
    }
}

/// Evaluates independent requests in parallel. Results are in input order.
#[must_use]
pub fn evaluate_batch(requests: &[Request], options: &QuadratureOptions) -> Vec<Result<Evaluation>> {
    requests
        .par_iter()
        .map(|r| evaluate(&r.integral, r.method, options))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(n: usize) -> Partitions {
        Partitions::new(n).unwrap()
    }

    #[test]
    fn test_method_json() {
        let m: Method =
            serde_json::from_str(r#"{"method": "composite", "rule": "simpson13", "partitions": 4}"#)
                .unwrap();
        assert_eq!(
            m,
            Method::Composite {
                rule: Rule::Simpson13,
                partitions: p(4)
            }
        );
        assert!(serde_json::from_str::<Method>(
            r#"{"method": "composite", "rule": "trapezoidal", "partitions": -1}"#
        )
        .is_err());
        let back = serde_json::to_string(&Method::Romberg {
            rule: Rule::Trapezoidal,
            order: 4,
        })
        .unwrap();
        assert_eq!(back, r#"{"method":"romberg","rule":"trapezoidal","order":4}"#);
    }

    #[test]
    fn test_dispatch_rejects_mismatched_dimension() {
        let single: Integral = Problem::parse("x", 0.0, 1.0).unwrap().into();
        let err = evaluate(
            &single,
            Method::Double {
                rule: Rule::Trapezoidal,
                partitions: p(1),
            },
            &QuadratureOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, QuadratureError::InvalidDomain(_)));
        let twice: Integral = DoubleProblem::parse("x*y", ("0", "1"), ("0", "1"))
            .unwrap()
            .into();
        assert!(evaluate(
            &twice,
            Method::Simple {
                rule: Rule::Trapezoidal
            },
            &QuadratureOptions::default()
        )
        .is_err());
    }

    #[test]
    fn test_batch_preserves_order() {
        let opts = QuadratureOptions::default().with_errors(false);
        let requests: Vec<Request> = (1..=8)
            .map(|n| {
                Request::new(
                    Problem::parse("x**2", 0.0, 1.0).unwrap(),
                    Method::Composite {
                        rule: Rule::Trapezoidal,
                        partitions: p(n),
                    },
                )
            })
            .collect();
        let results = evaluate_batch(&requests, &opts);
        let errors: Vec<f64> = results
            .into_iter()
            .map(|r| (r.unwrap().value - 1.0 / 3.0).abs())
            .collect();
        assert!(errors.windows(2).all(|w| w[1] < w[0]));
        let serial: Vec<f64> = requests
            .iter()
            .map(|r| evaluate(&r.integral, r.method, &opts).unwrap().value)
            .collect();
        let parallel: Vec<f64> = evaluate_batch(&requests, &opts)
            .into_iter()
            .map(|r| r.unwrap().value)
            .collect();
        assert_eq!(serial, parallel);
    }
}
