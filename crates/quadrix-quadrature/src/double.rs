//! Double integrals over rectangles and over regions with variable limits.
//!
//! A rectangle applies the composite rule twice: first in `x` with `y` kept
//! symbolic, which yields `g(y)`, then in `y` over the outer interval. A
//! region `y ∈ [a(x), b(x)]` instead runs a fresh one-dimensional
//! evaluation at every outer node and combines the results with the outer
//! weights; each of those traces is kept as the children of the step that
//! used it.

use quadrix_core::Expression;
use quadrix_simplify::Simplifier;
use tracing::{debug, instrument};

use crate::error::Result;
use crate::estimate::{ErrorEstimator, ErrorFields};
use crate::evaluation::{Domain, Evaluation};
use crate::options::QuadratureOptions;
use crate::partitions::Partitions;
use crate::problem::{DoubleProblem, Problem, X, Y};
use crate::rule::{Labels, Rule};
use crate::single::composite;
use crate::trace::{num, Step, Trace};

const INNER_X: Labels = Labels {
    f: "f",
    var: "x",
    lo: "a",
    hi: "b",
    h: "h_x",
    extra: ", y",
};

const OUTER_Y: Labels = Labels {
    f: "g",
    var: "y",
    lo: "c",
    hi: "d",
    h: "h_y",
    extra: "",
};

const OUTER_X: Labels = Labels {
    f: "G",
    var: "x",
    lo: "c",
    hi: "d",
    h: "h",
    extra: "",
};

/// The composite rule with `n` panels applied in both directions.
///
/// # Errors
///
/// * [`QuadratureError::InvalidDomain`](crate::QuadratureError::InvalidDomain)
///   if the outer interval is not numeric.
/// * Anything a nested evaluation raises.
#[instrument(level = "debug", skip_all, fields(rule = %rule, n = n.get(), rectangular = problem.is_rectangular()))]
pub fn double(
    rule: Rule,
    problem: &DoubleProblem,
    n: Partitions,
    options: &QuadratureOptions,
) -> Result<Evaluation> {
    let outer = problem.outer().require_numeric("outer")?;
    match problem.inner().numeric() {
        Some(inner) => rectangular(rule, problem.expr(), inner, outer, n, options),
        None => {
            let inner = (
                problem.inner().lower.to_expression(),
                problem.inner().upper.to_expression(),
            );
            variable_limit(rule, problem.expr(), inner, outer, n, options)
        }
    }
}

fn rectangular(
    rule: Rule,
    f: &Expression,
    (a, b): (f64, f64),
    (c, d): (f64, f64),
    n: Partitions,
    options: &QuadratureOptions,
) -> Result<Evaluation> {
    let mut trace = Trace::new();

    let inner = rule.layout(a, b, n);
    trace.push(inner.h_step(&INNER_X));
    trace.push(inner.nodes_step(&INNER_X));
    let sx = inner.sample(|t| Ok(f.substitute(X, t)))?;
    for step in inner.sample_steps(&INNER_X, &sx) {
        trace.push(step);
    }
    let g = sx.value.clone();
    let shown = if options.simplify_trace {
        Simplifier::with_config(options.simplifier.clone()).simplify(&g)
    } else {
        g.clone()
    };
    let mut step = inner.formula_step(&INNER_X, &sx, None, &shown);
    step.title = "Apply the formula in x".to_string();
    step.formula = format!("g(y) = {}", step.formula);
    trace.push(step);
    debug!(g = %shown, "inner stage");

    let outer = rule.layout(c, d, n);
    trace.push(outer.h_step(&OUTER_Y));
    trace.push(outer.nodes_step(&OUTER_Y));
    let sy = outer.sample(|t| Ok(g.eval_at(Y, t)?))?;
    for step in outer.sample_steps(&OUTER_Y, &sy) {
        trace.push(step);
    }
    let mut step = outer.formula_step(&OUTER_Y, &sy, None, &sy.value);
    step.title = "Apply the formula in y".to_string();
    trace.push(step);

    let errors = if options.compute_errors && rule == Rule::Trapezoidal {
        let h = outer.h;
        let fields = ErrorEstimator::new(&g, Y, c, d, options).composite(rule, n, h)?;
        trace.push(fields.step());
        fields
    } else {
        ErrorFields::default()
    };

    Ok(Evaluation {
        method: format!("Composite {}, double rectangular", rule.name()),
        value: sy.value,
        errors,
        trace,
        expr: f.clone(),
        domain: Domain::Rectangular {
            inner: (a, b),
            outer: (c, d),
        },
    })
}

fn variable_limit(
    rule: Rule,
    f: &Expression,
    (lo, hi): (Expression, Expression),
    (c, d): (f64, f64),
    n: Partitions,
    options: &QuadratureOptions,
) -> Result<Evaluation> {
    let mut trace = Trace::new();
    trace.push(Step::new(
        "Define the inner integral",
        format!(
            "G(x) = \\int_{{{}}}^{{{}}} {} \\, dy",
            lo.to_latex(),
            hi.to_latex(),
            f.to_latex()
        ),
        "",
    ));

    let layout = rule.layout(c, d, n);
    trace.push(layout.h_step(&OUTER_X));
    trace.push(layout.nodes_step(&OUTER_X));

    let nested = options.without_errors();
    let mut children: Vec<Step> = Vec::with_capacity(layout.nodes.len() + 2);
    let sampled = layout.sample(|t| {
        let (y0, y1) = (lo.eval_at(X, t)?, hi.eval_at(X, t)?);
        let slice = f.substitute(X, t);
        let sub = Problem::new(slice.rename(Y, X), y0, y1)?;
        let ev = composite(rule, &sub, n, &nested)?;
        debug!(t, y0, y1, value = ev.value, "inner integral");
        children.push(
            Step::new(
                format!("Inner integral at x = {}", num(t)),
                format!(
                    "G({}) = \\int_{{{}}}^{{{}}} {} \\, dy",
                    num(t),
                    num(y0),
                    num(y1),
                    slice.to_latex()
                ),
                format!("G({}) = {}", num(t), num(ev.value)),
            )
            .with_children(ev.trace.into_steps()),
        );
        Ok(ev.value)
    })?;

    // Children arrive in sampling order: a, b, then each group.
    let mut children = children.into_iter();
    let mut counts = vec![2];
    counts.extend(sampled.groups.iter().map(Vec::len).filter(|&k| k > 0));
    for (i, step) in layout.sample_steps(&OUTER_X, &sampled).into_iter().enumerate() {
        match counts.get(i) {
            Some(&k) => trace.push(step.with_children(children.by_ref().take(k).collect())),
            None => trace.push(step),
        }
    }
    trace.push(layout.formula_step(&OUTER_X, &sampled, None, &sampled.value));

    Ok(Evaluation {
        method: format!("Composite {}, double variable-limit", rule.name()),
        value: sampled.value,
        errors: ErrorFields::default(),
        trace,
        expr: f.clone(),
        domain: Domain::VariableLimit {
            inner: (lo, hi),
            outer: (c, d),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QuadratureError;

    fn p(n: usize) -> Partitions {
        Partitions::new(n).unwrap()
    }

    fn quiet() -> QuadratureOptions {
        QuadratureOptions::default()
            .with_errors(false)
            .with_simplify_trace(false)
    }

    #[test]
    fn test_bilinear_on_unit_square() {
        let pr = DoubleProblem::parse("x*y", ("0", "1"), ("0", "1")).unwrap();
        for rule in Rule::ALL {
            let ev = double(rule, &pr, p(2), &quiet()).unwrap();
            assert!((ev.value - 0.25).abs() < 1e-12, "{rule}");
        }
    }

    #[test]
    fn test_rectangle_with_simpson() {
        let pr = DoubleProblem::parse("x**2*y", ("0", "2"), ("0", "1")).unwrap();
        let ev = double(Rule::Simpson13, &pr, p(1), &quiet()).unwrap();
        assert!((ev.value - 4.0 / 3.0).abs() < 1e-12);
        assert_eq!(ev.method, "Composite Simpson 1/3, double rectangular");
    }

    #[test]
    fn test_rectangle_errors_for_trapezoid_only() {
        let pr = DoubleProblem::parse("x*y", ("0", "1"), ("0", "1")).unwrap();
        let opts = QuadratureOptions::default();
        let trap = double(Rule::Trapezoidal, &pr, p(2), &opts).unwrap();
        // g(y) = y / 2 is linear, so every term vanishes.
        assert_eq!(trap.errors.total, Some(0.0));
        assert_eq!(trap.errors.bound, Some(0.0));
        let simpson = double(Rule::Simpson13, &pr, p(2), &opts).unwrap();
        assert!(simpson.errors.is_empty());
    }

    #[test]
    fn test_variable_limit_area() {
        // ∫₀¹ ∫₀ˣ 1 dy dx
        let pr = DoubleProblem::parse("1", ("0", "x"), ("0", "1")).unwrap();
        let ev = double(Rule::Trapezoidal, &pr, p(3), &quiet()).unwrap();
        assert!((ev.value - 0.5).abs() < 1e-12);
        assert!(ev.errors.is_empty());
    }

    #[test]
    fn test_variable_limit_simpson_is_exact_for_cubic_slices() {
        // ∫₀¹ ∫₀ˣ x·y dy dx = ∫₀¹ x³/2 dx
        let pr = DoubleProblem::parse("x*y", ("0", "x"), ("0", "1")).unwrap();
        for rule in [Rule::Simpson13, Rule::Simpson38] {
            let ev = double(rule, &pr, p(1), &quiet()).unwrap();
            assert!((ev.value - 0.125).abs() < 1e-12, "{rule}");
        }
    }

    #[test]
    fn test_variable_limit_children_follow_sampling_order() {
        let pr = DoubleProblem::parse("x + y", ("x**2", "x"), ("0", "1")).unwrap();
        let ev = double(Rule::Simpson13, &pr, p(1), &quiet()).unwrap();
        let steps = ev.trace.steps();
        let endpoints = steps
            .iter()
            .find(|s| s.title == "Evaluate the endpoints")
            .unwrap();
        assert_eq!(endpoints.children.len(), 2);
        assert_eq!(endpoints.children[0].title, "Inner integral at x = 0");
        assert_eq!(endpoints.children[1].title, "Inner integral at x = 1");
        assert!(!endpoints.children[0].children.is_empty());
        let s1 = steps
            .iter()
            .find(|s| s.title == "Evaluate the support points of S_1")
            .unwrap();
        assert_eq!(s1.children.len(), 1);
        assert_eq!(s1.children[0].title, "Inner integral at x = 0.5");
        let sums = steps.iter().find(|s| s.title == "Add up each group").unwrap();
        assert!(sums.children.is_empty());
    }

    #[test]
    fn test_mixed_inner_bounds_use_variable_limits() {
        let pr = DoubleProblem::parse("y", ("1", "x"), ("1", "2")).unwrap();
        let ev = double(Rule::Trapezoidal, &pr, p(1), &quiet()).unwrap();
        assert!(matches!(ev.domain, Domain::VariableLimit { .. }));
    }

    #[test]
    fn test_symbolic_outer_interval_is_rejected() {
        let pr = DoubleProblem::parse("x*y", ("0", "1"), ("0", "x")).unwrap();
        assert!(matches!(
            double(Rule::Trapezoidal, &pr, p(1), &quiet()),
            Err(QuadratureError::InvalidDomain(_))
        ));
    }
}
