//! Simple and composite rules over a single interval.

use quadrix_core::Expression;
use quadrix_simplify::Simplifier;
use tracing::{debug, instrument};

use crate::error::Result;
use crate::estimate::{ErrorEstimator, ErrorFields};
use crate::evaluation::{Domain, Evaluation};
use crate::options::QuadratureOptions;
use crate::partitions::Partitions;
use crate::problem::{Problem, X};
use crate::rule::{Labels, Layout, Rule};
use crate::trace::{num, Step, Trace};

/// LaTeX of expressions destined for the trace, simplified if configured.
fn display_all(exprs: &[Expression], options: &QuadratureOptions) -> Vec<String> {
    if !options.simplify_trace {
        return exprs.iter().map(Expression::to_latex).collect();
    }
    let simplifier = Simplifier::with_config(options.simplifier.clone());
    exprs
        .iter()
        .map(|e| simplifier.simplify(e).to_latex())
        .collect()
}

/// The simple rule: one panel, fixed node count.
///
/// # Errors
///
/// Fails if the integrand or one of its derivatives cannot be evaluated.
#[instrument(level = "debug", skip_all, fields(rule = %rule, a = problem.a(), b = problem.b()))]
pub fn simple(rule: Rule, problem: &Problem, options: &QuadratureOptions) -> Result<Evaluation> {
    let (a, b) = (problem.a(), problem.b());
    let layout = rule.layout(a, b, Partitions::ONE);
    let labels = Labels::SINGLE;
    let mut trace = Trace::new();

    if rule != Rule::Trapezoidal {
        let k = rule.panel_width();
        trace.push(Step::new(
            "Compute h",
            format!("h = \\frac{{b - a}}{{{k}}}"),
            format!(
                "h = \\frac{{{} - {}}}{{{k}}} = {}",
                num(b),
                num(a),
                num(layout.h)
            ),
        ));
        trace.push(layout.nodes_step(&labels));
    }

    let sampled = layout.sample(|t| problem.f(t))?;
    for step in layout.sample_steps(&labels, &sampled) {
        trace.push(step);
    }
    trace.push(layout.formula_step(&labels, &sampled, None, &sampled.value));
    debug!(value = sampled.value, "simple rule");

    let errors = if options.compute_errors {
        let fields = ErrorEstimator::new(problem.expr(), X, a, b, options).simple(rule)?;
        trace.push(fields.step());
        fields
    } else {
        ErrorFields::default()
    };

    Ok(Evaluation {
        method: rule.name().to_string(),
        value: sampled.value,
        errors,
        trace,
        expr: problem.expr().clone(),
        domain: Domain::Single { a, b },
    })
}

/// The composite rule with `n` panels.
///
/// Simpson 1/3 adds the correction `R_t = -(h⁵/90)·f⁗((a+b)/2)` when the
/// integrand is a polynomial of degree above three.
///
/// # Errors
///
/// Fails if the integrand or one of its derivatives cannot be evaluated.
#[instrument(level = "debug", skip_all, fields(rule = %rule, n = n.get(), a = problem.a(), b = problem.b()))]
pub fn composite(
    rule: Rule,
    problem: &Problem,
    n: Partitions,
    options: &QuadratureOptions,
) -> Result<Evaluation> {
    let (a, b) = (problem.a(), problem.b());
    let layout = rule.layout(a, b, n);
    let labels = Labels::SINGLE;
    let mut trace = Trace::new();
    trace.push(layout.h_step(&labels));
    trace.push(layout.nodes_step(&labels));
    debug!(h = layout.h, nodes = layout.nodes.len(), "layout");

    let correction = if rule == Rule::Simpson13 {
        simpson_correction(problem, &layout, options, &mut trace)?
    } else {
        None
    };

    let sampled = layout.sample(|t| problem.f(t))?;
    for step in layout.sample_steps(&labels, &sampled) {
        trace.push(step);
    }
    let value = sampled.value + correction.unwrap_or(0.0);
    trace.push(layout.formula_step(&labels, &sampled, correction, &value));

    let errors = if options.compute_errors {
        let fields =
            ErrorEstimator::new(problem.expr(), X, a, b, options).composite(rule, n, layout.h)?;
        trace.push(fields.step());
        fields
    } else {
        ErrorFields::default()
    };

    Ok(Evaluation {
        method: format!("Composite {}", rule.name()),
        value,
        errors,
        trace,
        expr: problem.expr().clone(),
        domain: Domain::Single { a, b },
    })
}

/// Records the first four derivatives and, for polynomials of degree above
/// three, the correction term.
fn simpson_correction(
    problem: &Problem,
    layout: &Layout,
    options: &QuadratureOptions,
    trace: &mut Trace,
) -> Result<Option<f64>> {
    let mut derivatives = Vec::with_capacity(4);
    let mut current = problem.expr().clone();
    for _ in 0..4 {
        current = current.derivative(X);
        derivatives.push(current.clone());
    }
    let shown = display_all(&derivatives, options);
    let formula: Vec<String> = ["i", "ii", "iii", "iv"]
        .iter()
        .zip(&shown)
        .map(|(roman, d)| format!("f^{{({roman})}}(x) = {d}"))
        .collect();
    trace.push(Step::new(
        "Differentiate f four times",
        formula.join(", \\ "),
        "",
    ));

    let degree = match problem.expr().degree(X) {
        Ok(d) => d,
        Err(e) => {
            debug!(error = %e, "no correction term");
            return Ok(None);
        }
    };
    if degree <= 3 {
        return Ok(None);
    }
    let p = (layout.a + layout.b) / 2.0;
    let d4 = current.eval_at(X, p)?;
    let k = layout.h.powi(5) / 90.0;
    let rt = -k * d4;
    debug!(degree, rt, "correction term");
    trace.push(Step::new(
        "Compute R_t",
        format!(
            "f \\text{{ is a polynomial of degree }} {degree}: \\ R_t = -\\frac{{h^5}}{{90}} \\cdot f^{{(iv)}}(p), \\ p = \\frac{{a + b}}{{2}}"
        ),
        format!(
            "R_t = -\\frac{{{}^5}}{{90}} \\cdot f^{{(iv)}}({}) = -{} \\cdot {} = {}",
            num(layout.h),
            num(p),
            num(k),
            num(d4),
            num(rt)
        ),
    ));
    Ok(Some(rt))
}
