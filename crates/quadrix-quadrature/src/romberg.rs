//! Richardson extrapolation over composite estimates.

use tracing::{debug, instrument};

use crate::error::{QuadratureError, Result};
use crate::estimate::ErrorFields;
use crate::evaluation::{Domain, Evaluation};
use crate::options::QuadratureOptions;
use crate::partitions::Partitions;
use crate::problem::Problem;
use crate::rule::Rule;
use crate::single::composite;
use crate::trace::{nums, Step, Trace};

/// Panel counts of the base estimates for an even `order`: `1` followed by
/// `2, 4, …, order - 2`.
#[must_use]
pub fn base_panels(order: usize) -> Vec<usize> {
    let levels = order / 2;
    let mut out = vec![1];
    out.extend((1..levels).map(|k| 2 * k));
    out
}

/// Romberg extrapolation of order `O(h^order)` built on the composite `rule`.
///
/// Level `i` (for `i = 4, 6, …, order`) combines neighbouring estimates as
/// `(4^m·R[k+1] - R[k]) / (4^m - 1)` with `m = (i - 2) / 2`; one value
/// remains after the last level. Error fields are left unset.
///
/// # Errors
///
/// * [`QuadratureError::OddOrderRequested`] for an odd `order`.
/// * [`QuadratureError::InvalidRombergOrder`] for `order < 2`.
/// * Anything a base estimate raises.
#[instrument(level = "debug", skip_all, fields(rule = %rule, order = order))]
pub fn romberg(
    rule: Rule,
    problem: &Problem,
    order: usize,
    options: &QuadratureOptions,
) -> Result<Evaluation> {
    if order % 2 != 0 {
        return Err(QuadratureError::OddOrderRequested(order));
    }
    if order < 2 {
        return Err(QuadratureError::InvalidRombergOrder(order));
    }

    let nested = options.without_errors();
    let mut trace = Trace::new();
    let panels = base_panels(order);
    let mut row = Vec::with_capacity(panels.len());
    for &p in &panels {
        let ev = composite(rule, problem, Partitions::new(p)?, &nested)?;
        row.push(ev.value);
        trace.append(ev.trace);
    }
    debug!(?panels, ?row, "base estimates");
    trace.push(Step::new(
        "Base estimates",
        format!("R_{{2}} = [{}]", panels_latex(&panels)),
        format!("R_{{2}} = {}", nums(&row)),
    ));

    for i in (4..=order).step_by(2) {
        let m = (i - 2) / 2;
        let factor = 4f64.powi(i32::try_from(m).unwrap_or(i32::MAX));
        row = row
            .windows(2)
            .map(|w| (factor * w[1] - w[0]) / (factor - 1.0))
            .collect();
        debug!(level = i, ?row, "extrapolated");
        trace.push(Step::new(
            format!("Extrapolate to O(h^{i})"),
            format!(
                "R_{{{i}}}[k] = \\frac{{4^{{{m}}} \\cdot R_{{{prev}}}[k+1] - R_{{{prev}}}[k]}}{{4^{{{m}}} - 1}}",
                prev = i - 2
            ),
            format!("R_{{{i}}} = {}", nums(&row)),
        ));
    }

    let value = row.first().copied().unwrap_or(f64::NAN);
    Ok(Evaluation {
        method: format!("Romberg Composite {} O(h^{order})", rule.name()),
        value,
        errors: ErrorFields::default(),
        trace,
        expr: problem.expr().clone(),
        domain: Domain::Single {
            a: problem.a(),
            b: problem.b(),
        },
    })
}

fn panels_latex(panels: &[usize]) -> String {
    panels
        .iter()
        .map(|p| format!("S(n = {p})"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;

    fn quiet() -> QuadratureOptions {
        QuadratureOptions::default()
            .with_errors(false)
            .with_simplify_trace(false)
    }

    fn sine() -> Problem {
        Problem::parse("sin(x)", 0.0, PI).unwrap()
    }

    #[test]
    fn test_base_panels() {
        assert_eq!(base_panels(2), vec![1]);
        assert_eq!(base_panels(4), vec![1, 2]);
        assert_eq!(base_panels(8), vec![1, 2, 4, 6]);
    }

    #[test]
    fn test_order_validation() {
        assert_eq!(
            romberg(Rule::Trapezoidal, &sine(), 5, &quiet()).unwrap_err(),
            QuadratureError::OddOrderRequested(5)
        );
        assert_eq!(
            romberg(Rule::Trapezoidal, &sine(), 0, &quiet()).unwrap_err(),
            QuadratureError::InvalidRombergOrder(0)
        );
        assert_eq!(
            romberg(Rule::Trapezoidal, &sine(), 1, &quiet()).unwrap_err(),
            QuadratureError::OddOrderRequested(1)
        );
    }

    #[test]
    fn test_order_two_is_the_single_panel_rule() {
        let pr = sine();
        let r = romberg(Rule::Simpson13, &pr, 2, &quiet()).unwrap();
        let c = composite(Rule::Simpson13, &pr, Partitions::ONE, &quiet()).unwrap();
        assert_eq!(r.value, c.value);
        assert_eq!(r.method, "Romberg Composite Simpson 1/3 O(h^2)");
    }

    #[test]
    fn test_known_values() {
        let r4 = romberg(Rule::Trapezoidal, &sine(), 4, &quiet()).unwrap();
        assert!((r4.value - 2.0 * PI / 3.0).abs() < 1e-12);
        let r6 = romberg(Rule::Trapezoidal, &sine(), 6, &quiet()).unwrap();
        assert!((r6.value - 2.0).abs() < 2e-3);
    }

    #[test]
    fn test_beats_its_base() {
        let pr = sine();
        let base = composite(Rule::Trapezoidal, &pr, Partitions::new(2).unwrap(), &quiet())
            .unwrap()
            .value;
        let r = romberg(Rule::Trapezoidal, &pr, 4, &quiet()).unwrap().value;
        assert!((r - 2.0).abs() < (base - 2.0).abs());
    }

    #[test]
    fn test_errors_are_reset_and_traces_appended() {
        let pr = Problem::parse("x**3", 0.0, 1.0).unwrap();
        let r = romberg(Rule::Trapezoidal, &pr, 4, &QuadratureOptions::default()).unwrap();
        assert!(r.errors.is_empty());
        let titles: Vec<&str> = r.trace.steps().iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles.iter().filter(|t| **t == "Apply the formula").count(), 2);
        assert_eq!(titles[titles.len() - 2], "Base estimates");
        assert_eq!(titles[titles.len() - 1], "Extrapolate to O(h^4)");
    }
}
