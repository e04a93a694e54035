//! The simplification engine.

use std::time::Duration;

use egg::{Extractor, RecExpr, Rewrite, Runner};
use serde::{Deserialize, Serialize};
use tracing::debug;

use quadrix_core::Expression;

use crate::convert::{from_rec_expr, to_rec_expr};
use crate::cost::DisplayCost;
use crate::language::QuadLang;
use crate::rules;

/// Limits for one equality saturation run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimplifierConfig {
    /// Maximum number of iterations.
    pub iter_limit: usize,
    /// Maximum number of e-nodes.
    pub node_limit: usize,
    /// Wall-clock limit in milliseconds.
    pub time_limit_millis: u64,
}

impl Default for SimplifierConfig {
    fn default() -> Self {
        Self {
            iter_limit: 8,
            node_limit: 5_000,
            time_limit_millis: 200,
        }
    }
}

/// Equality saturation over [`QuadLang`] with constant folding on both ends.
#[derive(Clone)]
pub struct Simplifier {
    config: SimplifierConfig,
    rules: Vec<Rewrite<QuadLang, ()>>,
}

impl Default for Simplifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Simplifier {
    /// A simplifier with the default rules and limits.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SimplifierConfig::default())
    }

    /// A simplifier with the default rules and custom limits.
    #[must_use]
    pub fn with_config(config: SimplifierConfig) -> Self {
        Self {
            config,
            rules: rules::all_rules(),
        }
    }

    /// The active limits.
    #[must_use]
    pub fn config(&self) -> &SimplifierConfig {
        &self.config
    }

    /// Simplifies an expression: fold, saturate, fold.
    ///
    /// The saturated form is kept only if it renders shorter than the folded
    /// input; otherwise the folded input is returned.
    #[must_use]
    pub fn simplify(&self, expr: &Expression) -> Expression {
        let folded = Expression::from_parts(expr.arena().clone(), expr.root());
        let Some(rec) = to_rec_expr(&folded) else {
            return folded;
        };
        let best = from_rec_expr(&self.saturate(&rec));
        if best.to_string().len() < folded.to_string().len() {
            best
        } else {
            folded
        }
    }

    /// Runs equality saturation on an e-graph term and extracts the cheapest form.
    #[must_use]
    pub fn saturate(&self, expr: &RecExpr<QuadLang>) -> RecExpr<QuadLang> {
        let runner = Runner::default()
            .with_expr(expr)
            .with_iter_limit(self.config.iter_limit)
            .with_node_limit(self.config.node_limit)
            .with_time_limit(Duration::from_millis(self.config.time_limit_millis))
            .run(&self.rules);

        debug!(
            iterations = runner.iterations.len(),
            nodes = runner.egraph.total_number_of_nodes(),
            classes = runner.egraph.number_of_classes(),
            stop_reason = ?runner.stop_reason,
            "equality saturation finished"
        );

        let extractor = Extractor::new(&runner.egraph, DisplayCost);
        let (_, best) = extractor.find_best(runner.roots[0]);
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancels_trig_identity() {
        let e = Expression::parse("x*sin(y)**2 + x*cos(y)**2").unwrap();
        let s = Simplifier::new().simplify(&e);
        assert_eq!(s.to_string(), "x");
    }

    #[test]
    fn test_never_grows() {
        let e = Expression::parse("3*y**2 + 2*y + 1").unwrap();
        let s = Simplifier::new().simplify(&e);
        assert!(s.to_string().len() <= e.to_string().len());
        for y in [-1.0, 0.0, 2.5] {
            assert!((s.eval_at("y", y).unwrap() - e.eval_at("y", y).unwrap()).abs() < 1e-12);
        }
    }

    #[test]
    fn test_result_is_folded() {
        let e = Expression::parse("(2 + 3)*x + 0*y").unwrap();
        let s = Simplifier::new().simplify(&e);
        let refolded = Expression::from_parts(s.arena().clone(), s.root());
        assert_eq!(refolded.to_string(), s.to_string());
        assert!(!s.free_symbols().iter().any(|v| v == "y"));
        assert!((s.eval_at("x", 2.0).unwrap() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_custom_config_is_kept() {
        let config = SimplifierConfig::default();
        assert_eq!(Simplifier::with_config(config.clone()).config(), &config);
    }
}
