//! Evaluation settings.

use quadrix_calculus::ExactOptions;
use quadrix_simplify::SimplifierConfig;
use serde::{Deserialize, Serialize};

/// Settings shared by every quadrature method.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadratureOptions {
    /// Compute derivative-based error estimates.
    pub compute_errors: bool,
    /// Reference integral settings for true and relative errors.
    pub exact: ExactOptions,
    /// Grid cells scanned when locating critical points for error bounds.
    pub root_scan_cells: usize,
    /// Simplify symbolic intermediate results before they enter the trace.
    pub simplify_trace: bool,
    /// Limits of the trace simplifier.
    pub simplifier: SimplifierConfig,
}

impl Default for QuadratureOptions {
    fn default() -> Self {
        Self {
            compute_errors: true,
            exact: ExactOptions::default(),
            root_scan_cells: 512,
            simplify_trace: true,
            simplifier: SimplifierConfig::default(),
        }
    }
}

impl QuadratureOptions {
    /// Turns error estimation on or off.
    #[must_use]
    pub fn with_errors(mut self, on: bool) -> Self {
        self.compute_errors = on;
        self
    }

    /// Sets the reference integral settings.
    #[must_use]
    pub fn with_exact(mut self, exact: ExactOptions) -> Self {
        self.exact = exact;
        self
    }

    /// Sets the critical point scan resolution.
    #[must_use]
    pub fn with_root_scan_cells(mut self, cells: usize) -> Self {
        self.root_scan_cells = cells;
        self
    }

    /// Turns trace simplification on or off.
    #[must_use]
    pub fn with_simplify_trace(mut self, on: bool) -> Self {
        self.simplify_trace = on;
        self
    }

    /// Sets the trace simplifier limits.
    #[must_use]
    pub fn with_simplifier(mut self, config: SimplifierConfig) -> Self {
        self.simplifier = config;
        self
    }

    /// A copy with error estimation off, for nested sub-evaluations.
    pub(crate) fn without_errors(&self) -> Self {
        self.clone().with_errors(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let opts: QuadratureOptions =
            serde_json::from_str(r#"{"compute_errors": false, "exact": {"tolerance": 1e-9}}"#)
                .unwrap();
        assert!(!opts.compute_errors);
        assert!((opts.exact.tolerance - 1e-9).abs() < 1e-24);
        assert_eq!(opts.exact.max_subdivisions, ExactOptions::default().max_subdivisions);
        assert_eq!(opts.root_scan_cells, 512);
    }

    #[test]
    fn test_builders() {
        let opts = QuadratureOptions::default()
            .with_errors(false)
            .with_root_scan_cells(64)
            .with_simplify_trace(false);
        assert!(!opts.compute_errors);
        assert_eq!(opts.root_scan_cells, 64);
        assert!(!opts.without_errors().compute_errors);
    }
}
