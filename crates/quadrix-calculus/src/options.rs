//! Tolerances for reference integrals.

use serde::{Deserialize, Serialize};

/// Settings for [`definite_integral`](crate::definite_integral) and
/// [`iterated_integral`](crate::iterated_integral).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExactOptions {
    /// Absolute and relative error target of the Gauss-Kronrod fallback.
    pub tolerance: f64,
    /// Bisection budget of the Gauss-Kronrod fallback.
    pub max_subdivisions: usize,
}

impl Default for ExactOptions {
    fn default() -> Self {
        Self {
            tolerance: 1e-12,
            max_subdivisions: 2_000,
        }
    }
}

impl ExactOptions {
    /// Sets the error target.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the bisection budget.
    #[must_use]
    pub fn with_max_subdivisions(mut self, n: usize) -> Self {
        self.max_subdivisions = n;
        self
    }
}
