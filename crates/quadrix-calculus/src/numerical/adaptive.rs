//! Adaptive Gauss-Kronrod integration.
//!
//! The interval with the largest error estimate is bisected until the summed
//! estimate meets the tolerance or the subdivision budget runs out.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::gauss_kronrod::g7k15;

/// Outcome of [`adaptive_integrate`].
#[derive(Clone, Copy, Debug)]
pub struct AdaptiveResult {
    /// Integral estimate.
    pub value: f64,
    /// Estimated absolute error.
    pub error: f64,
    /// Function evaluations spent.
    pub evaluations: usize,
    /// Subintervals in the final partition.
    pub intervals: usize,
    /// Whether the tolerance was met.
    pub converged: bool,
}

#[derive(Clone, Copy, Debug)]
struct Piece {
    a: f64,
    b: f64,
    value: f64,
    error: f64,
}

impl PartialEq for Piece {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Piece {}

impl PartialOrd for Piece {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Piece {
    fn cmp(&self, other: &Self) -> Ordering {
        // Largest error on top; NaN sorts above everything.
        self.error.total_cmp(&other.error)
    }
}

/// Integrates `f` over `[a, b]` to within `max(abs_tol, rel_tol * |I|)`.
pub fn adaptive_integrate<F: Fn(f64) -> f64>(
    f: &F,
    a: f64,
    b: f64,
    abs_tol: f64,
    rel_tol: f64,
    max_subdivisions: usize,
) -> AdaptiveResult {
    let tolerance = |value: f64| abs_tol.max(rel_tol * value.abs());

    let first = g7k15(f, a, b);
    let mut total_value = first.value;
    let mut total_error = first.error;
    let mut evaluations = first.evaluations;

    let mut heap = BinaryHeap::new();
    heap.push(Piece {
        a,
        b,
        value: first.value,
        error: first.error,
    });

    let mut splits = 0;
    while total_error > tolerance(total_value) && splits < max_subdivisions {
        let Some(worst) = heap.pop() else { break };
        splits += 1;

        let mid = (worst.a + worst.b) / 2.0;
        let left = g7k15(f, worst.a, mid);
        let right = g7k15(f, mid, worst.b);
        evaluations += left.evaluations + right.evaluations;

        total_value += left.value + right.value - worst.value;
        total_error += left.error + right.error - worst.error;

        heap.push(Piece {
            a: worst.a,
            b: mid,
            value: left.value,
            error: left.error,
        });
        heap.push(Piece {
            a: mid,
            b: worst.b,
            value: right.value,
            error: right.error,
        });
    }

    // Re-sum to shed the drift of the running updates.
    let value = heap.iter().map(|p| p.value).sum();
    let error = heap.iter().map(|p| p.error).sum();
    AdaptiveResult {
        value,
        error,
        evaluations,
        intervals: heap.len(),
        converged: error <= tolerance(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smooth_integrand_converges_at_once() {
        let r = adaptive_integrate(&|x| x * x, 0.0, 3.0, 1e-12, 1e-12, 100);
        assert!(r.converged);
        assert_eq!(r.intervals, 1);
        assert!((r.value - 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_peaked_integrand_subdivides() {
        // ∫₋₁₀¹⁰ 1/(1+x²) dx = 2 atan(10)
        let r = adaptive_integrate(&|x| 1.0 / (1.0 + x * x), -10.0, 10.0, 1e-12, 1e-12, 1000);
        assert!(r.converged);
        assert!(r.intervals > 1);
        assert!((r.value - 2.0 * 10f64.atan()).abs() < 1e-10);
    }

    #[test]
    fn test_budget_exhaustion_is_reported() {
        let r = adaptive_integrate(&|x: f64| x.sqrt(), 0.0, 1.0, 1e-16, 0.0, 2);
        assert!(!r.converged);
        assert!((r.value - 2.0 / 3.0).abs() < 1e-3);
    }
}
