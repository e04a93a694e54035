//! Real roots of `g(x) = 0` on a closed interval.
//!
//! Used to find the critical points of a derivative when bounding its
//! absolute value. The interval is scanned on a uniform grid. Sign changes
//! are refined by bisection, and sampled local minima of `|g|` that come
//! within rounding of zero are refined by golden-section search, so roots of
//! even multiplicity are found as well.

use quadrix_core::Expression;
use tracing::{debug, instrument};

use crate::error::SolveError;

const BISECTION_STEPS: usize = 200;
const GOLDEN_STEPS: usize = 120;
const TOUCH_TOLERANCE: f64 = 1e-10;

/// Roots of `g` in `[a, b]`, sorted ascending with duplicates merged.
///
/// `cells` is the number of grid cells scanned for sign changes; at least one
/// is used. Reversed bounds are accepted.
///
/// # Errors
///
/// * [`SolveError::IdenticallyZero`] when `g` is zero at every sample.
/// * [`SolveError::NonFinite`] when `g` is infinite or undefined at a sample.
/// * [`SolveError::FreeSymbol`] when `g` mentions another variable.
#[instrument(level = "debug", skip(g), fields(g = %g))]
pub fn critical_points(
    g: &Expression,
    var: &str,
    a: f64,
    b: f64,
    cells: usize,
) -> Result<Vec<f64>, SolveError> {
    if let Some(other) = g.free_symbols().into_iter().find(|s| s != var) {
        return Err(SolveError::FreeSymbol(other));
    }
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let eval = |x: f64| g.eval_at(var, x).unwrap_or(f64::NAN);

    let cells = cells.max(1);
    #[allow(clippy::cast_precision_loss)]
    let xs: Vec<f64> = (0..=cells)
        .map(|i| lo + (hi - lo) * (i as f64) / (cells as f64))
        .collect();
    let mut ys = Vec::with_capacity(xs.len());
    for &x in &xs {
        let y = eval(x);
        if !y.is_finite() {
            return Err(SolveError::NonFinite { at: x });
        }
        ys.push(y);
    }
    if ys.iter().all(|&y| y == 0.0) {
        return Err(SolveError::IdenticallyZero { lo, hi });
    }

    let scale = ys.iter().fold(0.0_f64, |m, y| m.max(y.abs())).max(1.0);
    let mut roots = Vec::new();
    for i in 0..xs.len() {
        if ys[i] == 0.0 {
            roots.push(xs[i]);
            continue;
        }
        if i + 1 < xs.len() && ys[i] * ys[i + 1] < 0.0 {
            roots.push(bisect(&eval, xs[i], xs[i + 1], ys[i]));
        }
        let interior = i > 0 && i + 1 < xs.len();
        if interior
            && ys[i].abs() < ys[i - 1].abs()
            && ys[i].abs() < ys[i + 1].abs()
            && ys[i - 1] * ys[i] > 0.0
            && ys[i] * ys[i + 1] > 0.0
        {
            let x = golden_min(&|x| eval(x).abs(), xs[i - 1], xs[i + 1]);
            if eval(x).abs() <= TOUCH_TOLERANCE * scale {
                roots.push(x);
            }
        }
    }

    roots.sort_by(f64::total_cmp);
    roots.dedup_by(|x, y| (*x - *y).abs() <= 1e-12 * (1.0 + y.abs()));
    debug!(count = roots.len(), "critical points");
    Ok(roots)
}

fn bisect<F: Fn(f64) -> f64>(f: &F, mut lo: f64, mut hi: f64, mut f_lo: f64) -> f64 {
    for _ in 0..BISECTION_STEPS {
        let mid = 0.5 * (lo + hi);
        if mid <= lo || mid >= hi {
            break;
        }
        let f_mid = f(mid);
        if f_mid == 0.0 {
            return mid;
        }
        if f_lo * f_mid < 0.0 {
            hi = mid;
        } else {
            lo = mid;
            f_lo = f_mid;
        }
    }
    0.5 * (lo + hi)
}

fn golden_min<F: Fn(f64) -> f64>(f: &F, mut lo: f64, mut hi: f64) -> f64 {
    let ratio = (5f64.sqrt() - 1.0) / 2.0;
    let mut x1 = hi - ratio * (hi - lo);
    let mut x2 = lo + ratio * (hi - lo);
    let (mut f1, mut f2) = (f(x1), f(x2));
    for _ in 0..GOLDEN_STEPS {
        if f1 <= f2 {
            hi = x2;
            x2 = x1;
            f2 = f1;
            x1 = hi - ratio * (hi - lo);
            f1 = f(x1);
        } else {
            lo = x1;
            x1 = x2;
            f1 = f2;
            x2 = lo + ratio * (hi - lo);
            f2 = f(x2);
        }
    }
    0.5 * (lo + hi)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roots(text: &str, a: f64, b: f64) -> Result<Vec<f64>, SolveError> {
        critical_points(&Expression::parse(text).unwrap(), "x", a, b, 512)
    }

    #[test]
    fn test_simple_roots_are_refined() {
        let r = roots("x**2 - 2", 0.0, 3.0).unwrap();
        assert_eq!(r.len(), 1);
        assert!((r[0] - 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_roots_outside_interval_are_ignored() {
        let r = roots("(x - 5)*(x + 0.3)", -1.0, 1.0).unwrap();
        assert_eq!(r.len(), 1);
        assert!((r[0] + 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_double_root_is_found() {
        let r = roots("(x - 0.3)**2", 0.0, 1.0).unwrap();
        assert_eq!(r.len(), 1);
        assert!((r[0] - 0.3).abs() < 1e-4);
    }

    #[test]
    fn test_trig_roots() {
        let r = roots("cos(x)", 0.0, 7.0).unwrap();
        let expected = [
            std::f64::consts::FRAC_PI_2,
            3.0 * std::f64::consts::FRAC_PI_2,
        ];
        assert_eq!(r.len(), 2);
        for (got, want) in r.iter().zip(expected) {
            assert!((got - want).abs() < 1e-12);
        }
    }

    #[test]
    fn test_no_roots() {
        assert!(roots("x**2 + 1", -2.0, 2.0).unwrap().is_empty());
    }

    #[test]
    fn test_failures() {
        assert!(matches!(
            roots("0", 0.0, 1.0),
            Err(SolveError::IdenticallyZero { .. })
        ));
        assert!(matches!(
            roots("1/x", 0.0, 1.0),
            Err(SolveError::NonFinite { .. })
        ));
        assert!(matches!(
            roots("x + y", 0.0, 1.0),
            Err(SolveError::FreeSymbol(_))
        ));
    }

    #[test]
    fn test_reversed_bounds() {
        let r = roots("x - 0.25", 1.0, 0.0).unwrap();
        assert_eq!(r.len(), 1);
        assert!((r[0] - 0.25).abs() < 1e-12);
    }
}
