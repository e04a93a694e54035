//! Dense univariate polynomials with `f64` coefficients, and recognition of
//! polynomial expressions.

use crate::arena::ExprArena;
use crate::expr::{ExprNode, SymbolId};
use crate::handle::ExprHandle;

/// Highest degree [`collect_polynomial`] will expand to; anything larger is
/// treated as non-polynomial.
pub const MAX_DEGREE: usize = 1 << 16;

/// A dense univariate polynomial.
///
/// Coefficients are stored in ascending degree order.
#[derive(Clone, PartialEq, Debug)]
pub struct DensePoly {
    coeffs: Vec<f64>,
}

impl DensePoly {
    /// Creates a polynomial from coefficients, trimming trailing zeros.
    #[must_use]
    pub fn new(mut coeffs: Vec<f64>) -> Self {
        while coeffs.len() > 1 && coeffs.last() == Some(&0.0) {
            coeffs.pop();
        }
        if coeffs.is_empty() {
            coeffs.push(0.0);
        }
        Self { coeffs }
    }

    /// The zero polynomial.
    #[must_use]
    pub fn zero() -> Self {
        Self { coeffs: vec![0.0] }
    }

    /// The constant polynomial `c`.
    #[must_use]
    pub fn constant(c: f64) -> Self {
        Self::new(vec![c])
    }

    /// The polynomial `x`.
    #[must_use]
    pub fn x() -> Self {
        Self::new(vec![0.0, 1.0])
    }

    /// Degree; the zero polynomial has degree 0.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    /// Returns true for the zero polynomial.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.coeffs.len() == 1 && self.coeffs[0] == 0.0
    }

    /// Coefficients in ascending degree order.
    #[must_use]
    pub fn coeffs(&self) -> &[f64] {
        &self.coeffs
    }

    /// Horner evaluation.
    #[must_use]
    pub fn eval(&self, x: f64) -> f64 {
        self.coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
    }

    /// Sum.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        let len = self.coeffs.len().max(other.coeffs.len());
        Self::new(
            (0..len)
                .map(|i| {
                    self.coeffs.get(i).copied().unwrap_or(0.0)
                        + other.coeffs.get(i).copied().unwrap_or(0.0)
                })
                .collect(),
        )
    }

    /// Scalar multiple.
    #[must_use]
    pub fn scale(&self, k: f64) -> Self {
        Self::new(self.coeffs.iter().map(|c| c * k).collect())
    }

    /// Product, schoolbook. Zero coefficients are skipped, so sparse
    /// factors such as monomials multiply in linear time.
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        let mut out = vec![0.0; self.coeffs.len() + other.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            if *a == 0.0 {
                continue;
            }
            for (j, b) in other.coeffs.iter().enumerate() {
                out[i + j] += a * b;
            }
        }
        Self::new(out)
    }

    /// `self` raised to the `n`th power by repeated squaring.
    #[must_use]
    pub fn pow(&self, mut n: u32) -> Self {
        let mut acc = Self::constant(1.0);
        let mut base = self.clone();
        while n > 0 {
            if n & 1 == 1 {
                acc = acc.mul(&base);
            }
            n >>= 1;
            if n > 0 {
                base = base.mul(&base);
            }
        }
        acc
    }

    /// The antiderivative with zero constant term.
    #[must_use]
    pub fn antiderivative(&self) -> Self {
        let mut out = Vec::with_capacity(self.coeffs.len() + 1);
        out.push(0.0);
        for (i, c) in self.coeffs.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            out.push(c / (i + 1) as f64);
        }
        Self::new(out)
    }

    /// Definite integral over `[lo, hi]` by the power rule.
    #[must_use]
    pub fn integrate(&self, lo: f64, hi: f64) -> f64 {
        let anti = self.antiderivative();
        anti.eval(hi) - anti.eval(lo)
    }
}

/// Reads `h` as a polynomial in `var`, or `None` when it is not one.
///
/// Any other symbol makes the expression non-polynomial.
#[must_use]
pub fn collect_polynomial(arena: &ExprArena, h: ExprHandle, var: SymbolId) -> Option<DensePoly> {
    match arena.get(h) {
        ExprNode::Number(n) => Some(DensePoly::constant(n.value())),
        ExprNode::Symbol(id) if *id == var => Some(DensePoly::x()),
        ExprNode::Symbol(_) | ExprNode::Call { .. } => None,
        ExprNode::Add(args) => args.iter().try_fold(DensePoly::zero(), |acc, &a| {
            Some(acc.add(&collect_polynomial(arena, a, var)?))
        }),
        ExprNode::Mul(args) => args.iter().try_fold(DensePoly::constant(1.0), |acc, &a| {
            let p = collect_polynomial(arena, a, var)?;
            if acc.degree() + p.degree() > MAX_DEGREE {
                return None;
            }
            Some(acc.mul(&p))
        }),
        ExprNode::Pow { base, exp } => {
            let n = match arena.get(*exp) {
                ExprNode::Number(lit) => lit.as_natural()?,
                _ => return None,
            };
            let base = collect_polynomial(arena, *base, var)?;
            let degree = base.degree().checked_mul(usize::try_from(n).ok()?)?;
            if degree > MAX_DEGREE {
                return None;
            }
            Some(base.pow(n))
        }
        ExprNode::Neg(a) => Some(collect_polynomial(arena, *a, var)?.scale(-1.0)),
        ExprNode::Div { num, den } => {
            let den = collect_polynomial(arena, *den, var)?;
            if den.degree() != 0 || den.is_zero() {
                return None;
            }
            Some(collect_polynomial(arena, *num, var)?.scale(1.0 / den.coeffs[0]))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_into;

    fn poly_of(text: &str) -> Option<DensePoly> {
        let mut arena = ExprArena::new();
        let h = parse_into(&mut arena, text).unwrap();
        let x = arena.intern_symbol("x");
        collect_polynomial(&arena, h, x)
    }

    #[test]
    fn test_recognises_polynomials() {
        assert_eq!(poly_of("x**4 - 2*x + 1").unwrap().degree(), 4);
        assert_eq!(poly_of("(x + 1)**3 / 2").unwrap().coeffs(), &[0.5, 1.5, 1.5, 0.5]);
        assert_eq!(poly_of("7").unwrap().degree(), 0);
    }

    #[test]
    fn test_rejects_non_polynomials() {
        assert!(poly_of("sin(x)").is_none());
        assert!(poly_of("1/x").is_none());
        assert!(poly_of("x**0.5").is_none());
        assert!(poly_of("x*y").is_none());
    }

    #[test]
    fn test_power_rule_integral() {
        let p = DensePoly::new(vec![1.0, 0.0, 3.0]);
        // ∫₀² (1 + 3x²) dx = 2 + 8
        assert!((p.integrate(0.0, 2.0) - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_pow_matches_repeated_product() {
        let base = DensePoly::new(vec![1.0, 1.0]);
        let expected = (0..5).fold(DensePoly::constant(1.0), |acc, _| acc.mul(&base));
        assert_eq!(base.pow(5), expected);
        assert_eq!(base.pow(0), DensePoly::constant(1.0));
        assert_eq!(poly_of("(x + 1)**5").unwrap().coeffs(), &[1.0, 5.0, 10.0, 10.0, 5.0, 1.0]);
    }

    #[test]
    fn test_large_monomial_collects_quickly() {
        let start = std::time::Instant::now();
        let p = poly_of("x**60000").unwrap();
        assert_eq!(p.degree(), 60000);
        assert_eq!(p.coeffs()[60000], 1.0);
        assert!((p.integrate(0.0, 1.0) - 1.0 / 60001.0).abs() < 1e-15);
        assert!(start.elapsed() < std::time::Duration::from_secs(5));

        let p = poly_of("x**1000").unwrap();
        assert!((p.integrate(0.0, 1.0) - 1.0 / 1001.0).abs() < 1e-15);
    }

    #[test]
    fn test_degree_past_cap_is_not_polynomial() {
        assert!(poly_of("x**4000000000").is_none());
        assert!(poly_of("x**40000 * x**40000").is_none());
        assert!(poly_of("2**4000000000").is_some());
    }
}
