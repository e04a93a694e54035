//! Symbolic differentiation.

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::arena::ExprArena;
use crate::expr::{ExprNode, Func, Operands, SymbolId};
use crate::fold::{fold, power, product, quotient, sum};
use crate::handle::ExprHandle;

/// Differentiates folded expressions with respect to one symbol.
pub struct Differentiator {
    var: SymbolId,
    depends: HashMap<ExprHandle, bool>,
    memo: HashMap<ExprHandle, ExprHandle>,
}

impl Differentiator {
    /// Creates a differentiator for `var`.
    #[must_use]
    pub fn new(var: SymbolId) -> Self {
        Self {
            var,
            depends: HashMap::new(),
            memo: HashMap::new(),
        }
    }

    /// Returns true if the expression mentions the variable.
    pub fn depends_on(&mut self, arena: &ExprArena, h: ExprHandle) -> bool {
        if let Some(&d) = self.depends.get(&h) {
            return d;
        }
        let d = match arena.get(h) {
            ExprNode::Number(_) => false,
            ExprNode::Symbol(id) => *id == self.var,
            node => node.children().iter().any(|&c| self.depends_on(arena, c)),
        };
        self.depends.insert(h, d);
        d
    }

    /// The folded derivative of the folded expression `h`.
    pub fn derivative(&mut self, arena: &mut ExprArena, h: ExprHandle) -> ExprHandle {
        if let Some(&done) = self.memo.get(&h) {
            return done;
        }
        let out = if self.depends_on(arena, h) {
            self.derive_node(arena, h)
        } else {
            arena.number(0.0)
        };
        self.memo.insert(h, out);
        out
    }

    fn derive_node(&mut self, arena: &mut ExprArena, h: ExprHandle) -> ExprHandle {
        match arena.get(h).clone() {
            ExprNode::Number(_) => arena.number(0.0),
            ExprNode::Symbol(id) => arena.number(if id == self.var { 1.0 } else { 0.0 }),
            ExprNode::Add(args) => {
                let terms: Operands = args.iter().map(|&a| self.derivative(arena, a)).collect();
                sum(arena, &terms)
            }
            ExprNode::Mul(args) => {
                let mut terms: Operands = SmallVec::new();
                for i in 0..args.len() {
                    let di = self.derivative(arena, args[i]);
                    if arena.get(di).is_zero() {
                        continue;
                    }
                    let mut factors: Operands = args.clone();
                    factors[i] = di;
                    terms.push(product(arena, &factors));
                }
                sum(arena, &terms)
            }
            ExprNode::Neg(a) => {
                let da = self.derivative(arena, a);
                let minus_one = arena.number(-1.0);
                product(arena, &[minus_one, da])
            }
            ExprNode::Pow { base, exp } => self.derive_power(arena, base, exp),
            ExprNode::Div { num, den } => {
                let dn = self.derivative(arena, num);
                if !self.depends_on(arena, den) {
                    return quotient(arena, dn, den);
                }
                let dd = self.derivative(arena, den);
                let left = product(arena, &[dn, den]);
                let minus_one = arena.number(-1.0);
                let right = product(arena, &[minus_one, num, dd]);
                let top = sum(arena, &[left, right]);
                let two = arena.number(2.0);
                let bottom = power(arena, den, two);
                quotient(arena, top, bottom)
            }
            ExprNode::Call { func, arg } => {
                let du = self.derivative(arena, arg);
                let outer = call_derivative(arena, func, arg);
                product(arena, &[outer, du])
            }
        }
    }

    fn derive_power(
        &mut self,
        arena: &mut ExprArena,
        base: ExprHandle,
        exp: ExprHandle,
    ) -> ExprHandle {
        let base_varies = self.depends_on(arena, base);
        let exp_varies = self.depends_on(arena, exp);
        let whole = arena.pow(base, exp);

        if !exp_varies {
            // n * u^(n-1) * u'
            let minus_one = arena.number(-1.0);
            let n_minus_one = sum(arena, &[exp, minus_one]);
            let lowered = power(arena, base, n_minus_one);
            let du = self.derivative(arena, base);
            return product(arena, &[exp, lowered, du]);
        }

        let ln_base = {
            let l = arena.call(Func::Ln, base);
            fold(arena, l)
        };
        let dv = self.derivative(arena, exp);
        if !base_varies {
            return product(arena, &[whole, ln_base, dv]);
        }

        // u^v * (v' ln u + v u'/u)
        let du = self.derivative(arena, base);
        let first = product(arena, &[dv, ln_base]);
        let ratio = quotient(arena, du, base);
        let second = product(arena, &[exp, ratio]);
        let inner = sum(arena, &[first, second]);
        product(arena, &[whole, inner])
    }
}

/// `f'(u)` for an elementary function `f`.
fn call_derivative(arena: &mut ExprArena, func: Func, u: ExprHandle) -> ExprHandle {
    let one = arena.number(1.0);
    let two = arena.number(2.0);
    let minus_one = arena.number(-1.0);
    let raw = match func {
        Func::Sin => arena.call(Func::Cos, u),
        Func::Cos => {
            let s = arena.call(Func::Sin, u);
            arena.mul(smallvec::smallvec![minus_one, s])
        }
        Func::Tan => {
            let t = arena.call(Func::Tan, u);
            let t2 = arena.pow(t, two);
            arena.add(smallvec::smallvec![one, t2])
        }
        Func::Asin | Func::Acos => {
            let u2 = arena.pow(u, two);
            let neg_u2 = arena.neg(u2);
            let inside = arena.add(smallvec::smallvec![one, neg_u2]);
            let root = arena.call(Func::Sqrt, inside);
            let num = if func == Func::Asin { one } else { minus_one };
            arena.div(num, root)
        }
        Func::Atan => {
            let u2 = arena.pow(u, two);
            let den = arena.add(smallvec::smallvec![one, u2]);
            arena.div(one, den)
        }
        Func::Sinh => arena.call(Func::Cosh, u),
        Func::Cosh => arena.call(Func::Sinh, u),
        Func::Tanh => {
            let t = arena.call(Func::Tanh, u);
            let t2 = arena.pow(t, two);
            let neg = arena.neg(t2);
            arena.add(smallvec::smallvec![one, neg])
        }
        Func::Exp => arena.call(Func::Exp, u),
        Func::Ln => arena.div(one, u),
        Func::Log10 => {
            let ln10 = arena.number(std::f64::consts::LN_10);
            let den = arena.mul(smallvec::smallvec![ln10, u]);
            arena.div(one, den)
        }
        Func::Sqrt => {
            let root = arena.call(Func::Sqrt, u);
            let den = arena.mul(smallvec::smallvec![two, root]);
            arena.div(one, den)
        }
        Func::Abs => {
            let a = arena.call(Func::Abs, u);
            arena.div(u, a)
        }
    };
    fold(arena, raw)
}

/// The `order`-th derivative of the folded expression `h`.
pub fn nth_derivative(
    arena: &mut ExprArena,
    h: ExprHandle,
    var: SymbolId,
    order: usize,
) -> ExprHandle {
    let mut current = h;
    for _ in 0..order {
        let mut d = Differentiator::new(var);
        current = d.derivative(arena, current);
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::{evaluate, Env};
    use crate::parse::parse_into;

    fn derivative_at(text: &str, order: usize, at: f64) -> f64 {
        let mut arena = ExprArena::new();
        let h = parse_into(&mut arena, text).unwrap();
        let h = fold(&mut arena, h);
        let x = arena.intern_symbol("x");
        let d = nth_derivative(&mut arena, h, x, order);
        evaluate(&arena, d, &Env::new().with(x, at)).unwrap()
    }

    #[test]
    fn test_polynomial_derivatives() {
        assert!((derivative_at("x**4", 1, 2.0) - 32.0).abs() < 1e-12);
        assert!((derivative_at("x**4", 4, 0.3) - 24.0).abs() < 1e-12);
        assert!(derivative_at("x**3", 4, 1.0).abs() < 1e-12);
        assert!((derivative_at("3*x**2 + 2*x", 2, 5.0) - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_chain_rule() {
        // d/dx sin(x^2) = 2x cos(x^2)
        let expected = 2.0 * 1.5 * (1.5f64 * 1.5).cos();
        assert!((derivative_at("sin(x**2)", 1, 1.5) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_quotient_and_exp() {
        // d/dx x/(1+x) = 1/(1+x)^2
        assert!((derivative_at("x/(1+x)", 1, 1.0) - 0.25).abs() < 1e-12);
        // d2/dx2 exp(2x) = 4 exp(2x)
        assert!((derivative_at("exp(2*x)", 2, 0.0) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_variable_exponent() {
        // d/dx x^x = x^x (ln x + 1)
        let expected = 2f64.powf(2.0) * (2f64.ln() + 1.0);
        assert!((derivative_at("x**x", 1, 2.0) - expected).abs() < 1e-12);
        // d/dx 2^x = 2^x ln 2
        assert!((derivative_at("2**x", 1, 1.0) - 2.0 * 2f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_inverse_and_roots() {
        assert!((derivative_at("atan(x)", 1, 1.0) - 0.5).abs() < 1e-12);
        assert!((derivative_at("sqrt(x)", 1, 4.0) - 0.25).abs() < 1e-12);
        assert!((derivative_at("ln(x)", 2, 2.0) + 0.25).abs() < 1e-12);
    }
}
