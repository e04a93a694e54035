//! Constant folding and canonical cleanup.
//!
//! The folded form is what every other pass works on:
//! - sums and products are flat, numbers are combined into one literal
//!   (last in a sum, first in a product);
//! - like terms `c1*t + c2*t` and like factors `t^a * t^b` are merged;
//! - negation is written as a product with `-1`;
//! - a number times a sum is distributed;
//! - division by a number becomes multiplication by its reciprocal;
//! - calls on numeric arguments are evaluated.

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::arena::ExprArena;
use crate::eval;
use crate::expr::{ExprNode, Operands};
use crate::handle::ExprHandle;

/// Folds the expression at `root`, returning the canonical handle.
pub fn fold(arena: &mut ExprArena, root: ExprHandle) -> ExprHandle {
    let mut memo = HashMap::new();
    fold_rec(arena, root, &mut memo)
}

fn fold_rec(
    arena: &mut ExprArena,
    h: ExprHandle,
    memo: &mut HashMap<ExprHandle, ExprHandle>,
) -> ExprHandle {
    if let Some(&done) = memo.get(&h) {
        return done;
    }
    let out = match arena.get(h).clone() {
        ExprNode::Number(_) | ExprNode::Symbol(_) => h,
        ExprNode::Add(args) => {
            let terms: Operands = args.iter().map(|&a| fold_rec(arena, a, memo)).collect();
            sum(arena, &terms)
        }
        ExprNode::Mul(args) => {
            let factors: Operands = args.iter().map(|&a| fold_rec(arena, a, memo)).collect();
            product(arena, &factors)
        }
        ExprNode::Neg(a) => {
            let a = fold_rec(arena, a, memo);
            let minus_one = arena.number(-1.0);
            product(arena, &[minus_one, a])
        }
        ExprNode::Pow { base, exp } => {
            let base = fold_rec(arena, base, memo);
            let exp = fold_rec(arena, exp, memo);
            power(arena, base, exp)
        }
        ExprNode::Div { num, den } => {
            let num = fold_rec(arena, num, memo);
            let den = fold_rec(arena, den, memo);
            quotient(arena, num, den)
        }
        ExprNode::Call { func, arg } => {
            let arg = fold_rec(arena, arg, memo);
            match arena.get(arg).as_number() {
                Some(v) => arena.number(func.apply(v)),
                None => arena.call(func, arg),
            }
        }
    };
    memo.insert(h, out);
    out
}

/// Splits `c * rest` into its numeric coefficient and the rest.
fn split_coefficient(arena: &mut ExprArena, t: ExprHandle) -> (f64, ExprHandle) {
    if let ExprNode::Mul(args) = arena.get(t).clone() {
        if let Some(c) = arena.get(args[0]).as_number() {
            let rest: Operands = args[1..].iter().copied().collect();
            return (c, arena.mul(rest));
        }
    }
    (1.0, t)
}

/// `c * base` for a folded `base` that carries no coefficient of its own.
fn scaled(arena: &mut ExprArena, c: f64, base: ExprHandle) -> ExprHandle {
    if c == 1.0 {
        return base;
    }
    let coeff = arena.number(c);
    let mut factors: Operands = SmallVec::new();
    factors.push(coeff);
    match arena.get(base).clone() {
        ExprNode::Mul(args) => factors.extend(args),
        _ => factors.push(base),
    }
    arena.mul(factors)
}

/// Sum of folded terms.
pub(crate) fn sum(arena: &mut ExprArena, terms: &[ExprHandle]) -> ExprHandle {
    let mut constant = 0.0;
    let mut groups: Vec<(ExprHandle, f64)> = Vec::new();
    let mut stack: Vec<ExprHandle> = terms.iter().rev().copied().collect();

    while let Some(t) = stack.pop() {
        match arena.get(t).clone() {
            ExprNode::Number(n) => constant += n.value(),
            ExprNode::Add(inner) => stack.extend(inner.iter().rev().copied()),
            _ => {
                let (c, base) = split_coefficient(arena, t);
                match groups.iter_mut().find(|(b, _)| *b == base) {
                    Some(slot) => slot.1 += c,
                    None => groups.push((base, c)),
                }
            }
        }
    }

    let mut out: Operands = SmallVec::new();
    for (base, c) in groups {
        if c != 0.0 {
            out.push(scaled(arena, c, base));
        }
    }
    if constant != 0.0 {
        out.push(arena.number(constant));
    }
    arena.add(out)
}

/// Product of folded factors.
pub(crate) fn product(arena: &mut ExprArena, factors: &[ExprHandle]) -> ExprHandle {
    let mut coeff = 1.0;
    let mut groups: Vec<(ExprHandle, f64)> = Vec::new();
    let mut stack: Vec<ExprHandle> = factors.iter().rev().copied().collect();

    while let Some(f) = stack.pop() {
        let node = arena.get(f).clone();
        let (base, e) = match node {
            ExprNode::Number(n) => {
                coeff *= n.value();
                continue;
            }
            ExprNode::Mul(inner) => {
                stack.extend(inner.iter().rev().copied());
                continue;
            }
            ExprNode::Pow { base, exp } => match arena.get(exp).as_number() {
                Some(e) => (base, e),
                None => (f, 1.0),
            },
            _ => (f, 1.0),
        };
        match groups.iter_mut().find(|(b, _)| *b == base) {
            Some(slot) => slot.1 += e,
            None => groups.push((base, e)),
        }
    }

    if coeff == 0.0 {
        return arena.number(0.0);
    }

    let mut out: Operands = SmallVec::new();
    for (base, e) in groups {
        if e == 0.0 {
            continue;
        }
        if e == 1.0 {
            out.push(base);
        } else {
            let exp = arena.number(e);
            out.push(power(arena, base, exp));
        }
    }

    if out.is_empty() {
        return arena.number(coeff);
    }
    if coeff != 1.0 && out.len() == 1 {
        if let ExprNode::Add(terms) = arena.get(out[0]).clone() {
            let distributed: Operands = terms
                .iter()
                .map(|&t| match arena.get(t).as_number() {
                    Some(v) => arena.number(coeff * v),
                    None => {
                        let (c, base) = split_coefficient(arena, t);
                        scaled(arena, coeff * c, base)
                    }
                })
                .collect();
            return sum(arena, &distributed);
        }
    }
    if coeff != 1.0 {
        let c = arena.number(coeff);
        out.insert(0, c);
    }
    arena.mul(out)
}

/// `base ^ exp` for folded operands.
pub(crate) fn power(arena: &mut ExprArena, base: ExprHandle, exp: ExprHandle) -> ExprHandle {
    let e = arena.get(exp).as_number();
    if e == Some(0.0) {
        return arena.number(1.0);
    }
    if e == Some(1.0) {
        return base;
    }
    let b = arena.get(base).clone();
    if let Some(bv) = b.as_number() {
        if let Some(ev) = e {
            return arena.number(eval::power(bv, ev));
        }
        if bv == 1.0 {
            return base;
        }
    }
    if let Some(ev) = e.filter(|v| v.fract() == 0.0) {
        match b {
            ExprNode::Pow { base: inner, exp: inner_exp } => {
                if let Some(iv) = arena.get(inner_exp).as_number() {
                    let combined = arena.number(iv * ev);
                    return power(arena, inner, combined);
                }
            }
            ExprNode::Mul(args) => {
                let powered: Operands = args.iter().map(|&a| power(arena, a, exp)).collect();
                return product(arena, &powered);
            }
            _ => {}
        }
    }
    arena.pow(base, exp)
}

/// `num / den` for folded operands.
pub(crate) fn quotient(arena: &mut ExprArena, num: ExprHandle, den: ExprHandle) -> ExprHandle {
    if let Some(d) = arena.get(den).as_number() {
        let recip = arena.number(1.0 / d);
        return product(arena, &[recip, num]);
    }
    if arena.get(num).is_zero() {
        return num;
    }
    if num == den {
        return arena.number(1.0);
    }
    let (c, rest) = split_coefficient(arena, num);
    if c != 1.0 {
        let coeff = arena.number(c);
        let q = arena.div(rest, den);
        return product(arena, &[coeff, q]);
    }
    arena.div(num, den)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_into;

    fn folded(text: &str) -> (ExprArena, ExprHandle) {
        let mut arena = ExprArena::new();
        let h = parse_into(&mut arena, text).unwrap();
        let f = fold(&mut arena, h);
        (arena, f)
    }

    #[test]
    fn test_numbers_collapse() {
        let (arena, h) = folded("2*3 + 4/2 - 1");
        assert_eq!(arena.get(h).as_number(), Some(7.0));
    }

    #[test]
    fn test_like_terms_merge() {
        let (arena, h) = folded("x + 2*x - 3*x");
        assert!(arena.get(h).is_zero());
    }

    #[test]
    fn test_like_factors_merge() {
        let (mut arena, h) = folded("x*x*x");
        let x = arena.symbol("x");
        let three = arena.number(3.0);
        assert_eq!(h, arena.pow(x, three));
    }

    #[test]
    fn test_distributes_coefficients() {
        let (arena, h) = folded("2*(x + 1)");
        let ExprNode::Add(terms) = arena.get(h) else {
            panic!("expected a sum");
        };
        assert_eq!(terms.len(), 2);
        assert_eq!(arena.get(terms[1]).as_number(), Some(2.0));
    }

    #[test]
    fn test_division_by_number() {
        let (mut arena, h) = folded("x/4");
        let x = arena.symbol("x");
        let quarter = arena.number(0.25);
        assert_eq!(h, arena.mul(smallvec::smallvec![quarter, x]));
    }

    #[test]
    fn test_idempotent() {
        let (mut arena, h) = folded("-(x - 2)**2 / 3 + sin(0) * y + (x*y)**2");
        let again = fold(&mut arena, h);
        assert_eq!(h, again);
    }
}
