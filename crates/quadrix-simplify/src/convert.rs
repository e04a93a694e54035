//! Conversion between [`Expression`] and e-graph terms.

use egg::{Id, Language, RecExpr, Symbol};
use hashbrown::HashMap;
use smallvec::smallvec;

use quadrix_core::{ExprArena, ExprHandle, ExprNode, Expression, Func};

use crate::language::QuadLang;

/// Lowers an expression to an e-graph term.
///
/// Returns `None` when a literal is not finite; such terms are left to the
/// folder alone.
#[must_use]
pub fn to_rec_expr(expr: &Expression) -> Option<RecExpr<QuadLang>> {
    let mut rec = RecExpr::default();
    let mut memo = HashMap::new();
    lower(expr.arena(), expr.root(), &mut rec, &mut memo)?;
    Some(rec)
}

fn lower(
    arena: &ExprArena,
    h: ExprHandle,
    rec: &mut RecExpr<QuadLang>,
    memo: &mut HashMap<ExprHandle, Id>,
) -> Option<Id> {
    if let Some(&id) = memo.get(&h) {
        return Some(id);
    }
    let id = match arena.get(h) {
        ExprNode::Number(n) => {
            if !n.is_finite() {
                return None;
            }
            rec.add(QuadLang::Num(*n))
        }
        ExprNode::Symbol(s) => rec.add(QuadLang::Symbol(Symbol::from(
            arena.symbol_name(*s).unwrap_or("_"),
        ))),
        ExprNode::Add(args) | ExprNode::Mul(args) => {
            let is_sum = matches!(arena.get(h), ExprNode::Add(_));
            let mut acc = lower(arena, args[0], rec, memo)?;
            for &a in &args[1..] {
                let rhs = lower(arena, a, rec, memo)?;
                acc = rec.add(if is_sum {
                    QuadLang::Add([acc, rhs])
                } else {
                    QuadLang::Mul([acc, rhs])
                });
            }
            acc
        }
        ExprNode::Pow { base, exp } => {
            let b = lower(arena, *base, rec, memo)?;
            let e = lower(arena, *exp, rec, memo)?;
            rec.add(QuadLang::Pow([b, e]))
        }
        ExprNode::Neg(a) => {
            let a = lower(arena, *a, rec, memo)?;
            rec.add(QuadLang::Neg(a))
        }
        ExprNode::Div { num, den } => {
            let n = lower(arena, *num, rec, memo)?;
            let d = lower(arena, *den, rec, memo)?;
            rec.add(QuadLang::Div([n, d]))
        }
        ExprNode::Call { func, arg } => {
            let a = lower(arena, *arg, rec, memo)?;
            rec.add(call_node(*func, a))
        }
    };
    memo.insert(h, id);
    Some(id)
}

fn call_node(func: Func, a: Id) -> QuadLang {
    match func {
        Func::Sin => QuadLang::Sin(a),
        Func::Cos => QuadLang::Cos(a),
        Func::Tan => QuadLang::Tan(a),
        Func::Asin => QuadLang::Asin(a),
        Func::Acos => QuadLang::Acos(a),
        Func::Atan => QuadLang::Atan(a),
        Func::Sinh => QuadLang::Sinh(a),
        Func::Cosh => QuadLang::Cosh(a),
        Func::Tanh => QuadLang::Tanh(a),
        Func::Exp => QuadLang::Exp(a),
        Func::Ln => QuadLang::Ln(a),
        Func::Log10 => QuadLang::Log10(a),
        Func::Sqrt => QuadLang::Sqrt(a),
        Func::Abs => QuadLang::Abs(a),
    }
}

/// Raises an e-graph term back to a folded expression.
#[must_use]
pub fn from_rec_expr(rec: &RecExpr<QuadLang>) -> Expression {
    let mut arena = ExprArena::new();
    let mut handles: Vec<ExprHandle> = Vec::with_capacity(rec.as_ref().len());
    for node in rec.as_ref() {
        let at = |id: &Id| handles[usize::from(*id)];
        let h = match node {
            QuadLang::Num(n) => arena.number(n.value()),
            QuadLang::Symbol(s) => arena.symbol(s.as_str()),
            QuadLang::Add([a, b]) => {
                let (a, b) = (at(a), at(b));
                arena.add(smallvec![a, b])
            }
            QuadLang::Sub([a, b]) => {
                let (a, b) = (at(a), at(b));
                arena.sub(a, b)
            }
            QuadLang::Mul([a, b]) => {
                let (a, b) = (at(a), at(b));
                arena.mul(smallvec![a, b])
            }
            QuadLang::Div([a, b]) => {
                let (a, b) = (at(a), at(b));
                arena.div(a, b)
            }
            QuadLang::Pow([a, b]) => {
                let (a, b) = (at(a), at(b));
                arena.pow(a, b)
            }
            QuadLang::Neg(a) => {
                let a = at(a);
                arena.neg(a)
            }
            call => {
                let func = Func::from_name(&call.to_string());
                match (func, call.children().first()) {
                    (Some(func), Some(a)) => {
                        let a = at(a);
                        arena.call(func, a)
                    }
                    _ => arena.number(f64::NAN),
                }
            }
        };
        handles.push(h);
    }
    let root = handles
        .last()
        .copied()
        .unwrap_or_else(|| arena.number(0.0));
    Expression::from_parts(arena, root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_preserves_value() {
        let e = Expression::parse("3*x**2 - sin(x)/(1 + x)").unwrap();
        let rec = to_rec_expr(&e).unwrap();
        let back = from_rec_expr(&rec);
        for x in [0.0, 0.5, 2.0] {
            let (u, v) = (e.eval_at("x", x).unwrap(), back.eval_at("x", x).unwrap());
            assert!((u - v).abs() < 1e-12);
        }
    }

    #[test]
    fn test_non_finite_literal_is_not_lowered() {
        let e = Expression::parse("x + 1/0").unwrap();
        assert!(to_rec_expr(&e).is_none());
    }
}
