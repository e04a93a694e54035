//! Substitution of a symbol by another expression.

use hashbrown::HashMap;

use crate::arena::ExprArena;
use crate::expr::{ExprNode, SymbolId};
use crate::fold::fold;
use crate::handle::ExprHandle;

/// Replaces every occurrence of `var` in `root` with `replacement` and folds
/// the result. Both handles must belong to `arena`.
pub fn substitute(
    arena: &mut ExprArena,
    root: ExprHandle,
    var: SymbolId,
    replacement: ExprHandle,
) -> ExprHandle {
    let mut memo = HashMap::new();
    let replaced = replace(arena, root, var, replacement, &mut memo);
    fold(arena, replaced)
}

fn replace(
    arena: &mut ExprArena,
    h: ExprHandle,
    var: SymbolId,
    with: ExprHandle,
    memo: &mut HashMap<ExprHandle, ExprHandle>,
) -> ExprHandle {
    if let Some(&done) = memo.get(&h) {
        return done;
    }
    let node = match arena.get(h).clone() {
        ExprNode::Symbol(id) if id == var => {
            memo.insert(h, with);
            return with;
        }
        leaf @ (ExprNode::Number(_) | ExprNode::Symbol(_)) => leaf,
        ExprNode::Add(args) => {
            ExprNode::Add(args.iter().map(|&a| replace(arena, a, var, with, memo)).collect())
        }
        ExprNode::Mul(args) => {
            ExprNode::Mul(args.iter().map(|&a| replace(arena, a, var, with, memo)).collect())
        }
        ExprNode::Pow { base, exp } => ExprNode::Pow {
            base: replace(arena, base, var, with, memo),
            exp: replace(arena, exp, var, with, memo),
        },
        ExprNode::Neg(a) => ExprNode::Neg(replace(arena, a, var, with, memo)),
        ExprNode::Div { num, den } => ExprNode::Div {
            num: replace(arena, num, var, with, memo),
            den: replace(arena, den, var, with, memo),
        },
        ExprNode::Call { func, arg } => ExprNode::Call {
            func,
            arg: replace(arena, arg, var, with, memo),
        },
    };
    let out = arena.intern(node);
    memo.insert(h, out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_into;

    #[test]
    fn test_substitute_number_folds() {
        let mut arena = ExprArena::new();
        let h = parse_into(&mut arena, "x**2 + 3*x").unwrap();
        let x = arena.intern_symbol("x");
        let two = arena.number(2.0);
        let r = substitute(&mut arena, h, x, two);
        assert_eq!(arena.get(r).as_number(), Some(10.0));
    }

    #[test]
    fn test_substitute_keeps_other_symbols() {
        let mut arena = ExprArena::new();
        let h = parse_into(&mut arena, "x*y + x").unwrap();
        let x = arena.intern_symbol("x");
        let half = arena.number(0.5);
        let r = substitute(&mut arena, h, x, half);
        let expected = parse_into(&mut arena, "0.5*y + 0.5").unwrap();
        let expected = fold(&mut arena, expected);
        assert_eq!(r, expected);
    }
}
