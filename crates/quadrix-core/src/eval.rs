//! Numeric evaluation.

use crate::arena::ExprArena;
use crate::error::CoreError;
use crate::expr::{ExprNode, SymbolId};
use crate::handle::ExprHandle;

/// Values bound to symbols during evaluation.
#[derive(Clone, Debug, Default)]
pub struct Env {
    bindings: Vec<(SymbolId, f64)>,
}

impl Env {
    /// An environment with no bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `id` to `value`, replacing an earlier binding.
    #[must_use]
    pub fn with(mut self, id: SymbolId, value: f64) -> Self {
        self.set(id, value);
        self
    }

    /// Binds `id` to `value` in place.
    pub fn set(&mut self, id: SymbolId, value: f64) {
        match self.bindings.iter_mut().find(|(s, _)| *s == id) {
            Some(slot) => slot.1 = value,
            None => self.bindings.push((id, value)),
        }
    }

    /// Returns the value bound to `id`.
    #[must_use]
    pub fn get(&self, id: SymbolId) -> Option<f64> {
        self.bindings
            .iter()
            .find_map(|&(s, v)| (s == id).then_some(v))
    }
}

/// Evaluates the expression at `root` under `env`.
///
/// Domain violations (division by zero, `sqrt` of a negative number) yield
/// `inf` or `NaN` rather than an error.
///
/// # Errors
///
/// Returns [`CoreError::UnboundSymbol`] when a symbol has no binding.
pub fn evaluate(arena: &ExprArena, root: ExprHandle, env: &Env) -> Result<f64, CoreError> {
    Ok(match arena.get(root) {
        ExprNode::Number(n) => n.value(),
        ExprNode::Symbol(id) => env.get(*id).ok_or_else(|| {
            CoreError::UnboundSymbol(arena.symbol_name(*id).unwrap_or("?").to_string())
        })?,
        ExprNode::Add(args) => {
            let mut acc = 0.0;
            for &a in args {
                acc += evaluate(arena, a, env)?;
            }
            acc
        }
        ExprNode::Mul(args) => {
            let mut acc = 1.0;
            for &a in args {
                acc *= evaluate(arena, a, env)?;
            }
            acc
        }
        ExprNode::Pow { base, exp } => {
            let b = evaluate(arena, *base, env)?;
            let e = evaluate(arena, *exp, env)?;
            power(b, e)
        }
        ExprNode::Neg(a) => -evaluate(arena, *a, env)?,
        ExprNode::Div { num, den } => evaluate(arena, *num, env)? / evaluate(arena, *den, env)?,
        ExprNode::Call { func, arg } => func.apply(evaluate(arena, *arg, env)?),
    })
}

/// `b^e`, using integer powers when the exponent is integral so that
/// negative bases keep a real value.
#[must_use]
pub fn power(b: f64, e: f64) -> f64 {
    if e.fract() == 0.0 && e.abs() <= f64::from(i32::MAX) {
        #[allow(clippy::cast_possible_truncation)]
        b.powi(e as i32)
    } else {
        b.powf(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_into;

    #[test]
    fn test_evaluate_polynomial() {
        let mut arena = ExprArena::new();
        let h = parse_into(&mut arena, "3*x**2 - 2*x + 1").unwrap();
        let x = arena.symbol_id("x").unwrap();
        let v = evaluate(&arena, h, &Env::new().with(x, 2.0)).unwrap();
        assert!((v - 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_unbound_symbol() {
        let mut arena = ExprArena::new();
        let h = parse_into(&mut arena, "x*y").unwrap();
        let x = arena.symbol_id("x").unwrap();
        let err = evaluate(&arena, h, &Env::new().with(x, 1.0)).unwrap_err();
        assert_eq!(err, CoreError::UnboundSymbol("y".to_string()));
    }

    #[test]
    fn test_negative_base_integer_power() {
        assert!((power(-2.0, 3.0) + 8.0).abs() < 1e-12);
        assert!(power(-2.0, 0.5).is_nan());
    }

    #[test]
    fn test_degenerate_values_propagate() {
        let mut arena = ExprArena::new();
        let h = parse_into(&mut arena, "sqrt(x)/x").unwrap();
        let x = arena.symbol_id("x").unwrap();
        assert!(evaluate(&arena, h, &Env::new().with(x, -1.0)).unwrap().is_nan());
        assert!(evaluate(&arena, h, &Env::new().with(x, 0.0)).unwrap().is_nan());
    }
}
