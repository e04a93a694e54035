//! Expression node types.

use std::fmt;

use smallvec::SmallVec;

use crate::handle::ExprHandle;
use crate::literal::Literal;

/// Unique identifier of a symbol within one arena.
pub type SymbolId = u32;

/// Argument list of an n-ary node.
pub type Operands = SmallVec<[ExprHandle; 4]>;

/// An expression node stored in the arena.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExprNode {
    /// A numeric literal.
    Number(Literal),

    /// A named variable.
    Symbol(SymbolId),

    /// Sum `a + b + ...`.
    ///
    /// Invariant: at least 2 arguments.
    Add(Operands),

    /// Product `a * b * ...`.
    ///
    /// Invariant: at least 2 arguments.
    Mul(Operands),

    /// Power `base ^ exp`.
    Pow {
        /// The base.
        base: ExprHandle,
        /// The exponent.
        exp: ExprHandle,
    },

    /// Negation `-arg`.
    Neg(ExprHandle),

    /// Quotient `num / den`.
    Div {
        /// The numerator.
        num: ExprHandle,
        /// The denominator.
        den: ExprHandle,
    },

    /// Application of an elementary function of one argument.
    Call {
        /// The function applied.
        func: Func,
        /// The argument.
        arg: ExprHandle,
    },
}

impl ExprNode {
    /// Returns the literal if this node is a number.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ExprNode::Number(n) => Some(n.value()),
            _ => None,
        }
    }

    /// Returns true if this is the number zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        matches!(self, ExprNode::Number(n) if n.is_zero())
    }

    /// Returns true if this is the number one.
    #[must_use]
    pub fn is_one(&self) -> bool {
        matches!(self, ExprNode::Number(n) if n.is_one())
    }

    /// Returns the children of this node.
    #[must_use]
    pub fn children(&self) -> Operands {
        match self {
            ExprNode::Number(_) | ExprNode::Symbol(_) => SmallVec::new(),
            ExprNode::Add(args) | ExprNode::Mul(args) => args.clone(),
            ExprNode::Pow { base, exp } => smallvec::smallvec![*base, *exp],
            ExprNode::Div { num, den } => smallvec::smallvec![*num, *den],
            ExprNode::Neg(arg) | ExprNode::Call { arg, .. } => smallvec::smallvec![*arg],
        }
    }
}

/// Elementary functions understood by the parser and the calculus routines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Func {
    /// Sine.
    Sin,
    /// Cosine.
    Cos,
    /// Tangent.
    Tan,
    /// Inverse sine.
    Asin,
    /// Inverse cosine.
    Acos,
    /// Inverse tangent.
    Atan,
    /// Hyperbolic sine.
    Sinh,
    /// Hyperbolic cosine.
    Cosh,
    /// Hyperbolic tangent.
    Tanh,
    /// Natural exponential.
    Exp,
    /// Natural logarithm.
    Ln,
    /// Base-10 logarithm.
    Log10,
    /// Square root.
    Sqrt,
    /// Absolute value.
    Abs,
}

/// Name lookup table; `log` is an alias of `ln`.
const FUNC_NAMES: &[(&str, Func)] = &[
    ("sin", Func::Sin),
    ("cos", Func::Cos),
    ("tan", Func::Tan),
    ("asin", Func::Asin),
    ("acos", Func::Acos),
    ("atan", Func::Atan),
    ("sinh", Func::Sinh),
    ("cosh", Func::Cosh),
    ("tanh", Func::Tanh),
    ("exp", Func::Exp),
    ("ln", Func::Ln),
    ("log", Func::Ln),
    ("log10", Func::Log10),
    ("sqrt", Func::Sqrt),
    ("abs", Func::Abs),
];

impl Func {
    /// Looks a function up by its textual name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        FUNC_NAMES
            .iter()
            .find_map(|(n, f)| (*n == name).then_some(*f))
    }

    /// Canonical name used for display.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Func::Sin => "sin",
            Func::Cos => "cos",
            Func::Tan => "tan",
            Func::Asin => "asin",
            Func::Acos => "acos",
            Func::Atan => "atan",
            Func::Sinh => "sinh",
            Func::Cosh => "cosh",
            Func::Tanh => "tanh",
            Func::Exp => "exp",
            Func::Ln => "ln",
            Func::Log10 => "log10",
            Func::Sqrt => "sqrt",
            Func::Abs => "abs",
        }
    }

    /// Evaluates the function at `x`.
    #[must_use]
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Func::Sin => x.sin(),
            Func::Cos => x.cos(),
            Func::Tan => x.tan(),
            Func::Asin => x.asin(),
            Func::Acos => x.acos(),
            Func::Atan => x.atan(),
            Func::Sinh => x.sinh(),
            Func::Cosh => x.cosh(),
            Func::Tanh => x.tanh(),
            Func::Exp => x.exp(),
            Func::Ln => x.ln(),
            Func::Log10 => x.log10(),
            Func::Sqrt => x.sqrt(),
            Func::Abs => x.abs(),
        }
    }
}

impl fmt::Display for Func {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_one() {
        assert!(ExprNode::Number(Literal::ZERO).is_zero());
        assert!(!ExprNode::Number(Literal::ONE).is_zero());
        assert!(ExprNode::Number(Literal::ONE).is_one());
        assert!(!ExprNode::Symbol(0).is_one());
    }

    #[test]
    fn test_func_lookup() {
        assert_eq!(Func::from_name("log"), Some(Func::Ln));
        assert_eq!(Func::from_name("sqrt"), Some(Func::Sqrt));
        assert_eq!(Func::from_name("erf"), None);
        assert!((Func::Exp.apply(1.0) - std::f64::consts::E).abs() < 1e-15);
    }
}
