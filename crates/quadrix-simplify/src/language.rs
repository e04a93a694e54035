//! The expression language understood by the e-graph.

use egg::{define_language, Id, Symbol};
use quadrix_core::Literal;

define_language! {
    /// Symbolic expression language for quadrix integrands.
    pub enum QuadLang {
        Num(Literal),
        Symbol(Symbol),

        "+" = Add([Id; 2]),
        "-" = Sub([Id; 2]),
        "*" = Mul([Id; 2]),
        "/" = Div([Id; 2]),
        "neg" = Neg(Id),
        "^" = Pow([Id; 2]),

        "sin" = Sin(Id),
        "cos" = Cos(Id),
        "tan" = Tan(Id),
        "asin" = Asin(Id),
        "acos" = Acos(Id),
        "atan" = Atan(Id),
        "sinh" = Sinh(Id),
        "cosh" = Cosh(Id),
        "tanh" = Tanh(Id),

        "exp" = Exp(Id),
        "ln" = Ln(Id),
        "log10" = Log10(Id),
        "sqrt" = Sqrt(Id),
        "abs" = Abs(Id),
    }
}

impl QuadLang {
    /// Extracts the numeric value if this node is a number.
    #[must_use]
    pub fn as_num(&self) -> Option<f64> {
        match self {
            QuadLang::Num(n) => Some(n.value()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egg::RecExpr;

    #[test]
    fn test_parse_sexpr() {
        let expr: RecExpr<QuadLang> = "(* (+ x 1.5) (- x 1))".parse().unwrap();
        assert_eq!(expr.as_ref().len(), 7);
        assert_eq!(expr.as_ref()[1].as_num(), Some(1.5));
    }

    #[test]
    fn test_negative_literal_is_a_number() {
        let expr: RecExpr<QuadLang> = "(+ x -2)".parse().unwrap();
        assert!(expr.as_ref().iter().any(|n| n.as_num() == Some(-2.0)));
    }
}
