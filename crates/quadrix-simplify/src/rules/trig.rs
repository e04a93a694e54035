//! Trigonometric identities.

use egg::{rewrite, Rewrite};

use crate::language::QuadLang;

/// Trigonometric rewrite rules.
#[must_use]
pub fn rules() -> Vec<Rewrite<QuadLang, ()>> {
    vec![
        rewrite!("pythag"; "(+ (^ (sin ?x) 2) (^ (cos ?x) 2))" => "1"),
        rewrite!("pythag-r"; "(+ (^ (cos ?x) 2) (^ (sin ?x) 2))" => "1"),
        rewrite!("tan-fold"; "(/ (sin ?x) (cos ?x))" => "(tan ?x)"),
        rewrite!("sin-zero"; "(sin 0)" => "0"),
        rewrite!("cos-zero"; "(cos 0)" => "1"),
        rewrite!("sin-neg"; "(sin (neg ?x))" => "(neg (sin ?x))"),
        rewrite!("cos-neg"; "(cos (neg ?x))" => "(cos ?x)"),
        rewrite!("sin-double-fold"; "(* 2 (* (sin ?x) (cos ?x)))" => "(sin (* 2 ?x))"),
        rewrite!("sin-asin"; "(sin (asin ?x))" => "?x"),
        rewrite!("cos-acos"; "(cos (acos ?x))" => "?x"),
        rewrite!("tan-atan"; "(tan (atan ?x))" => "?x"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use egg::{AstSize, Extractor, RecExpr, Runner};

    #[test]
    fn test_pythagorean_identity() {
        let start: RecExpr<QuadLang> = "(+ (^ (sin x) 2) (^ (cos x) 2))".parse().unwrap();
        let runner = Runner::default().with_expr(&start).run(&rules());
        let (_, best) = Extractor::new(&runner.egraph, AstSize).find_best(runner.roots[0]);
        assert_eq!(best.to_string(), "1");
    }
}
