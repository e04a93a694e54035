//! Algebraic identities.

use egg::{rewrite, Rewrite};

use crate::language::QuadLang;

/// Arithmetic rewrite rules.
#[must_use]
pub fn rules() -> Vec<Rewrite<QuadLang, ()>> {
    vec![
        rewrite!("add-zero"; "(+ ?a 0)" => "?a"),
        rewrite!("mul-one"; "(* ?a 1)" => "?a"),
        rewrite!("mul-zero"; "(* ?a 0)" => "0"),
        rewrite!("sub-self"; "(- ?a ?a)" => "0"),
        rewrite!("sub-to-add"; "(- ?a ?b)" => "(+ ?a (neg ?b))"),
        rewrite!("add-neg-to-sub"; "(+ ?a (neg ?b))" => "(- ?a ?b)"),
        rewrite!("neg-neg"; "(neg (neg ?a))" => "?a"),
        rewrite!("add-neg-self"; "(+ ?a (neg ?a))" => "0"),

        rewrite!("add-comm"; "(+ ?a ?b)" => "(+ ?b ?a)"),
        rewrite!("mul-comm"; "(* ?a ?b)" => "(* ?b ?a)"),
        rewrite!("add-assoc"; "(+ (+ ?a ?b) ?c)" => "(+ ?a (+ ?b ?c))"),
        rewrite!("mul-assoc"; "(* (* ?a ?b) ?c)" => "(* ?a (* ?b ?c))"),

        rewrite!("factor"; "(+ (* ?a ?b) (* ?a ?c))" => "(* ?a (+ ?b ?c))"),
        rewrite!("factor-one"; "(+ ?a (* ?a ?c))" => "(* ?a (+ 1 ?c))"),
        rewrite!("add-same"; "(+ ?a ?a)" => "(* 2 ?a)"),
        rewrite!("mul-same"; "(* ?a ?a)" => "(^ ?a 2)"),
        rewrite!("mul-pow"; "(* (^ ?a ?m) (^ ?a ?n))" => "(^ ?a (+ ?m ?n))"),
        rewrite!("pow-zero"; "(^ ?a 0)" => "1"),
        rewrite!("pow-one"; "(^ ?a 1)" => "?a"),

        rewrite!("div-one"; "(/ ?a 1)" => "?a"),
        rewrite!("div-self"; "(/ ?a ?a)" => "1"),
        rewrite!("div-mul-cancel"; "(/ (* ?a ?b) ?b)" => "?a"),
        rewrite!("mul-div-cancel"; "(* ?a (/ ?b ?a))" => "?b"),
        rewrite!("neg-mul"; "(* (neg ?a) ?b)" => "(neg (* ?a ?b))"),
        rewrite!("neg-div"; "(/ (neg ?a) ?b)" => "(neg (/ ?a ?b))"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use egg::{AstSize, Extractor, RecExpr, Runner};

    fn best(start: &str) -> String {
        let start: RecExpr<QuadLang> = start.parse().unwrap();
        let runner = Runner::default()
            .with_expr(&start)
            .with_iter_limit(8)
            .run(&rules());
        let (_, best) = Extractor::new(&runner.egraph, AstSize).find_best(runner.roots[0]);
        best.to_string()
    }

    #[test]
    fn test_identities() {
        assert_eq!(best("(+ x 0)"), "x");
        assert_eq!(best("(* 0 x)"), "0");
        assert_eq!(best("(- (* 2 y) (* 2 y))"), "0");
    }

    #[test]
    fn test_cancellation() {
        assert_eq!(best("(/ (* x (sin y)) (sin y))"), "x");
    }
}
