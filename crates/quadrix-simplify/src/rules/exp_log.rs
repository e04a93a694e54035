//! Exponential, logarithm and root identities.

use egg::{rewrite, Rewrite};

use crate::language::QuadLang;

/// Exponential and logarithmic rewrite rules.
#[must_use]
pub fn rules() -> Vec<Rewrite<QuadLang, ()>> {
    vec![
        rewrite!("exp-zero"; "(exp 0)" => "1"),
        rewrite!("ln-one"; "(ln 1)" => "0"),
        rewrite!("exp-ln"; "(exp (ln ?x))" => "?x"),
        rewrite!("ln-exp"; "(ln (exp ?x))" => "?x"),
        rewrite!("exp-add-fold"; "(* (exp ?a) (exp ?b))" => "(exp (+ ?a ?b))"),
        rewrite!("exp-neg"; "(/ 1 (exp ?a))" => "(exp (neg ?a))"),
        rewrite!("ln-pow"; "(ln (^ ?x ?n))" => "(* ?n (ln ?x))"),
        rewrite!("sq-sqrt"; "(^ (sqrt ?x) 2)" => "?x"),
        rewrite!("sqrt-mul-self"; "(* (sqrt ?x) (sqrt ?x))" => "?x"),
        rewrite!("sqrt-sq"; "(sqrt (^ ?x 2))" => "(abs ?x)"),
        rewrite!("cosh-sinh"; "(- (^ (cosh ?x) 2) (^ (sinh ?x) 2))" => "1"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use egg::{AstSize, Extractor, RecExpr, Runner};

    #[test]
    fn test_exp_ln_inverse() {
        let start: RecExpr<QuadLang> = "(exp (ln x))".parse().unwrap();
        let runner = Runner::default().with_expr(&start).run(&rules());
        let (_, best) = Extractor::new(&runner.egraph, AstSize).find_best(runner.roots[0]);
        assert_eq!(best.to_string(), "x");
    }
}
