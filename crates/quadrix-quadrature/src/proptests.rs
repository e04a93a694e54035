//! Property-based tests for the quadrature rules.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::{composite, romberg, ErrorKind, Partitions, Problem, QuadratureOptions, Rule};

    fn quiet() -> QuadratureOptions {
        QuadratureOptions::default()
            .with_errors(false)
            .with_simplify_trace(false)
    }

    fn rule() -> impl Strategy<Value = Rule> {
        prop_oneof![
            Just(Rule::Trapezoidal),
            Just(Rule::Simpson13),
            Just(Rule::Simpson38)
        ]
    }

    fn coefficient() -> impl Strategy<Value = f64> {
        -10.0f64..10.0
    }

    // A non-degenerate interval inside [-3, 3].
    fn interval() -> impl Strategy<Value = (f64, f64)> {
        (-3.0f64..0.0, 0.1f64..3.0)
    }

    fn cubic(c: [f64; 4]) -> String {
        format!("({}) + ({})*x + ({})*x**2 + ({})*x**3", c[0], c[1], c[2], c[3])
    }

    fn cubic_integral(c: [f64; 4], a: f64, b: f64) -> f64 {
        let anti = |x: f64| c[0] * x + c[1] * x.powi(2) / 2.0 + c[2] * x.powi(3) / 3.0 + c[3] * x.powi(4) / 4.0;
        anti(b) - anti(a)
    }

    fn close(got: f64, want: f64) -> bool {
        (got - want).abs() <= 1e-9 * (1.0 + want.abs())
    }

    proptest! {
        #[test]
        fn constants_are_integrated_exactly(k in coefficient(), (a, b) in interval(), r in rule(), n in 1usize..8) {
            let pr = Problem::parse(&format!("({k})"), a, b).unwrap();
            let v = composite(r, &pr, Partitions::new(n).unwrap(), &quiet()).unwrap().value;
            prop_assert!(close(v, k * (b - a)));
        }

        #[test]
        fn trapezoid_is_exact_for_lines(c0 in coefficient(), c1 in coefficient(), (a, b) in interval(), n in 1usize..8) {
            let c = [c0, c1, 0.0, 0.0];
            let pr = Problem::parse(&cubic(c), a, b).unwrap();
            let v = composite(Rule::Trapezoidal, &pr, Partitions::new(n).unwrap(), &quiet()).unwrap().value;
            prop_assert!(close(v, cubic_integral(c, a, b)));
        }

        #[test]
        fn simpson_is_exact_for_cubics(
            c in prop::array::uniform4(coefficient()),
            (a, b) in interval(),
            three_eighths in any::<bool>(),
            n in 1usize..6,
        ) {
            let r = if three_eighths { Rule::Simpson38 } else { Rule::Simpson13 };
            let pr = Problem::parse(&cubic(c), a, b).unwrap();
            let v = composite(r, &pr, Partitions::new(n).unwrap(), &quiet()).unwrap().value;
            prop_assert!(close(v, cubic_integral(c, a, b)));
        }

        #[test]
        fn romberg_order_two_is_one_panel(c in prop::array::uniform4(coefficient()), (a, b) in interval(), r in rule()) {
            let pr = Problem::parse(&cubic(c), a, b).unwrap();
            let base = composite(r, &pr, Partitions::ONE, &quiet()).unwrap().value;
            prop_assert_eq!(romberg(r, &pr, 2, &quiet()).unwrap().value, base);
        }

        #[test]
        fn odd_romberg_orders_fail(k in 0usize..20) {
            let pr = Problem::parse("x", 0.0, 1.0).unwrap();
            prop_assert!(romberg(Rule::Trapezoidal, &pr, 2 * k + 1, &quiet()).is_err());
        }

        #[test]
        fn partition_counts_must_be_positive(n in -50i64..50) {
            prop_assert_eq!(Partitions::try_from(n).is_ok(), n > 0);
        }

        #[test]
        fn error_kind_labels_parse_in_any_case(i in 0usize..6, upper in any::<bool>()) {
            let kind = ErrorKind::ALL[i];
            let label = if upper { kind.label().to_uppercase() } else { kind.label().to_lowercase() };
            prop_assert_eq!(label.parse::<ErrorKind>().unwrap(), kind);
        }
    }
}
