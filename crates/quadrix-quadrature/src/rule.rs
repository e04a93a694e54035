//! Newton-Cotes rules and their node layouts.
//!
//! Every rule, simple or composite, is the same weighted sum
//!
//! ```text
//! prefactor * (endpoint_weight * (f(a) + f(b)) + Σ_g weight_g * S_g)
//! ```
//!
//! where each group `S_g` sums the function over every `stride`-th interior
//! node starting at `offset`. A simple rule is the composite rule with one
//! panel. The sum is generic over [`Accumulate`] so the same code combines
//! numbers and, for rectangular double integrals, expressions in `y`.

use std::fmt;

use quadrix_core::Expression;
use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

use crate::error::Result;
use crate::evaluation::Evaluation;
use crate::options::QuadratureOptions;
use crate::partitions::Partitions;
use crate::problem::Problem;
use crate::trace::{list, num, nums, Step};

/// A quadrature rule family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    /// Linear interpolation per subinterval.
    Trapezoidal,
    /// Quadratic interpolation over pairs of subintervals.
    Simpson13,
    /// Cubic interpolation over triples of subintervals.
    Simpson38,
}

impl Rule {
    /// All rules.
    pub const ALL: [Rule; 3] = [Rule::Trapezoidal, Rule::Simpson13, Rule::Simpson38];

    /// Display name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Rule::Trapezoidal => "Trapezoidal",
            Rule::Simpson13 => "Simpson 1/3",
            Rule::Simpson38 => "Simpson 3/8",
        }
    }

    /// Subintervals per panel.
    #[must_use]
    pub fn panel_width(self) -> usize {
        match self {
            Rule::Trapezoidal => 1,
            Rule::Simpson13 => 2,
            Rule::Simpson38 => 3,
        }
    }

    /// Total subintervals for `n` panels.
    #[must_use]
    pub fn subintervals(self, n: Partitions) -> usize {
        self.panel_width() * n.get()
    }

    /// Nodes used by the simple rule, endpoints included.
    #[must_use]
    pub fn simple_nodes(self) -> usize {
        self.panel_width() + 1
    }

    /// Node layout of the composite rule with `n` panels over `[a, b]`.
    #[must_use]
    pub fn layout(self, a: f64, b: f64, n: Partitions) -> Layout {
        let m = self.subintervals(n);
        #[allow(clippy::cast_precision_loss)]
        let h = (b - a) / m as f64;
        #[allow(clippy::cast_precision_loss)]
        let nodes = (1..m).map(|i| a + i as f64 * h).collect();
        let (prefactor, endpoint_weight, groups): (f64, f64, SmallVec<[Group; 3]>) = match self {
            Rule::Trapezoidal => (h, 0.5, smallvec![Group::new(1.0, 0, 1)]),
            Rule::Simpson13 => (
                h / 3.0,
                1.0,
                smallvec![Group::new(4.0, 0, 2), Group::new(2.0, 1, 2)],
            ),
            Rule::Simpson38 => (
                3.0 * h / 8.0,
                1.0,
                smallvec![
                    Group::new(3.0, 0, 3),
                    Group::new(3.0, 1, 3),
                    Group::new(2.0, 2, 3)
                ],
            ),
        };
        Layout {
            rule: self,
            n,
            a,
            b,
            h,
            nodes,
            groups,
            prefactor,
            endpoint_weight,
        }
    }

    /// The simple rule over `problem`.
    ///
    /// # Errors
    ///
    /// Fails if the integrand cannot be evaluated.
    pub fn simple(self, problem: &Problem, options: &QuadratureOptions) -> Result<Evaluation> {
        crate::single::simple(self, problem, options)
    }

    /// The composite rule with `n` panels over `problem`.
    ///
    /// # Errors
    ///
    /// Fails if the integrand cannot be evaluated.
    pub fn composite(
        self,
        problem: &Problem,
        n: Partitions,
        options: &QuadratureOptions,
    ) -> Result<Evaluation> {
        crate::single::composite(self, problem, n, options)
    }

    /// LaTeX for the `h` denominator multiplier, e.g. `2 \cdot n`.
    fn panels_latex(self, n: &str) -> String {
        match self {
            Rule::Trapezoidal => n.to_string(),
            Rule::Simpson13 => format!("2 \\cdot {n}"),
            Rule::Simpson38 => format!("3 \\cdot {n}"),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Interior nodes sharing one weight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Group {
    /// Weight of the group sum.
    pub weight: f64,
    /// Index of the first member among the interior nodes.
    pub offset: usize,
    /// Index step between members.
    pub stride: usize,
}

impl Group {
    fn new(weight: f64, offset: usize, stride: usize) -> Self {
        Self {
            weight,
            offset,
            stride,
        }
    }

    fn positions_latex(&self) -> String {
        let (o, s) = (self.offset, self.stride);
        format!("{o}, {}, {}, \\ldots", o + s, o + 2 * s)
    }
}

/// Where a rule samples the function and how it weighs the samples.
#[derive(Clone, Debug)]
pub struct Layout {
    /// The rule.
    pub rule: Rule,
    /// Panels.
    pub n: Partitions,
    /// Lower limit.
    pub a: f64,
    /// Upper limit.
    pub b: f64,
    /// Subinterval width.
    pub h: f64,
    /// Interior nodes `a + i·h`, ascending.
    pub nodes: Vec<f64>,
    /// Weighted node groups.
    pub groups: SmallVec<[Group; 3]>,
    /// Factor in front of the bracket.
    pub prefactor: f64,
    /// Weight of `f(a) + f(b)` inside the bracket.
    pub endpoint_weight: f64,
}

/// Values a function took on a [`Layout`].
#[derive(Clone, Debug)]
pub struct Sampled<T> {
    /// `f(a)`.
    pub fa: T,
    /// `f(b)`.
    pub fb: T,
    /// Member values per group.
    pub groups: Vec<Vec<T>>,
    /// Group sums.
    pub sums: Vec<T>,
    /// The weighted sum.
    pub value: T,
}

/// Values a rule can add up and scale.
pub trait Accumulate: Clone {
    /// Additive identity.
    fn zero() -> Self;

    /// `self + other`.
    #[must_use]
    fn plus(&self, other: &Self) -> Self;

    /// `k * self`.
    #[must_use]
    fn times(&self, k: f64) -> Self;

    /// Sum of a slice.
    #[must_use]
    fn total(items: &[Self]) -> Self {
        items.iter().fold(Self::zero(), |acc, x| acc.plus(x))
    }

    /// LaTeX rendering for traces.
    fn latex(&self) -> String;
}

impl Accumulate for f64 {
    fn zero() -> Self {
        0.0
    }

    fn plus(&self, other: &Self) -> Self {
        self + other
    }

    fn times(&self, k: f64) -> Self {
        k * self
    }

    fn total(items: &[Self]) -> Self {
        items.iter().sum()
    }

    fn latex(&self) -> String {
        num(*self)
    }
}

impl Accumulate for Expression {
    fn zero() -> Self {
        Expression::number(0.0)
    }

    fn plus(&self, other: &Self) -> Self {
        self.add(other)
    }

    fn times(&self, k: f64) -> Self {
        self.scale(k)
    }

    fn total(items: &[Self]) -> Self {
        Expression::sum_of(items)
    }

    fn latex(&self) -> String {
        self.to_latex()
    }
}

/// Names used when a layout writes its steps.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Labels {
    /// Function name: `f`, `g` or `G`.
    pub f: &'static str,
    /// Node variable.
    pub var: &'static str,
    /// Lower and upper limit names.
    pub lo: &'static str,
    pub hi: &'static str,
    /// Step width name.
    pub h: &'static str,
    /// Trailing arguments of `f`, e.g. `, y`.
    pub extra: &'static str,
}

impl Labels {
    pub(crate) const SINGLE: Labels = Labels {
        f: "f",
        var: "x",
        lo: "a",
        hi: "b",
        h: "h",
        extra: "",
    };

    pub(crate) fn call(&self, arg: &str) -> String {
        format!("{}({arg}{})", self.f, self.extra)
    }
}

impl Layout {
    /// Interior nodes of `group`.
    pub fn members<'a>(&'a self, group: &Group) -> impl Iterator<Item = f64> + 'a {
        self.nodes
            .iter()
            .skip(group.offset)
            .step_by(group.stride)
            .copied()
    }

    /// `a`, the interior nodes, then `b`.
    #[must_use]
    pub fn support_points(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.nodes.len() + 2);
        out.push(self.a);
        out.extend_from_slice(&self.nodes);
        out.push(self.b);
        out
    }

    /// Samples `f` at `a`, `b`, then each group in order, and combines.
    ///
    /// # Errors
    ///
    /// Propagates the first error of `f`.
    pub fn sample<T, F>(&self, mut f: F) -> Result<Sampled<T>>
    where
        T: Accumulate,
        F: FnMut(f64) -> Result<T>,
    {
        let fa = f(self.a)?;
        let fb = f(self.b)?;
        let mut groups = Vec::with_capacity(self.groups.len());
        for g in &self.groups {
            groups.push(self.members(g).map(&mut f).collect::<Result<Vec<T>>>()?);
        }
        let sums: Vec<T> = groups.iter().map(|vals| T::total(vals)).collect();
        let value = self.combine(&fa, &fb, &sums);
        Ok(Sampled {
            fa,
            fb,
            groups,
            sums,
            value,
        })
    }

    /// The weighted sum for given endpoint values and group sums.
    pub fn combine<T: Accumulate>(&self, fa: &T, fb: &T, sums: &[T]) -> T {
        let mut bracket = fa.plus(fb).times(self.endpoint_weight);
        for (g, s) in self.groups.iter().zip(sums) {
            bracket = bracket.plus(&s.times(g.weight));
        }
        bracket.times(self.prefactor)
    }

    fn bracket_latex(&self, h: &str, fa: &str, fb: &str, terms: &[(f64, String)]) -> String {
        let pre = match self.rule {
            Rule::Trapezoidal => h.to_string(),
            Rule::Simpson13 => format!("\\frac{{{h}}}{{3}}"),
            Rule::Simpson38 => format!("\\frac{{3 \\cdot {h}}}{{8}}"),
        };
        let mut body = if self.endpoint_weight == 1.0 {
            format!("{fa} + {fb}")
        } else {
            format!("\\frac{{1}}{{2}}\\left({fa} + {fb}\\right)")
        };
        for (weight, s) in terms {
            if *weight == 1.0 {
                body.push_str(&format!(" + {s}"));
            } else {
                body.push_str(&format!(" + {} \\cdot {s}", num(*weight)));
            }
        }
        format!("{pre} \\cdot \\left({body}\\right)")
    }

    /// Indices of groups with at least one member.
    fn active<T>(&self, s: &Sampled<T>) -> Vec<usize> {
        (0..self.groups.len())
            .filter(|&k| !s.groups[k].is_empty())
            .collect()
    }

    fn sum_names(&self) -> Vec<String> {
        (1..=self.groups.len()).map(|k| format!("S_{k}")).collect()
    }

    /// `Compute h` for a composite layout.
    pub(crate) fn h_step(&self, l: &Labels) -> Step {
        let n = self.n.to_string();
        Step::new(
            format!("Compute {}", l.h),
            format!(
                "{} = \\frac{{{} - {}}}{{{}}}",
                l.h,
                l.hi,
                l.lo,
                self.rule.panels_latex("n")
            ),
            format!(
                "{} = \\frac{{{} - {}}}{{{}}} = {}",
                l.h,
                num(self.b),
                num(self.a),
                self.rule.panels_latex(&n),
                num(self.h)
            ),
        )
    }

    /// `Compute the support points`.
    pub(crate) fn nodes_step(&self, l: &Labels) -> Step {
        Step::new(
            "Compute the support points",
            format!("{v}_i = {} + i \\cdot {}", l.lo, l.h, v = l.var),
            format!("{}_i = {}", l.var, nums(&self.nodes)),
        )
    }

    /// Evaluation of endpoints and groups, then the group sums.
    pub(crate) fn sample_steps<T: Accumulate>(&self, l: &Labels, s: &Sampled<T>) -> Vec<Step> {
        let mut steps = vec![Step::new(
            "Evaluate the endpoints",
            format!("{}, \\ {}", l.call(l.lo), l.call(l.hi)),
            format!(
                "{} = {}, \\ {} = {}",
                l.call(&num(self.a)),
                s.fa.latex(),
                l.call(&num(self.b)),
                s.fb.latex()
            ),
        )];
        let names = self.sum_names();
        let active = self.active(s);
        for &k in &active {
            let g = &self.groups[k];
            let points: Vec<f64> = self.members(g).collect();
            let term = l.call(&format!("{}_i", l.var));
            let formula = if self.groups.len() == 1 {
                format!("{} = \\sum {term}", names[k])
            } else {
                format!(
                    "{} = \\sum {term}, \\ i \\in \\{{{}\\}}",
                    names[k],
                    g.positions_latex()
                )
            };
            steps.push(Step::new(
                format!("Evaluate the support points of {}", names[k]),
                formula,
                format!(
                    "{}_i = {} \\Rightarrow {} = {}",
                    l.var,
                    nums(&points),
                    l.call(&format!("{}_i", l.var)),
                    list(&s.groups[k], T::latex)
                ),
            ));
        }
        if active.is_empty() {
            return steps;
        }
        let shown: Vec<&str> = active.iter().map(|&k| names[k].as_str()).collect();
        let sums: Vec<String> = active
            .iter()
            .map(|&k| format!("{} = {}", names[k], s.sums[k].latex()))
            .collect();
        steps.push(Step::new(
            "Add up each group",
            shown.join(", \\ "),
            sums.join(", \\ "),
        ));
        steps
    }

    /// `Apply the formula`, with an optional trailing correction term.
    pub(crate) fn formula_step<T: Accumulate>(
        &self,
        l: &Labels,
        s: &Sampled<T>,
        correction: Option<f64>,
        total: &T,
    ) -> Step {
        let names = self.sum_names();
        let active = self.active(s);
        let symbolic: Vec<(f64, String)> = active
            .iter()
            .map(|&k| (self.groups[k].weight, names[k].clone()))
            .collect();
        let substituted: Vec<(f64, String)> = active
            .iter()
            .map(|&k| (self.groups[k].weight, s.sums[k].latex()))
            .collect();
        let mut formula = self.bracket_latex(l.h, &l.call(l.lo), &l.call(l.hi), &symbolic);
        let mut result =
            self.bracket_latex(&num(self.h), &s.fa.latex(), &s.fb.latex(), &substituted);
        if let Some(rt) = correction {
            formula.push_str(" + R_t");
            result.push_str(&format!(" + {}", num(rt)));
        }
        Step::new(
            "Apply the formula",
            formula,
            format!("{result} = {}", total.latex()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(n: usize) -> Partitions {
        Partitions::new(n).unwrap()
    }

    #[test]
    fn test_subinterval_counts() {
        assert_eq!(Rule::Trapezoidal.subintervals(p(4)), 4);
        assert_eq!(Rule::Simpson13.subintervals(p(4)), 8);
        assert_eq!(Rule::Simpson38.subintervals(p(4)), 12);
        assert_eq!(Rule::Simpson38.simple_nodes(), 4);
    }

    #[test]
    fn test_simpson13_groups() {
        let l = Rule::Simpson13.layout(0.0, 6.0, p(3));
        assert_eq!(l.h, 1.0);
        assert_eq!(l.nodes, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        let s1: Vec<f64> = l.members(&l.groups[0]).collect();
        let s2: Vec<f64> = l.members(&l.groups[1]).collect();
        assert_eq!(s1, vec![1.0, 3.0, 5.0]);
        assert_eq!(s2, vec![2.0, 4.0]);
    }

    #[test]
    fn test_simpson38_groups() {
        let l = Rule::Simpson38.layout(0.0, 6.0, p(2));
        let got: Vec<Vec<f64>> = l.groups.iter().map(|g| l.members(g).collect()).collect();
        assert_eq!(got, vec![vec![1.0, 4.0], vec![2.0, 5.0], vec![3.0]]);
        assert_eq!(l.support_points().len(), 7);
    }

    #[test]
    fn test_every_node_is_weighted_once() {
        for rule in Rule::ALL {
            let l = rule.layout(-1.0, 2.0, p(5));
            let count: usize = l.groups.iter().map(|g| l.members(g).count()).sum();
            assert_eq!(count, l.nodes.len(), "{rule}");
        }
    }

    #[test]
    fn test_weights_integrate_constants() {
        for rule in Rule::ALL {
            let l = rule.layout(1.0, 4.0, p(3));
            let s = l.sample(|_| Ok(2.0)).unwrap();
            assert!((s.value - 6.0).abs() < 1e-12, "{rule}");
        }
    }

    #[test]
    fn test_expression_accumulation_matches_numbers() {
        let f = Expression::parse("x*y + y**2").unwrap();
        let l = Rule::Simpson13.layout(0.0, 1.0, p(2));
        let g = l.sample(|t| Ok(f.substitute("x", t))).unwrap().value;
        let at_two = l
            .sample(|t| Ok(f.eval(&[("x", t), ("y", 2.0)]).unwrap()))
            .unwrap()
            .value;
        assert!((g.eval_at("y", 2.0).unwrap() - at_two).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_interval() {
        let l = Rule::Trapezoidal.layout(2.0, 2.0, p(3));
        assert_eq!(l.h, 0.0);
        assert_eq!(l.sample(|t| Ok(t * t)).unwrap().value, 0.0);
    }

    #[test]
    fn test_formula_latex() {
        let l = Rule::Simpson38.layout(0.0, 6.0, p(2));
        let s = l.sample(|t| Ok(t)).unwrap();
        let step = l.formula_step(&Labels::SINGLE, &s, None, &s.value);
        assert_eq!(
            step.formula,
            "\\frac{3 \\cdot h}{8} \\cdot \\left(f(a) + f(b) + 3 \\cdot S_1 + 3 \\cdot S_2 + 2 \\cdot S_3\\right)"
        );
    }
}
