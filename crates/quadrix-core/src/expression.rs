//! Owned, immutable symbolic expressions.
//!
//! An [`Expression`] pairs an arena with a root handle. Every operation
//! returns a new expression in folded form and leaves the receiver alone,
//! so expressions can be shared freely across threads and sub-problems.

use std::fmt;

use smallvec::SmallVec;

use crate::arena::ExprArena;
use crate::diff::nth_derivative;
use crate::display::{Notation, Printer};
use crate::error::{CoreError, ParseError};
use crate::eval::{evaluate, Env};
use crate::expr::{ExprNode, Operands};
use crate::fold::{fold, product, sum};
use crate::handle::ExprHandle;
use crate::parse::parse_into;
use crate::poly::{collect_polynomial, DensePoly};
use crate::subst::substitute;

/// A symbolic function of zero or more named variables.
#[derive(Clone, Debug)]
pub struct Expression {
    arena: ExprArena,
    root: ExprHandle,
}

impl Expression {
    /// Parses calculator notation such as `x**2 + sin(x)`.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when the text is not a valid expression.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut arena = ExprArena::new();
        let root = parse_into(&mut arena, text)?;
        Ok(Self::from_parts(arena, root))
    }

    /// Wraps an arena and root, folding the root.
    #[must_use]
    pub fn from_parts(mut arena: ExprArena, root: ExprHandle) -> Self {
        let root = fold(&mut arena, root);
        Self { arena, root }
    }

    /// A constant expression.
    #[must_use]
    pub fn number(value: f64) -> Self {
        let mut arena = ExprArena::new();
        let root = arena.number(value);
        Self { arena, root }
    }

    /// A single variable.
    #[must_use]
    pub fn symbol(name: &str) -> Self {
        let mut arena = ExprArena::new();
        let root = arena.symbol(name);
        Self { arena, root }
    }

    /// The underlying arena.
    #[must_use]
    pub fn arena(&self) -> &ExprArena {
        &self.arena
    }

    /// The root handle within [`Self::arena`].
    #[must_use]
    pub fn root(&self) -> ExprHandle {
        self.root
    }

    /// Returns the value if the expression is a plain number.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        self.arena.get(self.root).as_number()
    }

    /// Names of the variables that occur in the expression, in first-seen order.
    #[must_use]
    pub fn free_symbols(&self) -> Vec<String> {
        let mut seen = Vec::new();
        let mut stack = vec![self.root];
        let mut visited = hashbrown::HashSet::new();
        while let Some(h) = stack.pop() {
            if !visited.insert(h) {
                continue;
            }
            match self.arena.get(h) {
                ExprNode::Symbol(id) => {
                    let name = self.arena.symbol_name(*id).unwrap_or("?").to_string();
                    if !seen.contains(&name) {
                        seen.push(name);
                    }
                }
                node => stack.extend(node.children().into_iter().rev()),
            }
        }
        seen
    }

    /// Returns true if `var` occurs in the expression.
    #[must_use]
    pub fn depends_on(&self, var: &str) -> bool {
        self.free_symbols().iter().any(|s| s == var)
    }

    /// Evaluates with the given variable values.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnboundSymbol`] if a variable has no value.
    pub fn eval(&self, bindings: &[(&str, f64)]) -> Result<f64, CoreError> {
        let mut env = Env::new();
        for &(name, value) in bindings {
            if let Some(id) = self.arena.symbol_id(name) {
                env.set(id, value);
            }
        }
        evaluate(&self.arena, self.root, &env)
    }

    /// Evaluates a function of one variable at `value`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnboundSymbol`] if another variable occurs.
    pub fn eval_at(&self, var: &str, value: f64) -> Result<f64, CoreError> {
        self.eval(&[(var, value)])
    }

    /// Replaces `var` with a number.
    #[must_use]
    pub fn substitute(&self, var: &str, value: f64) -> Self {
        let Some(id) = self.arena.symbol_id(var) else {
            return self.clone();
        };
        let mut arena = self.arena.clone();
        let with = arena.number(value);
        let root = substitute(&mut arena, self.root, id, with);
        Self { arena, root }
    }

    /// Replaces `var` with another expression.
    #[must_use]
    pub fn substitute_expr(&self, var: &str, with: &Expression) -> Self {
        let Some(id) = self.arena.symbol_id(var) else {
            return self.clone();
        };
        let mut arena = self.arena.clone();
        let with = arena.import(&with.arena, with.root);
        let root = substitute(&mut arena, self.root, id, with);
        Self { arena, root }
    }

    /// Renames the variable `from` to `to`.
    #[must_use]
    pub fn rename(&self, from: &str, to: &str) -> Self {
        self.substitute_expr(from, &Self::symbol(to))
    }

    /// First derivative with respect to `var`.
    #[must_use]
    pub fn derivative(&self, var: &str) -> Self {
        self.nth_derivative(var, 1)
    }

    /// Derivative of order `order` with respect to `var`.
    #[must_use]
    pub fn nth_derivative(&self, var: &str, order: usize) -> Self {
        let mut arena = self.arena.clone();
        let id = arena.intern_symbol(var);
        let root = nth_derivative(&mut arena, self.root, id, order);
        Self { arena, root }
    }

    /// The expression as a polynomial in `var`, if it is one.
    #[must_use]
    pub fn as_polynomial(&self, var: &str) -> Option<DensePoly> {
        // An id no node uses: the expression is then constant in `var`.
        let id = self.arena.symbol_id(var).unwrap_or(u32::MAX);
        collect_polynomial(&self.arena, self.root, id)
    }

    /// Polynomial degree in `var`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NonPolynomial`] for anything that is not a
    /// polynomial in `var` alone.
    pub fn degree(&self, var: &str) -> Result<usize, CoreError> {
        self.as_polynomial(var)
            .map(|p| p.degree())
            .ok_or_else(|| CoreError::NonPolynomial {
                var: var.to_string(),
            })
    }

    /// `self + other`.
    #[must_use]
    pub fn add(&self, other: &Expression) -> Self {
        self.combine(other, |arena, a, b| sum(arena, &[a, b]))
    }

    /// `self * other`.
    #[must_use]
    pub fn mul(&self, other: &Expression) -> Self {
        self.combine(other, |arena, a, b| product(arena, &[a, b]))
    }

    /// `k * self`.
    #[must_use]
    pub fn scale(&self, k: f64) -> Self {
        let mut arena = self.arena.clone();
        let c = arena.number(k);
        let root = product(&mut arena, &[c, self.root]);
        Self { arena, root }
    }

    /// Sum of many expressions in one arena; the empty sum is `0`.
    #[must_use]
    pub fn sum_of<'a>(terms: impl IntoIterator<Item = &'a Expression>) -> Self {
        let mut arena = ExprArena::new();
        let handles: Operands = terms
            .into_iter()
            .map(|t| arena.import(&t.arena, t.root))
            .collect::<SmallVec<_>>();
        let root = sum(&mut arena, &handles);
        Self { arena, root }
    }

    fn combine(
        &self,
        other: &Expression,
        op: impl FnOnce(&mut ExprArena, ExprHandle, ExprHandle) -> ExprHandle,
    ) -> Self {
        let mut arena = self.arena.clone();
        let b = arena.import(&other.arena, other.root);
        let root = op(&mut arena, self.root, b);
        Self { arena, root }
    }

    /// LaTeX rendering.
    #[must_use]
    pub fn to_latex(&self) -> String {
        Printer::new(&self.arena, Notation::Latex).render(self.root)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&Printer::new(&self.arena, Notation::Plain).render(self.root))
    }
}

impl std::str::FromStr for Expression {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_eval() {
        let e = Expression::parse("x**2 + 1").unwrap();
        assert!((e.eval_at("x", 3.0).unwrap() - 10.0).abs() < 1e-12);
        assert_eq!(e.to_string(), "x**2 + 1");
    }

    #[test]
    fn test_rename_and_substitute() {
        let f = Expression::parse("x*y + y**2").unwrap();
        let g = f.substitute("x", 2.0).rename("y", "x");
        assert_eq!(g.free_symbols(), vec!["x".to_string()]);
        assert!((g.eval_at("x", 3.0).unwrap() - 15.0).abs() < 1e-12);
    }

    #[test]
    fn test_substitute_expression() {
        let f = Expression::parse("y**2").unwrap();
        let g = f.substitute_expr("y", &Expression::parse("x + 1").unwrap());
        assert!((g.eval_at("x", 2.0).unwrap() - 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_degree() {
        let e = Expression::parse("3*x**5 - x").unwrap();
        assert_eq!(e.degree("x").unwrap(), 5);
        assert_eq!(e.nth_derivative("x", 4).degree("x").unwrap(), 1);
        let s = Expression::parse("sin(x)").unwrap();
        assert!(matches!(s.degree("x"), Err(CoreError::NonPolynomial { .. })));
    }

    #[test]
    fn test_combinators() {
        let a = Expression::parse("x").unwrap();
        let b = Expression::parse("2*x + 1").unwrap();
        let c = Expression::sum_of([&a, &b, &Expression::number(-1.0)]);
        assert_eq!(c.to_string(), "3*x");
        assert_eq!(a.mul(&b).scale(0.0).as_number(), Some(0.0));
    }

    #[test]
    fn test_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Expression>();
    }
}
