//! # quadrix-core
//!
//! Symbolic expression engine behind the quadrix quadrature toolkit.
//!
//! This crate provides:
//! - Arena-allocated expression storage with hash-consing
//! - A parser for calculator notation (`x**2 + sin(x)`)
//! - Numeric evaluation, substitution and symbolic differentiation
//! - Constant folding into a canonical form
//! - Polynomial recognition and degree queries
//! - Plain and LaTeX rendering
//!
//! Most callers only need [`Expression`], an owned immutable wrapper around
//! an arena and a root handle.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod arena;
pub mod diff;
pub mod display;
pub mod error;
pub mod eval;
pub mod expr;
pub mod expression;
pub mod fold;
pub mod handle;
pub mod intern;
pub mod literal;
pub mod parse;
pub mod poly;
pub mod subst;

mod proptests;

pub use arena::ExprArena;
pub use display::{format_number, Notation};
pub use error::{CoreError, ParseError};
pub use expr::{ExprNode, Func, SymbolId};
pub use expression::Expression;
pub use handle::ExprHandle;
pub use literal::Literal;
pub use poly::DensePoly;
