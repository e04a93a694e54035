//! # quadrix-simplify
//!
//! Equality saturation simplifier for quadrix expressions, built on `egg`.
//!
//! The quadrature core uses it to tidy the intermediate function `g(y)` of a
//! rectangular double integral before it is written to the step trace. The
//! folded form from `quadrix-core` already merges like terms; the e-graph
//! adds the identities folding cannot see, such as `sin²y + cos²y = 1`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod convert;
pub mod cost;
pub mod engine;
pub mod language;
pub mod rules;

pub use engine::{Simplifier, SimplifierConfig};
pub use language::QuadLang;
