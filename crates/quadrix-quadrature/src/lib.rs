//! # quadrix-quadrature
//!
//! Newton-Cotes quadrature with auditable step traces.
//!
//! - **Rules**: Trapezoidal, Simpson 1/3 and Simpson 3/8, simple and
//!   composite ([`Rule`], [`simple`], [`composite`])
//! - **Error estimates**: derivative-based truncation terms
//!   ([`ErrorEstimator`]) and true/relative errors against an exact
//!   reference ([`Evaluation::report`])
//! - **Double integrals**: rectangles and regions with limits that depend on
//!   `x` ([`double`])
//! - **Romberg extrapolation** over any composite rule ([`romberg`])
//! - **Sessions**: a stateful wrapper that keeps the latest result and an
//!   ever-growing trace ([`IntegrationSession`])
//! - **Batches**: independent problems evaluated in parallel
//!   ([`evaluate_batch`])
//!
//! Every method is a pure function of an immutable problem and returns a
//! fresh [`Evaluation`].
//!
//! # Example
//!
//! ```
//! use quadrix_quadrature::{composite, Partitions, Problem, QuadratureOptions, Rule};
//!
//! let problem = Problem::parse("x**2", 0.0, 1.0).unwrap();
//! let ev = composite(
//!     Rule::Simpson13,
//!     &problem,
//!     Partitions::new(2).unwrap(),
//!     &QuadratureOptions::default(),
//! )
//! .unwrap();
//! assert!((ev.value - 1.0 / 3.0).abs() < 1e-12);
//! assert_eq!(ev.method, "Composite Simpson 1/3");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod double;
pub mod error;
pub mod estimate;
pub mod evaluation;
pub mod method;
pub mod options;
pub mod partitions;
pub mod problem;
pub mod romberg;
pub mod rule;
pub mod session;
pub mod single;
pub mod trace;

mod proptests;

pub use double::double;
pub use error::{QuadratureError, Result};
pub use estimate::{ErrorEstimator, ErrorFields, ErrorKind, ErrorReport};
pub use evaluation::{Domain, Evaluation};
pub use method::{evaluate, evaluate_batch, Integral, Method, Request};
pub use options::QuadratureOptions;
pub use partitions::Partitions;
pub use problem::{parse_expression, Bound, DoubleProblem, Interval, Problem, X, Y};
pub use romberg::{base_panels, romberg};
pub use rule::{Accumulate, Group, Layout, Rule, Sampled};
pub use session::IntegrationSession;
pub use single::{composite, simple};
pub use trace::{Step, Trace};
