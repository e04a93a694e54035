//! Numerical integration used when the power rule does not apply.

pub mod adaptive;
pub mod gauss_kronrod;

pub use adaptive::{adaptive_integrate, AdaptiveResult};
pub use gauss_kronrod::{g7k15, GkEstimate};
