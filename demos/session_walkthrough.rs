//! Walks one integrand through every method and prints the results.
//!
//! Run with `RUST_LOG=quadrix_quadrature=debug` to see the spans and the
//! intermediate quantities logged by the library.

use quadrix::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn print_report(session: &mut IntegrationSession) -> Result<(), QuadratureError> {
    let report = session.errors()?;
    println!(
        "{:<48} {:>14.10}  (exact {:.10})",
        session.method_name().unwrap_or("?"),
        session.solution().unwrap_or(f64::NAN),
        report.exact()
    );
    for (kind, value) in report.iter() {
        match value {
            Some(v) => println!("    {:<11} {v:+.3e}", kind.label()),
            None => println!("    {:<11} -", kind.label()),
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut session = IntegrationSession::parse("x**4 - 2*x + exp(x)", "0", "2")?;
    info!("single integrals");
    for rule in Rule::ALL {
        session.simple(rule)?;
        print_report(&mut session)?;
        session.composite(rule, 4)?;
        print_report(&mut session)?;
    }
    for order in [4, 6, 8] {
        session.romberg(Rule::Trapezoidal, order)?;
        print_report(&mut session)?;
    }

    info!("double integrals");
    let mut rect = IntegrationSession::parse("x**2*y + y", "0", "1")?;
    rect.double(Rule::Trapezoidal, ("0", "2"), 4)?;
    print_report(&mut rect)?;

    let mut region = IntegrationSession::parse("x*y", "x**2", "x")?;
    region.double(Rule::Simpson13, ("0", "1"), 2)?;
    print_report(&mut region)?;

    let last = region.trace().steps().last().map(serde_json::to_string_pretty);
    if let Some(json) = last {
        println!("\nlast step of the variable-limit trace:\n{}", json?);
    }
    println!("\n{} steps recorded for the first session", session.trace().len());
    Ok(())
}
