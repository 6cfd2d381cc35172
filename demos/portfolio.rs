//! Optimized Portfolio Example
//!
//! Loads a catalog and optimizes one scenario over it.
//!
//! Use `-f` to load a fixture set by name
//! Use `-s` to pick a named scenario from the set
//! Use `--budget`, `--ltv`, `--rate`, `--years`, `--force` and `--exclude` to describe one instead
//! Set `RUST_LOG=atrium=debug` to see the search diagnostics

use std::{io, io::Write, time::Instant};

use anyhow::Result;
use clap::Parser;
use humanize_duration::{Truncate, prelude::DurationExt};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use atrium::{
    fixtures::Fixture, optimizer::optimize, statement::Statement, utils::ExamplePortfolioArgs,
};

/// Optimized Portfolio Example
#[expect(clippy::print_stdout, reason = "Example program output to user")]
pub fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_target(true)
                .with_writer(io::stderr),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .try_init()?;

    let args = ExamplePortfolioArgs::parse();

    let fixture = Fixture::from_set(&args.fixture)?;
    let catalog = fixture.catalog()?;
    let scenario = args.scenario(&fixture)?;

    let start = Instant::now();

    let result = optimize(catalog, &scenario, &args.config())?;

    let elapsed = start.elapsed();

    println!("\n Scenario: {}", scenario.name);

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    Statement::new(&result).write_to(&mut handle)?;

    writeln!(
        handle,
        " {} ({}s)",
        elapsed.human(Truncate::Nano),
        elapsed.as_secs_f32()
    )?;

    Ok(())
}
