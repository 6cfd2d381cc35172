//! Scenario Comparison Example
//!
//! Optimizes every scenario in a fixture set concurrently and prints them side
//! by side.
//!
//! Use `-f` to load a fixture set by name

use std::{io, io::Write, time::Instant};

use anyhow::Result;
use clap::Parser;
use humanize_duration::{Truncate, prelude::DurationExt};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use atrium::{fixtures::Fixture, optimizer::compare_scenarios, utils::ExampleCompareArgs};

/// Scenario Comparison Example
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

    let args = ExampleCompareArgs::parse();

    let fixture = Fixture::from_set(&args.fixture)?;

    let start = Instant::now();

    let comparison = compare_scenarios(fixture.catalog()?, fixture.scenarios(), &args.config())?;

    let elapsed = start.elapsed();

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    comparison.write_to(&mut handle)?;

    writeln!(
        handle,
        " {} scenarios in {} ({}s)",
        comparison.len(),
        elapsed.human(Truncate::Nano),
        elapsed.as_secs_f32()
    )?;

    Ok(())
}
