//! # Shard Bus Runtime
//!
//! Harness around the `shard-bus` crate: configuration, workload
//! generation, the timed exchange and the final report.
//!
//! ## Run Sequence
//!
//! 1. Validate configuration (pair counts, sizes)
//! 2. Build the bus (all cells and channels up front)
//! 3. Generate every producer's messages and check their sizes
//! 4. Precompute shard keys to report the spread
//! 5. Start consumers, then producers; join them all
//! 6. Report elapsed time and throughput
//!
//! Any failure in steps 1-3 aborts the run before a single message moves.

pub mod args;
pub mod report;
pub mod workload;

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use shard_bus::{Bus, Exchange};
use tracing::{info, warn};

pub use args::{ReportFormat, RuntimeArgs};
pub use report::RunReport;
pub use workload::Workload;

/// Execute one full run, writing progress and the report to `out`.
///
/// # Errors
///
/// Configuration and message-size errors before the exchange, task
/// failures during it, and write errors on `out`.
pub fn run<W: Write>(args: &RuntimeArgs, out: &mut W) -> Result<RunReport> {
    let text = args.report == ReportFormat::Text;
    let config = args.bus_config().context("Invalid bus configuration")?;

    if text {
        writeln!(out, "Initializing event data bus: size: {}", config.shard_count)?;
    }
    let bus = Arc::new(Bus::new(config.clone()).context("Failed to build bus")?);

    let messages_total = args.messages_total();
    if text {
        writeln!(out, "Generating messages: total: {messages_total}")?;
    }
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let workload = Workload::generate(
        &mut rng,
        config.producers,
        args.messages_per_producer,
        config.max_message_size,
    )
    .context("Failed to generate messages")?;

    if text {
        writeln!(out, "Calculating messages bus keys")?;
    }
    let spread = workload.shard_spread(&bus);
    info!(
        shards_used = spread,
        shards = config.shard_count,
        "Workload keyed"
    );

    if text {
        writeln!(out, "Producers: {}", config.producers)?;
        writeln!(out, "Consumers: {}", config.consumers)?;
        writeln!(out, "Sending messages ...")?;
    }

    let exchange = Exchange::new(Arc::clone(&bus))
        .run(workload.into_inner())
        .context("Exchange failed")?;

    let report = RunReport::new(&config, messages_total, &exchange);
    if report.anomalies > 0 {
        warn!(anomalies = report.anomalies, "Run completed with anomalies");
    }

    match args.report {
        ReportFormat::Text => write!(out, "{}", report.render_text())?,
        ReportFormat::Json => writeln!(out, "{}", report.to_json()?)?,
    }

    Ok(report)
}
