//! # Shard Bus Runtime
//!
//! Entry point of the `shardbus` executable.
//!
//! Logs go to stderr through `tracing`; the progress lines and the report go
//! to stdout. A configuration error exits non-zero before any throughput is
//! printed.

use std::io;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use bus_runtime::RuntimeArgs;

fn main() -> Result<()> {
    let args = RuntimeArgs::parse();

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(true)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    bus_runtime::run(&args, &mut out)?;

    Ok(())
}
