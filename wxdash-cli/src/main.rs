//! Binary crate for the `wxdash` command-line dashboard.
//!
//! This crate focuses on:
//! - Parsing CLI arguments and setting up logging
//! - Interactive configuration and theme toggling
//! - Drawing the dashboard in the terminal

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod terminal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    init_tracing(cmd.verbose);
    cmd.run().await
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "wxdash=debug,wxdash_core=debug"
    } else {
        "wxdash=info,wxdash_core=info"
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default));
    let fmt = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr);

    tracing_subscriber::registry().with(filter).with(fmt).init();
}
