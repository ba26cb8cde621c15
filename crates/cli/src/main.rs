//! webotron - Deploy static websites to S3
//!
//! Creates buckets, configures them for public website hosting, and
//! uploads a local directory tree into them.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod commands;
mod exit_code;
mod output;

use commands::Cli;

const DEBUG_FILTER: &str = "webotron=debug,webotron_core=debug,webotron_s3=debug";

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so --json output on stdout stays parseable
    let filter = if cli.global.debug {
        EnvFilter::new(DEBUG_FILTER)
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let exit_code = commands::execute(cli).await;

    std::process::exit(exit_code.as_i32());
}
