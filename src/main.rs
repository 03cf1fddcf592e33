//! `bom-merge`: merge license scanner BOM fragments into consolidated BOM files.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]) and load config ([`config::load_config`]).
//! 2. Load the optional override table ([`ingest::load_overrides`]).
//! 3. Ingest every fragment in `--in` ([`ingest::ingest_dir`]).
//! 4. Reduce, filter and override the resolved projects ([`transform`]).
//! 5. Resolve VCS roots for both tables ([`vcs`]).
//! 6. Write `bom.json` and `bom_error.json` ([`writer`]).
//! 7. Print the summary ([`report`]).
//!
//! Any failure is fatal: it is logged and the process exits with status `1`.

mod cli;
mod config;
mod error;
mod ingest;
mod models;
mod pipeline;
mod report;
mod transform;
mod vcs;
mod writer;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;
use config::{load_config, Settings};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(&cli) {
        tracing::error!("{:#}", err);
        // Always visible, whatever the log filter.
        eprintln!("{} {:#}", "error:".red().bold(), err);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let settings = Settings::resolve(cli, config);

    let detector = pipeline::build_detector(&settings)?;
    let outcome = pipeline::run(&settings, &detector)?;

    report::terminal::render(&outcome, cli.verbose, cli.quiet);
    Ok(())
}

/// `RUST_LOG` wins; otherwise `debug` with `--verbose` and `warn` by default.
fn init_logging(verbose: bool) {
    let log_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
