//! spanlab - span labelings and online classification
//!
//! # Usage
//!
//! ```bash
//! # Replay a log and list instances with offsets
//! spanlab labels --docs corpus/ --ops gold.ops --format strings --offsets
//!
//! # Inline XML for one document
//! spanlab labels --docs corpus/ --ops gold.ops --format markup --doc d17
//!
//! # Train and evaluate an averaged linear perceptron
//! spanlab train --train train.txt --test test.txt --degree 0 --mode averaged
//! ```

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;
mod parser;

use output::color;
use parser::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let result = match cli.command {
        Commands::Labels(args) => commands::labels::run(args),
        Commands::Train(args) => commands::train::run(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", color("31", "error:"), e);
            ExitCode::FAILURE
        }
    }
}
