//! loghint -- command-line front end for the hints config generator.
//!
//! Reads a discovery event from a JSON file, renders the log input configs its
//! hints describe, and inspects configuration and module manifests.

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::output::OutputWriter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init_tracing(cli.log_level.as_deref(), cli.output) {
        eprintln!("error: {e}");
        std::process::exit(e.exit_code());
    }

    loghint_core::metrics::describe_all();

    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let writer = OutputWriter::new(cli.output);

    match cli.command {
        Commands::Render(args) => commands::render::execute(args, &cli.config, &writer).await,
        Commands::Modules(args) => commands::modules::execute(args, &cli.config, &writer).await,
        Commands::Config(args) => commands::config::execute(args, &cli.config, &writer).await,
    }
}
