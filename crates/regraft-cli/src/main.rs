mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod utils;

use crate::cli::{Cli, Commands};
use crate::error::{CliError, Result};
use clap::Parser;
use regraft::workflows::error::PipelineError;
use tracing::{debug, error, info};

/// Distinguished exit code for a failed rank-1 model selection.
const EXIT_PREDICTION_MISSING: i32 = 3;

fn main() {
    let cli = Cli::parse();
    if let Err(e) = logging::setup_logging(cli.verbose, cli.quiet, &cli.log_file) {
        eprintln!("Failed to initialize logging: {e}");
        std::process::exit(1);
    }

    if let Err(e) = run_app(cli) {
        error!("Command failed: {e}");
        eprintln!("\n❌ Error: {e}");
        std::process::exit(exit_code(&e));
    }
}

fn run_app(cli: Cli) -> Result<()> {
    info!("REGRAFT CLI v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    match cli.command {
        Commands::Demo(args) => commands::demo::run(args),
        Commands::Prep(args) => commands::prep::run(args),
        Commands::Hhsearch(args) => commands::hhsearch::run(args),
        Commands::Af2(args) => commands::af2::run(args),
        Commands::Graft(args) => commands::graft::run(args),
        Commands::Qc(args) => commands::qc::run(args),
        Commands::All(args) => commands::all::run(args),
    }?;

    info!("Command completed successfully.");
    Ok(())
}

fn exit_code(error: &CliError) -> i32 {
    match error {
        CliError::Pipeline(PipelineError::PredictionMissing { .. }) => EXIT_PREDICTION_MISSING,
        _ => 1,
    }
}
