//! `schemadoc` - documentation builder for interlinked schema files

use clap::Parser;

use schemadoc::cli::args::Cli;
use schemadoc::cli::commands;
use schemadoc::error::ExitCode;
use schemadoc::observability::init_logging;

fn main() {
    let cli = Cli::parse();

    if !cli.quiet {
        init_logging(cli.log_format, cli.verbose, cli.color);
    }

    match commands::dispatch(cli) {
        Ok(()) => std::process::exit(ExitCode::SUCCESS),
        Err(e) => {
            tracing::error!(error = %e, "run aborted");
            eprintln!("error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
