//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod build;
pub mod resolve;
pub mod site;

use crate::cli::args::{BuildArgs, Cli, Commands};
use crate::config::{ProjectLayout, ToolOptions};
use crate::error::SchemaDocError;
use crate::pipeline::Pipeline;

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// Without a subcommand the full build runs.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub fn dispatch(cli: Cli) -> Result<(), SchemaDocError> {
    let pipeline = Pipeline::new(
        ProjectLayout::from_source_dir(cli.source_dir),
        ToolOptions::from_env(),
    );

    match cli.command {
        None => build::run(&pipeline, &BuildArgs::default()),
        Some(Commands::Build(args)) => build::run(&pipeline, &args),
        Some(Commands::Resolve(args)) => resolve::run(&pipeline, &args),
        Some(Commands::Site) => site::run(&pipeline),
    }
}
