//! `resolve` command handler.
//!
//! Prints the resolved schema artifacts in human or JSON format.

use serde_json::json;

use crate::cli::args::{OutputFormat, ResolveArgs};
use crate::error::SchemaDocError;
use crate::pipeline::Pipeline;

/// Execute `resolve`.
///
/// # Errors
///
/// Returns an error if loading, resolving or persisting fails.
pub fn run(pipeline: &Pipeline, args: &ResolveArgs) -> Result<(), SchemaDocError> {
    let artifacts = pipeline.resolve()?;

    match args.format {
        OutputFormat::Human => {
            for artifact in &artifacts {
                println!("{}\t{}", artifact.id, artifact.path.display());
            }
        }
        OutputFormat::Json => {
            let listing: Vec<_> = artifacts
                .iter()
                .map(|a| {
                    json!({
                        "id": a.id,
                        "title": a.title,
                        "path": a.path.display().to_string(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
    }
    Ok(())
}
