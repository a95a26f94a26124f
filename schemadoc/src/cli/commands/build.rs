//! `build` command handler.

use tracing::info;

use crate::cli::args::BuildArgs;
use crate::error::SchemaDocError;
use crate::pipeline::{BuildOptions, Pipeline};

/// Execute `build`.
///
/// # Errors
///
/// Returns the first error of any pipeline stage.
pub fn run(pipeline: &Pipeline, args: &BuildArgs) -> Result<(), SchemaDocError> {
    info!(source_dir = %pipeline.layout().source_dir.display(), "building documentation");

    let report = pipeline.build(BuildOptions {
        keep_temp: args.keep_temp,
        build_site: !args.no_site,
    })?;

    for path in &report.markdown {
        info!(file = %path.display(), "wrote markdown");
    }
    Ok(())
}
