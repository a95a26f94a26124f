//! `site` command handler.

use crate::error::SchemaDocError;
use crate::pipeline::Pipeline;

/// Execute `site`: build the static site from existing markdown.
///
/// # Errors
///
/// Returns an error if the site builder fails or the stylesheet cannot be
/// installed.
pub fn run(pipeline: &Pipeline) -> Result<(), SchemaDocError> {
    pipeline.site()
}
