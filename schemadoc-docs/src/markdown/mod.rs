//! Post-processing of generator markdown.
//!
//! The entry point is [`curate`], which runs the array fixup pass over the
//! generated document and then the main transform.

pub mod document;
pub mod fixup;
pub mod label;
pub mod transform;

pub use document::MarkdownDocument;
pub use fixup::{FixupReport, fix_arrays};
pub use label::clean_label;
pub use transform::{
    EmittedLine, ProcessedIndexSet, PropertyDescriptor, PropertyIndex, TransformOutput, transform,
};

use crate::error::DocsError;

/// Inputs to the transform that do not come from the generated document.
#[derive(Debug, Clone, Default)]
pub struct TransformContext {
    /// Legend lines injected before the first property heading.
    pub legend: Vec<String>,
    /// Top-level description of the schema, used to place the overview
    /// section.
    pub schema_description: Option<String>,
    /// Location of the machine-readable schema.
    pub schema_url: String,
}

/// Runs the fixup pass and the transform over `doc`, returning the curated
/// text.
///
/// # Errors
///
/// Returns [`DocsError::MissingDescription`] if a described property
/// heading has no description line.
pub fn curate(mut doc: MarkdownDocument, ctx: &TransformContext) -> Result<String, DocsError> {
    fix_arrays(&mut doc);
    Ok(transform(&doc, ctx)?.render())
}
