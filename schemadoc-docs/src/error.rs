//! Error types for markdown post-processing.

use thiserror::Error;

/// Errors that can occur while rewriting generated markdown.
#[derive(Debug, Error)]
pub enum DocsError {
    /// A property heading has no description line two lines below it.
    #[error("property heading '{anchor}' at line {line} has no description line")]
    MissingDescription {
        /// Anchor name of the heading
        anchor: String,
        /// Zero-based line index of the heading
        line: usize,
    },
}
