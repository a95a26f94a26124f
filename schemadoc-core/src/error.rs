//! Core error types for `schemadoc`
//!
//! Loading, resolution and persistence errors shared across the workspace.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Schema Errors
// ============================================================================

/// Errors raised while loading, resolving or persisting schema fragments.
///
/// Every variant is fatal for a pipeline run: one bad fragment aborts the
/// whole build.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A schema fragment has no `$id` field.
    #[error("schema file {path} does not contain an $id field")]
    MissingIdentifier {
        /// File the fragment was read from
        path: PathBuf,
    },

    /// Two fragments declare the same `$id`.
    #[error(
        "schema file {path} uses an $id value ({id}) that is already in use by {existing}"
    )]
    DuplicateIdentifier {
        /// The colliding identifier
        id: String,
        /// File that tried to register the identifier
        path: PathBuf,
        /// File that registered the identifier first
        existing: PathBuf,
    },

    /// A `$ref` names an identifier that is not in the cache.
    #[error("cannot find {id} in the schema cache{}", suggestion.as_ref().map_or_else(String::new, |s| format!(" (did you mean '{s}'?)")))]
    UnresolvedReference {
        /// The missing identifier
        id: String,
        /// Closest cached identifier, if any is close enough
        suggestion: Option<String>,
    },

    /// A chain of `$ref`s leads back to an identifier still being resolved.
    #[error("circular reference detected: {}", cycle.join(" -> "))]
    CircularReference {
        /// Identifiers forming the cycle, first and last entries are equal
        cycle: Vec<String>,
    },

    /// Reference nesting exceeded the configured maximum.
    #[error("reference nesting of {depth} levels exceeds the maximum of {max}")]
    DepthExceeded {
        /// Depth that was about to be entered
        depth: usize,
        /// Configured maximum
        max: usize,
    },

    /// A non-vocabulary schema has no `title` and cannot be persisted.
    #[error("cannot persist schema because it does not contain a title element: {id}")]
    MissingTitle {
        /// Identifier of the untitled schema
        id: String,
    },

    /// A fragment file could not be parsed.
    #[error("parse error in {path}{}: {message}", line.map_or_else(String::new, |l| format!(" (line {l})")))]
    ParseError {
        /// Path to the fragment file
        path: PathBuf,
        /// Line number where the error occurred (if available)
        line: Option<usize>,
        /// Error message from the parser
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, SchemaError>;
