//! Error types for `schemadoc`
//!
//! The top-level error aggregates the core and docs errors with the
//! failures of the CLI's own collaborators (source directory checks and
//! external tools), and maps all of them to a process exit code.

use std::path::PathBuf;

use schemadoc_core::SchemaError;
use schemadoc_docs::error::DocsError;
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `schemadoc` CLI operations.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// Any failure; a run either completes or aborts as a whole
    pub const ERROR: i32 = 1;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `schemadoc` operations.
#[derive(Debug, Error)]
pub enum SchemaDocError {
    /// Loading, resolving, or persisting schema fragments failed
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Rewriting generated markdown failed
    #[error(transparent)]
    Docs(#[from] DocsError),

    /// The project directory given on the command line does not exist
    #[error("`{}` does not exist. Please verify path and try again", path.display())]
    MissingSourceDir {
        /// Path given on the command line
        path: PathBuf,
    },

    /// An external tool ran but reported failure
    #[error("{tool} failed ({status})")]
    ExternalTool {
        /// Display name of the tool
        tool: String,
        /// Exit status as reported by the OS
        status: String,
    },

    /// An external tool could not be started
    #[error("failed to start {tool}: {message}")]
    SpawnFailed {
        /// Display name of the tool
        tool: String,
        /// Error from the OS
        message: String,
    },

    /// A configured tool command line cannot be split into words
    #[error("invalid {tool} command: '{command}'")]
    InvalidCommand {
        /// Display name of the tool
        tool: String,
        /// The command line as configured
        command: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl SchemaDocError {
    /// Returns the exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Schema(_)
            | Self::Docs(_)
            | Self::MissingSourceDir { .. }
            | Self::ExternalTool { .. }
            | Self::SpawnFailed { .. }
            | Self::InvalidCommand { .. }
            | Self::Io(_)
            | Self::Json(_)
            | Self::Yaml(_) => ExitCode::ERROR,
        }
    }
}
