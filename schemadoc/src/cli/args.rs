//! CLI argument definitions
//!
//! All Clap derive structs for `schemadoc` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::observability::LogFormat;

// ============================================================================
// Root CLI
// ============================================================================

/// Build human-readable documentation from interlinked schema files.
#[derive(Parser, Debug)]
#[command(name = "schemadoc", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute (defaults to `build`).
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Project directory containing `schema/` and `resources/`.
    #[arg(long, env = "SCHEMADOC_SOURCE_DIR")]
    pub source_dir: PathBuf,

    /// Increase verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "SCHEMADOC_COLOR")]
    pub color: ColorChoice,

    /// Log output format.
    #[arg(long, default_value = "human", global = true)]
    pub log_format: LogFormat,
}

// ============================================================================
// Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve schemas, generate curated markdown, and build the site.
    Build(BuildArgs),

    /// Resolve and persist schemas only, keeping the artifacts.
    Resolve(ResolveArgs),

    /// Build the static site from existing markdown.
    Site,
}

/// Arguments for `build`.
#[derive(Args, Debug, Default)]
pub struct BuildArgs {
    /// Keep the `temp/` directory with the resolved schema artifacts.
    #[arg(long)]
    pub keep_temp: bool,

    /// Stop after writing markdown; do not run the site builder.
    #[arg(long)]
    pub no_site: bool,
}

/// Arguments for `resolve`.
#[derive(Args, Debug, Default)]
pub struct ResolveArgs {
    /// Output format for the list of written artifacts.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}
