//! External tool invocation.
//!
//! The documentation generator and the static-site builder are separate
//! programs. Their command lines come from [`ToolOptions`] and are split
//! with shell quoting rules, so a wrapper such as `python -m pkg` works.
//! A non-zero exit aborts the run.

use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use tracing::{debug, info};

use crate::config::{ProjectLayout, ToolOptions};
use crate::error::SchemaDocError;

const DOC_GENERATOR: &str = "documentation generator";
const SITE_BUILDER: &str = "site builder";

/// A configured external program plus its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    tool: String,
    program: OsString,
    args: Vec<OsString>,
}

impl ExternalCommand {
    /// Splits `command_line` into program and leading arguments.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaDocError::InvalidCommand`] if the command line has
    /// unbalanced quoting or is empty.
    pub fn parse(tool: &str, command_line: &str) -> Result<Self, SchemaDocError> {
        let invalid = || SchemaDocError::InvalidCommand {
            tool: tool.to_string(),
            command: command_line.to_string(),
        };
        let mut words = shlex::split(command_line).ok_or_else(invalid)?.into_iter();
        let program = words.next().ok_or_else(invalid)?;
        Ok(Self {
            tool: tool.to_string(),
            program: program.into(),
            args: words.map(OsString::from).collect(),
        })
    }

    /// Appends an argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Program and arguments as passed to the OS.
    pub fn argv(&self) -> impl Iterator<Item = &OsString> {
        std::iter::once(&self.program).chain(&self.args)
    }

    /// Runs the command to completion with inherited stdio.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaDocError::SpawnFailed`] if the program cannot be
    /// started and [`SchemaDocError::ExternalTool`] if it exits
    /// unsuccessfully.
    pub fn run(&self) -> Result<(), SchemaDocError> {
        debug!(tool = %self.tool, argv = ?self.argv().collect::<Vec<_>>(), "running external tool");

        let status = Command::new(&self.program)
            .args(&self.args)
            .status()
            .map_err(|e| SchemaDocError::SpawnFailed {
                tool: self.tool.clone(),
                message: format!("{}: {e}", self.program.to_string_lossy()),
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(SchemaDocError::ExternalTool {
                tool: self.tool.clone(),
                status: status.to_string(),
            })
        }
    }
}

/// Command that renders `artifact` to markdown at `output`.
///
/// # Errors
///
/// Returns an error if the configured generator command is invalid.
pub fn generator_command(
    tools: &ToolOptions,
    layout: &ProjectLayout,
    artifact: &Path,
    output: &Path,
) -> Result<ExternalCommand, SchemaDocError> {
    let mut template = OsString::from("custom_template_path=");
    template.push(&layout.template);

    Ok(ExternalCommand::parse(DOC_GENERATOR, &tools.doc_generator)?
        .arg("--config")
        .arg(template)
        .arg("--config")
        .arg("show_toc=false")
        .arg("--config")
        .arg("show_breadcrumbs=false")
        .arg(artifact)
        .arg(output))
}

/// Command that builds the static site from the site configuration.
///
/// # Errors
///
/// Returns an error if the configured site builder command is invalid.
pub fn site_builder_command(
    tools: &ToolOptions,
    layout: &ProjectLayout,
) -> Result<ExternalCommand, SchemaDocError> {
    Ok(ExternalCommand::parse(SITE_BUILDER, &tools.site_builder)?
        .arg("build")
        .arg("-f")
        .arg(&layout.site_config)
        .arg("--clean")
        .arg("--verbose"))
}

/// Renders `artifact` to markdown at `output`.
///
/// # Errors
///
/// Returns an error if the generator cannot be run or fails.
pub fn generate_markdown(
    tools: &ToolOptions,
    layout: &ProjectLayout,
    artifact: &Path,
    output: &Path,
) -> Result<(), SchemaDocError> {
    info!(artifact = %artifact.display(), "creating markdown");
    generator_command(tools, layout, artifact, output)?.run()
}

/// Builds the static site.
///
/// # Errors
///
/// Returns an error if the site builder cannot be run or fails.
pub fn build_site(tools: &ToolOptions, layout: &ProjectLayout) -> Result<(), SchemaDocError> {
    info!(config = %layout.site_config.display(), "building site");
    site_builder_command(tools, layout)?.run()
}
