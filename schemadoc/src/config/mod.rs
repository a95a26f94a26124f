//! Project layout and tool configuration.
//!
//! A project directory has a fixed shape: fragment sources under `schema/`,
//! templates, the legend and site configuration under `resources/`, and
//! the outputs `markdown/schema/`, `site/` and the scratch `temp/`
//! directory. External tool command lines and a few limits can be
//! overridden through environment variables.

use std::path::PathBuf;
use std::str::FromStr;

use schemadoc_core::ResolverOptions;
use schemadoc_core::resolver::DEFAULT_MAX_DEPTH;
use tracing::debug;

use crate::error::SchemaDocError;

/// Default documentation generator command.
pub const DEFAULT_DOC_GENERATOR: &str = "generate-schema-doc";

/// Default static-site builder command.
pub const DEFAULT_SITE_BUILDER: &str = "mkdocs";

/// Default location of the machine-readable schema linked from the
/// overview section.
pub const DEFAULT_SCHEMA_URL: &str =
    "https://github.com/ICPSR/metadata/blob/main/schema/icpsr_study_schema.json";

// ============================================================================
// Project Layout
// ============================================================================

/// Paths derived from the project directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    /// The project directory itself.
    pub source_dir: PathBuf,
    /// Static-site output.
    pub site_dir: PathBuf,
    /// Generated and curated markdown.
    pub markdown_dir: PathBuf,
    /// Templates, legend, site configuration and stylesheet.
    pub resource_dir: PathBuf,
    /// Resolved schema artifacts; removed after a successful build.
    pub temp_dir: PathBuf,
    /// Static-site builder configuration.
    pub site_config: PathBuf,
    /// Stylesheet copied over the site theme.
    pub theme_css: PathBuf,
    /// Legend injected before the detailed property section.
    pub legend: PathBuf,
    /// Template handed to the documentation generator.
    pub template: PathBuf,
}

impl ProjectLayout {
    #[must_use]
    pub fn from_source_dir(source_dir: impl Into<PathBuf>) -> Self {
        let source_dir = source_dir.into();
        let resource_dir = source_dir.join("resources");
        Self {
            site_dir: source_dir.join("site"),
            markdown_dir: source_dir.join("markdown").join("schema"),
            temp_dir: source_dir.join("temp"),
            site_config: resource_dir.join("mkdocs.yml"),
            theme_css: resource_dir.join("readthedocs_theme.css"),
            legend: resource_dir.join("key.md"),
            template: resource_dir.join("template").join("base.md"),
            resource_dir,
            source_dir,
        }
    }

    /// Fails with [`SchemaDocError::MissingSourceDir`] unless the project
    /// directory exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the project directory does not exist.
    pub fn ensure_source_exists(&self) -> Result<(), SchemaDocError> {
        if self.source_dir.exists() {
            Ok(())
        } else {
            Err(SchemaDocError::MissingSourceDir {
                path: self.source_dir.clone(),
            })
        }
    }

    /// Creates the output directories if they are missing.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be created.
    pub fn create_output_dirs(&self) -> Result<(), SchemaDocError> {
        for dir in [&self.temp_dir, &self.site_dir, &self.markdown_dir] {
            if !dir.exists() {
                debug!(dir = %dir.display(), "creating directory");
                std::fs::create_dir_all(dir)?;
            }
        }
        Ok(())
    }

    /// Markdown file generated for the artifact with file stem `stem`.
    #[must_use]
    pub fn markdown_path(&self, stem: &str) -> PathBuf {
        self.markdown_dir.join(format!("{stem}.md"))
    }

    /// Destination of the stylesheet inside the built site.
    #[must_use]
    pub fn site_theme_css(&self) -> PathBuf {
        self.site_dir.join("css").join("theme.css")
    }
}

// ============================================================================
// Tool Options
// ============================================================================

/// External tool command lines and limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOptions {
    /// Documentation generator command line, split with shell quoting.
    pub doc_generator: String,
    /// Static-site builder command line.
    pub site_builder: String,
    /// Link target of the machine-readable schema pointer.
    pub schema_url: String,
    /// Maximum `$ref` nesting.
    pub max_ref_depth: usize,
}

impl Default for ToolOptions {
    fn default() -> Self {
        Self {
            doc_generator: DEFAULT_DOC_GENERATOR.to_string(),
            site_builder: DEFAULT_SITE_BUILDER.to_string(),
            schema_url: DEFAULT_SCHEMA_URL.to_string(),
            max_ref_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ToolOptions {
    /// Reads overrides from the process environment.
    ///
    /// - `SCHEMADOC_DOC_GENERATOR`
    /// - `SCHEMADOC_SITE_BUILDER`
    /// - `SCHEMADOC_SCHEMA_URL`
    /// - `SCHEMADOC_MAX_REF_DEPTH`
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads overrides through `lookup`; unset or unparsable values fall
    /// back to the defaults.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            doc_generator: env_or(&lookup, "SCHEMADOC_DOC_GENERATOR", defaults.doc_generator),
            site_builder: env_or(&lookup, "SCHEMADOC_SITE_BUILDER", defaults.site_builder),
            schema_url: env_or(&lookup, "SCHEMADOC_SCHEMA_URL", defaults.schema_url),
            max_ref_depth: env_or(&lookup, "SCHEMADOC_MAX_REF_DEPTH", defaults.max_ref_depth),
        }
    }

    #[must_use]
    pub const fn resolver_options(&self) -> ResolverOptions {
        ResolverOptions {
            max_depth: self.max_ref_depth,
        }
    }
}

fn env_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> T {
    lookup(name)
        .filter(|v| !v.trim().is_empty())
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
