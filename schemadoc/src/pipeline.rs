//! The documentation build pipeline.
//!
//! load → resolve → persist → generate markdown → curate → build site.
//! Stages run in sequence; the first error aborts the run and leaves the
//! scratch directory in place for inspection.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use schemadoc_core::{FragmentLoader, PersistedArtifact, persist_all, resolve_cache};
use schemadoc_docs::markdown::{MarkdownDocument, TransformContext, curate};
use tracing::{debug, info, warn};

use crate::config::{ProjectLayout, ToolOptions};
use crate::error::SchemaDocError;
use crate::external;

/// Line index at which the "last updated" stamp is inserted.
const DATE_STAMP_LINE: usize = 2;

/// Options for a full build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Keep `temp/` after a successful run.
    pub keep_temp: bool,
    /// Run the static-site builder after writing markdown.
    pub build_site: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            keep_temp: false,
            build_site: true,
        }
    }
}

/// What a build produced.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Resolved schema artifacts written to `temp/`.
    pub artifacts: Vec<PersistedArtifact>,
    /// Curated markdown files.
    pub markdown: Vec<PathBuf>,
}

/// One pipeline run over a project directory.
#[derive(Debug, Clone)]
pub struct Pipeline {
    layout: ProjectLayout,
    tools: ToolOptions,
}

impl Pipeline {
    #[must_use]
    pub const fn new(layout: ProjectLayout, tools: ToolOptions) -> Self {
        Self { layout, tools }
    }

    #[must_use]
    pub const fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    /// Loads, resolves and persists every titled schema into `temp/`.
    ///
    /// # Errors
    ///
    /// Returns an error if the project directory is missing or any
    /// fragment fails to load, resolve, or persist.
    pub fn resolve(&self) -> Result<Vec<PersistedArtifact>, SchemaDocError> {
        self.layout.ensure_source_exists()?;
        self.layout.create_output_dirs()?;

        info!("producing cache");
        let cache = FragmentLoader::new(&self.layout.source_dir).load()?;
        debug!(fragments = cache.len(), "schema cache loaded");
        let resolved = resolve_cache(&cache, self.tools.resolver_options())?;

        info!(dir = %self.layout.temp_dir.display(), "saving resolved schemas");
        let artifacts = persist_all(&resolved, &self.layout.temp_dir)?;
        Ok(artifacts)
    }

    /// Runs the whole pipeline.
    ///
    /// # Errors
    ///
    /// Returns the first error of any stage.
    pub fn build(&self, options: BuildOptions) -> Result<BuildReport, SchemaDocError> {
        let artifacts = self.resolve()?;
        let legend = read_legend(&self.layout.legend)?;

        let mut markdown = Vec::with_capacity(artifacts.len());
        for artifact in &artifacts {
            markdown.push(self.render_markdown(artifact, &legend)?);
        }

        if options.build_site {
            self.site()?;
        }

        if !options.keep_temp {
            info!("removing temp folder");
            remove_dir_if_present(&self.layout.temp_dir)?;
        }

        info!(schemas = artifacts.len(), "all done");
        Ok(BuildReport {
            artifacts,
            markdown,
        })
    }

    /// Builds the static site and installs the theme stylesheet.
    ///
    /// # Errors
    ///
    /// Returns an error if the site configuration is unreadable, the site
    /// builder fails, or the stylesheet cannot be copied.
    pub fn site(&self) -> Result<(), SchemaDocError> {
        self.layout.ensure_source_exists()?;
        fs::create_dir_all(&self.layout.site_dir)?;

        check_site_config(&self.layout.site_config)?;
        external::build_site(&self.tools, &self.layout)?;

        let theme = self.layout.site_theme_css();
        if let Some(parent) = theme.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&self.layout.theme_css, &theme)?;
        debug!(dest = %theme.display(), "installed theme stylesheet");
        Ok(())
    }

    /// Generates markdown for one artifact and rewrites it in place.
    fn render_markdown(
        &self,
        artifact: &PersistedArtifact,
        legend: &[String],
    ) -> Result<PathBuf, SchemaDocError> {
        let output = self.layout.markdown_path(&artifact.stem());
        external::generate_markdown(&self.tools, &self.layout, &artifact.path, &output)?;

        info!(file = %output.display(), "fixing labels");
        let mut doc = MarkdownDocument::parse(&fs::read_to_string(&output)?);
        stamp_date(&mut doc, Local::now().date_naive());

        let ctx = TransformContext {
            legend: legend.to_vec(),
            schema_description: artifact.description.clone(),
            schema_url: self.tools.schema_url.clone(),
        };
        fs::write(&output, curate(doc, &ctx)?)?;
        Ok(output)
    }
}

/// Inserts the "last updated" line and a blank line below the title block.
pub fn stamp_date(doc: &mut MarkdownDocument, date: NaiveDate) {
    doc.insert_lines(
        DATE_STAMP_LINE,
        &[
            format!("Last updated: {}", date.format("%B %d, %Y")),
            String::new(),
        ],
    );
}

/// Legend lines, or none if the project has no legend file.
fn read_legend(path: &Path) -> Result<Vec<String>, SchemaDocError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(text.lines().map(str::to_string).collect()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "legend file not found, continuing without it");
            Ok(Vec::new())
        }
        Err(e) => Err(e.into()),
    }
}

/// Fails early on a site configuration the site builder could not read.
fn check_site_config(path: &Path) -> Result<(), SchemaDocError> {
    let text = fs::read_to_string(path)?;
    let config: serde_yaml::Value = serde_yaml::from_str(&text)?;
    debug!(
        site_name = config.get("site_name").and_then(serde_yaml::Value::as_str).unwrap_or_default(),
        "site configuration"
    );
    Ok(())
}

fn remove_dir_if_present(dir: &Path) -> Result<(), SchemaDocError> {
    match fs::remove_dir_all(dir) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
        _ => Ok(()),
    }
}
