//! Rewrite of the generated markdown into curated documentation.
//!
//! The generator's output is walked line by line. Several rules read ahead
//! (a heading pulls in its description, a type line folds in its format
//! qualifier) and write those later lines immediately; the indices they
//! consume are recorded in a [`ProcessedIndexSet`] so the sequential visit
//! skips them.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};

use crate::error::DocsError;
use crate::markdown::TransformContext;
use crate::markdown::document::MarkdownDocument;
use crate::markdown::fixup::AUTOGENERATED_MARKER;
use crate::markdown::label::{accepted_values, clean_label, friendly_format, friendly_type_cell};

type Result<T> = std::result::Result<T, DocsError>;

// ============================================================================
// Document contract
// ============================================================================

/// Link-style label in the first cell of a property table row.
static PROPERTY_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(#([^\)]+)\)").expect("valid regex"));

/// Anchor marker of a heading.
static HEADING_ANCHOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"#+\s*<a name="([^"]+)">"#).expect("valid regex"));

const TABLE_ROW_PREFIX: &str = "| [";
const TABLE_ROW_DELIMITERS: usize = 6;
const ANCHOR_OPEN: &str = "<a name=";
const ANCHOR_CLOSE: &str = "</a>";
const TYPE_PREFIX: &str = "**Type**";
const FORMAT_PREFIX: &str = "**Format**:";
const ADDITIONAL_PROPERTIES_MARKER: &str =
    r#"**Additional properties**: [[Not allowed]](# "Additional Properties not allowed.")"#;
const LABEL_DECORATIONS: &[&str] = &["[optional]", "[required]"];

const DETAILED_HEADING: &str = "## Metadata Elements: Detailed Information";
const OVERVIEW_HEADING: &str = "## Metadata Elements: Overview";

// ============================================================================
// Types
// ============================================================================

/// What the property table says about one property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    /// Mandatory cell, trimmed (`Yes`/`No`).
    pub mandatory: String,
    /// Repeatable cell, trimmed.
    pub repeatable: String,
    /// Data-type cell as written, padding included.
    pub data_type: String,
    /// Label as the generator wrote it.
    pub orig_label: String,
    /// Label after [`clean_label`].
    pub cleaned_label: String,
}

/// Property descriptors keyed by anchor name.
pub type PropertyIndex = HashMap<String, PropertyDescriptor>;

/// Source line indices already written or consumed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessedIndexSet(HashSet<usize>);

impl ProcessedIndexSet {
    /// Records `index`. Returns false if it was already recorded.
    pub fn mark(&mut self, index: usize) -> bool {
        self.0.insert(index)
    }

    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.0.contains(&index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One output line and the source index it was written for, if any.
/// Synthesized lines (legend, section headings, summaries) have no source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedLine {
    pub text: String,
    pub source: Option<usize>,
}

/// Result of [`transform`].
#[derive(Debug, Clone, Default)]
pub struct TransformOutput {
    /// Output lines in order.
    pub lines: Vec<EmittedLine>,
    /// Every source index written or consumed.
    pub processed: ProcessedIndexSet,
    /// Descriptors collected from the property tables.
    pub properties: PropertyIndex,
}

impl TransformOutput {
    /// Output text, one line per entry, newline-terminated.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&line.text);
            out.push('\n');
        }
        out
    }

    /// Output lines without their source indices.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|line| line.text.as_str())
    }
}

// ============================================================================
// Transform
// ============================================================================

/// Rewrites `doc` into curated documentation.
///
/// Lines the fixup pass suppressed are dropped. Each source index is
/// written at most once.
///
/// # Errors
///
/// Returns [`DocsError::MissingDescription`] if a described property
/// heading has no line two below it.
pub fn transform(doc: &MarkdownDocument, ctx: &TransformContext) -> Result<TransformOutput> {
    Transformer::new(doc, ctx).run()
}

struct Transformer<'a> {
    doc: &'a MarkdownDocument,
    ctx: &'a TransformContext,
    properties: PropertyIndex,
    processed: ProcessedIndexSet,
    output: Vec<EmittedLine>,
    legend_injected: bool,
    description_seen: bool,
}

impl<'a> Transformer<'a> {
    fn new(doc: &'a MarkdownDocument, ctx: &'a TransformContext) -> Self {
        Self {
            doc,
            ctx,
            properties: PropertyIndex::new(),
            processed: ProcessedIndexSet::default(),
            output: Vec::with_capacity(doc.len() + ctx.legend.len()),
            legend_injected: false,
            description_seen: false,
        }
    }

    fn run(mut self) -> Result<TransformOutput> {
        let doc = self.doc;
        for (index, line) in doc.lines().iter().enumerate() {
            if self.processed.contains(index) {
                trace!(index, "already written");
                continue;
            }
            if doc.is_suppressed(index) {
                self.processed.mark(index);
                continue;
            }
            self.apply_rules(index, line)?;
        }

        debug!(
            lines_in = doc.len(),
            lines_out = self.output.len(),
            properties = self.properties.len(),
            "transformed markdown"
        );

        Ok(TransformOutput {
            lines: self.output,
            processed: self.processed,
            properties: self.properties,
        })
    }

    fn apply_rules(&mut self, index: usize, line: &str) -> Result<()> {
        if let Some(row) = PropertyRow::parse(line) {
            self.property_row(index, row);
        } else if line.contains("##") && line.contains(ANCHOR_OPEN) {
            self.heading(index, line)?;
        } else if line.starts_with(TYPE_PREFIX) {
            self.type_annotation(index, line);
        } else if line.contains(ADDITIONAL_PROPERTIES_MARKER) {
            self.consume(index);
            self.consume(index + 1);
        } else if self.is_schema_description(line) {
            self.schema_description(index, line);
        } else {
            self.emit_source(index, line.to_string());
        }
        Ok(())
    }

    fn property_row(&mut self, index: usize, row: PropertyRow<'_>) {
        let descriptor = PropertyDescriptor {
            mandatory: row.cells[2].trim().to_string(),
            repeatable: row.cells[3].trim().to_string(),
            data_type: row.cells[4].to_string(),
            cleaned_label: clean_label(row.label.trim()),
            orig_label: row.label,
        };

        let mut cells: Vec<String> = row.cells.iter().map(|c| (*c).to_string()).collect();
        cells[1] = cells[1].replace(
            &format!("[{}]", descriptor.orig_label),
            &format!("[{}]", descriptor.cleaned_label),
        );
        cells[4] = friendly_type_cell(&descriptor.data_type);

        trace!(anchor = %row.anchor, label = %descriptor.cleaned_label, "property row");
        self.properties.insert(row.anchor, descriptor);
        self.emit_source(index, cells.join("|"));
    }

    fn heading(&mut self, index: usize, line: &str) -> Result<()> {
        if !self.legend_injected {
            self.inject_legend();
        }

        let Some(anchor) = HEADING_ANCHOR.captures(line).map(|c| c[1].to_string()) else {
            self.emit_source(index, line.to_string());
            return Ok(());
        };

        if anchor.contains(AUTOGENERATED_MARKER) {
            self.emit_source(index, format!("#{line}"));
            return Ok(());
        }

        let Some(entry) = self.properties.get(&anchor).cloned() else {
            trace!(%anchor, "heading without property row");
            self.emit_source(index, line.to_string());
            return Ok(());
        };

        let description = self
            .doc
            .line(index + 2)
            .map(str::to_string)
            .ok_or_else(|| DocsError::MissingDescription {
                anchor: anchor.clone(),
                line: index,
            })?;

        self.emit_source(index, format!("#{}", relabel_heading(line, &entry)));
        self.emit(String::new());
        self.emit_source(index + 2, description);
        self.emit(String::new());
        self.consume(index + 3);
        self.emit(format!("**Required**: {}", entry.mandatory));
        self.emit(String::new());
        self.emit(format!("**Repeatable**: {}", entry.repeatable));
        Ok(())
    }

    fn inject_legend(&mut self) {
        self.legend_injected = true;
        for line in &self.ctx.legend {
            self.output.push(EmittedLine {
                text: line.clone(),
                source: None,
            });
        }
        self.emit(String::new());
        self.emit(DETAILED_HEADING.to_string());
        self.emit(String::new());
    }

    fn type_annotation(&mut self, index: usize, line: &str) {
        let declared = annotation_value(line);

        let format = self
            .doc
            .line(index + 2)
            .filter(|next| next.starts_with(FORMAT_PREFIX) && !self.doc.is_suppressed(index + 2))
            .map(|next| friendly_format(&annotation_value(next)));
        if format.is_some() {
            self.consume(index + 2);
            self.consume(index + 3);
        }

        let phrase = accepted_values(&declared, format.as_deref());
        self.emit_source(index, format!("**Accepted Values**: {phrase}"));
    }

    fn is_schema_description(&self, line: &str) -> bool {
        !self.description_seen
            && self
                .ctx
                .schema_description
                .as_deref()
                .is_some_and(|d| !d.is_empty() && line.contains(d))
    }

    fn schema_description(&mut self, index: usize, line: &str) {
        self.description_seen = true;
        self.emit_source(index, line.to_string());
        self.emit(String::new());
        self.consume(index + 1);
        self.emit(format!(
            "For a machine-actionable copy of this information, please see the [JSON Schema version]({})",
            self.ctx.schema_url
        ));
        self.emit(String::new());
        self.emit(OVERVIEW_HEADING.to_string());
        self.emit(String::new());
    }

    /// Writes `text` for source line `index` unless that index is out of
    /// range, suppressed, or already processed.
    fn emit_source(&mut self, index: usize, text: String) -> bool {
        if index >= self.doc.len() || self.doc.is_suppressed(index) || !self.processed.mark(index)
        {
            return false;
        }
        self.output.push(EmittedLine {
            text,
            source: Some(index),
        });
        true
    }

    fn emit(&mut self, text: String) {
        self.output.push(EmittedLine { text, source: None });
    }

    /// Marks `index` processed without writing it.
    fn consume(&mut self, index: usize) {
        if index < self.doc.len() {
            self.processed.mark(index);
        }
    }
}

// ============================================================================
// Line parsing
// ============================================================================

/// A property table row split into its delimiter-separated cells.
struct PropertyRow<'l> {
    cells: Vec<&'l str>,
    label: String,
    anchor: String,
}

impl<'l> PropertyRow<'l> {
    fn parse(line: &'l str) -> Option<Self> {
        if !line.starts_with(TABLE_ROW_PREFIX) || line.matches('|').count() != TABLE_ROW_DELIMITERS
        {
            return None;
        }
        let cells: Vec<&str> = line.split('|').collect();
        let caps = PROPERTY_LINK.captures(cells[1])?;
        Some(Self {
            label: caps[1].to_string(),
            anchor: caps[2].trim().to_string(),
            cells,
        })
    }
}

/// Heading text with required/optional decorations removed and the cleaned
/// label substituted. The anchor marker is left untouched.
fn relabel_heading(line: &str, entry: &PropertyDescriptor) -> String {
    let Some((marker, text)) = line.split_once(ANCHOR_CLOSE) else {
        return line.to_string();
    };
    let text = LABEL_DECORATIONS
        .iter()
        .fold(text.to_string(), |text, decoration| text.replace(decoration, ""))
        .replace(&entry.orig_label, &entry.cleaned_label);
    format!("{marker}{ANCHOR_CLOSE}{}", text.trim_end())
}

/// Value after the first colon of a `**Key**: `value`` line, without
/// backticks.
fn annotation_value(line: &str) -> String {
    line.split(':')
        .nth(1)
        .unwrap_or_default()
        .trim()
        .replace('`', "")
}
