//! Line buffer for a generated markdown document.

use std::collections::BTreeSet;
use std::fmt;

/// A generated markdown document held as lines, plus the set of lines the
/// fixup pass marked for suppression.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkdownDocument {
    lines: Vec<String>,
    suppressed: BTreeSet<usize>,
}

impl MarkdownDocument {
    /// Splits `text` into lines. Line terminators are not kept.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        Self::from_lines(text.lines().map(str::to_string).collect())
    }

    /// Wraps already-split lines.
    #[must_use]
    pub const fn from_lines(lines: Vec<String>) -> Self {
        Self {
            lines,
            suppressed: BTreeSet::new(),
        }
    }

    /// All lines in order.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The line at `index`, if any.
    #[must_use]
    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns true if the document has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Replaces the text of the line at `index`. Out-of-range indices are
    /// ignored.
    pub fn set_line(&mut self, index: usize, text: String) {
        if let Some(line) = self.lines.get_mut(index) {
            *line = text;
        }
    }

    /// Inserts `lines` before `index` (clamped to the end of the
    /// document). Suppression marks at or after `index` move with their
    /// lines.
    pub fn insert_lines(&mut self, index: usize, lines: &[String]) {
        let at = index.min(self.lines.len());
        let shift = lines.len();
        self.lines.splice(at..at, lines.iter().cloned());
        self.suppressed = self
            .suppressed
            .iter()
            .map(|&i| if i >= at { i + shift } else { i })
            .collect();
    }

    /// Marks the line at `index` for suppression. Returns false if the
    /// index is out of range or already marked.
    pub fn suppress(&mut self, index: usize) -> bool {
        index < self.lines.len() && self.suppressed.insert(index)
    }

    /// Returns true if the line at `index` is marked for suppression.
    #[must_use]
    pub fn is_suppressed(&self, index: usize) -> bool {
        self.suppressed.contains(&index)
    }

    /// Indices marked for suppression, ascending.
    pub fn suppressed(&self) -> impl Iterator<Item = usize> + '_ {
        self.suppressed.iter().copied()
    }
}

impl fmt::Display for MarkdownDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
