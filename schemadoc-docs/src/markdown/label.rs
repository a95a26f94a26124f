//! Label and data-type phrasing.

use std::sync::LazyLock;

use regex::Regex;

/// Ordered corrections applied after title-casing.
///
/// `(Doi)` must be fixed before bare `Doi` is expanded, otherwise a label
/// that was already cleaned would expand a second time.
static LABEL_CORRECTIONS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"\bTo\b", "to"),
        (r"\bOf\b", "of"),
        (r"\bId\b", "ID"),
        (r"\bIds\b", "IDs"),
        (r"\(Doi\)", "(DOI)"),
        (r"\bDoi\b", "Digital Object Identifier (DOI)"),
        (r"\bSda\b", "SDA"),
        (r"\bIcpsr\b", "ICPSR"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| (Regex::new(pattern).expect("valid regex"), replacement))
    .collect()
});

/// Turn a raw property identifier into a display label.
///
/// `study_title` becomes `Study Title`, `doi` becomes
/// `Digital Object Identifier (DOI)`. Applying it to its own output
/// returns the same string.
#[must_use]
pub fn clean_label(raw: &str) -> String {
    let spaced = raw.replace('_', " ");
    LABEL_CORRECTIONS
        .iter()
        .fold(title_case(spaced.trim()), |label, (pattern, replacement)| {
            pattern.replace_all(&label, *replacement).into_owned()
        })
}

/// Upper-cases the first letter of every run of letters and lower-cases
/// the rest.
///
/// A letter whose upper case is several characters (`ß` is `SS`) keeps
/// only the first one upper-cased, and the word boundary is judged on the
/// characters already written, so the result is stable under a second pass.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if out.chars().next_back().is_some_and(char::is_alphabetic) {
            out.extend(c.to_lowercase());
        } else {
            let mut upper = c.to_uppercase();
            out.extend(upper.next());
            out.extend(upper.flat_map(char::to_lowercase));
        }
    }
    out
}

/// Friendly phrase for the data-type cell of a property table row.
///
/// The phrase replaces the cell's text but keeps its trailing padding, and
/// is itself padded to the original width when shorter, so the table's
/// column alignment survives.
#[must_use]
pub fn friendly_type_cell(cell: &str) -> String {
    let phrase = if cell.contains("string") {
        " Text"
    } else if cell.contains("integer") {
        " Number"
    } else if cell.contains("object") {
        " Multi-part; see subfields"
    } else {
        return cell.to_string();
    };

    let text_len = cell.trim_end().len();
    let trailing = &cell[text_len..];
    format!("{phrase:<text_len$}{trailing}")
}

/// Human phrase for a declared type on a `**Type**:` line.
///
/// `format` is the already-friendly format qualifier, if one was declared.
#[must_use]
pub fn accepted_values(declared: &str, format: Option<&str>) -> String {
    if declared.contains("string") {
        match format {
            Some(f) if !f.is_empty() => format!("Text (formatted as a {f})"),
            _ => "Text".to_string(),
        }
    } else if declared.contains("integer") {
        "Number".to_string()
    } else if declared.contains("object") {
        "Multi-part element; see subfield definitions for more information.".to_string()
    } else {
        declared.to_string()
    }
}

/// Friendlier names for format qualifiers.
const FORMAT_NAMES: &[(&str, &str)] = &[
    ("uri", "URL"),
    ("uri-reference", "URL reference"),
    ("email", "email address"),
];

/// Friendly name for a format qualifier such as `uri`.
#[must_use]
pub fn friendly_format(format: &str) -> String {
    FORMAT_NAMES
        .iter()
        .find(|(name, _)| *name == format)
        .map_or_else(|| format.to_string(), |(_, friendly)| (*friendly).to_string())
}
