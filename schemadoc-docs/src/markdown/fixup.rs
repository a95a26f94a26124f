//! Suppression of array item boilerplate.
//!
//! For every array property the generator writes an auto-generated
//! `... items` section describing the element type. Scalar element
//! sections carry no information the property heading doesn't already
//! give, so the whole block is dropped. Object element sections are kept
//! as the parent of the subfield headings but relabelled.

use tracing::debug;

use crate::markdown::document::MarkdownDocument;

/// Type declaration of an array of enumerated strings.
pub const ENUM_ARRAY_TYPE: &str = "**Type**: `array of enum (of string)`";

/// Type declaration of an array of plain strings.
pub const STRING_ARRAY_TYPE: &str = "**Type**: `array of string`";

/// Type declaration of an array of objects.
pub const OBJECT_ARRAY_TYPE: &str = "**Type**: `array of object`";

/// Anchor fragment of generator-named headings.
pub const AUTOGENERATED_MARKER: &str = "autogenerated_heading";

/// Heading text marking an element-type section.
const ITEMS_MARKER: &str = "items";

/// Lines dropped for a scalar element section, starting at its heading.
const SCALAR_BLOCK_LEN: usize = 4;

/// How an element-type section is rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// Elements are strings (plain or enumerated).
    ScalarArray,
    /// Elements are objects with their own subfields.
    ObjectArray,
}

/// Container declarations recognised by the pass, in processing order.
pub const CONTAINER_DECLARATIONS: &[(&str, ContainerKind)] = &[
    (ENUM_ARRAY_TYPE, ContainerKind::ScalarArray),
    (STRING_ARRAY_TYPE, ContainerKind::ScalarArray),
    (OBJECT_ARRAY_TYPE, ContainerKind::ObjectArray),
];

/// Counts of what the pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixupReport {
    /// Scalar element sections suppressed.
    pub scalar_sections: usize,
    /// Object element sections relabelled.
    pub object_sections: usize,
}

/// Marks array item boilerplate in `doc` for suppression.
///
/// Lines already marked are invisible to later declarations, so a section
/// is rewritten at most once.
pub fn fix_arrays(doc: &mut MarkdownDocument) -> FixupReport {
    let mut report = FixupReport::default();

    for &(declaration, kind) in CONTAINER_DECLARATIONS {
        let headings = find_item_headings(doc, declaration);
        for heading in headings {
            match kind {
                ContainerKind::ScalarArray => {
                    for offset in 0..SCALAR_BLOCK_LEN {
                        doc.suppress(heading + offset);
                    }
                    report.scalar_sections += 1;
                }
                ContainerKind::ObjectArray => {
                    if let Some(line) = doc.line(heading) {
                        let relabelled = line.replace(" items", " Subfields:");
                        doc.set_line(heading, relabelled);
                    }
                    doc.suppress(heading + 2);
                    doc.suppress(heading + 3);
                    report.object_sections += 1;
                }
            }
        }
    }

    debug!(
        scalar = report.scalar_sections,
        object = report.object_sections,
        "fixed array item sections"
    );
    report
}

/// For every line declaring `declaration`, the nearest following
/// element-type heading. Each heading is returned once.
fn find_item_headings(doc: &MarkdownDocument, declaration: &str) -> Vec<usize> {
    let visible = |index: usize| !doc.is_suppressed(index);
    let mut headings = Vec::new();

    for (index, line) in doc.lines().iter().enumerate() {
        if !visible(index) || !line.contains(declaration) {
            continue;
        }
        let target = (index + 1..doc.len()).find(|&next| {
            visible(next) && doc.line(next).is_some_and(is_item_heading)
        });
        if let Some(target) = target {
            if !headings.contains(&target) {
                headings.push(target);
            }
        }
    }

    headings
}

/// Returns true for a generator-named element-type heading.
fn is_item_heading(line: &str) -> bool {
    line.contains(AUTOGENERATED_MARKER) && line.contains(ITEMS_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(lines: &[&str]) -> MarkdownDocument {
        MarkdownDocument::from_lines(lines.iter().map(|s| (*s).to_string()).collect())
    }

    fn suppressed(doc: &MarkdownDocument) -> Vec<usize> {
        doc.suppressed().collect()
    }

    #[test]
    fn test_scalar_array_suppresses_four_lines() {
        let mut d = doc(&[
            "**Type**: `array of string`",                                   // 0
            "",                                                              // 1
            "#### <a name=\"keywords_items\"></a>1.1. keywords items",       // 2 not autogenerated
            "#### <a name=\"autogenerated_heading_2\"></a>1.1. keywords items", // 3
            "",                                                              // 4
            "**Type**: `string`",                                            // 5
            "",                                                              // 6
            "next",                                                          // 7
        ]);
        let report = fix_arrays(&mut d);
        assert_eq!(report.scalar_sections, 1);
        assert_eq!(suppressed(&d), [3, 4, 5, 6]);
    }

    #[test]
    fn test_enum_array_suppresses_four_lines() {
        let mut d = doc(&[
            "**Type**: `array of enum (of string)`",
            "#### <a name=\"autogenerated_heading_3\"></a>kind items",
            "a",
            "b",
            "c",
            "d",
        ]);
        fix_arrays(&mut d);
        assert_eq!(suppressed(&d), [1, 2, 3, 4]);
    }

    #[test]
    fn test_object_array_relabels_and_suppresses_two_lines() {
        let mut d = doc(&[
            "**Type**: `array of object`",                                     // 0
            "",                                                                // 1
            "#### <a name=\"autogenerated_heading_4\"></a>1.2. creators items", // 2
            "",                                                                // 3
            "**Type**: `object`",                                              // 4
            "",                                                                // 5
            "##### <a name=\"creators_items_name\"></a>name",                  // 6
        ]);
        let report = fix_arrays(&mut d);
        assert_eq!(report.object_sections, 1);
        assert_eq!(
            d.line(2),
            Some("#### <a name=\"autogenerated_heading_4\"></a>1.2. creators Subfields:")
        );
        assert_eq!(suppressed(&d), [4, 5]);
    }

    #[test]
    fn test_declaration_without_items_heading_is_ignored() {
        let mut d = doc(&["**Type**: `array of string`", "", "plain text"]);
        assert_eq!(fix_arrays(&mut d), FixupReport::default());
        assert!(suppressed(&d).is_empty());
    }

    #[test]
    fn test_block_near_end_is_clamped() {
        let mut d = doc(&[
            "**Type**: `array of string`",
            "#### <a name=\"autogenerated_heading_1\"></a>tags items",
            "",
        ]);
        fix_arrays(&mut d);
        assert_eq!(suppressed(&d), [1, 2]);
    }

    #[test]
    fn test_suppressed_heading_is_not_reused() {
        let mut d = doc(&[
            "**Type**: `array of enum (of string)`",                   // 0
            "**Type**: `array of string`",                             // 1
            "#### <a name=\"autogenerated_heading_1\"></a>a items",    // 2
            "",                                                        // 3
            "x",                                                       // 4
            "",                                                        // 5
            "#### <a name=\"autogenerated_heading_2\"></a>b items",    // 6
            "",                                                        // 7
            "y",                                                       // 8
            "",                                                        // 9
        ]);
        let report = fix_arrays(&mut d);
        assert_eq!(report.scalar_sections, 1);
        assert_eq!(suppressed(&d), [2, 3, 4, 5]);
    }
}
