//! Writing resolved schemas as canonical artifacts.
//!
//! Inlining copies each referenced fragment's `$id` and `$schema` into the
//! referencing property. Those keys mean nothing once inlined and would
//! show up in the generated documentation, so they are removed from each
//! top-level property definition before writing. The document's own `$id`
//! and `$schema` stay.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{Result, SchemaError};
use crate::fragment::{FragmentKind, ID_KEY, SCHEMA_KEY};
use crate::resolver::ResolvedDocument;

/// Key holding a schema's property definitions.
const PROPERTIES_KEY: &str = "properties";

/// A resolved schema written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedArtifact {
    /// Identifier of the schema.
    pub id: String,
    /// Schema title.
    pub title: String,
    /// Top-level description, used to place the overview pointer in the
    /// generated markdown.
    pub description: Option<String>,
    /// Path of the written JSON file.
    pub path: PathBuf,
}

impl PersistedArtifact {
    /// File stem of the artifact, shared with the generated markdown file.
    #[must_use]
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map_or_else(|| "schema".to_string(), |s| s.to_string_lossy().into_owned())
    }
}

/// Removes `$id` and `$schema` from each entry of the top-level
/// `properties` mapping of `body`.
///
/// Definitions nested deeper, and the document's own `$id` and `$schema`,
/// are left as they are.
pub fn strip_property_metadata(body: &mut Value) {
    let Some(Value::Object(properties)) = body.get_mut(PROPERTIES_KEY) else {
        return;
    };
    for definition in properties.values_mut() {
        if let Value::Object(fields) = definition {
            fields.shift_remove(ID_KEY);
            fields.shift_remove(SCHEMA_KEY);
        }
    }
}

/// Serializes a value as JSON indented with four spaces.
///
/// # Errors
///
/// Returns `SchemaError::Json` if serialization fails.
pub fn to_canonical_json(value: &Value) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    let mut out = String::from_utf8_lossy(&buf).into_owned();
    out.push('\n');
    Ok(out)
}

/// Writes one resolved schema to `dir/<source stem>.json`.
///
/// Returns `Ok(None)` for untitled vocabulary fragments, which are only
/// ever inlined into other schemas.
///
/// # Errors
///
/// Returns `SchemaError::MissingTitle` for an untitled schema fragment and
/// I/O or serialization errors from writing the file.
pub fn persist_document(doc: &ResolvedDocument, dir: &Path) -> Result<Option<PersistedArtifact>> {
    let Some(title) = doc.title() else {
        if doc.kind == FragmentKind::Vocabulary {
            return Ok(None);
        }
        return Err(SchemaError::MissingTitle { id: doc.id.clone() });
    };

    let mut body = doc.body.clone();
    strip_property_metadata(&mut body);

    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.json", doc.stem()));
    debug!(title, path = %path.display(), "writing resolved schema");
    std::fs::write(&path, to_canonical_json(&body)?)?;

    Ok(Some(PersistedArtifact {
        id: doc.id.clone(),
        title: title.to_string(),
        description: doc.description().map(str::to_string),
        path,
    }))
}

/// Writes every titled schema in `docs` to `dir`.
///
/// # Errors
///
/// Returns the first error from [`persist_document`].
pub fn persist_all(docs: &[ResolvedDocument], dir: &Path) -> Result<Vec<PersistedArtifact>> {
    let mut artifacts = Vec::new();
    for doc in docs {
        if let Some(artifact) = persist_document(doc, dir)? {
            artifacts.push(artifact);
        }
    }
    Ok(artifacts)
}
