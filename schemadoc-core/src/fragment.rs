//! Fragment loading and the per-run fragment cache.
//!
//! Schema definitions live in `schema/*.json`, vocabulary definitions in
//! `schema/yaml/*.yaml`. Every file whose top level carries a `$schema`
//! marker is a schema fragment and is cached under its `$id`. Files without
//! the marker are plain data and are ignored.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use crate::error::{Result, SchemaError};

/// Key holding a fragment's identifier.
pub const ID_KEY: &str = "$id";

/// Key whose presence marks a document as a JSON Schema.
pub const SCHEMA_KEY: &str = "$schema";

/// Free-text fields whose line breaks must survive markdown rendering.
pub const NOTE_FIELDS: &[&str] = &["usageNotes", "curatorNotes"];

/// Markdown hard line break: two trailing spaces before the newline.
const HARD_BREAK: &str = "  \n";

// ============================================================================
// Fragment Types
// ============================================================================

/// Where a fragment was loaded from, which decides how it may be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    /// Top-level schema definition (`schema/*.json`).
    Schema,
    /// Supporting vocabulary definition (`schema/yaml/*.yaml`). Only ever
    /// inlined into other schemas, so it may omit a title.
    Vocabulary,
}

/// A single schema fragment as loaded from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct FragmentDocument {
    /// Canonical identifier (`$id`).
    pub id: String,
    /// Structural body of the fragment.
    pub body: Value,
    /// Schema or vocabulary fragment.
    pub kind: FragmentKind,
    /// File the fragment was read from.
    pub source: PathBuf,
}

impl FragmentDocument {
    /// The fragment's `title`, if it has a string one.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.body.get("title").and_then(Value::as_str)
    }

    /// The fragment's top-level `description`, if it has a string one.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.body.get("description").and_then(Value::as_str)
    }

    /// File stem of the source file, used to name derived artifacts.
    #[must_use]
    pub fn stem(&self) -> String {
        self.source
            .file_stem()
            .map_or_else(|| "schema".to_string(), |s| s.to_string_lossy().into_owned())
    }
}

/// Returns true if a parsed document marks itself as a JSON Schema.
#[must_use]
pub fn is_schema_body(body: &Value) -> bool {
    body.as_object().is_some_and(|map| map.contains_key(SCHEMA_KEY))
}

// ============================================================================
// Fragment Cache
// ============================================================================

/// All schema fragments of one pipeline run, keyed by identifier.
///
/// Iteration follows load order.
#[derive(Debug, Clone, Default)]
pub struct FragmentCache {
    fragments: IndexMap<String, FragmentDocument>,
}

impl FragmentCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a fragment.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::DuplicateIdentifier` if a fragment with the same
    /// identifier is already cached.
    pub fn insert(&mut self, fragment: FragmentDocument) -> Result<()> {
        if let Some(existing) = self.fragments.get(&fragment.id) {
            return Err(SchemaError::DuplicateIdentifier {
                id: fragment.id,
                path: fragment.source,
                existing: existing.source.clone(),
            });
        }
        self.fragments.insert(fragment.id.clone(), fragment);
        Ok(())
    }

    /// Looks up a fragment by identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&FragmentDocument> {
        self.fragments.get(id)
    }

    /// Number of cached fragments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Returns true if no fragment is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Iterates over fragments in load order.
    pub fn iter(&self) -> impl Iterator<Item = &FragmentDocument> {
        self.fragments.values()
    }

    /// Suggest a cached identifier close to `id` for typo correction.
    ///
    /// Returns the closest match if its Damerau-Levenshtein distance is ≤ 3.
    #[must_use]
    pub fn suggest(&self, id: &str) -> Option<String> {
        self.fragments
            .keys()
            .map(|known| (known, strsim::damerau_levenshtein(id, known)))
            .filter(|(_, dist)| *dist <= 3)
            .min_by_key(|(_, dist)| *dist)
            .map(|(known, _)| known.clone())
    }
}

// ============================================================================
// Loader
// ============================================================================

/// Reads schema and vocabulary fragments below a project root.
#[derive(Debug, Clone)]
pub struct FragmentLoader {
    root: PathBuf,
}

impl FragmentLoader {
    /// Creates a loader for the project rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Glob pattern matching schema definition files.
    #[must_use]
    pub fn schema_pattern(&self) -> String {
        self.root.join("schema").join("*.json").display().to_string()
    }

    /// Glob pattern matching vocabulary definition files.
    #[must_use]
    pub fn vocabulary_pattern(&self) -> String {
        self.root
            .join("schema")
            .join("yaml")
            .join("*.yaml")
            .display()
            .to_string()
    }

    /// Loads every schema fragment into a fresh cache.
    ///
    /// Schema files are loaded before vocabulary files, each group in
    /// lexical path order.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be read or parsed, if a schema
    /// fragment lacks an identifier, or if two fragments share one.
    pub fn load(&self) -> Result<FragmentCache> {
        let mut cache = FragmentCache::new();

        for (pattern, kind) in [
            (self.schema_pattern(), FragmentKind::Schema),
            (self.vocabulary_pattern(), FragmentKind::Vocabulary),
        ] {
            for path in expand_glob(&pattern)? {
                if let Some(fragment) = load_fragment(&path, kind)? {
                    debug!(path = %path.display(), id = %fragment.id, "loading fragment into schema cache");
                    cache.insert(fragment)?;
                } else {
                    debug!(path = %path.display(), "skipping file without $schema marker");
                }
            }
        }

        Ok(cache)
    }
}

/// Expands a glob pattern into a sorted list of files.
fn expand_glob(pattern: &str) -> Result<Vec<PathBuf>> {
    let paths = glob::glob(pattern).map_err(|e| SchemaError::ParseError {
        path: PathBuf::from(pattern),
        line: None,
        message: e.to_string(),
    })?;

    let mut files = Vec::new();
    for entry in paths {
        let path = entry.map_err(|e| SchemaError::Io(e.into_error()))?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Parses one fragment file.
///
/// Returns `Ok(None)` for files that are not schemas.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if it is a
/// schema without a string `$id`.
pub fn load_fragment(path: &Path, kind: FragmentKind) -> Result<Option<FragmentDocument>> {
    let raw = std::fs::read_to_string(path)?;
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(&raw);

    let mut body = match kind {
        FragmentKind::Schema => {
            serde_json::from_str::<Value>(raw).map_err(|e| SchemaError::ParseError {
                path: path.to_path_buf(),
                line: Some(e.line()),
                message: e.to_string(),
            })?
        }
        FragmentKind::Vocabulary => {
            let yaml: serde_yaml::Value =
                serde_yaml::from_str(raw).map_err(|e| SchemaError::ParseError {
                    path: path.to_path_buf(),
                    line: e.location().map(|l| l.line()),
                    message: e.to_string(),
                })?;
            yaml_to_json(&yaml)
        }
    };

    if !is_schema_body(&body) {
        return Ok(None);
    }

    normalize_line_breaks(&mut body);

    let id = body
        .get(ID_KEY)
        .and_then(Value::as_str)
        .ok_or_else(|| SchemaError::MissingIdentifier {
            path: path.to_path_buf(),
        })?
        .to_string();

    Ok(Some(FragmentDocument {
        id,
        body,
        kind,
        source: path.to_path_buf(),
    }))
}

/// Turns raw newlines in top-level note fields into markdown hard breaks.
fn normalize_line_breaks(body: &mut Value) {
    let Some(map) = body.as_object_mut() else {
        return;
    };
    for field in NOTE_FIELDS {
        if let Some(Value::String(text)) = map.get_mut(*field) {
            if text.contains('\n') {
                *text = text.replace('\n', HARD_BREAK);
            }
        }
    }
}

/// Converts a `serde_yaml::Value` to `serde_json::Value`.
///
/// Scalar mapping keys that are not strings are written as their text
/// (`1: foo` becomes `"1": "foo"`); tags are discarded.
#[allow(clippy::option_if_let_else)]
fn yaml_to_json(yaml: &serde_yaml::Value) -> Value {
    use serde_yaml::Value as Yaml;

    match yaml {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(*b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(i.into())
            } else if let Some(u) = n.as_u64() {
                Value::Number(u.into())
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number)
            } else {
                Value::Null
            }
        }
        Yaml::String(s) => Value::String(s.clone()),
        Yaml::Sequence(seq) => Value::Array(seq.iter().map(yaml_to_json).collect()),
        Yaml::Mapping(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (mapping_key(k), yaml_to_json(v)))
                .collect(),
        ),
        Yaml::Tagged(tagged) => yaml_to_json(&tagged.value),
    }
}

/// JSON object key for a YAML mapping key.
fn mapping_key(key: &serde_yaml::Value) -> String {
    use serde_yaml::Value as Yaml;

    match key {
        Yaml::String(s) => s.clone(),
        Yaml::Null => "null".to_string(),
        Yaml::Bool(b) => b.to_string(),
        Yaml::Number(n) => n.to_string(),
        Yaml::Tagged(tagged) => mapping_key(&tagged.value),
        Yaml::Sequence(_) | Yaml::Mapping(_) => yaml_to_json(key).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fragment(id: &str, source: &str) -> FragmentDocument {
        FragmentDocument {
            id: id.to_string(),
            body: json!({ "$id": id, "$schema": "https://json-schema.org/draft/2020-12/schema" }),
            kind: FragmentKind::Schema,
            source: PathBuf::from(source),
        }
    }

    fn write(dir: &Path, rel: &str, content: &str) -> PathBuf {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_is_schema_body() {
        assert!(is_schema_body(&json!({ "$schema": "x" })));
        assert!(!is_schema_body(&json!({ "title": "plain" })));
        assert!(!is_schema_body(&json!(["$schema"])));
    }

    #[test]
    fn test_cache_rejects_duplicate_identifier() {
        let mut cache = FragmentCache::new();
        cache.insert(fragment("urn:a", "schema/a.json")).unwrap();
        let err = cache.insert(fragment("urn:a", "schema/b.json")).unwrap_err();
        match err {
            SchemaError::DuplicateIdentifier { id, path, existing } => {
                assert_eq!(id, "urn:a");
                assert_eq!(path, PathBuf::from("schema/b.json"));
                assert_eq!(existing, PathBuf::from("schema/a.json"));
            }
            other => panic!("expected DuplicateIdentifier, got {other:?}"),
        }
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_suggest() {
        let mut cache = FragmentCache::new();
        cache.insert(fragment("urn:vocab/study", "a.json")).unwrap();
        cache.insert(fragment("urn:vocab/series", "b.json")).unwrap();
        assert_eq!(cache.suggest("urn:vocab/studi").as_deref(), Some("urn:vocab/study"));
        assert_eq!(cache.suggest("urn:completely-different"), None);
    }

    #[test]
    fn test_stem() {
        assert_eq!(fragment("urn:a", "schema/icpsr_study_schema.json").stem(), "icpsr_study_schema");
    }

    #[test]
    fn test_load_skips_non_schema_files() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "schema/data.json", r#"{ "title": "not a schema" }"#);
        write(
            dir.path(),
            "schema/a.json",
            r#"{ "$id": "urn:a", "$schema": "s", "title": "A" }"#,
        );

        let cache = FragmentLoader::new(dir.path()).load().unwrap();
        assert_eq!(cache.len(), 1);
        assert!(cache.get("urn:a").is_some());
    }

    #[test]
    fn test_load_classifies_vocabulary_and_normalizes_notes() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "schema/yaml/v.yaml",
            "$id: urn:v\n$schema: s\nusageNotes: |\n  first\n  second\nmandatory: \"yes\"\n",
        );

        let cache = FragmentLoader::new(dir.path()).load().unwrap();
        let v = cache.get("urn:v").unwrap();
        assert_eq!(v.kind, FragmentKind::Vocabulary);
        assert_eq!(v.body["usageNotes"], "first  \nsecond  \n");
        assert_eq!(v.body["mandatory"], "yes");
    }

    #[test]
    fn test_load_missing_identifier() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "schema/yaml/broken.yaml", "$schema: s\ntitle: Broken\n");

        let err = FragmentLoader::new(dir.path()).load().unwrap_err();
        match err {
            SchemaError::MissingIdentifier { path } => {
                assert!(path.ends_with("broken.yaml"));
            }
            other => panic!("expected MissingIdentifier, got {other:?}"),
        }
    }

    #[test]
    fn test_load_duplicate_identifier_across_formats() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "schema/a.json", r#"{ "$id": "urn:dup", "$schema": "s" }"#);
        write(dir.path(), "schema/yaml/b.yaml", "$id: urn:dup\n$schema: s\n");

        let err = FragmentLoader::new(dir.path()).load().unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateIdentifier { ref id, .. } if id == "urn:dup"));
    }

    #[test]
    fn test_load_reports_parse_error_with_path() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "schema/bad.json", "{ not json");

        let err = FragmentLoader::new(dir.path()).load().unwrap_err();
        match err {
            SchemaError::ParseError { path, line, .. } => {
                assert!(path.ends_with("bad.json"));
                assert_eq!(line, Some(1));
            }
            other => panic!("expected ParseError, got {other:?}"),
        }
    }

    #[test]
    fn test_load_empty_root() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FragmentLoader::new(dir.path()).load().unwrap();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_yaml_to_json_conversion() {
        let yaml: serde_yaml::Value = serde_yaml::from_str(
            r"
            string: hello
            number: 42
            bool: true
            null_val: null
            array:
              - 1
              - 2
            object:
              nested: value
            ",
        )
        .unwrap();

        let json = yaml_to_json(&yaml);

        assert_eq!(json["string"], "hello");
        assert_eq!(json["number"], 42);
        assert_eq!(json["bool"], true);
        assert!(json["null_val"].is_null());
        assert_eq!(json["array"][1], 2);
        assert_eq!(json["object"]["nested"], "value");
    }

    #[test]
    fn test_yaml_to_json_keeps_non_string_keys() {
        let yaml: serde_yaml::Value = serde_yaml::from_str(
            r"
            1: foo
            true: yes
            ~: nothing
            codes:
              200: ok
            ",
        )
        .unwrap();

        let json = yaml_to_json(&yaml);

        assert_eq!(json["1"], "foo");
        assert_eq!(json["true"], "yes");
        assert_eq!(json["null"], "nothing");
        assert_eq!(json["codes"]["200"], "ok");
        assert_eq!(json.as_object().unwrap().len(), 4);
    }

    #[test]
    fn test_vocabulary_with_numeric_keys_loads() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "schema/yaml/levels.yaml",
            "$schema: s\n$id: urn:levels\nenum_labels:\n  1: low\n  2: high\n",
        );

        let cache = FragmentLoader::new(dir.path()).load().unwrap();
        let levels = cache.get("urn:levels").unwrap();
        assert_eq!(levels.body["enum_labels"], json!({ "1": "low", "2": "high" }));
    }
}
