use std::path::Path;

use schemadoc_core::resolver::contains_reference;
use schemadoc_core::{
    FragmentLoader, ResolverOptions, SchemaError, persist_all, resolve_cache,
};

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn project_with_vocabulary() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "schema/a.json",
        r#"{
            "$id": "urn:a",
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "title": "A",
            "description": "Schema A",
            "type": "object",
            "properties": {
                "p1": { "$ref": "urn:v" }
            }
        }"#,
    );
    write(
        dir.path(),
        "schema/yaml/v.yaml",
        "$id: urn:v\n$schema: https://json-schema.org/draft/2020-12/schema\nmandatory: \"yes\"\ntype: string\n",
    );
    dir
}

#[test]
fn resolves_and_persists_single_titled_document() {
    let project = project_with_vocabulary();
    let out = tempfile::tempdir().unwrap();

    let cache = FragmentLoader::new(project.path()).load().unwrap();
    assert_eq!(cache.len(), 2);

    let resolved = resolve_cache(&cache, ResolverOptions::default()).unwrap();
    let artifacts = persist_all(&resolved, out.path()).unwrap();

    assert_eq!(artifacts.len(), 1, "vocabulary fragments are not persisted");
    let artifact = &artifacts[0];
    assert_eq!(artifact.title, "A");
    assert_eq!(artifact.id, "urn:a");
    assert_eq!(artifact.description.as_deref(), Some("Schema A"));
    assert_eq!(artifact.stem(), "a");

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&artifact.path).unwrap()).unwrap();
    assert_eq!(written["title"], "A");
    assert_eq!(written["$id"], "urn:a");
    assert_eq!(written["properties"]["p1"]["mandatory"], "yes");
    assert_eq!(written["properties"]["p1"]["type"], "string");
    assert!(written["properties"]["p1"].get("$id").is_none());
    assert!(written["properties"]["p1"].get("$schema").is_none());
    assert!(!contains_reference(&written));
}

#[test]
fn untitled_schema_fragment_cannot_be_persisted() {
    let project = tempfile::tempdir().unwrap();
    write(
        project.path(),
        "schema/untitled.json",
        r#"{ "$id": "urn:untitled", "$schema": "s", "type": "object" }"#,
    );
    let out = tempfile::tempdir().unwrap();

    let cache = FragmentLoader::new(project.path()).load().unwrap();
    let resolved = resolve_cache(&cache, ResolverOptions::default()).unwrap();
    let err = persist_all(&resolved, out.path()).unwrap_err();
    assert!(matches!(err, SchemaError::MissingTitle { ref id } if id == "urn:untitled"));
}

#[test]
fn unresolved_reference_aborts_resolution() {
    let project = tempfile::tempdir().unwrap();
    write(
        project.path(),
        "schema/a.json",
        r#"{ "$id": "urn:a", "$schema": "s", "title": "A", "properties": { "p": { "$ref": "urn:missing" } } }"#,
    );

    let cache = FragmentLoader::new(project.path()).load().unwrap();
    let err = resolve_cache(&cache, ResolverOptions::default()).unwrap_err();
    assert!(matches!(err, SchemaError::UnresolvedReference { ref id, .. } if id == "urn:missing"));
    assert!(err.to_string().contains("urn:missing"));
}
