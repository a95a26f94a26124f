//! Shared integration-test harness: builds a throwaway project directory
//! and runs the `schemadoc` binary against it with stand-in external tools.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// Markdown the stand-in generator writes for the study schema.
pub const GENERATED_MARKDOWN: &str = "\
# Study

Describes a study.

| Property | Mandatory | Repeatable | Type | Description |
| -------- | --------- | ---------- | ---- | ----------- |
| [title](#title) | Yes | No | string | Title of the study. |
| [keywords](#keywords) | No | Yes | array of string | Words. |

## <a name=\"title\"></a>1. [required] title

Title of the study.

**Type**: `string`

## <a name=\"keywords\"></a>2. [optional] keywords

Searchable words.

**Type**: `array of string`

### <a name=\"autogenerated_heading_1\"></a>2.1. keywords items

**Type**: `string`

end
";

/// A temporary project directory with schema sources and resources.
pub struct Project {
    dir: TempDir,
}

impl Project {
    /// A project with one titled schema referencing two vocabularies.
    #[allow(clippy::missing_panics_doc)]
    pub fn study() -> Self {
        let project = Self {
            dir: tempfile::tempdir().expect("failed to create temp dir"),
        };
        project.write(
            "schema/study.json",
            r#"{
    "$schema": "https://json-schema.org/draft/2020-12/schema",
    "$id": "urn:study",
    "title": "Study",
    "description": "Describes a study.",
    "type": "object",
    "properties": {
        "title": { "$ref": "urn:vocab:title" },
        "keywords": { "$ref": "urn:vocab:keywords", "description": "Searchable words." }
    }
}"#,
        );
        project.write(
            "schema/yaml/title.yaml",
            "$schema: https://json-schema.org/draft/2020-12/schema\n\
             $id: urn:vocab:title\n\
             type: string\n\
             description: Title of the study.\n\
             usageNotes: \"first\\nsecond\"\n",
        );
        project.write(
            "schema/yaml/keywords.yaml",
            "$schema: https://json-schema.org/draft/2020-12/schema\n\
             $id: urn:vocab:keywords\n\
             type: array\n\
             description: Words.\n\
             items:\n  type: string\n",
        );
        project.write("resources/key.md", "**Key**: elements marked Required must be present.\n");
        project.write("resources/mkdocs.yml", "site_name: Study Metadata\ndocs_dir: ../markdown\n");
        project.write("resources/readthedocs_theme.css", "body { margin: 0; }\n");
        project.write("resources/template/base.md", "{{ schema.title }}\n");
        project.write("generated.md", GENERATED_MARKDOWN);
        project.write(
            "fake-generator.sh",
            &format!(
                "#!/bin/sh\n\
                 for arg; do artifact=$output; output=$arg; done\n\
                 grep -q '\"\\$ref\"' \"$artifact\" && exit 3\n\
                 cp '{}' \"$output\"\n",
                project.path().join("generated.md").display()
            ),
        );
        project
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    #[allow(clippy::missing_panics_doc)]
    pub fn write(&self, rel: &str, content: &str) {
        let path = self.join(rel);
        std::fs::create_dir_all(path.parent().expect("relative path has a parent"))
            .expect("failed to create parent dir");
        std::fs::write(path, content).expect("failed to write fixture");
    }

    #[allow(clippy::missing_panics_doc)]
    pub fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.join(rel)).expect("failed to read output")
    }

    /// Command line of the stand-in documentation generator.
    pub fn generator(&self) -> String {
        format!("sh '{}'", self.join("fake-generator.sh").display())
    }

    /// Runs `schemadoc --source-dir <project> <args>` with the stand-in
    /// generator and a no-op site builder.
    pub fn run(&self, args: &[&str]) -> Output {
        self.run_with(args, &self.generator(), "true")
    }

    #[allow(clippy::missing_panics_doc)]
    pub fn run_with(&self, args: &[&str], generator: &str, site_builder: &str) -> Output {
        Command::new(env!("CARGO_BIN_EXE_schemadoc"))
            .arg("--source-dir")
            .arg(self.path())
            .args(args)
            .env("SCHEMADOC_DOC_GENERATOR", generator)
            .env("SCHEMADOC_SITE_BUILDER", site_builder)
            .env("SCHEMADOC_SCHEMA_URL", "https://example.org/study.json")
            .env_remove("SCHEMADOC_LOG_LEVEL")
            .env("NO_COLOR", "1")
            .output()
            .expect("failed to spawn schemadoc")
    }
}

/// Runs `schemadoc` with arbitrary arguments and no project.
#[allow(clippy::missing_panics_doc)]
pub fn run_bare(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_schemadoc"))
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("SCHEMADOC_SOURCE_DIR")
        .output()
        .expect("failed to spawn schemadoc")
}
