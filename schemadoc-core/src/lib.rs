//! `schemadoc` Core - schema fragments and reference resolution
//!
//! Loads schema and vocabulary fragments into a per-run cache, inlines
//! `$ref`s into self-contained documents, and writes the resolved schemas
//! as the canonical artifacts read by the documentation generator.

pub mod error;
pub mod fragment;
pub mod persist;
pub mod resolver;

pub use error::{Result, SchemaError};
pub use fragment::{FragmentCache, FragmentDocument, FragmentKind, FragmentLoader};
pub use persist::{PersistedArtifact, persist_all, persist_document};
pub use resolver::{ReferenceResolver, ResolvedDocument, ResolverOptions, resolve_cache};
