//! `schemadoc` - documentation builder for interlinked schema files
//!
//! Resolves `$ref`s across schema and vocabulary fragments, hands the
//! resolved schemas to an external documentation generator, curates the
//! generated markdown, and builds a static site from it.

pub mod cli;
pub mod config;
pub mod error;
pub mod external;
pub mod observability;
pub mod pipeline;
