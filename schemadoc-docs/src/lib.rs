//! `schemadoc` Docs - curation of generated schema documentation
//!
//! Rewrites the line-oriented markdown produced by the external schema
//! documentation generator: boilerplate around array item definitions is
//! suppressed, property labels and data types are made human-readable, and
//! every property heading gets its description and required/repeatable
//! summary.

pub mod error;
pub mod markdown;
