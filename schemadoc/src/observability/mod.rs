//! Observability module
//!
//! Structured logging for pipeline runs.

pub mod logging;

pub use logging::{LogFormat, init_logging};
