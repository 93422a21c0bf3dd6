//! Development tools for tether.
//!
//! This crate installs the structured logging used across the workspace.

pub mod logging;

pub use logging::{LoggingError, init_logging};
