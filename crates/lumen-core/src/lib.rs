//! Core data types for the Lumen build driver.
//!
//! This crate defines the fundamental types that represent a Lumen project:
//! package and module identity, source locations, compiled interfaces,
//! project and build summaries, project-file parsing, and user
//! configuration.
//!
//! This crate is intentionally free of threads and graph algorithms; the
//! build engine lives in `lumen-build`.

pub mod config;
pub mod interface;
pub mod module;
pub mod project;
pub mod summary;

/// Compiler version assumed when a project file does not pin one.
pub const DEFAULT_COMPILER_VERSION: &str = "0.9.0";
