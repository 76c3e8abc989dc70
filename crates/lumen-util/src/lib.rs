//! Shared utilities for the Lumen build driver.
//!
//! This crate provides cross-cutting concerns used by all other Lumen
//! crates: the unified error type, filesystem helpers, process spawning,
//! and terminal progress output.

pub mod errors;
pub mod fs;
pub mod process;
pub mod progress;

use std::path::{Path, PathBuf};

/// Name of the per-project artifact root directory.
pub const STUFF_DIR: &str = "lumen-stuff";

/// Returns the per-project stuff directory (`<project>/lumen-stuff/`).
///
/// Everything the build driver persists between runs lives under here.
pub fn stuff_dir(project_dir: &Path) -> PathBuf {
    project_dir.join(STUFF_DIR)
}

/// Returns the path to the Lumen user data directory (`~/.lumen/`).
pub fn home_dir() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    Path::new(&home).join(".lumen")
}
