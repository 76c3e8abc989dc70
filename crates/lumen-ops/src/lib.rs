//! High-level operations for the Lumen build driver.
//!
//! Each module implements one user-facing operation, gluing together the
//! core types, the staleness analyzer, and the scheduler.

pub mod ops_build;
pub mod ops_clean;
