//! Incremental parallel build engine for the Lumen compiler.
//!
//! Given a project summary (the crawled module graph), the engine decides
//! which modules can be reused from a prior build by examining cached
//! compiled interfaces ([`staleness`]), then dispatches the remaining
//! compilations to a fixed pool of worker threads in dependency order
//! ([`scheduler`]), streaming per-module interfaces to dependents as soon
//! as they become available.
//!
//! The compiler front-end itself is an external collaborator behind the
//! [`backend::ModuleCompiler`] trait.

pub mod artifact;
pub mod backend;
pub mod queue;
pub mod scheduler;
pub mod staleness;
pub mod timeline;
