//! Project and build summaries.
//!
//! The *project summary* is the input dependency graph: for each module,
//! a payload plus its direct imports. The payload type changes as analysis
//! progresses, so the summary is parametric.
//!
//! The *build summary* is the analyzer's output: only the modules that must
//! be compiled, each annotated with its blocking set and the interfaces
//! already available for its dependencies.

use std::collections::BTreeMap;

use crate::interface::Interface;
use crate::module::{Location, ModuleId};

/// Per-module entry in a [`ProjectSummary`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectData<T> {
    pub payload: T,
    /// Direct imports, in source order.
    pub deps: Vec<ModuleId>,
}

impl<T> ProjectData<T> {
    pub fn new(payload: T, deps: Vec<ModuleId>) -> Self {
        Self { payload, deps }
    }

    /// Replace the payload, keeping the dependency list.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ProjectData<U> {
        ProjectData {
            payload: f(self.payload),
            deps: self.deps,
        }
    }
}

/// The input module graph, keyed by structural module identity.
pub type ProjectSummary<T> = BTreeMap<ModuleId, ProjectData<T>>;

/// Per-module entry in a [`BuildSummary`].
///
/// Invariant: `blocking` and the keys of `ready` partition the module's
/// dependency set. A module is schedulable iff `blocking` is empty.
#[derive(Debug, Clone)]
pub struct BuildData {
    /// Dependencies that still need to be compiled.
    pub blocking: Vec<ModuleId>,
    /// Dependencies whose interfaces are already valid.
    pub ready: BTreeMap<ModuleId, Interface>,
    pub location: Location,
}

impl BuildData {
    pub fn is_schedulable(&self) -> bool {
        self.blocking.is_empty()
    }
}

/// The subset of the project that must be compiled.
pub type BuildSummary = BTreeMap<ModuleId, BuildData>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::PackageId;

    fn module(name: &str) -> ModuleId {
        ModuleId::new(PackageId::new("author", "project"), name)
    }

    #[test]
    fn project_data_map_keeps_deps() {
        let data = ProjectData::new(1u32, vec![module("A"), module("B")]);
        let mapped = data.map(|n| n.to_string());
        assert_eq!(mapped.payload, "1");
        assert_eq!(mapped.deps, vec![module("A"), module("B")]);
    }

    #[test]
    fn schedulable_iff_no_blocking() {
        let mut data = BuildData {
            blocking: vec![module("Dep")],
            ready: BTreeMap::new(),
            location: Location::compilable("src/Main.lum"),
        };
        assert!(!data.is_schedulable());
        data.blocking.clear();
        assert!(data.is_schedulable());
    }
}
