//! Interface-staleness analysis.
//!
//! Turns a `ProjectSummary<Location>` into the [`BuildSummary`] of modules
//! that actually need compiling. Three phases over the module graph:
//!
//! 1. **Load-if-fresh**: read each module's persisted interface when its
//!    mtime is at least the source file's mtime.
//! 2. **Transitive staleness**: a topological pass that keeps an interface
//!    only if every direct dependency kept one; staleness propagates to all
//!    dependents in a single forward sweep. Cycles are rejected here.
//! 3. **Readiness partition**: each stale module's dependency list is
//!    split into the stale part (`blocking`) and the part whose interfaces
//!    survived (`ready`).
//!
//! Modules whose interface survives phase 2 are done; they do not appear
//! in the output at all.

use std::collections::{BTreeMap, BTreeSet};

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};

use lumen_core::interface::Interface;
use lumen_core::module::{Location, ModuleId, PackageId};
use lumen_core::summary::{BuildData, BuildSummary, ProjectSummary};
use lumen_util::errors::{BuildError, BuildResult};

use crate::artifact::ArtifactRoot;

/// Analyze the project and produce the set of modules to compile.
pub fn analyze(
    summary: ProjectSummary<Location>,
    artifacts: &ArtifactRoot,
) -> BuildResult<BuildSummary> {
    // Phase 1: load-if-fresh.
    let mut loaded: ProjectSummary<(Location, Option<Interface>)> = BTreeMap::new();
    for (id, data) in summary {
        let iface = artifacts.load_interface_if_fresh(&id, &data.payload)?;
        loaded.insert(id, data.map(|location| (location, iface)));
    }

    let order = dependency_order(&loaded)?;

    // Phase 2: transitive staleness, dependencies first.
    let mut retained: BTreeMap<ModuleId, Interface> = BTreeMap::new();
    for id in &order {
        let (location, iface) = &loaded[id].payload;
        if location.native {
            retained.insert(id.clone(), Interface::native());
            continue;
        }
        if let Some(iface) = iface {
            let deps_fresh = loaded[id].deps.iter().all(|d| retained.contains_key(d));
            if deps_fresh {
                retained.insert(id.clone(), iface.clone());
            }
        }
    }

    // Phase 3: readiness partition for everything still stale.
    let mut build: BuildSummary = BTreeMap::new();
    for (id, data) in loaded {
        if retained.contains_key(&id) {
            continue;
        }
        let mut blocking = Vec::new();
        let mut ready = BTreeMap::new();
        for dep in &data.deps {
            match retained.get(dep) {
                Some(iface) => {
                    ready.insert(dep.clone(), iface.clone());
                }
                None => blocking.push(dep.clone()),
            }
        }
        build.insert(
            id,
            BuildData {
                blocking,
                ready,
                location: data.payload.0,
            },
        );
    }

    Ok(build)
}

/// Topological order of the module graph, dependencies first.
///
/// Fails with [`BuildError::Cycle`] on any strongly-connected component of
/// size greater than one (or a self-import), with
/// [`BuildError::ModuleNotFound`] when an import names an unknown module of
/// a known package, and with [`BuildError::MissingPackage`] when the
/// package itself contributes nothing to the project.
fn dependency_order<T>(summary: &ProjectSummary<T>) -> BuildResult<Vec<ModuleId>> {
    let mut graph: DiGraph<ModuleId, ()> = DiGraph::new();
    let mut indices: BTreeMap<&ModuleId, NodeIndex> = BTreeMap::new();
    for id in summary.keys() {
        indices.insert(id, graph.add_node(id.clone()));
    }

    let known_packages: BTreeSet<&PackageId> = summary.keys().map(|id| &id.package).collect();

    for (id, data) in summary {
        for dep in &data.deps {
            let Some(&dep_idx) = indices.get(dep) else {
                if known_packages.contains(&dep.package) {
                    return Err(BuildError::ModuleNotFound {
                        name: dep.name.clone(),
                        parent: Some(id.name.clone()),
                    }
                    .into());
                }
                return Err(BuildError::MissingPackage {
                    name: dep.package.to_string(),
                }
                .into());
            };
            graph.add_edge(dep_idx, indices[id], ());
        }
    }

    // Tarjan yields components in postorder: dependents before their
    // dependencies. Reversing the flattened list puts dependencies first.
    let components = tarjan_scc(&graph);
    for component in &components {
        let is_cycle = component.len() > 1
            || graph.find_edge(component[0], component[0]).is_some();
        if is_cycle {
            return Err(BuildError::Cycle {
                modules: component.iter().map(|&n| graph[n].name.clone()).collect(),
            }
            .into());
        }
    }

    Ok(components
        .into_iter()
        .rev()
        .flatten()
        .map(|n| graph[n].clone())
        .collect())
}
