//! Project file parsing and lowering.
//!
//! Source discovery is not the driver's job: a crawler collaborator walks
//! the source tree and serializes the module graph into `lumen-build.toml`
//! at the project root. This module parses that file and lowers it into a
//! [`ProjectSummary`] keyed by structural module identity.
//!
//! Module keys and imports are either plain dotted names (`Json.Decode`,
//! owned by the root package) or qualified (`lumen/core:List`, owned by a
//! declared dependency package).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use lumen_util::errors::{BuildError, BuildResult};

use crate::module::{Location, ModuleId, PackageId};
use crate::summary::{ProjectData, ProjectSummary};
use crate::DEFAULT_COMPILER_VERSION;

/// Name of the project file at the project root.
pub const PROJECT_FILE: &str = "lumen-build.toml";

/// The parsed representation of a `lumen-build.toml` file.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectFile {
    pub package: PackageSection,

    #[serde(default)]
    pub compiler: CompilerSection,

    /// Dependency packages whose modules may appear in the graph,
    /// `author/project` -> version constraint. The version is informational
    /// here; resolution belongs to the package manager collaborator.
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,

    #[serde(default)]
    pub modules: BTreeMap<String, ModuleEntry>,
}

/// Root package identity from the `[package]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageSection {
    pub author: String,
    pub project: String,
}

/// Compiler pinning from the `[compiler]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CompilerSection {
    /// Compiler version; namespaces the artifact directory.
    pub version: String,
    /// Path or name of the compiler binary. Defaults to `lumenc` on PATH.
    pub binary: Option<PathBuf>,
}

impl Default for CompilerSection {
    fn default() -> Self {
        Self {
            version: DEFAULT_COMPILER_VERSION.to_string(),
            binary: None,
        }
    }
}

/// One module entry from `[modules."Name"]`.
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleEntry {
    /// Source path, relative to the project root.
    pub source: PathBuf,
    #[serde(default)]
    pub imports: Vec<String>,
    #[serde(default)]
    pub native: bool,
}

impl ProjectFile {
    /// Walk up from `start` to the nearest directory holding a project
    /// file. Returns that directory (the project root), not the file.
    ///
    /// Lets every command run from anywhere inside the source tree.
    pub fn locate(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .find(|dir| dir.join(PROJECT_FILE).is_file())
            .map(Path::to_path_buf)
    }

    /// Parse a project file from disk.
    pub fn from_path(path: &Path) -> BuildResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| BuildError::Generic {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        toml::from_str(&content).map_err(|e| {
            BuildError::Generic {
                message: format!("Failed to parse {}: {e}", path.display()),
            }
            .into()
        })
    }

    pub fn root_package(&self) -> PackageId {
        PackageId::new(&self.package.author, &self.package.project)
    }

    /// Resolve a module reference to a [`ModuleId`].
    ///
    /// Plain names belong to the root package; `author/project:Name`
    /// references must name a declared dependency package.
    pub fn resolve_module_ref(&self, reference: &str) -> BuildResult<ModuleId> {
        match reference.split_once(':') {
            None => Ok(ModuleId::new(self.root_package(), reference)),
            Some((pkg_str, name)) => {
                let package = PackageId::parse(pkg_str).ok_or_else(|| BuildError::Generic {
                    message: format!("Invalid package reference `{pkg_str}` in `{reference}`"),
                })?;
                if package != self.root_package() && !self.dependencies.contains_key(pkg_str) {
                    return Err(BuildError::MissingPackage {
                        name: pkg_str.to_string(),
                    }
                    .into());
                }
                Ok(ModuleId::new(package, name))
            }
        }
    }

    /// Lower the project file into a `ProjectSummary<Location>`.
    ///
    /// Relative source paths are anchored at `project_dir`. Validates that
    /// each compilable source file is named after its module's last dotted
    /// segment and that no two entries collapse onto the same module.
    pub fn to_summary(&self, project_dir: &Path) -> BuildResult<ProjectSummary<Location>> {
        let mut summary: ProjectSummary<Location> = BTreeMap::new();
        let mut sources: BTreeMap<ModuleId, PathBuf> = BTreeMap::new();

        for (key, entry) in &self.modules {
            let id = self.resolve_module_ref(key)?;

            let stem = entry
                .source
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            if stem != id.last_segment() {
                return Err(BuildError::ModuleNameMismatch {
                    path: entry.source.clone(),
                    expected: id.last_segment().to_string(),
                    actual: stem,
                }
                .into());
            }

            if let Some(previous) = sources.get(&id) {
                return Err(BuildError::ModuleDuplicates {
                    name: id.name.clone(),
                    parent: None,
                    paths: vec![previous.clone(), entry.source.clone()],
                    packages: vec![id.package.to_string()],
                }
                .into());
            }
            sources.insert(id.clone(), entry.source.clone());

            let mut deps = Vec::with_capacity(entry.imports.len());
            for import in &entry.imports {
                deps.push(self.resolve_module_ref(import)?);
            }

            let source = if entry.source.is_absolute() {
                entry.source.clone()
            } else {
                project_dir.join(&entry.source)
            };
            let location = if entry.native {
                Location::native(source)
            } else {
                Location::compilable(source)
            };
            summary.insert(id, ProjectData::new(location, deps));
        }

        Ok(summary)
    }
}
