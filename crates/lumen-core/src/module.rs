//! Package and module identity.
//!
//! A module is uniquely keyed within one build by its [`ModuleId`]: the
//! owning package plus a dotted module name. Equality is structural; every
//! map in the driver is keyed by `ModuleId`.

use std::fmt;
use std::path::PathBuf;

/// Identity of a package: registry author plus project name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PackageId {
    pub author: String,
    pub project: String,
}

impl PackageId {
    pub fn new(author: impl Into<String>, project: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            project: project.into(),
        }
    }

    /// Parse `author/project`. Returns `None` on any other shape.
    pub fn parse(s: &str) -> Option<Self> {
        let (author, project) = s.split_once('/')?;
        if author.is_empty() || project.is_empty() || project.contains('/') {
            return None;
        }
        Some(Self::new(author, project))
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.author, self.project)
    }
}

/// Identity of a module within one build.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModuleId {
    pub package: PackageId,
    /// Dotted module name, e.g. `Json.Decode`.
    pub name: String,
}

impl ModuleId {
    pub fn new(package: PackageId, name: impl Into<String>) -> Self {
        Self {
            package,
            name: name.into(),
        }
    }

    /// Last segment of the dotted name: `Json.Decode` -> `Decode`.
    ///
    /// A compilable module's source file stem must match this.
    pub fn last_segment(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.package, self.name)
    }
}

/// Where a module's source lives, and whether it is compilable.
///
/// Native modules are pre-supplied JavaScript: they bypass compilation but
/// still participate in dependency ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub source: PathBuf,
    pub native: bool,
}

impl Location {
    pub fn compilable(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            native: false,
        }
    }

    pub fn native(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            native: true,
        }
    }
}
