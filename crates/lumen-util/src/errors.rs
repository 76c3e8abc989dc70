use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for the Lumen build driver.
///
/// Every failure mode of the analyzer, the scheduler, and the workers is a
/// variant here; the driver returns the first error as a single value and
/// never lets a panic or an exception cross a thread boundary. Rendering is
/// left to miette at the CLI layer.
#[derive(Debug, Error, Diagnostic)]
pub enum BuildError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The module dependency graph contains a cycle.
    #[error("import cycle detected: {}", modules.join(" -> "))]
    #[diagnostic(help("break the cycle by moving shared definitions into a module both sides can import"))]
    Cycle {
        /// Members of the strongly-connected component, in visit order.
        modules: Vec<String>,
    },

    /// A dependency references a module that is not part of the project.
    #[error("module `{name}` was not found{}", parent.as_deref().map(|p| format!(" (imported by `{p}`)")).unwrap_or_default())]
    ModuleNotFound {
        name: String,
        parent: Option<String>,
    },

    /// The same module is provided by more than one source.
    #[error("module `{name}` is defined more than once")]
    #[diagnostic(help("a module name must map to exactly one source file"))]
    ModuleDuplicates {
        name: String,
        parent: Option<String>,
        paths: Vec<PathBuf>,
        packages: Vec<String>,
    },

    /// A source file does not match the module name it claims to define.
    #[error("`{}` should define `{expected}`, but its name implies `{actual}`", path.display())]
    ModuleNameMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    /// A persisted build artifact exists but could not be read back.
    #[error("corrupted build artifact: {}", path.display())]
    #[diagnostic(help("delete the lumen-stuff directory and build again"))]
    CorruptedArtifact { path: PathBuf },

    /// The compiler reported errors for a module.
    #[error("compilation of {} failed with {} error(s)", path.display(), diagnostics.iter().filter(|d| d.severity == Severity::Error).count())]
    CompilerErrors {
        path: PathBuf,
        /// Full source text of the failing module, for the reporting layer.
        source_text: String,
        diagnostics: Vec<CompilerDiagnostic>,
    },

    /// An import references a package that the project does not depend on.
    #[error("package `{name}` is missing from the project dependencies")]
    #[diagnostic(help("add the package to the project file and build again"))]
    MissingPackage { name: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}

/// Convenience alias used across all Lumen crates.
pub type BuildResult<T> = miette::Result<T>;

/// A single diagnostic message emitted by the external compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerDiagnostic {
    pub severity: Severity,
    pub message: String,
    pub file: Option<String>,
    pub line: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_renders_members_in_order() {
        let err = BuildError::Cycle {
            modules: vec!["A".into(), "B".into(), "A".into()],
        };
        assert_eq!(err.to_string(), "import cycle detected: A -> B -> A");
    }

    #[test]
    fn module_not_found_mentions_parent() {
        let err = BuildError::ModuleNotFound {
            name: "Json.Decode".into(),
            parent: Some("Main".into()),
        };
        assert!(err.to_string().contains("Json.Decode"));
        assert!(err.to_string().contains("imported by `Main`"));
    }

    #[test]
    fn compiler_errors_counts_only_errors() {
        let err = BuildError::CompilerErrors {
            path: PathBuf::from("src/Main.lum"),
            source_text: String::new(),
            diagnostics: vec![
                CompilerDiagnostic {
                    severity: Severity::Error,
                    message: "type mismatch".into(),
                    file: None,
                    line: Some(3),
                },
                CompilerDiagnostic {
                    severity: Severity::Warning,
                    message: "unused import".into(),
                    file: None,
                    line: Some(1),
                },
            ],
        };
        assert!(err.to_string().contains("1 error(s)"));
    }
}
