//! Compiler backend seam.
//!
//! The build engine never understands Lumen source; it hands each module
//! plus the interfaces of its dependencies to a [`ModuleCompiler`] and gets
//! back an interface and an object. The shipped backend shells out to the
//! `lumenc` binary; tests substitute in-process stubs.

use std::collections::BTreeMap;
use std::path::PathBuf;

use lumen_core::interface::Interface;
use lumen_core::module::{Location, ModuleId};
use lumen_util::errors::{BuildError, CompilerDiagnostic, Severity};
use lumen_util::process::CommandBuilder;

/// Output of compiling one module.
#[derive(Debug, Clone)]
pub struct CompiledModule {
    pub iface: Interface,
    pub object: Vec<u8>,
}

/// One compiler invocation: source plus dependency interfaces in, compiled
/// interface plus object out.
///
/// Implementations are shared across worker threads and must not rely on
/// any per-call mutable state.
pub trait ModuleCompiler: Sync {
    fn compile(
        &self,
        module: &ModuleId,
        location: &Location,
        deps: &BTreeMap<ModuleId, Interface>,
    ) -> Result<CompiledModule, BuildError>;
}

/// Backend that invokes the external `lumenc` binary.
///
/// Dependency interfaces are materialized into a per-invocation temp
/// directory laid out like the artifact tree; `lumenc` reads them from
/// there and emits the module's interface and JavaScript object into the
/// same directory.
pub struct LumencCompiler {
    binary: PathBuf,
}

impl LumencCompiler {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl ModuleCompiler for LumencCompiler {
    fn compile(
        &self,
        module: &ModuleId,
        location: &Location,
        deps: &BTreeMap<ModuleId, Interface>,
    ) -> Result<CompiledModule, BuildError> {
        let source_text = std::fs::read_to_string(&location.source)?;

        let scratch = tempfile::tempdir()?;
        let iface_dir = scratch.path().join("interfaces");
        for (dep, iface) in deps {
            let dir = lumen_util::fs::ensure_dir(
                iface_dir.join(&dep.package.author).join(&dep.package.project),
            )?;
            std::fs::write(dir.join(format!("{}.lumi", dep.name)), iface.as_bytes())?;
        }

        let iface_out = scratch.path().join("out.lumi");
        let object_out = scratch.path().join("out.lumo");

        let output = CommandBuilder::new(&self.binary)
            .arg("--name")
            .arg(&module.name)
            .arg("--interfaces")
            .arg(&iface_dir)
            .arg("--emit-iface")
            .arg(&iface_out)
            .arg("--emit-js")
            .arg(&object_out)
            .arg(&location.source)
            .exec()
            .map_err(|e| BuildError::Generic {
                message: format!("Failed to execute {}: {e}", self.binary.display()),
            })?;

        if !output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout);
            let stderr = String::from_utf8_lossy(&output.stderr);
            let mut diagnostics = parse_diagnostics(&stdout, &stderr);
            if diagnostics.is_empty() {
                let raw = format!("{stdout}\n{stderr}").trim().to_string();
                diagnostics.push(CompilerDiagnostic {
                    severity: Severity::Error,
                    message: raw,
                    file: None,
                    line: None,
                });
            }
            return Err(BuildError::CompilerErrors {
                path: location.source.clone(),
                source_text,
                diagnostics,
            });
        }

        let iface_bytes = std::fs::read(&iface_out).map_err(|_| BuildError::Generic {
            message: format!("lumenc produced no interface for {module}"),
        })?;
        let object = std::fs::read(&object_out).map_err(|_| BuildError::Generic {
            message: format!("lumenc produced no object for {module}"),
        })?;

        Ok(CompiledModule {
            iface: Interface::from_bytes(iface_bytes),
            object,
        })
    }
}

fn parse_diagnostics(stdout: &str, stderr: &str) -> Vec<CompilerDiagnostic> {
    let mut diagnostics = Vec::new();
    let combined = format!("{stdout}\n{stderr}");

    for line in combined.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if trimmed.contains(": error:") {
            diagnostics.push(parse_diagnostic_line(trimmed, Severity::Error));
        } else if trimmed.contains(": warning:") {
            diagnostics.push(parse_diagnostic_line(trimmed, Severity::Warning));
        } else if trimmed.contains(": info:") {
            diagnostics.push(parse_diagnostic_line(trimmed, Severity::Info));
        }
    }

    diagnostics
}

fn parse_diagnostic_line(line: &str, severity: Severity) -> CompilerDiagnostic {
    // lumenc format: "file.lum:line: severity: message"
    let marker = match severity {
        Severity::Error => ": error:",
        Severity::Warning => ": warning:",
        Severity::Info => ": info:",
    };
    let (location, message) = match line.split_once(marker) {
        Some((loc, msg)) => (loc, msg.trim().to_string()),
        None => ("", line.to_string()),
    };

    let (file, line_num) = match location.rsplit_once(':') {
        Some((file, num)) => match num.parse::<u32>() {
            Ok(n) => (Some(file.to_string()), Some(n)),
            Err(_) => (Some(location.to_string()), None),
        },
        None if location.is_empty() => (None, None),
        None => (Some(location.to_string()), None),
    };

    CompilerDiagnostic {
        severity,
        message,
        file,
        line: line_num,
    }
}
