//! Command dispatch and handler modules.

mod build;
mod clean;

use std::path::PathBuf;

use miette::Result;

use lumen_core::project::{ProjectFile, PROJECT_FILE};
use lumen_util::errors::BuildError;

use crate::cli::{Cli, Command};

/// Route a parsed CLI invocation to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Build {
            jobs,
            timings,
            quiet,
            compiler,
        } => build::exec(jobs, timings, quiet, compiler),
        Command::Clean { quiet } => clean::exec(quiet),
    }
}

/// Locate the project root by walking up from the current directory.
pub(crate) fn find_project_root() -> Result<PathBuf> {
    let cwd = std::env::current_dir().map_err(BuildError::Io)?;
    ProjectFile::locate(&cwd).ok_or_else(|| {
        BuildError::Generic {
            message: format!(
                "could not find {PROJECT_FILE} in {} or any parent directory",
                cwd.display()
            ),
        }
        .into()
    })
}
