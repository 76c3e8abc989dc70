//! Build command implementation.

use std::path::PathBuf;

use miette::Result;

use lumen_ops::ops_build::{self, BuildOptions};

pub fn exec(
    jobs: Option<usize>,
    timings: bool,
    quiet: bool,
    compiler: Option<PathBuf>,
) -> Result<()> {
    let project_dir = super::find_project_root()?;
    tracing::debug!(project_dir = %project_dir.display(), "resolved project root");

    let opts = BuildOptions {
        jobs,
        timings,
        quiet,
        compiler_binary: compiler,
    };
    let report = ops_build::build(&project_dir, &opts)?;
    tracing::debug!(
        total = report.modules_total,
        compiled = report.modules_compiled,
        reused = report.modules_reused,
        "build finished"
    );
    Ok(())
}
