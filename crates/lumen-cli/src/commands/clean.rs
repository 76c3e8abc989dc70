//! Clean command implementation.

use miette::Result;

pub fn exec(quiet: bool) -> Result<()> {
    let project_dir = super::find_project_root()?;
    let freed = lumen_ops::ops_clean::clean(&project_dir, quiet)?;
    tracing::debug!(freed, "clean finished");
    Ok(())
}
