//! Operation: remove everything the build driver persisted.

use std::path::Path;

use lumen_util::errors::{BuildError, BuildResult};
use lumen_util::progress::{status, status_info};

/// Delete the project's `lumen-stuff` directory.
///
/// Returns the number of bytes freed (zero when there was nothing to do).
pub fn clean(project_dir: &Path, quiet: bool) -> BuildResult<u64> {
    let stuff = lumen_util::stuff_dir(project_dir);
    if !stuff.is_dir() {
        if !quiet {
            status_info("Clean", "nothing to remove");
        }
        return Ok(0);
    }

    let bytes = lumen_util::fs::dir_size(&stuff);
    std::fs::remove_dir_all(&stuff).map_err(BuildError::Io)?;
    if !quiet {
        status("Cleaned", &format!("removed {}", human_size(bytes)));
    }
    Ok(bytes)
}

fn human_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * KIB;
    if bytes >= MIB {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{bytes} B")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn human_size_units() {
        assert_eq!(human_size(512), "512 B");
        assert_eq!(human_size(2048), "2.0 KiB");
        assert_eq!(human_size(3 * 1024 * 1024), "3.0 MiB");
    }

    #[test]
    fn clean_missing_stuff_is_zero() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(clean(tmp.path(), true).unwrap(), 0);
    }

    #[test]
    fn clean_removes_stuff_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let stuff = lumen_util::stuff_dir(tmp.path());
        std::fs::create_dir_all(stuff.join("build-artifacts")).unwrap();
        std::fs::write(stuff.join("build-artifacts").join("x"), [0u8; 64]).unwrap();

        let freed = clean(tmp.path(), true).unwrap();
        assert_eq!(freed, 64);
        assert!(!stuff.exists());
    }
}
