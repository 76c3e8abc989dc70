use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Create `dir` and any missing parents, handing the path back.
///
/// Lets callers build a nested path and materialize it in one step:
/// `let out = ensure_dir(root.join("a").join("b"))?;`
pub fn ensure_dir(dir: impl Into<PathBuf>) -> std::io::Result<PathBuf> {
    let dir = dir.into();
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Modification time of a file, or `None` if the file is missing or its
/// metadata cannot be read.
pub fn mtime(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).ok()?.modified().ok()
}

/// Total size in bytes of a directory tree. Unreadable entries count as zero.
pub fn dir_size(path: &Path) -> u64 {
    let mut total = 0u64;
    if let Ok(entries) = std::fs::read_dir(path) {
        for entry in entries.flatten() {
            if let Ok(m) = entry.metadata() {
                if m.is_dir() {
                    total += dir_size(&entry.path());
                } else {
                    total += m.len();
                }
            }
        }
    }
    total
}
