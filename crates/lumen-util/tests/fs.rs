use lumen_util::fs::{dir_size, ensure_dir, mtime};
use tempfile::TempDir;

#[test]
fn ensure_dir_creates_nested_and_returns_path() {
    let tmp = TempDir::new().unwrap();
    let deep = ensure_dir(tmp.path().join("a").join("b").join("c")).unwrap();
    assert!(deep.is_dir());
    assert_eq!(deep, tmp.path().join("a").join("b").join("c"));
}

#[test]
fn ensure_dir_accepts_existing_directory() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("already");
    std::fs::create_dir(&dir).unwrap();
    let returned = ensure_dir(&dir).unwrap();
    assert!(returned.is_dir());
}

#[test]
fn mtime_missing_file_is_none() {
    let tmp = TempDir::new().unwrap();
    assert_eq!(mtime(&tmp.path().join("ghost")), None);
}

#[test]
fn mtime_present_file() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("Main.lum");
    std::fs::write(&file, "module Main").unwrap();
    assert!(mtime(&file).is_some());
}

#[test]
fn dir_size_counts_nested_files() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("a"), [0u8; 10]).unwrap();
    let sub = tmp.path().join("sub");
    std::fs::create_dir(&sub).unwrap();
    std::fs::write(sub.join("b"), [0u8; 32]).unwrap();
    assert_eq!(dir_size(tmp.path()), 42);
}
