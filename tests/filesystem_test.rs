//! Tests for the FileSystem trait's real implementation

use std::fs;

use tempfile::TempDir;

use treepick::infrastructure::traits::{FileSystem, RealFileSystem};

#[test]
fn given_new_file_when_write_then_content_is_readable() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("session.toml");
    let fs = RealFileSystem;

    // Act
    fs.write(&path, "[expertise]\n").unwrap();

    // Assert
    assert!(fs.exists(&path));
    assert_eq!(fs.read_to_string(&path).unwrap(), "[expertise]\n");
}

#[test]
fn given_existing_file_when_write_then_replaces_content() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("session.toml");
    fs::write(&path, "old content that is longer than the new one").unwrap();
    let rfs = RealFileSystem;

    rfs.write(&path, "new").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    // no temp files left behind next to the target
    let entries: Vec<_> = fs::read_dir(temp.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn given_nested_path_when_ensure_parent_then_creates_directories() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("a").join("b").join("session.toml");
    let fs = RealFileSystem;

    fs.ensure_parent(&path).unwrap();
    fs.write(&path, "x").unwrap();

    assert!(temp.path().join("a").join("b").is_dir());
    assert!(fs.exists(&path));
}

#[test]
fn given_file_when_remove_file_then_no_longer_exists() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("gone.toml");
    fs::write(&path, "x").unwrap();
    let fs = RealFileSystem;

    fs.remove_file(&path).unwrap();

    assert!(!fs.exists(&path));
}

#[test]
fn given_missing_file_when_read_then_returns_error() {
    let temp = TempDir::new().unwrap();
    let fs = RealFileSystem;

    let result = fs.read_to_string(&temp.path().join("missing.toml"));

    assert!(result.is_err());
}
