//! Test utilities for gobuild

use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

/// Create a temporary source tree with the given files
pub fn create_repo_with_structure(structure: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    for (path, content) in structure {
        let full_path = root.join(path);

        // Create parent directories if needed
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }

        fs::write(&full_path, content).unwrap();
    }

    temp_dir
}

/// Pin a file's modification time to `secs` after the epoch
pub fn set_mtime(path: &Path, secs: u64) {
    let file = fs::File::options().write(true).open(path).unwrap();
    file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
        .unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_repo_with_structure() {
        let temp_dir = create_repo_with_structure(&[
            ("app.go", "package main\n"),
            ("lib/log.go", "package log\n"),
        ]);
        let root = temp_dir.path();

        assert!(root.join("app.go").exists());
        assert!(root.join("lib/log.go").exists());
    }

    #[test]
    fn test_set_mtime() {
        let temp_dir = create_repo_with_structure(&[("app.go", "")]);
        let path = temp_dir.path().join("app.go");
        set_mtime(&path, 42);

        let modified = fs::metadata(&path).unwrap().modified().unwrap();
        assert_eq!(modified, SystemTime::UNIX_EPOCH + Duration::from_secs(42));
    }
}
