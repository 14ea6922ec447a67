//! File discovery for finding candidate images in the input directory.
//!
//! Enumeration is deliberately non-recursive: label subfolders created by
//! earlier runs live inside the input directory and must not be re-walked.
//! There is no extension filter: any regular file is a candidate, and
//! non-images surface as per-file decode failures.

use std::path::{Path, PathBuf};

use crate::config::ProcessingConfig;

/// Discovers candidate files in the immediate entries of a directory.
pub struct FileDiscovery {
    skip_hidden: bool,
}

impl FileDiscovery {
    /// Create a new file discovery instance.
    pub fn new(config: &ProcessingConfig) -> Self {
        Self {
            skip_hidden: config.skip_hidden,
        }
    }

    /// Enumerate candidate files: immediate regular files of `dir`, skipping
    /// subdirectories and (by default) hidden dot-files.
    ///
    /// Results are sorted by path for deterministic processing order.
    pub fn discover(&self, dir: &Path) -> std::io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();

            if !entry.file_type()?.is_file() {
                continue;
            }
            if self.skip_hidden && is_hidden(&path) {
                continue;
            }
            files.push(path);
        }

        files.sort();
        Ok(files)
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn discovery() -> FileDiscovery {
        FileDiscovery::new(&ProcessingConfig::default())
    }

    #[test]
    fn test_discover_sorted_files_only() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.jpg"), b"x").unwrap();
        std::fs::write(dir.path().join("a.png"), b"x").unwrap();
        std::fs::create_dir(dir.path().join("cat")).unwrap();
        std::fs::write(dir.path().join("cat").join("nested.jpg"), b"x").unwrap();

        let files = discovery().discover(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.png", "b.jpg"]);
    }

    #[test]
    fn test_discover_skips_hidden() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".DS_Store"), b"x").unwrap();
        std::fs::write(dir.path().join("photo.jpg"), b"x").unwrap();

        let files = discovery().discover(dir.path()).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("photo.jpg"));
    }

    #[test]
    fn test_discover_keeps_hidden_when_configured() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".hidden.jpg"), b"x").unwrap();

        let config = ProcessingConfig { skip_hidden: false };
        let files = FileDiscovery::new(&config).discover(dir.path()).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_discover_includes_non_image_extensions() {
        // Non-images are enumerated; they fail later, per file, at decode.
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();

        let files = discovery().discover(dir.path()).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_discover_missing_dir_errors() {
        assert!(discovery().discover(Path::new("/nonexistent")).is_err());
    }
}
