//! # Scanner Module
//!
//! Enumerates the candidate files of a single folder.
//!
//! Enumeration is deliberately shallow: the pipeline processes folders one
//! at a time, so only the folder's own non-directory entries are listed.
//! Matching is an exact, case-sensitive suffix test against the configured
//! extension; the empty suffix matches every file.
//!
//! A folder that cannot be listed is fatal for the whole run - without its
//! contents there are no partial results worth keeping.

use crate::error::ScanError;
use std::path::Path;
use walkdir::WalkDir;

/// Lists a folder's files whose names carry the configured suffix.
#[derive(Debug, Clone)]
pub struct FolderScanner {
    extension: String,
}

impl FolderScanner {
    /// Create a scanner for the given file-name suffix (e.g. `".jpg"`).
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
        }
    }

    /// Exact, case-sensitive suffix test.
    pub fn matches(&self, file_name: &str) -> bool {
        file_name.ends_with(&self.extension)
    }

    /// File names (not paths) of the folder's matching entries, sorted.
    pub fn list_files(&self, folder: &Path) -> Result<Vec<String>, ScanError> {
        if !folder.exists() {
            return Err(ScanError::FolderNotFound {
                path: folder.to_path_buf(),
            });
        }
        if !folder.is_dir() {
            return Err(ScanError::NotAFolder {
                path: folder.to_path_buf(),
            });
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(folder).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| ScanError::ReadFolder {
                path: folder.to_path_buf(),
                source: e.into(),
            })?;
            if entry.file_type().is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if self.matches(&name) {
                files.push(name);
            }
        }

        // Sorted for a deterministic total and stable progress numbering.
        files.sort();
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::TempDir;

    fn touch(dir: &TempDir, name: &str) {
        File::create(dir.path().join(name)).unwrap();
    }

    #[test]
    fn lists_only_files_with_the_suffix() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "a.jpg");
        touch(&dir, "b.jpg");
        touch(&dir, "notes.txt");

        let files = FolderScanner::new(".jpg").list_files(dir.path()).unwrap();
        assert_eq!(files, vec!["a.jpg", "b.jpg"]);
    }

    #[test]
    fn suffix_match_is_case_sensitive() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "lower.jpg");
        touch(&dir, "upper.JPG");

        let files = FolderScanner::new(".jpg").list_files(dir.path()).unwrap();
        assert_eq!(files, vec!["lower.jpg"]);
    }

    #[test]
    fn empty_suffix_matches_every_file() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "a.png");
        touch(&dir, "b");

        let files = FolderScanner::new("").list_files(dir.path()).unwrap();
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn directories_are_excluded() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "a.jpg");
        fs::create_dir(dir.path().join("nested.jpg")).unwrap();

        let files = FolderScanner::new(".jpg").list_files(dir.path()).unwrap();
        assert_eq!(files, vec!["a.jpg"]);
    }

    #[test]
    fn nested_files_are_not_listed() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        File::create(dir.path().join("sub").join("deep.jpg")).unwrap();
        touch(&dir, "top.jpg");

        let files = FolderScanner::new(".jpg").list_files(dir.path()).unwrap();
        assert_eq!(files, vec!["top.jpg"]);
    }

    #[test]
    fn result_is_sorted_by_name() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "c.jpg");
        touch(&dir, "a.jpg");
        touch(&dir, "b.jpg");

        let files = FolderScanner::new(".jpg").list_files(dir.path()).unwrap();
        assert_eq!(files, vec!["a.jpg", "b.jpg", "c.jpg"]);
    }

    #[test]
    fn missing_folder_is_an_error() {
        let result = FolderScanner::new(".jpg").list_files(Path::new("/nonexistent/folder"));
        assert!(matches!(result, Err(ScanError::FolderNotFound { .. })));
    }

    #[test]
    fn a_file_path_is_not_a_folder() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "plain.jpg");

        let result = FolderScanner::new(".jpg").list_files(&dir.path().join("plain.jpg"));
        assert!(matches!(result, Err(ScanError::NotAFolder { .. })));
    }
}
