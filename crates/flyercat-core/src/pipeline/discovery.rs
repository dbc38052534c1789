//! Directory listing for the image folder.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::CatalogError;

/// One entry of the listed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedEntry {
    /// Full path to the entry
    pub path: PathBuf,
    /// File name as listed
    pub file_name: String,
    /// Directories are carried through and skipped by the scheduler
    pub is_dir: bool,
}

#[cfg(test)]
impl ListedEntry {
    /// Build an entry from a path, querying the file system for its kind.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let is_dir = path.is_dir();
        Self {
            path,
            file_name,
            is_dir,
        }
    }
}

/// Lists the immediate children of an image folder.
pub struct FileDiscovery;

impl FileDiscovery {
    /// List every entry directly inside `dir`, sorted by file name.
    ///
    /// Nothing is filtered here: directories and non-image files are
    /// returned as-is. Fails if `dir` is missing, unreadable, or not a
    /// directory.
    pub fn list(dir: &Path) -> Result<Vec<ListedEntry>, CatalogError> {
        let meta = std::fs::metadata(dir).map_err(|source| CatalogError::Directory {
            path: dir.to_path_buf(),
            source,
        })?;
        if !meta.is_dir() {
            return Err(CatalogError::Directory {
                path: dir.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a directory"),
            });
        }

        let mut entries = Vec::new();
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            match entry {
                Ok(entry) => entries.push(ListedEntry {
                    path: entry.path().to_path_buf(),
                    file_name: entry.file_name().to_string_lossy().into_owned(),
                    is_dir: entry.file_type().is_dir(),
                }),
                Err(e) if e.depth() == 0 => {
                    let source = e
                        .into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("directory walk failed"));
                    return Err(CatalogError::Directory {
                        path: dir.to_path_buf(),
                        source,
                    });
                }
                Err(e) => tracing::warn!("Skipping unreadable entry in {:?}: {}", dir, e),
            }
        }

        tracing::debug!("Listed {} entries in {:?}", entries.len(), dir);
        Ok(entries)
    }

    /// Count of entries that are not directories.
    pub fn file_count(entries: &[ListedEntry]) -> usize {
        entries.iter().filter(|e| !e.is_dir).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_includes_dirs_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.jpg"), b"x").unwrap();
        std::fs::write(dir.path().join("a.txt"), b"x").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested").join("deep.jpg"), b"x").unwrap();

        let entries = FileDiscovery::list(dir.path()).unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "b.jpg", "nested"]);
        assert!(entries[2].is_dir);
        assert_eq!(FileDiscovery::file_count(&entries), 2);
    }

    #[test]
    fn test_list_missing_dir_fails() {
        let err = FileDiscovery::list(Path::new("/nonexistent/flyercat/images")).unwrap_err();
        assert!(matches!(err, CatalogError::Directory { .. }));
    }

    #[test]
    fn test_list_file_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.jpg");
        std::fs::write(&file, b"x").unwrap();
        let err = FileDiscovery::list(&file).unwrap_err();
        assert!(matches!(err, CatalogError::Directory { .. }));
    }

    #[test]
    fn test_empty_dir_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FileDiscovery::list(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_listed_entry_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let entry = ListedEntry::from_path(dir.path().join("poster.png"));
        assert_eq!(entry.file_name, "poster.png");
        assert!(!entry.is_dir);
        assert!(ListedEntry::from_path(dir.path()).is_dir);
    }
}
