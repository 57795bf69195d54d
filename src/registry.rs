//! Directory registry: the set of shared directories and the listing service.
//!
//! The registry is built once at startup and never mutated afterwards, so it
//! is safe to share across request handlers behind an `Arc`. Everything else
//! (availability, file counts, listings) is recomputed from the filesystem on
//! every call; there is no caching and no staleness guarantee.

use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::ShareError;

/// A configured shared directory, described at request time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedDirectory {
    pub path: PathBuf,
    /// True iff the directory exists and is listable right now.
    pub available: bool,
    /// Count of regular-file children; 0 when unavailable.
    pub file_count: usize,
}

/// A regular file directly inside a shared directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
}

/// Ordered, immutable set of shared directory paths.
#[derive(Debug, Default)]
pub struct Registry {
    dirs: Vec<PathBuf>,
}

impl Registry {
    /// Registry holding a single directory (single-directory variant).
    pub fn single(dir: PathBuf) -> Self {
        Self { dirs: vec![dir] }
    }

    /// Load a registry from a newline-delimited file of directory paths.
    ///
    /// Blank lines are skipped and surrounding whitespace is trimmed. A
    /// missing file is not an error: the registry comes back empty and a
    /// warning is logged so the operator can notice. Other I/O errors
    /// propagate.
    pub fn load_from_file(path: &Path) -> io::Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                warn!(
                    "Shares file not found: {}; starting with an empty registry",
                    path.display()
                );
                return Ok(Self::default());
            }
            Err(err) => return Err(err),
        };

        let dirs = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(PathBuf::from)
            .collect();

        Ok(Self { dirs })
    }

    /// All configured directories, in configuration order.
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    /// The one configured directory, iff exactly one is configured.
    ///
    /// Drives the single-directory HTTP surface (`/` file listing and
    /// `/download/:filename`).
    pub fn sole(&self) -> Option<&Path> {
        match self.dirs.as_slice() {
            [dir] => Some(dir),
            _ => None,
        }
    }

    /// Whether `dir` is one of the configured directories.
    ///
    /// Comparison is component-wise, so a trailing slash does not defeat the
    /// check. This is the only gate between a request parameter and the
    /// filesystem.
    pub fn contains(&self, dir: &Path) -> bool {
        self.dirs.iter().any(|d| d == dir)
    }

    /// Describe a directory: availability and regular-file count, right now.
    ///
    /// All OS errors (absent, permission denied) collapse to unavailable with
    /// a count of zero; callers cannot tell the cases apart here.
    pub fn describe(&self, dir: &Path) -> SharedDirectory {
        let file_count = match count_regular_files(dir) {
            Ok(n) => n,
            Err(_) => {
                return SharedDirectory {
                    path: dir.to_path_buf(),
                    available: false,
                    file_count: 0,
                }
            }
        };

        SharedDirectory {
            path: dir.to_path_buf(),
            available: true,
            file_count,
        }
    }

    /// List the regular files directly inside `dir`, sorted case-insensitively.
    ///
    /// `dir` must be registered; that check happens before any filesystem
    /// access. Subdirectories and non-regular files are excluded. Dotfiles
    /// are skipped when `show_hidden` is false.
    pub fn list_files(&self, dir: &Path, show_hidden: bool) -> Result<Vec<FileEntry>, ShareError> {
        if !self.contains(dir) {
            return Err(ShareError::Forbidden(dir.display().to_string()));
        }

        let entries = std::fs::read_dir(dir).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => ShareError::NotFound(dir.display().to_string()),
            io::ErrorKind::PermissionDenied => {
                ShareError::PermissionDenied(dir.display().to_string())
            }
            _ => ShareError::Io(err),
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(ShareError::Io)?;
            let name = entry.file_name().to_string_lossy().to_string();

            if !show_hidden && name.starts_with('.') {
                continue;
            }

            // is_file() follows symlinks, matching the availability check a
            // download would perform for the same entry.
            if entry.path().is_file() {
                files.push(FileEntry { name });
            }
        }

        files.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

        Ok(files)
    }
}

fn count_regular_files(dir: &Path) -> io::Result<usize> {
    let mut count = 0;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.path().is_file() {
            count += 1;
        }
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"data").unwrap();
    }

    #[test]
    fn test_load_from_file_skips_blank_lines() {
        let temp = TempDir::new().unwrap();
        let shares = temp.path().join("shares.txt");
        std::fs::write(&shares, "/shared/a\n\n  \n/shared/b  \n").unwrap();

        let registry = Registry::load_from_file(&shares).unwrap();
        assert_eq!(
            registry.dirs(),
            &[PathBuf::from("/shared/a"), PathBuf::from("/shared/b")]
        );
    }

    #[test]
    fn test_load_from_file_missing_is_empty() {
        let temp = TempDir::new().unwrap();
        let registry = Registry::load_from_file(&temp.path().join("nope.txt")).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_sole() {
        let registry = Registry::single(PathBuf::from("/shared/a"));
        assert_eq!(registry.sole(), Some(Path::new("/shared/a")));

        let temp = TempDir::new().unwrap();
        let shares = temp.path().join("shares.txt");
        std::fs::write(&shares, "/shared/a\n/shared/b\n").unwrap();
        let registry = Registry::load_from_file(&shares).unwrap();
        assert_eq!(registry.sole(), None);
    }

    #[test]
    fn test_contains_ignores_trailing_slash() {
        let registry = Registry::single(PathBuf::from("/shared/a"));
        assert!(registry.contains(Path::new("/shared/a")));
        assert!(registry.contains(Path::new("/shared/a/")));
        assert!(!registry.contains(Path::new("/shared/b")));
    }

    #[test]
    fn test_describe_missing_directory_unavailable() {
        let registry = Registry::single(PathBuf::from("/definitely/not/here"));
        let desc = registry.describe(Path::new("/definitely/not/here"));
        assert!(!desc.available);
        assert_eq!(desc.file_count, 0);
    }

    #[test]
    fn test_describe_counts_regular_files_only() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "a.txt");
        write_file(temp.path(), "b.txt");
        std::fs::create_dir(temp.path().join("sub")).unwrap();

        let registry = Registry::single(temp.path().to_path_buf());
        let desc = registry.describe(temp.path());
        assert!(desc.available);
        assert_eq!(desc.file_count, 2);
    }

    #[test]
    fn test_list_files_sorted_case_insensitively() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "b.txt");
        write_file(temp.path(), "A.txt");
        write_file(temp.path(), "c.txt");

        let registry = Registry::single(temp.path().to_path_buf());
        let files = registry.list_files(temp.path(), true).unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["A.txt", "b.txt", "c.txt"]);
    }

    #[test]
    fn test_list_files_excludes_subdirectories() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "file.txt");
        std::fs::create_dir(temp.path().join("subdir")).unwrap();

        let registry = Registry::single(temp.path().to_path_buf());
        let files = registry.list_files(temp.path(), true).unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["file.txt"]);
    }

    #[test]
    fn test_list_files_hides_dotfiles_when_asked() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "visible.txt");
        write_file(temp.path(), ".hidden");

        let registry = Registry::single(temp.path().to_path_buf());

        let files = registry.list_files(temp.path(), true).unwrap();
        assert_eq!(files.len(), 2);

        let files = registry.list_files(temp.path(), false).unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["visible.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_directory_is_permission_denied() {
        use std::fs::Permissions;
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let locked = temp.path().join("locked");
        std::fs::create_dir(&locked).unwrap();
        write_file(&locked, "file.txt");
        std::fs::set_permissions(&locked, Permissions::from_mode(0o000)).unwrap();

        // Privileged users can list regardless of mode bits; nothing to
        // observe then.
        if std::fs::read_dir(&locked).is_ok() {
            std::fs::set_permissions(&locked, Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let registry = Registry::single(locked.clone());

        let desc = registry.describe(&locked);
        assert!(!desc.available);
        assert_eq!(desc.file_count, 0);

        let result = registry.list_files(&locked, true);
        assert!(matches!(result, Err(ShareError::PermissionDenied(_))));

        // Restore so the tempdir can be removed.
        std::fs::set_permissions(&locked, Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    fn test_list_files_unregistered_is_forbidden() {
        let temp = TempDir::new().unwrap();
        let registry = Registry::single(PathBuf::from("/shared/a"));

        let result = registry.list_files(temp.path(), true);
        assert!(matches!(result, Err(ShareError::Forbidden(_))));
    }

    #[test]
    fn test_list_files_missing_directory_not_found() {
        let missing = PathBuf::from("/definitely/not/here");
        let registry = Registry::single(missing.clone());

        let result = registry.list_files(&missing, true);
        assert!(matches!(result, Err(ShareError::NotFound(_))));
    }
}
