//! Filesystem operation abstractions for dependency injection.
//!
//! Provides the [`FileSystemOps`] trait so that probes and user selection can
//! be unit-tested without touching the real filesystem, including error
//! cases such as permission denied that are awkward to reproduce on disk.

use std::io;
use std::path::Path;

/// Abstraction over the filesystem queries used by the updater.
pub trait FileSystemOps: Send + Sync + std::fmt::Debug {
    /// Query whether `path` exists, following symlinks.
    ///
    /// # Errors
    ///
    /// Returns any error other than "not found" (which maps to `Ok(false)`).
    fn exists(&self, path: &Path) -> io::Result<bool>;

    /// Names of the immediate subdirectories of `path`, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` cannot be read as a directory.
    fn list_dirs(&self, path: &Path) -> io::Result<Vec<String>>;
}

/// Production [`FileSystemOps`] implementation that delegates to [`std::fs`].
#[derive(Debug, Default)]
pub struct SystemFileSystemOps;

impl FileSystemOps for SystemFileSystemOps {
    fn exists(&self, path: &Path) -> io::Result<bool> {
        match std::fs::metadata(path) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn list_dirs(&self, path: &Path) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }
}

/// Mock [`FileSystemOps`] for unit tests.
///
/// ```ignore
/// let fs = MockFileSystemOps::new()
///     .with_existing("/home/alice/.config/app")
///     .with_denied("/home/alice/.secret")
///     .with_dirs("/home", ["alice", "bob"]);
/// ```
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockFileSystemOps {
    existing: Vec<std::path::PathBuf>,
    denied: Vec<std::path::PathBuf>,
    dirs: std::collections::HashMap<std::path::PathBuf, Vec<String>>,
    queried: std::sync::Mutex<Vec<std::path::PathBuf>>,
}

#[cfg(test)]
impl MockFileSystemOps {
    /// Create an empty mock with nothing configured.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `path` as existing.
    #[must_use]
    pub fn with_existing(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.existing.push(path.into());
        self
    }

    /// Make every query for `path` fail with permission denied.
    #[must_use]
    pub fn with_denied(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.denied.push(path.into());
        self
    }

    /// Configure the subdirectory listing of `path`.
    #[must_use]
    pub fn with_dirs<I, S>(mut self, path: impl Into<std::path::PathBuf>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dirs
            .insert(path.into(), names.into_iter().map(Into::into).collect());
        self
    }

    /// Every path passed to [`FileSystemOps::exists`], in call order.
    pub fn queried(&self) -> Vec<std::path::PathBuf> {
        self.queried
            .lock()
            .map_or_else(|_| Vec::new(), |guard| guard.clone())
    }
}

#[cfg(test)]
impl FileSystemOps for MockFileSystemOps {
    fn exists(&self, path: &Path) -> io::Result<bool> {
        if let Ok(mut guard) = self.queried.lock() {
            guard.push(path.to_path_buf());
        }
        if self.denied.iter().any(|p| p == path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "permission denied",
            ));
        }
        Ok(self.existing.iter().any(|p| p == path))
    }

    fn list_dirs(&self, path: &Path) -> io::Result<Vec<String>> {
        self.dirs.get(path).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "no such directory")
        })
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn system_exists_distinguishes_missing() {
        let dir = tempfile::tempdir().unwrap();
        let fs = SystemFileSystemOps;
        assert!(fs.exists(dir.path()).unwrap());
        assert!(!fs.exists(&dir.path().join("nope")).unwrap());
    }

    #[test]
    fn system_list_dirs_skips_files_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("zoe")).unwrap();
        std::fs::create_dir(dir.path().join("alice")).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();
        let names = SystemFileSystemOps.list_dirs(dir.path()).unwrap();
        assert_eq!(names, vec!["alice", "zoe"]);
    }

    #[test]
    fn mock_reports_denied_paths_as_errors() {
        let fs = MockFileSystemOps::new().with_denied("/locked");
        let err = fs.exists(Path::new("/locked")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
    }
}
