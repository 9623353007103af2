//! Shared state handed to every program being processed.
use std::path::PathBuf;
use std::sync::Arc;

use crate::exec::Executor;
use crate::logging::Log;
use crate::operations::{FileSystemOps, SystemFileSystemOps};

/// Shared context for processing one user's programs.
pub struct Context {
    /// Home directory of the user being provisioned.
    pub home: PathBuf,
    /// Logger for output and program recording.
    pub log: Arc<dyn Log>,
    /// Command executor (for testing or real system calls).
    pub executor: Arc<dyn Executor>,
    /// Filesystem operation abstraction (injectable for testing).
    pub fs_ops: Arc<dyn FileSystemOps>,
    /// Whether to preview commands instead of running them.
    pub dry_run: bool,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("home", &self.home)
            .field("log", &"<dyn Log>")
            .field("executor", &"<dyn Executor>")
            .field("fs_ops", &"<dyn FileSystemOps>")
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl Context {
    /// Creates a context for `home` backed by the real filesystem.
    #[must_use]
    pub fn new(
        home: PathBuf,
        log: Arc<dyn Log>,
        executor: Arc<dyn Executor>,
        dry_run: bool,
    ) -> Self {
        Self {
            home,
            log,
            executor,
            fs_ops: Arc::new(SystemFileSystemOps),
            dry_run,
        }
    }

    /// Create a copy of this context for another user's home.
    ///
    /// The logger, executor and filesystem are shared by reference, so a
    /// multi-user run accumulates one summary.
    #[must_use]
    pub fn for_home(&self, home: PathBuf) -> Self {
        Self {
            home,
            log: Arc::clone(&self.log),
            executor: Arc::clone(&self.executor),
            fs_ops: Arc::clone(&self.fs_ops),
            dry_run: self.dry_run,
        }
    }

    /// Create a copy of this context with a different [`FileSystemOps`] implementation.
    ///
    /// Used in tests to inject a [`MockFileSystemOps`](crate::operations::MockFileSystemOps)
    /// so that probes can be exercised without touching the real filesystem.
    #[must_use]
    pub fn with_fs_ops(&self, fs_ops: Arc<dyn FileSystemOps>) -> Self {
        Self {
            home: self.home.clone(),
            log: Arc::clone(&self.log),
            executor: Arc::clone(&self.executor),
            fs_ops,
            dry_run: self.dry_run,
        }
    }
}
