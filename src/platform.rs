//! Facts about the running process that gate a provisioning run.
use crate::error::UpdaterError;

/// Platform information for the current process.
#[derive(Debug, Clone, Copy)]
pub struct Platform {
    /// Effective user id is 0.
    pub is_root: bool,
}

impl Platform {
    /// Detect the current platform.
    #[must_use]
    pub fn detect() -> Self {
        Self {
            is_root: Self::detect_root(),
        }
    }

    /// Create a platform with explicit values (for testing).
    #[cfg(test)]
    #[must_use]
    pub const fn new(is_root: bool) -> Self {
        Self { is_root }
    }

    /// Fail unless running with root privileges.
    ///
    /// # Errors
    ///
    /// Returns [`UpdaterError::NotRoot`] when the effective uid is not 0.
    pub fn require_root(self) -> Result<(), UpdaterError> {
        if self.is_root {
            Ok(())
        } else {
            Err(UpdaterError::NotRoot)
        }
    }

    #[cfg(unix)]
    fn detect_root() -> bool {
        nix::unistd::geteuid().is_root()
    }

    #[cfg(not(unix))]
    fn detect_root() -> bool {
        false
    }
}
