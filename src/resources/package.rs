//! Package manager selection, installation and database refresh.
//!
//! Exit code 100 from a refresh means "updates available" only for
//! `yum`/`dnf check-update`; from `apt`/`apt-get update` it is a failure.
use std::collections::BTreeMap;

use crate::error::ProgramError;
use crate::exec::{self, ExecutionOutcome, Executor};

/// Supported package managers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageManager {
    /// Debian/Ubuntu high-level front end.
    Apt,
    /// Debian/Ubuntu classic front end.
    AptGet,
    /// Fedora/RHEL 8+.
    Dnf,
    /// Older RHEL/CentOS.
    Yum,
}

impl PackageManager {
    /// Install-time detection order: apt family before yum family.
    pub const PRIORITY: [Self; 4] = [Self::Apt, Self::AptGet, Self::Dnf, Self::Yum];

    /// Refresh-time detection order.
    ///
    /// `apt-get` is preferred over `apt` here because `apt` warns that its
    /// CLI is unstable when its output is not a terminal.
    pub const REFRESH_ORDER: [Self; 4] = [Self::AptGet, Self::Apt, Self::Yum, Self::Dnf];

    /// Executable name, also the key used in a program's `packages` map.
    #[must_use]
    pub const fn command(self) -> &'static str {
        match self {
            Self::Apt => "apt",
            Self::AptGet => "apt-get",
            Self::Dnf => "dnf",
            Self::Yum => "yum",
        }
    }

    /// Arguments that refresh the package database.
    const fn refresh_args(self) -> &'static [&'static str] {
        match self {
            Self::Apt | Self::AptGet => &["update"],
            Self::Dnf | Self::Yum => &["check-update"],
        }
    }
}

impl std::fmt::Display for PackageManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.command())
    }
}

/// Return the first manager in `order` that resolves on `PATH`.
fn first_available(executor: &dyn Executor, order: &[PackageManager]) -> Option<PackageManager> {
    order.iter().copied().find(|m| executor.which(m.command()))
}

/// Detect the package manager used for installs.
#[must_use]
pub fn detect(executor: &dyn Executor) -> Option<PackageManager> {
    first_available(executor, &PackageManager::PRIORITY)
}

/// Install the packages listed for `manager`.
///
/// Runs `<manager> install -y <tokens...>` where the tokens come from the
/// whitespace-separated `packages[manager]` string. A non-zero exit is
/// returned as an unsuccessful outcome; the caller decides what it means.
///
/// # Errors
///
/// Returns [`ProgramError::PackagesUndefinedForManager`] when `packages`
/// has no entry for `manager`, or a spawn error when the manager cannot be
/// started.
pub fn install(
    executor: &dyn Executor,
    manager: PackageManager,
    packages: &BTreeMap<String, String>,
) -> Result<ExecutionOutcome, ProgramError> {
    let list = packages
        .get(manager.command())
        .ok_or(ProgramError::PackagesUndefinedForManager(manager))?;
    let mut args = vec!["install", "-y"];
    args.extend(exec::tokenize(list));
    exec::run_program(executor, manager.command(), &args)
}

/// Result of a package database refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The database was refreshed.
    Success,
    /// `check-update` exited 100: the refresh worked and updates are pending.
    UpdatesAvailable,
    /// The refresh command failed with this exit code.
    Failed(Option<i32>),
}

/// A finished package database refresh.
#[derive(Debug, Clone)]
pub struct Refresh {
    /// Manager that performed the refresh.
    pub manager: PackageManager,
    /// Interpreted exit status.
    pub outcome: RefreshOutcome,
    /// Combined output of the refresh command.
    pub output: String,
}

/// Exit code `yum`/`dnf check-update` use for "updates available".
const CHECK_UPDATE_AVAILABLE: i32 = 100;

fn classify_refresh(manager: PackageManager, outcome: &ExecutionOutcome) -> RefreshOutcome {
    if outcome.succeeded {
        return RefreshOutcome::Success;
    }
    match (manager, outcome.code) {
        (PackageManager::Dnf | PackageManager::Yum, Some(CHECK_UPDATE_AVAILABLE)) => {
            RefreshOutcome::UpdatesAvailable
        }
        (_, code) => RefreshOutcome::Failed(code),
    }
}

/// Refresh the package database with the first available manager.
///
/// # Errors
///
/// Returns [`ProgramError::NoPackageManagerDetected`] when no known manager
/// is installed, or a spawn error when it cannot be started.
pub fn refresh_database(executor: &dyn Executor) -> Result<Refresh, ProgramError> {
    let manager = first_available(executor, &PackageManager::REFRESH_ORDER)
        .ok_or(ProgramError::NoPackageManagerDetected)?;
    let outcome = exec::run_program(executor, manager.command(), manager.refresh_args())?;
    Ok(Refresh {
        manager,
        outcome: classify_refresh(manager, &outcome),
        output: outcome.output_text(),
    })
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::resources::test_helpers::RecordingExecutor;

    fn packages(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn display_matches_command() {
        assert_eq!(PackageManager::Apt.to_string(), "apt");
        assert_eq!(PackageManager::AptGet.to_string(), "apt-get");
        assert_eq!(PackageManager::Dnf.to_string(), "dnf");
        assert_eq!(PackageManager::Yum.to_string(), "yum");
    }

    #[test]
    fn detect_prefers_apt_over_yum() {
        let executor = RecordingExecutor::new().with_path(["yum", "apt"]);
        assert_eq!(detect(&executor), Some(PackageManager::Apt));
    }

    #[test]
    fn detect_prefers_dnf_over_yum() {
        let executor = RecordingExecutor::new().with_path(["yum", "dnf"]);
        assert_eq!(detect(&executor), Some(PackageManager::Dnf));
    }

    #[test]
    fn detect_falls_back_to_apt_get() {
        let executor = RecordingExecutor::new().with_path(["apt-get"]);
        assert_eq!(detect(&executor), Some(PackageManager::AptGet));
    }

    #[test]
    fn detect_none_when_nothing_installed() {
        let executor = RecordingExecutor::new();
        assert_eq!(detect(&executor), None);
    }

    #[test]
    fn install_builds_yes_invocation() {
        let executor = RecordingExecutor::new();
        let pkgs = packages(&[("apt", "vim  git\tcurl"), ("yum", "vim-enhanced")]);
        let outcome = install(&executor, PackageManager::Apt, &pkgs).unwrap();
        assert!(outcome.succeeded);
        assert_eq!(
            executor.calls(),
            vec![(
                "apt".to_string(),
                vec!["install", "-y", "vim", "git", "curl"]
                    .into_iter()
                    .map(String::from)
                    .collect::<Vec<_>>()
            )]
        );
    }

    #[test]
    fn install_without_entry_fails_and_spawns_nothing() {
        let executor = RecordingExecutor::new();
        let pkgs = packages(&[("apt", "vim")]);
        let err = install(&executor, PackageManager::Dnf, &pkgs).unwrap_err();
        assert!(matches!(
            err,
            ProgramError::PackagesUndefinedForManager(PackageManager::Dnf)
        ));
        assert!(executor.calls().is_empty());
        assert_eq!(pkgs.len(), 1, "other entries must be left alone");
    }

    #[test]
    fn install_failure_is_reported_as_outcome() {
        let executor = RecordingExecutor::new().with_response("apt", false, "E: not found");
        let pkgs = packages(&[("apt", "nonexistent-pkg")]);
        let outcome = install(&executor, PackageManager::Apt, &pkgs).unwrap();
        assert!(!outcome.succeeded);
        assert_eq!(outcome.output_text(), "E: not found");
    }

    #[test]
    fn refresh_uses_update_for_apt_get() {
        let executor = RecordingExecutor::new().with_path(["apt", "apt-get"]);
        let refresh = refresh_database(&executor).unwrap();
        assert_eq!(refresh.manager, PackageManager::AptGet);
        assert_eq!(refresh.outcome, RefreshOutcome::Success);
        assert_eq!(executor.calls()[0].1, vec!["update".to_string()]);
    }

    #[test]
    fn refresh_exit_100_from_check_update_means_updates_available() {
        let executor = RecordingExecutor::new()
            .with_path(["dnf"])
            .with_exit("dnf", 100, "");
        let refresh = refresh_database(&executor).unwrap();
        assert_eq!(refresh.outcome, RefreshOutcome::UpdatesAvailable);
        assert_eq!(executor.calls()[0].1, vec!["check-update".to_string()]);
    }

    #[test]
    fn refresh_exit_100_from_apt_is_a_failure() {
        let executor = RecordingExecutor::new()
            .with_path(["apt-get"])
            .with_exit("apt-get", 100, "E: Could not get lock");
        let refresh = refresh_database(&executor).unwrap();
        assert_eq!(refresh.outcome, RefreshOutcome::Failed(Some(100)));
    }

    #[test]
    fn refresh_without_manager_is_an_error() {
        let executor = RecordingExecutor::new();
        assert!(matches!(
            refresh_database(&executor),
            Err(ProgramError::NoPackageManagerDetected)
        ));
    }
}
