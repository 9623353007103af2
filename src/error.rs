//! Domain-specific error types for the updater.
//!
//! Internal modules return typed errors built with [`thiserror`], while
//! command handlers at the CLI boundary convert them to [`anyhow::Error`]
//! via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! UpdaterError
//! ├── NotRoot                  : privilege check
//! ├── Settings(SettingsError)  : settings file loading
//! ├── Manifest(ManifestError)  : manifest acquisition and parsing
//! └── Selection(SelectionError): user home selection
//! ```
//!
//! [`ProgramError`] stays outside the aggregate: the program processor logs
//! it and moves on to the next program.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::resources::package::PackageManager;

/// Top-level error type for the updater.
#[derive(Error, Debug)]
pub enum UpdaterError {
    /// The process does not run with root privileges.
    #[error("must be run as root")]
    NotRoot,

    /// Settings could not be loaded.
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    /// The program manifest could not be acquired or parsed.
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// No user home could be selected.
    #[error("User selection error: {0}")]
    Selection(#[from] SelectionError),
}

/// Errors raised while processing one program descriptor.
///
/// Every variant is handled locally: the processor logs it together with the
/// program name and moves on to the next descriptor.
#[derive(Error, Debug)]
pub enum ProgramError {
    /// A command line tokenized to zero parts.
    #[error("empty command")]
    EmptyCommand,

    /// The executable is not resolvable on the search path.
    #[error("executable not found: {0}")]
    ExecutableNotFound(String),

    /// The process could not be started for a reason other than a missing
    /// executable.
    #[error("failed to start '{program}': {source}")]
    Spawn {
        /// Executable that could not be started.
        program: String,
        /// Underlying OS error.
        source: io::Error,
    },

    /// The process ran and exited unsuccessfully.
    #[error("'{command}' failed (exit {})", display_code(.code))]
    ProcessFailed {
        /// The command line as written in the manifest.
        command: String,
        /// Exit code, `None` when terminated by a signal.
        code: Option<i32>,
        /// Combined stdout and stderr.
        output: String,
    },

    /// The descriptor has no package list for the detected manager.
    #[error("packages are not defined for {0}")]
    PackagesUndefinedForManager(PackageManager),

    /// None of the known package managers is installed.
    #[error("no supported package manager found")]
    NoPackageManagerDetected,

    /// The execute action was requested but no configured path exists.
    #[error("configuration not found")]
    ConfigNotFound,

    /// The execute action was requested without a command.
    #[error("no command configured")]
    CommandNotConfigured,

    /// The action field holds something other than install or execute.
    #[error("unrecognized action '{0}'")]
    UnrecognizedAction(String),
}

#[allow(clippy::ref_option)]
fn display_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "signal".to_string(), |c| c.to_string())
}

/// Errors that arise while loading the settings file.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("cannot read settings file {path}: {source}")]
    Io {
        /// Path of the settings file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The settings file is not valid JSON of the expected shape.
    #[error("cannot parse settings file {path}: {source}")]
    Parse {
        /// Path of the settings file.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
}

/// Errors that arise while acquiring or parsing a program manifest.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// The HTTP request failed or returned a non-success status.
    #[error("download from {url} failed: {source}")]
    Download {
        /// Requested URL.
        url: String,
        /// Underlying HTTP client error.
        source: Box<ureq::Error>,
    },

    /// The resource URL uses a scheme other than `file`, `http` or `https`.
    #[error("unsupported resource URL: {0}")]
    UnsupportedUrl(String),

    /// A local file could not be read, copied or written.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path involved in the failed operation.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The manifest is not valid JSON of the expected shape.
    #[error("cannot parse manifest {path}: {source}")]
    Parse {
        /// Path of the manifest file.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
}

/// Errors that arise while choosing a user home directory.
#[derive(Error, Debug)]
pub enum SelectionError {
    /// The home root could not be listed.
    #[error("cannot read directory {path}: {source}")]
    ReadDir {
        /// Home root directory.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Every directory under the home root was excluded (or there were none).
    #[error("no eligible user directories in {0}")]
    NoCandidates(PathBuf),

    /// The interactive answer was not a listed number.
    #[error("invalid selection: {0}")]
    InvalidChoice(String),

    /// Reading the answer or writing the menu failed.
    #[error("prompt I/O failed: {0}")]
    Prompt(#[from] io::Error),
}
