//! Run settings: defaults, the optional JSON settings file and CLI overrides.
pub mod manifest;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};

use crate::error::SettingsError;

/// Settings file read when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/prepare-after-updater/config.json";
/// Root of the user home directories.
pub const DEFAULT_HOME_DIR: &str = "/home";
/// Log file appended to by every run.
pub const DEFAULT_LOG_PATH: &str = "/var/log/prepare-after-updater.log";
/// Home directory prefixes that are never offered for processing.
pub const DEFAULT_EXCLUDE: &str = "a_,adminsec";
/// File name the manifest is downloaded to inside a user's home.
pub const DEFAULT_DOWNLOAD_NAME: &str = "web_cfg.json";

/// Deserialize `null` the same way as a missing key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// On-disk settings file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SettingsFile {
    /// Where each user's manifest is fetched from.
    #[serde(deserialize_with = "null_as_default")]
    pub resource_url: String,
    /// Root of the user home directories.
    #[serde(deserialize_with = "null_as_default")]
    pub home_dir: String,
    /// Log file path.
    #[serde(deserialize_with = "null_as_default")]
    pub log_path: String,
    /// Excluded home directory prefixes.
    #[serde(deserialize_with = "null_as_default")]
    pub exclude_prefixes: Vec<String>,
}

impl SettingsFile {
    /// Load the settings file.
    ///
    /// An explicit `path` must exist. Without one, [`DEFAULT_CONFIG_PATH`] is
    /// tried and a missing file yields the empty settings.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Io`] if the file cannot be read (or an
    /// explicit file is missing) and [`SettingsError::Parse`] if it is not
    /// valid JSON.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let (path, required) = match path {
            Some(p) => (p, true),
            None => (Path::new(DEFAULT_CONFIG_PATH), false),
        };
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if !required && e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(SettingsError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        serde_json::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Values given on the command line. `None` (or an empty string) defers to
/// the settings file, then to the built-in default.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// `--home`
    pub home_dir: Option<String>,
    /// `--exclude`, comma separated.
    pub exclude: Option<String>,
    /// `--url`
    pub resource_url: Option<String>,
    /// `--download`
    pub download_name: Option<String>,
    /// `--log`
    pub log_path: Option<String>,
    /// `--user`
    pub user: Option<String>,
    /// `--all-users`
    pub all_users: bool,
    /// `--dry-run`
    pub dry_run: bool,
}

/// Immutable settings for one run, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Manifest location; `None` means users are skipped.
    pub resource_url: Option<String>,
    /// Root of the user home directories.
    pub home_dir: PathBuf,
    /// Log file path.
    pub log_path: PathBuf,
    /// Home directory name prefixes to leave alone.
    pub exclude_prefixes: Vec<String>,
    /// Manifest file name inside each home.
    pub download_name: String,
    /// User requested with `--user`.
    pub user: Option<String>,
    /// Process every eligible user instead of prompting.
    pub all_users: bool,
    /// Preview instead of running commands.
    pub dry_run: bool,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn split_prefixes(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}

impl Settings {
    /// Merge CLI `overrides` over `file` over the defaults.
    #[must_use]
    pub fn resolve(file: SettingsFile, overrides: &Overrides) -> Self {
        let pick = |flag: Option<&String>, from_file: &str, default: &str| -> String {
            non_empty(flag.map(String::as_str))
                .or_else(|| non_empty(Some(from_file)))
                .unwrap_or(default)
                .to_string()
        };

        let exclude_prefixes = match non_empty(overrides.exclude.as_deref()) {
            Some(list) => split_prefixes(list),
            None if !file.exclude_prefixes.is_empty() => file.exclude_prefixes,
            None => split_prefixes(DEFAULT_EXCLUDE),
        };

        let resource_url = non_empty(overrides.resource_url.as_deref())
            .or_else(|| non_empty(Some(file.resource_url.as_str())))
            .map(String::from);

        Self {
            resource_url,
            home_dir: PathBuf::from(pick(
                overrides.home_dir.as_ref(),
                &file.home_dir,
                DEFAULT_HOME_DIR,
            )),
            log_path: PathBuf::from(pick(
                overrides.log_path.as_ref(),
                &file.log_path,
                DEFAULT_LOG_PATH,
            )),
            exclude_prefixes,
            download_name: pick(overrides.download_name.as_ref(), "", DEFAULT_DOWNLOAD_NAME),
            user: non_empty(overrides.user.as_deref()).map(String::from),
            all_users: overrides.all_users,
            dry_run: overrides.dry_run,
        }
    }

    /// Load the settings file at `config` (or the default location) and
    /// apply `overrides`.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file cannot be loaded.
    pub fn load(config: Option<&Path>, overrides: &Overrides) -> Result<Self, SettingsError> {
        Ok(Self::resolve(SettingsFile::load(config)?, overrides))
    }
}
