//! Program manifest: the per-user list of programs to provision.
use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::null_as_default;
use crate::error::ManifestError;

/// One program entry in the manifest.
///
/// Missing keys and explicit `null` values both deserialize to the empty
/// value; manifests written by older tooling emit `null` for empty lists
/// and maps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgramDescriptor {
    /// Display name, used only in log lines.
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// Paths relative to the user's home; any existing one marks the
    /// program as configured.
    #[serde(deserialize_with = "null_as_default")]
    pub config_paths: Vec<String>,
    /// Command whose zero exit means "already installed".
    #[serde(deserialize_with = "null_as_default")]
    pub check_command: String,
    /// `install`, `execute`, or empty to infer from the configuration state.
    #[serde(deserialize_with = "null_as_default")]
    pub action: String,
    /// Package manager command to whitespace-separated package list.
    #[serde(deserialize_with = "null_as_default")]
    pub packages: BTreeMap<String, String>,
    /// Command line for the execute action.
    #[serde(deserialize_with = "null_as_default")]
    pub command: String,
    /// Command lines run in order after a successful install or execute.
    #[serde(deserialize_with = "null_as_default")]
    pub post_action: Vec<String>,
}

/// Ordered list of programs for one user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    /// Programs in processing order.
    #[serde(deserialize_with = "null_as_default")]
    pub programs: Vec<ProgramDescriptor>,
}

impl Manifest {
    /// Parse a manifest from JSON text.
    ///
    /// # Errors
    ///
    /// Returns the JSON error when `content` is not a valid manifest.
    pub fn parse(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Read and parse the manifest at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Io`] if the file cannot be read and
    /// [`ManifestError::Parse`] if it is not a valid manifest.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Render the manifest as indented JSON.
    ///
    /// # Errors
    ///
    /// Returns the serializer error.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Example manifest written by `autoconfig`: one install entry and one
/// execute entry.
#[must_use]
pub fn template() -> Manifest {
    let post_action = vec!["command1".to_string(), "command2".to_string()];
    Manifest {
        programs: vec![
            ProgramDescriptor {
                name: "Program name".to_string(),
                config_paths: vec![".config/app".to_string()],
                action: "install".to_string(),
                packages: BTreeMap::from([
                    ("apt".to_string(), "package1 package2".to_string()),
                    ("yum".to_string(), "package1 package2".to_string()),
                ]),
                command: "command to execute".to_string(),
                post_action: post_action.clone(),
                ..ProgramDescriptor::default()
            },
            ProgramDescriptor {
                name: "Program name".to_string(),
                config_paths: vec![".config1".to_string(), ".config2".to_string()],
                action: "execute".to_string(),
                command: "command to execute".to_string(),
                post_action,
                ..ProgramDescriptor::default()
            },
        ],
    }
}
