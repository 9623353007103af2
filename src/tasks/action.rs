//! Action resolution for a single program descriptor.
use std::fmt;

/// What to do with a program once its configuration state is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Install the program through the detected package manager.
    Install,
    /// Run the configured command against an existing configuration.
    Execute,
    /// The manifest asked for something else; kept verbatim for logging.
    Unrecognized(String),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Install => f.write_str("install"),
            Self::Execute => f.write_str("execute"),
            Self::Unrecognized(raw) => write!(f, "{raw}"),
        }
    }
}

/// Determine the effective action.
///
/// An empty `action` is inferred from `config_exists`: a configured program
/// is executed, an unconfigured one is installed. Explicit values are taken
/// as written, whatever the configuration state.
#[must_use]
pub fn resolve(action: &str, config_exists: bool) -> Action {
    match action {
        "" if config_exists => Action::Execute,
        "" | "install" => Action::Install,
        "execute" => Action::Execute,
        other => Action::Unrecognized(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_action_with_config_executes() {
        assert_eq!(resolve("", true), Action::Execute);
    }

    #[test]
    fn empty_action_without_config_installs() {
        assert_eq!(resolve("", false), Action::Install);
    }

    #[test]
    fn explicit_actions_ignore_config_state() {
        for configured in [true, false] {
            assert_eq!(resolve("install", configured), Action::Install);
            assert_eq!(resolve("execute", configured), Action::Execute);
        }
    }

    #[test]
    fn other_values_are_kept_verbatim() {
        assert_eq!(
            resolve("Install", false),
            Action::Unrecognized("Install".to_string())
        );
        assert_eq!(
            resolve("remove", true),
            Action::Unrecognized("remove".to_string())
        );
    }

    #[test]
    fn display_uses_manifest_spelling() {
        assert_eq!(Action::Install.to_string(), "install");
        assert_eq!(Action::Execute.to_string(), "execute");
        assert_eq!(Action::Unrecognized("x y".into()).to_string(), "x y");
    }
}
