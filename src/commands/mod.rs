//! Top-level subcommand handlers.
pub mod autoconfig;
pub mod run;
pub mod version;

/// Version reported by `version`, the log header and the run banner.
///
/// Release builds stamp it through `UPDATER_VERSION`; otherwise the crate
/// version is used.
#[must_use]
pub fn version_string() -> &'static str {
    option_env!("UPDATER_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}
