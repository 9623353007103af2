//! Command-line interface definition.
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{self, Overrides};

/// Top-level CLI entry point for the post-update provisioning tool.
#[derive(Parser, Debug)]
#[command(
    name = "prepare-after-updater",
    about = "Provision user home directories after a system update",
    version
)]
pub struct Cli {
    /// Subcommand to run; `run` when omitted
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Settings file (JSON)
    #[arg(short, long, global = true, value_name = "PATH", long_help = format!(
        "Settings file (JSON). Must exist when given; otherwise {} is read if present",
        config::DEFAULT_CONFIG_PATH
    ))]
    pub config: Option<PathBuf>,

    /// Directory containing the user home directories [default: /home]
    #[arg(long, global = true, value_name = "DIR")]
    pub home: Option<String>,

    /// Comma-separated home directory prefixes to skip [default: a_,adminsec]
    #[arg(long, global = true, value_name = "P1,P2")]
    pub exclude: Option<String>,

    /// Process this user without showing the selection menu
    #[arg(short, long, global = true, value_name = "NAME")]
    pub user: Option<String>,

    /// Manifest location (http(s):// or file:// URL, or a local path)
    #[arg(long, global = true, value_name = "URL")]
    pub url: Option<String>,

    /// File name the manifest is downloaded to in each home [default: web_cfg.json]
    #[arg(long, global = true, value_name = "NAME")]
    pub download: Option<String>,

    /// Log file [default: /var/log/prepare-after-updater.log]
    #[arg(long, global = true, value_name = "PATH")]
    pub log: Option<String>,

    /// Process every eligible user instead of prompting
    #[arg(long, global = true, conflicts_with = "user")]
    pub all_users: bool,

    /// Preview changes without applying
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,
}

impl GlobalOpts {
    /// Command-line values to merge over the settings file.
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        Overrides {
            home_dir: self.home.clone(),
            exclude: self.exclude.clone(),
            resource_url: self.url.clone(),
            download_name: self.download.clone(),
            log_path: self.log.clone(),
            user: self.user.clone(),
            all_users: self.all_users,
            dry_run: self.dry_run,
        }
    }
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Provision the selected user(s) (default)
    Run,
    /// Write a manifest template and exit
    Autoconfig(AutoconfigOpts),
    /// Print version information
    Version,
}

/// Options for the `autoconfig` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct AutoconfigOpts {
    /// Where to write the template
    pub path: PathBuf,
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_run() {
        let cli = Cli::parse_from(["prepare-after-updater"]);
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn parse_run_with_globals_after_subcommand() {
        let cli = Cli::parse_from([
            "prepare-after-updater",
            "run",
            "--home",
            "/srv/home",
            "--exclude",
            "a_,test",
            "-u",
            "alice",
            "--url",
            "https://example.com/cfg.json",
            "--download",
            "programs.json",
            "--log",
            "/tmp/updater.log",
            "-d",
        ]);
        assert!(matches!(cli.command, Some(Command::Run)));
        let o = cli.global.overrides();
        assert_eq!(o.home_dir.as_deref(), Some("/srv/home"));
        assert_eq!(o.exclude.as_deref(), Some("a_,test"));
        assert_eq!(o.user.as_deref(), Some("alice"));
        assert_eq!(o.resource_url.as_deref(), Some("https://example.com/cfg.json"));
        assert_eq!(o.download_name.as_deref(), Some("programs.json"));
        assert_eq!(o.log_path.as_deref(), Some("/tmp/updater.log"));
        assert!(o.dry_run);
        assert!(!o.all_users);
    }

    #[test]
    fn parse_config_short() {
        let cli = Cli::parse_from(["prepare-after-updater", "-c", "/etc/custom.json"]);
        assert_eq!(cli.global.config, Some(PathBuf::from("/etc/custom.json")));
    }

    #[test]
    fn parse_autoconfig() {
        let cli = Cli::parse_from(["prepare-after-updater", "autoconfig", "/tmp/template.json"]);
        let Some(Command::Autoconfig(opts)) = cli.command else {
            panic!("expected autoconfig, got {:?}", cli.command);
        };
        assert_eq!(opts.path, PathBuf::from("/tmp/template.json"));
    }

    #[test]
    fn autoconfig_requires_path() {
        assert!(Cli::try_parse_from(["prepare-after-updater", "autoconfig"]).is_err());
    }

    #[test]
    fn all_users_conflicts_with_user() {
        assert!(
            Cli::try_parse_from(["prepare-after-updater", "--all-users", "-u", "bob"]).is_err()
        );
    }

    #[test]
    fn parse_version() {
        let cli = Cli::parse_from(["prepare-after-updater", "version"]);
        assert!(matches!(cli.command, Some(Command::Version)));
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::parse_from(["prepare-after-updater", "-v", "run"]);
        assert!(cli.verbose);
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert!(Cli::try_parse_from(["prepare-after-updater", "--nope"]).is_err());
    }

    #[test]
    fn subcommand_list() {
        let names: Vec<String> = Cli::command()
            .get_subcommands()
            .map(|c| c.get_name().to_string())
            .filter(|name| name != "help")
            .collect();
        insta::assert_snapshot!(names.join("\n"), @r"
        run
        autoconfig
        version
        ");
    }
}
