//! Command: provision the selected user home directories.
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::cli::GlobalOpts;
use crate::config::Settings;
use crate::error::{ManifestError, UpdaterError};
use crate::exec::{Executor, SystemExecutor};
use crate::fetch;
use crate::logging::{self, Log, Logger};
use crate::platform::Platform;
use crate::resources::package::{self, RefreshOutcome};
use crate::tasks::{self, Context, ProgramReport};
use crate::users;

/// Run the provisioning command.
///
/// Settings are resolved first because they name the log file. After that
/// every step logs through the tracing subscriber.
///
/// # Errors
///
/// Returns an error if the settings or log file cannot be opened, the
/// process is not root, user selection fails, or the manifest for a single
/// selected user cannot be acquired. Failed programs are only reported.
pub fn run(global: &GlobalOpts, verbose: bool) -> Result<()> {
    let settings = Settings::load(global.config.as_deref(), &global.overrides())?;

    logging::init_subscriber(verbose, &settings.log_path).with_context(|| {
        format!("cannot open log file {}", settings.log_path.display())
    })?;
    let log = Arc::new(Logger::new(Some(settings.log_path.as_path())));
    log.info(&format!("prepare-after-updater {}", super::version_string()));

    Platform::detect().require_root()?;

    let ctx = Context::new(
        settings.home_dir.clone(),
        Arc::clone(&log) as Arc<dyn Log>,
        Arc::new(SystemExecutor),
        settings.dry_run,
    );
    let result = provision(&settings, &ctx, io::stdin().lock(), io::stdout());
    finish(&log, result)?;
    Ok(())
}

/// Print the run summary and turn the provisioning result into the exit
/// status.
///
/// Failed programs are reported but do not fail the run; only errors that
/// stopped provisioning as a whole do.
fn finish(
    log: &Logger,
    result: Result<Vec<ProgramReport>, UpdaterError>,
) -> Result<(), UpdaterError> {
    log.print_summary();
    result?;

    let failures = log.failure_count();
    if failures > 0 {
        log.warn(&format!("{failures} program(s) failed, see the log for details"));
    }
    Ok(())
}

/// Refresh the package database, select homes and process each one.
///
/// `ctx` supplies the logger, executor and filesystem; its home is replaced
/// for every selected user. The menu, if shown, reads from `input` and
/// writes to `output`.
///
/// # Errors
///
/// Returns [`UpdaterError::Selection`] when no home can be selected and
/// [`UpdaterError::Manifest`] when the manifest for a single selected user
/// cannot be acquired. With several users, acquisition failures are logged
/// and the next user is processed.
pub fn provision<R: BufRead, W: Write>(
    settings: &Settings,
    ctx: &Context,
    input: R,
    output: W,
) -> Result<Vec<ProgramReport>, UpdaterError> {
    refresh_packages(&*ctx.executor, &*ctx.log, settings.dry_run);

    ctx.log.stage("Selecting users");
    let homes = users::select_homes(&*ctx.fs_ops, settings, input, output, &*ctx.log)?;
    let single = homes.len() == 1;

    let mut reports = Vec::new();
    for home in homes {
        let user_ctx = ctx.for_home(home);
        match process_user(settings, &user_ctx) {
            Ok(mut user_reports) => reports.append(&mut user_reports),
            Err(e) if single => return Err(e.into()),
            Err(e) => ctx.log.error(&format!("{}: {e}", user_ctx.home.display())),
        }
    }
    Ok(reports)
}

/// Acquire the manifest for one home and run its programs.
fn process_user(
    settings: &Settings,
    ctx: &Context,
) -> Result<Vec<ProgramReport>, ManifestError> {
    ctx.log
        .stage(&format!("Processing {}", ctx.home.display()));

    let Some(url) = settings.resource_url.as_deref() else {
        ctx.log
            .warn("no resource URL configured, skipping manifest download");
        return Ok(Vec::new());
    };

    let downloaded = fetch::download(url, &manifest_path(settings, &ctx.home), &*ctx.log)?;
    let manifest = downloaded.manifest();
    ctx.log.info(&format!(
        "{} program(s) in manifest",
        manifest.programs.len()
    ));

    Ok(tasks::run_programs(ctx, manifest))
}

/// Refresh the package database once per run. Failures are only warnings.
fn refresh_packages(executor: &dyn Executor, log: &dyn Log, dry_run: bool) {
    log.stage("Refreshing package database");
    if dry_run {
        log.dry_run("would refresh the package database");
        return;
    }
    match package::refresh_database(executor) {
        Ok(refresh) => {
            if !refresh.output.trim().is_empty() {
                log.debug(refresh.output.trim_end());
            }
            match refresh.outcome {
                RefreshOutcome::Success => {
                    log.info(&format!("package database refreshed with {}", refresh.manager));
                }
                RefreshOutcome::UpdatesAvailable => {
                    log.info("package updates are available");
                }
                RefreshOutcome::Failed(code) => log.warn(&format!(
                    "package database refresh with {} failed (exit {})",
                    refresh.manager,
                    code.map_or_else(|| "signal".to_string(), |c| c.to_string())
                )),
            }
        }
        Err(e) => log.warn(&format!("package database not refreshed: {e}")),
    }
}

/// Path the manifest for `home` is downloaded to.
#[must_use]
pub fn manifest_path(settings: &Settings, home: &Path) -> PathBuf {
    home.join(&settings.download_name)
}
