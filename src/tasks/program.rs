//! Per-program processing: probe, resolve, dispatch, post-actions.
use crate::config::manifest::ProgramDescriptor;
use crate::error::ProgramError;
use crate::exec::{self, ExecutionOutcome};
use crate::logging::ProgramStatus;
use crate::resources::{package, probe};

use super::Context;
use super::action::{self, Action};

/// Result of one post-action command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostActionResult {
    /// Command line as written in the manifest.
    pub command: String,
    /// Whether it ran and exited zero.
    pub succeeded: bool,
}

/// How processing of one program ended.
#[derive(Debug)]
pub enum ProgramOutcome {
    /// The primary action succeeded and post-actions were attempted.
    Completed,
    /// The check command succeeded; nothing was installed.
    AlreadyInstalled,
    /// Nothing was run because the program was not applicable.
    Skipped(ProgramError),
    /// The primary action failed.
    Failed(ProgramError),
    /// Commands were logged instead of run.
    DryRun,
}

impl ProgramOutcome {
    /// Summary status for this outcome.
    #[must_use]
    pub const fn status(&self) -> ProgramStatus {
        match self {
            Self::Completed => ProgramStatus::Ok,
            Self::AlreadyInstalled => ProgramStatus::AlreadyInstalled,
            Self::Skipped(_) => ProgramStatus::Skipped,
            Self::Failed(_) => ProgramStatus::Failed,
            Self::DryRun => ProgramStatus::DryRun,
        }
    }

    /// The error behind a skip or failure.
    #[must_use]
    pub const fn error(&self) -> Option<&ProgramError> {
        match self {
            Self::Skipped(e) | Self::Failed(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ProgramError> for ProgramOutcome {
    fn from(e: ProgramError) -> Self {
        match e {
            ProgramError::ConfigNotFound
            | ProgramError::CommandNotConfigured
            | ProgramError::UnrecognizedAction(_) => Self::Skipped(e),
            _ => Self::Failed(e),
        }
    }
}

/// Everything that happened to one program descriptor.
#[derive(Debug)]
pub struct ProgramReport {
    /// Program name from the manifest.
    pub name: String,
    /// Effective action after inference.
    pub action: Action,
    /// Final outcome of the primary action.
    pub outcome: ProgramOutcome,
    /// Post-actions in the order they ran.
    pub post_actions: Vec<PostActionResult>,
}

/// What the primary action did when it did not fail.
enum Primary {
    Ran,
    AlreadyInstalled,
    DryRun,
}

/// Process a single program for the user in `ctx`.
///
/// Never fails: every error is logged with the program name and captured in
/// the returned report, so the caller can move on to the next program.
pub fn process(ctx: &Context, program: &ProgramDescriptor) -> ProgramReport {
    ctx.log.stage(&format!("checking program: {}", program.name));

    let configured =
        probe::config_exists(&*ctx.fs_ops, &ctx.home, &program.config_paths, &*ctx.log);
    ctx.log.debug(&format!(
        "{}: configuration {}",
        program.name,
        if configured { "found" } else { "not found" }
    ));

    let action = action::resolve(&program.action, configured);
    if program.action.is_empty() {
        ctx.log
            .debug(&format!("{}: inferred action '{action}'", program.name));
    }

    let primary = match &action {
        Action::Install => install(ctx, program),
        Action::Execute => execute(ctx, program, configured),
        Action::Unrecognized(raw) => Err(ProgramError::UnrecognizedAction(raw.clone())),
    };

    let (outcome, post_actions) = match primary {
        Ok(Primary::Ran) => (
            ProgramOutcome::Completed,
            run_post_actions(ctx, &program.post_action),
        ),
        Ok(Primary::DryRun) => {
            for command in &program.post_action {
                ctx.log.dry_run(&format!("would run post-action: {command}"));
            }
            (ProgramOutcome::DryRun, Vec::new())
        }
        Ok(Primary::AlreadyInstalled) => {
            ctx.log
                .info(&format!("{} is already installed", program.name));
            (ProgramOutcome::AlreadyInstalled, Vec::new())
        }
        Err(e) => {
            let outcome = ProgramOutcome::from(e);
            log_stop(ctx, &program.name, &outcome);
            (outcome, Vec::new())
        }
    };

    ProgramReport {
        name: program.name.clone(),
        action,
        outcome,
        post_actions,
    }
}

fn install(ctx: &Context, program: &ProgramDescriptor) -> Result<Primary, ProgramError> {
    if probe::is_installed(&*ctx.executor, &program.check_command) {
        return Ok(Primary::AlreadyInstalled);
    }

    let manager = package::detect(&*ctx.executor).ok_or(ProgramError::NoPackageManagerDetected)?;
    let list = program
        .packages
        .get(manager.command())
        .ok_or(ProgramError::PackagesUndefinedForManager(manager))?;

    if ctx.dry_run {
        ctx.log
            .dry_run(&format!("would install with {manager}: {list}"));
        return Ok(Primary::DryRun);
    }

    ctx.log.info(&format!("installing with {manager}: {list}"));
    let outcome = package::install(&*ctx.executor, manager, &program.packages)?;
    succeed(ctx, outcome, &format!("{manager} install -y {list}"))?;
    Ok(Primary::Ran)
}

fn execute(
    ctx: &Context,
    program: &ProgramDescriptor,
    configured: bool,
) -> Result<Primary, ProgramError> {
    if !configured {
        return Err(ProgramError::ConfigNotFound);
    }
    if program.command.trim().is_empty() {
        return Err(ProgramError::CommandNotConfigured);
    }

    if ctx.dry_run {
        ctx.log
            .dry_run(&format!("would run: {}", program.command));
        return Ok(Primary::DryRun);
    }

    run_command(ctx, &program.command)?;
    Ok(Primary::Ran)
}

/// Run one manifest command line and log its output.
fn run_command(ctx: &Context, command: &str) -> Result<(), ProgramError> {
    ctx.log.info(&format!("running: {command}"));
    let outcome = exec::run_line(&*ctx.executor, command)?;
    succeed(ctx, outcome, command)
}

/// Log the output of a finished command and fail on a non-zero exit.
fn succeed(ctx: &Context, outcome: ExecutionOutcome, command: &str) -> Result<(), ProgramError> {
    let outcome = outcome.check(command)?;
    let output = outcome.output_text();
    if !output.trim().is_empty() {
        ctx.log.debug(&format!("output:\n{}", output.trim_end()));
    }
    Ok(())
}

fn run_post_actions(ctx: &Context, commands: &[String]) -> Vec<PostActionResult> {
    commands
        .iter()
        .map(|command| {
            let result = run_command(ctx, command);
            if let Err(e) = &result {
                ctx.log.error(&format!("post-action failed: {e}"));
                log_failure_output(ctx, e);
            }
            PostActionResult {
                command: command.clone(),
                succeeded: result.is_ok(),
            }
        })
        .collect()
}

fn log_stop(ctx: &Context, name: &str, outcome: &ProgramOutcome) {
    match outcome {
        ProgramOutcome::Skipped(e) => ctx.log.warn(&format!("{name}: skipped: {e}")),
        ProgramOutcome::Failed(e) => {
            ctx.log.error(&format!("{name}: {e}"));
            log_failure_output(ctx, e);
        }
        _ => {}
    }
}

fn log_failure_output(ctx: &Context, e: &ProgramError) {
    if let ProgramError::ProcessFailed { output, .. } = e
        && !output.trim().is_empty()
    {
        ctx.log.info(&format!("output:\n{}", output.trim_end()));
    }
}
