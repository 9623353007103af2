//! Core logging types: program entries, status, and the [`Log`] trait.

/// Per-program result for summary reporting.
#[derive(Debug, Clone)]
pub struct ProgramEntry {
    /// Program name as written in the manifest.
    pub name: String,
    /// Final status of the program.
    pub status: ProgramStatus,
    /// Optional detail message (e.g., skip reason or error description).
    pub message: Option<String>,
}

/// Status of a processed program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramStatus {
    /// Primary action succeeded; post-actions were attempted.
    Ok,
    /// The check command succeeded, so nothing was installed.
    AlreadyInstalled,
    /// Processing stopped without running anything (config missing, no
    /// command, unrecognized action).
    Skipped,
    /// Dry-run mode; commands were logged but not run.
    DryRun,
    /// The primary action failed.
    Failed,
}

/// Abstraction over logging backends.
///
/// The program processor only ever talks to this trait, so the console and
/// file fan-out stays in [`Logger`](super::logger::Logger) and tests can
/// capture lines in memory.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
    /// Record a program result for the summary.
    fn record_program(&self, name: &str, status: ProgramStatus, message: Option<&str>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn program_status_equality() {
        assert_eq!(ProgramStatus::Ok, ProgramStatus::Ok);
        assert_ne!(ProgramStatus::Ok, ProgramStatus::Failed);
        assert_ne!(ProgramStatus::Skipped, ProgramStatus::AlreadyInstalled);
    }
}
