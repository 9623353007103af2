//! Structured logger with dry-run awareness and summary collection.
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::subscriber::{DRY_RUN_TARGET, STAGE_TARGET};
use super::types::{Log, ProgramEntry, ProgramStatus};

/// Implement the display methods of [`Log`] by delegating to inherent methods
/// of the same name on the implementing type.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Logger that emits through [`tracing`] and collects per-program results.
///
/// Console and file output are configured once by
/// [`init_subscriber`](super::subscriber::init_subscriber); this type only
/// remembers the log path for the summary footer.
#[derive(Debug)]
pub struct Logger {
    programs: Mutex<Vec<ProgramEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a new logger writing its summary footer for `log_file`.
    #[must_use]
    pub fn new(log_file: Option<&Path>) -> Self {
        Self {
            programs: Mutex::new(Vec::new()),
            log_file: log_file.map(Path::to_path_buf),
        }
    }

    /// Return a clone of all recorded entries (test-only).
    #[cfg(test)]
    pub(crate) fn program_entries(&self) -> Vec<ProgramEntry> {
        self.programs.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose; always
    /// written to the log file).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a dry-run action message.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{msg}");
    }

    /// Record a program result for the summary.
    pub fn record_program(&self, name: &str, status: ProgramStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.programs.lock() {
            guard.push(ProgramEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Count the number of failed programs.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.programs.lock().map_or(0, |guard| {
            guard
                .iter()
                .filter(|p| p.status == ProgramStatus::Failed)
                .count()
        })
    }

    /// Print the summary of all recorded programs.
    pub fn print_summary(&self) {
        let programs = match self.programs.lock() {
            Ok(guard) => guard.clone(),
            Err(_) => return,
        };
        if programs.is_empty() {
            return;
        }

        self.stage("Summary");

        let mut ok = 0u32;
        let mut installed = 0u32;
        let mut skipped = 0u32;
        let mut dry_run = 0u32;
        let mut failed = 0u32;

        for program in &programs {
            let (icon, color) = match program.status {
                ProgramStatus::Ok => {
                    ok += 1;
                    ("✓", "\x1b[32m")
                }
                ProgramStatus::AlreadyInstalled => {
                    installed += 1;
                    ("·", "\x1b[2m")
                }
                ProgramStatus::Skipped => {
                    skipped += 1;
                    ("○", "\x1b[33m")
                }
                ProgramStatus::DryRun => {
                    dry_run += 1;
                    ("~", "\x1b[37m")
                }
                ProgramStatus::Failed => {
                    failed += 1;
                    ("✗", "\x1b[31m")
                }
            };

            let suffix = program
                .message
                .as_ref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));

            self.info(&format!("{color}{icon} {}{suffix}\x1b[0m", program.name));
        }

        let total = ok + installed + skipped + dry_run + failed;
        self.info(&format!(
            "{total} programs: \x1b[32m{ok} ok\x1b[0m, \x1b[2m{installed} already installed\x1b[0m, \x1b[33m{skipped} skipped\x1b[0m, \x1b[37m{dry_run} dry-run\x1b[0m, \x1b[31m{failed} failed\x1b[0m"
        ));

        if let Some(path) = &self.log_file {
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error, dry_run);

    fn record_program(&self, name: &str, status: ProgramStatus, message: Option<&str>) {
        self.record_program(name, status, message);
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::isolated_logger;
    use std::fs;

    #[test]
    fn logger_new_has_no_entries() {
        let (log, _tmp, _guard) = isolated_logger();
        assert!(log.program_entries().is_empty());
    }

    #[test]
    fn record_program_with_message() {
        let (log, _tmp, _guard) = isolated_logger();
        log.record_program("vim", ProgramStatus::Skipped, Some("configuration not found"));
        let entries = log.program_entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "vim");
        assert_eq!(
            entries[0].message,
            Some("configuration not found".to_string())
        );
    }

    #[test]
    fn failure_count_returns_correct_count() {
        let (log, _tmp, _guard) = isolated_logger();
        assert_eq!(log.failure_count(), 0);
        log.record_program("a", ProgramStatus::Ok, None);
        log.record_program("b", ProgramStatus::Failed, Some("error 1"));
        log.record_program("c", ProgramStatus::Failed, Some("error 2"));
        log.record_program("d", ProgramStatus::AlreadyInstalled, None);
        assert_eq!(log.failure_count(), 2);
    }

    #[test]
    fn log_trait_delegates_to_logger() {
        let (log, _tmp, _guard) = isolated_logger();
        let log_ref: &dyn Log = &log;
        log_ref.record_program("via-trait", ProgramStatus::Ok, None);
        assert_eq!(log.program_entries().len(), 1);
    }

    #[test]
    fn debug_always_written_to_file() {
        let (log, tmp, _guard) = isolated_logger();
        let marker = format!("debug-marker-{}", std::process::id());
        log.debug(&marker);
        let contents = fs::read_to_string(tmp.path().join("test.log")).unwrap();
        assert!(contents.contains("[debug]"));
        assert!(contents.contains(&marker));
    }

    #[test]
    fn stage_written_to_file_with_arrow() {
        let (log, tmp, _guard) = isolated_logger();
        log.stage("checking program: vim");
        let contents = fs::read_to_string(tmp.path().join("test.log")).unwrap();
        assert!(contents.contains("==> checking program: vim"));
    }

    #[test]
    fn summary_is_written_with_counts() {
        let (log, tmp, _guard) = isolated_logger();
        log.record_program("vim", ProgramStatus::Ok, None);
        log.record_program("git", ProgramStatus::Failed, Some("boom"));
        log.print_summary();
        let contents = fs::read_to_string(tmp.path().join("test.log")).unwrap();
        assert!(contents.contains("==> Summary"));
        assert!(contents.contains("✗ git (boom)"), "got: {contents}");
        assert!(contents.contains("2 programs: 1 ok"), "got: {contents}");
    }
}
