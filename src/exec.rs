//! Command runner: spawn external programs and capture their merged output.
//!
//! Command lines from the manifest are split on whitespace only. There is no
//! shell quoting or escaping, so `sh -c "a b"` is passed as the four
//! arguments `-c`, `"a`, `b"`. Manifests that need a shell must point at a
//! script instead.
use std::io::{self, Read as _};
use std::process::{Command, Stdio};

use crate::error::ProgramError;

/// Result of one finished process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutcome {
    /// `true` iff the process exited with status 0.
    pub succeeded: bool,
    /// Interleaved stdout and stderr.
    pub output: Vec<u8>,
    /// Exit code, `None` when the process was killed by a signal.
    pub code: Option<i32>,
}

impl ExecutionOutcome {
    /// Combined output decoded lossily as UTF-8.
    #[must_use]
    pub fn output_text(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }

    /// Turn a non-zero exit into [`ProgramError::ProcessFailed`].
    ///
    /// # Errors
    ///
    /// Returns `ProcessFailed` carrying `command` and the combined output when
    /// the process did not succeed.
    pub fn check(self, command: &str) -> Result<Self, ProgramError> {
        if self.succeeded {
            Ok(self)
        } else {
            Err(ProgramError::ProcessFailed {
                command: command.to_string(),
                code: self.code,
                output: self.output_text(),
            })
        }
    }
}

/// Process-spawning seam.
///
/// Production code uses [`SystemExecutor`]; tests substitute recording
/// implementations so no real package manager is ever touched.
pub trait Executor: Send + Sync {
    /// Run `program` with `args` to completion.
    ///
    /// A non-zero exit is reported through [`ExecutionOutcome::succeeded`],
    /// not as an error.
    ///
    /// # Errors
    ///
    /// Returns the OS error when the process cannot be spawned or its output
    /// cannot be collected.
    fn run(&self, program: &str, args: &[&str]) -> io::Result<ExecutionOutcome>;

    /// Check if a program is resolvable on `PATH`.
    fn which(&self, program: &str) -> bool;
}

/// [`Executor`] backed by [`std::process::Command`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn run(&self, program: &str, args: &[&str]) -> io::Result<ExecutionOutcome> {
        // One pipe for both streams keeps the output in the order it was written.
        let (mut reader, writer) = io::pipe()?;
        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(writer.try_clone()?)
            .stderr(writer);
        let mut child = cmd.spawn()?;
        // The command still holds write ends of the pipe; they must be closed
        // or the read below never sees EOF.
        drop(cmd);

        let mut output = Vec::new();
        let read = reader.read_to_end(&mut output);
        let status = child.wait()?;
        read?;

        Ok(ExecutionOutcome {
            succeeded: status.success(),
            output,
            code: status.code(),
        })
    }

    fn which(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}

/// Split a command line into executable and arguments.
#[must_use]
pub fn tokenize(command_line: &str) -> Vec<&str> {
    command_line.split_whitespace().collect()
}

/// Tokenize `command_line` and run it.
///
/// # Errors
///
/// Returns [`ProgramError::EmptyCommand`] without spawning anything when the
/// line has no tokens, and a spawn error when the executable cannot be
/// started. A non-zero exit is **not** an error here; see
/// [`ExecutionOutcome::check`].
pub fn run_line(
    executor: &dyn Executor,
    command_line: &str,
) -> Result<ExecutionOutcome, ProgramError> {
    let tokens = tokenize(command_line);
    let Some((program, args)) = tokens.split_first() else {
        return Err(ProgramError::EmptyCommand);
    };
    run_program(executor, program, args)
}

/// Run an already tokenized invocation.
///
/// # Errors
///
/// Returns [`ProgramError::ExecutableNotFound`] when the OS reports the
/// executable missing and [`ProgramError::Spawn`] for any other spawn
/// failure.
pub fn run_program(
    executor: &dyn Executor,
    program: &str,
    args: &[&str],
) -> Result<ExecutionOutcome, ProgramError> {
    executor.run(program, args).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ProgramError::ExecutableNotFound(program.to_string())
        } else {
            ProgramError::Spawn {
                program: program.to_string(),
                source,
            }
        }
    })
}
