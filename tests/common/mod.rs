// Shared helpers for integration tests.
//
// Provides a scripted executor, an in-memory logger and a temporary home
// root so each integration test can drive the orchestration loop without
// spawning a package manager or touching /home.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code, missing_docs)]

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use prepare_after_updater::config::{Overrides, Settings, SettingsFile};
use prepare_after_updater::exec::{ExecutionOutcome, Executor};
use prepare_after_updater::logging::{Log, ProgramEntry, ProgramStatus};
use prepare_after_updater::tasks::Context;

/// Executor that records every command line and answers from a script.
///
/// Programs without a scripted exit code succeed with empty output.
#[derive(Debug, Default)]
pub struct ScriptedExecutor {
    path: HashSet<String>,
    exits: HashMap<String, i32>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `program` resolvable on `PATH`.
    pub fn on_path(mut self, program: &str) -> Self {
        self.path.insert(program.to_string());
        self
    }

    /// Make every run of `program` exit with `code`.
    pub fn exiting(mut self, program: &str, code: i32) -> Self {
        self.exits.insert(program.to_string(), code);
        self
    }

    /// Every command line run so far, program and arguments joined by spaces.
    pub fn command_lines(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }
}

impl Executor for ScriptedExecutor {
    fn run(&self, program: &str, args: &[&str]) -> io::Result<ExecutionOutcome> {
        let mut line = program.to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        self.calls.lock().expect("calls lock").push(line);

        let code = self.exits.get(program).copied().unwrap_or(0);
        Ok(ExecutionOutcome {
            succeeded: code == 0,
            output: format!("{program} exited {code}\n").into_bytes(),
            code: Some(code),
        })
    }

    fn which(&self, program: &str) -> bool {
        self.path.contains(program)
    }
}

/// Logger that keeps every line and program record in memory.
#[derive(Debug, Default)]
pub struct CapturedLog {
    lines: Mutex<Vec<(&'static str, String)>>,
    programs: Mutex<Vec<ProgramEntry>>,
}

impl CapturedLog {
    /// Whether any line at `level` contains `needle`.
    pub fn contains(&self, level: &str, needle: &str) -> bool {
        self.lines
            .lock()
            .expect("lines lock")
            .iter()
            .any(|(l, msg)| *l == level && msg.contains(needle))
    }

    /// Recorded program results, in order.
    pub fn programs(&self) -> Vec<ProgramEntry> {
        self.programs.lock().expect("programs lock").clone()
    }

    fn push(&self, level: &'static str, msg: &str) {
        self.lines
            .lock()
            .expect("lines lock")
            .push((level, msg.to_string()));
    }
}

impl Log for CapturedLog {
    fn stage(&self, msg: &str) {
        self.push("stage", msg);
    }
    fn info(&self, msg: &str) {
        self.push("info", msg);
    }
    fn debug(&self, msg: &str) {
        self.push("debug", msg);
    }
    fn warn(&self, msg: &str) {
        self.push("warn", msg);
    }
    fn error(&self, msg: &str) {
        self.push("error", msg);
    }
    fn dry_run(&self, msg: &str) {
        self.push("dry_run", msg);
    }
    fn record_program(&self, name: &str, status: ProgramStatus, message: Option<&str>) {
        self.programs
            .lock()
            .expect("programs lock")
            .push(ProgramEntry {
                name: name.to_string(),
                status,
                message: message.map(str::to_string),
            });
    }
}

/// A temporary directory standing in for `/home`.
#[derive(Debug)]
pub struct HomeRoot {
    pub root: tempfile::TempDir,
}

impl HomeRoot {
    /// Create an empty home root.
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Create the home directory `name` and return its path.
    pub fn add_user(&self, name: &str) -> PathBuf {
        let home = self.root.path().join(name);
        std::fs::create_dir_all(&home).expect("create home dir");
        home
    }

    /// Create a configuration path inside `user`'s home.
    pub fn add_config(&self, user: &str, relative: &str) {
        let path = self.root.path().join(user).join(relative);
        std::fs::create_dir_all(path).expect("create config dir");
    }

    /// Write a manifest next to the homes and return its `file://` URL.
    pub fn write_manifest(&self, json: &str) -> String {
        let path = self.root.path().join("manifest.json");
        std::fs::write(&path, json).expect("write manifest");
        format!("file://{}", path.display())
    }

    /// Settings rooted at this directory with `overrides` applied.
    pub fn settings(&self, overrides: &Overrides) -> Settings {
        let file = SettingsFile {
            home_dir: self.root.path().display().to_string(),
            ..SettingsFile::default()
        };
        Settings::resolve(file, overrides)
    }
}

/// Context over the real filesystem with scripted commands and captured logs.
pub fn context(executor: &Arc<ScriptedExecutor>, dry_run: bool) -> (Context, Arc<CapturedLog>) {
    let log = Arc::new(CapturedLog::default());
    let ctx = Context::new(
        PathBuf::new(),
        Arc::clone(&log) as Arc<dyn Log>,
        Arc::clone(executor) as Arc<dyn Executor>,
        dry_run,
    );
    (ctx, log)
}
