//! Existence probes: is a program configured for this user, is it installed.
use std::path::Path;

use crate::exec::{self, Executor};
use crate::logging::Log;
use crate::operations::FileSystemOps;

/// Return `true` if any of `config_paths` exists under `home`.
///
/// Stops at the first match. Errors other than "not found" count as not
/// existing and are logged as warnings.
pub fn config_exists(
    fs: &dyn FileSystemOps,
    home: &Path,
    config_paths: &[String],
    log: &dyn Log,
) -> bool {
    config_paths.iter().any(|rel| {
        let path = home.join(rel);
        match fs.exists(&path) {
            Ok(found) => found,
            Err(e) => {
                log.warn(&format!("cannot check {}: {e}", path.display()));
                false
            }
        }
    })
}

/// Return `true` if `check_command` resolves on `PATH` and exits zero.
///
/// An empty command or an unresolvable first token means "not installed"
/// and nothing is spawned. A check that fails to run or exits non-zero also
/// means "not installed".
pub fn is_installed(executor: &dyn Executor, check_command: &str) -> bool {
    let tokens = exec::tokenize(check_command);
    let Some((program, args)) = tokens.split_first() else {
        return false;
    };
    if !executor.which(program) {
        return false;
    }
    exec::run_program(executor, program, args).is_ok_and(|outcome| outcome.succeeded)
}
