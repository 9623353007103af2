//! Command: print version information.

/// Print the updater version to stdout.
#[allow(clippy::print_stdout)]
pub fn run() {
    println!("prepare-after-updater {}", super::version_string());
}
