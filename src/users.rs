//! User home selection: explicit user, interactive menu or every user.
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::error::SelectionError;
use crate::logging::Log;
use crate::operations::FileSystemOps;

/// Whether `name` starts with any of `prefixes`.
#[must_use]
pub fn has_excluded_prefix(name: &str, prefixes: &[String]) -> bool {
    prefixes.iter().any(|p| name.starts_with(p.as_str()))
}

/// Sorted names of the directories under `home_root` that are not excluded.
///
/// # Errors
///
/// Returns [`SelectionError::ReadDir`] if `home_root` cannot be listed.
pub fn candidates(
    fs: &dyn FileSystemOps,
    home_root: &Path,
    exclude: &[String],
    log: &dyn Log,
) -> Result<Vec<String>, SelectionError> {
    let names = fs
        .list_dirs(home_root)
        .map_err(|source| SelectionError::ReadDir {
            path: home_root.to_path_buf(),
            source,
        })?;
    Ok(names
        .into_iter()
        .filter(|name| {
            let excluded = has_excluded_prefix(name, exclude);
            if excluded {
                log.debug(&format!("skipping excluded directory: {name}"));
            }
            !excluded
        })
        .collect())
}

/// Print a numbered menu of `names` and read a 1-based choice.
///
/// Returns the zero-based index of the chosen entry.
///
/// # Errors
///
/// Returns [`SelectionError::InvalidChoice`] when the answer is not one of
/// the listed numbers (including end of input), or
/// [`SelectionError::Prompt`] when the terminal cannot be read or written.
pub fn prompt<R: BufRead, W: Write>(
    names: &[String],
    mut input: R,
    mut output: W,
) -> Result<usize, SelectionError> {
    writeln!(output, "Select a user home directory:")?;
    for (i, name) in names.iter().enumerate() {
        writeln!(output, "{}. {name}", i + 1)?;
    }
    write!(output, "Enter number: ")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim();
    answer
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=names.len()).contains(n))
        .map(|n| n - 1)
        .ok_or_else(|| SelectionError::InvalidChoice(answer.to_string()))
}

/// Resolve the home directories to process for this run.
///
/// `--user` wins when its directory exists; otherwise every candidate is
/// returned with `--all-users`, or the user picks one from a menu.
///
/// # Errors
///
/// Returns an error if the home root cannot be listed, no candidate remains
/// after exclusion, or the menu answer is invalid.
pub fn select_homes<R: BufRead, W: Write>(
    fs: &dyn FileSystemOps,
    settings: &Settings,
    input: R,
    output: W,
    log: &dyn Log,
) -> Result<Vec<PathBuf>, SelectionError> {
    if let Some(user) = &settings.user {
        let path = settings.home_dir.join(user);
        if fs.exists(&path).unwrap_or(false) {
            log.info(&format!("processing requested user: {user}"));
            return Ok(vec![path]);
        }
        log.warn(&format!("user {user} not found, falling back to selection"));
    }

    let names = candidates(fs, &settings.home_dir, &settings.exclude_prefixes, log)?;
    if names.is_empty() {
        return Err(SelectionError::NoCandidates(settings.home_dir.clone()));
    }

    if settings.all_users {
        log.info(&format!("processing {} user(s)", names.len()));
        return Ok(names
            .iter()
            .map(|name| settings.home_dir.join(name))
            .collect());
    }

    let index = prompt(&names, input, output)?;
    let selected = names
        .get(index)
        .map(|name| settings.home_dir.join(name))
        .ok_or_else(|| SelectionError::InvalidChoice(index.to_string()))?;
    log.info(&format!("selected home directory: {}", selected.display()));
    Ok(vec![selected])
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::{Overrides, SettingsFile};
    use crate::operations::MockFileSystemOps;
    use crate::tasks::test_helpers::MemoryLog;

    fn settings(overrides: Overrides) -> Settings {
        Settings::resolve(SettingsFile::default(), &overrides)
    }

    fn home_fs() -> MockFileSystemOps {
        MockFileSystemOps::new()
            .with_dirs("/home", ["a_admin", "adminsec", "alice", "bob"])
            .with_existing("/home/bob")
    }

    #[test]
    fn excluded_prefixes_are_filtered_and_logged() {
        let log = MemoryLog::default();
        let names = candidates(
            &home_fs(),
            Path::new("/home"),
            &["a_".to_string(), "adminsec".to_string()],
            &log,
        )
        .unwrap();
        assert_eq!(names, vec!["alice", "bob"]);
        assert!(log.contains("debug", "skipping excluded directory: a_admin"));
    }

    #[test]
    fn unreadable_root_is_an_error() {
        let err = candidates(
            &MockFileSystemOps::new(),
            Path::new("/nowhere"),
            &[],
            &MemoryLog::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SelectionError::ReadDir { .. }));
    }

    #[test]
    fn prompt_lists_entries_and_accepts_number() {
        let names = vec!["alice".to_string(), "bob".to_string()];
        let mut out = Vec::new();
        let index = prompt(&names, "2\n".as_bytes(), &mut out).unwrap();
        assert_eq!(index, 1);
        let menu = String::from_utf8(out).unwrap();
        insta::assert_snapshot!(menu.trim_end(), @r"
        Select a user home directory:
        1. alice
        2. bob
        Enter number:
        ");
    }

    #[test]
    fn prompt_rejects_out_of_range_and_garbage() {
        let names = vec!["alice".to_string()];
        for answer in ["0\n", "2\n", "x\n", ""] {
            let err = prompt(&names, answer.as_bytes(), Vec::new()).unwrap_err();
            assert!(
                matches!(err, SelectionError::InvalidChoice(_)),
                "answer {answer:?} gave {err}"
            );
        }
    }

    #[test]
    fn existing_requested_user_skips_menu() {
        let settings = settings(Overrides {
            user: Some("bob".into()),
            ..Overrides::default()
        });
        let mut out = Vec::new();
        let homes =
            select_homes(&home_fs(), &settings, "".as_bytes(), &mut out, &MemoryLog::default())
                .unwrap();
        assert_eq!(homes, vec![PathBuf::from("/home/bob")]);
        assert!(out.is_empty(), "menu must not be shown");
    }

    #[test]
    fn missing_requested_user_falls_back_to_menu() {
        let settings = settings(Overrides {
            user: Some("carol".into()),
            ..Overrides::default()
        });
        let log = MemoryLog::default();
        let homes = select_homes(&home_fs(), &settings, "1\n".as_bytes(), Vec::new(), &log)
            .unwrap();
        assert_eq!(homes, vec![PathBuf::from("/home/alice")]);
        assert!(log.contains("warn", "user carol not found"));
    }

    #[test]
    fn all_users_returns_every_candidate() {
        let settings = settings(Overrides {
            all_users: true,
            ..Overrides::default()
        });
        let homes = select_homes(
            &home_fs(),
            &settings,
            "".as_bytes(),
            Vec::new(),
            &MemoryLog::default(),
        )
        .unwrap();
        assert_eq!(
            homes,
            vec![PathBuf::from("/home/alice"), PathBuf::from("/home/bob")]
        );
    }

    #[test]
    fn everything_excluded_is_an_error() {
        let fs = MockFileSystemOps::new().with_dirs("/home", ["a_1", "adminsec"]);
        let err = select_homes(
            &fs,
            &settings(Overrides::default()),
            "1\n".as_bytes(),
            Vec::new(),
            &MemoryLog::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SelectionError::NoCandidates(_)));
    }
}
