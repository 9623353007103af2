//! Per-user post-update provisioning.
//!
//! For each selected user home directory the updater fetches a JSON program
//! manifest and, program by program, either installs it with the host
//! package manager or runs its configured command against an existing
//! configuration, followed by its post-actions. One program's failure never
//! stops the others.
//!
//! The public API is organised into layers:
//!
//! - **[`config`]**: run settings and the program manifest
//! - **[`resources`]**: existence probes and package manager primitives
//! - **[`tasks`]**: action resolution, the program processor and the loop
//! - **[`commands`]**: top-level subcommand orchestration (`run`, `autoconfig`, `version`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod fetch;
pub mod logging;
pub mod operations;
pub mod platform;
pub mod resources;
pub mod tasks;
pub mod users;
