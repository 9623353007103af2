//! Program processing: the per-user orchestration loop and its parts.
pub mod action;
mod context;
pub mod program;

pub use context::Context;
pub use program::{PostActionResult, ProgramOutcome, ProgramReport};

use crate::config::manifest::Manifest;

/// Process every program in `manifest`, in order, for the user in `ctx`.
///
/// A program's failure never affects the ones after it. Each report is
/// recorded in the logger's run summary before it is returned.
pub fn run_programs(ctx: &Context, manifest: &Manifest) -> Vec<ProgramReport> {
    manifest
        .programs
        .iter()
        .map(|descriptor| {
            let report = program::process(ctx, descriptor);
            record(ctx, &report);
            report
        })
        .collect()
}

/// Record a report in the logger's summary.
fn record(ctx: &Context, report: &ProgramReport) {
    let message = report.outcome.error().map(ToString::to_string).or_else(|| {
        let failed = report.post_actions.iter().filter(|p| !p.succeeded).count();
        (failed > 0).then(|| format!("{failed} post-action(s) failed"))
    });
    ctx.log
        .record_program(&report.name, report.outcome.status(), message.as_deref());
}
