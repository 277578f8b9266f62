//! Rendering of a [`BatchResult`] for the terminal

use serde::Serialize;

use super::output::Output;
use crate::domain::{BatchResult, BatchSummary, PatchOutcome, ProjectReport};

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    result: &'a BatchResult,
    summary: BatchSummary,
}

pub fn print(result: &BatchResult, output: &Output) {
    if output.is_json() {
        output.data(&JsonReport {
            result,
            summary: result.summary(),
        });
        return;
    }

    for report in &result.projects {
        for line in project_lines(report, output.is_verbose()) {
            output.line(&line);
        }
    }

    output.line(&summary_line(&result.summary(), result.dry_run));
}

fn project_lines(report: &ProjectReport, verbose: bool) -> Vec<String> {
    let mut lines = Vec::new();

    let status = match &report.error {
        Some(error) if report.is_failed() => format!("{}: failed ({})", report.project, error),
        _ => format!(
            "{}: {} ({} generated, {} applied, {} already applied)",
            report.project,
            report.state,
            report.generated(),
            report.count_patches(&PatchOutcome::Applied),
            report.count_patches(&PatchOutcome::AlreadyApplied),
        ),
    };
    lines.push(status);

    for record in &report.generation {
        if !record.outcome.is_success() {
            lines.push(format!("  ! {} {}: {}", record.template, record.path, record.outcome));
        } else if verbose {
            lines.push(format!("    {} {}: {}", record.template, record.path, record.outcome));
        }
    }

    if verbose {
        for record in &report.patches {
            let mark = if record.outcome.is_success() { "   " } else { "  !" };
            lines.push(format!("{} {} {}: {}", mark, record.step, record.path, record.outcome));
        }
    } else {
        for record in report.patch_problems() {
            lines.push(format!("  ! {} {}: {}", record.step, record.path, record.outcome));
        }
    }

    if report.skipped_patches > 0 {
        lines.push(format!("  ! {} patch step(s) skipped", report.skipped_patches));
    }

    lines
}

fn summary_line(summary: &BatchSummary, dry_run: bool) -> String {
    let mut line = format!(
        "{} project(s): {} done, {} failed; {} applied, {} already applied, {} anchor(s) not found",
        summary.projects,
        summary.done,
        summary.failed,
        summary.applied,
        summary.already_applied,
        summary.anchor_not_found,
    );
    if dry_run {
        line.push_str(" (dry run, nothing written)");
    }
    line
}
