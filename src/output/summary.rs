use std::fmt::Write;

use comfy_table::{Cell, Color as TableColor};

use crate::aggregate::LoadedResults;
use crate::runner::{RunOutcome, RunResult};
use crate::suite::SuiteTally;

use super::styling::{bright, bright_green, bright_red, bright_yellow, dim};
use super::tables::{create_table, cyan_header, failed_count_cell, flaky_count_cell, status_cell};

/// Prints a human-readable summary of the run to stdout.
///
/// Displays:
/// - Repositories: how each repository's suite run ended
/// - Suites: per-suite spec counts and outcome
/// - Skipped result files: reports that could not be decoded
/// - Overview: totals across all suites
pub fn print_summary(outcomes: &[RunOutcome], results: &LoadedResults) {
    println!("{}", render_summary(outcomes, results));
}

fn add_section_header(output: &mut String, emoji: &str, title: &str) {
    let _ = writeln!(output, "{} {}", bright(emoji), bright(title).underlined());
}

fn outcome_cell(result: &RunResult) -> Cell {
    match result {
        RunResult::Skipped => Cell::new("skipped (no suite)").fg(TableColor::DarkGrey),
        RunResult::Completed {
            exit_code: Some(0), ..
        } => Cell::new("passed").fg(TableColor::Green),
        RunResult::Completed {
            exit_code: Some(code),
            ..
        } => Cell::new(format!("failed (exit {code})")).fg(TableColor::Red),
        RunResult::Completed {
            exit_code: None, ..
        } => Cell::new("killed by signal").fg(TableColor::Red),
        RunResult::LaunchFailed { .. } => Cell::new("could not start").fg(TableColor::Red),
    }
}

fn report_cell(result: &RunResult) -> Cell {
    match result {
        RunResult::Completed { report, .. } if report.is_file() => report
            .file_name()
            .map_or_else(|| Cell::new("-"), |name| Cell::new(name.to_string_lossy())),
        _ => Cell::new("-").fg(TableColor::DarkGrey),
    }
}

fn render_summary(outcomes: &[RunOutcome], results: &LoadedResults) -> String {
    let mut output = String::new();
    let suites = &results.suites;

    add_section_header(&mut output, "📦", "Repositories");
    let mut repo_table = create_table();
    repo_table.set_header(cyan_header(&["Repository", "Outcome", "Report"]));
    for outcome in outcomes {
        repo_table.add_row(vec![
            Cell::new(outcome.repo.to_string()),
            outcome_cell(&outcome.result),
            report_cell(&outcome.result),
        ]);
    }
    let _ = writeln!(output, "{repo_table}\n");

    if !results.rejected.is_empty() {
        add_section_header(&mut output, "⚠️", "Skipped result files");
        for rejected in &results.rejected {
            let _ = writeln!(
                output,
                "  {} {}",
                bright_yellow(rejected.path.display()),
                dim(&rejected.reason)
            );
        }
        output.push('\n');
    }

    if suites.is_empty() {
        let _ = writeln!(output, "{}", bright_yellow("No suite results found."));
        return output;
    }

    add_section_header(&mut output, "🧪", "Suites");
    let mut suite_table = create_table();
    suite_table.set_header(cyan_header(&[
        "Suite", "Specs", "Passed", "Failed", "Flaky", "Skipped", "Status",
    ]));
    for suite in suites {
        let tally = suite.tally();
        suite_table.add_row(vec![
            Cell::new(&suite.description),
            Cell::new(format!(
                "{}/{}",
                suite.pre_run_stats.specs_that_will_run, suite.pre_run_stats.total_specs
            )),
            Cell::new(tally.passed),
            failed_count_cell(tally.failed),
            flaky_count_cell(tally.flaky),
            Cell::new(tally.skipped + tally.pending),
            status_cell(suite.succeeded),
        ]);
    }
    let _ = writeln!(output, "{suite_table}\n");

    add_section_header(&mut output, "📊", "Overview");
    let totals = SuiteTally::sum(suites.iter());
    let failed_suites = suites.iter().filter(|s| !s.succeeded).count();
    let failed_display = if failed_suites == 0 {
        bright_green(failed_suites)
    } else {
        bright_red(failed_suites)
    };
    let _ = writeln!(
        output,
        "  {} {}\n  {} {}\n  {} {}\n  {} {}",
        dim("Suites:"),
        bright_yellow(suites.len()),
        dim("Failed suites:"),
        failed_display,
        dim("Specs run:"),
        bright_yellow(totals.total()),
        dim("Flaky specs:"),
        bright_yellow(totals.flaky),
    );

    output
}
