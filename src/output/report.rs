use std::io::{self, Write};

use crate::suite::{Spec, Suite, SuiteTally};

/// Writes the plain-text report for `suites`, in order.
///
/// Layout per suite: a header block with path, description, outcome and
/// pre-run counts, then one line per spec with failure detail indented
/// beneath failed specs. A totals line closes the report. Output depends
/// only on `suites`, so identical inputs give byte-identical reports.
pub fn render_text(suites: &[Suite], out: &mut dyn Write) -> io::Result<()> {
    for suite in suites {
        render_suite(suite, out)?;
    }

    let totals = SuiteTally::sum(suites);
    writeln!(
        out,
        "Totals: {} suites, {} passed, {} failed, {} flaky, {} skipped",
        suites.len(),
        totals.passed,
        totals.failed,
        totals.flaky,
        totals.skipped + totals.pending
    )
}

fn render_suite(suite: &Suite, out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "Suite: {}", suite.path)?;
    writeln!(out, "Description: {}", suite.description)?;
    writeln!(out, "Succeeded: {}", suite.succeeded)?;
    writeln!(
        out,
        "Specs: {} of {} will run",
        suite.pre_run_stats.specs_that_will_run, suite.pre_run_stats.total_specs
    )?;
    writeln!(out)?;

    for spec in &suite.spec_reports {
        render_spec(spec, out)?;
    }

    writeln!(out)
}

fn render_spec(spec: &Spec, out: &mut dyn Write) -> io::Result<()> {
    writeln!(
        out,
        "  [{}] {} ({}) attempts: {}",
        spec.state, spec.name, spec.node_type, spec.attempts
    )?;

    if let Some(failure) = spec.failure() {
        writeln!(out, "    Failure: {}", failure.message)?;
        writeln!(out, "    Line: {}", failure.location.line_number)?;
        if !failure.location.stack_trace.is_empty() {
            writeln!(out, "    Stack trace:")?;
            for line in failure.location.stack_trace.lines() {
                writeln!(out, "      {line}")?;
            }
        }
    }

    Ok(())
}
