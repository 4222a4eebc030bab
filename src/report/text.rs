//! Fixed-layout text report.
//!
//! Reproduces the historical report format: 73-column rule lines, aligned
//! `label : value` columns, sections in the order general info, per-suite
//! summary (compat, unit, opts), cross-suite totals, coverage, RAM usage,
//! FLASH usage, and — when a diff-stat ran — lines changed.
//!
//! The whole report is rendered to a String before anything touches disk,
//! so a failed prerequisite never leaves a partial report file behind.

use crate::aggregate::{self, Totals};
use crate::report::DiffSection;
use crate::snapshot::{Snapshot, SuiteKind};
use crate::util;

const RULE_HEAVY: char = '=';
const RULE_LIGHT: char = '-';
const RULE_WIDTH: usize = 73;

/// Suite display order in the summary section.
const SUITE_ORDER: [SuiteKind; 3] = [SuiteKind::Compat, SuiteKind::Unit, SuiteKind::Opts];

fn push_rule(out: &mut String, c: char) {
    out.push_str(&c.to_string().repeat(RULE_WIDTH));
    out.push('\n');
}

/// The five counter lines, with the display labels mapped onto the
/// inverted on-disk fields: `Skipped` shows the `Executed` counter,
/// `Total exec'd tests` shows `Total`, `Total avail tests` shows
/// `Skipped`.
fn push_counters(out: &mut String, passed: u64, failed: u64, executed: u64, total: u64, skipped: u64) {
    out.push_str(&format!("Passed             : {passed}\n"));
    out.push_str(&format!("Failed             : {failed}\n"));
    out.push_str(&format!("Skipped            : {executed}\n"));
    out.push_str(&format!("Total exec'd tests : {total}\n"));
    out.push_str(&format!("Total avail tests  : {skipped}\n"));
}

/// Render the full report for the newest snapshot in `history`.
///
/// `totals` must be the series produced by the aggregator for the same
/// history. `diff` is the captured diff-stat invocation, or None when
/// history holds a single snapshot.
pub fn render(
    history: &[Snapshot],
    totals: &[Totals],
    diff: Option<&DiffSection>,
) -> Result<String, Box<dyn std::error::Error>> {
    let latest = history.first().ok_or("report: history is empty")?;
    let latest_totals = totals.first().ok_or("report: totals are missing")?;

    let memory_text = latest
        .memory_text
        .as_deref()
        .ok_or("report: missing memory usage text for latest snapshot")?;
    let flash_text = latest
        .flash_text
        .as_deref()
        .ok_or("report: missing flash footprint text for latest snapshot")?;

    let cov = &latest.coverage;
    let lines_percent = aggregate::coverage_percent(cov.lines_tested, cov.lines_total, "line")?;
    let funcs_percent = aggregate::coverage_percent(cov.funcs_tested, cov.funcs_total, "function")?;

    let mut out = String::new();

    push_rule(&mut out, RULE_HEAVY);
    out.push_str("Test general information\n\n");
    out.push_str(&format!("Git commit hash    : {}\n", latest.commit_hash));
    out.push_str(&format!(
        "Date               : {} ({})\n",
        util::readable_date(latest.timestamp)?,
        util::week_label(latest.timestamp)?
    ));
    out.push('\n');

    push_rule(&mut out, RULE_HEAVY);
    out.push_str("Test Report Summary\n\n");
    for kind in SUITE_ORDER {
        let suite = latest.suite(kind);
        out.push_str(&format!("{}\n", kind.title()));
        push_counters(&mut out, suite.passed, suite.failed, suite.executed, suite.total, suite.skipped);
        out.push('\n');
    }

    push_rule(&mut out, RULE_LIGHT);
    out.push_str("Total tests\n");
    push_counters(
        &mut out,
        latest_totals.passed,
        latest_totals.failed,
        latest_totals.executed,
        latest_totals.total,
        latest_totals.skipped,
    );
    out.push('\n');

    push_rule(&mut out, RULE_HEAVY);
    out.push_str("Coverage\n");
    out.push_str(&format!(
        "Lines tested       : {} of {} ({:.2}%)\n",
        cov.lines_tested, cov.lines_total, lines_percent
    ));
    out.push_str(&format!(
        "Functions tested   : {} of {} ({:.2}%)\n",
        cov.funcs_tested, cov.funcs_total, funcs_percent
    ));
    out.push('\n');

    push_rule(&mut out, RULE_HEAVY);
    out.push_str("RAM usage\n");
    out.push_str(memory_text);
    out.push('\n');

    push_rule(&mut out, RULE_HEAVY);
    out.push_str("FLASH usage\n");
    out.push_str(flash_text);
    out.push('\n');

    if let Some(diff) = diff {
        push_rule(&mut out, RULE_HEAVY);
        out.push_str("Lines changed\n");
        out.push_str(&format!("{}\n", diff.command));
        out.push_str(&diff.output);
        out.push('\n');
    }

    Ok(out)
}
