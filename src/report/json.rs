//! Machine-readable summary of the latest snapshot.
//!
//! Printed to stdout under `--json`; the counters carry the display
//! semantics (skipped, total_executed, total_available), not the raw
//! on-disk key names.

use serde::Serialize;

use crate::aggregate::{self, Totals};
use crate::snapshot::{Snapshot, SuiteKind, SuiteResult};
use crate::util;

#[derive(Serialize)]
struct SuiteSummary {
    name: &'static str,
    title: &'static str,
    passed: u64,
    failed: u64,
    skipped: u64,
    total_executed: u64,
    total_available: u64,
}

#[derive(Serialize)]
struct TotalsSummary {
    passed: u64,
    failed: u64,
    skipped: u64,
    total_executed: u64,
    total_available: u64,
}

#[derive(Serialize)]
struct CoverageSummary {
    lines_tested: u64,
    lines_total: u64,
    lines_percent: f64,
    functions_tested: u64,
    functions_total: u64,
    functions_percent: f64,
}

#[derive(Serialize)]
struct ReportSummary {
    commit_hash: String,
    date: String,
    week: String,
    suites: Vec<SuiteSummary>,
    totals: TotalsSummary,
    coverage: CoverageSummary,
}

fn suite_summary(kind: SuiteKind, suite: &SuiteResult) -> SuiteSummary {
    SuiteSummary {
        name: kind.name(),
        title: kind.title(),
        passed: suite.passed,
        failed: suite.failed,
        skipped: suite.executed,
        total_executed: suite.total,
        total_available: suite.skipped,
    }
}

pub fn render(
    history: &[Snapshot],
    totals: &[Totals],
) -> Result<String, Box<dyn std::error::Error>> {
    let latest = history.first().ok_or("report: history is empty")?;
    let latest_totals = totals.first().ok_or("report: totals are missing")?;

    let cov = &latest.coverage;
    let summary = ReportSummary {
        commit_hash: latest.commit_hash.clone(),
        date: util::readable_date(latest.timestamp)?,
        week: util::week_label(latest.timestamp)?,
        suites: [SuiteKind::Compat, SuiteKind::Unit, SuiteKind::Opts]
            .into_iter()
            .map(|kind| suite_summary(kind, latest.suite(kind)))
            .collect(),
        totals: TotalsSummary {
            passed: latest_totals.passed,
            failed: latest_totals.failed,
            skipped: latest_totals.executed,
            total_executed: latest_totals.total,
            total_available: latest_totals.skipped,
        },
        coverage: CoverageSummary {
            lines_tested: cov.lines_tested,
            lines_total: cov.lines_total,
            lines_percent: aggregate::coverage_percent(cov.lines_tested, cov.lines_total, "line")?,
            functions_tested: cov.funcs_tested,
            functions_total: cov.funcs_total,
            functions_percent: aggregate::coverage_percent(cov.funcs_tested, cov.funcs_total, "function")?,
        },
    };

    Ok(serde_json::to_string_pretty(&summary)?)
}
