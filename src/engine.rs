//! Run orchestration: discovery, loading, aggregation, diff-stat, report
//! and trend chart — strictly in that order, one step at a time. Every run
//! starts from an empty in-memory model and every failure is terminal; a
//! history of exactly one snapshot is the valid minimal case and simply
//! skips the diff-stat and the chart.

use std::fs;
use std::path::PathBuf;

use crate::aggregate::{self, Totals};
use crate::chart;
use crate::config::Config;
use crate::gitstat::DiffStat;
use crate::report::{self, DiffSection};
use crate::snapshot;
use crate::util;

/// Artifacts produced by one run.
#[derive(Debug)]
pub struct RunSummary {
    pub report_path: PathBuf,
    /// None when history held a single snapshot.
    pub chart_path: Option<PathBuf>,
    pub snapshots: usize,
}

/// Chart input: the totals series and week labels reversed from history
/// order (newest first) into chronological order (oldest first).
fn chart_series(
    history: &[snapshot::Snapshot],
    totals: &[Totals],
) -> Result<(Vec<Totals>, Vec<String>), Box<dyn std::error::Error>> {
    let series = totals.iter().rev().copied().collect();
    let labels = history
        .iter()
        .rev()
        .map(|s| util::week_label(s.timestamp))
        .collect::<Result<Vec<_>, _>>()?;

    Ok((series, labels))
}

pub fn run(config: &Config, diff: &dyn DiffStat) -> Result<RunSummary, Box<dyn std::error::Error>> {
    let timestamps = snapshot::discover_timestamps(&config.reports_dir)?;
    let history = snapshot::load_history(&config.reports_dir, &timestamps, config.window)?;

    if config.verbose {
        eprintln!("loaded {} snapshot(s) from {}", history.len(), config.reports_dir.display());
    }

    let totals = aggregate::totals_series(&history);

    let diff_section = if history.len() >= 2 {
        let from = &history[1].commit_hash;
        let to = &history[0].commit_hash;
        let output = diff.diff_stat(from, to, config.diff_timeout)?;
        Some(DiffSection {
            command: diff.command_line(from, to),
            output,
        })
    } else {
        if config.verbose {
            eprintln!("history length is 1, skipping diff stat and trend chart");
        }
        None
    };

    let text = report::text::render(&history, &totals, diff_section.as_ref())?;
    let latest = history[0].timestamp;
    let report_path = config.reports_dir.join(format!("report_{latest}"));
    fs::write(&report_path, text).map_err(|e| format!("{}: {}", report_path.display(), e))?;

    if config.json {
        println!("{}", report::json::render(&history, &totals)?);
    }

    let chart_path = if history.len() >= 2 {
        let (series, labels) = chart_series(&history, &totals)?;
        let path = config.reports_dir.join(format!("barchart_{latest}.png"));
        chart::trend::render(&path, &series, &labels)?;
        Some(path)
    } else {
        None
    };

    Ok(RunSummary {
        report_path,
        chart_path,
        snapshots: history.len(),
    })
}
