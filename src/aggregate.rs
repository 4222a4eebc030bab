//! Cross-suite aggregation.
//!
//! Derives per-snapshot totals by summing the same-named counter across the
//! three suite kinds, and computes coverage percentages for the latest
//! snapshot. Totals are computed fresh every run, never cached.

use crate::snapshot::{Snapshot, SuiteKind};

/// Sum of each suite counter across the three suite kinds, field names
/// matching the on-disk keys (same inversion caveat as `SuiteResult`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub passed: u64,
    pub failed: u64,
    pub executed: u64,
    pub total: u64,
    pub skipped: u64,
}

/// Compute one snapshot's cross-suite totals.
pub fn snapshot_totals(snapshot: &Snapshot) -> Totals {
    let mut totals = Totals::default();

    for kind in SuiteKind::ALL {
        let suite = snapshot.suite(kind);
        totals.passed += suite.passed;
        totals.failed += suite.failed;
        totals.executed += suite.executed;
        totals.total += suite.total;
        totals.skipped += suite.skipped;
    }

    totals
}

/// Totals for every snapshot in history, indexed like history
/// (position 0 = newest).
pub fn totals_series(history: &[Snapshot]) -> Vec<Totals> {
    history.iter().map(snapshot_totals).collect()
}

/// Percentage `100 * tested / total`.
///
/// A zero denominator has no meaningful percentage and is a fatal
/// reporting error, never NaN or a silent 0%.
pub fn coverage_percent(
    tested: u64,
    total: u64,
    what: &str,
) -> Result<f64, Box<dyn std::error::Error>> {
    if total == 0 {
        return Err(format!("coverage: cannot compute {what} percentage: total is zero").into());
    }

    Ok(tested as f64 * 100.0 / total as f64)
}
