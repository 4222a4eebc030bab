//! Snapshot model and loader.
//!
//! One snapshot is a set of sibling text files sharing a timestamp suffix:
//! three suite-result files, a coverage file, and a general-info file with
//! the commit hash. The memory and flash footprint blobs exist only on the
//! most recent snapshot. History is the bounded, newest-first sequence of
//! snapshots one report run works from.

use std::fs;
use std::path::Path;

use crate::record::{self, FileSchema, ValueShape};

/// Default sliding-window size for history.
pub const DEFAULT_WINDOW: usize = 10;

const SUITE_SCHEMA: FileSchema = FileSchema {
    keys: &["Passed", "Failed", "Executed", "Total", "Skipped"],
    shape: ValueShape::Decimal,
};

const COVERAGE_SCHEMA: FileSchema = FileSchema {
    keys: &["Tested lines", "Total lines", "Tested functions", "Total functions"],
    shape: ValueShape::Decimal,
};

const GENERAL_SCHEMA: FileSchema = FileSchema {
    keys: &["hash"],
    shape: ValueShape::Hex,
};

/// The three test-suite categories a snapshot carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuiteKind {
    Unit,
    Compat,
    Opts,
}

impl SuiteKind {
    pub const ALL: [SuiteKind; 3] = [SuiteKind::Unit, SuiteKind::Compat, SuiteKind::Opts];

    /// Display title used in the report summary.
    pub fn title(self) -> &'static str {
        match self {
            SuiteKind::Unit => "Unit tests - tests/scripts/run-test-suites.pl",
            SuiteKind::Compat => "TLS Options tests - tests/ssl-opt.sh",
            SuiteKind::Opts => "System/Compatibility tests - tests/compat.sh",
        }
    }

    /// Short machine-readable name, used by the JSON summary.
    pub fn name(self) -> &'static str {
        match self {
            SuiteKind::Unit => "unit",
            SuiteKind::Compat => "compat",
            SuiteKind::Opts => "opts",
        }
    }

    /// Filename prefix for this suite's result file.
    pub fn file_prefix(self) -> &'static str {
        match self {
            SuiteKind::Unit => "unit_tests",
            SuiteKind::Compat => "compat_tests",
            SuiteKind::Opts => "opts_tests",
        }
    }

    fn index(self) -> usize {
        match self {
            SuiteKind::Unit => 0,
            SuiteKind::Compat => 1,
            SuiteKind::Opts => 2,
        }
    }
}

/// One suite's counters, field names matching the on-disk keys.
///
/// NOTE: the on-disk key names are historically inverted — the `Executed`
/// key holds the skipped count, `Total` holds the executed count, and
/// `Skipped` holds the available count. Loading keeps the key-to-field
/// mapping literal; renderers apply the display labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuiteResult {
    pub passed: u64,
    pub failed: u64,
    pub executed: u64,
    pub total: u64,
    pub skipped: u64,
}

/// Line and function coverage counts for one snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoverageSample {
    pub lines_tested: u64,
    pub lines_total: u64,
    pub funcs_tested: u64,
    pub funcs_total: u64,
}

/// One timestamp's full picture, immutable once loaded.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub timestamp: i64,
    pub commit_hash: String,
    suites: [SuiteResult; 3],
    pub coverage: CoverageSample,
    /// Raw RAM usage blob; present only on the newest snapshot.
    pub memory_text: Option<String>,
    /// Raw flash footprint blob; present only on the newest snapshot.
    pub flash_text: Option<String>,
}

impl Snapshot {
    pub fn suite(&self, kind: SuiteKind) -> &SuiteResult {
        &self.suites[kind.index()]
    }
}

fn read_file(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    fs::read_to_string(path).map_err(|e| format!("{}: {}", path.display(), e).into())
}

/// Parse one record value as a non-negative counter.
fn parse_count(value: &str, key: &str, path: &Path) -> Result<u64, Box<dyn std::error::Error>> {
    value
        .parse::<u64>()
        .map_err(|_| format!("{}: value for '{}' out of range: {}", path.display(), key, value).into())
}

/// Require exactly one record per schema key, in any order.
fn require_counts(
    text: &str,
    schema: &FileSchema,
    path: &Path,
) -> Result<Vec<u64>, Box<dyn std::error::Error>> {
    let records = record::parse_records(text, schema, path)?;
    let mut counts: Vec<Option<u64>> = vec![None; schema.keys.len()];

    for rec in &records {
        // parse_records only returns schema keys, so position always hits
        let Some(slot) = schema.keys.iter().position(|k| *k == rec.key) else { continue };

        if counts[slot].is_some() {
            return Err(format!("{}: duplicate key '{}'", path.display(), rec.key).into());
        }

        counts[slot] = Some(parse_count(&rec.value, &rec.key, path)?);
    }

    counts
        .into_iter()
        .zip(schema.keys)
        .map(|(count, key)| {
            count.ok_or_else(|| format!("{}: missing key '{}'", path.display(), key).into())
        })
        .collect()
}

fn load_suite(dir: &Path, kind: SuiteKind, timestamp: i64) -> Result<SuiteResult, Box<dyn std::error::Error>> {
    let path = dir.join(format!("{}_{}", kind.file_prefix(), timestamp));
    let counts = require_counts(&read_file(&path)?, &SUITE_SCHEMA, &path)?;

    Ok(SuiteResult {
        passed: counts[0],
        failed: counts[1],
        executed: counts[2],
        total: counts[3],
        skipped: counts[4],
    })
}

fn load_coverage(dir: &Path, timestamp: i64) -> Result<CoverageSample, Box<dyn std::error::Error>> {
    let path = dir.join(format!("coverage_{timestamp}"));
    let counts = require_counts(&read_file(&path)?, &COVERAGE_SCHEMA, &path)?;

    Ok(CoverageSample {
        lines_tested: counts[0],
        lines_total: counts[1],
        funcs_tested: counts[2],
        funcs_total: counts[3],
    })
}

fn load_commit_hash(dir: &Path, timestamp: i64) -> Result<String, Box<dyn std::error::Error>> {
    let path = dir.join(format!("general_{timestamp}"));
    let records = record::parse_records(&read_file(&path)?, &GENERAL_SCHEMA, &path)?;

    match records.as_slice() {
        [rec] => Ok(rec.value.clone()),
        [] => Err(format!("{}: missing key 'hash'", path.display()).into()),
        _ => Err(format!("{}: duplicate key 'hash'", path.display()).into()),
    }
}

fn load_snapshot(dir: &Path, timestamp: i64) -> Result<Snapshot, Box<dyn std::error::Error>> {
    let mut suites = [SuiteResult::default(); 3];
    for kind in SuiteKind::ALL {
        suites[kind.index()] = load_suite(dir, kind, timestamp)?;
    }

    Ok(Snapshot {
        timestamp,
        commit_hash: load_commit_hash(dir, timestamp)?,
        suites,
        coverage: load_coverage(dir, timestamp)?,
        memory_text: None,
        flash_text: None,
    })
}

/// Discover candidate snapshot timestamps from `unit_tests_<digits>`
/// filenames in `dir`, sorted newest first.
pub fn discover_timestamps(dir: &Path) -> Result<Vec<i64>, Box<dyn std::error::Error>> {
    let entries = fs::read_dir(dir).map_err(|e| format!("{}: {}", dir.display(), e))?;
    let mut timestamps = Vec::new();

    for entry in entries {
        let entry = entry.map_err(|e| format!("{}: {}", dir.display(), e))?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };

        let Some(suffix) = name.strip_prefix("unit_tests_") else { continue };
        if suffix.is_empty() || !suffix.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }

        // digit runs past i64 range are not real timestamps
        if let Ok(ts) = suffix.parse::<i64>() {
            timestamps.push(ts);
        }
    }

    timestamps.sort_unstable_by(|a, b| b.cmp(a));
    Ok(timestamps)
}

/// Load up to `window` snapshots for the given newest-first timestamps.
///
/// Every file a window slot needs must exist; the memory and flash blobs
/// are loaded for the newest timestamp only. An empty candidate list is a
/// fatal error — a report needs at least one snapshot.
pub fn load_history(
    dir: &Path,
    timestamps: &[i64],
    window: usize,
) -> Result<Vec<Snapshot>, Box<dyn std::error::Error>> {
    if window == 0 {
        return Err("history window must be at least 1".into());
    }
    if timestamps.is_empty() {
        return Err(format!("no snapshot files found in {}", dir.display()).into());
    }

    let mut history = Vec::new();
    for &ts in timestamps.iter().take(window) {
        history.push(load_snapshot(dir, ts)?);
    }

    let latest = history[0].timestamp;
    history[0].memory_text = Some(read_file(&dir.join(format!("memory_{latest}")))?);
    history[0].flash_text = Some(read_file(&dir.join(format!("footprint_{latest}")))?);

    Ok(history)
}
