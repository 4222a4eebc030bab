use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "buildtrend")]
#[command(about = "Aggregate CI test-run snapshots into status reports and trend charts")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build the status report and trend chart from snapshot files
    Report(ReportArgs),

    /// Render runtime histograms and a scatter plot from timing samples
    Timings(TimingsArgs),
}

#[derive(Parser)]
pub struct ReportArgs {
    /// Directory holding the snapshot files (also receives the artifacts)
    #[arg(long, default_value = "tests/basic-build-tests-reports")]
    pub dir: PathBuf,

    /// Number of most recent snapshots to aggregate
    #[arg(long, default_value_t = 10, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    pub window: usize,

    /// Bounded wait for the git diff --stat subprocess
    #[arg(long, default_value = "5s", value_parser = humantime::parse_duration)]
    pub diff_timeout: Duration,

    /// Also print a JSON summary of the latest snapshot to stdout
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Show detailed progress output
    #[arg(long, short = 'v', default_value_t = false)]
    pub verbose: bool,
}

#[derive(Parser)]
pub struct TimingsArgs {
    /// Directory where chart images are written
    pub plots_dir: PathBuf,

    /// Comma-separated list of timing sample files
    #[arg(value_delimiter = ',')]
    pub files: Vec<PathBuf>,
}
