use std::path::PathBuf;
use std::time::Duration;

use crate::cli::ReportArgs;
use crate::gitstat;
use crate::snapshot;

pub struct Config {
    pub reports_dir: PathBuf,
    pub window: usize,
    pub diff_timeout: Duration,
    pub json: bool,
    pub verbose: bool,
}

impl Config {
    pub fn from_report_args(args: &ReportArgs) -> Self {
        Config {
            reports_dir: args.dir.clone(),
            window: args.window,
            diff_timeout: args.diff_timeout,
            json: args.json,
            verbose: args.verbose,
        }
    }

    pub fn for_dir(reports_dir: PathBuf) -> Self {
        Config {
            reports_dir,
            window: snapshot::DEFAULT_WINDOW,
            diff_timeout: gitstat::DEFAULT_TIMEOUT,
            json: false,
            verbose: false,
        }
    }
}
