use clap::Parser;

use buildtrend::chart;
use buildtrend::cli::{Cli, Command};
use buildtrend::config::Config;
use buildtrend::engine;
use buildtrend::gitstat::GitDiffStat;

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Report(args) => {
            let config = Config::from_report_args(&args);

            match engine::run(&config, &GitDiffStat) {
                Ok(summary) => {
                    println!("report written to {}", summary.report_path.display());
                    match summary.chart_path {
                        Some(path) => println!("trend chart written to {}", path.display()),
                        None => println!("history length is 1, skipping trend chart"),
                    }
                }
                Err(e) => {
                    eprintln!("error: {e}");
                    std::process::exit(1);
                }
            }
        }
        Command::Timings(args) => {
            if let Err(e) = chart::timings::run(&args.plots_dir, &args.files) {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
    }
}
