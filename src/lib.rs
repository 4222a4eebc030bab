pub mod aggregate;
pub mod chart;
pub mod cli;
pub mod config;
pub mod engine;
pub mod gitstat;
pub mod record;
pub mod report;
pub mod snapshot;
pub mod util;
