//! Command line arguments, and the configuration derived from them

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use log::LevelFilter;

use crate::core::rescale::UnitMode;
use crate::core::scheduler::clamp_interval;

/// Amount of samples kept in the history of each graph
pub const NUM_POINTS: usize = 100;

const DEFAULT_INTERVAL_MS: u64 = 1000;

#[derive(Parser, Debug)]
#[command(name = "loadgraph")]
#[command(version)]
#[command(about = "Graphs CPU, memory and network load over time", long_about = None)]
pub struct Cli {
    /// Duration between two samples, in milliseconds (250 to 100000)
    #[arg(short, long, value_name = "MS", default_value_t = DEFAULT_INTERVAL_MS)]
    interval: u64,

    /// Display network rates in bits instead of bytes
    #[arg(short, long)]
    bits: bool,

    /// Stack the CPU cores curves on top of each other
    #[arg(short, long)]
    stacked_cpu: bool,

    /// File in which logs are written
    #[arg(short, long, value_name = "FILE", default_value = "loadgraph.log")]
    log_file: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Settings shared by every graph
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Config {
    pub update_interval: Duration,
    pub capacity: usize,
    pub unit_mode: UnitMode,
    pub stacked_cpu: bool,
    pub log_file: PathBuf,
    pub log_level: LevelFilter,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Config {
            update_interval: clamp_interval(cli.interval),
            capacity: NUM_POINTS,
            unit_mode: if cli.bits { UnitMode::Bits } else { UnitMode::Bytes },
            stacked_cpu: cli.stacked_cpu,
            log_file: cli.log_file,
            log_level: if cli.verbose { LevelFilter::Debug } else { LevelFilter::Info },
        }
    }
}
