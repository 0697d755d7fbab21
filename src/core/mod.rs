//! Platform-independant load sampling engine

use thiserror::Error;

pub mod counters;
pub mod delta;
pub mod format;
pub mod history;
pub mod rescale;
pub mod sampler;
pub mod scheduler;
pub mod time;
pub mod timer;
pub mod view;

#[derive(Error, Debug)]
pub enum Error {
    // Error raised from CounterSource implementors
    #[error("Error reading {0} counters")]
    CounterError(&'static str, #[source] anyhow::Error),
    #[error("Invalid series index {0} (series count: {1})")]
    InvalidSeriesIndex(usize, usize),
    #[error("Sample has {0} values but the series holds {1}")]
    SampleSizeMismatch(usize, usize),
}
