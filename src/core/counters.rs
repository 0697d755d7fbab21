//! CounterSource trait definition, and the absolute counter snapshots it returns

use crate::core::Error;

/// Cumulative CPU ticks of one core since boot
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct CpuTicks {
    pub total: u64,
    pub used: u64,
}

impl CpuTicks {
    pub fn new(total: u64, used: u64) -> Self {
        Self { total, used }
    }
}

/// CPU ticks of every core, in core order
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct CpuSnapshot {
    cores: Vec<CpuTicks>,
}

impl CpuSnapshot {
    pub fn new(cores: Vec<CpuTicks>) -> Self {
        Self { cores }
    }

    pub fn cores(&self) -> &[CpuTicks] {
        &self.cores
    }

    pub fn core_count(&self) -> usize {
        self.cores.len()
    }
}

/// Memory and swap usage, in bytes
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct MemorySnapshot {
    pub used: u64,
    pub total: u64,
    pub swap_used: u64,
    pub swap_total: u64,
}

/// Cumulative bytes received and sent, summed over all eligible interfaces
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct NetworkSnapshot {
    pub bytes_in: u64,
    pub bytes_out: u64,
}

impl NetworkSnapshot {
    pub fn new(bytes_in: u64, bytes_out: u64) -> Self {
        Self { bytes_in, bytes_out }
    }
}

/// Types which can read the current absolute value of the system counters
///
/// Each call is blocking but is expected to return quickly.
pub trait CounterSource {
    fn cpu(&mut self) -> Result<CpuSnapshot, Error>;

    fn memory(&mut self) -> Result<MemorySnapshot, Error>;

    fn network(&mut self) -> Result<NetworkSnapshot, Error>;
}
