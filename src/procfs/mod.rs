//! `CounterSource` implementation for Linux systems, based on the /proc filesystem

use std::collections::HashSet;
use std::io;

use thiserror::Error;

use crate::core::counters::{CounterSource, CpuSnapshot, CpuTicks, MemorySnapshot, NetworkSnapshot};
use crate::core::Error;
use crate::procfs::parsers::system::{CpuTimes, MemInfo, NetDev, Stat};
use crate::procfs::parsers::{ReadSystemData, SystemDataReader};

pub mod libc;
mod parsers;

#[derive(Error, Debug)]
pub enum ProcfsError {
    #[error("Could not read file")]
    IOError(#[from] io::Error),
    #[error("Invalid file format: {0}")]
    InvalidFileFormat(String),
    #[error("Invalid file content: {0}")]
    InvalidFileContent(String),
    #[error("Could not list network interfaces")]
    InterfaceListError(#[source] io::Error),
}

/// Types which can list the network interfaces whose traffic should be summed
pub trait ListInterfaces {
    fn list(&mut self) -> Result<HashSet<String>, ProcfsError>;
}

struct SystemInterfaces;

impl ListInterfaces for SystemInterfaces {
    fn list(&mut self) -> Result<HashSet<String>, ProcfsError> {
        libc::eligible_interfaces()
    }
}

/// Reads system counters from `/proc/stat`, `/proc/meminfo` and `/proc/net/dev`
pub struct ProcfsCounters {
    stat_reader: Box<dyn ReadSystemData<Stat>>,
    meminfo_reader: Box<dyn ReadSystemData<MemInfo>>,
    netdev_reader: Box<dyn ReadSystemData<NetDev>>,
    interfaces: Box<dyn ListInterfaces>,
}

impl ProcfsCounters {
    pub fn new() -> Result<Self, Error> {
        let stat_reader = SystemDataReader::new().map_err(|e| Error::CounterError("cpu", e.into()))?;
        let meminfo_reader = SystemDataReader::new().map_err(|e| Error::CounterError("memory", e.into()))?;
        let netdev_reader = SystemDataReader::new().map_err(|e| Error::CounterError("network", e.into()))?;

        Ok(Self::from_readers(
            Box::new(stat_reader),
            Box::new(meminfo_reader),
            Box::new(netdev_reader),
            Box::new(SystemInterfaces),
        ))
    }

    fn from_readers(
        stat_reader: Box<dyn ReadSystemData<Stat>>,
        meminfo_reader: Box<dyn ReadSystemData<MemInfo>>,
        netdev_reader: Box<dyn ReadSystemData<NetDev>>,
        interfaces: Box<dyn ListInterfaces>,
    ) -> Self {
        ProcfsCounters {
            stat_reader,
            meminfo_reader,
            netdev_reader,
            interfaces,
        }
    }

    /// Number of cores reported by `/proc/stat`, at least 1
    pub fn core_count(&mut self) -> Result<usize, Error> {
        Ok(self.cpu()?.core_count().max(1))
    }
}

fn to_ticks(times: &CpuTimes) -> CpuTicks {
    CpuTicks::new(times.total(), times.used())
}

impl CounterSource for ProcfsCounters {
    fn cpu(&mut self) -> Result<CpuSnapshot, Error> {
        let stat = self
            .stat_reader
            .read()
            .map_err(|e| Error::CounterError("cpu", e.into()))?;

        // A single core is represented by the aggregated line
        let cores = if stat.cores().len() <= 1 {
            vec![to_ticks(stat.aggregate())]
        } else {
            stat.cores().iter().map(to_ticks).collect()
        };

        Ok(CpuSnapshot::new(cores))
    }

    fn memory(&mut self) -> Result<MemorySnapshot, Error> {
        let meminfo = self
            .meminfo_reader
            .read()
            .map_err(|e| Error::CounterError("memory", e.into()))?;

        Ok(MemorySnapshot {
            used: meminfo.mem_used(),
            total: meminfo.mem_total(),
            swap_used: meminfo.swap_used(),
            swap_total: meminfo.swap_total(),
        })
    }

    fn network(&mut self) -> Result<NetworkSnapshot, Error> {
        let eligible = self
            .interfaces
            .list()
            .map_err(|e| Error::CounterError("network", e.into()))?;

        let net_dev = self
            .netdev_reader
            .read()
            .map_err(|e| Error::CounterError("network", e.into()))?;

        let snapshot = net_dev
            .interfaces()
            .iter()
            .filter(|interface| eligible.contains(interface.name()))
            .fold(NetworkSnapshot::default(), |acc, interface| {
                NetworkSnapshot::new(
                    acc.bytes_in.wrapping_add(interface.rx_bytes()),
                    acc.bytes_out.wrapping_add(interface.tx_bytes()),
                )
            });

        Ok(snapshot)
    }
}
