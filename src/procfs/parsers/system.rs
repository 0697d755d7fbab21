use std::path::PathBuf;

use crate::procfs::parsers::{Parse, SystemData, TokenParser};
use crate::procfs::ProcfsError;

const BYTES_PER_KB: u64 = 1024;

/// Time spent by a CPU in each mode, in clock ticks, as listed in `/proc/stat`
#[derive(Eq, PartialEq, Debug, Default, Copy, Clone)]
pub struct CpuTimes {
    user: u64,
    nice: u64,
    system: u64,
    idle: u64,
    iowait: u64,
    irq: u64,
    softirq: u64,
    steal: u64,
}

impl CpuTimes {
    #[allow(clippy::too_many_arguments)]
    pub fn new(user: u64, nice: u64, system: u64, idle: u64, iowait: u64, irq: u64, softirq: u64, steal: u64) -> Self {
        CpuTimes {
            user,
            nice,
            system,
            idle,
            iowait,
            irq,
            softirq,
            steal,
        }
    }

    /// Ticks spent running tasks
    pub fn used(&self) -> u64 {
        self.user + self.nice + self.system
    }

    /// All elapsed ticks. Guest time is already accounted for in user and nice times.
    pub fn total(&self) -> u64 {
        self.user + self.nice + self.system + self.idle + self.iowait + self.irq + self.softirq + self.steal
    }

    fn parse_line(token_parser: &TokenParser, line_no: usize) -> Result<Self, ProcfsError> {
        Ok(CpuTimes {
            user: token_parser.token(line_no, 1)?,
            nice: token_parser.token(line_no, 2)?,
            system: token_parser.token(line_no, 3)?,
            idle: token_parser.token(line_no, 4)?,
            iowait: token_parser.optional_token(line_no, 5)?,
            irq: token_parser.optional_token(line_no, 6)?,
            softirq: token_parser.optional_token(line_no, 7)?,
            steal: token_parser.optional_token(line_no, 8)?,
        })
    }
}

/// Represents the CPU times of `/proc/stat`, for all CPUs and for each core
#[derive(Eq, PartialEq, Debug)]
pub struct Stat {
    aggregate: CpuTimes,
    cores: Vec<CpuTimes>,
}

impl Stat {
    pub fn new(aggregate: CpuTimes, cores: Vec<CpuTimes>) -> Self {
        Stat { aggregate, cores }
    }

    pub fn aggregate(&self) -> &CpuTimes {
        &self.aggregate
    }

    pub fn cores(&self) -> &[CpuTimes] {
        &self.cores
    }
}

impl Parse for Stat {
    fn parse(token_parser: &TokenParser) -> Result<Self, ProcfsError> {
        let aggregate_line = token_parser
            .find_line("cpu")
            .ok_or_else(|| ProcfsError::InvalidFileFormat("No aggregated cpu line".to_string()))?;
        let aggregate = CpuTimes::parse_line(token_parser, aggregate_line)?;

        let cores = (0..token_parser.line_count())
            .filter(|line_no| match token_parser.line(*line_no) {
                Some([label, ..]) => is_core_label(label),
                _ => false,
            })
            .map(|line_no| CpuTimes::parse_line(token_parser, line_no))
            .collect::<Result<_, _>>()?;

        Ok(Stat { aggregate, cores })
    }
}

impl SystemData for Stat {
    fn filepath() -> PathBuf {
        ["/proc", "stat"].iter().collect()
    }
}

/// Returns true for labels of per-core lines, e.g. `cpu3`
fn is_core_label(label: &str) -> bool {
    match label.strip_prefix("cpu") {
        Some(index) => !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}


/// Represents the memory and swap usage of `/proc/meminfo`, in bytes
#[derive(Eq, PartialEq, Debug, Default, Copy, Clone)]
pub struct MemInfo {
    mem_total: u64,
    mem_used: u64,
    swap_total: u64,
    swap_used: u64,
}

impl MemInfo {
    pub fn new(mem_total: u64, mem_used: u64, swap_total: u64, swap_used: u64) -> Self {
        MemInfo {
            mem_total,
            mem_used,
            swap_total,
            swap_used,
        }
    }

    pub fn mem_total(&self) -> u64 {
        self.mem_total
    }

    pub fn mem_used(&self) -> u64 {
        self.mem_used
    }

    pub fn swap_total(&self) -> u64 {
        self.swap_total
    }

    pub fn swap_used(&self) -> u64 {
        self.swap_used
    }

    fn field(token_parser: &TokenParser, key: &str) -> Result<Option<u64>, ProcfsError> {
        token_parser
            .find_line(key)
            .map(|line_no| token_parser.token::<u64>(line_no, 1).map(|kb| kb * BYTES_PER_KB))
            .transpose()
    }

    fn required_field(token_parser: &TokenParser, key: &str) -> Result<u64, ProcfsError> {
        Self::field(token_parser, key)?
            .ok_or_else(|| ProcfsError::InvalidFileFormat(format!("Missing field {}", key)))
    }
}

impl Parse for MemInfo {
    fn parse(token_parser: &TokenParser) -> Result<Self, ProcfsError> {
        let mem_total = Self::required_field(token_parser, "MemTotal:")?;

        let available = match Self::field(token_parser, "MemAvailable:")? {
            Some(available) => available,
            None => {
                Self::required_field(token_parser, "MemFree:")?
                    + Self::field(token_parser, "Buffers:")?.unwrap_or(0)
                    + Self::field(token_parser, "Cached:")?.unwrap_or(0)
            }
        };

        let swap_total = Self::field(token_parser, "SwapTotal:")?.unwrap_or(0);
        let swap_free = Self::field(token_parser, "SwapFree:")?.unwrap_or(0);

        Ok(MemInfo {
            mem_total,
            mem_used: mem_total.saturating_sub(available),
            swap_total,
            swap_used: swap_total.saturating_sub(swap_free),
        })
    }
}

impl SystemData for MemInfo {
    fn filepath() -> PathBuf {
        ["/proc", "meminfo"].iter().collect()
    }
}


/// Cumulative bytes received and sent by one network interface
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct InterfaceStats {
    name: String,
    rx_bytes: u64,
    tx_bytes: u64,
}

impl InterfaceStats {
    pub fn new(name: &str, rx_bytes: u64, tx_bytes: u64) -> Self {
        InterfaceStats {
            name: name.to_string(),
            rx_bytes,
            tx_bytes,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rx_bytes(&self) -> u64 {
        self.rx_bytes
    }

    pub fn tx_bytes(&self) -> u64 {
        self.tx_bytes
    }
}

/// Represents the per-interface counters of `/proc/net/dev`
#[derive(Eq, PartialEq, Debug, Default)]
pub struct NetDev {
    interfaces: Vec<InterfaceStats>,
}

impl NetDev {
    pub fn new(interfaces: Vec<InterfaceStats>) -> Self {
        NetDev { interfaces }
    }

    pub fn interfaces(&self) -> &[InterfaceStats] {
        &self.interfaces
    }
}

/// Position of the transmitted bytes, in the columns following the interface name
const TX_BYTES_COLUMN: usize = 8;

impl Parse for NetDev {
    fn parse(token_parser: &TokenParser) -> Result<Self, ProcfsError> {
        let mut interfaces = Vec::new();

        // The two first lines are headers
        for line_no in 2..token_parser.line_count() {
            let tokens = match token_parser.line(line_no) {
                Some(tokens) if !tokens.is_empty() => tokens,
                _ => continue,
            };

            // Large counters leave no space after the colon: `eth0:123456 ...`
            let (name, first_column) = tokens[0].split_once(':').ok_or_else(|| {
                ProcfsError::InvalidFileFormat(format!("No interface name at line {}", line_no))
            })?;

            let columns: Vec<&str> = std::iter::once(first_column)
                .filter(|column| !column.is_empty())
                .chain(tokens[1..].iter().copied())
                .collect();

            let column = |pos: usize| -> Result<u64, ProcfsError> {
                columns
                    .get(pos)
                    .ok_or_else(|| ProcfsError::InvalidFileFormat(format!("Missing column {} at line {}", pos, line_no)))?
                    .parse()
                    .map_err(|_| ProcfsError::InvalidFileContent(format!("Invalid column {} at line {}", pos, line_no)))
            };

            interfaces.push(InterfaceStats::new(name, column(0)?, column(TX_BYTES_COLUMN)?));
        }

        Ok(NetDev { interfaces })
    }
}

impl SystemData for NetDev {
    fn filepath() -> PathBuf {
        ["/proc", "net", "dev"].iter().collect()
    }
}
