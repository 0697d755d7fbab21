//! Human-readable representations of loads, sizes and rates

use std::fmt;
use std::fmt::{Display, Formatter};

use crate::core::rescale::UnitMode;
use crate::core::view::Axis;

const IEC_UNITS: [&str; 6] = ["KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];
const BIT_UNITS: [&str; 6] = ["kbit", "Mbit", "Gbit", "Tbit", "Pbit", "Ebit"];

/// A load, between 0 and 1, displayed as a percentage
#[derive(PartialEq, PartialOrd, Debug, Copy, Clone)]
pub struct Percent(pub f64);

impl Display for Percent {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.0 * 100.)
    }
}

/// An amount of bytes, displayed with binary prefixes, or as decimal prefixed bits
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub struct Size {
    bytes: u64,
    unit_mode: UnitMode,
}

impl Size {
    pub fn new(bytes: u64, unit_mode: UnitMode) -> Self {
        Self { bytes, unit_mode }
    }

    fn fmt_scaled(f: &mut Formatter<'_>, value: f64, base: f64, units: &[&str]) -> fmt::Result {
        let mut value = value / base;
        let mut unit = 0;

        while value >= base && unit < units.len() - 1 {
            value /= base;
            unit += 1;
        }

        write!(f, "{:.1} {}", value, units[unit])
    }
}

impl Display for Size {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.unit_mode {
            UnitMode::Bytes if self.bytes == 1 => write!(f, "1 byte"),
            UnitMode::Bytes if self.bytes < 1024 => write!(f, "{} bytes", self.bytes),
            UnitMode::Bytes => Self::fmt_scaled(f, self.bytes as f64, 1024., &IEC_UNITS),
            UnitMode::Bits => {
                let bits = self.bytes as f64 * 8.;
                if bits < 1000. {
                    write!(f, "{} bits", bits)
                } else {
                    Self::fmt_scaled(f, bits, 1000., &BIT_UNITS)
                }
            }
        }
    }
}

/// A rate, in bytes per second
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub struct Rate(pub Size);

impl Rate {
    pub fn new(bytes_per_sec: u64, unit_mode: UnitMode) -> Self {
        Self(Size::new(bytes_per_sec, unit_mode))
    }
}

impl Display for Rate {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}/s", self.0)
    }
}

/// Describes how much of a memory resource is in use, e.g. `540.0 MiB (52.7%) of 1.0 GiB`
pub fn usage_label(used: u64, total: u64, ratio: f64) -> String {
    if total == 0 {
        return "not available".to_string();
    }

    format!(
        "{} ({:.1}%) of {}",
        Size::new(used, UnitMode::Bytes),
        100. * ratio,
        Size::new(total, UnitMode::Bytes)
    )
}

/// Captions of the horizontal gridlines, from the top one to the bottom one
///
/// # Arguments
///  * `axis`: The vertical axis of the graph
///  * `num_bars`: The amount of intervals between gridlines
pub fn gridline_captions(axis: &Axis, num_bars: u32) -> Vec<String> {
    let num_bars = num_bars.max(1);

    (0..=num_bars)
        .map(|i| match axis {
            // Operation order matters so that the last caption is 0. The product may not fit
            // in a u64 when max comes from an unrounded peak.
            Axis::Rate { max, unit_mode } => {
                let step = u128::from(i) * u128::from(*max) / u128::from(num_bars);
                let rate = max - step as u64;
                Rate::new(rate, *unit_mode).to_string()
            }
            Axis::Fraction => format!("{}%", 100 - i * (100 / num_bars)),
        })
        .collect()
}
