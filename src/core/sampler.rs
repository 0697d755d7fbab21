//! Sampler trait definition, and the samplers of each graph
//!
//! A sampler reads its counters from a [`CounterSource`](crate::core::counters::CounterSource),
//! turns them into this tick's values and inserts them in the graph history.

use log::warn;

use crate::core::counters::CounterSource;
use crate::core::delta::{usage_ratio, CpuLoadCalculator, NetRateCalculator, NetRates};
use crate::core::format::{usage_label, Percent, Rate, Size};
use crate::core::history::MetricSeries;
use crate::core::rescale::{NetworkRescaler, UnitMode};
use crate::core::time::Timestamp;
use crate::core::view::{Axis, Label};
use crate::core::Error;

/// Result of one sampling
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SampleOutcome {
    /// Counters were only read to establish a baseline, nothing was inserted in the history
    Baseline,
    /// A new sample was inserted in the history
    Inserted,
    /// A new sample was inserted, and the whole history was rescaled to a new axis
    Rescaled,
}

/// Types which produce the samples of one graph
pub trait Sampler {
    /// The name of the graph, as displayed in the application tab
    fn title(&self) -> &'static str;

    /// One name per sub-series
    fn series_names(&self) -> &[String];

    /// Reads the counters, and inserts this tick's values as the most recent sample of `series`.
    ///
    /// Counter read failures do not produce errors: a WARNING level log is produced, and a zero
    /// reading is inserted instead.
    ///
    /// # Arguments
    ///  * `source`: The source from which to read counters
    ///  * `now`: The time of this tick
    ///  * `series`: The history of the graph
    ///  * `num_bars`: The amount of gridlines currently drawn
    fn sample(
        &mut self,
        source: &mut dyn CounterSource,
        now: Timestamp,
        series: &mut MetricSeries,
        num_bars: u32,
    ) -> Result<SampleOutcome, Error>;

    /// Labels describing the last sample
    fn labels(&self) -> &[Label];

    fn axis(&self) -> Axis {
        Axis::Fraction
    }

    /// Changes the units of the displayed values. Returns true if the history has been rescaled.
    fn set_unit_mode(&mut self, _unit_mode: UnitMode, _series: &mut MetricSeries, _num_bars: u32) -> bool {
        false
    }

    /// Forgets any state accumulated from previous samples, e.g. when the history is cleared
    fn reset(&mut self) {}
}

/// Samples the load of each CPU core
pub struct CpuSampler {
    calculator: CpuLoadCalculator,
    names: Vec<String>,
    labels: Vec<Label>,
    stacked: bool,
}

impl CpuSampler {
    /// # Arguments
    ///  * `core_count`: The amount of cores of the system
    ///  * `stacked`: If true, the loads of the cores are stacked on top of each other
    pub fn new(core_count: usize, stacked: bool) -> Self {
        let core_count = core_count.max(1);
        let names: Vec<String> = match core_count {
            1 => vec!["CPU".to_string()],
            n => (1..=n).map(|i| format!("CPU{}", i)).collect(),
        };
        let labels = names.iter().map(|name| Label::new(name, Percent(0.).to_string())).collect();

        Self {
            calculator: CpuLoadCalculator::default(),
            names,
            labels,
            stacked,
        }
    }

    /// Each core contributes a share of the total height, on top of the preceding cores
    fn stack(loads: &[f64]) -> Vec<f64> {
        let core_count = loads.len() as f64;

        loads
            .iter()
            .scan(0., |acc, load| {
                *acc += load / core_count;
                Some(*acc)
            })
            .collect()
    }
}

impl Sampler for CpuSampler {
    fn title(&self) -> &'static str {
        "CPU"
    }

    fn series_names(&self) -> &[String] {
        &self.names
    }

    fn sample(
        &mut self,
        source: &mut dyn CounterSource,
        _now: Timestamp,
        series: &mut MetricSeries,
        _num_bars: u32,
    ) -> Result<SampleOutcome, Error> {
        let mut loads = match source.cpu() {
            Ok(snapshot) => match self.calculator.compute_loads(snapshot) {
                Some(loads) => loads,
                None => return Ok(SampleOutcome::Baseline),
            },
            Err(e) => {
                warn!("Could not read CPU counters, using a zero reading: {:?}", e);
                vec![]
            }
        };
        loads.resize(self.names.len(), 0.);

        for (label, load) in self.labels.iter_mut().zip(&loads) {
            label.value = Percent(*load).to_string();
        }

        if self.stacked {
            series.shift_and_insert(&Self::stack(&loads))?;
        } else {
            series.shift_and_insert(&loads)?;
        }

        Ok(SampleOutcome::Inserted)
    }

    fn labels(&self) -> &[Label] {
        &self.labels
    }

    fn reset(&mut self) {
        self.calculator = CpuLoadCalculator::default();
    }
}

/// Samples the memory and swap usage
pub struct MemorySampler {
    names: Vec<String>,
    labels: Vec<Label>,
}

impl Default for MemorySampler {
    fn default() -> Self {
        let names = vec!["Memory".to_string(), "Swap".to_string()];
        let labels = names.iter().map(|name| Label::new(name, usage_label(0, 0, 0.))).collect();

        Self { names, labels }
    }
}

impl Sampler for MemorySampler {
    fn title(&self) -> &'static str {
        "Memory"
    }

    fn series_names(&self) -> &[String] {
        &self.names
    }

    fn sample(
        &mut self,
        source: &mut dyn CounterSource,
        _now: Timestamp,
        series: &mut MetricSeries,
        _num_bars: u32,
    ) -> Result<SampleOutcome, Error> {
        let snapshot = source.memory().unwrap_or_else(|e| {
            warn!("Could not read memory counters, using a zero reading: {:?}", e);
            Default::default()
        });

        let mem_ratio = usage_ratio(snapshot.used, snapshot.total);
        let swap_ratio = usage_ratio(snapshot.swap_used, snapshot.swap_total);

        self.labels[0].value = usage_label(snapshot.used, snapshot.total, mem_ratio);
        self.labels[1].value = usage_label(snapshot.swap_used, snapshot.swap_total, swap_ratio);

        series.shift_and_insert(&[mem_ratio, swap_ratio])?;

        Ok(SampleOutcome::Inserted)
    }

    fn labels(&self) -> &[Label] {
        &self.labels
    }
}

/// Samples the network transfer rates, and keeps the network graph scale up to date
pub struct NetworkSampler {
    calculator: NetRateCalculator,
    rescaler: NetworkRescaler,
    rates: NetRates,
    names: Vec<String>,
    labels: Vec<Label>,
}

impl NetworkSampler {
    /// # Arguments
    ///  * `capacity`: The amount of samples of the graph history
    ///  * `unit_mode`: The units in which rates are displayed
    pub fn new(capacity: usize, unit_mode: UnitMode) -> Self {
        let mut sampler = Self {
            calculator: NetRateCalculator::default(),
            rescaler: NetworkRescaler::new(capacity, unit_mode),
            rates: NetRates::default(),
            names: vec!["Receiving".to_string(), "Sending".to_string()],
            labels: vec![],
        };
        sampler.update_labels();

        sampler
    }

    fn update_labels(&mut self) {
        let unit_mode = self.rescaler.unit_mode();
        let totals = self.calculator.totals().unwrap_or_default();

        self.labels = vec![
            Label::new("Receiving", Rate::new(self.rates.bytes_in, unit_mode).to_string()),
            Label::new("Total Received", Size::new(totals.bytes_in, unit_mode).to_string()),
            Label::new("Sending", Rate::new(self.rates.bytes_out, unit_mode).to_string()),
            Label::new("Total Sent", Size::new(totals.bytes_out, unit_mode).to_string()),
        ];
    }
}

impl Sampler for NetworkSampler {
    fn title(&self) -> &'static str {
        "Network"
    }

    fn series_names(&self) -> &[String] {
        &self.names
    }

    fn sample(
        &mut self,
        source: &mut dyn CounterSource,
        now: Timestamp,
        series: &mut MetricSeries,
        num_bars: u32,
    ) -> Result<SampleOutcome, Error> {
        self.rates = match source.network() {
            Ok(snapshot) => self.calculator.compute_rates(snapshot, now),
            Err(e) => {
                warn!("Could not read network counters, using a zero reading: {:?}", e);
                NetRates::default()
            }
        };

        series.shift_and_insert(&[
            self.rescaler.scaled(self.rates.bytes_in),
            self.rescaler.scaled(self.rates.bytes_out),
        ])?;

        let outcome = match self.rescaler.on_new_peak(self.rates, num_bars) {
            Some(scale) => {
                series.rescale(scale);
                SampleOutcome::Rescaled
            }
            None => SampleOutcome::Inserted,
        };

        self.update_labels();
        Ok(outcome)
    }

    fn labels(&self) -> &[Label] {
        &self.labels
    }

    fn axis(&self) -> Axis {
        Axis::Rate {
            max: self.rescaler.max(),
            unit_mode: self.rescaler.unit_mode(),
        }
    }

    fn set_unit_mode(&mut self, unit_mode: UnitMode, series: &mut MetricSeries, num_bars: u32) -> bool {
        let rescaled = match self.rescaler.set_unit_mode(unit_mode, num_bars) {
            Some(scale) => {
                series.rescale(scale);
                true
            }
            None => false,
        };

        self.update_labels();
        rescaled
    }

    fn reset(&mut self) {
        self.rescaler.reset();
    }
}
