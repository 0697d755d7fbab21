//! Conversion of successive absolute counters into load fractions and rates

use crate::core::counters::{CpuSnapshot, CpuTicks, NetworkSnapshot};
use crate::core::time::Timestamp;

const MICROS_PER_SEC: f64 = 1_000_000.;

/// Calculates the load of a core between two readings of its ticks.
///
/// The result is never negative, and the elapsed ticks are floored to 1 to avoid a division by 0.
pub fn cpu_load(last: &CpuTicks, now: &CpuTicks) -> f64 {
    let total = now.total.saturating_sub(last.total) as f64;
    let used = now.used.saturating_sub(last.used) as f64;

    used / total.max(1.)
}

/// Calculates a usage ratio, returning 0 when nothing is available (e.g. no swap configured)
pub fn usage_ratio(used: u64, total: u64) -> f64 {
    if total == 0 {
        0.
    } else {
        used as f64 / total as f64
    }
}

/// Keeps the previous CPU snapshot, to calculate per-core loads
#[derive(Default)]
pub struct CpuLoadCalculator {
    previous: Option<CpuSnapshot>,
}

impl CpuLoadCalculator {
    /// Calculates the load of each core since the last call, then retains `current` for the next
    /// call.
    ///
    /// Returns `None` when there is no usable previous snapshot: on the first call, the delta
    /// would only reflect the average load since boot. This also happens when the amount of
    /// cores has changed.
    ///
    /// # Arguments
    ///  * `current`: The new CPU ticks of all cores
    pub fn compute_loads(&mut self, current: CpuSnapshot) -> Option<Vec<f64>> {
        let loads = self
            .previous
            .as_ref()
            .filter(|previous| previous.core_count() == current.core_count())
            .map(|previous| {
                previous
                    .cores()
                    .iter()
                    .zip(current.cores())
                    .map(|(last, now)| cpu_load(last, now))
                    .collect()
            });

        self.previous = Some(current);
        loads
    }

    pub fn has_baseline(&self) -> bool {
        self.previous.is_some()
    }
}

/// Rates, in bytes per second
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct NetRates {
    pub bytes_in: u64,
    pub bytes_out: u64,
}

impl NetRates {
    pub fn max(&self) -> u64 {
        self.bytes_in.max(self.bytes_out)
    }
}

/// Keeps the previous network counters and the time at which they were read
#[derive(Default)]
pub struct NetRateCalculator {
    previous: Option<(NetworkSnapshot, Timestamp)>,
}

impl NetRateCalculator {
    /// Calculates the transfer rates since the last call, then retains `current` for the next call.
    ///
    /// Rates are 0 on the first call, or when any counter decreased (interface removed, counters
    /// reset, ...).
    ///
    /// # Arguments
    ///  * `current`: The new cumulative counters
    ///  * `now`: The time at which `current` was read
    pub fn compute_rates(&mut self, current: NetworkSnapshot, now: Timestamp) -> NetRates {
        let rates = match self.previous {
            Some((last, last_time))
                if current.bytes_in >= last.bytes_in && current.bytes_out >= last.bytes_out =>
            {
                let elapsed = now.duration_since(&last_time).as_micros() as f64 / MICROS_PER_SEC;
                Self::rates_over(elapsed, current.bytes_in - last.bytes_in, current.bytes_out - last.bytes_out)
            }
            _ => NetRates::default(),
        };

        self.previous = Some((current, now));
        rates
    }

    fn rates_over(elapsed_secs: f64, delta_in: u64, delta_out: u64) -> NetRates {
        if elapsed_secs <= 0. {
            return NetRates::default();
        }

        NetRates {
            bytes_in: (delta_in as f64 / elapsed_secs) as u64,
            bytes_out: (delta_out as f64 / elapsed_secs) as u64,
        }
    }

    /// The last cumulative counters read, if any
    pub fn totals(&self) -> Option<NetworkSnapshot> {
        self.previous.map(|(snapshot, _)| snapshot)
    }
}


#[cfg(test)]
mod test_net_rates {
    use std::time::Duration;

    use rstest::*;

    use crate::core::counters::NetworkSnapshot;
    use crate::core::delta::{NetRateCalculator, NetRates};
    use crate::core::time::Timestamp;

    #[fixture]
    fn calc_with_baseline() -> (NetRateCalculator, Timestamp) {
        let mut calc = NetRateCalculator::default();
        let start = Timestamp::now();
        calc.compute_rates(NetworkSnapshot::new(5000, 1000), start);

        (calc, start)
    }

    #[test]
    fn test_should_return_zero_rates_on_first_sample() {
        let mut calc = NetRateCalculator::default();

        let rates = calc.compute_rates(NetworkSnapshot::new(5000, 1000), Timestamp::now());

        assert_eq!(rates, NetRates::default());
        assert_eq!(calc.totals(), Some(NetworkSnapshot::new(5000, 1000)));
    }

    #[rstest]
    fn test_should_divide_delta_by_elapsed_time(calc_with_baseline: (NetRateCalculator, Timestamp)) {
        let (mut calc, start) = calc_with_baseline;

        let rates = calc.compute_rates(NetworkSnapshot::new(7000, 1500), start + Duration::from_millis(500));

        assert_eq!(rates, NetRates { bytes_in: 4000, bytes_out: 1000 });
    }

    #[rstest]
    #[case(0, 1500)]
    #[case(7000, 999)]
    #[case(0, 0)]
    fn test_should_return_zero_rates_when_a_counter_decreases(
        calc_with_baseline: (NetRateCalculator, Timestamp),
        #[case] bytes_in: u64,
        #[case] bytes_out: u64,
    ) {
        let (mut calc, start) = calc_with_baseline;

        let rates = calc.compute_rates(NetworkSnapshot::new(bytes_in, bytes_out), start + Duration::from_secs(1));

        assert_eq!(rates, NetRates::default());
    }

    #[rstest]
    fn test_should_resume_rates_after_counter_reset(calc_with_baseline: (NetRateCalculator, Timestamp)) {
        let (mut calc, start) = calc_with_baseline;
        calc.compute_rates(NetworkSnapshot::new(0, 0), start + Duration::from_secs(1));

        let rates = calc.compute_rates(NetworkSnapshot::new(300, 100), start + Duration::from_secs(2));

        assert_eq!(rates, NetRates { bytes_in: 300, bytes_out: 100 });
    }

    #[rstest]
    fn test_should_return_zero_rates_when_no_time_elapsed(calc_with_baseline: (NetRateCalculator, Timestamp)) {
        let (mut calc, start) = calc_with_baseline;

        let rates = calc.compute_rates(NetworkSnapshot::new(9000, 9000), start);

        assert_eq!(rates, NetRates::default());
    }
}
