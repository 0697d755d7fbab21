//! Dynamic vertical scale of the network graph
//!
//! Network rates are stored in the history as fractions of the current axis maximum. When
//! traffic outgrows the maximum, or stays well below it, a new "nice" maximum is computed and
//! the whole history is rescaled so that the curve keeps its shape.

use log::debug;

use crate::core::delta::NetRates;

/// Below this ratio of the current maximum, the recent peak lets the maximum shrink
const SHRINK_THRESHOLD: f64 = 0.8;
/// Headroom added on top of the recent peak in bytes mode
const BYTES_HEADROOM: f64 = 1.1;
const MIN_BYTES_MAX: u64 = 1024;
/// Below this, bit labels get messy because of the division by 8
const MIN_BITS_MAX: u64 = 10000;

/// Units in which rates are displayed, which drives how the axis maximum is rounded
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub enum UnitMode {
    #[default]
    Bytes,
    Bits,
}

impl UnitMode {
    pub fn toggled(self) -> Self {
        match self {
            UnitMode::Bytes => UnitMode::Bits,
            UnitMode::Bits => UnitMode::Bytes,
        }
    }
}

/// Finds a "nice" number approximately equal to `x`, after Paul Heckbert's algorithm.
///
/// The returned value has a mantissa of 1, 2, 5 or 10.
///
/// # Arguments
///  * `x`: The number to approximate, which should be strictly positive
///  * `round`: If true, `x` is rounded to the closest nice number, otherwise the smallest nice
///    number greater or equal to `x` is returned
pub fn nicenum(x: f64, round: bool) -> f64 {
    if !(x.is_finite() && x > 0.) {
        return x;
    }

    let exp = x.log10().floor();
    let magnitude = 10f64.powf(exp);
    let fraction = x / magnitude;

    let nice_fraction = if round {
        match fraction {
            f if f < 1.5 => 1.,
            f if f < 3. => 2.,
            f if f < 7. => 5.,
            _ => 10.,
        }
    } else {
        match fraction {
            f if f <= 1. => 1.,
            f if f <= 2. => 2.,
            f if f <= 5. => 5.,
            _ => 10.,
        }
    };

    nice_fraction * magnitude
}

/// Amount of horizontal gridlines fitting in a graph, such that 100 is a multiple of it
///
/// # Arguments
///  * `height`: The height of the graph drawing area
///  * `row_height`: The height required by one gridline caption, in the same unit as `height`
pub fn num_bars(height: u16, row_height: u16) -> u32 {
    match height / row_height.max(1) {
        0 | 1 => 1,
        2 | 3 => 2,
        4 => 4,
        _ => 5,
    }
}

/// Rounds a maximum in bits mode: the gridline step, in bits, is a nice number
fn round_bits_max(target: u64, num_bars: u32) -> Option<u64> {
    let bit_max = target.checked_mul(8)?.max(MIN_BITS_MAX);
    let tick = nicenum(bit_max as f64 / num_bars as f64, false);
    let bit_max = num_bars as f64 * tick;

    if bit_max.is_finite() && bit_max < u64::MAX as f64 {
        Some(bit_max as u64 / 8)
    } else {
        None
    }
}

/// Rounds a maximum in bytes mode, so that it reads as one significant digit of a binary
/// prefixed unit (KiB, MiB, ...), divisible by the amount of gridlines
fn round_bytes_max(target: u64, num_bars: u32) -> Option<u64> {
    let max = ((target as f64 * BYTES_HEADROOM) as u64).max(MIN_BYTES_MAX);

    // max <= coef * 2^(10 * block), with coef < 2^10
    let block_shift = (max.ilog2() / 10) * 10;
    let unit = 1u64 << block_shift;
    let coef = (max as f64 / unit as f64).ceil() as u64;

    let magnitude = 10u64.pow(coef.ilog10());
    let coef = coef.div_ceil(magnitude) * magnitude;

    let num_bars = u64::from(num_bars.max(1));
    let coef = match coef % num_bars {
        0 => coef,
        rem => coef + num_bars - rem,
    };

    coef.checked_mul(unit)
}

/// Keeps the network graph maximum, in bytes per second, and the recent peaks that decide when
/// to change it
#[derive(Debug)]
pub struct NetworkRescaler {
    max: u64,
    recent_peaks: Vec<u64>,
    cur: usize,
    unit_mode: UnitMode,
}

impl NetworkRescaler {
    /// Builds a rescaler remembering as many peaks as the history holds samples
    pub fn new(capacity: usize, unit_mode: UnitMode) -> Self {
        Self {
            max: 1,
            recent_peaks: vec![0; capacity.max(1)],
            cur: 0,
            unit_mode,
        }
    }

    /// The current maximum, in bytes per second. Never zero.
    pub fn max(&self) -> u64 {
        self.max
    }

    pub fn unit_mode(&self) -> UnitMode {
        self.unit_mode
    }

    /// Returns the fraction of the current maximum represented by `rate`
    pub fn scaled(&self, rate: u64) -> f64 {
        rate as f64 / self.max as f64
    }

    /// Records the peak rate of a tick, and computes a new maximum if required.
    ///
    /// Returns the factor by which every sample of the history must be multiplied if the maximum
    /// changed, `None` otherwise.
    ///
    /// # Arguments
    ///  * `rates`: The rates measured during this tick
    ///  * `num_bars`: The amount of gridlines currently drawn
    pub fn on_new_peak(&mut self, rates: NetRates, num_bars: u32) -> Option<f64> {
        let dmax = rates.max();
        self.recent_peaks[self.cur] = dmax;
        self.cur = (self.cur + 1) % self.recent_peaks.len();

        let true_recent_max = dmax.max(self.recent_max());
        let max = self.max as f64;

        if SHRINK_THRESHOLD * max <= true_recent_max as f64 && true_recent_max <= self.max {
            return None;
        }

        self.rescale_to(true_recent_max, num_bars)
    }

    /// Changes the unit mode, rounding the maximum again with the new mode
    ///
    /// Returns the history rescale factor, as [`on_new_peak`](Self::on_new_peak) does.
    pub fn set_unit_mode(&mut self, unit_mode: UnitMode, num_bars: u32) -> Option<f64> {
        if unit_mode == self.unit_mode {
            return None;
        }

        self.unit_mode = unit_mode;
        self.rescale_to(self.recent_max(), num_bars)
    }

    /// Forgets every recorded peak, and sets the maximum back to its initial value
    pub fn reset(&mut self) {
        self.max = 1;
        self.cur = 0;
        self.recent_peaks.fill(0);
    }

    fn recent_max(&self) -> u64 {
        self.recent_peaks.iter().copied().max().unwrap_or(0)
    }

    fn rescale_to(&mut self, target: u64, num_bars: u32) -> Option<f64> {
        let rounded = match self.unit_mode {
            UnitMode::Bits => round_bits_max(target, num_bars),
            UnitMode::Bytes => round_bytes_max(target, num_bars),
        };

        let new_max = match rounded {
            Some(rounded) if rounded >= target => rounded,
            _ => {
                debug!("Overflow detected while rounding network max: target={} rounded={:?}", target, rounded);
                target
            }
        }
        .max(1);

        if new_max == self.max {
            return None;
        }

        let scale = self.max as f64 / new_max as f64;
        debug!(
            "Rescaling network graph ({:?}): peak={} max={} new_max={}",
            self.unit_mode, target, self.max, new_max
        );

        self.max = new_max;
        Some(scale)
    }
}


#[cfg(test)]
mod test_network_rescaler {
    use rstest::*;

    use crate::core::delta::NetRates;
    use crate::core::history::{MetricSeries, SENTINEL};
    use crate::core::rescale::{NetworkRescaler, UnitMode};

    fn rates(bytes_in: u64, bytes_out: u64) -> NetRates {
        NetRates { bytes_in, bytes_out }
    }

    fn rescaler_with_max(unit_mode: UnitMode, peak: u64, num_bars: u32) -> NetworkRescaler {
        let mut rescaler = NetworkRescaler::new(10, unit_mode);
        rescaler.on_new_peak(rates(peak, 0), num_bars);
        rescaler
    }

    #[test]
    fn test_should_display_bytes_by_default() {
        assert_eq!(UnitMode::default(), UnitMode::Bytes);
        assert_eq!(UnitMode::default().toggled(), UnitMode::Bits);
    }

    #[test]
    fn test_should_start_with_non_zero_max() {
        let rescaler = NetworkRescaler::new(10, UnitMode::Bytes);

        assert_eq!(rescaler.max(), 1);
    }

    #[test]
    fn test_should_floor_bytes_max_to_one_kib() {
        let mut rescaler = NetworkRescaler::new(10, UnitMode::Bytes);

        let scale = rescaler.on_new_peak(rates(0, 0), 1);

        assert_eq!(rescaler.max(), 1024);
        assert_eq!(scale, Some(1. / 1024.));
    }

    #[test]
    fn test_floored_bytes_max_should_stay_divisible_by_num_bars() {
        let mut rescaler = NetworkRescaler::new(10, UnitMode::Bytes);

        let scale = rescaler.on_new_peak(rates(0, 0), 5);

        assert_eq!(rescaler.max(), 5 * 1024);
        assert_eq!(scale, Some(1. / 5120.));
    }

    #[test]
    fn test_should_grow_max_immediately_when_exceeded() {
        let mut rescaler = rescaler_with_max(UnitMode::Bytes, 0, 1);
        assert_eq!(rescaler.max(), 1024);

        let scale = rescaler.on_new_peak(rates(2048, 0), 1);

        assert_eq!(rescaler.max(), 3072);
        assert_eq!(scale, Some(1024. / 3072.));
    }

    #[rstest]
    #[case(1, 3 * 1024)]
    #[case(2, 4 * 1024)]
    #[case(4, 4 * 1024)]
    #[case(5, 5 * 1024)]
    fn test_bytes_max_should_be_divisible_by_num_bars(#[case] num_bars: u32, #[case] expected: u64) {
        let rescaler = rescaler_with_max(UnitMode::Bytes, 2048, num_bars);

        assert_eq!(rescaler.max(), expected);
    }

    #[rstest]
    #[case(218 * 1024, 300 * 1024)]
    #[case(92 * 1024, 200 * 1024)]
    #[case(3 * 1024 * 1024, 4 * 1024 * 1024)]
    fn test_bytes_max_should_have_one_significant_digit(#[case] peak: u64, #[case] expected: u64) {
        let rescaler = rescaler_with_max(UnitMode::Bytes, peak, 1);

        assert_eq!(rescaler.max(), expected);
    }

    #[rstest]
    #[case(0, 5, 1250)]
    #[case(1000, 5, 1250)]
    #[case(100_000, 5, 125_000)]
    #[case(100_000, 4, 100_000)]
    #[case(130_000, 2, 250_000)]
    fn test_bits_max_should_be_nice_amount_of_bits_per_bar(
        #[case] peak: u64,
        #[case] num_bars: u32,
        #[case] expected: u64,
    ) {
        let rescaler = rescaler_with_max(UnitMode::Bits, peak, num_bars);

        assert_eq!(rescaler.max(), expected);
    }

    #[rstest]
    #[case(1024)]
    #[case(900)]
    #[case(820)]
    fn test_should_not_change_max_within_hysteresis_band(#[case] peak: u64) {
        let mut rescaler = NetworkRescaler::new(3, UnitMode::Bytes);
        rescaler.on_new_peak(rates(0, 0), 1);
        assert_eq!(rescaler.max(), 1024);

        for _ in 0..3 {
            assert_eq!(rescaler.on_new_peak(rates(peak, peak / 2), 1), None);
        }
        assert_eq!(rescaler.max(), 1024);
    }

    #[test]
    fn test_should_shrink_only_once_peak_left_the_window() {
        let mut rescaler = NetworkRescaler::new(3, UnitMode::Bytes);
        rescaler.on_new_peak(rates(200 * 1024, 0), 1);
        assert_eq!(rescaler.max(), 300 * 1024);

        assert_eq!(rescaler.on_new_peak(rates(1000, 0), 1), None);
        assert_eq!(rescaler.on_new_peak(rates(1000, 0), 1), None);
        assert_eq!(rescaler.max(), 300 * 1024);

        let scale = rescaler.on_new_peak(rates(1000, 0), 1);

        assert_eq!(rescaler.max(), 2048);
        assert_eq!(scale, Some(300. * 1024. / 2048.));
    }

    #[test]
    fn test_should_fall_back_to_raw_peak_when_rounding_overflows() {
        let peak = u64::MAX / 2;
        let rescaler = rescaler_with_max(UnitMode::Bits, peak, 5);

        assert_eq!(rescaler.max(), peak);

        let rescaler = rescaler_with_max(UnitMode::Bytes, u64::MAX - 1, 5);

        assert_eq!(rescaler.max(), u64::MAX - 1);
    }

    #[test]
    fn test_should_round_again_when_unit_mode_changes() {
        let mut rescaler = rescaler_with_max(UnitMode::Bytes, 2048, 1);
        assert_eq!(rescaler.max(), 3072);

        let scale = rescaler.set_unit_mode(UnitMode::Bits, 5);

        assert_eq!(rescaler.max(), 3125);
        assert_eq!(scale, Some(3072. / 3125.));
        assert_eq!(rescaler.set_unit_mode(UnitMode::Bits, 5), None);
    }

    #[test]
    fn test_should_forget_peaks_on_reset() {
        let mut rescaler = rescaler_with_max(UnitMode::Bytes, 2048, 1);

        rescaler.reset();

        assert_eq!(rescaler.max(), 1);
        rescaler.on_new_peak(rates(10, 10), 1);
        assert_eq!(rescaler.max(), 1024);
    }

    #[test]
    fn test_history_should_follow_rescale() {
        let mut rescaler = rescaler_with_max(UnitMode::Bytes, 0, 1);
        let mut series = MetricSeries::new(4, 2);
        series.shift_and_insert(&[rescaler.scaled(512), rescaler.scaled(256)]).unwrap();

        let peak = rates(2048, 0);
        series.shift_and_insert(&[rescaler.scaled(peak.bytes_in), rescaler.scaled(peak.bytes_out)]).unwrap();
        let scale = rescaler.on_new_peak(peak, 1).unwrap();
        series.rescale(scale);

        assert_eq!(series.head(), &[2048. / 3072., 0.]);
        assert_eq!(series.sample(1), Some(&[512. / 3072., 256. / 3072.][..]));
        assert_eq!(series.sample(2), Some(&[SENTINEL, SENTINEL][..]));
    }
}
