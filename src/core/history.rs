//! Rolling history of samples

use std::collections::VecDeque;

use crate::core::Error;

/// Value of a slot that has not been sampled yet
pub const SENTINEL: f64 = -1.;

/// Returns true if `value` marks a slot that has not been sampled yet
pub fn is_sentinel(value: f64) -> bool {
    value == SENTINEL
}

/// Fixed-capacity history of sample vectors, one value per sub-series.
///
/// Index 0 always holds the most recent sample. Slots which have not been sampled yet hold
/// [`SENTINEL`](SENTINEL), and are always located after all sampled slots.
#[derive(Debug, Clone)]
pub struct MetricSeries {
    samples: VecDeque<Vec<f64>>,
    series_count: usize,
}

impl MetricSeries {
    /// Builds a series with every slot set to the sentinel value
    ///
    /// # Arguments
    ///  * `capacity`: The amount of samples retained. It must at least be 1.
    ///  * `series_count`: The amount of values in each sample
    pub fn new(capacity: usize, series_count: usize) -> Self {
        let capacity = capacity.max(1);
        let samples = (0..capacity).map(|_| vec![SENTINEL; series_count]).collect();

        Self { samples, series_count }
    }

    pub fn capacity(&self) -> usize {
        self.samples.len()
    }

    pub fn series_count(&self) -> usize {
        self.series_count
    }

    /// Drops the oldest sample, and inserts `sample` as the most recent one.
    ///
    /// The storage of the dropped sample is reused for the new one.
    pub fn shift_and_insert(&mut self, sample: &[f64]) -> Result<(), Error> {
        if sample.len() != self.series_count {
            return Err(Error::SampleSizeMismatch(sample.len(), self.series_count));
        }

        if let Some(mut oldest) = self.samples.pop_back() {
            oldest.copy_from_slice(sample);
            self.samples.push_front(oldest);
        }

        Ok(())
    }

    /// Sets every slot back to the sentinel value
    pub fn reset(&mut self) {
        self.samples.iter_mut().for_each(|sample| sample.fill(SENTINEL));
    }

    /// Multiplies every sampled value by `factor`, leaving sentinel slots untouched
    pub fn rescale(&mut self, factor: f64) {
        self.samples
            .iter_mut()
            .flat_map(|sample| sample.iter_mut())
            .filter(|value| !is_sentinel(**value))
            .for_each(|value| *value *= factor);
    }

    /// Returns the sample at the given age (0 being the most recent)
    pub fn sample(&self, age: usize) -> Option<&[f64]> {
        self.samples.get(age).map(|sample| sample.as_slice())
    }

    /// The most recent sample
    pub fn head(&self) -> &[f64] {
        self.samples.front().map(|sample| sample.as_slice()).unwrap_or(&[])
    }

    /// Iterates over samples, from the most recent to the oldest
    pub fn iter(&self) -> impl Iterator<Item = &[f64]> {
        self.samples.iter().map(|sample| sample.as_slice())
    }

    /// Returns the values of one sub-series, from the most recent to the oldest, with their age.
    /// Sentinel slots are skipped.
    pub fn sampled_values(&self, series: usize) -> Result<Vec<(usize, f64)>, Error> {
        if series >= self.series_count {
            return Err(Error::InvalidSeriesIndex(series, self.series_count));
        }

        Ok(self
            .samples
            .iter()
            .enumerate()
            .map(|(age, sample)| (age, sample[series]))
            .filter(|(_, value)| !is_sentinel(*value))
            .collect())
    }

    /// Amount of slots that have been sampled
    pub fn sampled_count(&self) -> usize {
        self.samples
            .iter()
            .take_while(|sample| !sample.iter().all(|v| is_sentinel(*v)))
            .count()
    }
}

#[cfg(test)]
mod test_metric_series {
    use rand::Rng;
    use rstest::*;

    use crate::core::history::{is_sentinel, MetricSeries, SENTINEL};
    use crate::core::Error;

    #[fixture]
    fn series() -> MetricSeries {
        MetricSeries::new(5, 2)
    }

    #[rstest]
    fn test_should_be_filled_with_sentinels_on_creation(series: MetricSeries) {
        assert_eq!(series.capacity(), 5);
        assert_eq!(series.series_count(), 2);
        assert!(series.iter().all(|s| s == [SENTINEL, SENTINEL]));
        assert_eq!(series.sampled_count(), 0);
    }

    #[rstest]
    fn test_should_insert_newest_sample_at_head(mut series: MetricSeries) {
        series.shift_and_insert(&[0.1, 0.2]).unwrap();
        series.shift_and_insert(&[0.3, 0.4]).unwrap();

        assert_eq!(series.head(), &[0.3, 0.4]);
        assert_eq!(series.sample(1), Some(&[0.1, 0.2][..]));
        assert_eq!(series.sample(2), Some(&[SENTINEL, SENTINEL][..]));
    }

    #[rstest]
    fn test_should_drop_oldest_sample_when_full(mut series: MetricSeries) {
        for i in 0..7 {
            series.shift_and_insert(&[i as f64, 0.]).unwrap();
        }

        assert_eq!(series.capacity(), 5);
        assert_eq!(series.head(), &[6., 0.]);
        assert_eq!(series.sample(4), Some(&[2., 0.][..]));
        assert_eq!(series.sample(5), None);
    }

    #[rstest]
    fn test_should_reject_sample_of_wrong_size(mut series: MetricSeries) {
        let result = series.shift_and_insert(&[0.1]);

        assert!(matches!(result, Err(Error::SampleSizeMismatch(1, 2))));
        assert_eq!(series.sampled_count(), 0);
    }

    #[rstest]
    fn test_should_keep_dimensions_on_reset(mut series: MetricSeries) {
        series.shift_and_insert(&[0.1, 0.2]).unwrap();
        series.reset();

        assert_eq!(series.capacity(), 5);
        assert_eq!(series.series_count(), 2);
        assert!(series.iter().all(|s| s == [SENTINEL, SENTINEL]));
    }

    #[rstest]
    fn test_rescale_should_skip_sentinels(mut series: MetricSeries) {
        series.shift_and_insert(&[0.5, 0.25]).unwrap();
        series.rescale(0.5);

        assert_eq!(series.head(), &[0.25, 0.125]);
        assert_eq!(series.sample(1), Some(&[SENTINEL, SENTINEL][..]));
    }

    #[rstest]
    fn test_rescale_round_trip_should_restore_samples(mut series: MetricSeries) {
        let mut rng = rand::thread_rng();
        for _ in 0..4 {
            series.shift_and_insert(&[rng.gen_range(0. ..1.), rng.gen_range(0. ..1.)]).unwrap();
        }
        let original = series.clone();
        let (old_max, new_max) = (1024., 3072.);

        series.rescale(old_max / new_max);
        for (rescaled, v) in series.iter().zip(original.iter()) {
            for (r, o) in rescaled.iter().zip(v) {
                if is_sentinel(*o) {
                    assert_eq!(*r, SENTINEL);
                } else {
                    assert!((r - o * old_max / new_max).abs() < 1e-12);
                }
            }
        }

        series.rescale(new_max / old_max);
        for (restored, v) in series.iter().zip(original.iter()) {
            for (r, o) in restored.iter().zip(v) {
                assert!((r - o).abs() < 1e-12);
            }
        }
    }

    #[rstest]
    fn test_sampled_values_should_skip_sentinels(mut series: MetricSeries) {
        series.shift_and_insert(&[0.1, 0.2]).unwrap();
        series.shift_and_insert(&[0.3, 0.4]).unwrap();

        assert_eq!(series.sampled_values(1).unwrap(), vec![(0, 0.4), (1, 0.2)]);
        assert!(matches!(series.sampled_values(2), Err(Error::InvalidSeriesIndex(2, 2))));
    }

    #[test]
    fn test_head_should_always_be_last_insert_and_tail_sentinels() {
        let mut rng = rand::thread_rng();

        for _ in 0..50 {
            let capacity = rng.gen_range(1..20);
            let inserts = rng.gen_range(0..40);
            let mut series = MetricSeries::new(capacity, 3);

            for n in 1..=inserts {
                let sample = [rng.gen_range(0. ..1.), rng.gen_range(0. ..1.), rng.gen_range(0. ..1.)];
                series.shift_and_insert(&sample).unwrap();

                assert_eq!(series.head(), &sample);
                assert_eq!(series.capacity(), capacity);
                for age in n..capacity {
                    assert!(series.sample(age).unwrap().iter().all(|v| is_sentinel(*v)));
                }
                assert_eq!(series.sampled_count(), n.min(capacity));
            }
        }
    }
}
