use std::time::Duration;

use crate::core::format::gridline_captions;
use crate::core::history::MetricSeries;
use crate::core::rescale::UnitMode;
use crate::core::Error;

/// Vertical axis of a graph
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Axis {
    /// Samples are loads between 0 and 1
    Fraction,
    /// Samples are fractions of `max`, a rate in bytes per second
    Rate { max: u64, unit_mode: UnitMode },
}

/// A textual value displayed next to a graph, e.g. the current load of a core
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Label {
    pub name: String,
    pub value: String,
}

impl Label {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Read-only view of a graph, with everything required to draw it
pub struct GraphView<'a> {
    title: &'static str,
    series: &'a MetricSeries,
    series_names: &'a [String],
    labels: &'a [Label],
    axis: Axis,
    num_bars: u32,
    interval: Duration,
}

impl<'a> GraphView<'a> {
    pub fn new(
        title: &'static str,
        series: &'a MetricSeries,
        series_names: &'a [String],
        labels: &'a [Label],
        axis: Axis,
        num_bars: u32,
        interval: Duration,
    ) -> Self {
        Self {
            title,
            series,
            series_names,
            labels,
            axis,
            num_bars,
            interval,
        }
    }

    pub fn title(&self) -> &'static str {
        self.title
    }

    pub fn series(&self) -> &MetricSeries {
        self.series
    }

    pub fn series_names(&self) -> &[String] {
        self.series_names
    }

    pub fn labels(&self) -> &[Label] {
        self.labels
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn num_bars(&self) -> u32 {
        self.num_bars
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn gridline_captions(&self) -> Vec<String> {
        gridline_captions(&self.axis, self.num_bars)
    }

    /// Returns the drawable points of one sub-series, as `(x, y)` pairs.
    ///
    /// The oldest slot of the history is at `x = 0`, the most recent one at `x = capacity - 1`.
    /// Slots which have not been sampled yet are not returned.
    pub fn points(&self, series: usize) -> Result<Vec<(f64, f64)>, Error> {
        let last_x = self.series.capacity() - 1;

        Ok(self
            .series
            .sampled_values(series)?
            .into_iter()
            .rev()
            .map(|(age, value)| ((last_x - age) as f64, value))
            .collect())
    }
}

#[cfg(test)]
mod test_graph_view {
    use std::time::Duration;

    use crate::core::history::MetricSeries;
    use crate::core::rescale::UnitMode;
    use crate::core::view::{Axis, GraphView};
    use crate::core::Error;

    #[test]
    fn test_points_should_skip_sentinels_and_put_newest_last() {
        let mut series = MetricSeries::new(4, 2);
        series.shift_and_insert(&[0.1, 0.2]).unwrap();
        series.shift_and_insert(&[0.3, 0.4]).unwrap();

        let view = GraphView::new("CPU", &series, &[], &[], Axis::Fraction, 5, Duration::from_secs(1));

        assert_eq!(view.points(0).unwrap(), vec![(2., 0.1), (3., 0.3)]);
        assert!(matches!(view.points(2), Err(Error::InvalidSeriesIndex(2, 2))));
    }

    #[test]
    fn test_gridline_captions_should_follow_axis() {
        let series = MetricSeries::new(4, 2);
        let axis = Axis::Rate {
            max: 1024,
            unit_mode: UnitMode::Bytes,
        };

        let view = GraphView::new("Network", &series, &[], &[], axis, 1, Duration::from_secs(1));

        assert_eq!(view.gridline_captions(), vec!["1.0 KiB/s", "0 bytes/s"]);
    }
}
