//! Timer-driven sampling of one graph

use std::time::Duration;

use log::{debug, info};

use crate::core::counters::CounterSource;
use crate::core::history::MetricSeries;
use crate::core::rescale::UnitMode;
use crate::core::sampler::{SampleOutcome, Sampler};
use crate::core::time::Timestamp;
use crate::core::timer::IntervalTimer;
use crate::core::view::GraphView;
use crate::core::Error;

pub const MIN_INTERVAL_MS: u64 = 250;
pub const MAX_INTERVAL_MS: u64 = 100_000;

/// Clamps an update interval into the supported range
pub fn clamp_interval(interval_ms: u64) -> Duration {
    Duration::from_millis(interval_ms.clamp(MIN_INTERVAL_MS, MAX_INTERVAL_MS))
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SchedulerState {
    /// The timer is not running
    Stopped,
    /// The history is kept up to date, but no redraw is requested
    SamplingHidden,
    /// Every tick requests a redraw
    SamplingVisible,
}

/// Side effects requested by a tick
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct TickOutcome {
    /// The graph should be drawn again
    pub redraw: bool,
    /// The graph background (gridline and time captions) changed
    pub background_invalidated: bool,
}

/// Drives the sampling of one graph, once per interval
pub struct SampleScheduler {
    sampler: Box<dyn Sampler>,
    series: MetricSeries,
    timer: IntervalTimer,
    state: SchedulerState,
    num_bars: u32,
    background_valid: bool,
}

impl SampleScheduler {
    /// Builds a stopped scheduler
    ///
    /// # Arguments
    ///  * `sampler`: Produces the samples of the graph
    ///  * `capacity`: The amount of samples kept in the graph history
    ///  * `interval`: The duration between two ticks
    pub fn new(sampler: Box<dyn Sampler>, capacity: usize, interval: Duration) -> Self {
        let series = MetricSeries::new(capacity, sampler.series_names().len());

        Self {
            sampler,
            series,
            timer: IntervalTimer::new(interval),
            state: SchedulerState::Stopped,
            num_bars: 1,
            background_valid: false,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn title(&self) -> &'static str {
        self.sampler.title()
    }

    pub fn interval(&self) -> Duration {
        self.timer.period()
    }

    pub fn series(&self) -> &MetricSeries {
        &self.series
    }

    /// The time at which the next tick is due, if sampling
    pub fn next_deadline(&self) -> Option<Timestamp> {
        self.timer.next_deadline()
    }

    /// Makes the graph visible.
    ///
    /// If the scheduler was stopped, the timer is started and a first tick is performed
    /// immediately, so that the graph is not blank.
    pub fn start(&mut self, source: &mut dyn CounterSource, now: Timestamp) -> Result<TickOutcome, Error> {
        let previous_state = self.state;
        self.set_state(SchedulerState::SamplingVisible);

        if previous_state == SchedulerState::Stopped {
            self.timer.arm(now);
            self.tick(source, now)
        } else {
            Ok(TickOutcome {
                redraw: true,
                background_invalidated: false,
            })
        }
    }

    /// Stops requesting redraws. Sampling goes on so that the history stays up to date.
    pub fn stop(&mut self) {
        if self.state == SchedulerState::SamplingVisible {
            self.set_state(SchedulerState::SamplingHidden);
        }
    }

    /// Stops the timer altogether
    pub fn cancel(&mut self) {
        self.timer.cancel();
        self.set_state(SchedulerState::Stopped);
    }

    /// Changes the duration between ticks, without affecting the history.
    ///
    /// If sampling, the next tick occurs one new interval after `now`.
    ///
    /// # Arguments
    ///  * `interval_ms`: The new interval, clamped between `MIN_INTERVAL_MS` and `MAX_INTERVAL_MS`
    ///  * `now`: The current time
    pub fn set_interval(&mut self, interval_ms: u64, now: Timestamp) {
        let interval = clamp_interval(interval_ms);
        debug!("Setting {} update interval to {:?}", self.title(), interval);

        self.timer.reschedule(interval, now);
        // The time captions depend on the interval
        self.background_valid = false;
    }

    /// Performs a tick if one is due at `now`
    ///
    /// Returns `None` if no tick was due.
    pub fn poll(&mut self, source: &mut dyn CounterSource, now: Timestamp) -> Result<Option<TickOutcome>, Error> {
        if !self.timer.is_due(now) {
            return Ok(None);
        }

        self.timer.advance(now);
        self.tick(source, now).map(Some)
    }

    fn tick(&mut self, source: &mut dyn CounterSource, now: Timestamp) -> Result<TickOutcome, Error> {
        let outcome = self.sampler.sample(source, now, &mut self.series, self.num_bars)?;

        let background_invalidated = outcome == SampleOutcome::Rescaled;
        if background_invalidated {
            self.background_valid = false;
        }

        Ok(TickOutcome {
            redraw: self.state == SchedulerState::SamplingVisible,
            background_invalidated,
        })
    }

    /// Clears the history, which starts over from the next tick
    pub fn reset_history(&mut self) {
        info!("Clearing {} history", self.title());

        self.series.reset();
        self.sampler.reset();
        self.background_valid = false;
    }

    /// Changes the units in which rates are displayed
    pub fn set_unit_mode(&mut self, unit_mode: UnitMode) {
        self.sampler.set_unit_mode(unit_mode, &mut self.series, self.num_bars);
        self.background_valid = false;
    }

    /// Updates the amount of gridlines which fit in the graph drawing area
    pub fn set_num_bars(&mut self, num_bars: u32) {
        if num_bars != self.num_bars {
            self.num_bars = num_bars;
            self.background_valid = false;
        }
    }

    /// Returns true if the background has changed since the last call
    pub fn take_background_invalidated(&mut self) -> bool {
        let invalidated = !self.background_valid;
        self.background_valid = true;
        invalidated
    }

    pub fn view(&self) -> GraphView {
        GraphView::new(
            self.sampler.title(),
            &self.series,
            self.sampler.series_names(),
            self.sampler.labels(),
            self.sampler.axis(),
            self.num_bars,
            self.timer.period(),
        )
    }

    fn set_state(&mut self, state: SchedulerState) {
        if state != self.state {
            info!("{} graph: {:?} -> {:?}", self.title(), self.state, state);
            self.state = state;
        }
    }
}

impl Drop for SampleScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}
