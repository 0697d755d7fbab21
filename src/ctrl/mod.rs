//! Interprets user inputs
use crate::core::counters::CounterSource;
use crate::core::rescale::UnitMode;
use crate::core::scheduler::SampleScheduler;
use crate::core::time::Timestamp;
use crate::core::Error;
use crate::ctrl::graphs::Graphs;
use crate::triggers::Key;

pub mod graphs;

/// Indicates the effect caused by a user input
#[derive(Debug, Eq, PartialEq)]
pub enum Effect {
    None,
    Redraw,
}

/// Wraps all controls utilities within a single unit
pub struct Controls {
    graphs: Graphs,
    unit_mode: UnitMode,
}

impl Controls {
    pub fn new(graphs: Vec<SampleScheduler>, unit_mode: UnitMode) -> Self {
        Self {
            graphs: Graphs::new(graphs),
            unit_mode,
        }
    }

    pub fn start(&mut self, source: &mut dyn CounterSource, now: Timestamp) -> Result<(), Error> {
        self.graphs.start(source, now)
    }

    /// Interprets the user input to control the application.
    ///
    /// Returns the effect caused by the input.
    pub fn interpret_input(&mut self, input: Key, source: &mut dyn CounterSource, now: Timestamp) -> Result<Effect, Error> {
        match input {
            Key::Left | Key::P => self.graphs.previous_graph(source, now)?,
            Key::Right | Key::N => self.graphs.next_graph(source, now)?,
            Key::Plus => self.scale_interval(2., now),
            Key::Minus => self.scale_interval(0.5, now),
            Key::B => self.toggle_unit_mode(),
            Key::R => self.graphs.current_mut().reset_history(),
            Key::Other => return Ok(Effect::None),
        }

        Ok(Effect::Redraw)
    }

    fn scale_interval(&mut self, factor: f64, now: Timestamp) {
        for graph in self.graphs.as_mut_slice() {
            let interval_ms = (graph.interval().as_millis() as f64 * factor) as u64;
            graph.set_interval(interval_ms, now);
        }
    }

    fn toggle_unit_mode(&mut self) {
        self.unit_mode = self.unit_mode.toggled();

        for graph in self.graphs.as_mut_slice() {
            graph.set_unit_mode(self.unit_mode);
        }
    }

    /// Performs the ticks due at `now`
    ///
    /// Returns true if the visible graph must be drawn again.
    pub fn poll(&mut self, source: &mut dyn CounterSource, now: Timestamp) -> Result<bool, Error> {
        let mut redraw = false;

        for graph in self.graphs.as_mut_slice() {
            if let Some(outcome) = graph.poll(source, now)? {
                redraw |= outcome.redraw;
            }
        }

        Ok(redraw)
    }

    pub fn next_deadline(&self) -> Option<Timestamp> {
        self.graphs.next_deadline()
    }

    /// Updates the amount of gridlines which fit in the graph drawing area
    pub fn set_num_bars(&mut self, num_bars: u32) {
        for graph in self.graphs.as_mut_slice() {
            graph.set_num_bars(num_bars);
        }
    }

    pub fn graphs(&self) -> &Graphs {
        &self.graphs
    }

    pub fn current_graph_mut(&mut self) -> &mut SampleScheduler {
        self.graphs.current_mut()
    }

    pub fn unit_mode(&self) -> UnitMode {
        self.unit_mode
    }
}
