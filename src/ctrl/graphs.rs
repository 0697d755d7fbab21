//! Manages the selection of which graph to render

use crate::core::counters::CounterSource;
use crate::core::scheduler::SampleScheduler;
use crate::core::time::Timestamp;
use crate::core::Error;

/// Contains the graphs of the application, and allows a user to select the visible one
///
/// Every graph is sampled, but only the selected one requests redraws.
pub struct Graphs {
    graphs: Vec<SampleScheduler>,
    selected_index: usize,
}

impl Graphs {
    /// Builds a new graph selector
    ///
    /// Panics if no graphs are given in parameter
    pub fn new(graphs: Vec<SampleScheduler>) -> Self {
        if graphs.is_empty() {
            panic!("No graphs have been defined");
        }

        Self {
            graphs,
            selected_index: 0,
        }
    }

    /// Starts sampling every graph. Only the selected graph is visible.
    pub fn start(&mut self, source: &mut dyn CounterSource, now: Timestamp) -> Result<(), Error> {
        for (index, graph) in self.graphs.iter_mut().enumerate() {
            graph.start(source, now)?;

            if index != self.selected_index {
                graph.stop();
            }
        }

        Ok(())
    }

    pub fn next_graph(&mut self, source: &mut dyn CounterSource, now: Timestamp) -> Result<(), Error> {
        let index = (self.selected_index + 1) % self.graphs.len();
        self.select(index, source, now)
    }

    pub fn previous_graph(&mut self, source: &mut dyn CounterSource, now: Timestamp) -> Result<(), Error> {
        let index = self.selected_index.checked_sub(1).unwrap_or(self.graphs.len() - 1);
        self.select(index, source, now)
    }

    fn select(&mut self, index: usize, source: &mut dyn CounterSource, now: Timestamp) -> Result<(), Error> {
        self.graphs[self.selected_index].stop();
        self.selected_index = index;
        self.graphs[self.selected_index].start(source, now)?;

        Ok(())
    }

    pub fn current(&self) -> &SampleScheduler {
        &self.graphs[self.selected_index]
    }

    pub fn current_mut(&mut self) -> &mut SampleScheduler {
        &mut self.graphs[self.selected_index]
    }

    pub fn as_mut_slice(&mut self) -> &mut [SampleScheduler] {
        self.graphs.as_mut_slice()
    }

    pub fn titles(&self) -> Vec<&'static str> {
        self.graphs.iter().map(|graph| graph.title()).collect()
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    /// The earliest time at which a graph must be sampled
    pub fn next_deadline(&self) -> Option<Timestamp> {
        self.graphs.iter().filter_map(|graph| graph.next_deadline()).min()
    }
}


#[cfg(test)]
mod test_graphs_selector {
    use std::time::Duration;

    use rstest::*;

    use crate::core::counters::fakes::FakeCounterSource;
    use crate::core::scheduler::{SampleScheduler, SchedulerState};
    use crate::core::time::test_utils::setup_fake_clock_to_prevent_substract_overflow;
    use crate::core::time::Timestamp;
    use crate::ctrl::graphs::fakes::FakeSampler;
    use crate::ctrl::graphs::Graphs;

    #[fixture]
    fn graphs() -> Graphs {
        setup_fake_clock_to_prevent_substract_overflow();

        let schedulers = ["graph_1", "graph_2", "graph_3"]
            .into_iter()
            .map(|title| SampleScheduler::new(Box::new(FakeSampler::new(title)), 10, Duration::from_secs(1)))
            .collect();

        let mut graphs = Graphs::new(schedulers);
        graphs
            .start(&mut FakeCounterSource::default(), Timestamp::now())
            .unwrap();
        graphs
    }

    fn states(graphs: &mut Graphs) -> Vec<SchedulerState> {
        graphs.as_mut_slice().iter().map(|graph| graph.state()).collect()
    }

    #[rstest]
    #[should_panic]
    fn test_should_panic_when_no_graphs_given() {
        Graphs::new(vec![]);
    }

    #[rstest]
    fn test_should_only_show_first_graph_after_start(mut graphs: Graphs) {
        assert_eq!(graphs.current().title(), "graph_1");
        assert_eq!(
            states(&mut graphs),
            [
                SchedulerState::SamplingVisible,
                SchedulerState::SamplingHidden,
                SchedulerState::SamplingHidden
            ]
        );
    }

    #[rstest]
    fn test_should_sample_hidden_graphs_on_start(mut graphs: Graphs) {
        assert!(graphs
            .as_mut_slice()
            .iter()
            .all(|graph| graph.series().sampled_count() == 1));
    }

    #[rstest]
    fn test_should_select_next_graph(mut graphs: Graphs) {
        graphs
            .next_graph(&mut FakeCounterSource::default(), Timestamp::now())
            .unwrap();

        assert_eq!(graphs.current().title(), "graph_2");
        assert_eq!(
            states(&mut graphs),
            [
                SchedulerState::SamplingHidden,
                SchedulerState::SamplingVisible,
                SchedulerState::SamplingHidden
            ]
        );
    }

    #[rstest]
    fn test_should_select_last_graph_before_first(mut graphs: Graphs) {
        graphs
            .previous_graph(&mut FakeCounterSource::default(), Timestamp::now())
            .unwrap();

        assert_eq!(graphs.current().title(), "graph_3");
        assert_eq!(graphs.selected_index(), 2);
    }

    #[rstest]
    fn test_should_select_first_graph_after_last(mut graphs: Graphs) {
        let mut source = FakeCounterSource::default();
        graphs.next_graph(&mut source, Timestamp::now()).unwrap();
        graphs.next_graph(&mut source, Timestamp::now()).unwrap();
        graphs.next_graph(&mut source, Timestamp::now()).unwrap();

        assert_eq!(graphs.current().title(), "graph_1");
    }

    #[rstest]
    fn test_should_list_titles(graphs: Graphs) {
        assert_eq!(graphs.titles(), ["graph_1", "graph_2", "graph_3"]);
    }

    #[rstest]
    fn test_next_deadline_should_be_one_interval_after_start(graphs: Graphs) {
        let expected = Timestamp::now() + Duration::from_secs(1);

        assert_eq!(graphs.next_deadline(), Some(expected));
    }
}
