//! Terminal rendering of the graphs

use std::io;

use thiserror::Error;

use crate::core::rescale::num_bars;
use crate::ctrl::Controls;
use crate::ui::chart::GraphChart;
use crate::ui::layout::UiLayout;
use crate::ui::panel::{render_help_bar, LabelsPanel};
use crate::ui::tabs::render_tabs;
use crate::ui::terminal::Terminal;

mod chart;
mod labels;
mod layout;
mod panel;
mod tabs;
mod terminal;

/// Rows of plot area between two gridlines
pub const ROWS_PER_GRIDLINE: u16 = 3;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Terminal error")]
    IOError(#[from] io::Error),
    #[error("Could not build the graph to draw")]
    GraphError(#[from] crate::core::Error),
}

/// Draws the visible graph, with its tabs, labels and key help
pub struct LoadGraphUI {
    terminal: Terminal,
    chart: GraphChart,
    labels_panel: LabelsPanel,
    /// Index of the graph whose background is currently cached
    rendered_index: Option<usize>,
}

impl LoadGraphUI {
    pub fn new() -> Result<Self, Error> {
        Ok(Self {
            terminal: Terminal::new()?,
            chart: GraphChart::default(),
            labels_panel: LabelsPanel::default(),
            rendered_index: None,
        })
    }

    /// Amount of gridlines which fit in the chart, for the current terminal size
    pub fn num_bars(&self) -> Result<u32, Error> {
        let layout = UiLayout::new(self.terminal.size()?);
        let plot_height = GraphChart::plot_height(layout.chart_chunk());

        Ok(num_bars(plot_height, ROWS_PER_GRIDLINE))
    }

    pub fn render(&mut self, controls: &mut Controls) -> Result<(), Error> {
        let titles = controls.graphs().titles();
        let selected_index = controls.graphs().selected_index();
        let unit_mode = controls.unit_mode();

        let graph = controls.current_graph_mut();
        let background_invalidated = graph.take_background_invalidated();
        let view = graph.view();

        if background_invalidated || self.rendered_index != Some(selected_index) {
            self.rendered_index = Some(selected_index);
            self.chart.refresh_background(&view);
        }
        self.chart.refresh_data(&view)?;
        self.labels_panel.refresh(&view);
        let interval = view.interval();

        let chart = &self.chart;
        let labels_panel = &self.labels_panel;

        self.terminal.draw(|frame| {
            let layout = UiLayout::new(frame.region());

            render_tabs(&mut frame.with_region(layout.tabs_chunk()), &titles, selected_index);
            chart.render(&mut frame.with_region(layout.chart_chunk()));
            labels_panel.render(&mut frame.with_region(layout.labels_chunk()));
            render_help_bar(&mut frame.with_region(layout.help_chunk()), interval, unit_mode);
        })
    }
}
