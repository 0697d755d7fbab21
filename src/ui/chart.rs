use tui::layout::{Constraint, Rect};
use tui::style::{Color, Style};
use tui::symbols;
use tui::text::Span;
use tui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType};

use crate::core::view::GraphView;
use crate::ui::labels::time_captions;
use crate::ui::terminal::FrameRegion;
use crate::ui::Error;

/// Rows taken by the chart borders and by the time axis
const NON_PLOT_ROWS: u16 = 4;

const PALETTE: [Color; 8] = [
    Color::Cyan,
    Color::Yellow,
    Color::Magenta,
    Color::Green,
    Color::Red,
    Color::Blue,
    Color::LightCyan,
    Color::LightYellow,
];

/// Color of a sub-series, shared by its curve and its label
pub fn series_color(series: usize) -> Color {
    PALETTE[series % PALETTE.len()]
}

/// Draws the curves of the visible graph
///
/// The captions of the axes are only computed again when the graph background is invalidated.
#[derive(Default)]
pub struct GraphChart {
    title: &'static str,
    names: Vec<String>,
    points: Vec<Vec<(f64, f64)>>,
    x_bound: f64,
    gridline_captions: Vec<String>,
    time_captions: Vec<String>,
}

impl GraphChart {
    /// Height in rows of the area in which curves are drawn, for a chart rendered in `chunk`
    pub fn plot_height(chunk: Rect) -> u16 {
        chunk.height.saturating_sub(NON_PLOT_ROWS)
    }

    /// Computes the axes captions again from `view`
    pub fn refresh_background(&mut self, view: &GraphView) {
        // tui lays out captions from the bottom to the top
        self.gridline_captions = view.gridline_captions().into_iter().rev().collect();
        self.time_captions = time_captions(view.interval(), view.series().capacity());
    }

    /// Takes the curves to draw from `view`
    pub fn refresh_data(&mut self, view: &GraphView) -> Result<(), Error> {
        self.title = view.title();
        self.names = view.series_names().to_vec();
        self.x_bound = view.series().capacity().saturating_sub(1) as f64;
        self.points = (0..view.series().series_count())
            .map(|series| view.points(series))
            .collect::<Result<_, _>>()?;

        Ok(())
    }

    pub fn render(&self, frame: &mut FrameRegion) {
        let datasets = self
            .points
            .iter()
            .zip(self.names.iter())
            .enumerate()
            .map(|(series, (points, name))| {
                Dataset::default()
                    .name(name.as_str())
                    .marker(symbols::Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(series_color(series)))
                    .data(points)
            })
            .collect();

        let chart = Chart::new(datasets)
            .block(
                Block::default()
                    .title(Span::raw(self.title))
                    .borders(Borders::TOP | Borders::BOTTOM),
            )
            .hidden_legend_constraints((Constraint::Ratio(0, 1), Constraint::Ratio(0, 1)))
            .x_axis(
                Axis::default()
                    .style(Style::default().fg(Color::White))
                    .bounds([0., self.x_bound])
                    .labels(Self::spans(&self.time_captions)),
            )
            .y_axis(
                Axis::default()
                    .style(Style::default().fg(Color::White))
                    .bounds([0., 1.])
                    .labels(Self::spans(&self.gridline_captions)),
            );

        frame.render_widget(chart);
    }

    fn spans(captions: &[String]) -> Vec<Span> {
        captions.iter().map(|caption| Span::raw(caption.as_str())).collect()
    }
}
