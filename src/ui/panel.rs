use std::time::Duration;

use tui::style::{Color, Modifier, Style};
use tui::text::{Span, Spans};
use tui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::core::rescale::UnitMode;
use crate::core::view::{GraphView, Label};
use crate::ui::chart::series_color;
use crate::ui::terminal::FrameRegion;

/// Lists the labels of the visible graph, next to the chart
#[derive(Default)]
pub struct LabelsPanel {
    labels: Vec<Label>,
    series_names: Vec<String>,
}

impl LabelsPanel {
    pub fn refresh(&mut self, view: &GraphView) {
        self.labels = view.labels().to_vec();
        self.series_names = view.series_names().to_vec();
    }

    pub fn render(&self, frame: &mut FrameRegion) {
        let lines: Vec<Spans> = self.labels.iter().map(|label| self.line(label)).collect();

        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::TOP | Borders::BOTTOM | Borders::LEFT))
            .wrap(Wrap { trim: true });

        frame.render_widget(paragraph);
    }

    /// Labels named after a sub-series take the color of its curve
    fn line<'a>(&self, label: &'a Label) -> Spans<'a> {
        let name_style = match self.series_names.iter().position(|name| *name == label.name) {
            Some(series) => Style::default().fg(series_color(series)).add_modifier(Modifier::BOLD),
            None => Style::default().add_modifier(Modifier::BOLD),
        };

        Spans::from(vec![
            Span::styled(format!("{}: ", label.name), name_style),
            Span::raw(label.value.as_str()),
        ])
    }
}

/// Lists the available keys, and the current settings
pub fn render_help_bar(frame: &mut FrameRegion, interval: Duration, unit_mode: UnitMode) {
    let text = help_text(interval, unit_mode);
    let paragraph = Paragraph::new(Span::raw(text)).style(Style::default().fg(Color::White));

    frame.render_widget(paragraph);
}

fn help_text(interval: Duration, unit_mode: UnitMode) -> String {
    let units = match unit_mode {
        UnitMode::Bytes => "bytes",
        UnitMode::Bits => "bits",
    };

    format!(
        "q quit | \u{2190}/\u{2192} graph | +/- interval ({:.2}s) | b units ({}) | r reset",
        interval.as_secs_f64(),
        units
    )
}
