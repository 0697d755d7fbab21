use tui::style::{Color, Style};
use tui::text::Spans;
use tui::widgets::Tabs;

use crate::ui::terminal::FrameRegion;

/// Renders the title of every graph, highlighting the visible one
pub fn render_tabs(frame: &mut FrameRegion, titles: &[&'static str], selected_index: usize) {
    let tabs_spans = titles.iter().copied().map(Spans::from).collect();

    let tabs = Tabs::new(tabs_spans)
        .style(Style::default().fg(Color::White))
        .highlight_style(Style::default().bg(Color::White).fg(Color::Black))
        .divider("|")
        .select(selected_index);

    frame.render_widget(tabs);
}
