use std::io;
use std::io::Stdout;

use log::error;
use termion::raw::{IntoRawMode, RawTerminal};
use tui::backend::TermionBackend;
use tui::layout::Rect;
use tui::widgets::Widget;
use tui::{Frame, Terminal as TuiTerminal};

use crate::ui::Error;

pub type TuiBackend = TermionBackend<RawTerminal<Stdout>>;

pub struct Terminal {
    tui_terminal: TuiTerminal<TuiBackend>,
}

impl Terminal {
    pub fn new() -> Result<Self, Error> {
        let stdout = io::stdout().into_raw_mode()?;
        let backend = TermionBackend::new(stdout);

        let mut tui_terminal = TuiTerminal::new(backend)?;

        Self::generate_empty_frame(&mut tui_terminal);

        Ok(Terminal { tui_terminal })
    }

    /// On application startup, calling self.clear() would overwrite the current content of the
    /// terminal. By generating an empty frame instead and then overwriting that frame, we do not
    /// erase any existing content on application startup.
    fn generate_empty_frame(terminal: &mut TuiTerminal<TuiBackend>) {
        print!("{}", "\n".repeat(terminal.get_frame().size().height as usize));
    }

    /// The area of the whole terminal
    pub fn size(&self) -> Result<Rect, Error> {
        Ok(self.tui_terminal.size()?)
    }

    pub fn draw<F>(&mut self, f: F) -> Result<(), Error>
    where
        F: FnOnce(&mut FrameRegion),
    {
        self.tui_terminal.draw(|frame| {
            let region = frame.size();
            f(&mut FrameRegion::new(frame, region));
        })?;

        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if let Err(e) = self.tui_terminal.clear() {
            error!("Error clearing terminal: {}", e);
        }
    }
}

/// A frame, restricted to a rectangular region in which widgets are rendered
pub struct FrameRegion<'a, 'b> {
    frame: &'a mut Frame<'b, TuiBackend>,
    region: Rect,
}

impl<'a, 'b> FrameRegion<'a, 'b> {
    pub fn new(frame: &'a mut Frame<'b, TuiBackend>, region: Rect) -> Self {
        Self { frame, region }
    }

    pub fn region(&self) -> Rect {
        self.region
    }

    /// Restricts the frame to a sub-region
    pub fn with_region(&mut self, region: Rect) -> FrameRegion<'_, 'b> {
        FrameRegion {
            frame: &mut *self.frame,
            region,
        }
    }

    pub fn render_widget<W: Widget>(&mut self, widget: W) {
        self.frame.render_widget(widget, self.region);
    }
}
