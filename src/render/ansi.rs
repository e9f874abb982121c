//! `AnsiRenderer`: draws a panel to a truecolor terminal.
//!
//! Each character cell shows two vertically stacked pixels using the
//! upper-half-block glyph: foreground color is the top pixel, background
//! color the bottom one. Output is queued and flushed in a single write
//! per frame to avoid flicker.

use crate::panel::{Panel, Rgb};
use crate::render::Renderer;
use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::QueueableCommand;
use std::io::{self, BufWriter, Stdout, Write};

const HALF_BLOCK: char = '\u{2580}';

/// Renders a panel as colored half-blocks on an ANSI terminal.
pub struct AnsiRenderer<W: Write> {
    out: W,
    /// Top-left character cell of the drawing area.
    origin: (u16, u16),
}

impl AnsiRenderer<BufWriter<Stdout>> {
    /// Renderer drawing to stdout at the top-left corner.
    pub fn stdout() -> Self {
        Self::new(BufWriter::new(io::stdout()))
    }
}

impl<W: Write> AnsiRenderer<W> {
    /// Renderer drawing to `out` at the top-left corner.
    pub const fn new(out: W) -> Self {
        Self { out, origin: (0, 0) }
    }

    /// Move the drawing area to a character-cell offset.
    pub const fn with_origin(mut self, column: u16, row: u16) -> Self {
        self.origin = (column, row);
        self
    }
}

const fn to_term(color: Rgb) -> Color {
    Color::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

impl<W: Write + Send> Renderer for AnsiRenderer<W> {
    fn render(&mut self, panel: &Panel) -> io::Result<()> {
        let (col0, row0) = self.origin;
        // Two panel rows per terminal row.
        for row in 0..panel.height().div_ceil(2) {
            self.out.queue(MoveTo(col0, row0 + row))?;
            let y = row * 2;
            for x in 0..panel.width() {
                let top = panel.get(x, y).unwrap_or(Rgb::BLACK);
                let bottom = panel.get(x, y + 1).unwrap_or(Rgb::BLACK);
                self.out
                    .queue(SetForegroundColor(to_term(top)))?
                    .queue(SetBackgroundColor(to_term(bottom)))?
                    .queue(Print(HALF_BLOCK))?;
            }
            self.out.queue(ResetColor)?;
        }
        self.out.flush()
    }
}
