//! Renderer: the sink that consumes finished frames.
//!
//! The runner treats the renderer as a single capability: take a panel,
//! produce observable output. What "output" means is up to the
//! implementation — a terminal drawing, a hardware flush, or nothing at
//! all for headless runs.

mod ansi;

pub use ansi::AnsiRenderer;

use crate::panel::Panel;
use std::io;

/// A sink that consumes a [`Panel`] and produces observable output.
///
/// The runner calls [`render`](Renderer::render) once per cycle, after
/// the visual has filled the panel, while still holding the panel lock.
/// Implementations must not retain the panel reference past the call.
pub trait Renderer: Send {
    /// Emit one frame.
    fn render(&mut self, panel: &Panel) -> io::Result<()>;
}

/// A renderer that discards every frame.
///
/// Useful for headless runs and for tests that only exercise the loop.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _panel: &Panel) -> io::Result<()> {
        Ok(())
    }
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn render(&mut self, panel: &Panel) -> io::Result<()> {
        (**self).render(panel)
    }
}
