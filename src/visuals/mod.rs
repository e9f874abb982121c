//! Bundled demo-grade visual effects.
//!
//! These are intentionally small: enough to light a panel and exercise
//! the runner, not a pattern library.

use crate::panel::{Panel, Rgb};
use crate::runner::{Visual, VisualError};
use rand::Rng;

/// Fills the whole panel with one color every frame.
#[derive(Debug, Clone, Copy)]
pub struct Solid {
    color: Rgb,
}

impl Solid {
    /// Solid fill in `color`.
    pub const fn new(color: Rgb) -> Self {
        Self { color }
    }
}

impl Visual for Solid {
    fn fill(&mut self, panel: &mut Panel) -> Result<(), VisualError> {
        panel.fill(self.color);
        Ok(())
    }
}

/// A single lit pixel scanning the panel row by row, wrapping at the end.
#[derive(Debug, Clone, Copy)]
pub struct RunningLight {
    x: u16,
    y: u16,
    previous: (u16, u16),
    color: Rgb,
}

impl RunningLight {
    /// Running light in `color`, starting at the top-left corner.
    pub const fn new(color: Rgb) -> Self {
        Self {
            x: 0,
            y: 0,
            previous: (0, 0),
            color,
        }
    }
}

impl Default for RunningLight {
    fn default() -> Self {
        Self::new(Rgb::WHITE)
    }
}

impl Visual for RunningLight {
    fn init(&mut self, panel: &mut Panel) -> Result<(), VisualError> {
        panel.clear();
        Ok(())
    }

    fn fill(&mut self, panel: &mut Panel) -> Result<(), VisualError> {
        panel.set(self.previous.0, self.previous.1, Rgb::BLACK);
        panel.set(self.x, self.y, self.color);

        self.previous = (self.x, self.y);
        self.x += 1;
        if self.x == panel.width() {
            self.x = 0;
            self.y += 1;
        }
        if self.y == panel.height() {
            self.y = 0;
        }
        Ok(())
    }
}

/// Random pixels lit each frame, everything else dark.
#[derive(Debug, Clone, Copy)]
pub struct Sparkle {
    color: Rgb,
    /// Probability that any given pixel lights up this frame.
    density: f64,
}

impl Sparkle {
    /// Sparkle in `color`; `density` is clamped to `0.0..=1.0`.
    pub fn new(color: Rgb, density: f64) -> Self {
        Self {
            color,
            density: density.clamp(0.0, 1.0),
        }
    }
}

impl Visual for Sparkle {
    fn fill(&mut self, panel: &mut Panel) -> Result<(), VisualError> {
        let mut rng = rand::thread_rng();
        for pixel in panel.pixels_mut() {
            *pixel = if rng.gen_bool(self.density) {
                self.color
            } else {
                Rgb::BLACK
            };
        }
        Ok(())
    }
}
