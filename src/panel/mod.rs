//! Panel: A grid of RGB pixels representing the visualization surface.
//!
//! The panel uses contiguous memory allocation for cache efficiency.
//! Pixels are stored in row-major order.

mod pixel;

pub use pixel::Rgb;

/// A grid of RGB pixels representing the visualization surface.
///
/// Pixels are stored in a contiguous `Vec` in row-major order:
/// `index = y * width + x`. The panel carries no hardware mapping;
/// translating coordinates to a physical strip layout is the
/// renderer's business.
#[derive(Clone)]
pub struct Panel {
    /// Contiguous pixel storage (row-major order).
    pixels: Vec<Rgb>,
    /// Panel width in pixels.
    width: u16,
    /// Panel height in pixels.
    height: u16,
}

impl Panel {
    /// Create a new panel with the given dimensions, all pixels unlit.
    ///
    /// # Panics
    /// Panics if width or height is 0.
    pub fn new(width: u16, height: u16) -> Self {
        assert!(width > 0 && height > 0, "Panel dimensions must be non-zero");
        let size = (width as usize) * (height as usize);
        Self {
            pixels: vec![Rgb::BLACK; size],
            width,
            height,
        }
    }

    /// Get the panel width.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Get the panel height.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Get the total number of pixels.
    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Check if the panel is empty (never true after construction).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Convert (x, y) coordinates to a linear index.
    ///
    /// Returns `None` if coordinates are out of bounds.
    #[inline]
    pub fn index_of(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some((y as usize) * (self.width as usize) + (x as usize))
        } else {
            None
        }
    }

    /// Get the pixel at (x, y), or `None` if out of bounds.
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<Rgb> {
        self.index_of(x, y).map(|i| self.pixels[i])
    }

    /// Set the pixel at (x, y). Out-of-bounds writes are ignored.
    #[inline]
    pub fn set(&mut self, x: u16, y: u16, color: Rgb) {
        if let Some(i) = self.index_of(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Fill the entire panel with one color.
    pub fn fill(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    /// Turn every pixel off.
    pub fn clear(&mut self) {
        self.fill(Rgb::BLACK);
    }

    /// Get a reference to the underlying pixel slice (row-major).
    #[inline]
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Get a mutable reference to the underlying pixel slice (row-major).
    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [Rgb] {
        &mut self.pixels
    }
}

impl std::fmt::Debug for Panel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Panel")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}
