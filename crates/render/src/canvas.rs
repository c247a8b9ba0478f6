//! In-memory RGBA pixel canvas.

/// One RGBA pixel, laid out so a pixel slice casts straight to bytes.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    pub const WHITE: Self = Self::new(255, 255, 255, 255);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Row-major pixel buffer of `width × height` cells.
pub struct Canvas {
    width: u32,
    height: u32,
    background: Rgba8,
    pixels: Vec<Rgba8>,
}

impl Canvas {
    /// Allocate a canvas filled with `background`.
    #[must_use]
    pub fn new(width: u32, height: u32, background: Rgba8) -> Self {
        let len = width as usize * height as usize;
        tracing::debug!(width, height, "allocating canvas");
        Self {
            width,
            height,
            background,
            pixels: vec![background; len],
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel coordinate of the canvas centre.
    #[must_use]
    pub fn center(&self) -> (f32, f32) {
        (self.width as f32 / 2.0, self.height as f32 / 2.0)
    }

    #[must_use]
    pub fn background(&self) -> Rgba8 {
        self.background
    }

    /// Reset every pixel to the background colour.
    pub fn clear(&mut self) {
        self.pixels.fill(self.background);
    }

    /// Paint a `size × size` square anchored at `(x, y)`.
    ///
    /// Returns `false` without touching the buffer when the anchor lies
    /// outside the canvas (including NaN coordinates). Cells straddling the
    /// right or bottom edge are clipped.
    pub fn fill_cell(&mut self, x: f32, y: f32, size: u32, colour: Rgba8) -> bool {
        let inside = x >= 0.0 && y >= 0.0 && x < self.width as f32 && y < self.height as f32;
        if !inside {
            return false;
        }
        let width = self.width as usize;
        let x0 = (x as usize).min(width - 1);
        let y0 = (y as usize).min(self.height as usize - 1);
        let x1 = (x0 + size as usize).min(width);
        let y1 = (y0 + size as usize).min(self.height as usize);
        for row in y0..y1 {
            self.pixels[row * width + x0..row * width + x1].fill(colour);
        }
        true
    }

    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y as usize * self.width as usize + x as usize])
    }

    #[must_use]
    pub fn pixels(&self) -> &[Rgba8] {
        &self.pixels
    }

    /// Number of pixels that differ from the background.
    #[must_use]
    pub fn painted_pixels(&self) -> usize {
        self.pixels.iter().filter(|p| **p != self.background).count()
    }

    /// Raw RGBA bytes, row-major.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_cell_paints_a_square() {
        let mut canvas = Canvas::new(8, 6, Rgba8::TRANSPARENT);
        assert!(canvas.fill_cell(2.7, 3.1, 2, Rgba8::WHITE));
        assert_eq!(canvas.painted_pixels(), 4);
        for (x, y) in [(2, 3), (3, 3), (2, 4), (3, 4)] {
            assert_eq!(canvas.pixel(x, y), Some(Rgba8::WHITE));
        }
        assert_eq!(canvas.pixel(4, 3), Some(Rgba8::TRANSPARENT));
    }

    #[test]
    fn off_canvas_anchors_are_dropped() {
        let mut canvas = Canvas::new(8, 6, Rgba8::TRANSPARENT);
        for (x, y) in [(-0.5, 1.0), (1.0, -3.0), (8.0, 1.0), (1.0, 6.0), (f32::NAN, 1.0)] {
            assert!(!canvas.fill_cell(x, y, 2, Rgba8::WHITE), "({x}, {y})");
        }
        assert_eq!(canvas.painted_pixels(), 0);
    }

    #[test]
    fn edge_cells_are_clipped() {
        let mut canvas = Canvas::new(8, 6, Rgba8::BLACK);
        assert!(canvas.fill_cell(7.5, 5.5, 2, Rgba8::WHITE));
        assert_eq!(canvas.painted_pixels(), 1);
        assert_eq!(canvas.pixel(7, 5), Some(Rgba8::WHITE));
    }

    #[test]
    fn clear_restores_background() {
        let mut canvas = Canvas::new(4, 4, Rgba8::BLACK);
        canvas.fill_cell(0.0, 0.0, 4, Rgba8::WHITE);
        assert_eq!(canvas.painted_pixels(), 16);
        canvas.clear();
        assert_eq!(canvas.painted_pixels(), 0);
    }

    #[test]
    fn bytes_are_rgba_row_major() {
        let mut canvas = Canvas::new(2, 1, Rgba8::TRANSPARENT);
        canvas.fill_cell(1.0, 0.0, 1, Rgba8::new(1, 2, 3, 4));
        assert_eq!(canvas.as_bytes(), &[0, 0, 0, 0, 1, 2, 3, 4]);
    }
}
