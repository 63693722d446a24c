use std::ops::Range;

use crate::color::Color;

/// A 2D surface the clock draws onto.
///
/// Coordinates are in pixels and may be fractional; implementations decide how
/// to rasterize them.
pub trait Canvas {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Reallocates the surface. Every pixel is blank afterwards.
    fn set_size(&mut self, width: u32, height: u32);

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color);
    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64);
}

/// An in-memory RGBA raster.
pub struct FrameCanvas {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl FrameCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::BACKGROUND; width as usize * height as usize],
        }
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    fn paint(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color) {
        let columns = span(x, w, self.width);
        let width = self.width as usize;
        for row in span(y, h, self.height) {
            let line = row * width;
            for pixel in &mut self.pixels[line + columns.start..line + columns.end] {
                *pixel = color;
            }
        }
    }
}

impl Canvas for FrameCanvas {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels
            .resize(width as usize * height as usize, Color::BACKGROUND);
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color) {
        self.paint(x, y, w, h, color);
    }

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.paint(x, y, w, h, Color::BACKGROUND);
    }
}

// Pixel indices covered by `[start, start + len)`, edges rounded to the
// nearest pixel and clipped to `[0, limit)`.
fn span(start: f64, len: f64, limit: u32) -> Range<usize> {
    let clip = |edge: f64| edge.round().clamp(0.0, limit as f64) as usize;
    let lo = clip(start);
    let hi = clip(start + len);
    lo..hi.max(lo)
}

#[cfg(test)]
impl FrameCanvas {
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x < self.width && y < self.height {
            Some(self.pixels[(y * self.width + x) as usize])
        } else {
            None
        }
    }
}
