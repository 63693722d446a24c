//! A byte rendered as a 2x4 grid of cells.
//!
//! Bits are laid out column-major, most significant first: bits 0-3 fill the
//! left column top to bottom, bits 4-7 the right column.

use log::error;

use crate::canvas::Canvas;
use crate::color::Color;
use crate::error::OutOfRange;

pub struct BinaryDisplay {
    value: Option<u8>,
    bit_pattern: Option<String>,
    size: f64,
    spacing: f64,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    on_color: Color,
    off_color: Color,
}

impl BinaryDisplay {
    pub const ROWS: usize = 4;
    pub const DEFAULT_SIZE: f64 = 10.0;
    pub const DEFAULT_SPACING: f64 = 2.0;

    /// Creates a display at grid position (`pos_x`, `pos_y`).
    ///
    /// Grid units are one display plus one spacing wide, so displays at
    /// consecutive integer positions tile without touching. An out-of-range
    /// `value` is logged and leaves the display without a value.
    pub fn new(value: i64, pos_x: f64, pos_y: f64, size: f64, spacing: f64) -> Self {
        let unit = 2.0 * spacing + 2.0 * size;
        let mut display = Self {
            value: None,
            bit_pattern: None,
            size,
            spacing,
            x: unit * pos_x,
            y: unit * pos_y,
            width: 2.0 * size + spacing,
            height: 4.0 * size + 3.0 * spacing,
            on_color: Color::ON,
            off_color: Color::OFF,
        };
        if let Err(e) = display.set_value(value) {
            error!("Invalid input! {}", e);
        }
        display
    }

    pub fn bit_pattern(&self) -> Option<&str> {
        self.bit_pattern.as_deref()
    }

    /// Absolute pixel origin of the grid.
    pub fn origin(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Pixel extents of the full grid.
    pub fn bounding_size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Stores `n` and regenerates the bit pattern. On error nothing changes.
    pub fn set_value(&mut self, n: i64) -> Result<(), OutOfRange> {
        let value = u8::try_from(n).map_err(|_| OutOfRange { value: n })?;
        self.value = Some(value);
        self.bit_pattern = Some(format!("{:08b}", value));
        Ok(())
    }

    /// Top-left pixel of the cell showing bit `i` (0 = most significant).
    pub fn cell_origin(&self, i: usize) -> (f64, f64) {
        let row = (i % Self::ROWS) as f64;
        let col = (i / Self::ROWS) as f64;
        let step = self.spacing + self.size;
        (step * col + self.x, step * row + self.y)
    }

    /// Draws all eight cells. Draws nothing if no value was ever accepted.
    pub fn render_cells(&self, canvas: &mut dyn Canvas) {
        let pattern = match self.bit_pattern() {
            Some(pattern) => pattern,
            None => return,
        };

        for (i, bit) in pattern.chars().enumerate() {
            let color = if bit == '1' {
                self.on_color
            } else {
                self.off_color
            };
            let (x, y) = self.cell_origin(i);
            canvas.fill_rect(x, y, self.size, self.size, color);
        }
    }

    /// Sets the value and redraws. Bad values are logged and the previous
    /// value is drawn again.
    pub fn update(&mut self, new_value: i64, canvas: &mut dyn Canvas) {
        if let Err(e) = self.set_value(new_value) {
            error!("Invalid input! {}", e);
        }
        self.render_cells(canvas);
    }

    /// Blanks the whole canvas.
    pub fn clear_surface(canvas: &mut dyn Canvas) {
        let (width, height) = (canvas.width() as f64, canvas.height() as f64);
        canvas.clear_rect(0.0, 0.0, width, height);
    }
}

impl Default for BinaryDisplay {
    fn default() -> Self {
        Self::new(0, 0.0, 0.0, Self::DEFAULT_SIZE, Self::DEFAULT_SPACING)
    }
}

#[cfg(test)]
impl BinaryDisplay {
    pub fn value(&self) -> Option<u8> {
        self.value
    }
}
