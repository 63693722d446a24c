use crate::canvas::{Canvas, FrameCanvas};

pub struct FrameRenderer;

impl FrameRenderer {
    /// Copies `canvas` into an RGBA frame of the same dimensions.
    pub fn draw(&self, canvas: &FrameCanvas, output_frame: &mut [u8]) {
        debug_assert_eq!(
            output_frame.len(),
            canvas.width() as usize * canvas.height() as usize * 4
        );
        for (pixel, color) in output_frame.chunks_exact_mut(4).zip(canvas.pixels()) {
            pixel.copy_from_slice(color.as_bytes());
        }
    }
}
