/// An RGBA color, laid out the way the framebuffer stores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub [u8; 4]);

impl Color {
    /// Fill for a set bit (`#00f`).
    pub const ON: Color = Color([0x00, 0x00, 0xFF, 0xFF]);
    /// Fill for a cleared bit (`#bbf`).
    pub const OFF: Color = Color([0xBB, 0xBB, 0xFF, 0xFF]);
    /// What a cleared region of the canvas holds.
    pub const BACKGROUND: Color = Color([0x00, 0x00, 0x00, 0x00]);

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}
