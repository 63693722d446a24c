/// A value handed to a [`BinaryDisplay`](crate::display::BinaryDisplay) does not fit in a byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("The number must be between 0-255, got {value}")]
pub struct OutOfRange {
    pub value: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Cell size must be at least 1px")]
    InvalidSize,

    #[error("Cell spacing must not be negative")]
    InvalidSpacing,

    #[error("A {width}x{height} surface exceeds the {max}px limit")]
    SurfaceTooLarge { width: f64, height: f64, max: u32 },

    #[error("Failed to create window")]
    Window(#[from] winit::error::OsError),

    #[error("Framebuffer error")]
    Pixels(#[from] pixels::Error),
}
