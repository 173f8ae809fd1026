use crate::foundation::error::{ShamebellError, ShamebellResult};

pub use kurbo::{Affine, Rect, Vec2};

/// Number of bell frames in every animation: one export pass and one favicon cycle.
pub const FRAME_COUNT: usize = 4;

/// 0-based index of a bell frame.
///
/// Any value is accepted; consumers that address the four frames go through [`FrameIndex::wrapped`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameIndex(pub u64);

impl FrameIndex {
    /// Slot in `0..FRAME_COUNT` this index refers to.
    pub fn wrapped(self) -> usize {
        (self.0 % FRAME_COUNT as u64) as usize
    }

    /// Next index in playback order.
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Drawing surface dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// The exported GIF canvas.
    pub const EXPORT: Canvas = Canvas {
        width: 128,
        height: 128,
    };

    /// The favicon canvas.
    pub const FAVICON: Canvas = Canvas {
        width: 64,
        height: 64,
    };

    /// Create a validated canvas. Both sides must fit a `u16` raster target.
    pub fn new(width: u32, height: u32) -> ShamebellResult<Self> {
        if width == 0 || height == 0 {
            return Err(ShamebellError::validation("canvas width/height must be > 0"));
        }
        if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
            return Err(ShamebellError::validation(format!(
                "canvas {width}x{height} exceeds the u16 raster limit"
            )));
        }
        Ok(Self { width, height })
    }

    /// Byte length of a tightly packed RGBA8 buffer covering this canvas.
    pub fn rgba_len(self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4)
    }

    /// Full canvas extent as a rectangle.
    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
