use std::sync::Arc;

use crate::assets::frames::FrameSet;
use crate::foundation::core::{Canvas, FRAME_COUNT, FrameIndex};
use crate::foundation::error::ShamebellResult;
use crate::render::layout::centered_rect;
use crate::render::surface::{ImagePaint, PixelBuffer, Surface};

/// One rendered favicon frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconSnapshot {
    /// Frame slot, `0..FRAME_COUNT`.
    pub index: usize,
    /// Rendered pixels.
    pub pixels: PixelBuffer,
    /// PNG encoding of `pixels`.
    pub png: Vec<u8>,
}

/// Renders bell frames centred on the 64x64 favicon surface, caching each slot after first use.
pub struct FaviconRenderer {
    frames: Arc<FrameSet>,
    surface: Surface,
    cache: [Option<Arc<IconSnapshot>>; FRAME_COUNT],
    renders: u64,
}

impl FaviconRenderer {
    /// Acquire the favicon surface.
    pub fn new(frames: Arc<FrameSet>) -> ShamebellResult<Self> {
        Ok(Self {
            frames,
            surface: Surface::new(Canvas::FAVICON)?,
            cache: Default::default(),
            renders: 0,
        })
    }

    /// Number of times the surface was actually drawn (cache misses).
    pub fn renders(&self) -> u64 {
        self.renders
    }

    /// Icon for `idx`, wrapping modulo [`FRAME_COUNT`].
    pub fn render(&mut self, idx: FrameIndex) -> ShamebellResult<Arc<IconSnapshot>> {
        let slot = idx.wrapped();
        if let Some(hit) = &self.cache[slot] {
            return Ok(Arc::clone(hit));
        }

        let frame = self.frames.get(idx);
        let paint = ImagePaint::from_prepared(frame)?;
        self.surface.clear();
        self.surface.draw_image(
            &paint,
            centered_rect(self.surface.canvas(), frame.width, frame.height),
        );
        let pixels = self.surface.snapshot();
        let png = pixels.to_png()?;
        self.renders += 1;

        let snap = Arc::new(IconSnapshot {
            index: slot,
            pixels,
            png,
        });
        self.cache[slot] = Some(Arc::clone(&snap));
        Ok(snap)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/favicon/renderer.rs"]
mod tests;
