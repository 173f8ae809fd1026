use crate::foundation::core::FrameIndex;
use crate::foundation::error::ShamebellResult;
use crate::render::surface::PixelBuffer;

/// Configuration provided to a [`FrameSink`] at the start of a composite pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Number of frames the pass will push.
    pub frame_count: usize,
}

/// Sink contract for consuming composited frames in playback order.
///
/// Ordering contract: `push_frame` is called in strictly increasing `FrameIndex` order, exactly
/// `SinkConfig::frame_count` times between `begin` and `end`.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> ShamebellResult<()>;
    /// Push one frame in strictly increasing index order.
    fn push_frame(&mut self, idx: FrameIndex, frame: &PixelBuffer) -> ShamebellResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> ShamebellResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, PixelBuffer)>,
    ended: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(FrameIndex, PixelBuffer)] {
        &self.frames
    }

    /// `true` once `end` has been called for the current pass.
    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> ShamebellResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &PixelBuffer) -> ShamebellResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> ShamebellResult<()> {
        self.ended = true;
        Ok(())
    }
}
