use ::gif::{DisposalMethod, Encoder, Frame, Repeat};

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ShamebellError, ShamebellResult};
use crate::render::surface::PixelBuffer;

/// Options for [`GifSink`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GifSinkOpts {
    /// Delay between frames in milliseconds. GIF stores hundredths of a second, so this is rounded
    /// to the nearest 10 ms.
    pub frame_delay_ms: u32,
    /// NeuQuant sampling speed, 1 (best) to 30 (fastest).
    pub quantize_speed: i32,
    /// Pixels with alpha below this become fully transparent, all others fully opaque.
    pub alpha_threshold: u8,
}

impl Default for GifSinkOpts {
    fn default() -> Self {
        Self {
            frame_delay_ms: 100,
            quantize_speed: 10,
            alpha_threshold: 128,
        }
    }
}

impl GifSinkOpts {
    /// Check every option is in range.
    pub fn validate(&self) -> ShamebellResult<()> {
        if !(10..=655_350).contains(&self.frame_delay_ms) {
            return Err(ShamebellError::validation(
                "frame_delay_ms must be within 10..=655350",
            ));
        }
        if !(1..=30).contains(&self.quantize_speed) {
            return Err(ShamebellError::validation(
                "quantize_speed must be within 1..=30",
            ));
        }
        if self.alpha_threshold == 0 {
            return Err(ShamebellError::validation("alpha_threshold must be > 0"));
        }
        Ok(())
    }

    /// Frame delay in GIF units (1/100 s).
    pub fn delay_centis(&self) -> u16 {
        ((self.frame_delay_ms + 5) / 10).clamp(1, u32::from(u16::MAX)) as u16
    }
}

/// Sink that palette-quantizes every frame and packs them into a looping GIF in memory.
///
/// Each frame gets its own palette of at most 256 colours, with one index reserved for
/// transparency whenever the frame has transparent pixels.
pub struct GifSink {
    opts: GifSinkOpts,

    encoder: Option<Encoder<Vec<u8>>>,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
    pushed: usize,
    scratch: Vec<u8>,
    finished: Option<Vec<u8>>,
}

impl GifSink {
    /// Create a new sink.
    pub fn new(opts: GifSinkOpts) -> Self {
        Self {
            opts,
            encoder: None,
            cfg: None,
            last_idx: None,
            pushed: 0,
            scratch: Vec::new(),
            finished: None,
        }
    }

    /// Options this sink encodes with.
    pub fn opts(&self) -> GifSinkOpts {
        self.opts
    }

    /// Take the finished GIF stream. Only available after `end`.
    pub fn into_bytes(self) -> ShamebellResult<Vec<u8>> {
        self.finished
            .ok_or_else(|| ShamebellError::encode("gif sink has not been finished"))
    }
}

impl FrameSink for GifSink {
    fn begin(&mut self, cfg: SinkConfig) -> ShamebellResult<()> {
        self.opts.validate()?;
        let w: u16 = cfg
            .width
            .try_into()
            .map_err(|_| ShamebellError::validation("gif width exceeds u16"))?;
        let h: u16 = cfg
            .height
            .try_into()
            .map_err(|_| ShamebellError::validation("gif height exceeds u16"))?;
        if w == 0 || h == 0 {
            return Err(ShamebellError::validation(
                "gif sink width/height must be non-zero",
            ));
        }
        if cfg.frame_count == 0 {
            return Err(ShamebellError::validation(
                "gif sink needs at least one frame",
            ));
        }

        let mut encoder = Encoder::new(Vec::new(), w, h, &[])
            .map_err(|e| ShamebellError::encode(format!("failed to start gif stream: {e}")))?;
        encoder
            .set_repeat(Repeat::Infinite)
            .map_err(|e| ShamebellError::encode(format!("failed to set gif loop: {e}")))?;

        self.scratch = vec![0u8; (cfg.width as usize) * (cfg.height as usize) * 4];
        self.encoder = Some(encoder);
        self.cfg = Some(cfg);
        self.last_idx = None;
        self.pushed = 0;
        self.finished = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &PixelBuffer) -> ShamebellResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| ShamebellError::encode("gif sink not started"))?;
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(ShamebellError::encode(
                "gif sink received out-of-order frame index",
            ));
        }
        if self.pushed >= cfg.frame_count {
            return Err(ShamebellError::encode(format!(
                "gif sink expected {} frames, got more",
                cfg.frame_count
            )));
        }
        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(ShamebellError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        if frame.data.len() != self.scratch.len() {
            return Err(ShamebellError::validation(
                "frame.data size mismatch with width*height*4",
            ));
        }
        let Some(encoder) = self.encoder.as_mut() else {
            return Err(ShamebellError::encode("gif sink is already finalized"));
        };

        threshold_alpha(&mut self.scratch, &frame.data, self.opts.alpha_threshold);
        let mut gif_frame = Frame::from_rgba_speed(
            cfg.width as u16,
            cfg.height as u16,
            &mut self.scratch,
            self.opts.quantize_speed,
        );
        gif_frame.delay = self.opts.delay_centis();
        gif_frame.dispose = DisposalMethod::Background;

        encoder
            .write_frame(&gif_frame)
            .map_err(|e| ShamebellError::encode(format!("failed to write gif frame: {e}")))?;
        self.last_idx = Some(idx);
        self.pushed += 1;
        Ok(())
    }

    fn end(&mut self) -> ShamebellResult<()> {
        let cfg = self
            .cfg
            .take()
            .ok_or_else(|| ShamebellError::encode("gif sink not started"))?;
        let encoder = self
            .encoder
            .take()
            .ok_or_else(|| ShamebellError::encode("gif sink not started"))?;
        if self.pushed != cfg.frame_count {
            return Err(ShamebellError::encode(format!(
                "gif sink expected {} frames, got {}",
                cfg.frame_count, self.pushed
            )));
        }

        let bytes = encoder
            .into_inner()
            .map_err(|e| ShamebellError::encode(format!("failed to finish gif stream: {e}")))?;
        tracing::debug!(bytes = bytes.len(), frames = self.pushed, "gif finished");
        self.finished = Some(bytes);
        Ok(())
    }
}

/// One-bit alpha: copy `src` into `dst`, snapping every pixel to fully opaque or fully
/// transparent black.
fn threshold_alpha(dst: &mut [u8], src: &[u8], threshold: u8) {
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        if s[3] >= threshold {
            d[..3].copy_from_slice(&s[..3]);
            d[3] = 255;
        } else {
            d.copy_from_slice(&[0, 0, 0, 0]);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
