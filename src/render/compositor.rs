use crate::assets::background::Background;
use crate::assets::frames::FrameSet;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Canvas, FRAME_COUNT, FrameIndex, Rect};
use crate::foundation::error::ShamebellResult;
use crate::render::layout::{BackgroundAxes, background_rect, foreground_origin};
use crate::render::surface::{ImagePaint, PixelBuffer, Surface};

/// Options for [`Compositor`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompositorOpts {
    /// Background width/height mapping.
    pub axes: BackgroundAxes,
}

/// Draws the background and one bell frame per step onto the shared 128x128 export surface.
pub struct Compositor {
    surface: Surface,
    opts: CompositorOpts,
}

impl Compositor {
    /// Acquire the export surface.
    pub fn new(opts: CompositorOpts) -> ShamebellResult<Self> {
        Ok(Self {
            surface: Surface::new(Canvas::EXPORT)?,
            opts,
        })
    }

    /// Export canvas dimensions.
    pub fn canvas(&self) -> Canvas {
        self.surface.canvas()
    }

    /// Composite a single frame.
    pub fn render_frame(
        &mut self,
        frames: &FrameSet,
        background: Option<&Background>,
        idx: FrameIndex,
    ) -> ShamebellResult<PixelBuffer> {
        let bg = prepare_background(self.canvas(), background, self.opts.axes)?;
        let fg = ImagePaint::from_prepared(frames.get(idx))?;
        Ok(self.draw(bg.as_ref(), &fg))
    }

    /// Run one composite pass: all four frames, in index order, into `sink`.
    ///
    /// Every pass starts from a cleared surface and pushes exactly [`FRAME_COUNT`] frames.
    #[tracing::instrument(skip_all, fields(background = background.is_some()))]
    pub fn composite_pass(
        &mut self,
        frames: &FrameSet,
        background: Option<&Background>,
        sink: &mut dyn FrameSink,
    ) -> ShamebellResult<()> {
        let canvas = self.canvas();
        let bg = prepare_background(canvas, background, self.opts.axes)?;

        sink.begin(SinkConfig {
            width: canvas.width,
            height: canvas.height,
            frame_count: FRAME_COUNT,
        })?;
        for i in 0..FRAME_COUNT as u64 {
            let idx = FrameIndex(i);
            let fg = ImagePaint::from_prepared(frames.get(idx))?;
            let buf = self.draw(bg.as_ref(), &fg);
            sink.push_frame(idx, &buf)?;
        }
        sink.end()?;

        tracing::debug!(frames = FRAME_COUNT, "composite pass finished");
        Ok(())
    }

    fn draw(&mut self, bg: Option<&(ImagePaint, Rect)>, fg: &ImagePaint) -> PixelBuffer {
        let canvas = self.canvas();
        self.surface.clear();
        if let Some((paint, rect)) = bg {
            self.surface.draw_image(paint, *rect);
        }
        let o = foreground_origin(canvas);
        self.surface.draw_image(
            fg,
            Rect::new(o.x, o.y, o.x + f64::from(fg.w), o.y + f64::from(fg.h)),
        );
        self.surface.snapshot()
    }
}

fn prepare_background(
    canvas: Canvas,
    background: Option<&Background>,
    axes: BackgroundAxes,
) -> ShamebellResult<Option<(ImagePaint, Rect)>> {
    let Some(bg) = background else {
        return Ok(None);
    };
    let rect = background_rect(canvas, bg.width(), bg.height(), axes);

    // The drawn rect never exceeds the canvas; larger sources are resampled down to it first.
    let w = (rect.width().ceil() as u32).max(1);
    let h = (rect.height().ceil() as u32).max(1);
    let img = bg.image();
    let paint = if img.width > w || img.height > h {
        ImagePaint::from_prepared(&img.resized(w, h)?)?
    } else {
        ImagePaint::from_prepared(img)?
    };
    Ok(Some((paint, rect)))
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
