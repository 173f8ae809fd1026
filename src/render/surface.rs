use std::io::Cursor;
use std::sync::Arc;

use crate::assets::store::PreparedImage;
use crate::foundation::core::{Affine, Canvas, Rect};
use crate::foundation::error::{ShamebellError, ShamebellResult};
use crate::foundation::math::unpremultiply_rgba8;

/// Snapshot of a surface as straight-alpha RGBA8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major, straight alpha.
    pub data: Vec<u8>,
}

impl PixelBuffer {
    /// Read one pixel. Panics when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        assert!(x < self.width && y < self.height, "pixel ({x},{y}) out of bounds");
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Encode as PNG bytes.
    pub fn to_png(&self) -> ShamebellResult<Vec<u8>> {
        let img = image::RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| ShamebellError::encode("pixel buffer does not match its dimensions"))?;
        let mut out = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
            .map_err(|e| ShamebellError::encode(format!("png encode: {e}")))?;
        Ok(out)
    }
}

/// A frame or background image ready to be used as a `vello_cpu` paint.
#[derive(Clone)]
pub(crate) struct ImagePaint {
    paint: vello_cpu::Image,
    pub(crate) w: u32,
    pub(crate) h: u32,
}

impl ImagePaint {
    pub(crate) fn from_prepared(img: &PreparedImage) -> ShamebellResult<Self> {
        let pixmap = pixmap_from_premul_bytes(&img.rgba8_premul, img.width, img.height)?;
        Ok(Self {
            paint: vello_cpu::Image {
                image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
                sampler: vello_cpu::peniko::ImageSampler::default(),
            },
            w: img.width,
            h: img.height,
        })
    }
}

/// Fixed-size off-screen drawing surface, reused across frames.
pub struct Surface {
    canvas: Canvas,
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
}

impl Surface {
    /// Acquire a surface of the given size.
    pub fn new(canvas: Canvas) -> ShamebellResult<Self> {
        let w: u16 = canvas
            .width
            .try_into()
            .map_err(|_| ShamebellError::surface("surface width exceeds u16"))?;
        let h: u16 = canvas
            .height
            .try_into()
            .map_err(|_| ShamebellError::surface("surface height exceeds u16"))?;
        if w == 0 || h == 0 {
            return Err(ShamebellError::surface(format!(
                "cannot create a {w}x{h} drawing surface"
            )));
        }
        Ok(Self {
            canvas,
            ctx: vello_cpu::RenderContext::new(w, h),
            pixmap: vello_cpu::Pixmap::new(w, h),
        })
    }

    /// Surface dimensions.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Discard everything drawn since the last clear.
    pub fn clear(&mut self) {
        self.ctx.reset();
    }

    /// Draw `img` stretched into `dst`.
    pub(crate) fn draw_image(&mut self, img: &ImagePaint, dst: Rect) {
        if img.w == 0 || img.h == 0 || dst.width() <= 0.0 || dst.height() <= 0.0 {
            return;
        }
        let sx = dst.width() / f64::from(img.w);
        let sy = dst.height() / f64::from(img.h);
        let tr = Affine::translate((dst.x0, dst.y0)) * Affine::scale_non_uniform(sx, sy);

        self.ctx.set_transform(affine_to_cpu(tr));
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(img.paint.clone());
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(img.w),
            f64::from(img.h),
        ));
    }

    /// Rasterize everything drawn so far and read back the full surface.
    pub fn snapshot(&mut self) -> PixelBuffer {
        self.pixmap.data_as_u8_slice_mut().fill(0);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.pixmap);

        let mut data = vec![0u8; self.canvas.rgba_len()];
        unpremultiply_rgba8(&mut data, self.pixmap.data_as_u8_slice());
        PixelBuffer {
            width: self.canvas.width,
            height: self.canvas.height,
            data,
        }
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> ShamebellResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| ShamebellError::surface("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ShamebellError::surface("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(ShamebellError::surface("pixmap byte len mismatch"));
    }
    // Pixmap stores PremulRgba8; our bytes are already premultiplied.
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    let may_have_opacities = bytes.chunks_exact(4).any(|px| px[3] != 255);
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
