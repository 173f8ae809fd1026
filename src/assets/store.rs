use std::sync::Arc;

use image::imageops::FilterType;

use crate::foundation::error::{ShamebellError, ShamebellResult};
use crate::foundation::math::premultiply_rgba8_in_place;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Decoded raster image in premultiplied RGBA8 form.
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    /// Build from straight-alpha RGBA8 pixels.
    pub fn from_straight_rgba8(width: u32, height: u32, mut rgba: Vec<u8>) -> ShamebellResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| ShamebellError::validation("image size overflow"))?;
        if rgba.len() != expected {
            return Err(ShamebellError::validation(format!(
                "rgba byte len {} does not match {width}x{height}",
                rgba.len()
            )));
        }
        premultiply_rgba8_in_place(&mut rgba);
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba),
        })
    }

    /// Resample to `width` x `height`. Filtering runs on the premultiplied bytes.
    pub fn resized(&self, width: u32, height: u32) -> ShamebellResult<Self> {
        if width == 0 || height == 0 {
            return Err(ShamebellError::validation("resize target must be non-zero"));
        }
        let src = image::ImageBuffer::<image::Rgba<u8>, &[u8]>::from_raw(
            self.width,
            self.height,
            self.rgba8_premul.as_slice(),
        )
        .ok_or_else(|| ShamebellError::validation("image byte len does not match its size"))?;
        let out = image::imageops::resize(&src, width, height, FilterType::Triangle);
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(out.into_raw()),
        })
    }
}

/// Decode any natively supported image format into a [`PreparedImage`].
pub fn decode_image(bytes: &[u8]) -> ShamebellResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| ShamebellError::decode(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(ShamebellError::decode("image has zero width or height"));
    }
    PreparedImage::from_straight_rgba8(width, height, rgba.into_raw())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
