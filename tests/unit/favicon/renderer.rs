use crate::assets::frames::{FrameLoader, FrameSource};
use crate::assets::store::PreparedImage;

use super::*;

fn solid_frames() -> Arc<FrameSet> {
    let colors = [
        [255u8, 0, 0, 255],
        [0, 255, 0, 255],
        [0, 0, 255, 255],
        [255, 255, 0, 255],
    ];
    Arc::new(FrameSet::from_images(colors.map(|c| {
        PreparedImage::from_straight_rgba8(8, 8, c.repeat(64)).unwrap()
    })))
}

#[test]
fn index_four_renders_like_index_zero() {
    let mut r = FaviconRenderer::new(solid_frames()).unwrap();
    let a = r.render(FrameIndex(0)).unwrap();
    let b = r.render(FrameIndex(4)).unwrap();
    assert_eq!(a, b);
    assert_eq!(b.index, 0);
}

#[test]
fn cache_avoids_redraws_across_cycles() {
    let mut r = FaviconRenderer::new(solid_frames()).unwrap();
    for i in 0..12 {
        r.render(FrameIndex(i)).unwrap();
    }
    assert_eq!(r.renders(), FRAME_COUNT as u64);
}

#[test]
fn frame_is_centered_on_favicon_canvas() {
    let mut r = FaviconRenderer::new(solid_frames()).unwrap();
    let icon = r.render(FrameIndex(2)).unwrap();
    assert_eq!((icon.pixels.width, icon.pixels.height), (64, 64));
    // 8x8 frame centred: 28..36.
    assert_eq!(icon.pixels.pixel(32, 32), [0, 0, 255, 255]);
    assert_eq!(icon.pixels.pixel(27, 32)[3], 0);
    assert_eq!(icon.pixels.pixel(36, 32)[3], 0);
}

#[test]
fn png_matches_pixels() {
    let frames = Arc::new(FrameLoader::new().load(&FrameSource::Bundled).unwrap());
    let mut r = FaviconRenderer::new(frames).unwrap();
    let icon = r.render(FrameIndex(1)).unwrap();
    let decoded = image::load_from_memory(&icon.png).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (64, 64));
    assert_eq!(decoded.into_raw(), icon.pixels.data);
}
