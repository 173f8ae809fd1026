use crate::assets::store::PreparedImage;
use crate::encode::sink::InMemorySink;

use super::*;

const COLORS: [[u8; 4]; FRAME_COUNT] = [
    [255, 0, 0, 255],
    [0, 255, 0, 255],
    [0, 0, 255, 255],
    [255, 255, 0, 255],
];

fn solid(w: u32, h: u32, rgba: [u8; 4]) -> PreparedImage {
    PreparedImage::from_straight_rgba8(w, h, rgba.repeat((w * h) as usize)).unwrap()
}

fn frames() -> FrameSet {
    FrameSet::from_images(COLORS.map(|c| solid(10, 10, c)))
}

fn gray_bg(w: u32, h: u32) -> Background {
    Background::from_image(solid(w, h, [128, 128, 128, 255]))
}

fn close(a: [u8; 4], b: [u8; 4]) -> bool {
    a.iter()
        .zip(b.iter())
        .all(|(x, y)| (i16::from(*x) - i16::from(*y)).abs() <= 2)
}

#[test]
fn pass_pushes_four_frames_in_order() {
    let mut c = Compositor::new(CompositorOpts::default()).unwrap();
    let mut sink = InMemorySink::new();
    c.composite_pass(&frames(), None, &mut sink).unwrap();

    assert_eq!(
        sink.config(),
        Some(SinkConfig {
            width: 128,
            height: 128,
            frame_count: 4
        })
    );
    assert!(sink.is_ended());
    let idx: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(idx, vec![0, 1, 2, 3]);
    for (_, f) in sink.frames() {
        assert_eq!((f.width, f.height), (128, 128));
        assert_eq!(f.data.len(), 128 * 128 * 4);
    }
}

#[test]
fn each_frame_shows_its_own_foreground() {
    let mut c = Compositor::new(CompositorOpts::default()).unwrap();
    let mut sink = InMemorySink::new();
    let bg = gray_bg(200, 200);
    c.composite_pass(&frames(), Some(&bg), &mut sink).unwrap();

    for (i, (_, f)) in sink.frames().iter().enumerate() {
        assert!(close(f.pixel(10, 10), COLORS[i]), "frame {i}: {:?}", f.pixel(10, 10));
    }
}

#[test]
fn pass_is_deterministic() {
    let mut c = Compositor::new(CompositorOpts::default()).unwrap();
    let bg = gray_bg(200, 200);
    let set = frames();

    let mut a = InMemorySink::new();
    c.composite_pass(&set, Some(&bg), &mut a).unwrap();
    let mut b = InMemorySink::new();
    c.composite_pass(&set, Some(&bg), &mut b).unwrap();

    let mut fresh = Compositor::new(CompositorOpts::default()).unwrap();
    let mut d = InMemorySink::new();
    fresh.composite_pass(&set, Some(&bg), &mut d).unwrap();

    assert_eq!(a.frames(), b.frames());
    assert_eq!(a.frames(), d.frames());
}

#[test]
fn without_background_only_the_foreground_is_drawn() {
    let mut c = Compositor::new(CompositorOpts::default()).unwrap();
    let mut sink = InMemorySink::new();
    c.composite_pass(&frames(), None, &mut sink).unwrap();

    for (i, (_, f)) in sink.frames().iter().enumerate() {
        assert!(close(f.pixel(10, 10), COLORS[i]));
        assert_eq!(f.pixel(2, 2)[3], 0);
        assert_eq!(f.pixel(64, 64)[3], 0);
        assert_eq!(f.pixel(127, 127)[3], 0);
    }
}

#[test]
fn large_background_is_inset() {
    let mut c = Compositor::new(CompositorOpts::default()).unwrap();
    let bg = gray_bg(200, 200);
    let f = c.render_frame(&frames(), Some(&bg), FrameIndex(0)).unwrap();

    assert!(close(f.pixel(64, 64), [128, 128, 128, 255]));
    assert!(close(f.pixel(20, 100), [128, 128, 128, 255]));
    assert_eq!(f.pixel(2, 2)[3], 0);
    assert_eq!(f.pixel(120, 120)[3], 0);
    assert_eq!(f.pixel(64, 5)[3], 0);
}

#[test]
fn small_background_is_centered() {
    let mut c = Compositor::new(CompositorOpts::default()).unwrap();
    let bg = gray_bg(32, 32);
    let f = c.render_frame(&frames(), Some(&bg), FrameIndex(1)).unwrap();

    assert!(close(f.pixel(64, 64), [128, 128, 128, 255]));
    assert_eq!(f.pixel(40, 64)[3], 0);
    assert_eq!(f.pixel(90, 64)[3], 0);
}

#[test]
fn legacy_axes_change_tall_background_placement() {
    let bg = gray_bg(64, 300);
    let mut corrected = Compositor::new(CompositorOpts::default()).unwrap();
    let mut legacy = Compositor::new(CompositorOpts {
        axes: BackgroundAxes::Legacy,
    })
    .unwrap();

    let a = corrected
        .render_frame(&frames(), Some(&bg), FrameIndex(0))
        .unwrap();
    let b = legacy
        .render_frame(&frames(), Some(&bg), FrameIndex(0))
        .unwrap();

    // Corrected: x 32..96, y 12.8..115.2. Legacy: x 32..134.4, y 12.8..76.8.
    assert_eq!(a.pixel(110, 40)[3], 0);
    assert_eq!(b.pixel(110, 40)[3], 255);
    assert_eq!(a.pixel(64, 100)[3], 255);
    assert_eq!(b.pixel(64, 100)[3], 0);
}

#[test]
fn frame_index_wraps_in_single_render() {
    let mut c = Compositor::new(CompositorOpts::default()).unwrap();
    let set = frames();
    let a = c.render_frame(&set, None, FrameIndex(0)).unwrap();
    let b = c.render_frame(&set, None, FrameIndex(4)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn background_wider_than_raster_limit_is_drawn() {
    let mut c = Compositor::new(CompositorOpts::default()).unwrap();
    // 70000x2 fits vertically (y 63..65) and is inset horizontally (x 12.8..115.2).
    let bg = gray_bg(70_000, 2);
    let f = c.render_frame(&frames(), Some(&bg), FrameIndex(0)).unwrap();

    assert!(close(f.pixel(64, 63), [128, 128, 128, 255]), "{:?}", f.pixel(64, 63));
    assert!(close(f.pixel(110, 64), [128, 128, 128, 255]));
    assert_eq!(f.pixel(64, 60)[3], 0);
    assert_eq!(f.pixel(120, 64)[3], 0);
}
