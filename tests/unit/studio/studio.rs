use std::io::Cursor;
use std::sync::Mutex;

use crate::assets::store::PreparedImage;
use crate::favicon::IconSnapshot;

use super::*;

fn png(w: u32, h: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn scratch(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_scratch").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn ready_studio() -> Studio {
    let mut s = Studio::new(StudioConfig::default()).unwrap();
    s.load_frames().unwrap();
    s
}

#[test]
fn idle_studio_has_nothing_to_show() {
    let s = Studio::new(StudioConfig::default()).unwrap();
    assert!(!s.is_ready());
    assert!(s.preview().is_none());
    assert!(!s.can_download());
    assert!(s.download(Path::new("target")).is_err());
}

#[test]
fn invalid_config_is_rejected() {
    let cfg = StudioConfig {
        quantize_speed: 99,
        ..Default::default()
    };
    assert!(Studio::new(cfg).is_err());
}

#[test]
fn background_before_ready_waits_for_frames() {
    let mut s = Studio::new(StudioConfig::default()).unwrap();
    let out = s
        .set_background(Background::from_bytes(&png(20, 20, [1, 2, 3, 255])).unwrap())
        .unwrap();
    assert!(out.is_none());
    assert!(s.background().is_some());

    let out = s.load_frames().unwrap().unwrap();
    assert_eq!(out.generation(), 1);
}

#[test]
fn ready_without_background_still_exports() {
    let s = ready_studio();
    let out = s.preview().unwrap();
    assert_eq!(out.generation(), 1);
    assert!(out.bytes().starts_with(b"GIF89a"));
    assert!(s.can_download());
}

#[test]
fn background_change_supersedes_without_invalidating() {
    let mut s = ready_studio();
    let first = s.preview().unwrap().clone();

    let second = s
        .set_background(Background::from_bytes(&png(200, 200, [0, 128, 0, 255])).unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(second.generation(), 2);
    assert!(!first.same_output(&second));
    assert!(first.bytes().starts_with(b"GIF89a"));
    assert_ne!(first.bytes(), second.bytes());
    assert!(s.preview().unwrap().same_output(&second));

    let third = s.clear_background().unwrap().unwrap();
    assert_eq!(third.generation(), 3);
    assert_eq!(third.bytes(), first.bytes());
}

#[test]
fn empty_selection_is_a_noop() {
    let mut s = ready_studio();
    let before = s.preview().unwrap().clone();
    assert!(s.select_background(None).unwrap().is_none());
    assert!(s.preview().unwrap().same_output(&before));
}

#[test]
fn undecodable_selection_keeps_state() {
    let dir = scratch("studio_bad_bg");
    let p = dir.join("bad.png");
    std::fs::write(&p, b"not a png").unwrap();

    let mut s = ready_studio();
    let before = s.preview().unwrap().clone();
    assert!(s.select_background(Some(&p)).is_err());
    assert!(s.background().is_none());
    assert!(s.preview().unwrap().same_output(&before));
}

#[test]
fn download_writes_configured_filename() {
    let dir = scratch("studio_download");
    let cfg = StudioConfig {
        output_filename: "ring.gif".into(),
        ..Default::default()
    };
    let mut s = Studio::new(cfg).unwrap();
    s.load_frames().unwrap();
    let p = s.download(&dir).unwrap();
    assert_eq!(p, dir.join("ring.gif"));
    assert_eq!(std::fs::read(p).unwrap(), s.preview().unwrap().bytes());
}

#[test]
fn failed_frame_load_keeps_studio_not_ready() {
    let cfg = StudioConfig {
        frames_dir: Some(PathBuf::from("target/no/such/frames")),
        ..Default::default()
    };
    let mut s = Studio::new(cfg).unwrap();
    assert!(s.load_frames().is_err());
    assert!(!s.is_ready());
    assert!(s.preview().is_none());
}

#[derive(Clone, Default)]
struct Counter(Arc<Mutex<u64>>);

impl IconTarget for Counter {
    fn set_icon(&mut self, _icon: &IconSnapshot) -> ShamebellResult<()> {
        *self.0.lock().unwrap() += 1;
        Ok(())
    }
}

#[test]
fn favicon_requires_frames_and_stops() {
    let mut idle = Studio::new(StudioConfig::default()).unwrap();
    assert!(idle.start_favicon(Box::new(Counter::default())).is_err());
    assert_eq!(idle.stop_favicon().unwrap(), 0);

    let cfg = StudioConfig {
        favicon_period_ms: 5,
        ..Default::default()
    };
    let mut s = Studio::new(cfg).unwrap();
    s.load_frames().unwrap();
    let counter = Counter::default();
    s.start_favicon(Box::new(counter.clone())).unwrap();
    std::thread::sleep(std::time::Duration::from_millis(30));
    assert!(s.is_favicon_animating());
    let ticks = s.stop_favicon().unwrap();
    assert!(ticks >= 1);
    assert_eq!(*counter.0.lock().unwrap(), ticks);
    assert!(!s.is_favicon_animating());
}

fn solid(w: u32, h: u32, rgba: [u8; 4]) -> PreparedImage {
    PreparedImage::from_straight_rgba8(w, h, rgba.repeat((w * h) as usize)).unwrap()
}

/// Frame 0 is wider than any raster surface, so every pass over this set fails to draw it.
fn undrawable_frames() -> FrameSet {
    FrameSet::from_images([
        solid(70_000, 1, [255, 0, 0, 255]),
        solid(10, 10, [0, 255, 0, 255]),
        solid(10, 10, [0, 0, 255, 255]),
        solid(10, 10, [255, 255, 0, 255]),
    ])
}

#[test]
fn surface_failure_aborts_the_pass() {
    let mut s = Studio::new(StudioConfig::default()).unwrap();
    let out = s.frames_ready(undrawable_frames()).unwrap();
    assert!(out.is_none());
    assert!(s.is_ready());
    assert!(s.preview().is_none());
    assert!(!s.can_download());
}

#[test]
fn surface_failure_keeps_previous_output() {
    let mut s = ready_studio();
    let before = s.preview().unwrap().clone();

    assert!(s.frames_ready(undrawable_frames()).unwrap().is_none());
    assert!(s.preview().unwrap().same_output(&before));
    assert_eq!(s.preview().unwrap().generation(), 1);
    assert!(s.can_download());
}

#[test]
fn background_beyond_raster_limit_still_exports() {
    let mut s = ready_studio();
    let bg = Background::from_image(solid(70_000, 2, [0, 128, 0, 255]));
    let out = s.set_background(bg).unwrap().unwrap();
    assert_eq!(out.generation(), 2);
    assert!(s.preview().unwrap().same_output(&out));

    let decoder = image::codecs::gif::GifDecoder::new(Cursor::new(out.bytes())).unwrap();
    let frames = image::AnimationDecoder::into_frames(decoder)
        .collect_frames()
        .unwrap();
    assert_eq!(frames.len(), 4);
    let px = frames[0].buffer().get_pixel(100, 63).0;
    assert_eq!(px[3], 255);
    assert!(px[1].abs_diff(128) <= 3 && px[0] <= 3, "{px:?}");
}
