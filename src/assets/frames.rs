use std::borrow::Cow;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Context as _;
use rayon::prelude::*;

use crate::assets::store::{PreparedImage, decode_image};
use crate::foundation::core::{FRAME_COUNT, FrameIndex};
use crate::foundation::error::{ShamebellError, ShamebellResult};

const BUNDLED_BELLS: [&[u8]; FRAME_COUNT] = [
    include_bytes!("../../assets/bell0.png"),
    include_bytes!("../../assets/bell1.png"),
    include_bytes!("../../assets/bell2.png"),
    include_bytes!("../../assets/bell3.png"),
];

/// Where the four bell frames come from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FrameSource {
    /// PNGs compiled into the binary.
    #[default]
    Bundled,
    /// A directory holding `bell0.png` .. `bell3.png`.
    Dir(PathBuf),
}

impl FrameSource {
    /// File name of frame `i` inside a frame directory.
    pub fn asset_name(i: usize) -> String {
        format!("bell{i}.png")
    }

    fn describe(&self, i: usize) -> String {
        match self {
            Self::Bundled => format!("bundled:{}", Self::asset_name(i)),
            Self::Dir(dir) => dir.join(Self::asset_name(i)).display().to_string(),
        }
    }

    fn read(&self, i: usize) -> ShamebellResult<Cow<'static, [u8]>> {
        match self {
            Self::Bundled => BUNDLED_BELLS
                .get(i)
                .map(|b| Cow::Borrowed(*b))
                .ok_or_else(|| ShamebellError::validation(format!("no bundled frame {i}"))),
            Self::Dir(dir) => {
                let p = dir.join(Self::asset_name(i));
                let bytes = std::fs::read(&p)
                    .with_context(|| format!("failed to read frame asset '{}'", p.display()))?;
                Ok(Cow::Owned(bytes))
            }
        }
    }
}

/// The four decoded bell frames, in playback order.
#[derive(Clone, Debug)]
pub struct FrameSet {
    frames: [PreparedImage; FRAME_COUNT],
}

impl FrameSet {
    /// Build a set from already decoded frames.
    pub fn from_images(frames: [PreparedImage; FRAME_COUNT]) -> Self {
        Self { frames }
    }

    /// Frame at `idx`, wrapping modulo [`FRAME_COUNT`].
    pub fn get(&self, idx: FrameIndex) -> &PreparedImage {
        &self.frames[idx.wrapped()]
    }

    /// Iterate frames in index order.
    pub fn iter(&self) -> impl Iterator<Item = &PreparedImage> {
        self.frames.iter()
    }
}

/// Loads the frame assets and reports readiness once all of them decoded.
///
/// Assets decode concurrently; [`FrameLoader::load`] only returns a [`FrameSet`] after every load
/// has joined and the completion count reached [`FRAME_COUNT`]. A failed asset leaves the loader
/// not ready.
#[derive(Debug, Default)]
pub struct FrameLoader {
    loaded: AtomicUsize,
}

impl FrameLoader {
    /// Create a loader with nothing loaded yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of assets that finished decoding in the most recent [`FrameLoader::load`].
    pub fn loaded(&self) -> usize {
        self.loaded.load(Ordering::Acquire)
    }

    /// `true` once all frames have loaded.
    pub fn is_ready(&self) -> bool {
        self.loaded() == FRAME_COUNT
    }

    /// Load and decode all frames from `source`.
    #[tracing::instrument(skip(self))]
    pub fn load(&self, source: &FrameSource) -> ShamebellResult<FrameSet> {
        self.loaded.store(0, Ordering::Release);

        let results: Vec<ShamebellResult<PreparedImage>> = (0..FRAME_COUNT)
            .into_par_iter()
            .map(|i| {
                let bytes = source.read(i)?;
                let img = decode_image(&bytes).map_err(|e| {
                    ShamebellError::decode(format!("frame asset '{}': {e}", source.describe(i)))
                })?;
                self.loaded.fetch_add(1, Ordering::AcqRel);
                tracing::debug!(frame = i, width = img.width, height = img.height, "frame loaded");
                Ok(img)
            })
            .collect();

        let mut frames = Vec::with_capacity(FRAME_COUNT);
        for (i, r) in results.into_iter().enumerate() {
            match r {
                Ok(img) => frames.push(img),
                Err(e) => {
                    tracing::error!(asset = %source.describe(i), error = %e, "frame asset failed to load");
                    return Err(e);
                }
            }
        }

        if !self.is_ready() {
            return Err(ShamebellError::validation(format!(
                "only {} of {FRAME_COUNT} frames loaded",
                self.loaded()
            )));
        }
        let frames: [PreparedImage; FRAME_COUNT] = frames
            .try_into()
            .map_err(|_| ShamebellError::validation("frame count mismatch"))?;

        tracing::info!(frames = FRAME_COUNT, "frames ready");
        Ok(FrameSet { frames })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/frames.rs"]
mod tests;
