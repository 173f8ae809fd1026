//! Session configuration.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::assets::frames::FrameSource;
use crate::encode::gif::GifSinkOpts;
use crate::foundation::error::{ShamebellError, ShamebellResult};
use crate::output::DEFAULT_FILENAME;
use crate::output::download::validate_filename;
use crate::render::compositor::CompositorOpts;
use crate::render::layout::BackgroundAxes;

/// JSON-facing configuration. Every field has a default, so `{}` is a valid file.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StudioConfig {
    /// Delay between exported frames in milliseconds.
    pub frame_delay_ms: u32,
    /// Favicon update cadence in milliseconds.
    pub favicon_period_ms: u64,
    /// Suggested filename for downloads.
    pub output_filename: String,
    /// Directory with `bell0.png`..`bell3.png` replacing the bundled frames.
    pub frames_dir: Option<PathBuf>,
    /// Background width/height mapping.
    pub background_axes: BackgroundAxes,
    /// NeuQuant speed, 1..=30.
    pub quantize_speed: i32,
    /// One-bit alpha cut-off.
    pub alpha_threshold: u8,
}

impl Default for StudioConfig {
    fn default() -> Self {
        let gif = GifSinkOpts::default();
        Self {
            frame_delay_ms: gif.frame_delay_ms,
            favicon_period_ms: 200,
            output_filename: DEFAULT_FILENAME.to_string(),
            frames_dir: None,
            background_axes: BackgroundAxes::default(),
            quantize_speed: gif.quantize_speed,
            alpha_threshold: gif.alpha_threshold,
        }
    }
}

impl StudioConfig {
    /// Parse a configuration from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> ShamebellResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| ShamebellError::serde(format!("parse config JSON: {e}")))
    }

    /// Parse a configuration from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> ShamebellResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ShamebellError::validation(format!("open config JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Reject out-of-range values.
    pub fn validate(&self) -> ShamebellResult<()> {
        self.gif_opts().validate()?;
        if self.favicon_period_ms == 0 {
            return Err(ShamebellError::validation("favicon_period_ms must be > 0"));
        }
        validate_filename(&self.output_filename)?;
        Ok(())
    }

    /// Where frames are loaded from.
    pub fn frame_source(&self) -> FrameSource {
        match &self.frames_dir {
            Some(dir) => FrameSource::Dir(dir.clone()),
            None => FrameSource::Bundled,
        }
    }

    /// Encoder options.
    pub fn gif_opts(&self) -> GifSinkOpts {
        GifSinkOpts {
            frame_delay_ms: self.frame_delay_ms,
            quantize_speed: self.quantize_speed,
            alpha_threshold: self.alpha_threshold,
        }
    }

    /// Compositor options.
    pub fn compositor_opts(&self) -> CompositorOpts {
        CompositorOpts {
            axes: self.background_axes,
        }
    }

    /// Favicon cadence.
    pub fn favicon_period(&self) -> Duration {
        Duration::from_millis(self.favicon_period_ms)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config/config.rs"]
mod tests;
