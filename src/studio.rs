//! Session controller: owns the ready/background/output state and runs composite passes.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::assets::background::{Background, load_background};
use crate::assets::frames::{FrameLoader, FrameSet};
use crate::config::StudioConfig;
use crate::encode::gif::GifSink;
use crate::favicon::{FaviconAnimator, FaviconOpts, IconTarget};
use crate::foundation::error::{ShamebellError, ShamebellResult};
use crate::output::{DownloadController, OutputHandle};
use crate::render::compositor::Compositor;

/// One editing session.
///
/// A composite pass runs whenever frames are ready: on the ready transition and after every
/// background change. Without a background the pass still runs and the output shows only the
/// bell, so the preview is available as soon as frames are ready.
pub struct Studio {
    cfg: StudioConfig,
    frames: Option<Arc<FrameSet>>,
    background: Option<Background>,
    output: Option<OutputHandle>,
    generation: u64,
    compositor: Option<Compositor>,
    download: DownloadController,
    favicon: Option<FaviconAnimator>,
}

impl Studio {
    /// Create an idle session.
    pub fn new(cfg: StudioConfig) -> ShamebellResult<Self> {
        cfg.validate()?;
        let download = DownloadController::new(cfg.output_filename.clone())?;
        Ok(Self {
            cfg,
            frames: None,
            background: None,
            output: None,
            generation: 0,
            compositor: None,
            download,
            favicon: None,
        })
    }

    /// Session configuration.
    pub fn config(&self) -> &StudioConfig {
        &self.cfg
    }

    /// `true` once all frames have loaded.
    pub fn is_ready(&self) -> bool {
        self.frames.is_some()
    }

    /// Loaded frames, if ready.
    pub fn frames(&self) -> Option<&Arc<FrameSet>> {
        self.frames.as_ref()
    }

    /// Current background, if any.
    pub fn background(&self) -> Option<&Background> {
        self.background.as_ref()
    }

    /// Most recent export, if any.
    pub fn preview(&self) -> Option<&OutputHandle> {
        self.output.as_ref()
    }

    /// `true` when there is something to download.
    pub fn can_download(&self) -> bool {
        self.output.is_some()
    }

    /// `true` while the favicon is animating.
    pub fn is_favicon_animating(&self) -> bool {
        self.favicon.as_ref().is_some_and(|f| f.is_running())
    }

    /// Load frames from the configured source and mark the session ready.
    ///
    /// On failure the session stays not ready.
    pub fn load_frames(&mut self) -> ShamebellResult<Option<OutputHandle>> {
        let frames = FrameLoader::new().load(&self.cfg.frame_source())?;
        self.frames_ready(frames)
    }

    /// Transition to ready with `frames` and run a pass.
    pub fn frames_ready(&mut self, frames: FrameSet) -> ShamebellResult<Option<OutputHandle>> {
        self.frames = Some(Arc::new(frames));
        self.recompose()
    }

    /// Handle a file selection. No selection leaves everything untouched.
    pub fn select_background(&mut self, file: Option<&Path>) -> ShamebellResult<Option<OutputHandle>> {
        match load_background(file)? {
            Some(bg) => self.set_background(bg),
            None => Ok(None),
        }
    }

    /// Replace the background and run a pass.
    pub fn set_background(&mut self, background: Background) -> ShamebellResult<Option<OutputHandle>> {
        self.background = Some(background);
        self.recompose()
    }

    /// Drop the background and run a pass.
    pub fn clear_background(&mut self) -> ShamebellResult<Option<OutputHandle>> {
        self.background = None;
        self.recompose()
    }

    /// Save the current export under the suggested filename in `dir`.
    pub fn download(&self, dir: &Path) -> ShamebellResult<PathBuf> {
        let handle = self
            .output
            .as_ref()
            .ok_or_else(|| ShamebellError::validation("nothing to download yet"))?;
        self.download.save(handle, dir)
    }

    /// Start the favicon animation. Requires loaded frames; restarts a running animation.
    pub fn start_favicon(&mut self, target: Box<dyn IconTarget>) -> ShamebellResult<()> {
        let frames = self
            .frames
            .clone()
            .ok_or_else(|| ShamebellError::validation("favicon needs loaded frames"))?;
        self.stop_favicon()?;
        let opts = FaviconOpts {
            period: self.cfg.favicon_period(),
            max_ticks: None,
        };
        self.favicon = Some(FaviconAnimator::start(frames, opts, target)?);
        Ok(())
    }

    /// Stop the favicon animation, returning the number of icon updates made.
    pub fn stop_favicon(&mut self) -> ShamebellResult<u64> {
        match self.favicon.take() {
            Some(f) => f.stop(),
            None => Ok(0),
        }
    }

    /// Run a pass and publish its output.
    ///
    /// Surface failures (acquiring the export surface or turning an image into a paint) are
    /// logged and abort only this pass; the previous output stays current.
    fn recompose(&mut self) -> ShamebellResult<Option<OutputHandle>> {
        let Some(frames) = self.frames.clone() else {
            tracing::debug!("frames not ready, skipping composite");
            return Ok(None);
        };

        let bytes = match self.encode_pass(&frames) {
            Ok(bytes) => bytes,
            Err(e) if e.is_surface() => {
                tracing::error!(error = %e, "composite pass aborted");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        self.generation += 1;
        let handle = OutputHandle::new(bytes, self.generation);
        tracing::info!(
            generation = handle.generation(),
            bytes = handle.len(),
            "export ready"
        );
        self.output = Some(handle.clone());
        Ok(Some(handle))
    }

    fn encode_pass(&mut self, frames: &FrameSet) -> ShamebellResult<Vec<u8>> {
        let compositor = match self.compositor.take() {
            Some(c) => c,
            None => Compositor::new(self.cfg.compositor_opts())?,
        };
        let compositor = self.compositor.insert(compositor);

        let mut sink = GifSink::new(self.cfg.gif_opts());
        compositor.composite_pass(frames, self.background.as_ref(), &mut sink)?;
        sink.into_bytes()
    }
}

#[cfg(test)]
#[path = "../tests/unit/studio/studio.rs"]
mod tests;
