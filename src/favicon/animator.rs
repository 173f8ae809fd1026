use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::Context as _;

use crate::assets::frames::FrameSet;
use crate::favicon::renderer::FaviconRenderer;
use crate::favicon::target::IconTarget;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ShamebellError, ShamebellResult};

/// Options for [`FaviconAnimator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaviconOpts {
    /// Time between icon updates.
    pub period: Duration,
    /// Stop on its own after this many updates. `None` animates until stopped.
    pub max_ticks: Option<u64>,
}

impl Default for FaviconOpts {
    fn default() -> Self {
        Self {
            period: Duration::from_millis(200),
            max_ticks: None,
        }
    }
}

/// Running favicon animation.
///
/// Each tick renders the next frame (wrapping after the fourth) and hands it to the target. The
/// ticker thread stops on [`FaviconAnimator::stop`], on drop, or after `max_ticks` updates.
pub struct FaviconAnimator {
    stop_tx: Option<mpsc::Sender<()>>,
    worker: Option<JoinHandle<ShamebellResult<u64>>>,
}

impl FaviconAnimator {
    /// Start animating `frames` into `target`.
    pub fn start(
        frames: Arc<FrameSet>,
        opts: FaviconOpts,
        target: Box<dyn IconTarget>,
    ) -> ShamebellResult<Self> {
        if opts.period.is_zero() {
            return Err(ShamebellError::validation("favicon period must be > 0"));
        }
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let worker = std::thread::Builder::new()
            .name("favicon".to_string())
            .spawn(move || run(frames, opts, target, stop_rx))
            .context("failed to spawn favicon thread")?;
        tracing::debug!(period_ms = opts.period.as_millis() as u64, "favicon animating");
        Ok(Self {
            stop_tx: Some(stop_tx),
            worker: Some(worker),
        })
    }

    /// `true` while the ticker thread is alive.
    pub fn is_running(&self) -> bool {
        self.worker.as_ref().is_some_and(|w| !w.is_finished())
    }

    /// Stop animating and return the number of icon updates made.
    pub fn stop(mut self) -> ShamebellResult<u64> {
        drop(self.stop_tx.take());
        self.join_worker()
    }

    /// Wait for a bounded animation (`max_ticks`) to finish on its own.
    pub fn wait(mut self) -> ShamebellResult<u64> {
        self.join_worker()
    }

    fn join_worker(&mut self) -> ShamebellResult<u64> {
        let Some(worker) = self.worker.take() else {
            return Ok(0);
        };
        let ticks = worker
            .join()
            .map_err(|_| ShamebellError::validation("favicon thread panicked"))??;
        drop(self.stop_tx.take());
        Ok(ticks)
    }
}

impl Drop for FaviconAnimator {
    fn drop(&mut self) {
        drop(self.stop_tx.take());
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn run(
    frames: Arc<FrameSet>,
    opts: FaviconOpts,
    mut target: Box<dyn IconTarget>,
    stop_rx: mpsc::Receiver<()>,
) -> ShamebellResult<u64> {
    let mut renderer = FaviconRenderer::new(frames).inspect_err(|e| {
        tracing::error!(error = %e, "favicon surface unavailable");
    })?;

    let mut idx = FrameIndex(0);
    let mut ticks = 0u64;
    loop {
        let icon = renderer.render(idx).inspect_err(|e| {
            tracing::error!(frame = idx.wrapped(), error = %e, "favicon render failed");
        })?;
        if let Err(e) = target.set_icon(&icon) {
            tracing::warn!(frame = icon.index, error = %e, "favicon update failed");
        }
        ticks += 1;
        idx = idx.next();

        if opts.max_ticks.is_some_and(|max| ticks >= max) {
            break;
        }
        match stop_rx.recv_timeout(opts.period) {
            Err(RecvTimeoutError::Timeout) => continue,
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    tracing::debug!(ticks, renders = renderer.renders(), "favicon stopped");
    Ok(ticks)
}

#[cfg(test)]
#[path = "../../tests/unit/favicon/animator.rs"]
mod tests;
