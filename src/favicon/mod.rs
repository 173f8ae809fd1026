//! Animated favicon: a small icon cycling through the bell frames on a fixed cadence.

/// Ticker thread driving an [`IconTarget`](target::IconTarget).
pub mod animator;
/// Cached per-frame icon rendering.
pub mod renderer;
/// Where rendered icons go.
pub mod target;

pub use animator::{FaviconAnimator, FaviconOpts};
pub use renderer::{FaviconRenderer, IconSnapshot};
pub use target::{FileIconTarget, IconTarget};
