//! shamebell overlays a ringing bell on an image and exports the result as an animated GIF.
//!
//! The public API is session-oriented:
//!
//! - Create a [`Studio`] from a [`StudioConfig`]
//! - Load the bell frames ([`Studio::load_frames`]); an export is produced right away
//! - Select a background ([`Studio::select_background`]); every change re-exports
//! - Save the latest export with [`Studio::download`]
//!
//! Lower-level pieces ([`Compositor`], [`GifSink`], [`FaviconAnimator`]) are usable on their own.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Frame and background loading.
pub mod assets;
pub mod config;
/// Encoding sinks.
pub mod encode;
/// Animated favicon.
pub mod favicon;
/// Finished outputs and downloads.
pub mod output;
/// Drawing surfaces and compositing.
pub mod render;
pub mod studio;

pub use crate::foundation::core::{Canvas, FRAME_COUNT, FrameIndex, Rect, Vec2};
pub use crate::foundation::error::{ShamebellError, ShamebellResult};

pub use crate::assets::background::{Background, load_background};
pub use crate::assets::frames::{FrameLoader, FrameSet, FrameSource};
pub use crate::assets::store::{PreparedImage, decode_image};
pub use crate::config::StudioConfig;
pub use crate::encode::gif::{GifSink, GifSinkOpts};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::favicon::{
    FaviconAnimator, FaviconOpts, FaviconRenderer, FileIconTarget, IconSnapshot, IconTarget,
};
pub use crate::output::{DEFAULT_FILENAME, DownloadController, OutputHandle};
pub use crate::render::compositor::{Compositor, CompositorOpts};
pub use crate::render::layout::BackgroundAxes;
pub use crate::render::surface::{PixelBuffer, Surface};
pub use crate::studio::Studio;
