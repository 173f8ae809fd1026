//! Encoding sinks.
//!
//! Sinks consume composited frames in playback order and are driven by
//! [`crate::render::compositor::Compositor::composite_pass`].

/// Animated GIF output.
pub mod gif;
/// Generic frame sink trait and built-in sinks.
pub mod sink;
