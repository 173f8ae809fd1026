//! Frame and background image loading.

/// User-selected background images.
pub mod background;
/// The four bundled bell frames and their loader.
pub mod frames;
/// Decoded image storage shared by all loaders.
pub mod store;
