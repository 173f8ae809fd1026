//! Off-screen drawing and the four-frame composite pass.

/// The export compositor.
pub mod compositor;
/// Placement rules for background and foreground images.
pub mod layout;
/// `vello_cpu`-backed drawing surfaces and pixel readback.
pub mod surface;
