//! Finished output handles and saving them to disk.

/// Saving an output under its suggested filename.
pub mod download;

pub use download::{DEFAULT_FILENAME, DownloadController, OutputHandle, ensure_parent_dir, write_atomic};
