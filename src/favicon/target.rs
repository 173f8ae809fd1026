use std::path::{Path, PathBuf};

use crate::favicon::renderer::IconSnapshot;
use crate::foundation::error::ShamebellResult;
use crate::output::write_atomic;

/// Receiver of favicon updates; the tab icon in a browser, a file on disk here.
pub trait IconTarget: Send {
    /// Replace the current icon.
    fn set_icon(&mut self, icon: &IconSnapshot) -> ShamebellResult<()>;
}

/// Rewrites a PNG file in place on every update.
#[derive(Debug, Clone)]
pub struct FileIconTarget {
    path: PathBuf,
}

impl FileIconTarget {
    /// Target writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Icon file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl IconTarget for FileIconTarget {
    fn set_icon(&mut self, icon: &IconSnapshot) -> ShamebellResult<()> {
        write_atomic(&self.path, &icon.png)
    }
}
