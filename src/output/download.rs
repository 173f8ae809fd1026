use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;

use crate::foundation::error::{ShamebellError, ShamebellResult};

/// Suggested filename for the exported animation.
pub const DEFAULT_FILENAME: &str = "shame.gif";

/// Retrievable handle to one finished export.
///
/// Clones share the same bytes. A newer export never invalidates an older handle; whoever still
/// holds it keeps a readable buffer.
#[derive(Clone, Debug)]
pub struct OutputHandle {
    bytes: Arc<[u8]>,
    generation: u64,
}

impl OutputHandle {
    pub(crate) fn new(bytes: Vec<u8>, generation: u64) -> Self {
        Self {
            bytes: bytes.into(),
            generation,
        }
    }

    /// Encoded file contents.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Export pass this handle came from. Strictly increases within a session.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// `true` for an empty buffer.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// `true` when both handles point at the same buffer.
    pub fn same_output(&self, other: &OutputHandle) -> bool {
        Arc::ptr_eq(&self.bytes, &other.bytes)
    }
}

/// Saves output handles under a fixed suggested filename.
#[derive(Clone, Debug)]
pub struct DownloadController {
    filename: String,
}

impl Default for DownloadController {
    fn default() -> Self {
        Self {
            filename: DEFAULT_FILENAME.to_string(),
        }
    }
}

impl DownloadController {
    /// Create a controller saving under `filename`. The name must be a bare file name.
    pub fn new(filename: impl Into<String>) -> ShamebellResult<Self> {
        let filename = filename.into();
        validate_filename(&filename)?;
        Ok(Self { filename })
    }

    /// Suggested filename.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Write `handle` to `dir/<filename>` and return the written path.
    #[tracing::instrument(skip(self, handle), fields(generation = handle.generation(), bytes = handle.len()))]
    pub fn save(&self, handle: &OutputHandle, dir: &Path) -> ShamebellResult<PathBuf> {
        let path = dir.join(&self.filename);
        write_atomic(&path, handle.bytes())?;
        tracing::info!(path = %path.display(), "output saved");
        Ok(path)
    }
}

pub(crate) fn validate_filename(name: &str) -> ShamebellResult<()> {
    if name.is_empty() || name == "." || name == ".." {
        return Err(ShamebellError::validation("output filename must be non-empty"));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(ShamebellError::validation(
            "output filename must not contain path separators",
        ));
    }
    Ok(())
}

/// Write `bytes` to `path` through a transient sibling file that is renamed into place.
///
/// Readers never observe a partially written file, and the transient file does not outlive the
/// call.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> ShamebellResult<()> {
    ensure_parent_dir(path)?;
    let name = path
        .file_name()
        .ok_or_else(|| ShamebellError::validation("output path has no file name"))?;
    let mut tmp_name = std::ffi::OsString::from(".");
    tmp_name.push(name);
    tmp_name.push(".part");
    let tmp = path.with_file_name(tmp_name);

    std::fs::write(&tmp, bytes)
        .with_context(|| format!("failed to write '{}'", tmp.display()))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(anyhow::Error::new(e)
            .context(format!("failed to move output into '{}'", path.display()))
            .into());
    }
    Ok(())
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> ShamebellResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/output/download.rs"]
mod tests;
