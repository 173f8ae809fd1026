use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::assets::store::{PreparedImage, decode_image};
use crate::foundation::error::{ShamebellError, ShamebellResult};

/// A decoded user-selected background image.
#[derive(Clone, Debug)]
pub struct Background {
    image: PreparedImage,
    source: Option<PathBuf>,
}

impl Background {
    /// Decode a background from encoded image bytes.
    pub fn from_bytes(bytes: &[u8]) -> ShamebellResult<Self> {
        let image = decode_image(bytes)?;
        Ok(Self {
            image,
            source: None,
        })
    }

    /// Read and decode a background from disk.
    pub fn from_path(path: impl AsRef<Path>) -> ShamebellResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read background '{}'", path.display()))?;
        let image = decode_image(&bytes).map_err(|e| {
            ShamebellError::decode(format!("background '{}': {e}", path.display()))
        })?;
        Ok(Self {
            image,
            source: Some(path.to_path_buf()),
        })
    }

    /// Wrap an already decoded image.
    pub fn from_image(image: PreparedImage) -> Self {
        Self {
            image,
            source: None,
        }
    }

    /// Decoded pixels.
    pub fn image(&self) -> &PreparedImage {
        &self.image
    }

    /// Natural width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width
    }

    /// Natural height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height
    }

    /// File the background was read from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

/// Load the background for a file selection. No selection is a no-op and yields `None`.
#[tracing::instrument]
pub fn load_background(file: Option<&Path>) -> ShamebellResult<Option<Background>> {
    let Some(path) = file else {
        tracing::debug!("no background selected");
        return Ok(None);
    };
    let bg = Background::from_path(path)?;
    tracing::info!(width = bg.width(), height = bg.height(), "background decoded");
    Ok(Some(bg))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/background.rs"]
mod tests;
