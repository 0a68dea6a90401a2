//! Texture resolution.
//!
//! A texture source turns a logical image name from the object data into a
//! decoded raster. The game also ships compressed `.pvr` containers with an
//! external alpha plane; decoding those is out of scope here, so the trait is
//! the seam where such a decoder plugs in.

use std::path::PathBuf;

use anyhow::{Context, Result};
use image::DynamicImage;

pub trait TextureSource {
    /// Resolve `name` to a decoded image. `Ok(None)` means no candidate file
    /// exists (recoverable for the caller); `Err` means a candidate existed
    /// but would not decode.
    fn load(&self, name: &str) -> Result<Option<DynamicImage>>;
}

/// Plain-PNG resolver rooted at the game folder.
#[derive(Debug, Clone)]
pub struct TextureFolder {
    root: PathBuf,
}

impl TextureFolder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl TextureSource for TextureFolder {
    fn load(&self, name: &str) -> Result<Option<DynamicImage>> {
        let candidate = self.root.join(format!("{name}.png"));
        if candidate.exists() {
            let decoded = image::open(&candidate)
                .with_context(|| format!("decoding {}", candidate.display()))?;
            return Ok(Some(decoded));
        }
        Ok(None)
    }
}
