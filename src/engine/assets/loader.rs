// Image file loading and decoding

use super::AssetError;
use anyhow::{Context, Result};
use image::RgbaImage;
use std::path::{Path, PathBuf};

/// Extensions the decoder is built with
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Resolves image sources against an asset root and decodes them to RGBA
#[derive(Debug, Clone)]
pub struct AssetLoader {
    base_path: PathBuf,
}

impl AssetLoader {
    /// Create a new asset loader with the given base path
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Get the full path for an image source
    pub fn resolve_path(&self, source: &str) -> PathBuf {
        self.base_path.join(source)
    }

    /// Load image bytes from disk
    pub fn load_bytes(&self, source: &str) -> Result<Vec<u8>> {
        let path = self.resolve_path(source);

        if !path.exists() {
            return Err(AssetError::NotFound(path.to_string_lossy().to_string()).into());
        }

        std::fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))
    }

    /// Load and decode an image source into RGBA pixels
    pub fn load_image(&self, source: &str) -> Result<RgbaImage> {
        let bytes = self.load_bytes(source)?;
        Self::decode(&bytes).with_context(|| format!("Failed to decode {}", source))
    }

    /// Decode in-memory image bytes into RGBA pixels
    pub fn decode(bytes: &[u8]) -> Result<RgbaImage> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| AssetError::Decode(e.to_string()))?;
        Ok(img.to_rgba8())
    }

    /// Check if a source has an extension the decoder understands
    pub fn is_supported(source: &str) -> bool {
        Path::new(source)
            .extension()
            .map(|ext| {
                let ext = ext.to_string_lossy().to_ascii_lowercase();
                IMAGE_EXTENSIONS.contains(&ext.as_str())
            })
            .unwrap_or(false)
    }
}
