// Image asset system
//
// Registers image sources, decodes them off the simulation thread and
// reports completion through explicit events. Also owns the sprite sheet
// grid math and the clip blit used when building collision masks.

mod atlas;
mod handle;
mod loader;
mod manager;

pub use atlas::{blit_clip, ClipRect, SheetGrid};
pub use handle::{ImageEvent, ImageHandle, LoadState};
pub use loader::AssetLoader;
pub use manager::{ImageLookup, ImageStats, ImageStore};

/// Asset loading errors
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Unsupported image source: {0}")]
    Unsupported(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_error_display() {
        let err = AssetError::NotFound("hero.png".to_string());
        assert_eq!(err.to_string(), "Asset not found: hero.png");

        let err = AssetError::Decode("bad header".to_string());
        assert_eq!(err.to_string(), "Failed to decode image: bad header");

        let err = AssetError::Unsupported("theme.ogg".to_string());
        assert_eq!(err.to_string(), "Unsupported image source: theme.ogg");
    }
}
