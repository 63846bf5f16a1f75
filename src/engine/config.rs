// Engine configuration, loaded from JSON

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Which extents the broad phase anchors at each entity's position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BroadPhaseExtents {
    /// Plain scale, ignoring rotation (matches the mask buffers)
    #[default]
    Unrotated,
    /// Scale inflated to enclose the rotated rectangle
    Oriented,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollisionConfig {
    /// Overlaps narrower than this on both axes are scanned pixel by pixel
    #[serde(default = "CollisionConfig::default_exhaustive_threshold")]
    pub exhaustive_threshold: i32,
    /// Larger overlaps are strided in steps of `ceil(extent / divisor)`
    #[serde(default = "CollisionConfig::default_sampling_divisor")]
    pub sampling_divisor: i32,
    #[serde(default)]
    pub broad_phase: BroadPhaseExtents,
}

impl CollisionConfig {
    const fn default_exhaustive_threshold() -> i32 {
        4
    }

    const fn default_sampling_divisor() -> i32 {
        3
    }
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            exhaustive_threshold: Self::default_exhaustive_threshold(),
            sampling_divisor: Self::default_sampling_divisor(),
            broad_phase: BroadPhaseExtents::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetsConfig {
    #[serde(default = "AssetsConfig::default_root")]
    pub root: PathBuf,
}

impl AssetsConfig {
    fn default_root() -> PathBuf {
        PathBuf::from("assets")
    }
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            root: Self::default_root(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "EngineConfig::default_ticks_per_second")]
    pub ticks_per_second: u32,
    /// Catch-up cap so a long frame cannot trigger a burst of ticks
    #[serde(default = "EngineConfig::default_max_ticks_per_frame")]
    pub max_ticks_per_frame: u32,
    #[serde(default)]
    pub collision: CollisionConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
}

impl EngineConfig {
    const fn default_ticks_per_second() -> u32 {
        60
    }

    const fn default_max_ticks_per_frame() -> u32 {
        5
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&bytes)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(err) => {
                log::warn!("Config load error: {err:?}. Falling back to defaults.");
                Self::default()
            }
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ticks_per_second: Self::default_ticks_per_second(),
            max_ticks_per_frame: Self::default_max_ticks_per_frame(),
            collision: CollisionConfig::default(),
            assets: AssetsConfig::default(),
        }
    }
}
