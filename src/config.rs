//! Layout configuration.
//!
//! Every tunable used by the geometry helpers and the window manager is
//! collected here. The config can be built in code or loaded from a partial
//! JSON document; missing keys keep their defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    CLIP_MARGIN_BOTTOM, CLIP_MARGIN_LEFT, CLIP_MARGIN_RIGHT, CLIP_MARGIN_TOP, DEFAULT_OFFSET,
    DETACHED_ANCHOR, FALLBACK_SIZE, PARENT_GAP, SECONDARY_OFFSET,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read layout config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid layout config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Per-edge allowance used when clipping a panel against the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipMargins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for ClipMargins {
    fn default() -> Self {
        Self {
            top: CLIP_MARGIN_TOP,
            right: CLIP_MARGIN_RIGHT,
            bottom: CLIP_MARGIN_BOTTOM,
            left: CLIP_MARGIN_LEFT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub default_offset: f64,
    pub fallback_size: f64,
    pub secondary_offset: f64,
    pub detached_anchor: (f64, f64),
    pub parent_gap: f64,
    pub clip_margins: ClipMargins,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            default_offset: DEFAULT_OFFSET,
            fallback_size: FALLBACK_SIZE,
            secondary_offset: SECONDARY_OFFSET,
            detached_anchor: DETACHED_ANCHOR,
            parent_gap: PARENT_GAP,
            clip_margins: ClipMargins::default(),
        }
    }
}

impl LayoutConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Read a JSON config from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}
