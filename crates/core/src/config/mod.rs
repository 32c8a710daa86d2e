use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{geometry::Orientation, tempo::BpmBounds, Result};

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub tempo: TempoConfig,
    pub display: DisplayConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tempo: TempoConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn live_defaults() -> Self {
        Self::default()
    }

    /// Parses a configuration from its JSON representation.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Loads a configuration from a JSON file on disk.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Tempo bounds for the slider. Values are plain numbers here so they can
/// come from any host settings surface; [`TempoConfig::bounds`] performs
/// the ordering validation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TempoConfig {
    pub min_bpm: f32,
    pub default_bpm: f32,
    pub max_bpm: f32,
}

impl Default for TempoConfig {
    fn default() -> Self {
        Self {
            min_bpm: 40.0,
            default_bpm: 120.0,
            max_bpm: 240.0,
        }
    }
}

impl TempoConfig {
    /// Validates the configured values into usable bounds.
    pub fn bounds(&self) -> Result<BpmBounds> {
        BpmBounds::new(self.min_bpm, self.default_bpm, self.max_bpm)
    }
}

/// Configuration for the canvas the control is rendered on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub width: u32,
    pub height: u32,
    pub orientation: Orientation,
    pub target_fps: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1920,
            orientation: Orientation::Portrait,
            target_fps: 60,
        }
    }
}
