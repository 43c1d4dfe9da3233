// ABOUTME: Layout configuration handling.
// ABOUTME: Loads and saves split layout settings from TOML config files.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::{Orientation, SizeHint};

/// Size given to a pane before the container can be measured
pub const DEFAULT_PANE_SIZE: f64 = 200.0;
/// Minimum size of a pane with no configured minimum
pub const MIN_PANE_SIZE: f64 = 0.0;
/// Footprint of a splitter bar along the layout axis
pub const DEFAULT_SPLITTER_SIZE: f64 = 0.0;
/// Width of the invisible grab band centred on each splitter
pub const SPLITTER_HIT_TARGET: f64 = 8.0;

/// Per-pane sizing hints, keyed by pane position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaneConfig {
    pub index: usize,

    /// Initial size, absolute (`120`) or percentage (`"25%"`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_size: Option<SizeHint>,

    #[serde(default)]
    pub min_size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub orientation: Orientation,

    /// Number of panes to create
    pub pane_count: usize,

    /// Splitter footprint in pixels
    pub splitter_size: f64,

    /// Grab band around each splitter in pixels
    pub hit_target: f64,

    /// Pane that keeps its size when the container resizes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_pane: Option<usize>,

    pub panes: Vec<PaneConfig>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::default(),
            pane_count: 2,
            splitter_size: DEFAULT_SPLITTER_SIZE,
            hit_target: SPLITTER_HIT_TARGET,
            primary_pane: None,
            panes: Vec::new(),
        }
    }
}

impl LayoutConfig {
    pub fn initial_sizes(&self) -> BTreeMap<usize, SizeHint> {
        self.panes
            .iter()
            .filter_map(|pane| pane.initial_size.map(|hint| (pane.index, hint)))
            .collect()
    }

    pub fn min_sizes(&self) -> BTreeMap<usize, f64> {
        self.panes
            .iter()
            .filter(|pane| pane.min_size > MIN_PANE_SIZE)
            .map(|pane| (pane.index, pane.min_size))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub layout: LayoutConfig,

    /// Container dimensions used before the first resize
    pub container_width: f64,
    pub container_height: f64,

    /// Seed initial sizes from the last saved layout snapshot
    pub restore_layout: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            container_width: 1200.0,
            container_height: 800.0,
            restore_layout: true,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

impl Config {
    /// Get the default config file path (~/.config/split-layout/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("split-layout").join("config.toml"))
    }

    /// Load config from a path
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load config from default path, or return default config if not found
    pub fn load_or_default() -> Self {
        Self::default_path()
            .and_then(|path| Self::load(&path).ok())
            .unwrap_or_default()
    }

    /// Save config to a path
    pub fn save(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Save config to default path
    pub fn save_to_default(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::default_path().ok_or_else(|| {
            ConfigError::ReadError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config directory",
            ))
        })?;
        self.save(&path)?;
        Ok(path)
    }
}
