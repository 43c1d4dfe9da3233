// ABOUTME: Layout snapshot persistence for restoring pane sizes.
// ABOUTME: Saves the last observed pane sizes to disk as JSON.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::{Orientation, SizeHint};

/// Size of one pane, both in pixels and relative to the container
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaneSize {
    pub absolute: f64,
    pub percentage: f64,
}

/// Pane sizes as last reported by a layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    pub version: u32,
    pub orientation: Orientation,
    pub panes: Vec<PaneSize>,
}

impl LayoutSnapshot {
    pub const CURRENT_VERSION: u32 = 1;

    pub fn new(orientation: Orientation, panes: Vec<PaneSize>) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            orientation,
            panes,
        }
    }

    /// Percentage hints that reproduce this snapshot in a container of any size.
    ///
    /// Returns nothing when the pane count no longer matches, so a stale
    /// snapshot falls back to the configured defaults.
    pub fn initial_sizes(&self, pane_count: usize) -> BTreeMap<usize, SizeHint> {
        if self.panes.len() != pane_count {
            return BTreeMap::new();
        }
        self.panes
            .iter()
            .enumerate()
            .map(|(index, size)| (index, SizeHint::Percent(size.percentage)))
            .collect()
    }

    /// Get the default snapshot file path (~/.local/state/split-layout/layout.json)
    pub fn default_path() -> Option<PathBuf> {
        dirs::state_dir()
            .or_else(dirs::data_local_dir)
            .map(|p| p.join("split-layout").join("layout.json"))
    }

    pub fn save(&self, path: &std::path::Path) -> Result<(), SnapshotError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn save_to_default(&self) -> Result<PathBuf, SnapshotError> {
        let path = Self::default_path().ok_or(SnapshotError::NoStatePath)?;
        self.save(&path)?;
        Ok(path)
    }

    pub fn load(path: &std::path::Path) -> Result<Self, SnapshotError> {
        let json = std::fs::read(path)?;
        let snapshot: LayoutSnapshot = serde_json::from_slice(&json)?;

        if snapshot.version > Self::CURRENT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(snapshot.version));
        }

        Ok(snapshot)
    }

    /// Load snapshot from default path, returns None if not found or invalid
    pub fn load_from_default() -> Option<Self> {
        let path = Self::default_path()?;
        Self::load(&path).ok()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Could not determine state directory")]
    NoStatePath,

    #[error("Unsupported snapshot version: {0}")]
    UnsupportedVersion(u32),
}
