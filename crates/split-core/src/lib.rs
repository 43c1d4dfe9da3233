// ABOUTME: Shared types and configuration for split-layout.
// ABOUTME: Defines geometry, size hints, config files and layout snapshots.

pub mod config;
pub mod geometry;
pub mod size;
pub mod snapshot;

pub use config::{
    Config, ConfigError, LayoutConfig, PaneConfig, DEFAULT_PANE_SIZE, DEFAULT_SPLITTER_SIZE,
    MIN_PANE_SIZE, SPLITTER_HIT_TARGET,
};
pub use geometry::{Orientation, Point, Rect};
pub use size::{SizeHint, SizeHintError};
pub use snapshot::{LayoutSnapshot, PaneSize, SnapshotError};
