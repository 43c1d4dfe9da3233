// ABOUTME: Error type for split layout operations.
// ABOUTME: Covers invalid sizing configuration and out-of-range indices.

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("Invalid initial size for pane {index}: {value}")]
    InvalidInitialSize { index: usize, value: String },

    #[error("Pane index {index} out of range ({count} panes)")]
    PaneOutOfRange { index: usize, count: usize },

    #[error("Splitter index {index} out of range ({count} splitters)")]
    SplitterOutOfRange { index: usize, count: usize },
}
