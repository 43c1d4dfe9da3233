// ABOUTME: Resizable split-pane layout management.
// ABOUTME: Sizes panes along one axis and tracks splitter drags and container resizes.

mod error;
pub mod events;
mod manager;
pub mod sizing;

pub use error::LayoutError;
pub use events::{Dispatcher, Listener, Notification, Subscription};
pub use manager::{
    Arrangement, InitialSizes, LayoutOptions, Pane, SizeObserver, SplitLayout, Splitter,
    SplitterRegion, Surface,
};
