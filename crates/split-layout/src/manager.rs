// ABOUTME: Split layout manager owning panes, splitters and drag state.
// ABOUTME: Reacts to pointer and resize notifications by recomputing pane sizes.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use split_core::{
    LayoutConfig, Orientation, PaneSize, Point, Rect, SizeHint, DEFAULT_PANE_SIZE,
    DEFAULT_SPLITTER_SIZE, SPLITTER_HIT_TARGET,
};

use crate::events::{Dispatcher, Notification, Subscription};
use crate::sizing::{self, DragStep};
use crate::LayoutError;

/// The host's view of the container a layout is drawn into.
pub trait Surface {
    /// Current container bounds, or `None` while it cannot be measured yet
    fn container_bounds(&self) -> Option<Rect>;

    /// Drop any text selection made as a side effect of dragging
    fn clear_selection(&mut self) {}
}

/// Initial size hints, either fixed or produced on every (re)mount
pub enum InitialSizes {
    Static(BTreeMap<usize, SizeHint>),
    Deferred(Box<dyn Fn() -> BTreeMap<usize, SizeHint>>),
}

impl InitialSizes {
    fn resolve(&self) -> BTreeMap<usize, SizeHint> {
        match self {
            InitialSizes::Static(hints) => hints.clone(),
            InitialSizes::Deferred(produce) => produce(),
        }
    }
}

impl Default for InitialSizes {
    fn default() -> Self {
        InitialSizes::Static(BTreeMap::new())
    }
}

impl fmt::Debug for InitialSizes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitialSizes::Static(hints) => f.debug_tuple("Static").field(hints).finish(),
            InitialSizes::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

pub type SizeObserver = Box<dyn FnMut(&[PaneSize])>;

/// Construction-time options for a [`SplitLayout`]
pub struct LayoutOptions {
    pub orientation: Orientation,
    pub splitter_size: f64,
    pub hit_target: f64,
    pub primary_pane: Option<usize>,
    pub min_sizes: BTreeMap<usize, f64>,
    pub initial_sizes: InitialSizes,
    pub on_size_change: Option<SizeObserver>,
}

impl LayoutOptions {
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            splitter_size: DEFAULT_SPLITTER_SIZE,
            hit_target: SPLITTER_HIT_TARGET,
            primary_pane: None,
            min_sizes: BTreeMap::new(),
            initial_sizes: InitialSizes::default(),
            on_size_change: None,
        }
    }

    pub fn with_initial_size(mut self, index: usize, hint: impl Into<SizeHint>) -> Self {
        if matches!(self.initial_sizes, InitialSizes::Deferred(_)) {
            self.initial_sizes = InitialSizes::default();
        }
        if let InitialSizes::Static(hints) = &mut self.initial_sizes {
            hints.insert(index, hint.into());
        }
        self
    }

    pub fn with_deferred_initial_sizes(
        mut self,
        produce: impl Fn() -> BTreeMap<usize, SizeHint> + 'static,
    ) -> Self {
        self.initial_sizes = InitialSizes::Deferred(Box::new(produce));
        self
    }

    pub fn with_min_size(mut self, index: usize, size: f64) -> Self {
        self.min_sizes.insert(index, size);
        self
    }

    pub fn with_primary_pane(mut self, index: usize) -> Self {
        self.primary_pane = Some(index);
        self
    }

    pub fn with_splitter_size(mut self, size: f64) -> Self {
        self.splitter_size = size;
        self
    }

    pub fn on_size_change(mut self, observer: impl FnMut(&[PaneSize]) + 'static) -> Self {
        self.on_size_change = Some(Box::new(observer));
        self
    }
}

impl From<&LayoutConfig> for LayoutOptions {
    fn from(config: &LayoutConfig) -> Self {
        Self {
            orientation: config.orientation,
            splitter_size: config.splitter_size,
            hit_target: config.hit_target,
            primary_pane: config.primary_pane,
            min_sizes: config.min_sizes(),
            initial_sizes: InitialSizes::Static(config.initial_sizes()),
            on_size_change: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pane<C> {
    pub index: usize,
    pub size: f64,
    pub min_size: f64,
    pub content: C,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Splitter {
    pub index: usize,
    /// Bounds captured when the current (or last) drag began
    pub bounds_snapshot: Option<Rect>,
}

/// Rendered placement of a splitter bar
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitterRegion {
    pub bounds: Rect,
    /// Invisible grab band straddling the bar
    pub hit_bounds: Rect,
}

/// Rendered geometry of the whole layout
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arrangement {
    pub panes: Vec<Rect>,
    pub splitters: Vec<SplitterRegion>,
}

/// Panes laid out along one axis with draggable splitters between them.
///
/// All state is owned here and mutated only from notification handlers,
/// one at a time.
pub struct SplitLayout<S, C> {
    surface: S,
    orientation: Orientation,
    splitter_size: f64,
    hit_target: f64,
    primary_pane: Option<usize>,
    min_sizes: BTreeMap<usize, f64>,
    initial_sizes: InitialSizes,
    on_size_change: Option<SizeObserver>,

    panes: Vec<Pane<C>>,
    splitters: Vec<Splitter>,
    container_extent: Option<f64>,
    active_splitter: Option<usize>,
    arrangement: Arrangement,
}

impl<S: Surface, C> SplitLayout<S, C> {
    /// Mount a layout over `contents`, computing the initial pane sizes
    pub fn new(surface: S, contents: Vec<C>, options: LayoutOptions) -> Result<Self, LayoutError> {
        let mut layout = Self {
            surface,
            orientation: options.orientation,
            splitter_size: options.splitter_size,
            hit_target: options.hit_target,
            primary_pane: options.primary_pane,
            min_sizes: options.min_sizes,
            initial_sizes: options.initial_sizes,
            on_size_change: options.on_size_change,
            panes: Vec::new(),
            splitters: Vec::new(),
            container_extent: None,
            active_splitter: None,
            arrangement: Arrangement::default(),
        };
        layout.rebuild(contents);
        layout.calculate_initial_pane_sizes()?;
        Ok(layout)
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn pane_count(&self) -> usize {
        self.panes.len()
    }

    pub fn sizes(&self) -> Vec<f64> {
        self.panes.iter().map(|pane| pane.size).collect()
    }

    pub fn pane(&self, index: usize) -> Result<&Pane<C>, LayoutError> {
        self.panes.get(index).ok_or(LayoutError::PaneOutOfRange {
            index,
            count: self.panes.len(),
        })
    }

    pub fn splitter(&self, index: usize) -> Result<&Splitter, LayoutError> {
        self.splitters.get(index).ok_or(LayoutError::SplitterOutOfRange {
            index,
            count: self.splitters.len(),
        })
    }

    pub fn active_splitter(&self) -> Option<usize> {
        self.active_splitter
    }

    pub fn is_dragging(&self) -> bool {
        self.active_splitter.is_some()
    }

    /// Container extent as of the last measurement
    pub fn container_extent(&self) -> Option<f64> {
        self.container_extent
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Geometry of the last render
    pub fn render(&self) -> &Arrangement {
        &self.arrangement
    }

    /// Splitter whose grab band contains `point`
    pub fn splitter_at(&self, point: Point) -> Option<usize> {
        self.arrangement
            .splitters
            .iter()
            .position(|region| region.hit_bounds.contains(point))
    }

    /// Sizes of every pane, absolute and as a percentage of the container
    pub fn pane_sizes(&self) -> Vec<PaneSize> {
        let extent = self.measure().unwrap_or(0.0);
        self.panes
            .iter()
            .map(|pane| PaneSize {
                absolute: pane.size,
                percentage: if extent > 0.0 {
                    pane.size / extent * 100.0
                } else {
                    0.0
                },
            })
            .collect()
    }

    /// Replace the pane contents.
    ///
    /// When the number of panes changes every size is recomputed from the
    /// initial hints and any drag in progress is dropped. Hints are checked
    /// before anything is replaced, so on error the layout is unchanged.
    pub fn set_contents(&mut self, contents: Vec<C>) -> Result<(), LayoutError> {
        if contents.len() == self.panes.len() {
            for (pane, content) in self.panes.iter_mut().zip(contents) {
                pane.content = content;
            }
            return Ok(());
        }

        let sizes = self.compute_initial_sizes(contents.len())?;
        tracing::info!(
            "Pane count changed from {} to {}, recomputing layout",
            self.panes.len(),
            contents.len()
        );
        self.rebuild(contents);
        self.apply_initial_sizes(sizes);
        Ok(())
    }

    fn rebuild(&mut self, contents: Vec<C>) {
        self.panes = contents
            .into_iter()
            .enumerate()
            .map(|(index, content)| Pane {
                index,
                size: DEFAULT_PANE_SIZE,
                min_size: sizing::min_size(&self.min_sizes, index),
                content,
            })
            .collect();
        self.splitters = (0..self.panes.len().saturating_sub(1))
            .map(|index| Splitter {
                index,
                bounds_snapshot: None,
            })
            .collect();
        self.active_splitter = None;
        self.arrange();
    }

    fn measure(&self) -> Option<f64> {
        self.surface
            .container_bounds()
            .map(|bounds| bounds.extent(self.orientation))
    }

    /// Size every pane from the initial hints and the current container.
    ///
    /// An unmeasurable container leaves every pane at the default size until
    /// the first resize notification.
    pub fn calculate_initial_pane_sizes(&mut self) -> Result<(), LayoutError> {
        let sizes = self.compute_initial_sizes(self.panes.len())?;
        self.apply_initial_sizes(sizes);
        Ok(())
    }

    /// Measured extent and sizes for `pane_count` panes, without touching state
    fn compute_initial_sizes(
        &self,
        pane_count: usize,
    ) -> Result<Option<(f64, Vec<f64>)>, LayoutError> {
        let Some(extent) = self.measure() else {
            return Ok(None);
        };
        let hints = self.initial_sizes.resolve();
        let sizes = sizing::initial_sizes(
            pane_count,
            extent,
            self.splitter_size,
            &hints,
            &self.min_sizes,
        )?;
        Ok(Some((extent, sizes)))
    }

    fn apply_initial_sizes(&mut self, computed: Option<(f64, Vec<f64>)>) {
        match computed {
            Some((extent, sizes)) => {
                self.container_extent = Some(extent);
                for (pane, size) in self.panes.iter_mut().zip(sizes) {
                    pane.size = size;
                }
                tracing::info!(
                    "Laid out {} panes in {:.1}px: {:?}",
                    self.panes.len(),
                    extent,
                    self.sizes()
                );
            }
            None => {
                self.container_extent = None;
                for pane in &mut self.panes {
                    pane.size = DEFAULT_PANE_SIZE;
                }
                tracing::debug!("Container not measurable, using default pane size");
            }
        }

        self.arrange();
    }

    /// Re-measure the container and redistribute space if it changed.
    ///
    /// Shared by viewport resizes and splitter-driven resizes.
    pub fn recompute_container_layout(&mut self) -> Result<(), LayoutError> {
        let old = self.container_extent;
        let new = self.measure();

        if old.is_none() && new.is_some() {
            return self.calculate_initial_pane_sizes();
        }

        if let Some(primary) = self.primary_pane {
            if let (Some(old_extent), Some(new_extent)) = (old, new) {
                if old_extent != new_extent {
                    self.container_extent = new;
                    tracing::debug!(
                        "Container resized {:.1} -> {:.1}, primary pane {}",
                        old_extent,
                        new_extent,
                        primary
                    );
                    self.calculate_secondary_pane_sizes(old_extent, new_extent);
                }
            }
        }

        self.arrange();
        Ok(())
    }

    /// Spread a container size change over every pane but the primary one
    pub fn calculate_secondary_pane_sizes(&mut self, old_extent: f64, new_extent: f64) {
        let Some(primary) = self.primary_pane else {
            return;
        };
        if primary >= self.panes.len() {
            tracing::warn!(
                "Primary pane {} out of range ({} panes), not redistributing",
                primary,
                self.panes.len()
            );
            return;
        }

        let mut sizes = self.sizes();
        sizing::redistribute(&mut sizes, primary, new_extent - old_extent, &self.min_sizes);
        for (pane, size) in self.panes.iter_mut().zip(sizes) {
            pane.size = size;
        }
    }

    /// Start dragging a splitter
    pub fn grab_splitter(&mut self, index: usize) -> Result<(), LayoutError> {
        self.splitter(index)?;
        self.surface.clear_selection();

        let bounds = self.arrangement.splitters[index].bounds;
        self.splitters[index].bounds_snapshot = Some(bounds);
        self.active_splitter = Some(index);
        self.container_extent = self.measure();

        tracing::debug!("Grabbed splitter {} at {:?}", index, bounds);
        Ok(())
    }

    pub fn release_splitter(&mut self) {
        if let Some(index) = self.active_splitter.take() {
            tracing::debug!("Released splitter {}, sizes {:?}", index, self.sizes());
        }
    }

    /// Resize the two panes around `splitter` so it follows `pointer`.
    ///
    /// Returns whether the sizes changed; a step is refused when both
    /// panes' minimum sizes cannot fit.
    pub fn calculate_pane_sizes(
        &mut self,
        splitter: usize,
        pointer: Point,
    ) -> Result<bool, LayoutError> {
        let primary_index = self.splitter(splitter)?.index;
        let secondary_index = primary_index + 1;

        let primary_rect = *self.pane_rect(primary_index)?;
        let secondary_rect = *self.pane_rect(secondary_index)?;
        let splitter_rect = self.splitters[splitter]
            .bounds_snapshot
            .unwrap_or(self.arrangement.splitters[splitter].bounds);

        let o = self.orientation;
        let footprint = splitter_rect.extent(o);
        let step = DragStep {
            pointer: o.axis_of(pointer),
            leading_edge: primary_rect.leading_edge(o),
            local_container: primary_rect.extent(o) + secondary_rect.extent(o) + footprint,
            splitter_size: footprint,
            min_primary: self.panes[primary_index].min_size,
            min_secondary: self.panes[secondary_index].min_size,
        };

        let Some((primary, secondary)) = sizing::drag_sizes(&step) else {
            tracing::debug!(
                "Refusing drag of splitter {}: minimums exceed {:.1}px",
                splitter,
                step.local_container
            );
            return Ok(false);
        };

        self.panes[primary_index].size = primary;
        self.panes[secondary_index].size = secondary;
        self.arrange();

        let sizes = self.pane_sizes();
        if let Some(observer) = self.on_size_change.as_mut() {
            observer(&sizes);
        }
        Ok(true)
    }

    fn pane_rect(&self, index: usize) -> Result<&Rect, LayoutError> {
        self.arrangement
            .panes
            .get(index)
            .ok_or(LayoutError::PaneOutOfRange {
                index,
                count: self.arrangement.panes.len(),
            })
    }

    /// Handle one notification.
    ///
    /// Returns `true` when a drag resized panes, so nested layouts can be
    /// told to re-measure.
    pub fn handle(&mut self, notification: &Notification) -> Result<bool, LayoutError> {
        match *notification {
            Notification::PointerDown { splitter } => {
                self.grab_splitter(splitter)?;
                Ok(false)
            }
            Notification::PointerMove(pointer) => {
                let Some(splitter) = self.active_splitter else {
                    return Ok(false);
                };
                self.recompute_container_layout()?;
                let resized = self.calculate_pane_sizes(splitter, pointer)?;
                self.surface.clear_selection();
                Ok(resized)
            }
            Notification::PointerUp => {
                self.release_splitter();
                Ok(false)
            }
            Notification::ViewportResized | Notification::SplitterResized => {
                self.recompute_container_layout()?;
                Ok(false)
            }
        }
    }

    /// Lay panes and splitters out from the container origin
    fn arrange(&mut self) {
        let o = self.orientation;
        let bounds = self.surface.container_bounds().unwrap_or_default();

        let mut panes = Vec::with_capacity(self.panes.len());
        let mut splitters = Vec::with_capacity(self.splitters.len());
        let mut offset = 0.0;
        for (index, pane) in self.panes.iter().enumerate() {
            panes.push(bounds.band(o, offset, pane.size));
            offset += pane.size;

            if index + 1 < self.panes.len() {
                splitters.push(SplitterRegion {
                    bounds: bounds.band(o, offset, self.splitter_size),
                    hit_bounds: bounds.band(o, offset - self.hit_target / 2.0, self.hit_target),
                });
                offset += self.splitter_size;
            }
        }

        self.arrangement = Arrangement { panes, splitters };
    }
}

impl<S: Surface + 'static, C: 'static> SplitLayout<S, C> {
    /// Subscribe a shared layout to `dispatcher` for as long as the returned
    /// guard lives.
    ///
    /// After a drag resizes panes, a [`Notification::SplitterResized`] is
    /// dispatched so other layouts on the same bus re-measure.
    pub fn attach(layout: &Rc<RefCell<Self>>, dispatcher: &Dispatcher) -> Subscription {
        let layout = Rc::downgrade(layout);
        let bus = dispatcher.downgrade();

        dispatcher.subscribe_fn(move |notification| {
            let Some(layout) = layout.upgrade() else {
                return;
            };
            let result = layout.borrow_mut().handle(notification);
            match result {
                Ok(true) => {
                    if let Some(bus) = bus.upgrade() {
                        bus.dispatch(Notification::SplitterResized);
                    }
                }
                Ok(false) => {}
                Err(e) => tracing::warn!("Layout ignored {:?}: {}", notification, e),
            }
        })
    }
}
