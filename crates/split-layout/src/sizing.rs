// ABOUTME: Pure pane sizing math for split layouts.
// ABOUTME: Initial distribution, container-resize redistribution and drag steps.

use std::collections::BTreeMap;

use split_core::{SizeHint, MIN_PANE_SIZE};

use crate::LayoutError;

/// Shortfalls smaller than this are treated as fully distributed
const EPSILON: f64 = 1e-9;

pub fn min_size(min_sizes: &BTreeMap<usize, f64>, index: usize) -> f64 {
    min_sizes.get(&index).copied().unwrap_or(MIN_PANE_SIZE)
}

/// Compute the sizes of `pane_count` panes filling `container_extent`.
///
/// Explicit hints are resolved against the container; every remaining pane
/// gets an even share of what is left after explicit sizes and splitters.
/// Minimum sizes are taken out of that share, so the total only exceeds
/// the container when the minimums themselves do not fit.
/// Any hint that does not resolve to a finite number is rejected, including
/// hints for panes that do not exist.
pub fn initial_sizes(
    pane_count: usize,
    container_extent: f64,
    splitter_size: f64,
    hints: &BTreeMap<usize, SizeHint>,
    min_sizes: &BTreeMap<usize, f64>,
) -> Result<Vec<f64>, LayoutError> {
    let mut explicit = BTreeMap::new();
    for (&index, hint) in hints {
        let size = hint.resolve(container_extent);
        if !size.is_finite() {
            return Err(LayoutError::InvalidInitialSize {
                index,
                value: hint.to_string(),
            });
        }
        if index >= pane_count {
            tracing::warn!(
                "Ignoring initial size {} for pane {}, layout has {} panes",
                hint,
                index,
                pane_count
            );
            continue;
        }
        explicit.insert(index, size);
    }

    for (index, size) in explicit.iter_mut() {
        *size = size.max(min_size(min_sizes, *index));
    }

    let splitter_total = pane_count.saturating_sub(1) as f64 * splitter_size;
    let mut remaining = container_extent - explicit.values().sum::<f64>() - splitter_total;

    // Panes whose even share is below their minimum are pinned at the
    // minimum and the rest is shared again among the open panes.
    let mut sizes = vec![0.0; pane_count];
    let mut open: Vec<usize> = (0..pane_count)
        .filter(|index| !explicit.contains_key(index))
        .collect();
    while !open.is_empty() {
        let share = remaining / open.len() as f64;
        let (pinned, still_open): (Vec<usize>, Vec<usize>) = open
            .iter()
            .copied()
            .partition(|&index| min_size(min_sizes, index) > share);

        if pinned.is_empty() {
            for index in still_open {
                sizes[index] = share;
            }
            break;
        }
        for index in pinned {
            let floor = min_size(min_sizes, index);
            sizes[index] = floor;
            remaining -= floor;
        }
        open = still_open;
    }

    for (index, size) in explicit {
        sizes[index] = size;
    }
    Ok(sizes)
}

/// Spread `delta` evenly over every pane except `primary`.
///
/// A pane that would drop below its minimum is pinned there and its
/// shortfall is spread over the panes that still have room. When every
/// secondary pane is pinned the rest of the shortfall is dropped.
pub fn redistribute(
    sizes: &mut [f64],
    primary: usize,
    delta: f64,
    min_sizes: &BTreeMap<usize, f64>,
) {
    if sizes.len() < 2 || primary >= sizes.len() {
        return;
    }

    let mut open: Vec<usize> = (0..sizes.len()).filter(|&i| i != primary).collect();
    let mut remaining = delta;

    while !open.is_empty() && remaining.abs() > EPSILON {
        let share = remaining / open.len() as f64;
        remaining = 0.0;

        let mut still_open = Vec::with_capacity(open.len());
        for index in open {
            let target = sizes[index] + share;
            let floor = min_size(min_sizes, index);
            if target < floor {
                remaining += target - floor;
                sizes[index] = floor;
            } else {
                sizes[index] = target;
                still_open.push(index);
            }
        }
        open = still_open;
    }

    if remaining.abs() > EPSILON {
        tracing::debug!("Minimum sizes absorb {:.1}px of container shrink", -remaining);
    }
}

/// Inputs to one pointer-move of a splitter drag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragStep {
    /// Pointer coordinate along the layout axis
    pub pointer: f64,
    /// Leading edge of the pane before the splitter
    pub leading_edge: f64,
    /// Both pane extents plus the splitter footprint
    pub local_container: f64,
    pub splitter_size: f64,
    pub min_primary: f64,
    pub min_secondary: f64,
}

/// New `(primary, secondary)` sizes for a drag step.
///
/// The secondary minimum wins over the pointer: the primary pane is capped
/// so the secondary keeps its minimum. Returns `None` when both minimums
/// cannot fit in the local container, in which case the step is refused.
pub fn drag_sizes(step: &DragStep) -> Option<(f64, f64)> {
    let budget = step.local_container - step.splitter_size;

    let mut primary = (step.pointer - step.leading_edge).max(step.min_primary);
    let cap = budget - step.min_secondary;
    if primary > cap {
        primary = cap;
    }
    if primary < step.min_primary {
        return None;
    }

    Some((primary, budget - primary))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    fn no_mins() -> BTreeMap<usize, f64> {
        BTreeMap::new()
    }

    #[test]
    fn two_panes_split_evenly() {
        let sizes = initial_sizes(2, 400.0, 0.0, &BTreeMap::new(), &no_mins()).unwrap();
        assert_eq!(sizes, vec![200.0, 200.0]);
    }

    #[test]
    fn explicit_size_leaves_rest_to_others() {
        let hints = BTreeMap::from([(0, SizeHint::Absolute(100.0))]);
        let sizes = initial_sizes(3, 500.0, 0.0, &hints, &no_mins()).unwrap();
        assert_eq!(sizes, vec![100.0, 200.0, 200.0]);
    }

    #[test]
    fn percentage_is_converted() {
        let hints = BTreeMap::from([(0, SizeHint::Percent(25.0))]);
        let sizes = initial_sizes(2, 400.0, 0.0, &hints, &no_mins()).unwrap();
        assert_eq!(sizes, vec![100.0, 300.0]);
    }

    #[test]
    fn splitter_footprint_is_reserved() {
        let sizes = initial_sizes(3, 306.0, 3.0, &BTreeMap::new(), &no_mins()).unwrap();
        for size in &sizes {
            assert!(approx(*size, 100.0));
        }
        assert!(approx(sizes.iter().sum::<f64>() + 2.0 * 3.0, 306.0));
    }

    #[test]
    fn non_finite_hint_is_fatal() {
        let hints = BTreeMap::from([(1, SizeHint::Absolute(f64::NAN))]);
        let err = initial_sizes(2, 400.0, 0.0, &hints, &no_mins()).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidInitialSize { index: 1, .. }));
    }

    #[test]
    fn out_of_range_hint_is_ignored() {
        let hints = BTreeMap::from([(5, SizeHint::Absolute(100.0))]);
        let sizes = initial_sizes(2, 400.0, 0.0, &hints, &no_mins()).unwrap();
        assert_eq!(sizes, vec![200.0, 200.0]);
    }

    #[test]
    fn every_pane_explicit() {
        let hints = BTreeMap::from([(0, SizeHint::Absolute(150.0)), (1, SizeHint::Absolute(250.0))]);
        let sizes = initial_sizes(2, 400.0, 0.0, &hints, &no_mins()).unwrap();
        assert_eq!(sizes, vec![150.0, 250.0]);
    }

    #[test]
    fn initial_sizes_respect_minimums() {
        let hints = BTreeMap::from([(0, SizeHint::Absolute(380.0))]);
        let mins = BTreeMap::from([(1, 50.0)]);
        let sizes = initial_sizes(2, 400.0, 0.0, &hints, &mins).unwrap();
        assert_eq!(sizes, vec![380.0, 50.0]);
    }

    #[test]
    fn minimum_takes_space_from_open_panes() {
        let mins = BTreeMap::from([(0, 150.0)]);
        let sizes = initial_sizes(3, 300.0, 0.0, &BTreeMap::new(), &mins).unwrap();
        assert_eq!(sizes, vec![150.0, 75.0, 75.0]);
        assert!(approx(sizes.iter().sum::<f64>(), 300.0));
    }

    #[test]
    fn pinning_cascades() {
        // Pinning pane 0 drops the share below pane 1's minimum too
        let mins = BTreeMap::from([(0, 200.0), (1, 80.0)]);
        let sizes = initial_sizes(3, 300.0, 0.0, &BTreeMap::new(), &mins).unwrap();
        assert_eq!(sizes, vec![200.0, 80.0, 20.0]);
    }

    #[test]
    fn unsatisfiable_minimums_overflow() {
        let mins = BTreeMap::from([(0, 250.0), (1, 250.0)]);
        let sizes = initial_sizes(2, 400.0, 0.0, &BTreeMap::new(), &mins).unwrap();
        assert_eq!(sizes, vec![250.0, 250.0]);
    }

    #[test]
    fn zero_panes_is_empty() {
        let sizes = initial_sizes(0, 400.0, 4.0, &BTreeMap::new(), &no_mins()).unwrap();
        assert!(sizes.is_empty());
    }

    #[test]
    fn redistribute_skips_primary() {
        let mut sizes = vec![100.0, 200.0, 200.0];
        redistribute(&mut sizes, 0, 100.0, &no_mins());
        assert_eq!(sizes, vec![100.0, 250.0, 250.0]);
    }

    #[test]
    fn redistribute_moves_shortfall_to_open_panes() {
        let mut sizes = vec![100.0, 60.0, 200.0];
        let mins = BTreeMap::from([(1, 50.0)]);
        redistribute(&mut sizes, 0, -60.0, &mins);
        assert!(approx(sizes[1], 50.0));
        assert!(approx(sizes[2], 150.0));
        assert!(approx(sizes.iter().sum::<f64>(), 300.0));
    }

    #[test]
    fn redistribute_ignores_bad_primary() {
        let mut sizes = vec![100.0, 100.0];
        redistribute(&mut sizes, 7, 50.0, &no_mins());
        assert_eq!(sizes, vec![100.0, 100.0]);
    }

    #[test]
    fn drag_follows_pointer() {
        let step = DragStep {
            pointer: 350.0,
            leading_edge: 0.0,
            local_container: 400.0,
            splitter_size: 0.0,
            min_primary: 0.0,
            min_secondary: 0.0,
        };
        assert_eq!(drag_sizes(&step), Some((350.0, 50.0)));
    }

    #[test]
    fn drag_past_end_is_bounded() {
        let step = DragStep {
            pointer: 900.0,
            leading_edge: 0.0,
            local_container: 404.0,
            splitter_size: 4.0,
            min_primary: 0.0,
            min_secondary: 0.0,
        };
        assert_eq!(drag_sizes(&step), Some((400.0, 0.0)));
    }

    #[test]
    fn drag_honors_secondary_minimum() {
        let step = DragStep {
            pointer: 350.0,
            leading_edge: 0.0,
            local_container: 400.0,
            splitter_size: 0.0,
            min_primary: 0.0,
            min_secondary: 100.0,
        };
        assert_eq!(drag_sizes(&step), Some((300.0, 100.0)));
    }

    #[test]
    fn drag_honors_primary_minimum() {
        let step = DragStep {
            pointer: 10.0,
            leading_edge: 0.0,
            local_container: 400.0,
            splitter_size: 0.0,
            min_primary: 80.0,
            min_secondary: 0.0,
        };
        assert_eq!(drag_sizes(&step), Some((80.0, 320.0)));
    }

    #[test]
    fn drag_refused_when_minimums_collide() {
        let step = DragStep {
            pointer: 200.0,
            leading_edge: 0.0,
            local_container: 400.0,
            splitter_size: 0.0,
            min_primary: 250.0,
            min_secondary: 250.0,
        };
        assert_eq!(drag_sizes(&step), None);
    }
}
