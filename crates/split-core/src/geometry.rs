// ABOUTME: Axis-aware geometry primitives for split layouts.
// ABOUTME: Points, rectangles in pixels, and the layout orientation.

use serde::{Deserialize, Serialize};

/// Direction in which panes are stacked.
///
/// `Horizontal` stacks panes top-to-bottom with horizontal splitter bars,
/// so dragging moves along Y. `Vertical` stacks panes left-to-right with
/// vertical bars, so dragging moves along X.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Horizontal,
    #[default]
    Vertical,
}

impl Orientation {
    /// Coordinate of a point along the layout axis
    pub fn axis_of(&self, point: Point) -> f64 {
        match self {
            Orientation::Horizontal => point.y,
            Orientation::Vertical => point.x,
        }
    }

    /// Cursor name a host should show while hovering a splitter
    pub fn resize_cursor(&self) -> &'static str {
        match self {
            Orientation::Horizontal => "ns-resize",
            Orientation::Vertical => "ew-resize",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Rectangle in pixels, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }

    /// Extent along the layout axis
    pub fn extent(&self, orientation: Orientation) -> f64 {
        match orientation {
            Orientation::Horizontal => self.height,
            Orientation::Vertical => self.width,
        }
    }

    /// Leading edge (top or left) along the layout axis
    pub fn leading_edge(&self, orientation: Orientation) -> f64 {
        match orientation {
            Orientation::Horizontal => self.y,
            Orientation::Vertical => self.x,
        }
    }

    /// Cut a band out of this rectangle along the layout axis.
    ///
    /// `offset` is relative to the leading edge; the cross axis is kept whole.
    pub fn band(&self, orientation: Orientation, offset: f64, extent: f64) -> Rect {
        match orientation {
            Orientation::Horizontal => Rect {
                x: self.x,
                y: self.y + offset,
                width: self.width,
                height: extent,
            },
            Orientation::Vertical => Rect {
                x: self.x + offset,
                y: self.y,
                width: extent,
                height: self.height,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extent_follows_orientation() {
        let rect = Rect::new(10.0, 20.0, 400.0, 300.0);
        assert_eq!(rect.extent(Orientation::Vertical), 400.0);
        assert_eq!(rect.extent(Orientation::Horizontal), 300.0);
        assert_eq!(rect.leading_edge(Orientation::Vertical), 10.0);
        assert_eq!(rect.leading_edge(Orientation::Horizontal), 20.0);
    }

    #[test]
    fn band_keeps_cross_axis() {
        let rect = Rect::new(0.0, 0.0, 400.0, 300.0);

        let column = rect.band(Orientation::Vertical, 100.0, 50.0);
        assert_eq!(column, Rect::new(100.0, 0.0, 50.0, 300.0));

        let row = rect.band(Orientation::Horizontal, 100.0, 50.0);
        assert_eq!(row, Rect::new(0.0, 100.0, 400.0, 50.0));
    }

    #[test]
    fn contains_is_half_open() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect.contains(Point::new(0.0, 0.0)));
        assert!(rect.contains(Point::new(9.9, 9.9)));
        assert!(!rect.contains(Point::new(10.0, 5.0)));
    }

    #[test]
    fn cursor_matches_drag_direction() {
        assert_eq!(Orientation::Horizontal.resize_cursor(), "ns-resize");
        assert_eq!(Orientation::Vertical.resize_cursor(), "ew-resize");
    }
}
