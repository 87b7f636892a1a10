#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! All values are CSS pixels. Two coordinate spaces are in play:
//!
//! - **client space**: relative to the top-left of the visible viewport, the
//!   space `getBoundingClientRect()` reports in ([`Rect`]).
//! - **document space**: relative to the top-left of the whole page, i.e.
//!   client space plus the current scroll offset ([`Position`]).

/// A point in document space, expressed the way CSS absolute positioning
/// expects it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Position {
    /// Distance from the top edge of the document.
    pub top: f64,
    /// Distance from the left edge of the document.
    pub left: f64,
}

impl Position {
    /// Create a new position.
    #[inline]
    pub const fn new(top: f64, left: f64) -> Self {
        Self { top, left }
    }

    /// Translate by the given deltas.
    #[inline]
    #[must_use]
    pub fn offset(self, dy: f64, dx: f64) -> Self {
        Self {
            top: self.top + dy,
            left: self.left + dx,
        }
    }

    /// Whether both coordinates are finite numbers.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.top.is_finite() && self.left.is_finite()
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// An element's bounding box in client space (mirrors a DOM `DOMRect`).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Rect {
    /// Top edge relative to the viewport.
    pub top: f64,
    /// Left edge relative to the viewport.
    pub left: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Vertical midpoint.
    #[inline]
    pub fn center_y(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

/// The visible window onto the document: scroll offset plus inner size.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Viewport {
    /// Horizontal scroll offset (`window.scrollX`).
    pub scroll_x: f64,
    /// Vertical scroll offset (`window.scrollY`).
    pub scroll_y: f64,
    /// Inner width (`window.innerWidth`).
    pub width: f64,
    /// Inner height (`window.innerHeight`).
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 800.0)
    }
}

impl Viewport {
    /// Create an unscrolled viewport of the given size.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self {
            scroll_x: 0.0,
            scroll_y: 0.0,
            width,
            height,
        }
    }

    /// Set the scroll offset.
    #[inline]
    #[must_use]
    pub const fn with_scroll(mut self, scroll_x: f64, scroll_y: f64) -> Self {
        self.scroll_x = scroll_x;
        self.scroll_y = scroll_y;
        self
    }

    /// Document-space center of the visible area.
    #[inline]
    pub fn center(&self) -> Position {
        Position::new(
            self.scroll_y + self.height / 2.0,
            self.scroll_x + self.width / 2.0,
        )
    }

    /// Check whether a box of `size` anchored at `pos` is fully visible.
    pub fn contains_box(&self, pos: Position, size: Size) -> bool {
        pos.left >= self.scroll_x
            && pos.top >= self.scroll_y
            && pos.left + size.width <= self.scroll_x + self.width
            && pos.top + size.height <= self.scroll_y + self.height
    }
}

#[cfg(test)]
mod tests {
    use super::{Position, Rect, Size, Viewport};

    #[test]
    fn rect_edges() {
        let rect = Rect::new(10.0, 20.0, 100.0, 40.0);
        assert_eq!(rect.right(), 120.0);
        assert_eq!(rect.bottom(), 50.0);
        assert_eq!(rect.center_y(), 30.0);
    }

    #[test]
    fn position_offset() {
        let pos = Position::new(5.0, 7.0).offset(-2.0, 3.0);
        assert_eq!(pos, Position::new(3.0, 10.0));
    }

    #[test]
    fn position_finite() {
        assert!(Position::new(1.0, 2.0).is_finite());
        assert!(!Position::new(f64::NAN, 2.0).is_finite());
        assert!(!Position::new(1.0, f64::INFINITY).is_finite());
    }

    #[test]
    fn viewport_center_includes_scroll() {
        let vp = Viewport::new(800.0, 600.0).with_scroll(10.0, 300.0);
        assert_eq!(vp.center(), Position::new(600.0, 410.0));
    }

    #[test]
    fn viewport_contains_box_edges() {
        let vp = Viewport::new(320.0, 480.0).with_scroll(0.0, 100.0);
        let size = Size::new(100.0, 100.0);
        assert!(vp.contains_box(Position::new(100.0, 0.0), size));
        assert!(vp.contains_box(Position::new(480.0, 220.0), size));
        assert!(!vp.contains_box(Position::new(99.0, 0.0), size));
        assert!(!vp.contains_box(Position::new(481.0, 0.0), size));
        assert!(!vp.contains_box(Position::new(200.0, 221.0), size));
    }
}
