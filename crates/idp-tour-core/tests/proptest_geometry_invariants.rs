//! Property-based invariant tests for geometry primitives (Rect, Position,
//! Viewport).
//!
//! 1. Right/bottom edges are consistent with left+width, top+height.
//! 2. The viewport center is always visible.
//! 3. A box that fits the viewport is contained when anchored at the scroll
//!    origin, and not contained once pushed past either far edge.
//! 4. Offsetting a position is reversible.

use idp_tour_core::geometry::{Position, Rect, Size, Viewport};
use proptest::prelude::*;

fn viewport_strategy() -> impl Strategy<Value = Viewport> {
    (0.0f64..5000.0, 0.0f64..5000.0, 1.0f64..4000.0, 1.0f64..4000.0)
        .prop_map(|(sx, sy, w, h)| Viewport::new(w, h).with_scroll(sx, sy))
}

proptest! {
    #[test]
    fn rect_edges_consistent(
        top in -2000.0f64..2000.0,
        left in -2000.0f64..2000.0,
        width in 0.0f64..2000.0,
        height in 0.0f64..2000.0,
    ) {
        let rect = Rect::new(top, left, width, height);
        prop_assert!((rect.right() - (left + width)).abs() < 1e-9);
        prop_assert!((rect.bottom() - (top + height)).abs() < 1e-9);
        prop_assert!(rect.center_y() >= top && rect.center_y() <= rect.bottom());
    }
}

proptest! {
    #[test]
    fn viewport_center_is_visible(vp in viewport_strategy()) {
        prop_assert!(vp.contains_box(vp.center(), Size::new(0.0, 0.0)));
    }
}

proptest! {
    #[test]
    fn fitting_box_contained_at_origin(vp in viewport_strategy(), fw in 0.0f64..1.0, fh in 0.0f64..1.0) {
        let size = Size::new(vp.width * fw, vp.height * fh);
        let origin = Position::new(vp.scroll_y, vp.scroll_x);
        prop_assert!(vp.contains_box(origin, size));

        let past_right = origin.offset(0.0, vp.width - size.width + 1.0);
        prop_assert!(!vp.contains_box(past_right, size));
        let past_bottom = origin.offset(vp.height - size.height + 1.0, 0.0);
        prop_assert!(!vp.contains_box(past_bottom, size));
    }
}

proptest! {
    #[test]
    fn offset_roundtrip(top in -1e6f64..1e6, left in -1e6f64..1e6, dy in -1e3f64..1e3, dx in -1e3f64..1e3) {
        let pos = Position::new(top, left);
        let back = pos.offset(dy, dx).offset(-dy, -dx);
        prop_assert!((back.top - top).abs() < 1e-6);
        prop_assert!((back.left - left).abs() < 1e-6);
    }
}
