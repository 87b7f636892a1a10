//! Property-based invariant tests for popover placement.
//!
//! 1. For viewports of at least 320×480, every step's popover lies fully
//!    inside the visible viewport, whatever the target's geometry or the
//!    scroll offset.
//! 2. Clamping is idempotent.
//! 3. A missing target always yields the clamped center.

use idp_tour::{Placer, Position, Rect, StepCatalog, Viewport};
use proptest::prelude::*;

fn viewport_strategy() -> impl Strategy<Value = Viewport> {
    (320.0f64..2560.0, 480.0f64..1600.0, 0.0f64..5000.0, 0.0f64..20000.0)
        .prop_map(|(w, h, sx, sy)| Viewport::new(w, h).with_scroll(sx, sy))
}

fn rect_strategy() -> impl Strategy<Value = Rect> {
    (-3000.0f64..3000.0, -3000.0f64..3000.0, 0.0f64..2000.0, 0.0f64..2000.0)
        .prop_map(|(top, left, w, h)| Rect::new(top, left, w, h))
}

proptest! {
    #[test]
    fn popover_stays_visible(
        viewport in viewport_strategy(),
        rect in proptest::option::of(rect_strategy()),
        step_index in 0usize..14,
    ) {
        let placer = Placer::default();
        let catalog = StepCatalog::default();
        let step = catalog.step_at(step_index).unwrap();
        let placement = placer.compute(step, rect, &viewport);
        prop_assert!(placement.position.is_finite());
        prop_assert!(
            viewport.contains_box(placement.position, placer.config().popover),
            "{:?} escaped {:?}",
            placement.position,
            viewport
        );
    }

    #[test]
    fn clamp_is_idempotent(
        viewport in viewport_strategy(),
        top in -10000.0f64..10000.0,
        left in -10000.0f64..10000.0,
    ) {
        let placer = Placer::default();
        let once = placer.clamp_position(Position::new(top, left), &viewport);
        let twice = placer.clamp_position(once, &viewport);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn missing_target_is_clamped_center(viewport in viewport_strategy(), step_index in 0usize..14) {
        let placer = Placer::default();
        let catalog = StepCatalog::default();
        let step = catalog.step_at(step_index).unwrap();
        let placement = placer.compute(step, None, &viewport);
        let expected = placer.clamp_position(placer.centered_default(&viewport), &viewport);
        prop_assert_eq!(placement.position, expected);
        prop_assert!(placement.fallback.is_some());
    }
}
