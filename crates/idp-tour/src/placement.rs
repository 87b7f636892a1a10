#![forbid(unsafe_code)]

//! Popover placement relative to a step's target element.
//!
//! # Invariants
//!
//! 1. Every position returned by [`Placer::compute`] has been clamped to the
//!    viewport it was computed against.
//! 2. A missing target never fails: the popover falls back to the viewport
//!    center.
//! 3. When the viewport is too small for the clamp range to be non-empty,
//!    the lower bound (`scroll + margin`) wins so the card's top-left corner
//!    stays on screen.

use std::collections::HashMap;

use idp_tour_core::geometry::{Position, Rect, Size, Viewport};

use crate::catalog::TourStep;
use crate::error::TourFallback;
use crate::steps;

/// Where the popover sits relative to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Orientation {
    /// To the right, vertically centered on the target (navigation links).
    Right,
    /// Under the target's bottom edge (wide panels).
    Below,
    /// Under the target, aligned to its left edge.
    #[default]
    BelowLeft,
}

impl Orientation {
    /// Edge of the card its arrow points from.
    #[must_use]
    pub const fn popover_side(self) -> PopoverSide {
        match self {
            Orientation::Right => PopoverSide::Left,
            Orientation::Below | Orientation::BelowLeft => PopoverSide::Top,
        }
    }
}

/// Arrow side of the popover card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PopoverSide {
    Left,
    Top,
}

impl PopoverSide {
    /// CSS class the card carries.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            PopoverSide::Left => "left",
            PopoverSide::Top => "top",
        }
    }
}

/// Orientation lookup keyed by locator. Unlisted locators use
/// [`Orientation::BelowLeft`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrientationTable {
    entries: HashMap<String, Orientation>,
}

impl Default for OrientationTable {
    fn default() -> Self {
        let right = [
            steps::NAV_LINKS,
            steps::NAV_EXTRACT,
            steps::NAV_CHAT_DOC,
            steps::NAV_CHAT_DB,
            steps::NAV_CHARTS,
            steps::NAV_TOKENS,
        ];
        let below = [
            steps::CHAT_DB_FORM,
            steps::CHAT_DB_ANSWER,
            steps::CHARTS_FORM,
            steps::CHARTS_RESULT,
        ];
        right
            .iter()
            .map(|l| (*l, Orientation::Right))
            .chain(below.iter().map(|l| (*l, Orientation::Below)))
            .fold(Self::empty(), |table, (locator, o)| table.with(locator, o))
    }
}

impl OrientationTable {
    /// A table with no entries.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Register `orientation` for `locator`.
    #[must_use]
    pub fn with(mut self, locator: impl Into<String>, orientation: Orientation) -> Self {
        self.entries.insert(locator.into(), orientation);
        self
    }

    /// Orientation for `locator`.
    #[must_use]
    pub fn orientation_for(&self, locator: &str) -> Orientation {
        self.entries.get(locator).copied().unwrap_or_default()
    }
}

/// Placement constants, all in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementConfig {
    /// Minimum distance kept from every viewport edge (default: 24).
    pub margin: f64,
    /// Assumed card size used for the far clamp bound (default: 196×196).
    pub popover: Size,
    /// Subtracted from the viewport center to center the card (default: 120).
    pub center_offset_top: f64,
    /// Subtracted from the viewport center to center the card (default: 160).
    pub center_offset_left: f64,
    /// Horizontal gap for [`Orientation::Right`] (default: 20).
    pub right_gap: f64,
    /// Lift above the target's vertical center for [`Orientation::Right`]
    /// (default: 80).
    pub right_lift: f64,
    /// Vertical gap for the below orientations (default: 12).
    pub below_gap: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            margin: 24.0,
            popover: Size::new(196.0, 196.0),
            center_offset_top: 120.0,
            center_offset_left: 160.0,
            right_gap: 20.0,
            right_lift: 80.0,
            below_gap: 12.0,
        }
    }
}

/// Result of one placement computation.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// Clamped, document-space position.
    pub position: Position,
    pub orientation: Orientation,
    /// Set when the target was missing.
    pub fallback: Option<TourFallback>,
}

/// Computes popover positions.
#[derive(Debug, Clone, Default)]
pub struct Placer {
    config: PlacementConfig,
    orientations: OrientationTable,
}

impl Placer {
    /// Create a placer with the given constants and the default table.
    #[must_use]
    pub fn new(config: PlacementConfig) -> Self {
        Self {
            config,
            orientations: OrientationTable::default(),
        }
    }

    /// Replace the orientation table.
    #[must_use]
    pub fn with_orientations(mut self, orientations: OrientationTable) -> Self {
        self.orientations = orientations;
        self
    }

    #[must_use]
    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    #[must_use]
    pub fn orientations(&self) -> &OrientationTable {
        &self.orientations
    }

    /// Position the popover for `step`.
    ///
    /// `target` is the element's client-space bounding box, or `None` if the
    /// locator matched nothing.
    #[must_use]
    pub fn compute(&self, step: &TourStep, target: Option<Rect>, viewport: &Viewport) -> Placement {
        let orientation = self.orientations.orientation_for(&step.locator);
        let Some(rect) = target else {
            return Placement {
                position: self.clamp_position(self.centered_default(viewport), viewport),
                orientation,
                fallback: Some(TourFallback::TargetNotFound {
                    locator: step.locator.to_string(),
                }),
            };
        };

        let c = &self.config;
        let raw = match orientation {
            Orientation::Right => Position::new(
                rect.center_y() + viewport.scroll_y - c.right_lift,
                rect.right() + viewport.scroll_x + c.right_gap,
            ),
            Orientation::Below | Orientation::BelowLeft => Position::new(
                rect.bottom() + viewport.scroll_y + c.below_gap,
                rect.left + viewport.scroll_x,
            ),
        };
        Placement {
            position: self.clamp_position(raw, viewport),
            orientation,
            fallback: None,
        }
    }

    /// Unclamped position that centers the card in the viewport.
    #[must_use]
    pub fn centered_default(&self, viewport: &Viewport) -> Position {
        let center = viewport.center();
        center.offset(-self.config.center_offset_top, -self.config.center_offset_left)
    }

    /// Bound `position` so the card stays inside the viewport.
    #[must_use]
    pub fn clamp_position(&self, position: Position, viewport: &Viewport) -> Position {
        let c = &self.config;
        let top = clamp_axis(
            position.top,
            viewport.scroll_y + c.margin,
            viewport.scroll_y + viewport.height - c.popover.height - c.margin,
        );
        let left = clamp_axis(
            position.left,
            viewport.scroll_x + c.margin,
            viewport.scroll_x + viewport.width - c.popover.width - c.margin,
        );
        Position::new(top, left)
    }
}

/// `value.min(max).max(min)`: the lower bound wins when `min > max`.
#[inline]
fn clamp_axis(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StepCatalog;

    fn step_for(locator: &'static str) -> TourStep {
        TourStep::new(locator, "t", "b")
    }

    #[test]
    fn default_table_matches_product_layout() {
        let table = OrientationTable::default();
        assert_eq!(table.orientation_for(steps::NAV_TOKENS), Orientation::Right);
        assert_eq!(table.orientation_for(steps::CHARTS_FORM), Orientation::Below);
        assert_eq!(table.orientation_for(steps::UPLOAD), Orientation::BelowLeft);
        assert_eq!(table.orientation_for("#unknown"), Orientation::BelowLeft);
    }

    #[test]
    fn right_orientation_math() {
        let placer = Placer::default();
        let vp = Viewport::new(1280.0, 800.0).with_scroll(0.0, 100.0);
        let rect = Rect::new(200.0, 10.0, 150.0, 40.0);
        let p = placer.compute(&step_for(steps::NAV_EXTRACT), Some(rect), &vp);
        // top = 200 + 100 + 20 - 80, left = 160 + 20
        assert_eq!(p.position, Position::new(240.0, 180.0));
        assert_eq!(p.orientation, Orientation::Right);
        assert!(p.fallback.is_none());
    }

    #[test]
    fn right_orientation_adds_horizontal_scroll() {
        let placer = Placer::default();
        let vp = Viewport::new(1280.0, 800.0).with_scroll(30.0, 0.0);
        let rect = Rect::new(200.0, 10.0, 150.0, 40.0);
        let p = placer.compute(&step_for(steps::NAV_CHARTS), Some(rect), &vp);
        assert_eq!(p.position, Position::new(140.0, 210.0));
    }

    #[test]
    fn below_orientation_math() {
        let placer = Placer::default();
        let vp = Viewport::new(1280.0, 800.0).with_scroll(30.0, 50.0);
        let rect = Rect::new(100.0, 300.0, 400.0, 120.0);
        let p = placer.compute(&step_for(steps::CHAT_DB_FORM), Some(rect), &vp);
        assert_eq!(p.position, Position::new(282.0, 330.0));
        let q = placer.compute(&step_for(steps::UPLOAD), Some(rect), &vp);
        assert_eq!(q.position, p.position);
        assert_eq!(q.orientation, Orientation::BelowLeft);
    }

    #[test]
    fn missing_target_centers() {
        let placer = Placer::default();
        let vp = Viewport::new(1280.0, 800.0);
        let p = placer.compute(&step_for(steps::UPLOAD), None, &vp);
        assert_eq!(p.position, Position::new(280.0, 480.0));
        assert_eq!(
            p.fallback,
            Some(TourFallback::TargetNotFound {
                locator: steps::UPLOAD.to_string()
            })
        );
    }

    #[test]
    fn clamp_respects_margins() {
        let placer = Placer::default();
        let vp = Viewport::new(1000.0, 700.0).with_scroll(0.0, 500.0);
        let low = placer.clamp_position(Position::new(0.0, -50.0), &vp);
        assert_eq!(low, Position::new(524.0, 24.0));
        let high = placer.clamp_position(Position::new(5000.0, 5000.0), &vp);
        assert_eq!(high, Position::new(500.0 + 700.0 - 220.0, 1000.0 - 220.0));
    }

    #[test]
    fn tiny_viewport_lower_bound_wins() {
        let placer = Placer::default();
        let vp = Viewport::new(200.0, 150.0).with_scroll(10.0, 20.0);
        let p = placer.clamp_position(Position::new(900.0, 900.0), &vp);
        assert_eq!(p, Position::new(44.0, 34.0));
    }

    #[test]
    fn side_follows_orientation() {
        assert_eq!(Orientation::Right.popover_side(), PopoverSide::Left);
        assert_eq!(Orientation::Below.popover_side().css_class(), "top");
        assert_eq!(Orientation::BelowLeft.popover_side(), PopoverSide::Top);
    }

    #[test]
    fn custom_table_overrides() {
        let placer = Placer::default()
            .with_orientations(OrientationTable::empty().with("#x", Orientation::Right));
        assert_eq!(placer.orientations().orientation_for("#x"), Orientation::Right);
        assert_eq!(
            placer.orientations().orientation_for(steps::NAV_LINKS),
            Orientation::BelowLeft
        );
    }

    #[test]
    fn all_default_steps_place_inside_viewport() {
        let placer = Placer::default();
        let vp = Viewport::new(1280.0, 800.0);
        let card = placer.config().popover;
        for step in &StepCatalog::default() {
            let rect = Rect::new(40.0, 40.0, 200.0, 60.0);
            let p = placer.compute(step, Some(rect), &vp);
            assert!(vp.contains_box(p.position, card), "{}", step.locator);
        }
    }
}
