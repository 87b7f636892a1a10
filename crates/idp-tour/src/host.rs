#![forbid(unsafe_code)]

//! Capability traits the engine is injected with.
//!
//! The engine never touches a real page. Browser hosts implement these over
//! `web-sys`; tests use the doubles in [`crate::testing`].

use idp_tour_core::geometry::{Rect, Viewport};

/// The DOM boundary: resolve a locator to at most one live element.
pub trait ElementLocator {
    /// Current scroll offset and inner size of the window.
    fn viewport(&self) -> Viewport;

    /// Bounding box (client space) of the element `locator` resolves to, or
    /// `None` when nothing matches.
    fn bounding_rect(&self, locator: &str) -> Option<Rect>;

    /// Add (`on = true`) or remove the highlight marker on the element.
    /// Missing elements are ignored.
    fn set_highlight(&mut self, locator: &str, on: bool);

    /// Smoothly scroll the element into the center of the viewport.
    fn scroll_into_view(&mut self, locator: &str);
}

/// The route boundary. The engine reads and requests routes; it never owns
/// the route table.
pub trait Router {
    /// Path of the active route, e.g. `/extract`.
    fn current_route(&self) -> String;

    /// Request a route change. Fire-and-forget: the engine never checks
    /// whether it took effect.
    fn navigate(&mut self, route: &str);
}

/// Read-only signals from the document/extraction feature.
pub trait UpstreamState {
    /// Whether OCR produced any extracted text.
    fn has_extracted_text(&self) -> bool;

    /// Whether an extraction result has been processed.
    fn has_processed_result(&self) -> bool;
}

/// Plain snapshot of the upstream session, for hosts that push state in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionSnapshot {
    pub extracted_text: bool,
    pub processed_result: bool,
}

impl UpstreamState for SessionSnapshot {
    fn has_extracted_text(&self) -> bool {
        self.extracted_text
    }

    fn has_processed_result(&self) -> bool {
        self.processed_result
    }
}

/// The three collaborators an engine drives.
#[derive(Debug, Clone, Default)]
pub struct Host<D, R, U> {
    pub dom: D,
    pub router: R,
    pub upstream: U,
}

impl<D, R, U> Host<D, R, U> {
    /// Bundle the collaborators.
    pub fn new(dom: D, router: R, upstream: U) -> Self {
        Self {
            dom,
            router,
            upstream,
        }
    }
}
