#![forbid(unsafe_code)]

//! Deterministic in-memory doubles for the host boundaries.
//!
//! These let the engine run end to end without a browser: elements are
//! registered by locator with a fixed bounding box, and navigation is a
//! plain route string with a request log.

use std::collections::{BTreeSet, HashMap};

use idp_tour_core::geometry::{Rect, Viewport};

use crate::host::{ElementLocator, Router};

/// In-memory DOM: locator → bounding box.
#[derive(Debug, Clone, Default)]
pub struct FakeDom {
    viewport: Viewport,
    elements: HashMap<String, Rect>,
    highlighted: BTreeSet<String>,
    scrolled: Vec<String>,
}

impl FakeDom {
    /// Empty page with the given viewport.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    /// Register an element.
    #[must_use]
    pub fn with_element(mut self, locator: impl Into<String>, rect: Rect) -> Self {
        self.insert(locator, rect);
        self
    }

    pub fn insert(&mut self, locator: impl Into<String>, rect: Rect) {
        self.elements.insert(locator.into(), rect);
    }

    /// Detach an element. A highlight it carried goes with it.
    pub fn remove(&mut self, locator: &str) {
        self.elements.remove(locator);
        self.highlighted.remove(locator);
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Locators currently carrying the highlight marker, sorted.
    #[must_use]
    pub fn highlighted(&self) -> Vec<&str> {
        self.highlighted.iter().map(String::as_str).collect()
    }

    /// Every locator scrolled into view, in order.
    #[must_use]
    pub fn scrolled(&self) -> &[String] {
        &self.scrolled
    }
}

impl ElementLocator for FakeDom {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn bounding_rect(&self, locator: &str) -> Option<Rect> {
        self.elements.get(locator).copied()
    }

    fn set_highlight(&mut self, locator: &str, on: bool) {
        if !self.elements.contains_key(locator) {
            return;
        }
        if on {
            self.highlighted.insert(locator.to_owned());
        } else {
            self.highlighted.remove(locator);
        }
    }

    fn scroll_into_view(&mut self, locator: &str) {
        if self.elements.contains_key(locator) {
            self.scrolled.push(locator.to_owned());
        }
    }
}

/// In-memory router with a log of navigation requests.
#[derive(Debug, Clone, Default)]
pub struct FakeRouter {
    current: String,
    history: Vec<String>,
    stuck: bool,
}

impl FakeRouter {
    /// Router sitting on `route`.
    #[must_use]
    pub fn at(route: impl Into<String>) -> Self {
        Self {
            current: route.into(),
            ..Self::default()
        }
    }

    /// Router that records requests but never changes route.
    #[must_use]
    pub fn stuck_at(route: impl Into<String>) -> Self {
        Self {
            stuck: true,
            ..Self::at(route)
        }
    }

    /// Move without going through the engine, e.g. a user clicking a link.
    pub fn set_route(&mut self, route: impl Into<String>) {
        self.current = route.into();
    }

    /// Routes requested through [`Router::navigate`], in order.
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.history
    }
}

impl Router for FakeRouter {
    fn current_route(&self) -> String {
        self.current.clone()
    }

    fn navigate(&mut self, route: &str) {
        self.history.push(route.to_owned());
        if !self.stuck {
            self.current = route.to_owned();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dom_ignores_unknown_elements() {
        let mut dom = FakeDom::new(Viewport::default()).with_element("#a", Rect::new(0.0, 0.0, 10.0, 10.0));
        dom.set_highlight("#missing", true);
        dom.scroll_into_view("#missing");
        dom.set_highlight("#a", true);
        assert_eq!(dom.highlighted(), ["#a"]);
        assert!(dom.scrolled().is_empty());
        dom.remove("#a");
        assert!(dom.highlighted().is_empty());
    }

    #[test]
    fn stuck_router_logs_but_stays() {
        let mut router = FakeRouter::stuck_at("/");
        router.navigate("/extract");
        assert_eq!(router.current_route(), "/");
        assert_eq!(router.history(), ["/extract"]);
    }
}
