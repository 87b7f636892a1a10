#![forbid(unsafe_code)]

use idp_tour::{ElementLocator, HIGHLIGHT_CLASS, Rect, Viewport};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition, Window,
};

/// [`ElementLocator`] over the live document.
#[derive(Debug, Clone)]
pub struct BrowserDom {
    window: Window,
    document: Document,
}

impl BrowserDom {
    /// `None` outside a window context (e.g. a worker).
    #[must_use]
    pub fn new() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self { window, document })
    }

    #[must_use]
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Strip the highlight class from every element, e.g. after a reload left
    /// markup behind.
    pub fn clear_stale_highlights(&self) {
        let selector = format!(".{HIGHLIGHT_CLASS}");
        let Ok(nodes) = self.document.query_selector_all(&selector) else {
            return;
        };
        for i in 0..nodes.length() {
            if let Some(node) = nodes.item(i)
                && let Ok(element) = node.dyn_into::<Element>()
            {
                let _ = element.class_list().remove_1(HIGHLIGHT_CLASS);
            }
        }
    }

    fn element(&self, locator: &str) -> Option<Element> {
        match self.document.query_selector(locator) {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(locator, error = ?e, "invalid tour locator");
                None
            }
        }
    }
}

impl ElementLocator for BrowserDom {
    fn viewport(&self) -> Viewport {
        let dimension = |v: Result<JsValue, JsValue>| {
            v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
        };
        Viewport::new(
            dimension(self.window.inner_width()),
            dimension(self.window.inner_height()),
        )
        .with_scroll(
            self.window.scroll_x().unwrap_or(0.0),
            self.window.scroll_y().unwrap_or(0.0),
        )
    }

    fn bounding_rect(&self, locator: &str) -> Option<Rect> {
        let rect = self.element(locator)?.get_bounding_client_rect();
        Some(Rect::new(rect.top(), rect.left(), rect.width(), rect.height()))
    }

    fn set_highlight(&mut self, locator: &str, on: bool) {
        let Some(element) = self.element(locator) else {
            return;
        };
        let classes = element.class_list();
        let result = if on {
            classes.add_1(HIGHLIGHT_CLASS)
        } else {
            classes.remove_1(HIGHLIGHT_CLASS)
        };
        if let Err(e) = result {
            tracing::warn!(locator, on, error = ?e, "failed to toggle highlight");
        }
    }

    fn scroll_into_view(&mut self, locator: &str) {
        let Some(element) = self.element(locator) else {
            return;
        };
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_block(ScrollLogicalPosition::Center);
        element.scroll_into_view_with_scroll_into_view_options(&options);
    }
}
