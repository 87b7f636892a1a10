#![forbid(unsafe_code)]

use idp_tour::Router;
use js_sys::Function;
use wasm_bindgen::prelude::*;
use web_sys::{PopStateEvent, Window};

/// [`Router`] over the History API.
///
/// Navigation pushes a history entry and queues a `popstate` so client-side
/// routers that listen for it re-render. The event fires from a microtask,
/// after the engine call that navigated has returned, so a `popstate`
/// listener may call back into the tour.
#[derive(Debug, Clone)]
pub struct HistoryRouter {
    window: Window,
}

impl HistoryRouter {
    #[must_use]
    pub fn new(window: Window) -> Self {
        Self { window }
    }

    fn push(&self, route: &str) -> Result<(), JsValue> {
        self.window
            .history()?
            .push_state_with_url(&JsValue::NULL, "", Some(route))?;
        self.queue_popstate();
        Ok(())
    }

    fn queue_popstate(&self) {
        let window = self.window.clone();
        let notify = Closure::once_into_js(move || {
            let dispatched =
                PopStateEvent::new("popstate").and_then(|event| window.dispatch_event(&event));
            if let Err(e) = dispatched {
                tracing::warn!(error = ?e, "popstate dispatch failed");
            }
        });
        self.window.queue_microtask(notify.unchecked_ref::<Function>());
    }
}

impl Router for HistoryRouter {
    fn current_route(&self) -> String {
        self.window.location().pathname().unwrap_or_default()
    }

    fn navigate(&mut self, route: &str) {
        if let Err(e) = self.push(route) {
            tracing::warn!(route, error = ?e, "navigation request failed");
        }
    }
}
