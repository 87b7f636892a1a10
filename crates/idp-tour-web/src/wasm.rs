#![forbid(unsafe_code)]

use std::sync::Arc;

use idp_tour::{Host, SessionSnapshot, StorageBackend, TourConfig, TourEngine, TourSignals};
use idp_tour_runtime::START_TOUR_EVENT;
use wasm_bindgen::prelude::*;
use web_sys::{CustomEvent, Event, Window};

use crate::bridge::{self, TourSnapshot};
use crate::dom::BrowserDom;
use crate::router::HistoryRouter;
use crate::storage::LocalStorage;

type BrowserEngine = TourEngine<BrowserDom, HistoryRouter, SessionSnapshot>;

/// JS-facing tour controller.
///
/// The page drives it from its own loop:
/// - `tick(dtMs)` every animation frame; when it returns `true`, call
///   `frame()` on the next one,
/// - `action(name, key)` for button clicks,
/// - `setAuthenticated` / `setSession` when app state changes,
/// - `snapshot()` to read what to render.
///
/// `idp-start-tour` events dispatched on `window` are picked up on the next
/// `tick`.
#[wasm_bindgen]
pub struct IdpTourWeb {
    engine: BrowserEngine,
    window: Window,
    listener: Option<Closure<dyn FnMut(Event)>>,
}

#[wasm_bindgen]
impl IdpTourWeb {
    /// `locale` is `"es"` (default) or `"en"`.
    #[wasm_bindgen(constructor)]
    pub fn new(locale: Option<String>) -> Result<IdpTourWeb, JsValue> {
        let dom = BrowserDom::new().ok_or_else(|| JsValue::from_str("no window or document"))?;
        dom.clear_stale_highlights();
        let window = dom.window().clone();
        let router = HistoryRouter::new(window.clone());
        let storage: Arc<dyn StorageBackend> = Arc::new(LocalStorage::new());

        let mut config = TourConfig::default();
        if let Some(locale) = locale.and_then(|l| l.parse().ok()) {
            config = config.with_locale(locale);
        }

        let signals = TourSignals::new();
        let engine = TourEngine::with_config(
            Host::new(dom, router, SessionSnapshot::default()),
            storage,
            config,
        )
        .with_signals(&signals);

        let emitter = signals.emitter();
        let listener = Closure::wrap(Box::new(move |event: Event| {
            let detail = event
                .dyn_ref::<CustomEvent>()
                .and_then(|custom| custom.detail().as_string());
            emitter.emit(bridge::signal_from_detail(detail.as_deref()));
        }) as Box<dyn FnMut(Event)>);
        window.add_event_listener_with_callback(
            START_TOUR_EVENT,
            listener.as_ref().unchecked_ref(),
        )?;

        Ok(Self {
            engine,
            window,
            listener: Some(listener),
        })
    }

    /// Report whether a user is signed in.
    #[wasm_bindgen(js_name = setAuthenticated)]
    pub fn set_authenticated(&mut self, authenticated: bool) {
        self.engine.on_mount(authenticated);
    }

    /// Report upstream extraction state used by dynamic step bodies.
    #[wasm_bindgen(js_name = setSession)]
    pub fn set_session(&mut self, extracted_text: bool, processed_result: bool) {
        self.engine.host_mut().upstream = SessionSnapshot {
            extracted_text,
            processed_result,
        };
    }

    /// Forget completion so the welcome card shows again. Login flows call
    /// this before `setAuthenticated(true)`.
    #[wasm_bindgen(js_name = clearCompletion)]
    pub fn clear_completion(&self) {
        self.engine.completion().clear_completed();
    }

    /// Dispatch a control by name: `start`, `restart`, `next`, `prev`,
    /// `jump`, `finish`, `skip`, `dismiss`. Returns `false` for unknown names.
    pub fn action(&mut self, name: &str, key: Option<String>) -> bool {
        match bridge::parse_action(name, key) {
            Some(action) => {
                self.engine.handle(action);
                true
            }
            None => false,
        }
    }

    /// Apply pending start events and advance time. Returns `true` when the
    /// next animation frame should call `frame()`.
    pub fn tick(&mut self, dt_ms: f64) -> bool {
        self.engine.pump_signals();
        self.engine.advance_time(bridge::ms_to_duration(dt_ms))
    }

    /// Run the owed placement. Returns `true` if one ran.
    pub fn frame(&mut self) -> bool {
        self.engine.animation_frame().is_some()
    }

    /// Report a route change the engine did not request (back button, app
    /// links). Safe to wire to `popstate`: the engine's own navigation
    /// dispatches that event from a microtask, never while this object is in
    /// use. Do not call it synchronously from inside another method's
    /// callback.
    #[wasm_bindgen(js_name = routeChanged)]
    pub fn route_changed(&mut self) {
        self.engine.on_route_changed();
    }

    #[wasm_bindgen(js_name = viewportChanged)]
    pub fn viewport_changed(&mut self) {
        self.engine.on_viewport_changed();
    }

    /// Current render state as JSON.
    pub fn snapshot(&self) -> String {
        TourSnapshot::capture(&self.engine).to_json()
    }

    /// Detach the `idp-start-tour` listener.
    pub fn destroy(&mut self) {
        if let Some(listener) = self.listener.take() {
            let _ = self.window.remove_event_listener_with_callback(
                START_TOUR_EVENT,
                listener.as_ref().unchecked_ref(),
            );
        }
    }
}

impl Drop for IdpTourWeb {
    fn drop(&mut self) {
        self.destroy();
    }
}
