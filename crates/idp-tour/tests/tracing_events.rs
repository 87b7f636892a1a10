//! Log assertions: the engine reports fallbacks and transitions through
//! `tracing` with structured fields.

use std::sync::{Arc, Mutex};

use idp_tour::testing::{FakeDom, FakeRouter};
use idp_tour::{Host, MemoryStorage, SessionSnapshot, TourEngine, Viewport};
use tracing::Subscriber;
use tracing::field::{Field, Visit};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};

#[derive(Debug, Clone, Default)]
struct Captured {
    message: String,
    fields: Vec<(String, String)>,
}

impl Captured {
    fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Default)]
struct CaptureVisitor(Captured);

impl Visit for CaptureVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.fields.push((field.name().to_string(), value.to_string()));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.0.fields.push((field.name().to_string(), value.to_string()));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.0.fields.push((field.name().to_string(), value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0.message = format!("{value:?}");
        } else {
            self.0.fields.push((field.name().to_string(), format!("{value:?}")));
        }
    }
}

#[derive(Clone, Default)]
struct CaptureLayer {
    events: Arc<Mutex<Vec<Captured>>>,
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        if !event.metadata().target().starts_with("idp_tour") {
            return;
        }
        let mut visitor = CaptureVisitor::default();
        event.record(&mut visitor);
        if let Ok(mut events) = self.events.lock() {
            events.push(visitor.0);
        }
    }
}

fn capture<F: FnOnce()>(f: F) -> Vec<Captured> {
    let layer = CaptureLayer::default();
    let events = Arc::clone(&layer.events);
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    let captured = events.lock().map(|e| e.clone()).unwrap_or_default();
    captured
}

fn engine_at(route: &str) -> TourEngine<FakeDom, FakeRouter, SessionSnapshot> {
    let host = Host::new(
        FakeDom::new(Viewport::default()),
        FakeRouter::at(route),
        SessionSnapshot::default(),
    );
    TourEngine::new(host, Arc::new(MemoryStorage::new()))
}

#[test]
fn missing_target_is_logged_as_fallback() {
    let events = capture(|| {
        let mut engine = engine_at("/");
        engine.start();
        if engine.advance_time(std::time::Duration::from_millis(150)) {
            engine.animation_frame();
        }
    });
    let fallback = events
        .iter()
        .find(|e| e.message == "placement fell back")
        .expect("fallback event");
    let text = fallback.field("fallback").unwrap_or_default();
    assert!(text.contains("target not found"), "{text}");
    assert!(text.contains("nav-links"), "{text}");
}

#[test]
fn unknown_key_is_logged() {
    let events = capture(|| {
        let mut engine = engine_at("/");
        engine.restart(Some("nope"));
    });
    assert!(
        events
            .iter()
            .any(|e| e.message == "step key lookup fell back"
                && e.field("fallback").is_some_and(|f| f.contains("nope")))
    );
}

#[test]
fn navigation_carries_route_fields() {
    let events = capture(|| {
        let mut engine = engine_at("/somewhere");
        engine.restart(Some("charts"));
    });
    let nav = events
        .iter()
        .find(|e| e.message == "navigating for tour step")
        .expect("navigation event");
    assert_eq!(nav.field("from"), Some("/somewhere"));
    assert_eq!(nav.field("to"), Some("/charts"));

    let scheduled = events
        .iter()
        .find(|e| e.message == "placement scheduled")
        .expect("schedule event");
    assert_eq!(scheduled.field("settle_ms"), Some("450"));
    assert_eq!(scheduled.field("navigated"), Some("true"));
}
