#![forbid(unsafe_code)]

//! Host-driven tour engine.
//!
//! [`TourEngine`] composes the state machine, navigation sync, placement and
//! the overlay without threads or timers of its own. The host drives it:
//!
//! 1. Report authentication via [`TourEngine::on_mount`].
//! 2. Forward user actions ([`TourEngine::handle`]) and start signals
//!    ([`TourEngine::pump_signals`]).
//! 3. Advance time via [`TourEngine::advance_time`]; when it returns `true`,
//!    call [`TourEngine::animation_frame`] on the next frame.
//! 4. Render [`TourEngine::overlay`] and [`TourEngine::prompt`].
//!
//! # Example
//!
//! ```
//! use core::time::Duration;
//! use std::sync::Arc;
//!
//! use idp_tour::testing::{FakeDom, FakeRouter};
//! use idp_tour::{Host, SessionSnapshot, TourEngine};
//! use idp_tour_core::geometry::Viewport;
//! use idp_tour_runtime::MemoryStorage;
//!
//! let host = Host::new(
//!     FakeDom::new(Viewport::default()),
//!     FakeRouter::at("/"),
//!     SessionSnapshot::default(),
//! );
//! let mut engine = TourEngine::new(host, Arc::new(MemoryStorage::new()));
//! engine.on_mount(true);
//! assert!(engine.prompt().is_some());
//!
//! engine.start();
//! if engine.advance_time(Duration::from_millis(150)) {
//!     engine.animation_frame();
//! }
//! assert_eq!(engine.overlay().map(|v| v.progress), Some("Paso 1 de 14".into()));
//! ```

use core::time::Duration;
use std::sync::Arc;

use idp_tour_core::geometry::Position;
use idp_tour_runtime::{
    CompletionFlag, Deferral, DeterministicClock, SignalSubscription, StorageBackend, TourSignals,
};

use crate::catalog::StepCatalog;
use crate::config::TourConfig;
use crate::host::{ElementLocator, Host, Router, UpstreamState};
use crate::machine::{TourAdvanceReason, TourMachine, TourMode, TourTransition};
use crate::navigation::NavigationSync;
use crate::overlay::{self, OverlayLabels, OverlayView, PromptView};
use crate::placement::{Placement, Placer};

/// A user-facing control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TourAction {
    /// "Iniciar tour" on the welcome card.
    Start,
    /// Re-enter at an optional step key.
    Restart(Option<String>),
    Next,
    Prev,
    JumpTo(String),
    Finish,
    /// "Omitir" on the welcome card.
    Skip,
    /// Close control.
    Dismiss,
}

/// The running tour for one app session.
pub struct TourEngine<D, R, U> {
    machine: TourMachine,
    placer: Placer,
    navigation: NavigationSync,
    deferral: Deferral,
    clock: DeterministicClock,
    subscription: Option<SignalSubscription>,
    labels: OverlayLabels,
    authenticated: bool,
    host: Host<D, R, U>,
}

impl<D, R, U> TourEngine<D, R, U>
where
    D: ElementLocator,
    R: Router,
    U: UpstreamState,
{
    /// Engine over the IDP catalog with default configuration.
    #[must_use]
    pub fn new(host: Host<D, R, U>, storage: Arc<dyn StorageBackend>) -> Self {
        Self::with_config(host, storage, TourConfig::default())
    }

    /// Engine over the IDP catalog with `config`.
    #[must_use]
    pub fn with_config(
        host: Host<D, R, U>,
        storage: Arc<dyn StorageBackend>,
        config: TourConfig,
    ) -> Self {
        let completion = CompletionFlag::with_key(storage, config.storage_key);
        Self {
            machine: TourMachine::new(Arc::new(StepCatalog::default()), completion),
            placer: Placer::new(config.placement),
            navigation: NavigationSync::new(config.settle),
            deferral: Deferral::new(),
            clock: DeterministicClock::new(),
            subscription: None,
            labels: config.locale.labels(),
            authenticated: false,
            host,
        }
    }

    /// Replace the step catalog. Resets the tour to `Idle`.
    #[must_use]
    pub fn with_catalog(mut self, catalog: Arc<StepCatalog>) -> Self {
        let completion = self.machine.completion().clone();
        self.machine = TourMachine::new(catalog, completion);
        self.deferral.cancel();
        self
    }

    /// Replace the placer, e.g. to install a custom orientation table.
    #[must_use]
    pub fn with_placer(mut self, placer: Placer) -> Self {
        self.placer = placer;
        self
    }

    #[must_use]
    pub fn with_labels(mut self, labels: OverlayLabels) -> Self {
        self.labels = labels;
        self
    }

    /// Listen to `signals` for the engine's lifetime.
    #[must_use]
    pub fn with_signals(mut self, signals: &TourSignals) -> Self {
        self.subscription = Some(signals.subscribe());
        self
    }

    // ── Accessors ───────────────────────────────────────────────────────

    #[must_use]
    pub fn machine(&self) -> &TourMachine {
        &self.machine
    }

    #[must_use]
    pub fn mode(&self) -> TourMode {
        self.machine.mode()
    }

    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.machine.current_index()
    }

    #[must_use]
    pub fn popover_position(&self) -> Option<Position> {
        self.machine.popover_position()
    }

    #[must_use]
    pub fn completion(&self) -> &CompletionFlag {
        self.machine.completion()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    #[must_use]
    pub fn host(&self) -> &Host<D, R, U> {
        &self.host
    }

    /// Mutable host access. Call [`on_route_changed`](Self::on_route_changed)
    /// or [`on_viewport_changed`](Self::on_viewport_changed) after moving
    /// things behind the engine's back.
    pub fn host_mut(&mut self) -> &mut Host<D, R, U> {
        &mut self.host
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Whether the host owes the engine an animation frame.
    #[must_use]
    pub fn wants_frame(&self) -> bool {
        self.deferral.wants_frame()
    }

    /// Whether a placement is scheduled or awaiting a frame.
    #[must_use]
    pub fn has_pending_placement(&self) -> bool {
        self.deferral.is_pending()
    }

    // ── Inputs ──────────────────────────────────────────────────────────

    /// Report the current authentication state.
    pub fn on_mount(&mut self, authenticated: bool) {
        self.authenticated = authenticated;
        if let Some(transition) = self.machine.on_mount(authenticated) {
            self.apply(transition);
        }
    }

    pub fn start(&mut self) {
        let transition = self.machine.start();
        self.apply(transition);
    }

    pub fn restart(&mut self, key: Option<&str>) {
        let transition = self.machine.restart(key);
        self.apply(transition);
    }

    pub fn next(&mut self) {
        if let Some(transition) = self.machine.next() {
            self.apply(transition);
        }
    }

    pub fn prev(&mut self) {
        if let Some(transition) = self.machine.prev() {
            self.apply(transition);
        }
    }

    pub fn jump_to_key(&mut self, key: &str) {
        if let Some(transition) = self.machine.jump_to_key(key) {
            self.apply(transition);
        }
    }

    pub fn finish(&mut self) {
        let transition = self.machine.finish();
        self.apply(transition);
    }

    pub fn skip(&mut self) {
        let transition = self.machine.skip();
        self.apply(transition);
    }

    pub fn dismiss(&mut self) {
        let transition = self.machine.dismiss();
        self.apply(transition);
    }

    /// Dispatch a control.
    pub fn handle(&mut self, action: TourAction) {
        match action {
            TourAction::Start => self.start(),
            TourAction::Restart(key) => self.restart(key.as_deref()),
            TourAction::Next => self.next(),
            TourAction::Prev => self.prev(),
            TourAction::JumpTo(key) => self.jump_to_key(&key),
            TourAction::Finish => self.finish(),
            TourAction::Skip => self.skip(),
            TourAction::Dismiss => self.dismiss(),
        }
    }

    /// Apply every start signal received since the last call. Each one
    /// restarts the tour; the last one wins. Returns how many were applied.
    pub fn pump_signals(&mut self) -> usize {
        let Some(subscription) = &self.subscription else {
            return 0;
        };
        let signals = subscription.drain();
        for signal in &signals {
            tracing::debug!(step_key = ?signal.step_key(), "start-tour signal received");
            self.restart(signal.step_key());
        }
        signals.len()
    }

    /// Advance the clock. Returns `true` if an animation frame is owed.
    pub fn advance_time(&mut self, dt: Duration) -> bool {
        self.clock.advance(dt);
        self.deferral.poll(self.clock.now())
    }

    /// Set the clock to an absolute time. Returns `true` if an animation
    /// frame is owed.
    pub fn set_time(&mut self, now: Duration) -> bool {
        self.clock.set(now);
        self.deferral.poll(self.clock.now())
    }

    /// Run the owed placement, if any.
    pub fn animation_frame(&mut self) -> Option<Placement> {
        let generation = self.deferral.take_frame()?;
        tracing::trace!(generation = generation.get(), "placement frame");
        self.place_current()
    }

    /// The route changed outside the engine (back button, link click).
    /// While active this re-synchronizes the current step.
    pub fn on_route_changed(&mut self) {
        if self.machine.is_active() {
            self.sync_current();
        }
    }

    /// Scroll or resize invalidated the popover position.
    pub fn on_viewport_changed(&mut self) {
        if self.machine.is_active() {
            let delay = self.navigation.delays().same_route;
            self.deferral.schedule(self.clock.now(), delay);
        }
    }

    // ── Outputs ─────────────────────────────────────────────────────────

    /// Popover view model while a step is showing.
    #[must_use]
    pub fn overlay(&self) -> Option<OverlayView> {
        let index = self.machine.current_index()?;
        let step = self.machine.catalog().step_at(index)?;
        let side = self
            .placer
            .orientations()
            .orientation_for(&step.locator)
            .popover_side();
        OverlayView::build(
            self.machine.catalog(),
            index,
            &self.host.upstream,
            &self.labels,
            self.machine.popover_position(),
            side,
        )
    }

    /// Welcome card while prompting a signed-in user.
    #[must_use]
    pub fn prompt(&self) -> Option<PromptView> {
        (self.machine.is_prompting() && self.authenticated).then(|| PromptView::new(&self.labels))
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn apply(&mut self, transition: TourTransition) {
        match transition {
            TourTransition::PromptOpened => {}
            TourTransition::StepChanged { reason, .. } => {
                if matches!(reason, TourAdvanceReason::Start | TourAdvanceReason::Restart) {
                    let viewport = self.host.dom.viewport();
                    let center = self.placer.centered_default(&viewport);
                    self.machine
                        .set_popover_position(self.placer.clamp_position(center, &viewport));
                }
                self.sync_current();
            }
            TourTransition::Ended { .. } => {
                self.deferral.cancel();
                overlay::clear_highlight(self.machine.highlight_mut(), &mut self.host.dom);
            }
        }
    }

    fn sync_current(&mut self) {
        let Some(step) = self.machine.current_step() else {
            return;
        };
        let outcome = self.navigation.sync(step, &mut self.host.router);
        let generation = self.deferral.schedule(self.clock.now(), outcome.settle);
        tracing::debug!(
            step = ?self.machine.current_index(),
            settle_ms = outcome.settle.as_millis() as u64,
            generation = generation.get(),
            navigated = outcome.navigated_to.is_some(),
            "placement scheduled"
        );
    }

    fn place_current(&mut self) -> Option<Placement> {
        let index = self.machine.current_index()?;
        let catalog = Arc::clone(self.machine.catalog());
        let step = catalog.step_at(index)?;
        let _span = tracing::debug_span!("idp.tour.place", step = index).entered();

        let viewport = self.host.dom.viewport();
        let target = self.host.dom.bounding_rect(&step.locator);
        let placement = self.placer.compute(step, target, &viewport);
        match &placement.fallback {
            Some(fallback) => {
                overlay::clear_highlight(self.machine.highlight_mut(), &mut self.host.dom);
                tracing::debug!(%fallback, "placement fell back");
            }
            None => {
                overlay::paint_highlight(
                    self.machine.highlight_mut(),
                    &mut self.host.dom,
                    &step.locator,
                );
                self.host.dom.scroll_into_view(&step.locator);
            }
        }
        self.machine.set_popover_position(placement.position);
        tracing::debug!(
            top = placement.position.top,
            left = placement.position.left,
            orientation = ?placement.orientation,
            "popover placed"
        );
        Some(placement)
    }
}

impl<D, R, U> std::fmt::Debug for TourEngine<D, R, U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TourEngine")
            .field("mode", &self.machine.mode())
            .field("deferral", &self.deferral.state())
            .field("now", &self.clock.now())
            .field("authenticated", &self.authenticated)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::SessionSnapshot;
    use crate::steps;
    use crate::testing::{FakeDom, FakeRouter};
    use idp_tour_core::geometry::{Rect, Viewport};
    use idp_tour_runtime::MemoryStorage;

    type TestEngine = TourEngine<FakeDom, FakeRouter, SessionSnapshot>;

    fn engine_at(route: &str) -> TestEngine {
        let dom = FakeDom::new(Viewport::new(1280.0, 800.0))
            .with_element(steps::NAV_LINKS, Rect::new(10.0, 10.0, 200.0, 40.0))
            .with_element(steps::NAV_EXTRACT, Rect::new(60.0, 10.0, 200.0, 40.0));
        let host = Host::new(dom, FakeRouter::at(route), SessionSnapshot::default());
        TourEngine::new(host, Arc::new(MemoryStorage::new()))
    }

    fn settle(engine: &mut TestEngine, ms: u64) -> Option<Placement> {
        if engine.advance_time(Duration::from_millis(ms)) {
            engine.animation_frame()
        } else {
            None
        }
    }

    #[test]
    fn start_centers_then_places_after_settle() {
        let mut engine = engine_at("/");
        engine.on_mount(true);
        engine.start();
        assert_eq!(engine.popover_position(), Some(Position::new(280.0, 480.0)));
        assert!(settle(&mut engine, 100).is_none());
        let placement = settle(&mut engine, 50).unwrap();
        assert!(placement.fallback.is_none());
        assert_eq!(engine.host().dom.highlighted(), [steps::NAV_LINKS]);
        assert_eq!(engine.host().dom.scrolled(), [steps::NAV_LINKS]);
    }

    #[test]
    fn cross_route_waits_longer() {
        let mut engine = engine_at("/");
        engine.start();
        settle(&mut engine, 150);
        engine.next();
        assert_eq!(engine.host().router.current_route(), "/extract");
        assert!(settle(&mut engine, 300).is_none());
        assert!(settle(&mut engine, 150).is_some());
        assert_eq!(engine.host().dom.highlighted(), [steps::NAV_EXTRACT]);
    }

    #[test]
    fn finish_cancels_pending_and_clears_highlight() {
        let mut engine = engine_at("/");
        engine.start();
        settle(&mut engine, 150);
        engine.next();
        engine.handle(TourAction::Dismiss);
        assert!(!engine.has_pending_placement());
        assert!(engine.host().dom.highlighted().is_empty());
        assert!(settle(&mut engine, 1000).is_none());
        assert!(engine.overlay().is_none());
        assert!(engine.completion().has_completed());
    }

    #[test]
    fn prompt_requires_authentication() {
        let mut engine = engine_at("/");
        engine.on_mount(true);
        assert!(engine.prompt().is_some());
        engine.on_mount(false);
        assert!(engine.prompt().is_none());
        assert_eq!(engine.mode(), TourMode::Idle);
    }

    #[test]
    fn viewport_change_reschedules() {
        let mut engine = engine_at("/");
        engine.start();
        settle(&mut engine, 150);
        assert!(!engine.has_pending_placement());
        engine.on_viewport_changed();
        assert!(engine.has_pending_placement());
        engine.on_viewport_changed();
        assert!(settle(&mut engine, 150).is_some());
        assert!(!engine.has_pending_placement());
    }

    #[test]
    fn signals_restart_at_key() {
        let signals = TourSignals::new();
        let mut engine = engine_at("/").with_signals(&signals);
        signals.emitter().start_tour(Some("extract"));
        assert_eq!(engine.pump_signals(), 1);
        assert_eq!(engine.current_index(), Some(1));
        assert_eq!(engine.pump_signals(), 0);
    }
}
