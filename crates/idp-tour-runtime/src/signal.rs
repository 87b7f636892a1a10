#![forbid(unsafe_code)]

//! Process-wide start-tour broadcast.
//!
//! Any part of the application may ask for the tour to (re)start, optionally
//! at a named step, without knowing anything about the engine. The engine
//! holds a [`SignalSubscription`] for its whole lifetime and drains it from
//! the host loop.
//!
//! # How it works
//!
//! 1. [`TourSignals::new`] creates the hub; clone [`TourSignalEmitter`]s out of
//!    it and hand them to collaborators (menus, feature pages, DOM bridges).
//! 2. [`TourSignals::subscribe`] registers a receiver. Every emitted signal is
//!    delivered to every live subscriber.
//! 3. Subscribers that were dropped are pruned on the next emit.

use std::sync::mpsc;
use std::sync::{Arc, Mutex, PoisonError};

/// Name of the DOM `CustomEvent` browser hosts translate into [`TourSignal`]s.
pub const START_TOUR_EVENT: &str = "idp-start-tour";

/// A request to (re)start the tour.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TourSignal {
    /// Start from the first step.
    #[default]
    StartTour,
    /// Start from the step registered under this key.
    StartTourAt(String),
}

impl TourSignal {
    /// Build a signal from an optional step key. Empty keys mean "no key".
    #[must_use]
    pub fn start(step_key: Option<&str>) -> Self {
        match step_key {
            Some(key) if !key.is_empty() => Self::StartTourAt(key.to_owned()),
            _ => Self::StartTour,
        }
    }

    /// The requested step key, if any.
    #[must_use]
    pub fn step_key(&self) -> Option<&str> {
        match self {
            Self::StartTour => None,
            Self::StartTourAt(key) => Some(key),
        }
    }
}

type Subscribers = Arc<Mutex<Vec<mpsc::Sender<TourSignal>>>>;

/// Broadcast hub for [`TourSignal`]s.
#[derive(Debug, Clone, Default)]
pub struct TourSignals {
    subscribers: Subscribers,
}

impl TourSignals {
    /// Create an empty hub.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber.
    #[must_use]
    pub fn subscribe(&self) -> SignalSubscription {
        let (sender, receiver) = mpsc::channel();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(sender);
        SignalSubscription { receiver }
    }

    /// A cheap handle collaborators use to emit signals.
    #[must_use]
    pub fn emitter(&self) -> TourSignalEmitter {
        TourSignalEmitter {
            subscribers: Arc::clone(&self.subscribers),
        }
    }

    /// Number of live subscribers (as of the last emit).
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .map(|subs| subs.len())
            .unwrap_or(0)
    }
}

/// Sending half handed to collaborators.
#[derive(Debug, Clone)]
pub struct TourSignalEmitter {
    subscribers: Subscribers,
}

impl TourSignalEmitter {
    /// Broadcast `signal` to every live subscriber.
    ///
    /// Returns the number of subscribers it reached. Never fails: with no
    /// subscriber the signal is simply dropped.
    pub fn emit(&self, signal: TourSignal) -> usize {
        let mut subs = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subs.retain(|sender| sender.send(signal.clone()).is_ok());
        tracing::trace!(
            step_key = ?signal.step_key(),
            delivered = subs.len(),
            "start-tour signal emitted"
        );
        subs.len()
    }

    /// Shorthand for `emit(TourSignal::start(step_key))`.
    pub fn start_tour(&self, step_key: Option<&str>) -> usize {
        self.emit(TourSignal::start(step_key))
    }
}

/// Receiving half owned by the engine.
#[derive(Debug)]
pub struct SignalSubscription {
    receiver: mpsc::Receiver<TourSignal>,
}

impl SignalSubscription {
    /// Take every signal received so far, oldest first. Never blocks.
    pub fn drain(&self) -> Vec<TourSignal> {
        self.receiver.try_iter().collect()
    }
}
