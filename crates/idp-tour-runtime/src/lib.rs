#![forbid(unsafe_code)]

//! IDP Tour Runtime
//!
//! Infrastructure the tour engine runs on, kept free of any tour semantics:
//!
//! - [`DeterministicClock`] - monotonic time advanced explicitly by the host
//! - [`Deferral`] - single-slot, generation-tagged "timer then next frame"
//!   scheduler; scheduling again supersedes whatever was pending
//! - [`TourSignals`] - process-wide broadcast of start-tour requests
//! - [`CompletionFlag`] - the durable "tour seen" marker over a
//!   [`StorageBackend`]
//!
//! # How it fits in the system
//! `idp-tour` owns the state machine and composes these pieces. Browser hosts
//! (`idp-tour-web`) supply a `localStorage`-backed [`StorageBackend`] and feed
//! DOM `CustomEvent`s into [`TourSignals`].

pub mod clock;
pub mod deferral;
pub mod signal;
pub mod state_persistence;

pub use clock::DeterministicClock;
pub use deferral::{Deferral, DeferralState, Generation};
pub use signal::{
    START_TOUR_EVENT, SignalSubscription, TourSignal, TourSignalEmitter, TourSignals,
};

// State persistence
#[cfg(feature = "file-storage")]
pub use state_persistence::FileStorage;
pub use state_persistence::{
    COMPLETION_KEY, CompletionFlag, MemoryStorage, StorageBackend, StorageError, StorageResult,
};
