#![forbid(unsafe_code)]

//! IDP Tour
//!
//! The guided product tour of the IDP front-end: a step catalog spanning
//! several routes, a state machine for the first-run prompt and the active
//! tour, route synchronization with settle delays, popover placement clamped
//! to the viewport, and the view models a host renders.
//!
//! # Role in the workspace
//! - `idp-tour-core`: geometry types.
//! - `idp-tour-runtime`: clock, deferral, start-tour signals, completion flag.
//! - **`idp-tour`** (this crate): tour semantics and the [`TourEngine`].
//! - `idp-tour-web`: browser bindings for the host traits.
//!
//! The engine performs no I/O of its own. Everything it touches goes through
//! [`ElementLocator`], [`Router`] and [`UpstreamState`], which the browser
//! implements over `web-sys` and tests implement with [`testing`] doubles.

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod host;
pub mod machine;
pub mod navigation;
pub mod overlay;
pub mod placement;
pub mod steps;
pub mod testing;

pub use catalog::{Prerequisite, StepBody, StepCatalog, TourStep};
pub use config::TourConfig;
pub use engine::{TourAction, TourEngine};
pub use error::{CatalogError, TourFallback};
pub use host::{ElementLocator, Host, Router, SessionSnapshot, UpstreamState};
pub use machine::{EndReason, TourAdvanceReason, TourMachine, TourMode, TourTransition};
pub use navigation::{NavigationOutcome, NavigationSync, SettleDelays};
pub use overlay::{
    HIGHLIGHT_CLASS, HighlightSlot, Locale, OverlayLabels, OverlayView, PromptView,
};
pub use placement::{
    Orientation, OrientationTable, Placement, PlacementConfig, Placer, PopoverSide,
};

pub use idp_tour_core::geometry::{Position, Rect, Size, Viewport};
pub use idp_tour_runtime::{
    COMPLETION_KEY, CompletionFlag, MemoryStorage, START_TOUR_EVENT, StorageBackend,
    TourSignal, TourSignalEmitter, TourSignals,
};
#[cfg(feature = "file-storage")]
pub use idp_tour_runtime::FileStorage;
