#![forbid(unsafe_code)]

//! Browser bindings for the IDP guided tour.
//!
//! On `wasm32` this crate implements the tour's host boundaries over
//! `web-sys` and exports [`IdpTourWeb`] through `wasm-bindgen`:
//! - [`ElementLocator`](idp_tour::ElementLocator) via `querySelector`,
//!   `getBoundingClientRect`, `classList` and smooth `scrollIntoView`,
//! - [`Router`](idp_tour::Router) via `history.pushState` plus a synthetic
//!   `popstate` so the page's router picks the change up,
//! - [`StorageBackend`](idp_tour_runtime::StorageBackend) via `localStorage`,
//! - the `idp-start-tour` `CustomEvent` feeding the start-tour signal hub.
//!
//! The [`bridge`] module holds the target-independent glue (action names,
//! event detail decoding, JSON snapshots) and is compiled everywhere.

pub mod bridge;

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod router;
#[cfg(target_arch = "wasm32")]
mod storage;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use dom::BrowserDom;
#[cfg(target_arch = "wasm32")]
pub use router::HistoryRouter;
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;
#[cfg(target_arch = "wasm32")]
pub use wasm::IdpTourWeb;

/// Native builds compile this crate as a stub so `cargo check --workspace` stays
/// green on non-wasm targets.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct IdpTourWeb;

#[cfg(not(target_arch = "wasm32"))]
impl IdpTourWeb {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self
    }
}
