#![forbid(unsafe_code)]

//! Core: document-space geometry for the guided tour.
//!
//! Everything here is pure data. The engine crates build placement, viewport
//! clamping and highlight bookkeeping on top of these types.

pub mod geometry;

pub use geometry::{Position, Rect, Size, Viewport};
