#![forbid(unsafe_code)]

//! Error and fallback types.
//!
//! The running tour has no error path: every failure degrades to a defined
//! default and is reported as a [`TourFallback`] in the logs. The only fallible
//! operation is building a [`StepCatalog`](crate::StepCatalog).

use std::fmt;

/// Reasons a catalog cannot be built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// A tour needs at least one step.
    Empty,
    /// Two steps share the same jump key.
    DuplicateKey(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Empty => write!(f, "tour catalog has no steps"),
            CatalogError::DuplicateKey(key) => write!(f, "duplicate step key: {key}"),
        }
    }
}

impl std::error::Error for CatalogError {}

/// A degradation the engine applied instead of failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TourFallback {
    /// The step's locator matched no element; the popover was centered.
    TargetNotFound { locator: String },
    /// A restart named an unknown step key; the tour starts at step 0.
    KeyNotFound { key: String },
    /// The step's route is already current; only the short settle applies.
    NavigationNoOp { route: String },
}

impl fmt::Display for TourFallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TourFallback::TargetNotFound { locator } => {
                write!(f, "target not found for {locator}, using centered placement")
            }
            TourFallback::KeyNotFound { key } => {
                write!(f, "unknown step key {key:?}, starting at step 0")
            }
            TourFallback::NavigationNoOp { route } => {
                write!(f, "already on {route}, no navigation needed")
            }
        }
    }
}
