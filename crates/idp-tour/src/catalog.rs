#![forbid(unsafe_code)]

//! The ordered, immutable list of tour steps.
//!
//! Index 0 is the entry point. Once built, a catalog never changes; the
//! engine shares it behind an `Arc`.

use std::borrow::Cow;
use std::collections::HashSet;

use crate::error::{CatalogError, TourFallback};
use crate::host::UpstreamState;

/// Upstream state a step's description depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Prerequisite {
    /// OCR must have produced text.
    ExtractedText,
    /// An extraction result must exist.
    ProcessedResult,
}

impl Prerequisite {
    /// Whether `upstream` satisfies the prerequisite.
    pub fn is_met(self, upstream: &(impl UpstreamState + ?Sized)) -> bool {
        match self {
            Prerequisite::ExtractedText => upstream.has_extracted_text(),
            Prerequisite::ProcessedResult => upstream.has_processed_result(),
        }
    }
}

/// A step's description text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepBody {
    /// Always the same text.
    Static(Cow<'static, str>),
    /// `text` once `prerequisite` holds; `fallback` explains what to do first.
    Requires {
        prerequisite: Prerequisite,
        text: Cow<'static, str>,
        fallback: Cow<'static, str>,
    },
}

impl StepBody {
    /// The text to display given the current upstream state.
    pub fn resolve(&self, upstream: &(impl UpstreamState + ?Sized)) -> &str {
        match self {
            StepBody::Static(text) => text,
            StepBody::Requires {
                prerequisite,
                text,
                fallback,
            } => {
                if prerequisite.is_met(upstream) {
                    text
                } else {
                    fallback
                }
            }
        }
    }
}

/// One unit of the guided tour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TourStep {
    /// Selector for the element this step highlights.
    pub locator: Cow<'static, str>,
    /// Stable identifier for direct jumps.
    pub key: Option<Cow<'static, str>>,
    pub title: Cow<'static, str>,
    pub body: StepBody,
    /// Route that must be active before the step renders.
    pub required_route: Option<Cow<'static, str>>,
}

impl TourStep {
    /// A step with a static body, no key and no route.
    #[must_use]
    pub fn new(
        locator: impl Into<Cow<'static, str>>,
        title: impl Into<Cow<'static, str>>,
        body: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            locator: locator.into(),
            key: None,
            title: title.into(),
            body: StepBody::Static(body.into()),
            required_route: None,
        }
    }

    /// Set the jump key.
    #[must_use]
    pub fn key(mut self, key: impl Into<Cow<'static, str>>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Set the required route.
    #[must_use]
    pub fn route(mut self, route: impl Into<Cow<'static, str>>) -> Self {
        self.required_route = Some(route.into());
        self
    }

    /// Make the body depend on `prerequisite`, showing `fallback` until it
    /// holds. The current body text becomes the "ready" text.
    #[must_use]
    pub fn requires(
        mut self,
        prerequisite: Prerequisite,
        fallback: impl Into<Cow<'static, str>>,
    ) -> Self {
        let text = match self.body {
            StepBody::Static(text) => text,
            StepBody::Requires { text, .. } => text,
        };
        self.body = StepBody::Requires {
            prerequisite,
            text,
            fallback: fallback.into(),
        };
        self
    }

    /// Jump key as a plain string.
    pub fn key_str(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Required route as a plain string.
    pub fn route_str(&self) -> Option<&str> {
        self.required_route.as_deref()
    }
}

/// Ordered, validated list of steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepCatalog {
    steps: Vec<TourStep>,
}

impl Default for StepCatalog {
    /// The IDP product tour.
    fn default() -> Self {
        Self {
            steps: crate::steps::idp_steps(),
        }
    }
}

impl StepCatalog {
    /// Validate and wrap `steps`.
    ///
    /// # Errors
    ///
    /// [`CatalogError::Empty`] for no steps, [`CatalogError::DuplicateKey`]
    /// when two steps share a key.
    pub fn new(steps: Vec<TourStep>) -> Result<Self, CatalogError> {
        if steps.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = HashSet::new();
        for key in steps.iter().filter_map(TourStep::key_str) {
            if !seen.insert(key) {
                return Err(CatalogError::DuplicateKey(key.to_owned()));
            }
        }
        Ok(Self { steps })
    }

    /// Step at `index`.
    #[must_use]
    pub fn step_at(&self, index: usize) -> Option<&TourStep> {
        self.steps.get(index)
    }

    /// Number of steps. Never zero.
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Index of the final step.
    #[must_use]
    pub fn last_index(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    /// Index of the step registered under `key`.
    #[must_use]
    pub fn index_for_key(&self, key: &str) -> Option<usize> {
        self.steps.iter().position(|step| step.key_str() == Some(key))
    }

    /// Resolve an optional jump key, falling back to step 0.
    ///
    /// An unknown key is not an error: a mistyped or removed key must not
    /// keep the tour from starting.
    #[must_use]
    pub fn resolve_key(&self, key: Option<&str>) -> usize {
        let Some(key) = key.filter(|k| !k.is_empty()) else {
            return 0;
        };
        self.index_for_key(key).unwrap_or_else(|| {
            let fallback = TourFallback::KeyNotFound {
                key: key.to_owned(),
            };
            tracing::debug!(%fallback, "step key lookup fell back");
            0
        })
    }

    /// Iterate steps in order.
    pub fn iter(&self) -> std::slice::Iter<'_, TourStep> {
        self.steps.iter()
    }
}

impl<'a> IntoIterator for &'a StepCatalog {
    type Item = &'a TourStep;
    type IntoIter = std::slice::Iter<'a, TourStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}
