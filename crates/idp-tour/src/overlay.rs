#![forbid(unsafe_code)]

//! Highlight bookkeeping and the view models hosts render.
//!
//! The engine never builds markup. It hands out [`OverlayView`] for the step
//! popover and [`PromptView`] for the first-run welcome card; the host turns
//! those into DOM (or anything else).

use std::borrow::Cow;
use std::str::FromStr;

use idp_tour_core::geometry::Position;

use crate::catalog::StepCatalog;
use crate::host::{ElementLocator, UpstreamState};
use crate::placement::PopoverSide;

/// Class added to the highlighted element.
pub const HIGHLIGHT_CLASS: &str = "tour-highlight";

/// Maximum popover width in CSS pixels.
pub const POPOVER_MAX_WIDTH: u32 = 360;

/// Stacking order of the popover.
pub const POPOVER_Z_INDEX: u32 = 1100;

/// Maximum welcome card width in CSS pixels.
pub const PROMPT_MAX_WIDTH: u32 = 420;

// ═══════════════════════════════════════════════════════════════════════════
// Highlight slot
// ═══════════════════════════════════════════════════════════════════════════

/// The one element currently carrying [`HIGHLIGHT_CLASS`], if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightSlot {
    current: Option<String>,
}

impl HighlightSlot {
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }

    /// Record `locator` as highlighted, returning the previous occupant.
    pub fn replace(&mut self, locator: impl Into<String>) -> Option<String> {
        self.current.replace(locator.into())
    }

    pub fn take(&mut self) -> Option<String> {
        self.current.take()
    }
}

/// Remove the marker from whatever `slot` holds.
pub fn clear_highlight<D: ElementLocator + ?Sized>(slot: &mut HighlightSlot, dom: &mut D) {
    if let Some(previous) = slot.take() {
        tracing::trace!(locator = %previous, "highlight cleared");
        dom.set_highlight(&previous, false);
    }
}

/// Move the marker to `locator`, clearing the previous element first.
pub fn paint_highlight<D: ElementLocator + ?Sized>(
    slot: &mut HighlightSlot,
    dom: &mut D,
    locator: &str,
) {
    clear_highlight(slot, dom);
    dom.set_highlight(locator, true);
    slot.replace(locator);
}

// ═══════════════════════════════════════════════════════════════════════════
// Labels
// ═══════════════════════════════════════════════════════════════════════════

/// Interface language for the built-in labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    Es,
    En,
}

impl Locale {
    #[must_use]
    pub fn labels(self) -> OverlayLabels {
        match self {
            Locale::Es => OverlayLabels::default(),
            Locale::En => OverlayLabels::english(),
        }
    }
}

impl FromStr for Locale {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "es" | "es-es" | "spanish" => Ok(Locale::Es),
            "en" | "en-us" | "en-gb" | "english" => Ok(Locale::En),
            _ => Err(()),
        }
    }
}

/// Fixed strings of the overlay and welcome card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayLabels {
    /// Progress template word before the step number ("Paso").
    pub step: Cow<'static, str>,
    /// Progress template word between number and total ("de").
    pub of: Cow<'static, str>,
    pub previous: Cow<'static, str>,
    pub next: Cow<'static, str>,
    pub finish: Cow<'static, str>,
    pub close: Cow<'static, str>,
    pub prompt_title: Cow<'static, str>,
    pub prompt_question: Cow<'static, str>,
    pub prompt_skip: Cow<'static, str>,
    pub prompt_start: Cow<'static, str>,
}

impl Default for OverlayLabels {
    fn default() -> Self {
        Self {
            step: "Paso".into(),
            of: "de".into(),
            previous: "Anterior".into(),
            next: "Siguiente".into(),
            finish: "Finalizar tour".into(),
            close: "Cerrar".into(),
            prompt_title: "Bienvenido a IDP".into(),
            prompt_question: "Te gustaria hacer un tour para conocer las funcionalidades principales?"
                .into(),
            prompt_skip: "Omitir".into(),
            prompt_start: "Iniciar tour".into(),
        }
    }
}

impl OverlayLabels {
    /// English labels.
    #[must_use]
    pub fn english() -> Self {
        Self {
            step: "Step".into(),
            of: "of".into(),
            previous: "Back".into(),
            next: "Next".into(),
            finish: "Finish tour".into(),
            close: "Close".into(),
            prompt_title: "Welcome to IDP".into(),
            prompt_question: "Would you like a tour of the main features?".into(),
            prompt_skip: "Skip".into(),
            prompt_start: "Start tour".into(),
        }
    }

    /// "Paso 3 de 14" for `index = 2`, `count = 14`.
    #[must_use]
    pub fn progress(&self, index: usize, count: usize) -> String {
        format!("{} {} {} {}", self.step, index + 1, self.of, count)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// View models
// ═══════════════════════════════════════════════════════════════════════════

/// Everything needed to render the step popover.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct OverlayView {
    pub step_index: usize,
    pub step_count: usize,
    pub title: String,
    pub body: String,
    pub progress: String,
    /// One entry per step; `true` marks the current one.
    pub dots: Vec<bool>,
    pub previous_label: String,
    /// "Siguiente", or the finish label on the last step.
    pub next_label: String,
    /// Accessible label of the dismiss control.
    pub close_label: String,
    pub is_last: bool,
    /// `None` until the first placement lands.
    pub position: Option<Position>,
    pub side: PopoverSide,
    pub max_width: u32,
    pub z_index: u32,
}

impl OverlayView {
    /// Build the popover for step `index`. `None` if out of range.
    #[must_use]
    pub fn build(
        catalog: &StepCatalog,
        index: usize,
        upstream: &(impl UpstreamState + ?Sized),
        labels: &OverlayLabels,
        position: Option<Position>,
        side: PopoverSide,
    ) -> Option<Self> {
        let step = catalog.step_at(index)?;
        let count = catalog.step_count();
        let is_last = index == catalog.last_index();
        Some(Self {
            step_index: index,
            step_count: count,
            title: step.title.to_string(),
            body: step.body.resolve(upstream).to_owned(),
            progress: labels.progress(index, count),
            dots: (0..count).map(|i| i == index).collect(),
            previous_label: labels.previous.to_string(),
            next_label: if is_last {
                labels.finish.to_string()
            } else {
                labels.next.to_string()
            },
            close_label: labels.close.to_string(),
            is_last,
            position,
            side,
            max_width: POPOVER_MAX_WIDTH,
            z_index: POPOVER_Z_INDEX,
        })
    }
}

/// The first-run welcome card.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PromptView {
    pub title: String,
    pub question: String,
    pub skip_label: String,
    pub start_label: String,
    pub max_width: u32,
}

impl PromptView {
    #[must_use]
    pub fn new(labels: &OverlayLabels) -> Self {
        Self {
            title: labels.prompt_title.to_string(),
            question: labels.prompt_question.to_string(),
            skip_label: labels.prompt_skip.to_string(),
            start_label: labels.prompt_start.to_string(),
            max_width: PROMPT_MAX_WIDTH,
        }
    }
}
