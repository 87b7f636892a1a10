#![forbid(unsafe_code)]

//! The tour state machine.
//!
//! ```text
//! Idle ──mount (signed in, not seen)──▶ PromptingFirstRun
//!  │                                         │ start
//!  │ restart signal                          ▼
//!  └───────────────────────────────────▶ Active{index} ──finish/skip/dismiss──▶ Idle
//! ```
//!
//! The machine owns the runtime state and the completion flag but performs no
//! DOM or routing work. Every mode or index change returns a
//! [`TourTransition`]; the engine reacts to it by re-running navigation and
//! placement.

use std::sync::Arc;

use idp_tour_core::geometry::Position;
use idp_tour_runtime::CompletionFlag;

use crate::catalog::{StepCatalog, TourStep};
use crate::overlay::HighlightSlot;

/// Top-level mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TourMode {
    #[default]
    Idle,
    /// The welcome card asking whether to take the tour is showing.
    PromptingFirstRun,
    /// A step is showing.
    Active { index: usize },
}

/// Why the step index changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourAdvanceReason {
    Start,
    Restart,
    Next,
    Prev,
    Jump,
}

/// Why the tour closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// "Finalizar tour" on the last step.
    Finished,
    /// "Omitir" on the welcome card.
    Skipped,
    /// The close control on the popover or welcome card.
    Dismissed,
    /// Authentication was lost. The completion flag is left alone.
    SignedOut,
}

/// A change the engine must react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourTransition {
    PromptOpened,
    StepChanged {
        from: Option<usize>,
        to: usize,
        reason: TourAdvanceReason,
    },
    Ended {
        last_index: Option<usize>,
        reason: EndReason,
    },
}

/// Mode, index, popover position and highlight slot for one session.
#[derive(Debug, Clone)]
pub struct TourMachine {
    catalog: Arc<StepCatalog>,
    completion: CompletionFlag,
    mode: TourMode,
    popover_position: Option<Position>,
    highlight: HighlightSlot,
}

impl TourMachine {
    #[must_use]
    pub fn new(catalog: Arc<StepCatalog>, completion: CompletionFlag) -> Self {
        Self {
            catalog,
            completion,
            mode: TourMode::Idle,
            popover_position: None,
            highlight: HighlightSlot::default(),
        }
    }

    // ── Accessors ───────────────────────────────────────────────────────

    #[must_use]
    pub fn mode(&self) -> TourMode {
        self.mode
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self.mode, TourMode::Active { .. })
    }

    #[must_use]
    pub fn is_prompting(&self) -> bool {
        self.mode == TourMode::PromptingFirstRun
    }

    /// Current step index while active.
    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        match self.mode {
            TourMode::Active { index } => Some(index),
            _ => None,
        }
    }

    #[must_use]
    pub fn current_step(&self) -> Option<&TourStep> {
        self.current_index().and_then(|i| self.catalog.step_at(i))
    }

    #[must_use]
    pub fn catalog(&self) -> &Arc<StepCatalog> {
        &self.catalog
    }

    #[must_use]
    pub fn completion(&self) -> &CompletionFlag {
        &self.completion
    }

    /// Last clamped popover position, if one was computed.
    #[must_use]
    pub fn popover_position(&self) -> Option<Position> {
        self.popover_position
    }

    pub fn set_popover_position(&mut self, position: Position) {
        self.popover_position = Some(position);
    }

    #[must_use]
    pub fn highlight(&self) -> &HighlightSlot {
        &self.highlight
    }

    pub fn highlight_mut(&mut self) -> &mut HighlightSlot {
        &mut self.highlight
    }

    // ── Transitions ─────────────────────────────────────────────────────

    /// React to the host mounting or authentication changing.
    ///
    /// Signed in with no completion record opens the welcome card (only from
    /// `Idle`). Signed out forces `Idle` without touching the flag.
    pub fn on_mount(&mut self, authenticated: bool) -> Option<TourTransition> {
        if !authenticated {
            if self.mode == TourMode::Idle {
                return None;
            }
            return Some(self.end(EndReason::SignedOut));
        }
        if self.mode == TourMode::Idle && !self.completion.has_completed() {
            self.mode = TourMode::PromptingFirstRun;
            tracing::debug!("first-run prompt opened");
            return Some(TourTransition::PromptOpened);
        }
        None
    }

    /// Begin at step 0. Records completion immediately so an abandoned tab
    /// does not prompt again.
    pub fn start(&mut self) -> TourTransition {
        self.completion.mark_completed();
        self.enter(0, TourAdvanceReason::Start)
    }

    /// Re-enter the tour at `key` (step 0 if absent or unknown), bypassing
    /// the prompt and clearing the completion record.
    pub fn restart(&mut self, key: Option<&str>) -> TourTransition {
        self.completion.clear_completed();
        let index = self.catalog.resolve_key(key);
        self.enter(index, TourAdvanceReason::Restart)
    }

    /// Advance. On the last step this finishes the tour.
    pub fn next(&mut self) -> Option<TourTransition> {
        let index = self.current_index()?;
        if index == self.catalog.last_index() {
            return Some(self.finish());
        }
        let to = (index + 1) % self.catalog.step_count();
        Some(self.move_to(index, to, TourAdvanceReason::Next))
    }

    /// Go back, wrapping from step 0 to the last step.
    pub fn prev(&mut self) -> Option<TourTransition> {
        let index = self.current_index()?;
        let count = self.catalog.step_count();
        let to = (index + count - 1) % count;
        Some(self.move_to(index, to, TourAdvanceReason::Prev))
    }

    /// Move to the step registered under `key` while active. Unknown keys
    /// resolve to step 0; a jump onto the current step is a no-op.
    pub fn jump_to_key(&mut self, key: &str) -> Option<TourTransition> {
        let index = self.current_index()?;
        let to = self.catalog.resolve_key(Some(key));
        if to == index {
            return None;
        }
        Some(self.move_to(index, to, TourAdvanceReason::Jump))
    }

    pub fn finish(&mut self) -> TourTransition {
        self.close(EndReason::Finished)
    }

    pub fn skip(&mut self) -> TourTransition {
        self.close(EndReason::Skipped)
    }

    pub fn dismiss(&mut self) -> TourTransition {
        self.close(EndReason::Dismissed)
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn enter(&mut self, index: usize, reason: TourAdvanceReason) -> TourTransition {
        let from = self.current_index();
        self.mode = TourMode::Active { index };
        self.popover_position = None;
        tracing::debug!(step = index, ?reason, "tour entered");
        TourTransition::StepChanged {
            from,
            to: index,
            reason,
        }
    }

    fn move_to(&mut self, from: usize, to: usize, reason: TourAdvanceReason) -> TourTransition {
        self.mode = TourMode::Active { index: to };
        tracing::debug!(from, to, ?reason, "tour step changed");
        TourTransition::StepChanged {
            from: Some(from),
            to,
            reason,
        }
    }

    fn close(&mut self, reason: EndReason) -> TourTransition {
        self.completion.mark_completed();
        self.end(reason)
    }

    fn end(&mut self, reason: EndReason) -> TourTransition {
        let last_index = self.current_index();
        self.mode = TourMode::Idle;
        tracing::debug!(?last_index, ?reason, "tour ended");
        TourTransition::Ended { last_index, reason }
    }
}
