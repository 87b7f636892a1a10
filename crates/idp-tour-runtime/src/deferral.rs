#![forbid(unsafe_code)]

//! Single-slot deferred work: wait for a settle delay, then for the next
//! animation frame.
//!
//! # Invariants
//!
//! 1. At most one deferral is in flight. [`Deferral::schedule`] supersedes the
//!    previous one, which can then never fire.
//! 2. Every scheduled deferral gets a fresh [`Generation`]; a consumer that
//!    remembers the generation it scheduled can tell stale work apart.
//! 3. A deferral fires in two phases: `poll` moves it from
//!    [`DeferralState::Waiting`] to [`DeferralState::AwaitingFrame`] once the
//!    delay has elapsed, and `take_frame` hands it out on the next frame.
//!
//! # Example
//!
//! ```
//! use core::time::Duration;
//! use idp_tour_runtime::Deferral;
//!
//! let mut deferral = Deferral::new();
//! let generation = deferral.schedule(Duration::ZERO, Duration::from_millis(150));
//! assert!(!deferral.poll(Duration::from_millis(100)));
//! assert!(deferral.poll(Duration::from_millis(150)));
//! assert_eq!(deferral.take_frame(), Some(generation));
//! assert_eq!(deferral.take_frame(), None);
//! ```

use core::time::Duration;

/// Identifies one scheduled deferral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    /// Raw counter value, for logging.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Phase of the single deferral slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeferralState {
    /// Nothing pending.
    #[default]
    Idle,
    /// Waiting for the settle delay to elapse.
    Waiting { generation: Generation, due: Duration },
    /// Delay elapsed; waiting for the host to deliver an animation frame.
    AwaitingFrame { generation: Generation },
}

/// Single-slot cancellable deferral.
#[derive(Debug, Clone, Default)]
pub struct Deferral {
    state: DeferralState,
    next_generation: u64,
}

impl Deferral {
    /// Create an idle deferral.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    #[must_use]
    pub const fn state(&self) -> DeferralState {
        self.state
    }

    /// Whether anything is in flight (waiting or awaiting a frame).
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        !matches!(self.state, DeferralState::Idle)
    }

    /// Whether the host should deliver an animation frame.
    #[must_use]
    pub const fn wants_frame(&self) -> bool {
        matches!(self.state, DeferralState::AwaitingFrame { .. })
    }

    /// Generation of the work currently in flight, if any.
    #[must_use]
    pub const fn current(&self) -> Option<Generation> {
        match self.state {
            DeferralState::Idle => None,
            DeferralState::Waiting { generation, .. }
            | DeferralState::AwaitingFrame { generation } => Some(generation),
        }
    }

    /// Schedule work `delay` after `now`, superseding anything in flight.
    pub fn schedule(&mut self, now: Duration, delay: Duration) -> Generation {
        if let Some(stale) = self.current() {
            tracing::trace!(generation = stale.get(), "superseding pending deferral");
        }
        self.next_generation = self.next_generation.wrapping_add(1);
        let generation = Generation(self.next_generation);
        self.state = DeferralState::Waiting {
            generation,
            due: now.saturating_add(delay),
        };
        generation
    }

    /// Drop whatever is in flight. Returns `true` if something was cancelled.
    pub fn cancel(&mut self) -> bool {
        let cancelled = self.current();
        self.state = DeferralState::Idle;
        if let Some(generation) = cancelled {
            tracing::trace!(generation = generation.get(), "cancelled pending deferral");
            true
        } else {
            false
        }
    }

    /// Advance the slot to `now`.
    ///
    /// Returns `true` if the host should deliver an animation frame (either
    /// the delay just elapsed or a frame was already owed).
    pub fn poll(&mut self, now: Duration) -> bool {
        if let DeferralState::Waiting { generation, due } = self.state
            && now >= due
        {
            self.state = DeferralState::AwaitingFrame { generation };
        }
        self.wants_frame()
    }

    /// Consume the slot on an animation frame.
    ///
    /// Returns the generation to run, or `None` if nothing was due.
    pub fn take_frame(&mut self) -> Option<Generation> {
        match self.state {
            DeferralState::AwaitingFrame { generation } => {
                self.state = DeferralState::Idle;
                Some(generation)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn fires_after_delay_then_frame() {
        let mut d = Deferral::new();
        let g = d.schedule(ms(0), ms(450));
        assert!(d.is_pending());
        assert!(!d.poll(ms(449)));
        assert_eq!(d.take_frame(), None, "frame before the delay is a no-op");
        assert!(d.poll(ms(450)));
        assert_eq!(d.take_frame(), Some(g));
        assert!(!d.is_pending());
    }

    #[test]
    fn reschedule_supersedes_previous() {
        let mut d = Deferral::new();
        let first = d.schedule(ms(0), ms(450));
        let second = d.schedule(ms(100), ms(150));
        assert_ne!(first, second);
        assert!(d.poll(ms(250)));
        assert_eq!(d.take_frame(), Some(second));
        assert!(!d.poll(ms(1000)));
        assert_eq!(d.take_frame(), None);
    }

    #[test]
    fn reschedule_while_awaiting_frame() {
        let mut d = Deferral::new();
        d.schedule(ms(0), ms(10));
        assert!(d.poll(ms(10)));
        let second = d.schedule(ms(10), ms(150));
        assert!(!d.wants_frame());
        assert_eq!(d.take_frame(), None);
        assert!(d.poll(ms(160)));
        assert_eq!(d.take_frame(), Some(second));
    }

    #[test]
    fn cancel_clears_slot() {
        let mut d = Deferral::new();
        assert!(!d.cancel());
        d.schedule(ms(0), ms(150));
        assert!(d.cancel());
        assert_eq!(d.state(), DeferralState::Idle);
        assert!(!d.poll(ms(500)));
    }

    #[test]
    fn zero_delay_fires_on_first_poll() {
        let mut d = Deferral::new();
        let g = d.schedule(ms(20), Duration::ZERO);
        assert!(d.poll(ms(20)));
        assert_eq!(d.current(), Some(g));
    }

    #[test]
    fn generations_strictly_increase() {
        let mut d = Deferral::new();
        let a = d.schedule(ms(0), ms(1));
        let b = d.schedule(ms(0), ms(1));
        let c = d.schedule(ms(0), ms(1));
        assert!(a < b && b < c);
    }
}
