#![forbid(unsafe_code)]

//! Route synchronization before a step renders.

use core::time::Duration;

use crate::catalog::TourStep;
use crate::error::TourFallback;
use crate::host::Router;

/// Wait before measuring the DOM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettleDelays {
    /// After requesting a route change (default: 450ms).
    pub cross_route: Duration,
    /// When the route already matches (default: 150ms).
    pub same_route: Duration,
}

impl Default for SettleDelays {
    fn default() -> Self {
        Self {
            cross_route: Duration::from_millis(450),
            same_route: Duration::from_millis(150),
        }
    }
}

/// What [`NavigationSync::sync`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationOutcome {
    /// Route a navigation was requested to, if any.
    pub navigated_to: Option<String>,
    /// How long to wait before placing the popover.
    pub settle: Duration,
}

/// Brings the router onto a step's required route.
#[derive(Debug, Clone, Copy, Default)]
pub struct NavigationSync {
    delays: SettleDelays,
}

impl NavigationSync {
    #[must_use]
    pub fn new(delays: SettleDelays) -> Self {
        Self { delays }
    }

    #[must_use]
    pub fn delays(&self) -> SettleDelays {
        self.delays
    }

    /// Navigate if `step` needs a different route.
    ///
    /// The request is fire-and-forget; a navigation that never lands simply
    /// leaves the target missing at placement time.
    pub fn sync<R: Router + ?Sized>(&self, step: &TourStep, router: &mut R) -> NavigationOutcome {
        let Some(route) = step.route_str() else {
            return self.stay();
        };
        let current = router.current_route();
        if current == route {
            let fallback = TourFallback::NavigationNoOp {
                route: route.to_owned(),
            };
            tracing::trace!(%fallback, "route already active");
            return self.stay();
        }
        tracing::debug!(from = %current, to = %route, "navigating for tour step");
        router.navigate(route);
        NavigationOutcome {
            navigated_to: Some(route.to_owned()),
            settle: self.delays.cross_route,
        }
    }

    fn stay(&self) -> NavigationOutcome {
        NavigationOutcome {
            navigated_to: None,
            settle: self.delays.same_route,
        }
    }
}
