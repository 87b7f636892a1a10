#![forbid(unsafe_code)]

//! Engine configuration.
//!
//! Defaults match the product. Each knob can be overridden from the
//! environment; unparseable values are ignored.
//!
//! ```text
//! IDP_TOUR_NAV_SETTLE_MS         Delay after a route change (default 450)
//! IDP_TOUR_SAME_ROUTE_SETTLE_MS  Delay when the route already matches (default 150)
//! IDP_TOUR_MARGIN_PX             Viewport margin for the popover (default 24)
//! IDP_TOUR_STORAGE_KEY           Completion flag key (default idp-tour-seen)
//! IDP_TOUR_LOCALE                Label language: es | en (default es)
//! ```

use core::time::Duration;
use std::env;

use idp_tour_runtime::COMPLETION_KEY;

use crate::navigation::SettleDelays;
use crate::overlay::Locale;
use crate::placement::PlacementConfig;

pub const ENV_NAV_SETTLE_MS: &str = "IDP_TOUR_NAV_SETTLE_MS";
pub const ENV_SAME_ROUTE_SETTLE_MS: &str = "IDP_TOUR_SAME_ROUTE_SETTLE_MS";
pub const ENV_MARGIN_PX: &str = "IDP_TOUR_MARGIN_PX";
pub const ENV_STORAGE_KEY: &str = "IDP_TOUR_STORAGE_KEY";
pub const ENV_LOCALE: &str = "IDP_TOUR_LOCALE";

/// All tunables of a [`TourEngine`](crate::TourEngine).
#[derive(Debug, Clone, PartialEq)]
pub struct TourConfig {
    pub settle: SettleDelays,
    pub placement: PlacementConfig,
    /// Storage key of the completion flag.
    pub storage_key: String,
    pub locale: Locale,
}

impl Default for TourConfig {
    fn default() -> Self {
        Self {
            settle: SettleDelays::default(),
            placement: PlacementConfig::default(),
            storage_key: COMPLETION_KEY.to_owned(),
            locale: Locale::default(),
        }
    }
}

impl TourConfig {
    /// Defaults with process environment overrides applied.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().apply_env(|name| env::var(name).ok())
    }

    /// Apply overrides read through `lookup`.
    #[must_use]
    pub fn apply_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(val) = lookup(ENV_NAV_SETTLE_MS)
            && let Ok(ms) = val.trim().parse()
        {
            self.settle.cross_route = Duration::from_millis(ms);
        }
        if let Some(val) = lookup(ENV_SAME_ROUTE_SETTLE_MS)
            && let Ok(ms) = val.trim().parse()
        {
            self.settle.same_route = Duration::from_millis(ms);
        }
        if let Some(val) = lookup(ENV_MARGIN_PX)
            && let Ok(px) = val.trim().parse::<f64>()
            && px.is_finite()
            && px >= 0.0
        {
            self.placement.margin = px;
        }
        if let Some(val) = lookup(ENV_STORAGE_KEY)
            && !val.trim().is_empty()
        {
            self.storage_key = val.trim().to_owned();
        }
        if let Some(val) = lookup(ENV_LOCALE)
            && let Ok(locale) = val.parse()
        {
            self.locale = locale;
        }
        self
    }

    #[must_use]
    pub fn with_settle(mut self, settle: SettleDelays) -> Self {
        self.settle = settle;
        self
    }

    #[must_use]
    pub fn with_placement(mut self, placement: PlacementConfig) -> Self {
        self.placement = placement;
        self
    }

    #[must_use]
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    #[must_use]
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }
}
