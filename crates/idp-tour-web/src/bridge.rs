#![forbid(unsafe_code)]

//! Target-independent glue between JavaScript and the engine.

use core::time::Duration;

use idp_tour::{
    ElementLocator, OverlayView, PromptView, Router, TourAction, TourEngine, TourMode, TourSignal,
    UpstreamState,
};
use serde::Serialize;

/// Decode the `detail` of an `idp-start-tour` event. Blank details start at
/// the first step.
#[must_use]
pub fn signal_from_detail(detail: Option<&str>) -> TourSignal {
    TourSignal::start(detail.map(str::trim))
}

/// Map a JS action name to a control. `key` is used by `restart` and `jump`.
#[must_use]
pub fn parse_action(name: &str, key: Option<String>) -> Option<TourAction> {
    let key = key.filter(|k| !k.trim().is_empty());
    let action = match name {
        "start" => TourAction::Start,
        "restart" => TourAction::Restart(key),
        "next" => TourAction::Next,
        "prev" => TourAction::Prev,
        "jump" => TourAction::JumpTo(key?),
        "finish" => TourAction::Finish,
        "skip" => TourAction::Skip,
        "dismiss" | "close" => TourAction::Dismiss,
        _ => return None,
    };
    Some(action)
}

/// Milliseconds from `requestAnimationFrame` deltas. Negative, NaN and
/// overflowing inputs read as zero.
#[must_use]
pub fn ms_to_duration(ms: f64) -> Duration {
    if ms <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(ms / 1000.0).unwrap_or(Duration::ZERO)
}

#[must_use]
pub fn mode_name(mode: TourMode) -> &'static str {
    match mode {
        TourMode::Idle => "idle",
        TourMode::PromptingFirstRun => "prompting",
        TourMode::Active { .. } => "active",
    }
}

/// Everything the page needs to render the tour.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TourSnapshot {
    pub mode: &'static str,
    pub step_index: Option<usize>,
    pub overlay: Option<OverlayView>,
    pub prompt: Option<PromptView>,
    pub wants_frame: bool,
}

impl TourSnapshot {
    #[must_use]
    pub fn capture<D, R, U>(engine: &TourEngine<D, R, U>) -> Self
    where
        D: ElementLocator,
        R: Router,
        U: UpstreamState,
    {
        Self {
            mode: mode_name(engine.mode()),
            step_index: engine.current_index(),
            overlay: engine.overlay(),
            prompt: engine.prompt(),
            wants_frame: engine.wants_frame(),
        }
    }

    /// JSON for the page. Serialization failures are logged and yield `null`.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to serialize tour snapshot");
            "null".to_owned()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_detail_starts_at_first_step() {
        assert_eq!(signal_from_detail(None), TourSignal::StartTour);
        assert_eq!(signal_from_detail(Some("  ")), TourSignal::StartTour);
        assert_eq!(
            signal_from_detail(Some(" charts-result ")),
            TourSignal::StartTourAt("charts-result".into())
        );
    }

    #[test]
    fn jump_needs_a_key() {
        assert_eq!(parse_action("jump", None), None);
        assert_eq!(
            parse_action("jump", Some("tokens".into())),
            Some(TourAction::JumpTo("tokens".into()))
        );
        assert_eq!(parse_action("restart", Some(" ".into())), Some(TourAction::Restart(None)));
        assert_eq!(parse_action("close", None), Some(TourAction::Dismiss));
        assert_eq!(parse_action("explode", None), None);
    }

    #[test]
    fn durations_are_sanitized() {
        assert_eq!(ms_to_duration(250.0), Duration::from_millis(250));
        assert_eq!(ms_to_duration(-5.0), Duration::ZERO);
        assert_eq!(ms_to_duration(f64::NAN), Duration::ZERO);
        assert_eq!(ms_to_duration(f64::INFINITY), Duration::ZERO);
    }
}
