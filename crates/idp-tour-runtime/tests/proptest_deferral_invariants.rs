//! Property-based invariant tests for the single-slot deferral.
//!
//! 1. Only the most recently scheduled generation can ever be handed out.
//! 2. Nothing is handed out before its delay has elapsed.
//! 3. At most one frame is handed out per schedule.

use core::time::Duration;

use idp_tour_runtime::Deferral;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Schedule(u64),
    Advance(u64),
    Frame,
    Cancel,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u64..600).prop_map(Op::Schedule),
        (0u64..300).prop_map(Op::Advance),
        Just(Op::Frame),
        Just(Op::Cancel),
    ]
}

proptest! {
    #[test]
    fn only_latest_generation_fires(ops in proptest::collection::vec(op_strategy(), 1..64)) {
        let mut deferral = Deferral::new();
        let mut now = Duration::ZERO;
        let mut latest = None;
        let mut due = Duration::ZERO;
        let mut fired_for_latest = false;

        for op in ops {
            match op {
                Op::Schedule(delay_ms) => {
                    let delay = Duration::from_millis(delay_ms);
                    latest = Some(deferral.schedule(now, delay));
                    due = now + delay;
                    fired_for_latest = false;
                }
                Op::Advance(ms) => {
                    now += Duration::from_millis(ms);
                    deferral.poll(now);
                }
                Op::Frame => {
                    if let Some(generation) = deferral.take_frame() {
                        prop_assert_eq!(Some(generation), latest);
                        prop_assert!(now >= due);
                        prop_assert!(!fired_for_latest);
                        fired_for_latest = true;
                    }
                }
                Op::Cancel => {
                    deferral.cancel();
                    latest = None;
                }
            }
        }
    }
}
