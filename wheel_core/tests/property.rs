mod common;

use common::Rig;
use proptest::prelude::*;
use wheel_core::fixed_point::threshold_fp;
use wheel_core::{
    ControllerCfg, FeederCfg, JackpotCfg, ProgressCfg, PulseOutcome, WheelCfg,
};

const TTL_MS: u64 = 30_000;

fn cfg(target: u32, decrease: u32) -> ControllerCfg {
    ControllerCfg {
        wheel: WheelCfg { segments: 6 },
        progress: ProgressCfg {
            base_steps_per_count: 3.0,
            growth_rate: 1.2,
            scale_factor: 10,
            idle_abort_ms: 3_000,
        },
        jackpot: JackpotCfg {
            target_count: target,
            base_chance: 100,
            decrease_per_win: decrease,
            history_ttl_ms: TTL_MS,
            cooldown_ms: 2_000,
            history_capacity: 10,
        },
        feeder: FeederCfg {
            pulse_ms: 100,
            run_ms: 1_500,
        },
        ..ControllerCfg::default()
    }
}

prop_compose! {
    // (gap before pulse in ms, local hour at the pulse)
    fn schedule_strategy()(
        events in prop::collection::vec((1u64..4_000, 0u8..24), 1..300),
    ) -> Vec<(u64, u8)> {
        events
    }
}

proptest! {
    #[test]
    fn invariants_hold_after_every_event(
        events in schedule_strategy(),
        seed in any::<u64>(),
        target in 1u32..6,
        decrease in 0u32..=100,
    ) {
        let mut rig = Rig::new(cfg(target, decrease), seed);
        let mut t = 0u64;
        for (gap, hour) in events {
            t += gap;
            rig.advance_to(t);
            rig.clock.set_hour(hour);
            let before = rig.ctl.snapshot();
            let recent_before = before
                .history
                .iter()
                .filter(|&&ts| ts + TTL_MS > t)
                .count() as u32;

            let outcome = rig.ctl.on_pulse();
            let after = rig.ctl.snapshot();

            prop_assert!(after.count < target);
            prop_assert!(after.steps_fp < threshold_fp(3.0, 1.2, after.count, 10));
            prop_assert!(after.history.len() <= 10);
            prop_assert!(after.history.iter().all(|&ts| ts <= after.now_ms));
            prop_assert!(after.window_len <= 6);

            match outcome {
                PulseOutcome::Ignored(_) => {
                    prop_assert_eq!(after.count, before.count);
                    prop_assert_eq!(after.steps_fp, before.steps_fp);
                    prop_assert_eq!(after.idle_deadline_ms, before.idle_deadline_ms);
                }
                PulseOutcome::Accumulated => {
                    prop_assert_eq!(after.count, before.count);
                    prop_assert!(after.steps_fp > before.steps_fp);
                }
                PulseOutcome::CountReached(n) => {
                    prop_assert_eq!(n, before.count + 1);
                    prop_assert_eq!(after.steps_fp, 0);
                }
                PulseOutcome::Jackpot(j) => {
                    prop_assert_eq!(j.chance, 100u32.saturating_sub(decrease * recent_before));
                    prop_assert_eq!(j.won, j.draw <= j.chance);
                    prop_assert!(j.draw < 100);
                    prop_assert_eq!((after.count, after.steps_fp), (0, 0));
                    prop_assert!(after.cooldown_until_ms.is_some());
                    prop_assert_eq!(after.idle_deadline_ms, None);
                }
            }
        }
    }
}
