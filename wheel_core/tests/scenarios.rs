//! End-to-end behaviour of the controller on a manual clock.

mod common;

use common::{DEFAULT_PULSES_TO_JACKPOT, Rig};
use wheel_core::{
    ControllerCfg, IgnoreReason, JackpotCfg, Phase, PulseOutcome, TimerOutcome, WheelCfg,
};
use wheel_traits::Cue;

#[test]
fn steady_half_second_pulses_on_24_segments_give_5_rpm() {
    let mut rig = Rig::new(
        ControllerCfg {
            wheel: WheelCfg { segments: 24 },
            ..ControllerCfg::default()
        },
        1,
    );
    rig.pulses(23, 500);
    assert_eq!(rig.ctl.rpm(), 0, "window not full yet");
    rig.pulses(1, 500);
    assert_eq!(rig.ctl.rpm(), 5);
}

#[test]
fn full_chance_jackpot_always_wins_and_feeds() {
    let mut rig = Rig::with_defaults();
    let outcomes = rig.pulses(DEFAULT_PULSES_TO_JACKPOT, 100);

    let reached: Vec<u32> = outcomes
        .iter()
        .filter_map(|o| match o {
            PulseOutcome::CountReached(n) => Some(*n),
            _ => None,
        })
        .collect();
    assert_eq!(reached, vec![1, 2, 3, 4]);

    match outcomes.last() {
        Some(PulseOutcome::Jackpot(j)) => {
            assert!(j.won);
            assert_eq!(j.chance, 100);
        }
        other => panic!("expected jackpot, got {other:?}"),
    }

    let snap = rig.ctl.snapshot();
    assert_eq!(snap.count, 0);
    assert_eq!(snap.steps_fp, 0);
    assert_eq!(snap.phase, Phase::Idle);
    assert_eq!(snap.history, vec![rig.now()]);
    assert!(snap.feeding);
    assert_eq!(rig.feeder.activations(), 1);
    assert_eq!(
        rig.cues.played(),
        vec![
            Cue::Count(1),
            Cue::Count(2),
            Cue::Count(3),
            Cue::Count(4),
            Cue::Win
        ]
    );
}

#[test]
fn idle_abort_after_reaching_count_two() {
    let mut rig = Rig::with_defaults();
    rig.pulses(18 + 19, 100);
    assert_eq!(rig.ctl.count(), 2);
    rig.pulses(5, 100);
    rig.cues.clear();

    let aborts = |fired: Vec<TimerOutcome>| -> Vec<TimerOutcome> {
        fired
            .into_iter()
            .filter(|t| matches!(t, TimerOutcome::Aborted { .. }))
            .collect()
    };
    let last = rig.now();
    assert!(aborts(rig.advance_to(last + 9_999)).is_empty());
    match aborts(rig.advance_to(last + 10_000)).as_slice() {
        [TimerOutcome::Aborted { count, steps }] => {
            assert_eq!(*count, 2);
            assert!((steps - 5.0).abs() < 1e-9);
        }
        other => panic!("expected one abort, got {other:?}"),
    }
    assert_eq!(rig.cues.played(), vec![Cue::Abort]);
    let snap = rig.ctl.snapshot();
    assert_eq!((snap.count, snap.steps_fp), (0, 0));
    assert_eq!(snap.idle_deadline_ms, None);
}

#[test]
fn idle_timeout_at_count_zero_plays_nothing() {
    let mut rig = Rig::with_defaults();
    rig.pulses(3, 100);
    let fired = rig.advance_by(10_000);
    assert_eq!(fired, vec![TimerOutcome::IdleReset]);
    assert!(rig.cues.played().is_empty());
    assert_eq!(rig.ctl.snapshot().steps_fp, 0);
}

#[test]
fn pulses_while_feeding_change_nothing() {
    let mut rig = Rig::with_defaults();
    rig.pulses(DEFAULT_PULSES_TO_JACKPOT, 100);
    assert!(rig.ctl.is_feeding());
    let before = rig.ctl.snapshot();

    let outcomes = rig.pulses(10, 100);
    assert!(
        outcomes
            .iter()
            .all(|o| *o == PulseOutcome::Ignored(IgnoreReason::Feeding))
    );
    let after = rig.ctl.snapshot();
    assert_eq!(after.count, before.count);
    assert_eq!(after.steps_fp, before.steps_fp);
    assert_eq!(after.idle_deadline_ms, None);
}

#[test]
fn pulse_outside_operating_hours_is_ignored_without_rescheduling() {
    let mut rig = Rig::with_defaults();
    assert_eq!(rig.pulse_at(100), PulseOutcome::Accumulated);
    let deadline = rig.ctl.snapshot().idle_deadline_ms;
    assert_eq!(deadline, Some(10_100));

    rig.clock.set_hour(22);
    assert_eq!(
        rig.pulse_at(5_000),
        PulseOutcome::Ignored(IgnoreReason::OutsideHours)
    );
    let snap = rig.ctl.snapshot();
    assert_eq!(snap.idle_deadline_ms, deadline);
    assert_eq!(snap.steps_fp, 10);
}

#[test]
fn pulses_during_cooldown_do_not_accumulate() {
    let mut rig = Rig::with_defaults();
    rig.pulses(DEFAULT_PULSES_TO_JACKPOT, 100);
    let t = rig.now();

    // Feeding ends at +11 s, cooldown runs until +20 s.
    rig.advance_to(t + 12_000);
    assert!(!rig.ctl.is_feeding());
    assert!(rig.ctl.cooldown_active());
    assert_eq!(
        rig.pulse_at(t + 12_100),
        PulseOutcome::Ignored(IgnoreReason::Cooldown)
    );
    assert_eq!(rig.ctl.snapshot().steps_fp, 0);

    assert_eq!(rig.pulse_at(t + 20_000), PulseOutcome::Accumulated);
}

#[test]
fn lost_jackpot_plays_lose_and_still_cools_down() {
    // Chance 1 %: only a draw of 0 or 1 wins.
    let cfg = ControllerCfg {
        jackpot: JackpotCfg {
            target_count: 1,
            base_chance: 1,
            ..JackpotCfg::default()
        },
        ..ControllerCfg::default()
    };
    for seed in 0..20 {
        let mut rig = Rig::new(cfg, seed);
        let outcomes = rig.pulses(18, 100);
        let Some(PulseOutcome::Jackpot(j)) = outcomes.last().copied() else {
            panic!("expected jackpot");
        };
        if j.won {
            continue;
        }
        assert_eq!(rig.cues.last(), Some(Cue::Lose));
        assert!(rig.ctl.cooldown_active());
        assert!(!rig.ctl.is_feeding());
        assert_eq!(rig.feeder.activations(), 0);
        assert!(rig.ctl.snapshot().history.is_empty());
        return;
    }
    panic!("no losing draw in 20 seeds");
}

#[test]
fn idle_timer_is_cancelled_when_evaluation_begins() {
    let mut rig = Rig::with_defaults();
    rig.pulses(DEFAULT_PULSES_TO_JACKPOT, 100);
    let snap = rig.ctl.snapshot();
    assert_eq!(snap.idle_deadline_ms, None);
    // Cooldown, feed pulse, feed run and RPM decay remain; no idle abort.
    let fired = rig.advance_by(30_000);
    assert!(!fired.iter().any(|t| matches!(
        t,
        TimerOutcome::Aborted { .. } | TimerOutcome::IdleReset
    )));
}
