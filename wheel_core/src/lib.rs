#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core wheel controller logic (hardware-agnostic).
//!
//! This crate provides the hardware-independent reward engine. All hardware
//! interactions go through the `wheel_traits::PulseSource`, `Feeder` and
//! `CuePlayer` traits, and time comes from `wheel_traits::Clock`.
//!
//! ## Architecture
//!
//! - **Sampling**: pulse window and RPM estimate (`rpm` module)
//! - **Progress**: step threshold curve, idle abort, gating (`progress` module)
//! - **Counting**: count milestones up to the jackpot (`count` module)
//! - **Jackpot**: decaying odds, draw, history, cooldown (`jackpot` module)
//! - **Feeder**: output pulse and busy period (`feeder` module)
//! - **Timers**: virtual-time scheduler (`timer` module)
//! - **Driving**: real-time and replay loops (`runner` module)
//!
//! ## Fixed-Point Steps
//!
//! Progress is kept in `u64` units of `1 / scale_factor` step so threshold
//! comparisons are exact. See `fixed_point::threshold_fp`.

pub mod builder;
pub mod config;
pub mod controller;
pub mod conversions;
pub mod count;
pub mod error;
pub mod feeder;
pub mod fixed_point;
pub mod hw_error;
pub mod jackpot;
pub mod listener;
pub mod mocks;
pub mod progress;
pub mod rpm;
pub mod runner;
pub mod status;
pub mod timer;
pub mod util;

pub use builder::{ControllerBuilder, Missing, Set};
pub use config::{
    ControllerCfg, FeederCfg, HourWindow, JackpotCfg, ProgressCfg, RpmCfg, WheelCfg,
};
pub use controller::{Snapshot, WheelController};
pub use count::Phase;
pub use error::{BuildError, Report, Result, WheelError};
pub use jackpot::JackpotOutcome;
pub use runner::{RunParams, RunStats};
pub use status::{IgnoreReason, PulseOutcome, TimerOutcome};
pub use timer::{Scheduler, TimerHandle, TimerKind, TimerQueue};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{RecordingCues, RecordingFeeder};
    use wheel_traits::Cue;
    use wheel_traits::clock::ManualClock;

    fn controller(clock: &ManualClock) -> (WheelController, RecordingCues) {
        let cues = RecordingCues::default();
        let c = WheelController::builder()
            .with_feeder(RecordingFeeder::default())
            .with_cues(cues.clone())
            .with_clock(Box::new(clock.clone()))
            .with_seed(1)
            .build()
            .expect("build");
        (c, cues)
    }

    #[test]
    fn eighteen_pulses_reach_count_one() {
        let clock = ManualClock::new();
        let (mut c, cues) = controller(&clock);
        for i in 0..17 {
            clock.advance_ms(100);
            assert_eq!(c.on_pulse(), PulseOutcome::Accumulated, "pulse {i}");
        }
        clock.advance_ms(100);
        assert_eq!(c.on_pulse(), PulseOutcome::CountReached(1));
        assert_eq!(cues.played(), vec![Cue::Count(1)]);
        assert_eq!(c.snapshot().steps_fp, 0);
    }

    #[test]
    fn cue_failures_are_swallowed() {
        let clock = ManualClock::new();
        let mut c = WheelController::builder()
            .with_feeder(RecordingFeeder::default())
            .with_cues(RecordingCues::failing())
            .with_clock(Box::new(clock.clone()))
            .with_progress(ProgressCfg {
                base_steps_per_count: 1.0,
                ..ProgressCfg::default()
            })
            .build()
            .expect("build");
        clock.advance_ms(10);
        assert_eq!(c.on_pulse(), PulseOutcome::CountReached(1));
    }
}
