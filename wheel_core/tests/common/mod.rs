#![allow(dead_code)]

use wheel_core::mocks::{RecordingCues, RecordingFeeder};
use wheel_core::runner::advance_to;
use wheel_core::{ControllerCfg, PulseOutcome, TimerOutcome, WheelController};
use wheel_traits::clock::ManualClock;

/// Controller on a manual clock with recording collaborators.
pub struct Rig {
    pub clock: ManualClock,
    pub ctl: WheelController,
    pub cues: RecordingCues,
    pub feeder: RecordingFeeder,
}

impl Rig {
    pub fn new(cfg: ControllerCfg, seed: u64) -> Self {
        let clock = ManualClock::new();
        let cues = RecordingCues::default();
        let feeder = RecordingFeeder::default();
        let ctl = WheelController::builder()
            .with_feeder(feeder.clone())
            .with_cues(cues.clone())
            .with_config(cfg)
            .with_clock(Box::new(clock.clone()))
            .with_seed(seed)
            .build()
            .expect("build controller");
        Self {
            clock,
            ctl,
            cues,
            feeder,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(ControllerCfg::default(), 42)
    }

    pub fn now(&self) -> u64 {
        self.ctl.now_ms()
    }

    /// Let time pass up to `t_ms`, firing timers at their deadlines.
    pub fn advance_to(&mut self, t_ms: u64) -> Vec<TimerOutcome> {
        advance_to(&mut self.ctl, &self.clock, t_ms)
    }

    pub fn advance_by(&mut self, ms: u64) -> Vec<TimerOutcome> {
        let t = self.now() + ms;
        self.advance_to(t)
    }

    pub fn pulse_at(&mut self, t_ms: u64) -> PulseOutcome {
        self.advance_to(t_ms);
        self.ctl.on_pulse()
    }

    /// `n` pulses `interval_ms` apart, the first one interval from now.
    pub fn pulses(&mut self, n: usize, interval_ms: u64) -> Vec<PulseOutcome> {
        (0..n)
            .map(|_| {
                let t = self.now() + interval_ms;
                self.pulse_at(t)
            })
            .collect()
    }
}

/// Accepted pulses needed to go from count 0 to the jackpot with the default curve.
pub const DEFAULT_PULSES_TO_JACKPOT: usize = 18 + 19 + 20 + 21 + 22;
