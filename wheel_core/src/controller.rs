//! The wheel controller context (`WheelController`).
//!
//! Owns every piece of mutable state and the timer queue. Two entry points
//! mutate it, each running to completion: `on_pulse` for a rotation pulse and
//! `on_timer` for an expired timer. Drivers call `fire_due_timers` before each
//! pulse so both are handled in time order.

use std::sync::Arc;
use std::time::Instant;

use wheel_traits::clock::Clock;
use wheel_traits::{Cue, CuePlayer};

use crate::count::{Advance, CountStateMachine, Phase};
use crate::feeder::FeederActuator;
use crate::hw_error::map_hw_error;
use crate::jackpot::JackpotEngine;
use crate::progress::{ProgressTracker, PulseGate};
use crate::rpm::RotationSampler;
use crate::status::{PulseOutcome, TimerOutcome};
use crate::timer::{Expired, TimerKind, TimerQueue};

pub struct WheelController {
    pub(crate) clock: Arc<dyn Clock + Send + Sync>,
    pub(crate) epoch: Instant,
    pub(crate) timers: TimerQueue,
    pub(crate) sampler: RotationSampler,
    pub(crate) progress: ProgressTracker,
    pub(crate) counter: CountStateMachine,
    pub(crate) jackpot: JackpotEngine,
    pub(crate) feeder: FeederActuator,
    pub(crate) cues: Box<dyn CuePlayer>,
}

/// Point-in-time view of the controller state.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub now_ms: u64,
    pub phase: Phase,
    pub count: u32,
    /// Fixed-point steps.
    pub steps_fp: u64,
    pub rpm: u32,
    pub window_len: usize,
    pub history: Vec<u64>,
    pub cooldown_until_ms: Option<u64>,
    pub feeding: bool,
    pub feeder_line_active: bool,
    pub idle_deadline_ms: Option<u64>,
    pub pending_timers: usize,
}

impl core::fmt::Debug for WheelController {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WheelController")
            .field("count", &self.counter.count())
            .field("steps_fp", &self.progress.steps_fp())
            .field("rpm", &self.sampler.rpm())
            .field("feeding", &self.feeder.is_feeding())
            .field("cooldown", &self.jackpot.cooldown_active())
            .finish()
    }
}

impl WheelController {
    /// Milliseconds since the controller was built.
    pub fn now_ms(&self) -> u64 {
        self.clock.ms_since(self.epoch)
    }

    /// One accepted rotation pulse at the current time and hour.
    pub fn on_pulse(&mut self) -> PulseOutcome {
        let now = self.now_ms();
        let hour = self.clock.local_hour();
        self.handle_pulse(now, hour)
    }

    fn handle_pulse(&mut self, now: u64, hour: u8) -> PulseOutcome {
        // RPM sees every pulse, gated or not.
        self.sampler.record_pulse(now, &mut self.timers);

        let gate = PulseGate {
            feeding: self.feeder.is_feeding(),
            cooldown: self.jackpot.cooldown_active(),
            win_limit: self.jackpot.win_limit_reached(now),
            hour,
        };
        if let Some(reason) = self.progress.check_gate(&gate) {
            tracing::debug!(?reason, hour, "pulse ignored");
            return PulseOutcome::Ignored(reason);
        }

        self.progress.extend_idle_deadline(now, &mut self.timers);
        if !self
            .progress
            .accumulate(self.counter.count(), self.sampler.rpm())
        {
            return PulseOutcome::Accumulated;
        }

        match self.counter.advance() {
            Advance::Count(n) => {
                self.progress.reset();
                tracing::info!(count = n, "count reached");
                self.cue(Cue::Count(n));
                PulseOutcome::CountReached(n)
            }
            Advance::Target => {
                self.progress.cancel_idle(&mut self.timers);
                let outcome = self.jackpot.resolve(now, &mut self.timers);
                self.counter.reset();
                self.progress.reset();
                if outcome.won {
                    self.cue(Cue::Win);
                    self.feeder.trigger_feed(now, &mut self.timers);
                } else {
                    self.cue(Cue::Lose);
                }
                PulseOutcome::Jackpot(outcome)
            }
        }
    }

    /// Dispatch one expired timer.
    pub fn on_timer(&mut self, kind: TimerKind) -> TimerOutcome {
        match kind {
            TimerKind::IdleAbort => {
                self.progress.on_idle_fired();
                let steps = self.progress.steps();
                let lost = self.counter.abort();
                self.progress.reset();
                match lost {
                    Some(count) => {
                        tracing::info!(count, steps, "aborted");
                        self.cue(Cue::Abort);
                        TimerOutcome::Aborted { count, steps }
                    }
                    None => {
                        tracing::debug!(steps, "idle reset at count 0");
                        TimerOutcome::IdleReset
                    }
                }
            }
            TimerKind::RpmDecay => {
                self.sampler.on_idle_decay();
                TimerOutcome::RpmDecayed
            }
            TimerKind::CooldownEnd => {
                self.jackpot.on_cooldown_end();
                TimerOutcome::CooldownEnded
            }
            TimerKind::FeedPulseEnd => {
                self.feeder.on_pulse_end();
                TimerOutcome::FeedReleased
            }
            TimerKind::FeedRunEnd => {
                self.feeder.on_run_end();
                TimerOutcome::FeedFinished
            }
        }
    }

    /// Fire every timer due at the current time, earliest first.
    pub fn fire_due_timers(&mut self) -> Vec<TimerOutcome> {
        let now = self.now_ms();
        let mut fired = Vec::new();
        while let Some(Expired { kind, .. }) = self.timers.pop_due(now) {
            fired.push(self.on_timer(kind));
        }
        fired
    }

    /// Earliest pending timer deadline in controller milliseconds.
    pub fn next_deadline_ms(&self) -> Option<u64> {
        self.timers.next_deadline()
    }

    /// Return the feeder output to rest and drop pending timers (shutdown).
    pub fn shutdown(&mut self) {
        self.feeder.release();
        self.timers.clear();
    }

    pub fn count(&self) -> u32 {
        self.counter.count()
    }

    pub fn rpm(&self) -> u32 {
        self.sampler.rpm()
    }

    pub fn is_feeding(&self) -> bool {
        self.feeder.is_feeding()
    }

    pub fn cooldown_active(&self) -> bool {
        self.jackpot.cooldown_active()
    }

    /// Current jackpot chance in percent.
    pub fn chance(&self) -> u32 {
        self.jackpot.compute_chance(self.now_ms())
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            now_ms: self.now_ms(),
            phase: self.counter.phase(),
            count: self.counter.count(),
            steps_fp: self.progress.steps_fp(),
            rpm: self.sampler.rpm(),
            window_len: self.sampler.window_len(),
            history: self.jackpot.history().iter().copied().collect(),
            cooldown_until_ms: self.jackpot.cooldown_until_ms(),
            feeding: self.feeder.is_feeding(),
            feeder_line_active: self.feeder.line_active(),
            idle_deadline_ms: self.progress.idle_deadline_ms(),
            pending_timers: self.timers.len(),
        }
    }

    fn cue(&mut self, cue: Cue) {
        tracing::debug!(cue = %cue, "cue");
        if let Err(e) = self.cues.play(cue) {
            tracing::warn!(cue = %cue, error = %map_hw_error(e.as_ref()), "cue playback failed");
        }
    }
}
