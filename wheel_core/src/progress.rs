//! Step accumulation against a rising per-count threshold.

use crate::config::{HourWindow, ProgressCfg};
use crate::fixed_point::{fp_to_steps, quantize_u64, threshold_fp};
use crate::status::IgnoreReason;
use crate::timer::{Scheduler, TimerHandle, TimerKind};

/// Controller state a pulse is checked against before it may count.
#[derive(Debug, Clone, Copy)]
pub struct PulseGate {
    pub feeding: bool,
    pub cooldown: bool,
    pub win_limit: bool,
    pub hour: u8,
}

#[derive(Debug)]
pub struct ProgressTracker {
    cfg: ProgressCfg,
    hours: HourWindow,
    steps_fp: u64,
    idle_timer: Option<TimerHandle>,
    idle_deadline_ms: Option<u64>,
}

impl ProgressTracker {
    pub fn new(cfg: ProgressCfg, hours: HourWindow) -> Self {
        Self {
            cfg,
            hours,
            steps_fp: 0,
            idle_timer: None,
            idle_deadline_ms: None,
        }
    }

    /// First gate that blocks progress, checked in a fixed order.
    pub fn check_gate(&self, gate: &PulseGate) -> Option<IgnoreReason> {
        if gate.feeding {
            Some(IgnoreReason::Feeding)
        } else if gate.cooldown {
            Some(IgnoreReason::Cooldown)
        } else if gate.win_limit {
            Some(IgnoreReason::WinLimit)
        } else if !self.hours.contains(gate.hour) {
            Some(IgnoreReason::OutsideHours)
        } else {
            None
        }
    }

    /// Fixed-point steps needed to leave `count`.
    pub fn threshold(&self, count: u32) -> u64 {
        threshold_fp(
            self.cfg.base_steps_per_count,
            self.cfg.growth_rate,
            count,
            self.cfg.scale_factor,
        )
    }

    /// Fixed-point steps added per accepted pulse at `rpm`.
    ///
    /// `scale × (1 − min(0, rpm / 100))`: with a non-negative RPM the min is
    /// always 0, so this is the full scale factor at every speed.
    pub fn increment(&self, rpm: u32) -> u64 {
        let scale = f64::from(self.cfg.scale_factor);
        let damp = (f64::from(rpm) / 100.0).min(0.0);
        quantize_u64(scale * (1.0 - damp))
    }

    /// Cancel the pending idle-abort timer (if any) and arm a fresh one.
    pub fn extend_idle_deadline(&mut self, now_ms: u64, timers: &mut dyn Scheduler) {
        if let Some(h) = self.idle_timer.take() {
            timers.cancel(h);
        }
        self.idle_timer = Some(timers.schedule(now_ms, self.cfg.idle_abort_ms, TimerKind::IdleAbort));
        self.idle_deadline_ms = Some(now_ms.saturating_add(self.cfg.idle_abort_ms));
    }

    pub fn cancel_idle(&mut self, timers: &mut dyn Scheduler) {
        if let Some(h) = self.idle_timer.take() {
            timers.cancel(h);
        }
        self.idle_deadline_ms = None;
    }

    /// The idle-abort timer fired; it is no longer outstanding.
    pub fn on_idle_fired(&mut self) {
        self.idle_timer = None;
        self.idle_deadline_ms = None;
    }

    /// Add one pulse worth of steps. Returns true when the threshold for
    /// `count` is reached.
    pub fn accumulate(&mut self, count: u32, rpm: u32) -> bool {
        self.steps_fp = self.steps_fp.saturating_add(self.increment(rpm));
        let threshold = self.threshold(count);
        tracing::trace!(steps = self.steps_fp, threshold, count, "accumulated");
        self.steps_fp >= threshold
    }

    pub fn reset(&mut self) {
        self.steps_fp = 0;
    }

    /// Accumulated steps in fixed-point units.
    pub fn steps_fp(&self) -> u64 {
        self.steps_fp
    }

    /// Accumulated steps in whole steps.
    pub fn steps(&self) -> f64 {
        fp_to_steps(self.steps_fp, self.cfg.scale_factor)
    }

    pub fn idle_deadline_ms(&self) -> Option<u64> {
        self.idle_deadline_ms
    }
}
