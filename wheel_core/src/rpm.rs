//! Rotation sampling and RPM estimation.
//!
//! Keeps the last `segments` pulse timestamps. Once the window is full, RPM is
//! recomputed at most once per `recompute_ms` from the mean inter-pulse
//! interval. Every computation re-arms an idle-decay timer; when it fires the
//! window is cleared and RPM drops to 0.

use std::collections::VecDeque;

use crate::config::{RpmCfg, WheelCfg};
use crate::timer::{Scheduler, TimerHandle, TimerKind};
use crate::util::MILLIS_PER_MINUTE;

#[derive(Debug)]
pub struct RotationSampler {
    segments: usize,
    cfg: RpmCfg,
    window: VecDeque<u64>,
    rpm: u32,
    last_compute_ms: u64,
    decay_timer: Option<TimerHandle>,
}

/// Mean spacing of consecutive timestamps. `None` with fewer than two samples
/// or when every sample landed on the same millisecond.
pub fn mean_interval_ms(window: &VecDeque<u64>) -> Option<f64> {
    if window.len() < 2 {
        return None;
    }
    let total: u64 = window
        .iter()
        .zip(window.iter().skip(1))
        .map(|(a, b)| b.saturating_sub(*a))
        .sum();
    let mean = total as f64 / (window.len() - 1) as f64;
    (mean > 0.0).then_some(mean)
}

/// `60000 / (mean_interval_ms × segments)`, rounded to nearest.
pub fn rpm_from_interval(mean_interval_ms: f64, segments: u32) -> u32 {
    let per_rev = mean_interval_ms * f64::from(segments.max(1));
    if !(per_rev.is_finite() && per_rev > 0.0) {
        return 0;
    }
    let rpm = (MILLIS_PER_MINUTE as f64 / per_rev).round();
    if rpm >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        rpm as u32
    }
}

impl RotationSampler {
    /// `start_ms` anchors the recompute floor, so the first computation comes
    /// no earlier than `recompute_ms` after it.
    pub fn new(wheel: &WheelCfg, cfg: &RpmCfg, start_ms: u64) -> Self {
        let segments = wheel.segments.max(1) as usize;
        Self {
            segments,
            cfg: *cfg,
            window: VecDeque::with_capacity(segments + 1),
            rpm: 0,
            last_compute_ms: start_ms,
            decay_timer: None,
        }
    }

    pub fn rpm(&self) -> u32 {
        self.rpm
    }

    pub fn window_len(&self) -> usize {
        self.window.len()
    }

    pub fn window(&self) -> &VecDeque<u64> {
        &self.window
    }

    /// Append a pulse and try to recompute. Returns the new RPM when it changed.
    pub fn record_pulse(&mut self, now_ms: u64, timers: &mut dyn Scheduler) -> Option<u32> {
        self.window.push_back(now_ms);
        while self.window.len() > self.segments {
            self.window.pop_front();
        }
        self.compute_rpm(now_ms, timers)
    }

    /// Recompute when the window is full and the floor has elapsed.
    pub fn compute_rpm(&mut self, now_ms: u64, timers: &mut dyn Scheduler) -> Option<u32> {
        if self.window.len() < self.segments
            || now_ms.saturating_sub(self.last_compute_ms) < self.cfg.recompute_ms
        {
            return None;
        }
        self.last_compute_ms = now_ms;
        if let Some(h) = self.decay_timer.take() {
            timers.cancel(h);
        }
        self.decay_timer = Some(timers.schedule(now_ms, self.cfg.idle_decay_ms, TimerKind::RpmDecay));

        let mean = mean_interval_ms(&self.window)?;
        let rpm = rpm_from_interval(mean, self.segments as u32);
        if rpm == self.rpm {
            return None;
        }
        self.rpm = rpm;
        tracing::info!(rpm, "rpm");
        Some(rpm)
    }

    /// The idle-decay timer fired. Returns true if RPM changed.
    pub fn on_idle_decay(&mut self) -> bool {
        self.decay_timer = None;
        self.window.clear();
        let changed = self.rpm != 0;
        self.rpm = 0;
        if changed {
            tracing::info!(rpm = 0, "rpm");
        } else {
            tracing::debug!("rpm idle decay with wheel already stopped");
        }
        changed
    }
}
