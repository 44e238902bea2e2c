//! `From` implementations bridging `wheel_config` types to `wheel_core` types.

use crate::config::{
    ControllerCfg, FeederCfg, HourWindow, JackpotCfg, ProgressCfg, RpmCfg, WheelCfg,
};

// ── WheelCfg ─────────────────────────────────────────────────────────────────

impl From<&wheel_config::Wheel> for WheelCfg {
    fn from(c: &wheel_config::Wheel) -> Self {
        Self {
            segments: c.segments,
        }
    }
}

// ── RpmCfg ───────────────────────────────────────────────────────────────────

impl From<&wheel_config::Rpm> for RpmCfg {
    fn from(c: &wheel_config::Rpm) -> Self {
        Self {
            recompute_ms: c.recompute_ms,
            idle_decay_ms: c.idle_decay_ms,
        }
    }
}

// ── HourWindow ───────────────────────────────────────────────────────────────

impl From<&wheel_config::Schedule> for HourWindow {
    fn from(c: &wheel_config::Schedule) -> Self {
        Self {
            start: c.start_hour,
            end: c.end_hour,
        }
    }
}

// ── JackpotCfg ───────────────────────────────────────────────────────────────

impl From<&wheel_config::Jackpot> for JackpotCfg {
    fn from(c: &wheel_config::Jackpot) -> Self {
        Self {
            target_count: c.target_count,
            base_chance: c.base_chance,
            decrease_per_win: c.decrease_per_win,
            history_ttl_ms: c.history_ttl_ms,
            cooldown_ms: c.cooldown_ms,
            history_capacity: c.history_capacity,
        }
    }
}

// ── FeederCfg ────────────────────────────────────────────────────────────────

impl From<&wheel_config::FeederCfg> for FeederCfg {
    fn from(c: &wheel_config::FeederCfg) -> Self {
        Self {
            pulse_ms: c.pulse_ms,
            run_ms: c.run_ms,
        }
    }
}

// ── ControllerCfg ────────────────────────────────────────────────────────────

/// Progress needs the segment count to resolve its default base threshold,
/// so it is only converted as part of the whole file.
impl From<&wheel_config::Config> for ControllerCfg {
    fn from(c: &wheel_config::Config) -> Self {
        Self {
            wheel: (&c.wheel).into(),
            rpm: (&c.rpm).into(),
            progress: ProgressCfg {
                base_steps_per_count: c.progress.base_steps_for(c.wheel.segments),
                growth_rate: c.progress.growth_rate,
                scale_factor: c.progress.scale_factor,
                idle_abort_ms: c.progress.idle_abort_ms,
            },
            hours: (&c.schedule).into(),
            jackpot: (&c.jackpot).into(),
            feeder: (&c.feeder).into(),
        }
    }
}
