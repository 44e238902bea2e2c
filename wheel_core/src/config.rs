//! Configuration types for the wheel controller.
//!
//! These are the runtime configuration structs used by `WheelController`.
//! They are separate from the TOML-deserialized config in `wheel_config`.

/// Wheel geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WheelCfg {
    /// Sensor segments per revolution; also the pulse window capacity.
    pub segments: u32,
}

impl Default for WheelCfg {
    fn default() -> Self {
        Self { segments: 24 }
    }
}

/// RPM estimation timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RpmCfg {
    /// Minimum spacing between recomputations (ms).
    pub recompute_ms: u64,
    /// Without a computation for this long, the window clears and RPM drops to 0 (ms).
    pub idle_decay_ms: u64,
}

impl Default for RpmCfg {
    fn default() -> Self {
        Self {
            recompute_ms: 1_000,
            idle_decay_ms: 10_000,
        }
    }
}

/// Difficulty curve and idle-abort for step accumulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressCfg {
    /// Whole steps needed for the first count.
    pub base_steps_per_count: f64,
    /// Threshold multiplier per already-reached count (>= 1.0).
    pub growth_rate: f64,
    /// Fixed-point units per whole step.
    pub scale_factor: u32,
    /// Progress resets after this long without an accepted pulse (ms).
    pub idle_abort_ms: u64,
}

impl ProgressCfg {
    /// Defaults with the base threshold derived from the wheel: three quarters of a revolution.
    pub fn for_segments(segments: u32) -> Self {
        Self {
            base_steps_per_count: f64::from(segments) * 0.75,
            ..Self::default()
        }
    }
}

impl Default for ProgressCfg {
    fn default() -> Self {
        Self {
            base_steps_per_count: 18.0,
            growth_rate: 1.05,
            scale_factor: 10,
            idle_abort_ms: 10_000,
        }
    }
}

/// Hours of the day in which play counts toward progress.
///
/// `start` is inclusive and `end` exclusive. `start > end` wraps past
/// midnight; `start == end` is open around the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourWindow {
    pub start: u8,
    pub end: u8,
}

impl HourWindow {
    /// Open at every hour.
    pub const ALWAYS: Self = Self { start: 0, end: 24 };

    pub fn contains(&self, hour: u8) -> bool {
        match self.start.cmp(&self.end) {
            std::cmp::Ordering::Equal => true,
            std::cmp::Ordering::Less => hour >= self.start && hour < self.end,
            std::cmp::Ordering::Greater => hour >= self.start || hour < self.end,
        }
    }
}

impl Default for HourWindow {
    fn default() -> Self {
        Self { start: 7, end: 21 }
    }
}

/// Jackpot odds, history and cooldown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JackpotCfg {
    /// Count at which the jackpot is evaluated.
    pub target_count: u32,
    /// Win chance with no recent wins (percent).
    pub base_chance: u32,
    /// Chance removed per win inside the TTL (percent). 0 disables decay and the win cap.
    pub decrease_per_win: u32,
    /// Wins older than this no longer count toward decay (ms).
    pub history_ttl_ms: u64,
    /// Fixed quiet period after every evaluation (ms).
    pub cooldown_ms: u64,
    /// Maximum remembered wins.
    pub history_capacity: usize,
}

impl Default for JackpotCfg {
    fn default() -> Self {
        Self {
            target_count: 5,
            base_chance: 100,
            decrease_per_win: 0,
            history_ttl_ms: 5 * 60 * 60 * 1_000,
            cooldown_ms: 20_000,
            history_capacity: 10,
        }
    }
}

/// Feeder output timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeederCfg {
    /// Output held active for this long (ms).
    pub pulse_ms: u64,
    /// Busy period from trigger; pulses are ignored meanwhile (ms).
    pub run_ms: u64,
}

impl Default for FeederCfg {
    fn default() -> Self {
        Self {
            pulse_ms: 100,
            run_ms: 11_000,
        }
    }
}

/// All controller parameters in one bundle, e.g. as converted from a config file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerCfg {
    pub wheel: WheelCfg,
    pub rpm: RpmCfg,
    pub progress: ProgressCfg,
    pub hours: HourWindow,
    pub jackpot: JackpotCfg,
    pub feeder: FeederCfg,
}

impl Default for ControllerCfg {
    fn default() -> Self {
        let wheel = WheelCfg::default();
        Self {
            wheel,
            rpm: RpmCfg::default(),
            progress: ProgressCfg::for_segments(wheel.segments),
            hours: HourWindow::default(),
            jackpot: JackpotCfg::default(),
            feeder: FeederCfg::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(HourWindow { start: 7, end: 21 }, 6, false)]
    #[case(HourWindow { start: 7, end: 21 }, 7, true)]
    #[case(HourWindow { start: 7, end: 21 }, 20, true)]
    #[case(HourWindow { start: 7, end: 21 }, 21, false)]
    #[case(HourWindow { start: 7, end: 21 }, 22, false)]
    #[case(HourWindow { start: 20, end: 6 }, 23, true)]
    #[case(HourWindow { start: 20, end: 6 }, 3, true)]
    #[case(HourWindow { start: 20, end: 6 }, 12, false)]
    #[case(HourWindow { start: 5, end: 5 }, 0, true)]
    #[case(HourWindow::ALWAYS, 23, true)]
    fn hour_window_membership(#[case] w: HourWindow, #[case] hour: u8, #[case] open: bool) {
        assert_eq!(w.contains(hour), open);
    }

    #[test]
    fn base_steps_follow_segments() {
        assert!((ProgressCfg::for_segments(24).base_steps_per_count - 18.0).abs() < f64::EPSILON);
        assert!((ProgressCfg::for_segments(8).base_steps_per_count - 6.0).abs() < f64::EPSILON);
    }
}
