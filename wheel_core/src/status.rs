//! Outcomes reported by the controller's event handlers.

use crate::jackpot::JackpotOutcome;

/// Why a pulse did not count toward progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Feeder busy period running.
    Feeding,
    /// Jackpot cooldown running.
    Cooldown,
    /// Too many recent wins.
    WinLimit,
    /// Outside the operating hours.
    OutsideHours,
}

/// Result of one rotation pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulseOutcome {
    /// Pulse recorded for RPM only; progress untouched.
    Ignored(IgnoreReason),
    /// Steps added, no threshold crossed.
    Accumulated,
    /// Threshold crossed; count is now the given value.
    CountReached(u32),
    /// Target count reached and the jackpot was drawn.
    Jackpot(JackpotOutcome),
}

impl PulseOutcome {
    pub fn is_accepted(&self) -> bool {
        !matches!(self, PulseOutcome::Ignored(_))
    }
}

/// Result of one timer expiry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimerOutcome {
    /// Idle abort with progress in flight: count and whole steps lost.
    Aborted { count: u32, steps: f64 },
    /// Idle abort at count 0; steps (if any) cleared silently.
    IdleReset,
    /// RPM window cleared and RPM forced to 0.
    RpmDecayed,
    CooldownEnded,
    /// Feeder output back at rest.
    FeedReleased,
    /// Feeder busy period over.
    FeedFinished,
}
