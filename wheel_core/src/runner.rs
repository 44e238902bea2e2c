//! Event-loop drivers for `WheelController`.
//!
//! `run` drives a controller in real time from a `PulseSource` on a listener
//! thread. `replay` drives it in virtual time from a list of pulse timestamps
//! and a shared `ManualClock`, firing each timer exactly at its deadline.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossbeam_channel::RecvTimeoutError;
use wheel_traits::clock::ManualClock;
use wheel_traits::{Level, PulseSource};

use crate::controller::WheelController;
use crate::error::Result;
use crate::listener::PulseListener;
use crate::status::{PulseOutcome, TimerOutcome};
use crate::util::{duration_ms, until};

/// How the real-time loop waits and when it stops.
#[derive(Debug, Clone, Copy)]
pub struct RunParams {
    /// Edge level that counts as a pulse.
    pub trigger: Level,
    /// Longest single wait, so the shutdown flag is checked regularly.
    pub poll_interval: Duration,
    /// Stop on our own after this long; `None` runs until shutdown.
    pub stop_after: Option<Duration>,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            trigger: Level::Low,
            poll_interval: Duration::from_millis(50),
            stop_after: None,
        }
    }
}

/// What happened during a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub pulses: u64,
    pub accepted: u64,
    pub ignored: u64,
    pub counts: u64,
    pub jackpots: u64,
    pub wins: u64,
    pub aborts: u64,
}

impl RunStats {
    pub fn record_pulse(&mut self, outcome: &PulseOutcome) {
        self.pulses += 1;
        match outcome {
            PulseOutcome::Ignored(_) => self.ignored += 1,
            PulseOutcome::Accumulated => self.accepted += 1,
            PulseOutcome::CountReached(_) => {
                self.accepted += 1;
                self.counts += 1;
            }
            PulseOutcome::Jackpot(j) => {
                self.accepted += 1;
                self.jackpots += 1;
                if j.won {
                    self.wins += 1;
                }
            }
        }
    }

    pub fn record_timers(&mut self, fired: &[TimerOutcome]) {
        self.aborts += fired
            .iter()
            .filter(|t| matches!(t, TimerOutcome::Aborted { .. }))
            .count() as u64;
    }
}

/// Run until `shutdown` is set, the source goes away or `stop_after` elapses.
/// The feeder is returned to rest before returning.
pub fn run<P: PulseSource + Send + 'static>(
    controller: &mut WheelController,
    source: P,
    params: &RunParams,
    shutdown: &AtomicBool,
) -> Result<RunStats> {
    let listener = PulseListener::spawn(source, params.trigger, params.poll_interval)?;
    let stop_at = params
        .stop_after
        .map(|d| controller.now_ms().saturating_add(duration_ms(d)));
    let mut stats = RunStats::default();
    tracing::info!(trigger = ?params.trigger, "wheel controller running");

    loop {
        stats.record_timers(&controller.fire_due_timers());
        if shutdown.load(Ordering::Relaxed) {
            tracing::info!("shutdown requested");
            break;
        }
        let now = controller.now_ms();
        if stop_at.is_some_and(|limit| now >= limit) {
            break;
        }

        let mut wait = params.poll_interval;
        if let Some(deadline) = controller.next_deadline_ms() {
            wait = wait.min(until(now, deadline));
        }
        if let Some(limit) = stop_at {
            wait = wait.min(until(now, limit));
        }

        match listener.recv_timeout(wait) {
            Ok(()) => {
                stats.record_timers(&controller.fire_due_timers());
                stats.record_pulse(&controller.on_pulse());
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                tracing::warn!("pulse listener stopped");
                break;
            }
        }
    }

    controller.shutdown();
    tracing::info!(
        pulses = stats.pulses,
        forwarded = listener.forwarded(),
        jackpots = stats.jackpots,
        wins = stats.wins,
        "wheel controller stopped"
    );
    Ok(stats)
}

/// Move `clock` forward to controller time `target_ms`, stopping at every
/// timer deadline on the way so each fires at exactly its deadline.
///
/// `clock` must be the clock the controller was built with.
pub fn advance_to(
    controller: &mut WheelController,
    clock: &ManualClock,
    target_ms: u64,
) -> Vec<TimerOutcome> {
    let mut fired = Vec::new();
    while let Some(deadline) = controller.next_deadline_ms().filter(|d| *d <= target_ms) {
        let now = controller.now_ms();
        if deadline > now {
            clock.advance_ms(deadline - now);
        }
        fired.extend(controller.fire_due_timers());
    }
    let now = controller.now_ms();
    if target_ms > now {
        clock.advance_ms(target_ms - now);
    }
    fired
}

/// Feed pulses at the given controller times (ascending), then let `tail_ms`
/// pass. Timers due at the same millisecond as a pulse fire first.
pub fn replay(
    controller: &mut WheelController,
    clock: &ManualClock,
    pulse_times_ms: &[u64],
    tail_ms: u64,
) -> RunStats {
    let mut stats = RunStats::default();
    for &t in pulse_times_ms {
        stats.record_timers(&advance_to(controller, clock, t));
        stats.record_pulse(&controller.on_pulse());
    }
    let end = controller.now_ms().saturating_add(tail_ms);
    stats.record_timers(&advance_to(controller, clock, end));
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jackpot::JackpotOutcome;
    use crate::status::IgnoreReason;

    #[test]
    fn stats_classify_outcomes() {
        let mut s = RunStats::default();
        s.record_pulse(&PulseOutcome::Ignored(IgnoreReason::Cooldown));
        s.record_pulse(&PulseOutcome::Accumulated);
        s.record_pulse(&PulseOutcome::CountReached(1));
        s.record_pulse(&PulseOutcome::Jackpot(JackpotOutcome {
            won: true,
            chance: 100,
            draw: 3,
        }));
        s.record_timers(&[
            TimerOutcome::Aborted { count: 2, steps: 4.0 },
            TimerOutcome::RpmDecayed,
        ]);
        assert_eq!(
            s,
            RunStats {
                pulses: 4,
                accepted: 3,
                ignored: 1,
                counts: 1,
                jackpots: 1,
                wins: 1,
                aborts: 1,
            }
        );
    }
}
