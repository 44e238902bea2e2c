//! Jackpot odds, draw, win history and cooldown.
//!
//! The chance starts at `base_chance` and loses `decrease_per_win` for every
//! win still inside the TTL, floored at 0. Each evaluation starts a fixed
//! cooldown before drawing; the cooldown is never extended or cut short.

use std::collections::VecDeque;

use rand::{Rng, RngCore};

use crate::config::JackpotCfg;
use crate::timer::{Scheduler, TimerKind};

/// Draws are uniform over `0..DRAW_RANGE`.
pub const DRAW_RANGE: u32 = 100;

/// One evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JackpotOutcome {
    pub won: bool,
    pub chance: u32,
    pub draw: u32,
}

pub struct JackpotEngine {
    cfg: JackpotCfg,
    history: VecDeque<u64>,
    cooldown_until_ms: Option<u64>,
    rng: Box<dyn RngCore + Send>,
}

impl core::fmt::Debug for JackpotEngine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("JackpotEngine")
            .field("history", &self.history)
            .field("cooldown_until_ms", &self.cooldown_until_ms)
            .finish_non_exhaustive()
    }
}

impl JackpotEngine {
    pub fn new(cfg: JackpotCfg, rng: Box<dyn RngCore + Send>) -> Self {
        Self {
            history: VecDeque::with_capacity(cfg.history_capacity.max(1)),
            cfg,
            cooldown_until_ms: None,
            rng,
        }
    }

    /// Wins newer than `now_ms - ttl`.
    pub fn recent_wins(&self, now_ms: u64) -> usize {
        self.history
            .iter()
            .filter(|&&ts| ts.saturating_add(self.cfg.history_ttl_ms) > now_ms)
            .count()
    }

    /// Current chance in percent.
    pub fn compute_chance(&self, now_ms: u64) -> u32 {
        let wins = u32::try_from(self.recent_wins(now_ms)).unwrap_or(u32::MAX);
        self.cfg
            .base_chance
            .saturating_sub(self.cfg.decrease_per_win.saturating_mul(wins))
    }

    /// Enough recent wins that the chance is exhausted. Never true with decay disabled.
    pub fn win_limit_reached(&self, now_ms: u64) -> bool {
        if self.cfg.decrease_per_win == 0 {
            return false;
        }
        let wins = u64::try_from(self.recent_wins(now_ms)).unwrap_or(u64::MAX);
        wins.saturating_mul(u64::from(self.cfg.decrease_per_win)) >= u64::from(self.cfg.base_chance)
    }

    pub fn cooldown_active(&self) -> bool {
        self.cooldown_until_ms.is_some()
    }

    pub fn cooldown_until_ms(&self) -> Option<u64> {
        self.cooldown_until_ms
    }

    /// Start the cooldown, then draw. A win is recorded in the history; cues
    /// and feeding are the caller's business.
    pub fn resolve(&mut self, now_ms: u64, timers: &mut dyn Scheduler) -> JackpotOutcome {
        debug_assert!(!self.cooldown_active(), "evaluation during cooldown");
        timers.schedule(now_ms, self.cfg.cooldown_ms, TimerKind::CooldownEnd);
        self.cooldown_until_ms = Some(now_ms.saturating_add(self.cfg.cooldown_ms));

        let chance = self.compute_chance(now_ms);
        let draw = self.rng.random_range(0..DRAW_RANGE);
        let won = draw <= chance;
        tracing::info!(chance, draw, won, "jackpot");
        if won {
            self.record_win(now_ms);
        }
        JackpotOutcome { won, chance, draw }
    }

    fn record_win(&mut self, now_ms: u64) {
        self.history.push_back(now_ms);
        while self.history.len() > self.cfg.history_capacity.max(1) {
            self.history.pop_front();
        }
    }

    pub fn on_cooldown_end(&mut self) {
        self.cooldown_until_ms = None;
        tracing::debug!("jackpot cooldown over");
    }

    /// Win timestamps, oldest first.
    pub fn history(&self) -> &VecDeque<u64> {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::TimerQueue;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn engine(cfg: JackpotCfg) -> JackpotEngine {
        JackpotEngine::new(cfg, Box::new(Pcg32::seed_from_u64(7)))
    }

    fn decaying() -> JackpotCfg {
        JackpotCfg {
            decrease_per_win: 20,
            ..JackpotCfg::default()
        }
    }

    #[test]
    fn full_chance_always_wins() {
        let mut q = TimerQueue::new();
        let mut e = engine(JackpotCfg::default());
        for i in 0..50u64 {
            let out = e.resolve(i * 100_000, &mut q);
            assert!(out.won, "draw {} must not beat chance 100", out.draw);
            e.on_cooldown_end();
        }
        assert_eq!(e.history().len(), 10);
    }

    #[test]
    fn chance_decays_per_recent_win_and_floors_at_zero() {
        let mut e = engine(decaying());
        assert_eq!(e.compute_chance(0), 100);
        for t in [10, 20, 30] {
            e.record_win(t);
        }
        assert_eq!(e.compute_chance(100), 40);
        for t in [40, 50, 60] {
            e.record_win(t);
        }
        assert_eq!(e.compute_chance(100), 0);
        assert!(e.win_limit_reached(100));
    }

    #[test]
    fn wins_past_ttl_stop_counting() {
        let cfg = decaying();
        let mut e = engine(cfg);
        e.record_win(1_000);
        assert_eq!(e.recent_wins(1_000 + cfg.history_ttl_ms - 1), 1);
        assert_eq!(e.recent_wins(1_000 + cfg.history_ttl_ms), 0);
        assert_eq!(e.compute_chance(1_000 + cfg.history_ttl_ms), 100);
    }

    #[test]
    fn no_win_limit_without_decay() {
        let mut e = engine(JackpotCfg::default());
        for t in 0..10 {
            e.record_win(t);
        }
        assert!(!e.win_limit_reached(10));
    }

    #[test]
    fn resolve_arms_cooldown_before_drawing() {
        let mut q = TimerQueue::new();
        let mut e = engine(JackpotCfg::default());
        e.resolve(500, &mut q);
        assert!(e.cooldown_active());
        assert_eq!(e.cooldown_until_ms(), Some(20_500));
        assert_eq!(q.count_kind(TimerKind::CooldownEnd), 1);
        e.on_cooldown_end();
        assert!(!e.cooldown_active());
    }
}
