//! Type-state builder for `WheelController`.
//!
//! The builder enforces at compile time that a feeder and a cue player are
//! provided before `build()` is available. `try_build()` is always available
//! for dynamic checks.

use std::marker::PhantomData;
use std::sync::Arc;

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;
use wheel_traits::clock::{Clock, MonotonicClock};
use wheel_traits::{CuePlayer, Feeder};

use crate::config::*;
use crate::controller::WheelController;
use crate::count::CountStateMachine;
use crate::error::{BuildError, Result};
use crate::feeder::FeederActuator;
use crate::jackpot::JackpotEngine;
use crate::progress::ProgressTracker;
use crate::rpm::RotationSampler;
use crate::timer::TimerQueue;

impl WheelController {
    /// Start building a controller.
    pub fn builder() -> ControllerBuilder<Missing, Missing> {
        ControllerBuilder::default()
    }
}

// ── Type-state markers ───────────────────────────────────────────────────────

pub struct Missing;
pub struct Set;

/// Builder for `WheelController`. All fields are validated on `build()`.
pub struct ControllerBuilder<F, C> {
    feeder: Option<Box<dyn Feeder>>,
    cues: Option<Box<dyn CuePlayer>>,
    wheel: Option<WheelCfg>,
    rpm: Option<RpmCfg>,
    progress: Option<ProgressCfg>,
    hours: Option<HourWindow>,
    jackpot: Option<JackpotCfg>,
    feeder_cfg: Option<FeederCfg>,
    clock: Option<Box<dyn Clock + Send + Sync>>,
    rng: Option<Box<dyn RngCore + Send>>,
    _f: PhantomData<F>,
    _c: PhantomData<C>,
}

impl Default for ControllerBuilder<Missing, Missing> {
    fn default() -> Self {
        Self {
            feeder: None,
            cues: None,
            wheel: None,
            rpm: None,
            progress: None,
            hours: None,
            jackpot: None,
            feeder_cfg: None,
            clock: None,
            rng: None,
            _f: PhantomData,
            _c: PhantomData,
        }
    }
}

fn invalid(msg: &'static str) -> eyre::Report {
    eyre::Report::new(BuildError::InvalidConfig(msg))
}

/// Validate configuration and construct the controller.
///
/// This is the single source of truth for validation and construction.
fn validate_and_build(
    feeder: Box<dyn Feeder>,
    cues: Box<dyn CuePlayer>,
    cfg: ControllerCfg,
    clock: Option<Box<dyn Clock + Send + Sync>>,
    rng: Option<Box<dyn RngCore + Send>>,
) -> Result<WheelController> {
    // ── Validation ───────────────────────────────────────────────────────────
    if cfg.wheel.segments == 0 {
        return Err(invalid("segments must be >= 1"));
    }
    if cfg.rpm.recompute_ms == 0 {
        return Err(invalid("rpm recompute_ms must be >= 1"));
    }
    if cfg.rpm.idle_decay_ms == 0 {
        return Err(invalid("rpm idle_decay_ms must be >= 1"));
    }
    let p = &cfg.progress;
    if !(p.base_steps_per_count.is_finite() && p.base_steps_per_count > 0.0) {
        return Err(invalid("base_steps_per_count must be > 0"));
    }
    if !p.growth_rate.is_finite() || p.growth_rate < 1.0 {
        return Err(invalid("growth_rate must be >= 1.0"));
    }
    if p.scale_factor == 0 {
        return Err(invalid("scale_factor must be >= 1"));
    }
    if p.idle_abort_ms == 0 {
        return Err(invalid("idle_abort_ms must be >= 1"));
    }
    if cfg.hours.start > 24 || cfg.hours.end > 24 {
        return Err(invalid("operating hours must be in [0, 24]"));
    }
    let j = &cfg.jackpot;
    if j.target_count == 0 {
        return Err(invalid("target_count must be >= 1"));
    }
    if j.base_chance == 0 || j.base_chance > 100 {
        return Err(invalid("base_chance must be in [1, 100]"));
    }
    if j.decrease_per_win > 100 {
        return Err(invalid("decrease_per_win must be in [0, 100]"));
    }
    if j.cooldown_ms == 0 {
        return Err(invalid("cooldown_ms must be >= 1"));
    }
    if j.history_capacity == 0 {
        return Err(invalid("history_capacity must be >= 1"));
    }
    if cfg.feeder.pulse_ms == 0 {
        return Err(invalid("feeder pulse_ms must be >= 1"));
    }
    if cfg.feeder.run_ms <= cfg.feeder.pulse_ms {
        return Err(invalid("feeder run_ms must exceed pulse_ms"));
    }

    // ── Construct ────────────────────────────────────────────────────────────
    let clock: Arc<dyn Clock + Send + Sync> = match clock {
        Some(b) => Arc::from(b),
        None => Arc::new(MonotonicClock::new()),
    };
    let rng: Box<dyn RngCore + Send> = match rng {
        Some(r) => r,
        None => Box::new(Pcg32::from_os_rng()),
    };

    let epoch = clock.now();
    let start_ms = clock.ms_since(epoch);

    tracing::debug!(
        segments = cfg.wheel.segments,
        target = j.target_count,
        base_chance = j.base_chance,
        decrease_per_win = j.decrease_per_win,
        "controller configured"
    );

    Ok(WheelController {
        clock,
        epoch,
        timers: TimerQueue::new(),
        sampler: RotationSampler::new(&cfg.wheel, &cfg.rpm, start_ms),
        progress: ProgressTracker::new(cfg.progress, cfg.hours),
        counter: CountStateMachine::new(j.target_count),
        jackpot: JackpotEngine::new(cfg.jackpot, rng),
        feeder: FeederActuator::new(feeder, cfg.feeder),
        cues,
    })
}

impl<F, C> ControllerBuilder<F, C> {
    /// Fallible build available in any type-state; returns a typed error for missing pieces.
    pub fn try_build(self) -> Result<WheelController> {
        let feeder = self
            .feeder
            .ok_or_else(|| eyre::Report::new(BuildError::MissingFeeder))?;
        let cues = self
            .cues
            .ok_or_else(|| eyre::Report::new(BuildError::MissingCuePlayer))?;

        let wheel = self.wheel.unwrap_or_default();
        let cfg = ControllerCfg {
            wheel,
            rpm: self.rpm.unwrap_or_default(),
            progress: self
                .progress
                .unwrap_or_else(|| ProgressCfg::for_segments(wheel.segments)),
            hours: self.hours.unwrap_or_default(),
            jackpot: self.jackpot.unwrap_or_default(),
            feeder: self.feeder_cfg.unwrap_or_default(),
        };

        validate_and_build(feeder, cues, cfg, self.clock, self.rng)
    }
}

/// Chainable setters that do not affect type-state.
impl<F, C> ControllerBuilder<F, C> {
    /// Apply a full parameter bundle (e.g. converted from `wheel_config::Config`).
    pub fn with_config(mut self, cfg: ControllerCfg) -> Self {
        self.wheel = Some(cfg.wheel);
        self.rpm = Some(cfg.rpm);
        self.progress = Some(cfg.progress);
        self.hours = Some(cfg.hours);
        self.jackpot = Some(cfg.jackpot);
        self.feeder_cfg = Some(cfg.feeder);
        self
    }
    pub fn with_wheel(mut self, wheel: WheelCfg) -> Self {
        self.wheel = Some(wheel);
        self
    }
    pub fn with_rpm(mut self, rpm: RpmCfg) -> Self {
        self.rpm = Some(rpm);
        self
    }
    /// Defaults to `ProgressCfg::for_segments` of the configured wheel.
    pub fn with_progress(mut self, progress: ProgressCfg) -> Self {
        self.progress = Some(progress);
        self
    }
    pub fn with_hours(mut self, hours: HourWindow) -> Self {
        self.hours = Some(hours);
        self
    }
    pub fn with_jackpot(mut self, jackpot: JackpotCfg) -> Self {
        self.jackpot = Some(jackpot);
        self
    }
    pub fn with_feeder_cfg(mut self, feeder: FeederCfg) -> Self {
        self.feeder_cfg = Some(feeder);
        self
    }
    /// Provide a custom clock implementation; defaults to `MonotonicClock` when not provided.
    pub fn with_clock(mut self, clock: Box<dyn Clock + Send + Sync>) -> Self {
        self.clock = Some(clock);
        self
    }
    /// Provide the jackpot random source; defaults to an OS-seeded `Pcg32`.
    pub fn with_rng(mut self, rng: Box<dyn RngCore + Send>) -> Self {
        self.rng = Some(rng);
        self
    }
    /// Deterministic draws: `Pcg32` seeded from `seed`.
    pub fn with_seed(self, seed: u64) -> Self {
        self.with_rng(Box::new(Pcg32::seed_from_u64(seed)))
    }
}

// Setters that advance type-state
impl<C> ControllerBuilder<Missing, C> {
    pub fn with_feeder(self, feeder: impl Feeder + 'static) -> ControllerBuilder<Set, C> {
        ControllerBuilder {
            feeder: Some(Box::new(feeder)),
            cues: self.cues,
            wheel: self.wheel,
            rpm: self.rpm,
            progress: self.progress,
            hours: self.hours,
            jackpot: self.jackpot,
            feeder_cfg: self.feeder_cfg,
            clock: self.clock,
            rng: self.rng,
            _f: PhantomData,
            _c: PhantomData,
        }
    }
}

impl<F> ControllerBuilder<F, Missing> {
    pub fn with_cues(self, cues: impl CuePlayer + 'static) -> ControllerBuilder<F, Set> {
        ControllerBuilder {
            feeder: self.feeder,
            cues: Some(Box::new(cues)),
            wheel: self.wheel,
            rpm: self.rpm,
            progress: self.progress,
            hours: self.hours,
            jackpot: self.jackpot,
            feeder_cfg: self.feeder_cfg,
            clock: self.clock,
            rng: self.rng,
            _f: PhantomData,
            _c: PhantomData,
        }
    }
}

impl ControllerBuilder<Set, Set> {
    /// Validate and build. Only available once the feeder and cue player are set.
    pub fn build(self) -> Result<WheelController> {
        self.try_build()
    }
}
