#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema for the wheel feeder.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - Every section and field has a default, so an empty file is a valid
//!   configuration.
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Pins {
    /// BCM pin of the IR rotation sensor
    pub sensor: u8,
    /// BCM pin of the feeder motor relay
    pub feeder: u8,
}

impl Default for Pins {
    fn default() -> Self {
        Self {
            sensor: 23,
            feeder: 24,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Sensor {
    /// Minimum interval between reported edges (ms)
    pub debounce_ms: u64,
    /// Treat the low level as "segment passed" when true
    pub active_low: bool,
}

impl Default for Sensor {
    fn default() -> Self {
        Self {
            debounce_ms: 20,
            active_low: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Wheel {
    /// Sensor segments per revolution
    pub segments: u32,
}

impl Default for Wheel {
    fn default() -> Self {
        Self { segments: 24 }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Progress {
    /// Steps needed for the first count. Defaults to three quarters of a revolution.
    pub base_steps_per_count: Option<f64>,
    /// Multiplier applied per already-reached count (>= 1.0)
    pub growth_rate: f64,
    /// Fixed-point multiplier for step accounting
    pub scale_factor: u32,
    /// Reset progress if no pulse is accepted for this long (ms)
    pub idle_abort_ms: u64,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            base_steps_per_count: None,
            growth_rate: 1.05,
            scale_factor: 10,
            idle_abort_ms: 10_000,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Schedule {
    /// First hour (inclusive) in which play counts
    pub start_hour: u8,
    /// Hour (exclusive) after which play no longer counts
    pub end_hour: u8,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            start_hour: 7,
            end_hour: 21,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Jackpot {
    /// Count that triggers a jackpot evaluation
    pub target_count: u32,
    /// Win chance with no recent wins (percent)
    pub base_chance: u32,
    /// Chance removed per win inside the TTL window (percent, 0 disables decay)
    pub decrease_per_win: u32,
    /// Lookback window for wins counted toward decay (ms)
    pub history_ttl_ms: u64,
    /// No progress or evaluation for this long after an evaluation (ms)
    pub cooldown_ms: u64,
    /// Wins remembered
    pub history_capacity: usize,
}

impl Default for Jackpot {
    fn default() -> Self {
        Self {
            target_count: 5,
            base_chance: 100,
            decrease_per_win: 0,
            history_ttl_ms: 5 * 60 * 60 * 1000,
            cooldown_ms: 20_000,
            history_capacity: 10,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FeederCfg {
    /// How long the relay line is held active (ms)
    pub pulse_ms: u64,
    /// How long the motor runs mechanically; pulses are ignored meanwhile (ms)
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

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Rpm {
    /// Minimum spacing between RPM recomputations (ms)
    pub recompute_ms: u64,
    /// Clear the pulse window and report 0 RPM after this long without a computation (ms)
    pub idle_decay_ms: u64,
}

impl Default for Rpm {
    fn default() -> Self {
        Self {
            recompute_ms: 1000,
            idle_decay_ms: 10_000,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Cues {
    /// Directory containing `<cue>.wav` files
    pub dir: String,
    /// External player invoked as `<player> <dir>/<cue>.wav`; None logs cues only
    pub player: Option<String>,
}

impl Default for Cues {
    fn default() -> Self {
        Self {
            dir: "./sounds".to_string(),
            player: Some("aplay".to_string()),
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Config {
    pub pins: Pins,
    pub sensor: Sensor,
    pub wheel: Wheel,
    pub progress: Progress,
    pub schedule: Schedule,
    pub jackpot: Jackpot,
    pub feeder: FeederCfg,
    pub rpm: Rpm,
    pub cues: Cues,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Read and parse a config file; does not validate.
pub fn load_file(path: &std::path::Path) -> eyre::Result<Config> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("read config {:?}: {}", path, e))?;
    load_toml(&text).map_err(|e| eyre::eyre!("parse config {:?}: {}", path, e))
}

impl Progress {
    /// Effective base steps for a wheel with `segments` segments.
    pub fn base_steps_for(&self, segments: u32) -> f64 {
        self.base_steps_per_count
            .unwrap_or(f64::from(segments) * 0.75)
    }
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Wheel / sensor
        if self.wheel.segments == 0 {
            eyre::bail!("wheel.segments must be >= 1");
        }
        if self.sensor.debounce_ms > 1000 {
            eyre::bail!("sensor.debounce_ms is unreasonably large (>1s)");
        }

        // Progress
        if let Some(base) = self.progress.base_steps_per_count
            && !(base.is_finite() && base > 0.0)
        {
            eyre::bail!("progress.base_steps_per_count must be > 0");
        }
        if !self.progress.growth_rate.is_finite() || self.progress.growth_rate < 1.0 {
            eyre::bail!("progress.growth_rate must be >= 1.0");
        }
        if self.progress.scale_factor == 0 {
            eyre::bail!("progress.scale_factor must be >= 1");
        }
        if self.progress.idle_abort_ms == 0 {
            eyre::bail!("progress.idle_abort_ms must be >= 1");
        }

        // Schedule
        if self.schedule.start_hour > 24 || self.schedule.end_hour > 24 {
            eyre::bail!("schedule.start_hour and schedule.end_hour must be in [0, 24]");
        }

        // Jackpot
        if self.jackpot.target_count == 0 {
            eyre::bail!("jackpot.target_count must be >= 1");
        }
        if self.jackpot.base_chance == 0 || self.jackpot.base_chance > 100 {
            eyre::bail!("jackpot.base_chance must be in [1, 100]");
        }
        if self.jackpot.decrease_per_win > 100 {
            eyre::bail!("jackpot.decrease_per_win must be in [0, 100]");
        }
        if self.jackpot.cooldown_ms == 0 {
            eyre::bail!("jackpot.cooldown_ms must be >= 1");
        }
        if self.jackpot.history_capacity == 0 {
            eyre::bail!("jackpot.history_capacity must be >= 1");
        }

        // Feeder
        if self.feeder.pulse_ms == 0 {
            eyre::bail!("feeder.pulse_ms must be >= 1");
        }
        if self.feeder.run_ms <= self.feeder.pulse_ms {
            eyre::bail!("feeder.run_ms must be greater than feeder.pulse_ms");
        }

        // RPM
        if self.rpm.recompute_ms == 0 {
            eyre::bail!("rpm.recompute_ms must be >= 1");
        }
        if self.rpm.idle_decay_ms == 0 {
            eyre::bail!("rpm.idle_decay_ms must be >= 1");
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly");
        }

        Ok(())
    }
}
