//! Feeder output: short active pulse, then a longer busy period.

use wheel_traits::Feeder;

use crate::config::FeederCfg;
use crate::hw_error::map_hw_error;
use crate::timer::{Scheduler, TimerKind};

pub struct FeederActuator {
    output: Box<dyn Feeder>,
    cfg: FeederCfg,
    feeding: bool,
    line_active: bool,
    busy_until_ms: Option<u64>,
}

impl core::fmt::Debug for FeederActuator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FeederActuator")
            .field("cfg", &self.cfg)
            .field("feeding", &self.feeding)
            .field("line_active", &self.line_active)
            .field("busy_until_ms", &self.busy_until_ms)
            .finish_non_exhaustive()
    }
}

impl FeederActuator {
    pub fn new(output: Box<dyn Feeder>, cfg: FeederCfg) -> Self {
        Self {
            output,
            cfg,
            feeding: false,
            line_active: false,
            busy_until_ms: None,
        }
    }

    pub fn is_feeding(&self) -> bool {
        self.feeding
    }

    /// Output currently driven to the active level.
    pub fn line_active(&self) -> bool {
        self.line_active
    }

    pub fn busy_until_ms(&self) -> Option<u64> {
        self.busy_until_ms
    }

    /// Start a feed. Refused (false) while a previous feed is still running.
    pub fn trigger_feed(&mut self, now_ms: u64, timers: &mut dyn Scheduler) -> bool {
        if self.feeding {
            tracing::warn!("feed requested while feeder busy; ignored");
            return false;
        }
        self.feeding = true;
        self.busy_until_ms = Some(now_ms.saturating_add(self.cfg.run_ms));
        self.line_active = true;
        if let Err(e) = self.output.activate() {
            tracing::warn!(error = %map_hw_error(e.as_ref()), "feeder activate failed");
        }
        timers.schedule(now_ms, self.cfg.pulse_ms, TimerKind::FeedPulseEnd);
        timers.schedule(now_ms, self.cfg.run_ms, TimerKind::FeedRunEnd);
        tracing::info!(pulse_ms = self.cfg.pulse_ms, run_ms = self.cfg.run_ms, "feeding");
        true
    }

    pub fn on_pulse_end(&mut self) {
        self.release();
    }

    pub fn on_run_end(&mut self) {
        self.feeding = false;
        self.busy_until_ms = None;
        tracing::info!("feeder idle");
    }

    /// Return the output to rest. Used at pulse end and on shutdown.
    pub fn release(&mut self) {
        self.line_active = false;
        if let Err(e) = self.output.deactivate() {
            tracing::warn!(error = %map_hw_error(e.as_ref()), "feeder deactivate failed");
        }
    }
}
