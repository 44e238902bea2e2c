//! Backend assembly and the run / simulate / self-check commands.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use eyre::WrapErr;
use wheel_core::runner::{self, RunParams, RunStats};
use wheel_core::{ControllerCfg, HourWindow, Snapshot, WheelController, WheelError};
use wheel_hardware::{CommandCuePlayer, LoggingCuePlayer, SimulatedFeeder};
use wheel_traits::clock::{Clock, ManualClock, MonotonicClock};
use wheel_traits::{CuePlayer, Level};

/// Pulses the scripted sensor emits for `wheel run` without hardware.
#[cfg(not(all(feature = "hardware", target_os = "linux")))]
const DEMO_PULSES: usize = 200;
#[cfg(not(all(feature = "hardware", target_os = "linux")))]
const DEMO_INTERVAL: Duration = Duration::from_millis(100);

/// Wrap a config failure so it maps to the configuration exit code.
pub fn config_error(err: &eyre::Report) -> eyre::Report {
    eyre::Report::new(WheelError::Config(format!("{err:#}")))
}

/// Load and validate the config file. A missing default path means defaults.
pub fn load_config(explicit: Option<&std::path::Path>) -> eyre::Result<wheel_config::Config> {
    let cfg = match explicit {
        Some(path) => wheel_config::load_file(path).map_err(|e| config_error(&e))?,
        None => {
            let path = std::path::Path::new(crate::cli::DEFAULT_CONFIG);
            if path.exists() {
                wheel_config::load_file(path).map_err(|e| config_error(&e))?
            } else {
                tracing::debug!(path = %path.display(), "no config file; using built-in defaults");
                wheel_config::Config::default()
            }
        }
    };
    cfg.validate().map_err(|e| config_error(&e))?;
    Ok(cfg)
}

pub fn trigger_level(cfg: &wheel_config::Config) -> Level {
    if cfg.sensor.active_low {
        Level::Low
    } else {
        Level::High
    }
}

/// Cue player from `[cues]`: the external player when one is configured.
pub fn make_cues(cfg: &wheel_config::Config) -> Box<dyn CuePlayer> {
    match cfg.cues.player.as_deref() {
        Some(program) if !program.is_empty() => {
            Box::new(CommandCuePlayer::new(program, &cfg.cues.dir))
        }
        _ => Box::new(LoggingCuePlayer),
    }
}

#[cfg(all(feature = "hardware", target_os = "linux"))]
fn open_backends(
    cfg: &wheel_config::Config,
) -> eyre::Result<(wheel_hardware::gpio::GpioSensor, wheel_hardware::gpio::GpioFeeder)> {
    let sensor = wheel_hardware::gpio::GpioSensor::new(
        cfg.pins.sensor,
        Duration::from_millis(cfg.sensor.debounce_ms),
    )
    .wrap_err("open sensor pin")?;
    let feeder = wheel_hardware::gpio::GpioFeeder::new(cfg.pins.feeder).wrap_err("open feeder pin")?;
    Ok((sensor, feeder))
}

#[cfg(not(all(feature = "hardware", target_os = "linux")))]
fn open_backends(
    _cfg: &wheel_config::Config,
) -> eyre::Result<(wheel_hardware::SimulatedSensor, SimulatedFeeder)> {
    tracing::info!(
        pulses = DEMO_PULSES,
        interval_ms = DEMO_INTERVAL.as_millis() as u64,
        "built without hardware support; using a scripted sensor"
    );
    Ok((
        wheel_hardware::SimulatedSensor::uniform(DEMO_PULSES, DEMO_INTERVAL),
        SimulatedFeeder::new(),
    ))
}

pub fn run(
    cfg: &wheel_config::Config,
    seed: Option<u64>,
    for_ms: Option<u64>,
    shutdown: &Arc<AtomicBool>,
) -> eyre::Result<RunStats> {
    let (sensor, feeder) = open_backends(cfg)?;
    let builder = WheelController::builder()
        .with_config(ControllerCfg::from(cfg))
        .with_feeder(feeder)
        .with_cues(make_cues(cfg));
    let builder = match seed {
        Some(s) => builder.with_seed(s),
        None => builder,
    };
    let mut controller = builder.build().wrap_err("build controller")?;

    let params = RunParams {
        trigger: trigger_level(cfg),
        stop_after: for_ms.map(Duration::from_millis),
        ..RunParams::default()
    };
    runner::run(&mut controller, sensor, &params, shutdown)
}

/// Options for `wheel simulate`.
#[derive(Debug, Clone, Copy)]
pub struct SimulateArgs {
    pub pulses: u64,
    pub interval_ms: u64,
    pub seed: u64,
    pub all_hours: bool,
}

/// Result of a virtual-time replay.
#[derive(Debug, Clone)]
pub struct SimulateReport {
    pub stats: RunStats,
    pub feeds: usize,
    pub final_state: Snapshot,
}

/// Longest delay any controller timer can have under `cfg`.
fn longest_timer_ms(cfg: &ControllerCfg) -> u64 {
    [
        cfg.progress.idle_abort_ms,
        cfg.rpm.idle_decay_ms,
        cfg.jackpot.cooldown_ms,
        cfg.feeder.run_ms,
    ]
    .into_iter()
    .max()
    .unwrap_or(0)
}

pub fn simulate(cfg: &wheel_config::Config, args: SimulateArgs) -> eyre::Result<SimulateReport> {
    let mut core = ControllerCfg::from(cfg);
    if args.all_hours {
        core.hours = HourWindow::ALWAYS;
    }
    let clock = ManualClock::new();
    clock.set_hour(MonotonicClock::new().local_hour());
    let feeder = SimulatedFeeder::new();
    let mut controller = WheelController::builder()
        .with_config(core)
        .with_feeder(feeder.clone())
        .with_cues(LoggingCuePlayer)
        .with_clock(Box::new(clock.clone()))
        .with_seed(args.seed)
        .build()
        .wrap_err("build controller")?;

    let times: Vec<u64> = (1..=args.pulses)
        .map(|i| i.saturating_mul(args.interval_ms))
        .collect();
    let stats = runner::replay(&mut controller, &clock, &times, longest_timer_ms(&core));
    let final_state = controller.snapshot();
    controller.shutdown();
    Ok(SimulateReport {
        stats,
        feeds: feeder.activations(),
        final_state,
    })
}

/// Build the backends and a controller without running it.
pub fn self_check(cfg: &wheel_config::Config) -> eyre::Result<()> {
    let (_sensor, feeder) = open_backends(cfg)?;
    let controller = WheelController::builder()
        .with_config(ControllerCfg::from(cfg))
        .with_feeder(feeder)
        .with_cues(make_cues(cfg))
        .build()
        .wrap_err("build controller")?;
    tracing::debug!(?controller, "self-check built controller");
    Ok(())
}

pub fn format_stats(s: &RunStats) -> String {
    format!(
        "pulses: {}\naccepted: {}\nignored: {}\ncounts: {}\njackpots: {}\nwins: {}\naborts: {}",
        s.pulses, s.accepted, s.ignored, s.counts, s.jackpots, s.wins, s.aborts,
    )
}

pub fn stats_json(s: &RunStats) -> serde_json::Value {
    serde_json::json!({
        "pulses": s.pulses,
        "accepted": s.accepted,
        "ignored": s.ignored,
        "counts": s.counts,
        "jackpots": s.jackpots,
        "wins": s.wins,
        "aborts": s.aborts,
    })
}

pub fn format_summary(report: &SimulateReport) -> String {
    let state = &report.final_state;
    format!(
        "{}\nfeeds: {}\nfinal count: {}\nfinal rpm: {}\nrecent wins: {}",
        format_stats(&report.stats),
        report.feeds,
        state.count,
        state.rpm,
        state.history.len(),
    )
}

pub fn format_summary_json(report: &SimulateReport) -> String {
    let state = &report.final_state;
    let mut v = stats_json(&report.stats);
    v["feeds"] = serde_json::json!(report.feeds);
    v["final"] = serde_json::json!({
        "now_ms": state.now_ms,
        "count": state.count,
        "steps_fp": state.steps_fp,
        "rpm": state.rpm,
        "history": state.history,
        "cooldown_until_ms": state.cooldown_until_ms,
        "feeding": state.feeding,
    });
    v.to_string()
}
