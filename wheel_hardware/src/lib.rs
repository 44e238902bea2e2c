pub mod error;
#[cfg(all(feature = "hardware", target_os = "linux"))]
pub mod gpio;
pub mod util;

use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use wheel_traits::{Cue, CuePlayer, Feeder, Level, PulseSource};

use crate::error::HwError;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Scripted rotation sensor.
///
/// Plays back a list of gaps: after each gap it reports a `Low` (triggered)
/// edge, immediately followed by a `High` release edge. Once the script is
/// exhausted it only reports timeouts.
pub struct SimulatedSensor {
    gaps: Vec<Duration>,
    idx: usize,
    remaining: Option<Duration>,
    release_pending: bool,
    emitted: Arc<AtomicUsize>,
}

impl SimulatedSensor {
    pub fn new(gaps: Vec<Duration>) -> Self {
        Self {
            gaps,
            idx: 0,
            remaining: None,
            release_pending: false,
            emitted: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// `count` pulses spaced `interval` apart, the first after one interval.
    pub fn uniform(count: usize, interval: Duration) -> Self {
        Self::new(vec![interval; count])
    }

    /// Shared counter of triggered edges emitted so far.
    pub fn emitted_handle(&self) -> Arc<AtomicUsize> {
        self.emitted.clone()
    }

    /// Total script length.
    pub fn script_duration(&self) -> Duration {
        self.gaps.iter().sum()
    }
}

impl PulseSource for SimulatedSensor {
    fn next_edge(&mut self, timeout: Duration) -> Result<Option<Level>, BoxError> {
        if self.release_pending {
            self.release_pending = false;
            return Ok(Some(Level::High));
        }
        let Some(gap) = self.gaps.get(self.idx).copied() else {
            std::thread::sleep(timeout);
            return Ok(None);
        };
        let remaining = self.remaining.unwrap_or(gap);
        if remaining > timeout {
            std::thread::sleep(timeout);
            self.remaining = Some(remaining - timeout);
            return Ok(None);
        }
        std::thread::sleep(remaining);
        self.remaining = None;
        self.idx += 1;
        self.release_pending = true;
        self.emitted.fetch_add(1, Ordering::Relaxed);
        Ok(Some(Level::Low))
    }
}

/// Simulated feeder: logs activations and exposes counters for inspection.
#[derive(Clone, Default)]
pub struct SimulatedFeeder {
    activations: Arc<AtomicUsize>,
    active: Arc<AtomicBool>,
}

impl SimulatedFeeder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn activations(&self) -> usize {
        self.activations.load(Ordering::Relaxed)
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }
}

impl Feeder for SimulatedFeeder {
    fn activate(&mut self) -> Result<(), BoxError> {
        self.activations.fetch_add(1, Ordering::Relaxed);
        self.active.store(true, Ordering::Relaxed);
        tracing::info!("feeder line active (simulated)");
        Ok(())
    }

    fn deactivate(&mut self) -> Result<(), BoxError> {
        self.active.store(false, Ordering::Relaxed);
        tracing::debug!("feeder line released (simulated)");
        Ok(())
    }
}

/// Cue player that only logs the cue name.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingCuePlayer;

impl CuePlayer for LoggingCuePlayer {
    fn play(&mut self, cue: Cue) -> Result<(), BoxError> {
        tracing::info!(cue = %cue, "cue");
        Ok(())
    }
}

/// Plays `<dir>/<cue>.wav` through an external player (e.g. `aplay`).
///
/// The player process is spawned and reaped on a detached thread; `play`
/// never waits for playback to finish.
#[derive(Debug, Clone)]
pub struct CommandCuePlayer {
    program: String,
    dir: PathBuf,
}

impl CommandCuePlayer {
    pub fn new(program: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            dir: dir.into(),
        }
    }

    /// Path of the sound asset for `cue`.
    pub fn asset_path(&self, cue: Cue) -> PathBuf {
        self.dir.join(format!("{cue}.wav"))
    }
}

impl CuePlayer for CommandCuePlayer {
    fn play(&mut self, cue: Cue) -> Result<(), BoxError> {
        let path = self.asset_path(cue);
        let mut child = Command::new(&self.program)
            .arg(&path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| HwError::Playback(format!("{} {}: {e}", self.program, path.display())))?;
        tracing::debug!(cue = %cue, path = %path.display(), "cue playback started");
        std::thread::spawn(move || {
            let _ = child.wait();
        });
        Ok(())
    }
}
