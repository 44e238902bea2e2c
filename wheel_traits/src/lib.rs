pub mod clock;

pub use clock::{Clock, ManualClock, MonotonicClock};

use std::fmt;

/// Logic level of a digital line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

/// Source of debounced rotation-sensor edges.
///
/// `next_edge` blocks for at most `timeout` and returns the level the line
/// changed to, or `Ok(None)` when no edge arrived in time.
pub trait PulseSource {
    fn next_edge(
        &mut self,
        timeout: std::time::Duration,
    ) -> Result<Option<Level>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Dispenser control line. Fire-and-forget: there is no feedback path.
pub trait Feeder {
    fn activate(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    fn deactivate(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Audio cue requested by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    /// Intermediate count reached (1..target-1).
    Count(u32),
    Abort,
    Win,
    Lose,
}

impl Cue {
    /// Symbolic name, e.g. `count-3` or `win`. Players map it to a sound asset.
    pub fn name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cue::Count(n) => write!(f, "count-{n}"),
            Cue::Abort => f.write_str("abort"),
            Cue::Win => f.write_str("win"),
            Cue::Lose => f.write_str("lose"),
        }
    }
}

/// Plays audio cues by name. Fire-and-forget: no completion callback.
pub trait CuePlayer {
    fn play(&mut self, cue: Cue) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

impl<T: PulseSource + ?Sized> PulseSource for Box<T> {
    fn next_edge(
        &mut self,
        timeout: std::time::Duration,
    ) -> Result<Option<Level>, Box<dyn std::error::Error + Send + Sync>> {
        (**self).next_edge(timeout)
    }
}

impl<T: Feeder + ?Sized> Feeder for Box<T> {
    fn activate(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).activate()
    }
    fn deactivate(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).deactivate()
    }
}

impl<T: CuePlayer + ?Sized> CuePlayer for Box<T> {
    fn play(&mut self, cue: Cue) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).play(cue)
    }
}
