//! Recording collaborators for tests and dry runs.
//!
//! Clones share their log, so a test keeps one handle while the controller
//! owns another.

use std::sync::{Arc, Mutex, PoisonError};

use wheel_traits::{Cue, CuePlayer, Feeder};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Feeder that records `activate`/`deactivate` calls.
#[derive(Debug, Clone, Default)]
pub struct RecordingFeeder {
    calls: Arc<Mutex<Vec<&'static str>>>,
    fail: bool,
}

impl RecordingFeeder {
    /// Records calls but reports every one of them as failed.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn activations(&self) -> usize {
        self.calls().iter().filter(|c| **c == "activate").count()
    }

    fn record(&self, call: &'static str) -> Result<(), BoxError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
        if self.fail {
            Err(Box::new(std::io::Error::other("feeder line stuck")))
        } else {
            Ok(())
        }
    }
}

impl Feeder for RecordingFeeder {
    fn activate(&mut self) -> Result<(), BoxError> {
        self.record("activate")
    }
    fn deactivate(&mut self) -> Result<(), BoxError> {
        self.record("deactivate")
    }
}

/// Cue player that records every requested cue.
#[derive(Debug, Clone, Default)]
pub struct RecordingCues {
    played: Arc<Mutex<Vec<Cue>>>,
    fail: bool,
}

impl RecordingCues {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn played(&self) -> Vec<Cue> {
        self.played
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last(&self) -> Option<Cue> {
        self.played().last().copied()
    }

    pub fn clear(&self) {
        self.played
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl CuePlayer for RecordingCues {
    fn play(&mut self, cue: Cue) -> Result<(), BoxError> {
        self.played
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(cue);
        if self.fail {
            Err(Box::new(std::io::Error::other("no audio device")))
        } else {
            Ok(())
        }
    }
}
