use std::time::{Duration, Instant};

/// Minimum-interval edge filter for a bouncing mechanical or IR sensor.
///
/// An edge is accepted only if at least `min_interval` has elapsed since the
/// last accepted edge. The first edge is always accepted.
#[derive(Debug, Clone)]
pub struct EdgeDebouncer {
    min_interval: Duration,
    last_accepted: Option<Instant>,
}

impl EdgeDebouncer {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_accepted: None,
        }
    }

    /// Returns true when the edge observed at `at` should be reported.
    pub fn accept(&mut self, at: Instant) -> bool {
        match self.last_accepted {
            Some(prev) if at.saturating_duration_since(prev) < self.min_interval => false,
            _ => {
                self.last_accepted = Some(at);
                true
            }
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}
