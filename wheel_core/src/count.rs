//! Discrete count milestones on the way to the jackpot.

/// Where the count stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Counting(u32),
    /// Target reached; the jackpot is being resolved.
    Evaluating,
}

/// Result of a threshold crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Intermediate count reached.
    Count(u32),
    /// Target reached; resolve the jackpot, then `reset`.
    Target,
}

#[derive(Debug)]
pub struct CountStateMachine {
    target: u32,
    count: u32,
    evaluating: bool,
}

impl CountStateMachine {
    pub fn new(target: u32) -> Self {
        Self {
            target: target.max(1),
            count: 0,
            evaluating: false,
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    pub fn phase(&self) -> Phase {
        if self.evaluating {
            Phase::Evaluating
        } else if self.count == 0 {
            Phase::Idle
        } else {
            Phase::Counting(self.count)
        }
    }

    /// One threshold crossing: count goes up by exactly one.
    pub fn advance(&mut self) -> Advance {
        let next = self.count.saturating_add(1);
        if next >= self.target {
            self.evaluating = true;
            Advance::Target
        } else {
            self.count = next;
            Advance::Count(next)
        }
    }

    /// Idle abort. Returns the count that was lost, if any.
    pub fn abort(&mut self) -> Option<u32> {
        let lost = self.count;
        self.reset();
        (lost > 0).then_some(lost)
    }

    pub fn reset(&mut self) {
        self.count = 0;
        self.evaluating = false;
    }
}
