//! Virtual-time timer facility.
//!
//! Components schedule delayed events through the `Scheduler` trait and keep
//! the returned handle if they may need to cancel. `TimerQueue` holds plain
//! deadlines in controller milliseconds; whoever drives the controller pops due
//! entries and dispatches them, so time can be real or manual.

/// What a timer means when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// No accepted pulse for the idle-abort duration.
    IdleAbort,
    /// No RPM computation for the idle-decay duration.
    RpmDecay,
    /// Jackpot cooldown over.
    CooldownEnd,
    /// Feeder output goes back to rest.
    FeedPulseEnd,
    /// Feeder busy period over.
    FeedRunEnd,
}

/// Opaque identity of a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

/// Schedule-after-delay and cancel.
pub trait Scheduler {
    /// Fire `kind` at `now_ms + delay_ms`.
    fn schedule(&mut self, now_ms: u64, delay_ms: u64, kind: TimerKind) -> TimerHandle;
    /// Cancel a pending timer. Returns false if it already fired or was cancelled.
    fn cancel(&mut self, handle: TimerHandle) -> bool;
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    handle: TimerHandle,
    deadline_ms: u64,
    kind: TimerKind,
}

/// A timer that came due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expired {
    pub handle: TimerHandle,
    pub kind: TimerKind,
    pub deadline_ms: u64,
}

/// Pending timers ordered by (deadline, scheduling order).
///
/// Only a handful of timers are ever outstanding, so a flat `Vec` scan is
/// enough.
#[derive(Debug, Default)]
pub struct TimerQueue {
    next_id: u64,
    pending: Vec<Pending>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn earliest(&self) -> Option<usize> {
        self.pending
            .iter()
            .enumerate()
            .min_by_key(|(_, p)| (p.deadline_ms, p.handle))
            .map(|(i, _)| i)
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<u64> {
        self.earliest().map(|i| self.pending[i].deadline_ms)
    }

    /// Remove and return the earliest timer whose deadline is `<= now_ms`.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<Expired> {
        let i = self.earliest()?;
        if self.pending[i].deadline_ms > now_ms {
            return None;
        }
        let p = self.pending.swap_remove(i);
        Some(Expired {
            handle: p.handle,
            kind: p.kind,
            deadline_ms: p.deadline_ms,
        })
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|p| p.handle == handle)
    }

    /// Deadline of a pending timer.
    pub fn deadline_of(&self, handle: TimerHandle) -> Option<u64> {
        self.pending
            .iter()
            .find(|p| p.handle == handle)
            .map(|p| p.deadline_ms)
    }

    /// Number of pending timers of `kind`.
    pub fn count_kind(&self, kind: TimerKind) -> usize {
        self.pending.iter().filter(|p| p.kind == kind).count()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop every pending timer.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

impl Scheduler for TimerQueue {
    fn schedule(&mut self, now_ms: u64, delay_ms: u64, kind: TimerKind) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        let deadline_ms = now_ms.saturating_add(delay_ms);
        tracing::trace!(?kind, deadline_ms, "timer scheduled");
        self.pending.push(Pending {
            handle,
            deadline_ms,
            kind,
        });
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.pending.iter().position(|p| p.handle == handle) {
            Some(i) => {
                let p = self.pending.swap_remove(i);
                tracing::trace!(kind = ?p.kind, "timer cancelled");
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_deadline_then_schedule_order() {
        let mut q = TimerQueue::new();
        let a = q.schedule(0, 50, TimerKind::CooldownEnd);
        let b = q.schedule(0, 10, TimerKind::FeedPulseEnd);
        let c = q.schedule(0, 50, TimerKind::FeedRunEnd);
        assert_eq!(q.next_deadline(), Some(10));

        assert!(q.pop_due(9).is_none());
        assert_eq!(q.pop_due(100).map(|e| e.handle), Some(b));
        assert_eq!(q.pop_due(100).map(|e| e.handle), Some(a));
        assert_eq!(q.pop_due(100).map(|e| e.handle), Some(c));
        assert!(q.is_empty());
    }

    #[test]
    fn cancel_removes_once() {
        let mut q = TimerQueue::new();
        let h = q.schedule(5, 10, TimerKind::IdleAbort);
        assert_eq!(q.deadline_of(h), Some(15));
        assert!(q.cancel(h));
        assert!(!q.cancel(h));
        assert!(!q.is_pending(h));
        assert_eq!(q.next_deadline(), None);
    }

    #[test]
    fn deadline_saturates() {
        let mut q = TimerQueue::new();
        q.schedule(u64::MAX - 1, 10, TimerKind::RpmDecay);
        assert_eq!(q.next_deadline(), Some(u64::MAX));
    }
}
