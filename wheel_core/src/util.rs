//! Common time helpers for wheel_core.

use std::time::Duration;

/// Number of milliseconds in one second.
pub const MILLIS_PER_SEC: u64 = 1_000;
/// Number of milliseconds in one minute.
pub const MILLIS_PER_MINUTE: u64 = 60 * MILLIS_PER_SEC;

/// Whole milliseconds in `d`, saturating at `u64::MAX`.
#[inline]
pub fn duration_ms(d: Duration) -> u64 {
    d.as_millis().min(u128::from(u64::MAX)) as u64
}

/// Time from `now_ms` until `deadline_ms`, zero when already due.
#[inline]
pub fn until(now_ms: u64, deadline_ms: u64) -> Duration {
    Duration::from_millis(deadline_ms.saturating_sub(now_ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn until_saturates_at_zero() {
        assert_eq!(until(100, 40), Duration::ZERO);
        assert_eq!(until(40, 100), Duration::from_millis(60));
    }

    #[test]
    fn duration_ms_truncates() {
        assert_eq!(duration_ms(Duration::from_micros(1_999)), 1);
    }
}
