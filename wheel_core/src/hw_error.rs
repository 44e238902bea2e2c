//! Maps `Box<dyn Error>` from trait boundaries to typed `WheelError`.
//!
//! The traits in `wheel_traits` use `Box<dyn Error + Send + Sync>` so any
//! backend can plug in; this module converts those to our typed error enum,
//! with an optional feature-gated path for `wheel_hardware::HwError`.

use crate::error::WheelError;

/// Map a trait-boundary error to a typed `WheelError`.
///
/// Attempts to downcast known hardware error types first, then falls back
/// to string-based heuristics.
pub fn map_hw_error(e: &(dyn std::error::Error + 'static)) -> WheelError {
    #[cfg(feature = "hardware-errors")]
    {
        if let Some(hw) = e.downcast_ref::<wheel_hardware::error::HwError>() {
            return match hw {
                wheel_hardware::error::HwError::Timeout => WheelError::Timeout,
                wheel_hardware::error::HwError::Playback(msg) => WheelError::Playback(msg.clone()),
                other => WheelError::HardwareFault(other.to_string()),
            };
        }
    }

    let s = e.to_string();
    if s.to_lowercase().contains("timeout") {
        WheelError::Timeout
    } else {
        WheelError::Hardware(s)
    }
}
