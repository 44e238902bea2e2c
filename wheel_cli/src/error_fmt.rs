//! Human-readable error descriptions and structured JSON error formatting.

use wheel_core::error::{BuildError, WheelError};
use wheel_hardware::error::HwError;

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingFeeder => {
                "What happened: No feeder was provided to the controller.\nLikely causes: The feeder backend failed to initialize or was not wired into the builder.\nHow to fix: Ensure the feeder is created successfully and passed via with_feeder(...).".to_string()
            }
            BuildError::MissingCuePlayer => {
                "What happened: No cue player was provided to the controller.\nLikely causes: The [cues] backend was not wired into the builder.\nHow to fix: Pass a cue player via with_cues(...); unset [cues].player to only log cues.".to_string()
            }
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun. See etc/wheel_config.toml for a sample."
            ),
        };
    }

    if let Some(we) = err.downcast_ref::<WheelError>() {
        return match we {
            WheelError::Config(msg) => format!(
                "What happened: Configuration rejected ({msg}).\nLikely causes: A missing file, a TOML syntax error, or an out-of-range value.\nHow to fix: Fix the named key in the config file, then rerun."
            ),
            WheelError::Timeout => "What happened: The rotation sensor timed out.\nLikely causes: Sensor unplugged or wrong pin.\nHow to fix: Check [pins].sensor and the sensor wiring.".to_string(),
            other => format!(
                "What happened: {other}.\nLikely causes: See logs.\nHow to fix: Re-run with --log-level=debug or set RUST_LOG for more detail."
            ),
        };
    }

    if let Some(hw) = err.downcast_ref::<HwError>() {
        return match hw {
            HwError::Gpio(msg) => format!(
                "What happened: Failed to initialize GPIO ({msg}).\nLikely causes: Incorrect pin numbers or insufficient GPIO permissions.\nHow to fix: Fix the [pins] values in the config; ensure the process can access /dev/gpiomem."
            ),
            other => format!(
                "What happened: {other}.\nLikely causes: Hardware fault.\nHow to fix: Check wiring and re-run with --log-level=debug."
            ),
        };
    }

    // String-based heuristics for errors wrapped without a typed cause
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("open sensor pin") || lower.contains("open feeder pin") {
        return "What happened: Failed to initialize hardware pins.\nLikely causes: Incorrect pin numbers or insufficient GPIO permissions.\nHow to fix: Fix the [pins] values in the config; ensure the process has permission to access GPIO.".to_string();
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Error: {msg}"
    )
}

/// Configuration and builder errors exit with 2, everything else with 1.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if err.downcast_ref::<BuildError>().is_some()
        || matches!(err.downcast_ref::<WheelError>(), Some(WheelError::Config(_)))
    {
        return 2;
    }
    1
}

fn reason_name(err: &eyre::Report) -> &'static str {
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingFeeder | BuildError::MissingCuePlayer => "MissingBackend",
            BuildError::InvalidConfig(_) => "InvalidConfig",
        };
    }
    match err.downcast_ref::<WheelError>() {
        Some(WheelError::Config(_)) => "InvalidConfig",
        Some(WheelError::Timeout) => "Timeout",
        Some(WheelError::Hardware(_) | WheelError::HardwareFault(_)) => "Hardware",
        _ if err.downcast_ref::<HwError>().is_some() => "Hardware",
        _ => "Error",
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    serde_json::json!({ "reason": reason_name(err), "message": humanize(err) }).to_string()
}
