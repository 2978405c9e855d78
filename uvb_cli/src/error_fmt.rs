//! Human-readable error descriptions and structured JSON error formatting.

use uvb_core::error::{BuildError, MeterError};

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid meter configuration ({msg}).\nLikely causes: A constant was overridden with an out-of-range value.\nHow to fix: Restore the default timing, sampling and motion settings."
            ),
            other => format!(
                "What happened: The meter could not be assembled ({other}).\nLikely causes: A peripheral was not wired into the builder.\nHow to fix: This is a bug in the host program; report it with --log-level=debug output."
            ),
        };
    }

    if let Some(me) = err.downcast_ref::<MeterError>() {
        return match me {
            MeterError::HardwareFault(_) => "What happened: The UV sensor ADC is not responding.\nLikely causes: Sensor HAT unplugged ([simulation].connected = false or an \"unplug\" event).\nHow to fix: Attach the sensor and retry; calibration needs a connected sensor.".to_string(),
            MeterError::Store(msg) => format!(
                "What happened: The calibration store could not be used ({msg}).\nLikely causes: Unreadable or malformed store file, or a read-only directory.\nHow to fix: Check [store].path; delete the file to start uncalibrated."
            ),
            MeterError::Io(msg) => format!(
                "What happened: I/O error ({msg}).\nLikely causes: Missing permissions or a full disk.\nHow to fix: Check the paths in the config file."
            ),
            MeterError::PoweredOff(reason) => format!(
                "What happened: The meter was used after it powered off ({reason}).\nLikely causes: A tick was requested after power-off.\nHow to fix: Start a new run."
            ),
            MeterError::Hardware(msg) => format!(
                "What happened: Hardware error ({msg}).\nLikely causes: See logs.\nHow to fix: Re-run with --log-level=debug or set RUST_LOG for more detail."
            ),
        };
    }

    // String-based heuristics for errors coming from init or config
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("read config") {
        return format!(
            "What happened: The config file could not be read.\nLikely causes: Wrong --config path.\nHow to fix: Pass an existing TOML file or omit --config to use defaults. Original: {msg}"
        );
    }
    if lower.contains("invalid configuration") || lower.contains("parse config") {
        let detail = err.root_cause();
        return format!(
            "What happened: Configuration is invalid ({detail}).\nLikely causes: A typo or out-of-range value in the TOML.\nHow to fix: Edit the config file and try again."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes: 3 sensor fault, 4 store/io, 5 used after power-off, 1 otherwise.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    match err.downcast_ref::<MeterError>() {
        Some(MeterError::HardwareFault(_)) => 3,
        Some(MeterError::Store(_) | MeterError::Io(_)) => 4,
        Some(MeterError::PoweredOff(_)) => 5,
        _ => 1,
    }
}

fn reason_name(err: &eyre::Report) -> &'static str {
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::InvalidConfig(_) => "InvalidConfig",
            _ => "Build",
        };
    }
    match err.downcast_ref::<MeterError>() {
        Some(MeterError::HardwareFault(_)) => "SensorFault",
        Some(MeterError::Store(_)) => "Store",
        Some(MeterError::Io(_)) => "Io",
        Some(MeterError::PoweredOff(_)) => "PoweredOff",
        Some(MeterError::Hardware(_)) => "Hardware",
        None => "Error",
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    serde_json::json!({
        "reason": reason_name(err),
        "exit_code": exit_code_for_error(err),
        "message": humanize(err),
    })
    .to_string()
}
