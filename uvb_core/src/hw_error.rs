//! Maps `Box<dyn Error>` from trait boundaries to typed `MeterError`.
//!
//! The traits in `uvb_traits` use `Box<dyn Error + Send + Sync>`; this module converts those
//! to our typed error enum, with an optional feature-gated path for `uvb_hardware::HwError`
//! downcasting.

use crate::error::MeterError;

/// Map a trait-boundary error to a typed `MeterError`.
///
/// Attempts to downcast known hardware error types first, then falls back
/// to string-based heuristics.
pub fn map_hw_error(e: &(dyn std::error::Error + 'static)) -> MeterError {
    #[cfg(feature = "hardware-errors")]
    {
        if let Some(hw) = e.downcast_ref::<uvb_hardware::HwError>() {
            return match hw {
                uvb_hardware::HwError::Disconnected => MeterError::HardwareFault(hw.to_string()),
                uvb_hardware::HwError::Store(msg) => MeterError::Store(msg.clone()),
                uvb_hardware::HwError::Io(io) => MeterError::Io(io.to_string()),
                other => MeterError::Hardware(other.to_string()),
            };
        }
    }

    let s = e.to_string();
    if s.to_lowercase().contains("not connected") {
        MeterError::HardwareFault(s)
    } else {
        MeterError::Hardware(s)
    }
}
