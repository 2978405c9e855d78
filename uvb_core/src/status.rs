//! Outcome of one control-loop tick.

use std::fmt;

/// Why the meter cut its own power.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerOffReason {
    /// Power button held for more than a second.
    PowerButton,
    /// Auto-off countdown expired.
    Inactivity,
}

impl fmt::Display for PowerOffReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PowerButton => f.write_str("power button"),
            Self::Inactivity => f.write_str("inactivity"),
        }
    }
}

/// Public status of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStatus {
    /// Keep ticking.
    Running,
    /// Power-off was requested; there is no next tick.
    PoweredOff(PowerOffReason),
}
