//! Device constants.
//!
//! The firmware has no runtime configuration; these structs exist so the values live in one
//! place and tests can shrink the long timeouts.

/// Loop pacing and auto power-off.
#[derive(Debug, Clone)]
pub struct TimingCfg {
    /// Minimum tick period in ms.
    pub tick_ms: u32,
    /// Inactivity limit before power-off, in ms.
    pub auto_off_ms: u32,
    /// Settle time before the calibration measurement, in ms.
    pub calibration_settle_ms: u32,
}

impl Default for TimingCfg {
    fn default() -> Self {
        Self {
            tick_ms: 100,
            auto_off_ms: 5 * 60 * 1000,
            calibration_settle_ms: 1000,
        }
    }
}

/// Motion classifier constants (acceleration in g).
#[derive(Debug, Clone)]
pub struct MotionCfg {
    /// Smoothing factor, in (0, 1).
    pub alpha: f32,
    /// Energy below this is stationary.
    pub threshold: f32,
}

impl Default for MotionCfg {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            threshold: 0.0001,
        }
    }
}

/// Averaging sampler constants.
#[derive(Debug, Clone)]
pub struct SamplingCfg {
    /// Conversions averaged per pass.
    pub samples: u32,
    /// Minimum spacing between acquisitions, in ms.
    pub period_ms: u32,
}

impl Default for SamplingCfg {
    fn default() -> Self {
        Self {
            samples: 100,
            period_ms: 1,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MeterCfg {
    pub timing: TimingCfg,
    pub motion: MotionCfg,
    pub sampling: SamplingCfg,
}
