//! Averaged ADC acquisition.
//!
//! One pass requests a conversion every millisecond and averages the results. The ADC returns
//! the conversion started by the *previous* request, so the first read of a pass would belong
//! to a request issued before the pass began; it is never taken. A pass therefore makes
//! `samples + 1` requests and `samples` reads.
//!
//! A pass blocks for roughly `samples * period_ms` and cannot be interrupted.

use tracing::trace;
use uvb_traits::{Adc, Clock};

use crate::config::SamplingCfg;

#[derive(Debug, Clone)]
pub struct AveragingSampler {
    samples: u32,
    period_ms: u32,
    raw_voltage: f32,
    passes: u64,
}

impl Default for AveragingSampler {
    fn default() -> Self {
        Self::new(&SamplingCfg::default())
    }
}

impl AveragingSampler {
    pub fn new(cfg: &SamplingCfg) -> Self {
        Self {
            samples: cfg.samples.max(1),
            period_ms: cfg.period_ms.max(1),
            raw_voltage: 0.0,
            passes: 0,
        }
    }

    /// Run one full acquisition pass and return the averaged voltage (before offset).
    pub fn update_voltage(&mut self, adc: &mut dyn Adc, clock: &dyn Clock) -> f32 {
        let n = self.samples;
        let mut t1 = clock.millis();
        let mut sum: i64 = 0;

        for i in 0..=n {
            t1 = clock.wait_until(t1, self.period_ms);
            if i > 0 {
                sum += i64::from(adc.read_last_result());
            }
            adc.request_conversion();
        }

        self.raw_voltage = sum as f32 / n as f32 * adc.volts_per_count();
        self.passes += 1;
        trace!(sum, samples = n, raw_voltage = self.raw_voltage, "averaging pass");
        self.raw_voltage
    }

    /// Result of the last pass, before the calibration offset.
    #[inline]
    pub fn raw_voltage(&self) -> f32 {
        self.raw_voltage
    }

    /// Number of completed passes.
    #[inline]
    pub fn passes(&self) -> u64 {
        self.passes
    }

    #[inline]
    pub fn samples(&self) -> u32 {
        self.samples
    }
}
