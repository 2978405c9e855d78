//! Motion detection from accelerometer jitter.
//!
//! The filter runs on per-tick differences, so a constant gravity vector contributes nothing
//! and a device lying still settles near zero whatever its orientation.

use crate::config::MotionCfg;

#[derive(Debug, Clone)]
pub struct MotionClassifier {
    alpha: f32,
    threshold: f32,
    seeded: bool,
    last_accel: [f32; 3],
    filtered_delta: [f32; 3],
    energy: f32,
}

impl Default for MotionClassifier {
    fn default() -> Self {
        Self::new(&MotionCfg::default())
    }
}

impl MotionClassifier {
    pub fn new(cfg: &MotionCfg) -> Self {
        Self {
            alpha: cfg.alpha,
            threshold: cfg.threshold,
            seeded: false,
            last_accel: [0.0; 3],
            filtered_delta: [0.0; 3],
            energy: 0.0,
        }
    }

    /// Feed one sample in g.
    ///
    /// The first sample after construction or [`reseed`](Self::reseed) only primes the
    /// previous value; there is nothing to difference against yet.
    pub fn update(&mut self, accel: [f32; 3]) {
        if self.seeded {
            for ((df, cur), prev) in self
                .filtered_delta
                .iter_mut()
                .zip(accel)
                .zip(self.last_accel)
            {
                *df = self.alpha * (cur - prev) + (1.0 - self.alpha) * *df;
            }
        } else {
            self.filtered_delta = [0.0; 3];
            self.seeded = true;
        }
        self.last_accel = accel;
        self.energy = self.filtered_delta.iter().map(|d| d * d).sum();
        tracing::trace!(energy = self.energy, "motion update");
    }

    /// Forget the previous sample; the next update seeds again.
    pub fn reseed(&mut self) {
        self.seeded = false;
    }

    #[inline]
    pub fn is_stationary(&self) -> bool {
        self.energy < self.threshold
    }

    /// Squared norm of the filtered acceleration delta.
    #[inline]
    pub fn energy(&self) -> f32 {
        self.energy
    }

    #[inline]
    pub fn is_seeded(&self) -> bool {
        self.seeded
    }
}
