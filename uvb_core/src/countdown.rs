//! Auto power-off countdown.

use uvb_traits::elapsed_ms;

/// Countdown driven by a wrapping millisecond clock. Clamps at zero.
///
/// Invariant: `0 <= count <= time_limit`.
#[derive(Debug, Clone, Default)]
pub struct CountdownTimer {
    time_limit: u32,
    count: u32,
    last_tick: u32,
}

impl CountdownTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the timer with `limit` ms, counting from clock value `now`.
    pub fn begin(&mut self, limit: u32, now: u32) {
        self.time_limit = limit;
        self.count = limit;
        self.last_tick = now;
    }

    /// Consume the time elapsed since the previous update.
    pub fn update(&mut self, now: u32) {
        let elapsed = elapsed_ms(now, self.last_tick);
        if elapsed > self.count {
            self.count = 0;
        } else {
            self.count -= elapsed;
        }
        self.last_tick = now;
    }

    pub fn reset(&mut self) {
        self.count = self.time_limit;
    }

    #[inline]
    pub fn is_expired(&self) -> bool {
        self.count == 0
    }

    /// Remaining ms.
    #[inline]
    pub fn count(&self) -> u32 {
        self.count
    }

    #[inline]
    pub fn time_limit(&self) -> u32 {
        self.time_limit
    }
}
