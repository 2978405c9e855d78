use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Instant;

/// Monotonic millisecond clock shared by the control loop and the sampler.
///
/// - millis(): free-running counter that wraps at `u32::MAX`
/// - wait_until(): spins until a minimum number of milliseconds has elapsed since `start`
///
/// All interval math goes through [`elapsed_ms`], so callers never have to care about the
/// counter wrapping between two observations.
pub trait Clock {
    fn millis(&self) -> u32;

    /// Block until at least `min_elapsed` ms have passed since `start` and return the clock
    /// value that satisfied the condition.
    ///
    /// The default busy-polls the counter. Nothing else runs while waiting; this is the only
    /// way the loop yields time.
    fn wait_until(&self, start: u32, min_elapsed: u32) -> u32 {
        loop {
            let now = self.millis();
            if elapsed_ms(now, start) >= min_elapsed {
                return now;
            }
            std::hint::spin_loop();
        }
    }
}

/// Forward distance from `since` to `now` in ms, correct across one counter wraparound.
#[inline]
pub fn elapsed_ms(now: u32, since: u32) -> u32 {
    now.wrapping_sub(since)
}

/// Real-time clock backed by `std::time::Instant`, truncated to a wrapping `u32` counter.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    #[inline]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for MonotonicClock {
    #[inline]
    fn millis(&self) -> u32 {
        // Truncation is the wraparound.
        self.origin.elapsed().as_millis() as u32
    }
}

/// Deterministic clock whose time only moves when told to.
///
/// Clones share the same counter, so peripherals and tests can observe the time the control
/// loop sees. `wait_until` jumps straight to the deadline instead of spinning.
#[derive(Debug, Clone, Default)]
pub struct SimClock {
    now: Arc<AtomicU32>,
}

impl SimClock {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    /// Start the counter at an arbitrary value (e.g. just below `u32::MAX`).
    pub fn starting_at(ms: u32) -> Self {
        Self {
            now: Arc::new(AtomicU32::new(ms)),
        }
    }

    /// Advance the clock by `ms`, wrapping like the hardware counter.
    pub fn advance(&self, ms: u32) {
        let cur = self.now.load(Ordering::Relaxed);
        self.now.store(cur.wrapping_add(ms), Ordering::Relaxed);
    }

    pub fn set(&self, ms: u32) {
        self.now.store(ms, Ordering::Relaxed);
    }
}

impl Clock for SimClock {
    fn millis(&self) -> u32 {
        self.now.load(Ordering::Relaxed)
    }

    fn wait_until(&self, start: u32, min_elapsed: u32) -> u32 {
        let now = self.millis();
        if elapsed_ms(now, start) >= min_elapsed {
            return now;
        }
        let deadline = start.wrapping_add(min_elapsed);
        self.set(deadline);
        deadline
    }
}
