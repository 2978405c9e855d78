//! Boot sequence and the tick loop.

use std::sync::atomic::{AtomicBool, Ordering};

use uvb_traits::Store;

use crate::error::Result;
use crate::meter::UvbMeter;
use crate::status::{PowerOffReason, TickStatus};

/// Why `run` returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    PoweredOff(PowerOffReason),
    /// Shutdown flag was raised between ticks.
    Interrupted,
    TickLimit,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub outcome: RunOutcome,
    pub ticks: u64,
    pub sampler_passes: u64,
    /// Calibrated voltage at exit.
    pub voltage: f32,
    pub offset_voltage: f32,
}

impl RunSummary {
    fn from_meter(outcome: RunOutcome, meter: &UvbMeter) -> Self {
        Self {
            outcome,
            ticks: meter.ticks(),
            sampler_passes: meter.sampler_passes(),
            voltage: meter.voltage(),
            offset_voltage: meter.offset_voltage(),
        }
    }
}

/// Boot-time calibration gesture: if button B is down (or `force` is set), measure and store
/// a new zero offset. Returns the offset when calibration ran.
pub fn boot(meter: &mut UvbMeter, store: &mut dyn Store, force: bool) -> Result<Option<f32>> {
    if force || meter.calibration_requested() {
        tracing::info!(forced = force, "calibration requested at boot");
        return meter.calibrate(store).map(Some);
    }
    Ok(None)
}

/// Tick until the device powers off, `shutdown` is raised, or `max_ticks` ticks have run.
pub fn run(
    meter: &mut UvbMeter,
    shutdown: &AtomicBool,
    max_ticks: Option<u64>,
) -> Result<RunSummary> {
    tracing::info!(?max_ticks, "meter loop start");
    let mut ran: u64 = 0;
    loop {
        if shutdown.load(Ordering::Relaxed) {
            tracing::info!(ticks = meter.ticks(), "shutdown requested");
            return Ok(RunSummary::from_meter(RunOutcome::Interrupted, meter));
        }
        if max_ticks.is_some_and(|max| ran >= max) {
            return Ok(RunSummary::from_meter(RunOutcome::TickLimit, meter));
        }
        match meter.tick()? {
            TickStatus::Running => ran += 1,
            TickStatus::PoweredOff(reason) => {
                return Ok(RunSummary::from_meter(RunOutcome::PoweredOff(reason), meter));
            }
        }
    }
}
