//! The per-tick device state machine (`UvbMeter`).
//!
//! Each tick runs the same fixed sequence:
//! 1. probe the sensor ADC and set the fault state
//! 2. take an averaged measurement unless held or faulted
//! 3. pace the loop to the tick period
//! 4. poll buttons; a long power press powers off
//! 5. advance the auto-off countdown; expiry powers off
//! 6. feed the motion classifier; motion resets the countdown
//! 7. a rising edge on button A or B toggles hold and resets the countdown
//! 8. a short power press resets the countdown
//! 9. render the readout

use std::sync::Arc;

use eyre::WrapErr;
use tracing::{debug, info, warn};
use uvb_traits::{
    Accelerometer, Adc, ButtonState, Buttons, Clock, PowerControl, PowerPress, Store,
};

use crate::calibration::{OFFSET_KEY, load_offset};
use crate::config::MeterCfg;
use crate::countdown::CountdownTimer;
use crate::error::{MeterError, Result};
use crate::hw_error::map_hw_error;
use crate::motion::MotionClassifier;
use crate::readout::{Display, FaultState, HoldState, Readout, uv_index, uv_power};
use crate::sampler::AveragingSampler;
use crate::status::{PowerOffReason, TickStatus};

pub struct UvbMeter {
    pub(crate) clock: Arc<dyn Clock + Send + Sync>,
    pub(crate) adc: Box<dyn Adc>,
    pub(crate) imu: Box<dyn Accelerometer>,
    pub(crate) buttons: Box<dyn Buttons>,
    pub(crate) display: Box<dyn Display>,
    pub(crate) power: Box<dyn PowerControl>,
    pub(crate) cfg: MeterCfg,

    pub(crate) sampler: AveragingSampler,
    pub(crate) motion: MotionClassifier,
    pub(crate) timer: CountdownTimer,
    pub(crate) offset_voltage: f32,

    pub(crate) hold: HoldState,
    pub(crate) fault: FaultState,
    pub(crate) prev_button: bool,
    /// Presses seen by the boot gesture poll, replayed into the first tick (B excluded).
    pub(crate) boot_buttons: Option<ButtonState>,
    pub(crate) halted: Option<PowerOffReason>,
    pub(crate) ticks: u64,
    pub(crate) last_readout: Option<Readout>,
}

impl core::fmt::Debug for UvbMeter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("UvbMeter")
            .field("voltage", &self.voltage())
            .field("hold", &self.hold)
            .field("fault", &self.fault)
            .field("countdown_ms", &self.timer.count())
            .field("halted", &self.halted)
            .finish()
    }
}

impl UvbMeter {
    /// Run one tick of the control loop.
    ///
    /// Returns `PoweredOff` exactly once; every later call fails with
    /// `MeterError::PoweredOff`.
    pub fn tick(&mut self) -> Result<TickStatus> {
        if let Some(reason) = self.halted {
            return Err(eyre::Report::new(MeterError::PoweredOff(reason)));
        }
        let t0 = self.clock.millis();

        let fault = if self.adc.is_connected() {
            FaultState::Ok
        } else {
            FaultState::Fault
        };
        self.set_fault(fault);

        if !self.fault.is_fault() && !self.hold.is_held() {
            self.sampler
                .update_voltage(self.adc.as_mut(), self.clock.as_ref());
        }

        self.clock.wait_until(t0, self.cfg.timing.tick_ms);

        let mut buttons = self.buttons.poll();
        if let Some(boot) = self.boot_buttons.take() {
            buttons.a |= boot.a;
            if buttons.power == PowerPress::None {
                buttons.power = boot.power;
            }
        }
        if buttons.power == PowerPress::Long {
            return Ok(self.power_off(PowerOffReason::PowerButton));
        }

        self.timer.update(self.clock.millis());
        if self.timer.is_expired() {
            return Ok(self.power_off(PowerOffReason::Inactivity));
        }

        let accel = self.imu.read_accel();
        self.motion.update(accel);
        if !self.motion.is_stationary() {
            self.timer.reset();
        }

        let pressed = buttons.any_pressed();
        if pressed && !self.prev_button {
            self.hold = self.hold.toggled();
            info!(hold = ?self.hold, "hold toggled");
            self.timer.reset();
        }
        self.prev_button = pressed;

        if buttons.power == PowerPress::Short {
            self.timer.reset();
        }

        let readout = self.readout();
        if let Err(e) = self.display.render(&readout) {
            warn!(error = %map_hw_error(&*e), "display render failed");
        }
        self.last_readout = Some(readout);
        self.ticks += 1;
        debug!(
            tick = self.ticks,
            voltage = self.voltage(),
            energy = self.motion.energy(),
            countdown_ms = self.timer.count(),
            hold = ?self.hold,
            fault = ?self.fault,
            "tick"
        );
        Ok(TickStatus::Running)
    }

    /// Measure the sensor's dark output and persist it as the new zero offset.
    ///
    /// Shows "Calibrating...", waits for the settle time, runs one averaging pass with no
    /// offset applied, stores the result, then reloads the offset from the store and restarts
    /// the auto-off countdown.
    ///
    /// Boot-time only: fails with `MeterError::PoweredOff` once the meter has halted.
    pub fn calibrate(&mut self, store: &mut dyn Store) -> Result<f32> {
        if let Some(reason) = self.halted {
            return Err(eyre::Report::new(MeterError::PoweredOff(reason)));
        }
        if !self.adc.is_connected() {
            return Err(
                eyre::Report::new(MeterError::HardwareFault("adc not connected".into()))
                    .wrap_err("calibration"),
            );
        }
        if let Err(e) = self.display.message("Calibrating...") {
            warn!(error = %map_hw_error(&*e), "display message failed");
        }
        let now = self.clock.millis();
        self.clock
            .wait_until(now, self.cfg.timing.calibration_settle_ms);

        let measured = self
            .sampler
            .update_voltage(self.adc.as_mut(), self.clock.as_ref());
        store
            .put_f32(OFFSET_KEY, measured)
            .map_err(|e| eyre::Report::new(map_hw_error(&*e)))
            .wrap_err("storing calibration offset")?;

        self.offset_voltage = load_offset(store);
        self.timer
            .begin(self.cfg.timing.auto_off_ms, self.clock.millis());
        info!(offset_voltage = self.offset_voltage, "calibration stored");
        Ok(self.offset_voltage)
    }

    /// Poll the buttons once; true when B is down (the boot-time calibration gesture).
    /// Any other press in that snapshot is handed to the next tick.
    pub fn calibration_requested(&mut self) -> bool {
        let state = self.buttons.poll();
        self.boot_buttons = Some(ButtonState { b: false, ..state });
        state.b
    }

    fn power_off(&mut self, reason: PowerOffReason) -> TickStatus {
        info!(%reason, tick = self.ticks, "powering off");
        if let Err(e) = self.power.power_off() {
            warn!(error = %map_hw_error(&*e), "power-off request failed");
        }
        self.halted = Some(reason);
        TickStatus::PoweredOff(reason)
    }

    fn set_fault(&mut self, fault: FaultState) {
        if fault != self.fault {
            match fault {
                FaultState::Fault => warn!("sensor adc not connected"),
                FaultState::Ok => info!("sensor adc connected"),
            }
        }
        self.fault = fault;
    }

    /// Snapshot of what the display shows for the current state.
    pub fn readout(&self) -> Readout {
        Readout::new(self.voltage(), self.hold, self.fault)
    }

    /// Calibrated sensor voltage.
    pub fn voltage(&self) -> f32 {
        self.sampler.raw_voltage() - self.offset_voltage
    }

    pub fn raw_voltage(&self) -> f32 {
        self.sampler.raw_voltage()
    }

    pub fn offset_voltage(&self) -> f32 {
        self.offset_voltage
    }

    /// UVB power in µW/cm², unclamped.
    pub fn uv_power(&self) -> f32 {
        uv_power(self.voltage())
    }

    /// UV index, unclamped.
    pub fn uv_index(&self) -> f32 {
        uv_index(self.voltage())
    }

    pub fn hold(&self) -> HoldState {
        self.hold
    }

    pub fn set_hold(&mut self, hold: HoldState) {
        self.hold = hold;
    }

    pub fn fault(&self) -> FaultState {
        self.fault
    }

    pub fn timer(&self) -> &CountdownTimer {
        &self.timer
    }

    pub fn motion(&self) -> &MotionClassifier {
        &self.motion
    }

    /// Completed averaging passes since boot.
    pub fn sampler_passes(&self) -> u64 {
        self.sampler.passes()
    }

    /// Ticks that ran to the render step.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn last_readout(&self) -> Option<Readout> {
        self.last_readout
    }

    pub fn halted(&self) -> Option<PowerOffReason> {
        self.halted
    }

    pub fn millis(&self) -> u32 {
        self.clock.millis()
    }
}
