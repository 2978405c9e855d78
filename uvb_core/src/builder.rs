//! Builder for `UvbMeter`.
//!
//! Every peripheral is injected; only the clock has a default (`MonotonicClock`).
//! `try_build()` reports the first missing collaborator as a `BuildError`.

use std::sync::Arc;

use uvb_traits::{Accelerometer, Adc, Buttons, Clock, MonotonicClock, PowerControl, Store};

use crate::calibration::load_offset;
use crate::config::MeterCfg;
use crate::countdown::CountdownTimer;
use crate::error::{BuildError, Result};
use crate::meter::UvbMeter;
use crate::motion::MotionClassifier;
use crate::readout::{Display, FaultState, HoldState};
use crate::sampler::AveragingSampler;

#[derive(Default)]
pub struct MeterBuilder {
    clock: Option<Arc<dyn Clock + Send + Sync>>,
    adc: Option<Box<dyn Adc>>,
    imu: Option<Box<dyn Accelerometer>>,
    buttons: Option<Box<dyn Buttons>>,
    display: Option<Box<dyn Display>>,
    power: Option<Box<dyn PowerControl>>,
    cfg: Option<MeterCfg>,
    offset_voltage: Option<f32>,
}

impl UvbMeter {
    /// Start building a meter.
    pub fn builder() -> MeterBuilder {
        MeterBuilder::default()
    }
}

impl MeterBuilder {
    pub fn with_clock(mut self, clock: impl Clock + Send + Sync + 'static) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    pub fn with_adc(mut self, adc: impl Adc + 'static) -> Self {
        self.adc = Some(Box::new(adc));
        self
    }

    pub fn with_accelerometer(mut self, imu: impl Accelerometer + 'static) -> Self {
        self.imu = Some(Box::new(imu));
        self
    }

    pub fn with_buttons(mut self, buttons: impl Buttons + 'static) -> Self {
        self.buttons = Some(Box::new(buttons));
        self
    }

    pub fn with_display(mut self, display: impl Display + 'static) -> Self {
        self.display = Some(Box::new(display));
        self
    }

    pub fn with_power_control(mut self, power: impl PowerControl + 'static) -> Self {
        self.power = Some(Box::new(power));
        self
    }

    pub fn with_config(mut self, cfg: MeterCfg) -> Self {
        self.cfg = Some(cfg);
        self
    }

    /// Use an explicit calibration offset (volts).
    pub fn with_offset_voltage(mut self, offset: f32) -> Self {
        self.offset_voltage = Some(offset);
        self
    }

    /// Load the calibration offset from the persistent store (0.0 when absent).
    pub fn with_store(self, store: &dyn Store) -> Self {
        let offset = load_offset(store);
        self.with_offset_voltage(offset)
    }

    pub fn try_build(self) -> Result<UvbMeter> {
        let adc = self
            .adc
            .ok_or_else(|| eyre::Report::new(BuildError::MissingAdc))?;
        let imu = self
            .imu
            .ok_or_else(|| eyre::Report::new(BuildError::MissingAccelerometer))?;
        let buttons = self
            .buttons
            .ok_or_else(|| eyre::Report::new(BuildError::MissingButtons))?;
        let display = self
            .display
            .ok_or_else(|| eyre::Report::new(BuildError::MissingDisplay))?;
        let power = self
            .power
            .ok_or_else(|| eyre::Report::new(BuildError::MissingPowerControl))?;
        let cfg = self.cfg.unwrap_or_default();
        validate(&cfg)?;

        let offset_voltage = self.offset_voltage.unwrap_or(0.0);
        if !offset_voltage.is_finite() {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "offset voltage must be finite",
            )));
        }

        let clock: Arc<dyn Clock + Send + Sync> = match self.clock {
            Some(c) => c,
            None => Arc::new(MonotonicClock::new()),
        };

        let mut timer = CountdownTimer::new();
        timer.begin(cfg.timing.auto_off_ms, clock.millis());

        tracing::info!(
            offset_voltage,
            auto_off_ms = cfg.timing.auto_off_ms,
            tick_ms = cfg.timing.tick_ms,
            "meter ready"
        );

        Ok(UvbMeter {
            clock,
            adc,
            imu,
            buttons,
            display,
            power,
            sampler: AveragingSampler::new(&cfg.sampling),
            motion: MotionClassifier::new(&cfg.motion),
            timer,
            offset_voltage,
            hold: HoldState::Active,
            fault: FaultState::Ok,
            prev_button: false,
            boot_buttons: None,
            halted: None,
            ticks: 0,
            last_readout: None,
            cfg,
        })
    }
}

fn validate(cfg: &MeterCfg) -> Result<()> {
    let invalid = |msg| Err(eyre::Report::new(BuildError::InvalidConfig(msg)));
    if cfg.timing.tick_ms == 0 {
        return invalid("tick_ms must be > 0");
    }
    if cfg.sampling.samples == 0 {
        return invalid("samples must be > 0");
    }
    if cfg.sampling.period_ms == 0 {
        return invalid("sample period_ms must be > 0");
    }
    if !(cfg.motion.alpha > 0.0 && cfg.motion.alpha < 1.0) {
        return invalid("motion alpha must be in (0, 1)");
    }
    if !(cfg.motion.threshold > 0.0) {
        return invalid("motion threshold must be > 0");
    }
    Ok(())
}
