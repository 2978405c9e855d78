//! Simulated meter peripherals.
//!
//! A [`SimWorld`] owns the physical situation (UV level, sensor HAT plugged or not, buttons
//! pressed, device shaken) and replays a list of timed events against a [`SimClock`]. Every
//! peripheral handed out by the world applies due events before answering, so the control
//! loop sees them in the tick where their time has come.

pub mod error;
pub mod store;

use std::cell::{RefCell, RefMut};
use std::rc::Rc;

use tracing::{debug, info};
use uvb_traits::{
    Accelerometer, Adc, ButtonState, Buttons, Clock, HwResult, PowerControl, PowerPress,
    SimClock, elapsed_ms,
};

pub use error::HwError;
pub use store::FileStore;

/// ADS1014 at gain 2 (±2.048 V full scale, 12 bit): one count is 1 mV.
pub const ADS1014_VOLTS_PER_COUNT: f32 = 0.001;
const ADS1014_MIN_COUNT: i32 = -2048;
const ADS1014_MAX_COUNT: i32 = 2047;

/// How long a single `Shake` event keeps the accelerometer moving.
pub const SHAKE_MS: u32 = 500;
const SHAKE_AMPLITUDE_G: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimEvent {
    ButtonA,
    ButtonB,
    PowerShort,
    PowerLong,
    Shake,
    Unplug,
    Plug,
    /// Set the UV sensor output voltage.
    UvVoltage(f32),
}

/// Event due `at_ms` after the world was created.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedEvent {
    pub at_ms: u32,
    pub event: SimEvent,
}

#[derive(Debug, Clone)]
pub struct SimParams {
    /// Sensor output in volts.
    pub uv_voltage: f32,
    /// Uniform ADC noise amplitude in counts.
    pub noise_counts: u16,
    /// Uniform accelerometer noise amplitude in g.
    pub accel_noise_g: f32,
    pub seed: u64,
    pub connected: bool,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            uv_voltage: 0.0,
            noise_counts: 0,
            accel_noise_g: 0.0,
            seed: 0,
            connected: true,
        }
    }
}

#[derive(Debug)]
struct WorldState {
    origin: u32,
    elapsed: u32,
    events: Vec<TimedEvent>,
    next: usize,
    uv_voltage: f32,
    noise_counts: u16,
    accel_noise_g: f32,
    connected: bool,
    shake_until: Option<u32>,
    shake_phase: bool,
    a_pending: bool,
    b_pending: bool,
    power_pending: PowerPress,
    powered: bool,
    rng: fastrand::Rng,
}

impl WorldState {
    fn apply_due(&mut self, now: u32) {
        self.elapsed = elapsed_ms(now, self.origin);
        while let Some(ev) = self.events.get(self.next).copied() {
            if ev.at_ms > self.elapsed {
                break;
            }
            self.next += 1;
            debug!(at_ms = ev.at_ms, event = ?ev.event, "sim event");
            match ev.event {
                SimEvent::ButtonA => self.a_pending = true,
                SimEvent::ButtonB => self.b_pending = true,
                SimEvent::PowerShort => self.power_pending = PowerPress::Short,
                SimEvent::PowerLong => self.power_pending = PowerPress::Long,
                SimEvent::Shake => self.shake_until = Some(self.elapsed.saturating_add(SHAKE_MS)),
                SimEvent::Unplug => self.connected = false,
                SimEvent::Plug => self.connected = true,
                SimEvent::UvVoltage(v) => self.uv_voltage = v,
            }
        }
    }

    fn convert(&mut self) -> i16 {
        let ideal = (self.uv_voltage / ADS1014_VOLTS_PER_COUNT).round() as i32;
        let n = i32::from(self.noise_counts);
        let noise = if n > 0 { self.rng.i32(-n..=n) } else { 0 };
        (ideal + noise).clamp(ADS1014_MIN_COUNT, ADS1014_MAX_COUNT) as i16
    }

    fn shaking(&self) -> bool {
        self.shake_until.is_some_and(|until| self.elapsed < until)
    }
}

/// Shared simulated environment. Clones refer to the same world.
#[derive(Debug, Clone)]
pub struct SimWorld {
    clock: SimClock,
    state: Rc<RefCell<WorldState>>,
}

impl SimWorld {
    pub fn new(clock: SimClock, params: SimParams, mut events: Vec<TimedEvent>) -> Self {
        events.sort_by_key(|e| e.at_ms);
        let origin = clock.millis();
        let state = WorldState {
            origin,
            elapsed: 0,
            events,
            next: 0,
            uv_voltage: params.uv_voltage,
            noise_counts: params.noise_counts,
            accel_noise_g: params.accel_noise_g.abs(),
            connected: params.connected,
            shake_until: None,
            shake_phase: false,
            a_pending: false,
            b_pending: false,
            power_pending: PowerPress::None,
            powered: true,
            rng: fastrand::Rng::with_seed(params.seed),
        };
        Self {
            clock,
            state: Rc::new(RefCell::new(state)),
        }
    }

    fn sync(&self) -> RefMut<'_, WorldState> {
        let now = self.clock.millis();
        let mut st = self.state.borrow_mut();
        st.apply_due(now);
        st
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn adc(&self) -> SimulatedAdc {
        SimulatedAdc {
            world: self.clone(),
            pending: 0,
        }
    }

    pub fn imu(&self) -> SimulatedImu {
        SimulatedImu { world: self.clone() }
    }

    pub fn buttons(&self) -> SimulatedButtons {
        SimulatedButtons { world: self.clone() }
    }

    pub fn power(&self) -> SimulatedPower {
        SimulatedPower { world: self.clone() }
    }

    pub fn is_powered(&self) -> bool {
        self.state.borrow().powered
    }

    /// Events not yet replayed.
    pub fn pending_events(&self) -> usize {
        let st = self.sync();
        st.events.len() - st.next
    }
}

/// ADS1014-like differential ADC. Each request latches a conversion that the next read returns.
#[derive(Debug)]
pub struct SimulatedAdc {
    world: SimWorld,
    pending: i16,
}

impl Adc for SimulatedAdc {
    fn is_connected(&mut self) -> bool {
        self.world.sync().connected
    }

    fn request_conversion(&mut self) {
        let mut st = self.world.sync();
        self.pending = if st.connected { st.convert() } else { 0 };
    }

    fn read_last_result(&mut self) -> i16 {
        self.pending
    }

    fn volts_per_count(&self) -> f32 {
        ADS1014_VOLTS_PER_COUNT
    }
}

/// Device lying still under gravity, with optional jitter and shake bursts.
#[derive(Debug)]
pub struct SimulatedImu {
    world: SimWorld,
}

impl Accelerometer for SimulatedImu {
    fn read_accel(&mut self) -> [f32; 3] {
        let mut st = self.world.sync();
        let mut accel = [0.0, 0.0, 1.0];
        if st.accel_noise_g > 0.0 {
            for axis in &mut accel {
                *axis += (st.rng.f32() * 2.0 - 1.0) * st.accel_noise_g;
            }
        }
        if st.shaking() {
            st.shake_phase = !st.shake_phase;
            accel[0] += if st.shake_phase {
                SHAKE_AMPLITUDE_G
            } else {
                -SHAKE_AMPLITUDE_G
            };
        }
        accel
    }
}

/// Momentary buttons: each press event reads as pressed for exactly one poll.
#[derive(Debug)]
pub struct SimulatedButtons {
    world: SimWorld,
}

impl Buttons for SimulatedButtons {
    fn poll(&mut self) -> ButtonState {
        let mut st = self.world.sync();
        ButtonState {
            a: std::mem::take(&mut st.a_pending),
            b: std::mem::take(&mut st.b_pending),
            power: std::mem::take(&mut st.power_pending),
        }
    }
}

#[derive(Debug)]
pub struct SimulatedPower {
    world: SimWorld,
}

impl PowerControl for SimulatedPower {
    fn power_off(&mut self) -> HwResult<()> {
        let mut st = self.world.sync();
        if !st.powered {
            return Err(Box::new(HwError::PowerRail("already off".into())));
        }
        st.powered = false;
        info!(at_ms = st.elapsed, "power rail cut (simulated)");
        Ok(())
    }
}
