pub mod clock;

pub use clock::{Clock, MonotonicClock, SimClock, elapsed_ms};

/// Error type crossing the capability boundary.
pub type HwResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Differential ADC with a one-deep conversion pipeline: `read_last_result` returns the
/// conversion started by the previous `request_conversion`.
pub trait Adc {
    fn is_connected(&mut self) -> bool;
    fn request_conversion(&mut self);
    fn read_last_result(&mut self) -> i16;
    /// Volts represented by one count at the configured gain.
    fn volts_per_count(&self) -> f32;
}

/// 3-axis accelerometer, units of g.
pub trait Accelerometer {
    fn read_accel(&mut self) -> [f32; 3];
}

/// Power-button classification reported by the power-management IC.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PowerPress {
    #[default]
    None,
    /// Held for more than one second.
    Long,
    /// Released within one second.
    Short,
}

/// Button levels sampled once per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonState {
    pub a: bool,
    pub b: bool,
    pub power: PowerPress,
}

impl ButtonState {
    #[inline]
    pub fn any_pressed(&self) -> bool {
        self.a || self.b
    }
}

pub trait Buttons {
    fn poll(&mut self) -> ButtonState;
}

/// Persistent float store scoped to one namespace.
pub trait Store {
    fn get_f32(&self, key: &str, default: f32) -> f32;
    fn put_f32(&mut self, key: &str, value: f32) -> HwResult<()>;
}

pub trait PowerControl {
    /// Cut device power. The caller must not expect another tick afterwards.
    fn power_off(&mut self) -> HwResult<()>;
}
