//! Display contract: what one tick hands to the screen.
//!
//! Clamping and rounding here are part of the contract, not presentation detail:
//! - power (µW/cm²) = V / 0.93 × 1000, clamped to [0, 1999], rounded
//! - UV index = V / 0.008, clamped to [0, 13]; a rounded index of 13 reads "13+"

use std::fmt;

use uvb_traits::HwResult;

/// Sensor output in volts per mW/cm² of UVB.
pub const VOLTS_PER_MW_CM2: f32 = 0.93;
pub const POWER_MAX_UW_CM2: f32 = 1999.0;
/// Sensor output in volts per UV index step.
pub const VOLTS_PER_UV_INDEX: f32 = 0.008;
pub const UV_INDEX_MAX: f32 = 13.0;
/// Height of a full-scale UV bar in pixels.
pub const BAR_FULL_PX: f32 = 48.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HoldState {
    #[default]
    Active,
    Held,
}

impl HoldState {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Held,
            Self::Held => Self::Active,
        }
    }

    #[inline]
    pub fn is_held(self) -> bool {
        matches!(self, Self::Held)
    }
}

/// Whether the sensor ADC answered the last probe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FaultState {
    #[default]
    Ok,
    Fault,
}

impl FaultState {
    #[inline]
    pub fn is_fault(self) -> bool {
        matches!(self, Self::Fault)
    }
}

/// UVB power in µW/cm², unclamped.
#[inline]
pub fn uv_power(voltage: f32) -> f32 {
    voltage / VOLTS_PER_MW_CM2 * 1000.0
}

/// UV index, unclamped.
#[inline]
pub fn uv_index(voltage: f32) -> f32 {
    voltage / VOLTS_PER_UV_INDEX
}

/// Rounded UV index label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UviLabel {
    Index(u8),
    /// Rounded value reached the top of the scale.
    Extreme,
}

impl UviLabel {
    /// Label for an index already clamped to [0, 13].
    pub fn from_clamped(uvi: f32) -> Self {
        let n = uvi.round() as u8;
        if n < UV_INDEX_MAX as u8 {
            Self::Index(n)
        } else {
            Self::Extreme
        }
    }
}

impl fmt::Display for UviLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(n) => write!(f, "UVI={n}"),
            Self::Extreme => f.write_str("UVI=13+"),
        }
    }
}

/// Render-ready snapshot of one tick. Measurements are `None` while faulted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Readout {
    /// Rounded µW/cm².
    pub power: Option<u16>,
    /// UV index clamped to [0, 13], unrounded (drives the bar).
    pub uv_index: Option<f32>,
    pub hold: HoldState,
    pub fault: FaultState,
}

impl Readout {
    pub fn new(voltage: f32, hold: HoldState, fault: FaultState) -> Self {
        if fault.is_fault() {
            return Self {
                power: None,
                uv_index: None,
                hold,
                fault,
            };
        }
        let power = uv_power(voltage).clamp(0.0, POWER_MAX_UW_CM2).round() as u16;
        let uvi = uv_index(voltage).clamp(0.0, UV_INDEX_MAX);
        Self {
            power: Some(power),
            uv_index: Some(uvi),
            hold,
            fault,
        }
    }

    /// "----" while faulted.
    pub fn power_text(&self) -> String {
        match self.power {
            Some(p) => p.to_string(),
            None => "----".to_string(),
        }
    }

    pub fn uvi_label(&self) -> Option<UviLabel> {
        self.uv_index.map(UviLabel::from_clamped)
    }

    /// "UVI=---" while faulted.
    pub fn uvi_text(&self) -> String {
        match self.uvi_label() {
            Some(label) => label.to_string(),
            None => "UVI=---".to_string(),
        }
    }

    /// UV bar height in pixels, 0 while faulted.
    pub fn bar_height(&self) -> u8 {
        self.uv_index
            .map(|uvi| (BAR_FULL_PX / UV_INDEX_MAX * uvi).round() as u8)
            .unwrap_or(0)
    }
}

/// Screen collaborator.
pub trait Display {
    fn render(&mut self, readout: &Readout) -> HwResult<()>;

    /// Free-form status line (e.g. "Calibrating...").
    fn message(&mut self, _text: &str) -> HwResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(13.0, "UVI=13+")]
    #[case(12.5, "UVI=13+")]
    #[case(12.49, "UVI=12")]
    #[case(0.0, "UVI=0")]
    #[case(0.49, "UVI=0")]
    #[case(6.5, "UVI=7")]
    fn uvi_label_boundaries(#[case] uvi: f32, #[case] text: &str) {
        assert_eq!(UviLabel::from_clamped(uvi).to_string(), text);
    }

    #[rstest]
    #[case(0.0, 0)]
    #[case(-0.2, 0)]
    #[case(0.093, 100)]
    #[case(0.93, 1000)]
    #[case(5.0, 1999)]
    fn power_is_clamped_and_rounded(#[case] volts: f32, #[case] expected: u16) {
        let r = Readout::new(volts, HoldState::Active, FaultState::Ok);
        assert_eq!(r.power, Some(expected));
    }

    #[test]
    fn index_saturates_at_thirteen_plus() {
        let r = Readout::new(1.0, HoldState::Active, FaultState::Ok);
        assert_eq!(r.uv_index, Some(13.0));
        assert_eq!(r.uvi_label(), Some(UviLabel::Extreme));
        assert_eq!(r.bar_height(), 48);
    }

    #[test]
    fn fault_shows_placeholders() {
        let r = Readout::new(0.5, HoldState::Held, FaultState::Fault);
        assert_eq!(r.power_text(), "----");
        assert_eq!(r.uvi_text(), "UVI=---");
        assert_eq!(r.bar_height(), 0);
        assert!(r.hold.is_held());
    }

    #[test]
    fn hold_toggles() {
        assert_eq!(HoldState::Active.toggled(), HoldState::Held);
        assert_eq!(HoldState::Held.toggled(), HoldState::Active);
    }
}
