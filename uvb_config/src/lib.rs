#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema for the `uvb` binary.
//!
//! The meter itself has no tunables; this file only describes the host side: logging, where
//! the calibration store lives, and the simulated world the meter runs against.
//!
//! ```toml
//! [logging]
//! level = "info"
//!
//! [store]
//! path = "uvb_store.toml"
//!
//! [simulation]
//! uv_voltage = 0.05
//! noise_counts = 2
//!
//! [[simulation.events]]
//! at_ms = 2000
//! kind = "button-a"
//!
//! [[simulation.events]]
//! at_ms = 4000
//! kind = "uv"
//! value = 0.11
//! ```
use serde::Deserialize;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StoreCfg {
    /// TOML file holding the persisted calibration offset.
    pub path: String,
}

impl Default for StoreCfg {
    fn default() -> Self {
        Self {
            path: "uvb_store.toml".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    ButtonA,
    ButtonB,
    PowerShort,
    PowerLong,
    Shake,
    Unplug,
    Plug,
    /// Change the sensor output voltage; needs `value`.
    Uv,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct EventCfg {
    /// Milliseconds after boot.
    pub at_ms: u32,
    pub kind: EventKind,
    #[serde(default)]
    pub value: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SimulationCfg {
    /// Sensor output in volts.
    pub uv_voltage: f32,
    /// Uniform ADC noise, ± counts.
    pub noise_counts: u16,
    /// Uniform accelerometer noise, ± g.
    pub accel_noise_g: f32,
    pub seed: u64,
    /// Whether the sensor HAT is attached at boot.
    pub connected: bool,
    /// Initial millisecond counter; set near `u32::MAX` to exercise wraparound.
    pub start_ms: u32,
    /// Stop after this many ticks (default: run until power-off).
    pub max_ticks: Option<u64>,
    pub events: Vec<EventCfg>,
}

impl Default for SimulationCfg {
    fn default() -> Self {
        Self {
            uv_voltage: 0.05,
            noise_counts: 2,
            accel_noise_g: 0.001,
            seed: 0x5EED,
            connected: true,
            start_ms: 0,
            max_ticks: None,
            events: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub logging: Logging,
    pub store: StoreCfg,
    pub simulation: SimulationCfg,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

impl Config {
    /// Read and parse a config file. Does not validate.
    pub fn from_path(path: &std::path::Path) -> eyre::Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| eyre::eyre!("read config {}: {}", path.display(), e))?;
        load_toml(&text).map_err(|e| eyre::eyre!("parse config {}: {}", path.display(), e))
    }

    pub fn validate(&self) -> eyre::Result<()> {
        // Logging
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly, got {rot:?}");
        }
        if self.logging.file.as_deref().is_some_and(str::is_empty) {
            eyre::bail!("logging.file must not be empty");
        }

        // Store
        if self.store.path.trim().is_empty() {
            eyre::bail!("store.path must not be empty");
        }

        // Simulation
        let sim = &self.simulation;
        if !sim.uv_voltage.is_finite() {
            eyre::bail!("simulation.uv_voltage must be finite");
        }
        if sim.noise_counts > 2047 {
            eyre::bail!("simulation.noise_counts must be <= 2047");
        }
        if !(sim.accel_noise_g >= 0.0 && sim.accel_noise_g <= 1.0) {
            eyre::bail!("simulation.accel_noise_g must be in [0.0, 1.0]");
        }
        if sim.max_ticks == Some(0) {
            eyre::bail!("simulation.max_ticks must be >= 1");
        }
        for (i, ev) in sim.events.iter().enumerate() {
            match (ev.kind, ev.value) {
                (EventKind::Uv, None) => {
                    eyre::bail!("simulation.events[{i}]: kind \"uv\" requires value")
                }
                (EventKind::Uv, Some(v)) if !v.is_finite() => {
                    eyre::bail!("simulation.events[{i}]: value must be finite")
                }
                (EventKind::Uv, Some(_)) | (_, None) => {}
                (kind, Some(_)) => {
                    eyre::bail!("simulation.events[{i}]: {kind:?} does not take a value")
                }
            }
        }
        Ok(())
    }
}
