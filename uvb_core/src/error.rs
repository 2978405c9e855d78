use thiserror::Error;

use crate::status::PowerOffReason;

#[derive(Debug, Error, Clone)]
pub enum MeterError {
    #[error("hardware error: {0}")]
    Hardware(String),
    #[error("hardware fault: {0}")]
    HardwareFault(String),
    #[error("store error: {0}")]
    Store(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("meter powered off ({0})")]
    PoweredOff(PowerOffReason),
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing adc")]
    MissingAdc,
    #[error("missing accelerometer")]
    MissingAccelerometer,
    #[error("missing buttons")]
    MissingButtons,
    #[error("missing display")]
    MissingDisplay,
    #[error("missing power control")]
    MissingPowerControl,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
