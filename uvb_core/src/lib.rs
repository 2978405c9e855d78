#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! UVB meter device logic (hardware-agnostic).
//!
//! Every peripheral is reached through the traits in `uvb_traits`; the display contract is
//! [`readout::Display`].
//!
//! ## Architecture
//!
//! - **Countdown**: wrap-safe auto power-off timer (`countdown`)
//! - **Motion**: EMA of squared acceleration deltas (`motion`)
//! - **Sampling**: 100-sample averaged ADC pass (`sampler`)
//! - **Readout**: power / UV index conversion, clamping and labels (`readout`)
//! - **Meter**: the per-tick state machine (`meter`), assembled by `builder`
//! - **Runner**: boot-time calibration gesture and the tick loop (`runner`)

pub mod builder;
pub mod calibration;
pub mod config;
pub mod countdown;
pub mod error;
pub mod hw_error;
pub mod meter;
pub mod mocks;
pub mod motion;
pub mod readout;
pub mod runner;
pub mod sampler;
pub mod status;

pub use builder::MeterBuilder;
pub use config::{MeterCfg, MotionCfg, SamplingCfg, TimingCfg};
pub use countdown::CountdownTimer;
pub use error::{BuildError, MeterError, Report, Result};
pub use meter::UvbMeter;
pub use motion::MotionClassifier;
pub use readout::{Display, FaultState, HoldState, Readout, UviLabel};
pub use runner::{RunOutcome, RunSummary, boot, run};
pub use sampler::AveragingSampler;
pub use status::{PowerOffReason, TickStatus};
