use rstest::rstest;
use uvb_core::error::BuildError;
use uvb_core::mocks::{
    MemoryStore, RecordingDisplay, RecordingPower, ScriptedAdc, ScriptedButtons, ScriptedImu,
};
use uvb_core::{MeterBuilder, MeterCfg, UvbMeter};
use uvb_traits::SimClock;

fn complete() -> MeterBuilder {
    UvbMeter::builder()
        .with_clock(SimClock::new())
        .with_adc(ScriptedAdc::constant(0, 0.001))
        .with_accelerometer(ScriptedImu::still())
        .with_buttons(ScriptedButtons::new())
        .with_display(RecordingDisplay::new())
        .with_power_control(RecordingPower::new())
}

#[rstest]
fn builder_missing_adc_yields_typed_build_error() {
    let err = UvbMeter::builder()
        .with_accelerometer(ScriptedImu::still())
        .with_buttons(ScriptedButtons::new())
        .with_display(RecordingDisplay::new())
        .with_power_control(RecordingPower::new())
        .try_build()
        .expect_err("should fail with MissingAdc");

    match err.downcast_ref::<BuildError>() {
        Some(BuildError::MissingAdc) => {}
        other => panic!("expected MissingAdc, got: {other:?}"),
    }
}

#[rstest]
fn builder_missing_display_yields_typed_build_error() {
    let err = UvbMeter::builder()
        .with_adc(ScriptedAdc::constant(0, 0.001))
        .with_accelerometer(ScriptedImu::still())
        .with_buttons(ScriptedButtons::new())
        .with_power_control(RecordingPower::new())
        .try_build()
        .expect_err("should fail with MissingDisplay");
    assert!(matches!(
        err.downcast_ref::<BuildError>(),
        Some(BuildError::MissingDisplay)
    ));
}

#[rstest]
#[case::zero_tick(|c: &mut MeterCfg| c.timing.tick_ms = 0)]
#[case::zero_samples(|c: &mut MeterCfg| c.sampling.samples = 0)]
#[case::alpha_one(|c: &mut MeterCfg| c.motion.alpha = 1.0)]
#[case::negative_threshold(|c: &mut MeterCfg| c.motion.threshold = -1.0)]
fn invalid_config_is_rejected(#[case] tweak: fn(&mut MeterCfg)) {
    let mut cfg = MeterCfg::default();
    tweak(&mut cfg);
    let err = complete().with_config(cfg).try_build().expect_err("invalid");
    assert!(matches!(
        err.downcast_ref::<BuildError>(),
        Some(BuildError::InvalidConfig(_))
    ));
}

#[rstest]
fn non_finite_offset_is_rejected() {
    let err = complete()
        .with_offset_voltage(f32::INFINITY)
        .try_build()
        .expect_err("invalid offset");
    assert!(matches!(
        err.downcast_ref::<BuildError>(),
        Some(BuildError::InvalidConfig(_))
    ));
}

#[rstest]
fn offset_is_loaded_from_store() {
    let store = MemoryStore::with(uvb_core::calibration::OFFSET_KEY, 0.02);
    let m = complete().with_store(&store).try_build().unwrap();
    assert_eq!(m.offset_voltage(), 0.02);
}

#[rstest]
fn timer_is_armed_at_build() {
    let m = complete().try_build().unwrap();
    assert_eq!(m.timer().count(), 300_000);
    assert_eq!(m.ticks(), 0);
    assert!(m.last_readout().is_none());
}
