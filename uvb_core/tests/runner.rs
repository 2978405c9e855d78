use std::sync::atomic::AtomicBool;

use uvb_core::mocks::{
    MemoryStore, RecordingDisplay, RecordingPower, ScriptedAdc, ScriptedButtons, ScriptedImu,
};
use uvb_core::{HoldState, MeterCfg, PowerOffReason, RunOutcome, UvbMeter, boot, run};
use uvb_traits::{ButtonState, PowerPress, SimClock};

fn meter(buttons: &ScriptedButtons, cfg: MeterCfg) -> UvbMeter {
    UvbMeter::builder()
        .with_clock(SimClock::new())
        .with_adc(ScriptedAdc::constant(25, 0.001))
        .with_accelerometer(ScriptedImu::still())
        .with_buttons(buttons.clone())
        .with_display(RecordingDisplay::new())
        .with_power_control(RecordingPower::new())
        .with_config(cfg)
        .try_build()
        .unwrap()
}

#[test]
fn tick_limit_stops_the_loop() {
    let buttons = ScriptedButtons::new();
    let mut m = meter(&buttons, MeterCfg::default());
    let summary = run(&mut m, &AtomicBool::new(false), Some(5)).unwrap();
    assert_eq!(summary.outcome, RunOutcome::TickLimit);
    assert_eq!(summary.ticks, 5);
    assert_eq!(summary.sampler_passes, 5);
    assert!((summary.voltage - 0.025).abs() < 1e-6);
}

#[test]
fn raised_shutdown_flag_interrupts_before_ticking() {
    let buttons = ScriptedButtons::new();
    let mut m = meter(&buttons, MeterCfg::default());
    let summary = run(&mut m, &AtomicBool::new(true), None).unwrap();
    assert_eq!(summary.outcome, RunOutcome::Interrupted);
    assert_eq!(summary.ticks, 0);
}

#[test]
fn loop_ends_on_inactivity() {
    let buttons = ScriptedButtons::new();
    let mut cfg = MeterCfg::default();
    cfg.timing.auto_off_ms = 1_000;
    let mut m = meter(&buttons, cfg);
    let summary = run(&mut m, &AtomicBool::new(false), None).unwrap();
    assert_eq!(
        summary.outcome,
        RunOutcome::PoweredOff(PowerOffReason::Inactivity)
    );
    // 101 ms per sampling tick: the tenth tick crosses 1000 ms.
    assert_eq!(summary.ticks, 9);
}

#[test]
fn boot_calibrates_when_b_is_held() {
    let buttons = ScriptedButtons::new();
    buttons.push(ButtonState {
        b: true,
        ..ButtonState::default()
    });
    let mut m = meter(&buttons, MeterCfg::default());
    let mut store = MemoryStore::new();
    let offset = boot(&mut m, &mut store, false).unwrap();
    let offset = offset.expect("calibration ran");
    assert!((offset - 0.025).abs() < 1e-6);
    assert_eq!(store.get("offset"), Some(offset));
}

#[test]
fn boot_without_gesture_skips_calibration() {
    let buttons = ScriptedButtons::new();
    let mut m = meter(&buttons, MeterCfg::default());
    let mut store = MemoryStore::new();
    assert_eq!(boot(&mut m, &mut store, false).unwrap(), None);
    assert_eq!(buttons.polls(), 1);
    assert_eq!(store.get("offset"), None);
}

#[test]
fn forced_boot_calibration_does_not_poll_buttons() {
    let buttons = ScriptedButtons::new();
    let mut m = meter(&buttons, MeterCfg::default());
    let mut store = MemoryStore::new();
    assert!(boot(&mut m, &mut store, true).unwrap().is_some());
    assert_eq!(buttons.polls(), 0);
}

#[test]
fn long_power_press_seen_at_boot_powers_off_on_first_tick() {
    let buttons = ScriptedButtons::new();
    buttons.push(ButtonState {
        power: PowerPress::Long,
        ..ButtonState::default()
    });
    let mut m = meter(&buttons, MeterCfg::default());
    let mut store = MemoryStore::new();
    assert_eq!(boot(&mut m, &mut store, false).unwrap(), None);
    let summary = run(&mut m, &AtomicBool::new(false), Some(5)).unwrap();
    assert_eq!(
        summary.outcome,
        RunOutcome::PoweredOff(PowerOffReason::PowerButton)
    );
    assert_eq!(summary.ticks, 0);
}

#[test]
fn button_a_seen_at_boot_toggles_hold_on_first_tick() {
    let buttons = ScriptedButtons::new();
    buttons.push(ButtonState {
        a: true,
        ..ButtonState::default()
    });
    let mut m = meter(&buttons, MeterCfg::default());
    let mut store = MemoryStore::new();
    boot(&mut m, &mut store, false).unwrap();
    run(&mut m, &AtomicBool::new(false), Some(1)).unwrap();
    assert_eq!(m.hold(), HoldState::Held);
}

#[test]
fn calibration_gesture_does_not_toggle_hold() {
    let buttons = ScriptedButtons::new();
    buttons.push(ButtonState {
        b: true,
        ..ButtonState::default()
    });
    let mut m = meter(&buttons, MeterCfg::default());
    let mut store = MemoryStore::new();
    assert!(boot(&mut m, &mut store, false).unwrap().is_some());
    run(&mut m, &AtomicBool::new(false), Some(1)).unwrap();
    assert_eq!(m.hold(), HoldState::Active);
}
