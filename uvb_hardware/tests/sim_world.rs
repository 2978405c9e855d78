use rstest::rstest;
use uvb_hardware::{SimEvent, SimParams, SimWorld, TimedEvent};
use uvb_traits::{Accelerometer, Adc, Buttons, PowerPress, SimClock};

fn at(at_ms: u32, event: SimEvent) -> TimedEvent {
    TimedEvent { at_ms, event }
}

#[rstest]
fn events_fire_only_once_their_time_has_come() {
    let clock = SimClock::new();
    let world = SimWorld::new(
        clock.clone(),
        SimParams::default(),
        vec![at(300, SimEvent::Unplug), at(100, SimEvent::PowerShort)],
    );
    let mut adc = world.adc();
    let mut buttons = world.buttons();

    assert!(adc.is_connected());
    assert_eq!(buttons.poll().power, PowerPress::None);

    clock.advance(100);
    assert_eq!(buttons.poll().power, PowerPress::Short);
    assert!(adc.is_connected());

    clock.advance(200);
    assert!(!adc.is_connected());
    assert_eq!(world.pending_events(), 0);
}

#[rstest]
fn events_are_relative_to_world_start_even_across_wraparound() {
    let clock = SimClock::starting_at(u32::MAX - 10);
    let world = SimWorld::new(clock.clone(), SimParams::default(), vec![at(20, SimEvent::Unplug)]);
    let mut adc = world.adc();
    clock.advance(15);
    assert!(adc.is_connected());
    clock.advance(5);
    assert!(!adc.is_connected());
}

#[rstest]
fn still_imu_reads_gravity_and_shake_moves_it() {
    let clock = SimClock::new();
    let world = SimWorld::new(clock.clone(), SimParams::default(), vec![at(0, SimEvent::Shake)]);
    let mut imu = world.imu();
    let a = imu.read_accel();
    let b = imu.read_accel();
    assert!((a[0] - b[0]).abs() > 0.9, "shake should swing the x axis");
    clock.advance(uvb_hardware::SHAKE_MS);
    assert_eq!(imu.read_accel(), [0.0, 0.0, 1.0]);
}

#[rstest]
#[case(0, 0.0)]
#[case(0, 0.123)]
#[case(3, 0.080)]
fn adc_noise_stays_within_amplitude(#[case] noise: u16, #[case] volts: f32) {
    let world = SimWorld::new(
        SimClock::new(),
        SimParams {
            uv_voltage: volts,
            noise_counts: noise,
            seed: 7,
            ..SimParams::default()
        },
        vec![],
    );
    let mut adc = world.adc();
    let ideal = (volts / adc.volts_per_count()).round() as i32;
    for _ in 0..50 {
        adc.request_conversion();
        let got = i32::from(adc.read_last_result());
        assert!((got - ideal).abs() <= i32::from(noise), "got {got}, ideal {ideal}");
    }
}
