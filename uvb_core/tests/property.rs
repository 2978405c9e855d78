use proptest::prelude::*;
use uvb_core::{CountdownTimer, MotionClassifier, Readout, FaultState, HoldState};

proptest! {
    #[test]
    fn countdown_never_grows_without_reset(
        limit in 1u32..1_000_000,
        start in any::<u32>(),
        steps in prop::collection::vec(0u32..50_000, 1..100),
    ) {
        let mut t = CountdownTimer::new();
        t.begin(limit, start);
        let mut now = start;
        let mut prev = t.count();
        let mut total: u64 = 0;
        for step in steps {
            now = now.wrapping_add(step);
            total += u64::from(step);
            t.update(now);
            prop_assert!(t.count() <= prev);
            prop_assert!(t.count() <= t.time_limit());
            prop_assert_eq!(u64::from(t.count()), u64::from(limit).saturating_sub(total));
            prev = t.count();
        }
    }

    #[test]
    fn constant_orientation_is_stationary(
        x in -2.0f32..2.0, y in -2.0f32..2.0, z in -2.0f32..2.0,
        n in 1usize..50,
    ) {
        let mut m = MotionClassifier::default();
        for _ in 0..n {
            m.update([x, y, z]);
        }
        prop_assert!(m.is_stationary());
        prop_assert_eq!(m.energy(), 0.0);
    }

    #[test]
    fn motion_energy_is_non_negative(
        samples in prop::collection::vec(prop::array::uniform3(-4.0f32..4.0), 1..64),
    ) {
        let mut m = MotionClassifier::default();
        for s in samples {
            m.update(s);
            prop_assert!(m.energy() >= 0.0);
        }
    }

    #[test]
    fn readout_stays_on_scale(volts in -10.0f32..10.0) {
        let r = Readout::new(volts, HoldState::Active, FaultState::Ok);
        prop_assert!(r.power.is_some_and(|p| p <= 1999));
        prop_assert!(r.uv_index.is_some_and(|u| (0.0..=13.0).contains(&u)));
        prop_assert!(r.bar_height() <= 48);
    }
}
