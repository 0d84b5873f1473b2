//! Property tests: every resolved state satisfies the moist-air invariants.

use proptest::prelude::*;
use psy_air::{MoistAirState, Resolver};

fn assert_invariants(s: &MoistAirState) -> Result<(), TestCaseError> {
    prop_assert!((0.0..=1.0).contains(&s.relative_humidity()), "{}", s.summary());
    prop_assert!((0.0..=1.0).contains(&s.degree_of_saturation()), "{}", s.summary());
    prop_assert!(s.humidity_ratio() >= 0.0, "{}", s.summary());
    prop_assert!(
        s.vapor_pressure_kpa() <= s.saturation_vapor_pressure_kpa(),
        "{}",
        s.summary()
    );
    prop_assert!(s.vapor_pressure_kpa() < s.pressure_kpa(), "{}", s.summary());
    prop_assert!(s.wet_bulb_c() <= s.dry_bulb_c(), "{}", s.summary());
    prop_assert!(s.dew_point_c() <= s.wet_bulb_c(), "{}", s.summary());
    Ok(())
}

#[test]
fn freezing_point_branch_switch() {
    // eqs. (5)/(6) disagree by ~6e-5 kPa at 0 °C; vapor pressures in that gap
    // have no exact dew point.
    let resolver = Resolver::default();
    for t_db in [0.0, 1e-5, 1e-4, 1e-3] {
        for rh in [0.9999, 0.99999, 0.999999] {
            let c = resolver
                .resolve_from_relative_humidity(101.325, t_db, rh)
                .unwrap();
            assert_invariants(&c).unwrap();

            let b = resolver
                .resolve_from_dew_point(101.325, t_db, c.dew_point_c())
                .unwrap();
            assert_invariants(&b).unwrap();
            // The branch gap bounds the humidity-ratio mismatch to ~4e-7 kg/kg.
            assert!(
                (b.wet_bulb_c() - c.wet_bulb_c()).abs() < 1e-3,
                "t_db={t_db} rh={rh}: {} vs {}",
                b.summary(),
                c.summary()
            );
        }
    }
}

proptest! {
    #[test]
    fn relative_humidity_states_hold_invariants(
        p in 50.0_f64..110.0,
        t_db in -40.0_f64..50.0,
        rh in 0.05_f64..=1.0,
    ) {
        let s = Resolver::default().resolve_from_relative_humidity(p, t_db, rh).unwrap();
        assert_invariants(&s)?;
    }

    #[test]
    fn wet_bulb_and_dew_point_cases_agree(
        p in 50.0_f64..110.0,
        t_db in -40.0_f64..50.0,
        rh in 0.05_f64..=1.0,
    ) {
        let resolver = Resolver::default();
        let c = resolver.resolve_from_relative_humidity(p, t_db, rh).unwrap();

        let a = resolver.resolve_from_wet_bulb(p, t_db, c.wet_bulb_c()).unwrap();
        assert_invariants(&a)?;
        prop_assert!((a.humidity_ratio() - c.humidity_ratio()).abs() < 1e-8);

        let b = resolver.resolve_from_dew_point(p, t_db, c.dew_point_c()).unwrap();
        assert_invariants(&b)?;
        prop_assert!((b.wet_bulb_c() - c.wet_bulb_c()).abs() < 1e-4);
    }

    #[test]
    fn wet_bulb_inputs_never_break_invariants(
        p in 50.0_f64..110.0,
        t_db in -40.0_f64..50.0,
        depression in 0.0_f64..15.0,
    ) {
        // Large depressions at cold temperatures are drier than dry air and must
        // fail cleanly; everything that resolves must be valid.
        match Resolver::default().resolve_from_wet_bulb(p, t_db, t_db - depression) {
            Ok(s) => assert_invariants(&s)?,
            Err(e) => prop_assert_ne!(e.kind(), psy_air::ErrorKind::Convergence),
        }
    }

    #[test]
    fn saturated_states_coincide(p in 50.0_f64..110.0, t_db in -40.0_f64..50.0) {
        let s = Resolver::default().resolve_saturated(p, t_db).unwrap();
        prop_assert_eq!(s.wet_bulb_c(), t_db);
        prop_assert_eq!(s.dew_point_c(), t_db);
        prop_assert_eq!(s.relative_humidity(), 1.0);
    }

    #[test]
    fn humidity_ratio_increases_with_relative_humidity(
        p in 50.0_f64..110.0,
        t_db in -40.0_f64..50.0,
        rh in 0.01_f64..0.98,
        step in 0.001_f64..0.01,
    ) {
        let resolver = Resolver::default();
        let lo = resolver.resolve_from_relative_humidity(p, t_db, rh).unwrap();
        let hi = resolver.resolve_from_relative_humidity(p, t_db, rh + step).unwrap();
        prop_assert!(lo.humidity_ratio() < hi.humidity_ratio());
    }
}
