//! End-to-end resolver scenarios.
//!
//! Reference values are the ASHRAE correlation set at sea level; tolerances
//! allow for the correlations' own approximation error.

use psy_air::correlations::{
    humidity_ratio_from_partial_pressure, saturation_vapor_pressure, specific_enthalpy,
    specific_volume,
};
use psy_air::{
    ErrorKind, MoistAirState, Resolver, ResolverConfig, ResolveStep, Secondary,
    resolve_from_dew_point, resolve_from_relative_humidity, resolve_from_wet_bulb,
    resolve_saturated,
};

const P_ATM: f64 = 101.325;

fn assert_close(actual: f64, expected: f64, rel: f64, what: &str) {
    assert!(
        (actual - expected).abs() <= rel * expected.abs(),
        "{what}: {actual} vs {expected}"
    );
}

#[test]
fn saturation_round_trip() {
    for (p, t) in [(P_ATM, 20.0), (80.0, -15.0), (110.0, 45.0)] {
        let s = resolve_saturated(p, t).unwrap();
        assert!((s.wet_bulb_c() - t).abs() < 1e-9);
        assert!((s.dew_point_c() - t).abs() < 1e-9);
        assert!((s.relative_humidity() - 1.0).abs() < 1e-9);
        assert!((s.degree_of_saturation() - 1.0).abs() < 1e-9);
    }
}

#[test]
fn scenario_25c_50_percent() {
    let s = resolve_from_relative_humidity(P_ATM, 25.0, 0.5).unwrap();
    assert_close(s.humidity_ratio(), 0.00988, 0.01, "humidity ratio");
    assert_close(s.specific_enthalpy_kj_per_kg(), 50.2, 0.01, "enthalpy");
    assert_close(s.dew_point_c(), 13.9, 0.01, "dew point");
    assert_close(s.saturation_vapor_pressure_kpa(), 3.1698, 0.001, "p_ws");
    assert_close(s.vapor_pressure_kpa(), 0.5 * s.saturation_vapor_pressure_kpa(), 1e-12, "p_w");
}

#[test]
fn case_equivalence_from_wet_bulb() {
    let resolver = Resolver::default();
    for (t_db, t_wb) in [(25.0, 18.0), (35.0, 20.0), (5.0, 2.0), (-5.0, -6.0), (45.0, 44.5)] {
        let a = resolver.resolve_from_wet_bulb(P_ATM, t_db, t_wb).unwrap();

        let b = resolver
            .resolve_from_dew_point(P_ATM, t_db, a.dew_point_c())
            .unwrap();
        assert!(
            (b.wet_bulb_c() - t_wb).abs() < 1e-4,
            "dew-point case: {} vs {t_wb}",
            b.wet_bulb_c()
        );

        let c = resolver
            .resolve_from_relative_humidity(P_ATM, t_db, a.relative_humidity())
            .unwrap();
        assert!(
            (c.wet_bulb_c() - t_wb).abs() < 1e-4,
            "relative-humidity case: {} vs {t_wb}",
            c.wet_bulb_c()
        );
        assert!((c.dew_point_c() - a.dew_point_c()).abs() < 1e-4);
        assert!((c.humidity_ratio() - a.humidity_ratio()).abs() < 1e-8);
    }
}

#[test]
fn resolved_state_is_internally_consistent() {
    let s = resolve_from_wet_bulb(95.0, 30.0, 22.0).unwrap();
    let p = s.pressure_kpa();

    let w_from_pw = humidity_ratio_from_partial_pressure(p, s.vapor_pressure_kpa()).unwrap();
    assert_close(w_from_pw, s.humidity_ratio(), 1e-9, "W from p_w");

    let p_ws = saturation_vapor_pressure(s.dry_bulb_c()).unwrap();
    assert_close(s.saturation_vapor_pressure_kpa(), p_ws, 1e-12, "p_ws");
    assert_close(
        s.relative_humidity(),
        s.vapor_pressure_kpa() / p_ws,
        1e-9,
        "relative humidity",
    );

    // Dew point reproduces the vapor pressure.
    let p_w_dp = saturation_vapor_pressure(s.dew_point_c()).unwrap();
    assert_close(p_w_dp, s.vapor_pressure_kpa(), 1e-6, "p_ws(t_dp)");

    assert_eq!(
        s.specific_enthalpy_kj_per_kg(),
        specific_enthalpy(s.dry_bulb_c(), s.humidity_ratio())
    );
    assert_eq!(
        s.specific_volume_m3_per_kg(),
        specific_volume(s.dry_bulb_c(), s.humidity_ratio(), p)
    );
}

#[test]
fn boundary_rejection() {
    let err = resolve_from_wet_bulb(P_ATM, 20.0, 25.0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PhysicalImpossibility);

    let err = saturation_vapor_pressure(250.0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Domain);

    let err = resolve_from_relative_humidity(P_ATM, 20.0, 1.5).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Domain);
}

#[test]
fn failures_name_the_step_and_bound() {
    let err = resolve_from_wet_bulb(P_ATM, 20.0, -150.0).unwrap_err();
    assert_eq!(err.step(), Some(ResolveStep::WetBulbSaturation));
    let msg = err.to_string();
    assert!(msg.contains("saturation at wet-bulb"), "{msg}");
    assert!(msg.contains("-100"), "{msg}");

    let err = resolve_from_dew_point(P_ATM, 20.0, 22.0).unwrap_err();
    assert!(err.to_string().contains("dew-point temperature"));
}

#[test]
fn below_freezing_states() {
    let s = resolve_from_relative_humidity(P_ATM, -10.0, 0.6).unwrap();
    assert!(s.dew_point_c() < s.wet_bulb_c());
    assert!(s.wet_bulb_c() < -10.0);
    assert!(s.humidity_ratio() > 0.0 && s.humidity_ratio() < 0.002);
}

#[test]
fn mutating_the_secondary_produces_new_states() {
    let resolver = Resolver::default();
    let base = resolver.resolve_from_wet_bulb(P_ATM, 28.0, 20.0).unwrap();
    let same: MoistAirState = base
        .with_secondary(&resolver, Secondary::DewPoint(base.dew_point_c()))
        .unwrap();
    assert!((same.wet_bulb_c() - 20.0).abs() < 1e-4);
    assert_eq!(base.wet_bulb_c(), 20.0);
}

#[test]
fn loose_tolerance_still_brackets() {
    let resolver = Resolver::new(ResolverConfig {
        humidity_ratio_tolerance: 1e-6,
        temperature_tolerance: 1e-3,
        ..ResolverConfig::default()
    })
    .unwrap();
    let s = resolver
        .resolve_from_relative_humidity(P_ATM, 25.0, 0.5)
        .unwrap();
    assert!((s.wet_bulb_c() - 17.89).abs() < 0.01);
}
