//! Quick linear estimators relating dry-bulb, wet-bulb and dew point.
//!
//! Rules of thumb (the dew-point depression is about three times the
//! wet-bulb depression), reasonable for mild air around 0-15 °C. They are
//! not used by the resolver, which solves the correlations exactly.

/// Rough dew point [°C] from dry-bulb and wet-bulb.
pub fn estimate_dew_point_from_wet_bulb(t_db_c: f64, t_wb_c: f64) -> f64 {
    t_db_c - (t_db_c - t_wb_c) * 3.0
}

/// Rough wet-bulb [°C] from dry-bulb and dew point.
pub fn estimate_wet_bulb_from_dew_point(t_db_c: f64, t_dp_c: f64) -> f64 {
    t_db_c - (t_db_c - t_dp_c) / 3.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimators_are_inverse() {
        let t_db = 12.0;
        let t_wb = 9.0;
        let t_dp = estimate_dew_point_from_wet_bulb(t_db, t_wb);
        assert_eq!(t_dp, 3.0);
        assert!((estimate_wet_bulb_from_dew_point(t_db, t_dp) - t_wb).abs() < 1e-12);
    }

    #[test]
    fn saturated_air_has_no_depression() {
        assert_eq!(estimate_dew_point_from_wet_bulb(10.0, 10.0), 10.0);
        assert_eq!(estimate_wet_bulb_from_dew_point(10.0, 10.0), 10.0);
    }

    #[test]
    fn estimate_tracks_resolved_wet_bulb() {
        // 10 °C / 80 % RH at 1 atm: true wet-bulb ≈ 8.3 °C, dew point ≈ 6.7 °C.
        let t_wb = estimate_wet_bulb_from_dew_point(10.0, 6.7);
        assert!((t_wb - 8.3).abs() < 1.0);
    }
}
