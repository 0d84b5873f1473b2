//! Standard atmosphere, eqs. (3) and (4).

use crate::error::{PsyError, PsyResult};
use psy_core::ensure_finite;
use psy_core::units::constants::P_STD_KPA;

/// Lowest altitude covered by the standard-atmosphere fit [m].
pub const ALTITUDE_MIN_M: f64 = -500.0;

/// Highest altitude covered by the standard-atmosphere fit [m].
pub const ALTITUDE_MAX_M: f64 = 20_000.0;

/// Standard sea-level temperature [°C].
pub const T_STD_C: f64 = 15.0;

const LAPSE_RATE_C_PER_M: f64 = 0.0065;
const C0: f64 = 2.25577e-5;
const EXPONENT: f64 = 5.2559;

/// Standard-atmosphere barometric pressure [kPa] at `altitude_m`.
pub fn standard_atmosphere_pressure(altitude_m: f64) -> PsyResult<f64> {
    check_altitude(altitude_m)?;
    Ok(P_STD_KPA * (1.0 - C0 * altitude_m).powf(EXPONENT))
}

/// Standard-atmosphere temperature [°C] at `altitude_m`.
pub fn standard_atmosphere_temperature(altitude_m: f64) -> PsyResult<f64> {
    check_altitude(altitude_m)?;
    Ok(T_STD_C - LAPSE_RATE_C_PER_M * altitude_m)
}

fn check_altitude(altitude_m: f64) -> PsyResult<()> {
    let altitude_m = ensure_finite(altitude_m, "altitude")?;
    if (ALTITUDE_MIN_M..=ALTITUDE_MAX_M).contains(&altitude_m) {
        Ok(())
    } else {
        Err(PsyError::Domain {
            what: "altitude [m]",
            value: altitude_m,
            min: ALTITUDE_MIN_M,
            max: ALTITUDE_MAX_M,
        })
    }
}
