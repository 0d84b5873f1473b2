//! ASHRAE moist-air property correlations.
//!
//! Every function is pure and works in the fixed unit set of this crate:
//! pressure [kPa], temperature [°C], humidity ratio [kg water / kg dry air],
//! specific volume [m³/kg dry air], specific enthalpy [kJ/kg dry air].
//! Equation numbers refer to ASHRAE Handbook Fundamentals, ch. 1.
//!
//! Functions with a restricted domain check it themselves and fail locally;
//! the plain algebraic identities return `f64` directly.

use crate::error::{PsyError, PsyResult};
use crate::solver::{BracketConfig, bisect};
use psy_core::{celsius_to_kelvin, ensure_finite};

/// Universal gas constant [J/(kmol·K)].
pub const UNIVERSAL_GAS_CONSTANT: f64 = 8314.41;

/// Molar mass of dry air [kg/kmol].
pub const MOLAR_MASS_DRY_AIR: f64 = 28.964;

/// Ratio of molar masses, water vapor / dry air.
pub const MOLAR_MASS_RATIO: f64 = 0.62198;

/// Lowest temperature covered by the saturation correlations [°C].
pub const T_SAT_MIN_C: f64 = -100.0;

/// Highest temperature covered by the saturation correlations [°C].
pub const T_SAT_MAX_C: f64 = 200.0;

// Eq. (5), saturation over ice, -100..0 °C.
const C1: f64 = -5674.5359;
const C2: f64 = 6.3925247;
const C3: f64 = -0.009677843;
const C4: f64 = 0.00000062215701;
const C5: f64 = 0.0000000020747825;
const C6: f64 = -0.0000000000009484024;
const C7: f64 = 4.1635019;

// Eq. (6), saturation over liquid water, 0..200 °C.
const C8: f64 = -5800.2206;
const C9: f64 = 1.3914993;
const C10: f64 = -0.048640239;
const C11: f64 = 0.000041764768;
const C12: f64 = -0.000000014452093;
const C13: f64 = 6.5459673;

// Eqs. (37) / (38), dew point from vapor pressure.
const C14: f64 = 6.54;
const C15: f64 = 14.526;
const C16: f64 = 0.7389;
const C17: f64 = 0.09486;
const C18: f64 = 0.4569;
const C19: f64 = 6.09;
const C20: f64 = 12.608;
const C21: f64 = 0.4959;

/// Water vapor saturation pressure [kPa] over ice (below 0 °C) or liquid
/// water, eqs. (5) and (6).
pub fn saturation_vapor_pressure(t_c: f64) -> PsyResult<f64> {
    let t_c = ensure_finite(t_c, "saturation temperature")?;
    if !(T_SAT_MIN_C..=T_SAT_MAX_C).contains(&t_c) {
        return Err(PsyError::Domain {
            what: "saturation temperature [°C]",
            value: t_c,
            min: T_SAT_MIN_C,
            max: T_SAT_MAX_C,
        });
    }

    let t = celsius_to_kelvin(t_c);
    let ln_p_pa = if t_c < 0.0 {
        C1 / t + C2 + C3 * t + C4 * t.powi(2) + C5 * t.powi(3) + C6 * t.powi(4) + C7 * t.ln()
    } else {
        C8 / t + C9 + C10 * t + C11 * t.powi(2) + C12 * t.powi(3) + C13 * t.ln()
    };

    // The fits are in Pa.
    Ok(ln_p_pa.exp() / 1000.0)
}

/// Temperature [°C] at which the saturation pressure equals `p_w_kpa`.
///
/// Exact inverse of [`saturation_vapor_pressure`], found by bisection over
/// the correlation's validity range.
pub fn saturation_temperature(p_w_kpa: f64) -> PsyResult<f64> {
    saturation_temperature_with(p_w_kpa, None, &BracketConfig::default())
}

/// [`saturation_temperature`] with an explicit iteration budget.
///
/// A `guess` (typically [`dew_point_from_vapor_pressure`]) narrows the first
/// bracket to ±1 °C around it; the full range is searched if that bracket
/// misses the root.
pub fn saturation_temperature_with(
    p_w_kpa: f64,
    guess: Option<f64>,
    config: &BracketConfig,
) -> PsyResult<f64> {
    let p_w_kpa = ensure_finite(p_w_kpa, "vapor pressure")?;
    let p_lo = saturation_vapor_pressure(T_SAT_MIN_C)?;
    let p_hi = saturation_vapor_pressure(T_SAT_MAX_C)?;
    if !(p_lo..=p_hi).contains(&p_w_kpa) {
        return Err(PsyError::Domain {
            what: "vapor pressure [kPa]",
            value: p_w_kpa,
            min: p_lo,
            max: p_hi,
        });
    }

    // Bracket width is the only meaningful criterion: the ice/water branch
    // switch at 0 °C leaves a tiny gap with no exact root.
    let config = BracketConfig {
        abs_tol: 0.0,
        ..*config
    };
    let residual =
        |t: f64| -> PsyResult<f64> { Ok(saturation_vapor_pressure(t)? - p_w_kpa) };

    if let Some(guess) = guess.filter(|g| g.is_finite()) {
        let center = guess.clamp(T_SAT_MIN_C + 1.0, T_SAT_MAX_C - 1.0);
        match bisect(
            "saturation temperature",
            center - 1.0,
            center + 1.0,
            &residual,
            &config,
        ) {
            Err(PsyError::ConvergenceFailed { iterations: 0, .. }) => {}
            other => return other.map(|root| root.x),
        }
    }

    let root = bisect(
        "saturation temperature",
        T_SAT_MIN_C,
        T_SAT_MAX_C,
        &residual,
        &config,
    )?;
    Ok(root.x)
}

/// Humidity ratio from total and water-vapor partial pressure, eq. (22).
///
/// With the saturation pressure at the wet-bulb temperature this is eq. (23).
pub fn humidity_ratio_from_partial_pressure(p_kpa: f64, p_w_kpa: f64) -> PsyResult<f64> {
    let p_kpa = ensure_finite(p_kpa, "total pressure")?;
    let p_w_kpa = ensure_finite(p_w_kpa, "vapor pressure")?;
    if p_w_kpa < 0.0 {
        return Err(PsyError::Domain {
            what: "vapor pressure [kPa]",
            value: p_w_kpa,
            min: 0.0,
            max: p_kpa,
        });
    }
    if p_w_kpa >= p_kpa {
        return Err(PsyError::PhysicalImpossibility {
            what: "vapor partial pressure [kPa] vs total pressure",
            value: p_w_kpa,
            limit: p_kpa,
        });
    }
    Ok(MOLAR_MASS_RATIO * p_w_kpa / (p_kpa - p_w_kpa))
}

/// Water-vapor partial pressure [kPa] for a humidity ratio, eq. (22) solved
/// for `p_w` (equivalently eq. (36) at the dew point).
pub fn partial_vapor_pressure_from_humidity_ratio(p_kpa: f64, w: f64) -> f64 {
    p_kpa * w / (MOLAR_MASS_RATIO + w)
}

/// Relative humidity (0-1) from vapor and saturation pressure, eq. (24).
pub fn relative_humidity_from_pressures(p_w_kpa: f64, p_ws_kpa: f64) -> PsyResult<f64> {
    if p_w_kpa < 0.0 {
        return Err(PsyError::Domain {
            what: "vapor pressure [kPa]",
            value: p_w_kpa,
            min: 0.0,
            max: p_ws_kpa,
        });
    }
    if p_w_kpa >= p_ws_kpa {
        return Err(PsyError::PhysicalImpossibility {
            what: "vapor pressure [kPa] vs saturation pressure",
            value: p_w_kpa,
            limit: p_ws_kpa,
        });
    }
    Ok(p_w_kpa / p_ws_kpa)
}

/// Degree of saturation µ = W / Ws, eq. (12).
pub fn degree_of_saturation(w: f64, w_s: f64) -> PsyResult<f64> {
    if w_s <= 0.0 || !w_s.is_finite() {
        return Err(PsyError::Domain {
            what: "saturation humidity ratio [kg/kg]",
            value: w_s,
            min: 0.0,
            max: f64::INFINITY,
        });
    }
    let mu = w / w_s;
    check_unit_interval("degree of saturation", mu)?;
    Ok(mu)
}

/// Relative humidity (0-1) from degree of saturation, eq. (25).
pub fn relative_humidity_from_degree_of_saturation(
    mu: f64,
    p_kpa: f64,
    p_ws_kpa: f64,
) -> PsyResult<f64> {
    check_unit_interval("degree of saturation", mu)?;
    Ok(mu / (1.0 - (1.0 - mu) * (p_ws_kpa / p_kpa)))
}

/// Moist-air specific volume [m³/kg dry air], eq. (28).
pub fn specific_volume(t_c: f64, w: f64, p_kpa: f64) -> f64 {
    let t = celsius_to_kelvin(t_c);
    UNIVERSAL_GAS_CONSTANT * t * (1.0 + 1.6078 * w) / (MOLAR_MASS_DRY_AIR * p_kpa * 1000.0)
}

/// Moist-air specific enthalpy [kJ/kg dry air], eq. (32).
pub fn specific_enthalpy(t_c: f64, w: f64) -> f64 {
    1.006 * t_c + w * (2501.0 + 1.805 * t_c)
}

/// Humidity ratio from dry-bulb, wet-bulb, and the saturation humidity ratio
/// at the wet-bulb temperature, eq. (35).
pub fn humidity_ratio_from_wet_bulb(t_db_c: f64, t_wb_c: f64, w_s_wb: f64) -> PsyResult<f64> {
    if t_wb_c > t_db_c {
        return Err(PsyError::PhysicalImpossibility {
            what: "wet-bulb temperature [°C] vs dry-bulb",
            value: t_wb_c,
            limit: t_db_c,
        });
    }
    Ok(
        ((2501.0 - 2.381 * t_wb_c) * w_s_wb - 1.006 * (t_db_c - t_wb_c))
            / (2501.0 + 1.805 * t_db_c - 4.186 * t_wb_c),
    )
}

/// Dew-point temperature [°C] from vapor pressure, eqs. (37) and (38).
///
/// Eq. (37) is tried first (valid 0..93 °C); a negative result switches to
/// eq. (38) for dew points below freezing. The fit is within a few tenths of
/// a degree of the exact inverse, see [`saturation_temperature`].
pub fn dew_point_from_vapor_pressure(p_w_kpa: f64) -> PsyResult<f64> {
    let p_w_kpa = ensure_finite(p_w_kpa, "vapor pressure")?;
    if p_w_kpa <= 0.0 {
        return Err(PsyError::Domain {
            what: "vapor pressure [kPa]",
            value: p_w_kpa,
            min: 0.0,
            max: f64::INFINITY,
        });
    }

    let alpha = p_w_kpa.ln();
    let t_dp = C14 + C15 * alpha + C16 * alpha.powi(2) + C17 * alpha.powi(3)
        + C18 * p_w_kpa.powf(0.1984);
    if t_dp < 0.0 {
        Ok(C19 + C20 * alpha + C21 * alpha.powi(2))
    } else {
        Ok(t_dp)
    }
}

fn check_unit_interval(what: &'static str, value: f64) -> PsyResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(PsyError::Domain {
            what,
            value,
            min: 0.0,
            max: 1.0,
        })
    }
}
