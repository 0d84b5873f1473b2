//! Moist-air state resolver.
//!
//! Given total pressure, dry-bulb temperature and at most one secondary
//! measurement, derives the full property set of [`MoistAirState`].
//!
//! Every resolution first evaluates the saturation line at the dry-bulb
//! temperature (the only branch computable without iteration), then applies
//! the secondary measurement:
//!
//! - wet-bulb: closed-form chain through eqs. (23) and (35);
//! - dew point: vapor pressure from the dew point, wet-bulb by bisection;
//! - relative humidity: vapor pressure from φ, dew point and wet-bulb by
//!   bisection.
//!
//! Resolution is atomic. Either every invariant holds on the returned state
//! or the first failure is returned, tagged with the [`ResolveStep`] that
//! raised it.

use crate::atmosphere::standard_atmosphere_pressure;
use crate::correlations::{
    degree_of_saturation, dew_point_from_vapor_pressure, humidity_ratio_from_partial_pressure,
    humidity_ratio_from_wet_bulb, partial_vapor_pressure_from_humidity_ratio,
    relative_humidity_from_degree_of_saturation, saturation_temperature_with,
    saturation_vapor_pressure, specific_enthalpy, specific_volume, T_SAT_MIN_C,
};
use crate::error::{PsyError, PsyResult, ResolveStep, StepContext};
use crate::solver::{BracketConfig, bisect};
use crate::state::{MoistAirState, Secondary};
use psy_core::snap_into;
use psy_core::units::{Pressure, Temperature, to_degc, to_kpa};
use tracing::debug;

/// Iteration budget and tolerances of the resolver.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ResolverConfig {
    /// Maximum bisection steps per implicit solve
    pub max_iterations: usize,
    /// Humidity-ratio residual accepted by the wet-bulb search [kg/kg]
    pub humidity_ratio_tolerance: f64,
    /// Bracket half-width at which a temperature search stops [°C]
    pub temperature_tolerance: f64,
    /// Largest invariant violation treated as round-off and snapped onto the bound
    pub invariant_tolerance: f64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            humidity_ratio_tolerance: 1e-9,
            temperature_tolerance: 1e-9,
            invariant_tolerance: 1e-6,
        }
    }
}

impl ResolverConfig {
    pub fn validate(&self) -> PsyResult<()> {
        if self.max_iterations == 0 {
            return Err(PsyError::Domain {
                what: "max_iterations",
                value: 0.0,
                min: 1.0,
                max: f64::INFINITY,
            });
        }
        for (what, value) in [
            ("humidity_ratio_tolerance", self.humidity_ratio_tolerance),
            ("temperature_tolerance", self.temperature_tolerance),
            ("invariant_tolerance", self.invariant_tolerance),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(PsyError::Domain {
                    what,
                    value,
                    min: 0.0,
                    max: f64::INFINITY,
                });
            }
        }
        Ok(())
    }

    fn wet_bulb_bracket(&self) -> BracketConfig {
        BracketConfig {
            max_iterations: self.max_iterations,
            abs_tol: self.humidity_ratio_tolerance,
            x_tol: self.temperature_tolerance,
        }
    }

    fn saturation_bracket(&self) -> BracketConfig {
        BracketConfig {
            max_iterations: self.max_iterations,
            abs_tol: 0.0,
            x_tol: self.temperature_tolerance,
        }
    }
}

/// Properties on the saturation line at the dry-bulb temperature.
#[derive(Debug, Clone, Copy)]
struct SaturationLine {
    p_kpa: f64,
    t_db_c: f64,
    p_ws_kpa: f64,
    w_s: f64,
}

impl SaturationLine {
    fn state(&self) -> MoistAirState {
        MoistAirState {
            pressure_kpa: self.p_kpa,
            dry_bulb_c: self.t_db_c,
            wet_bulb_c: self.t_db_c,
            dew_point_c: self.t_db_c,
            relative_humidity: 1.0,
            humidity_ratio: self.w_s,
            degree_of_saturation: 1.0,
            vapor_pressure_kpa: self.p_ws_kpa,
            saturation_vapor_pressure_kpa: self.p_ws_kpa,
            specific_volume_m3_per_kg: specific_volume(self.t_db_c, self.w_s, self.p_kpa),
            specific_enthalpy_kj_per_kg: specific_enthalpy(self.t_db_c, self.w_s),
        }
    }
}

/// Quantities a case already fixed before the shared tail of the chain.
#[derive(Debug, Default, Clone, Copy)]
struct Known {
    wet_bulb_c: Option<f64>,
    dew_point_c: Option<f64>,
    relative_humidity: Option<f64>,
    vapor_pressure_kpa: Option<f64>,
}

/// Stateless resolver; holds only its configuration and may be shared
/// freely across threads.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    config: ResolverConfig,
}

impl Resolver {
    pub fn new(config: ResolverConfig) -> PsyResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve from pressure [kPa], dry-bulb [°C] and an optional secondary
    /// measurement; `None` yields the saturated state.
    pub fn resolve(
        &self,
        p_kpa: f64,
        t_db_c: f64,
        secondary: Option<Secondary>,
    ) -> PsyResult<MoistAirState> {
        match secondary {
            None => self.resolve_saturated(p_kpa, t_db_c),
            Some(Secondary::WetBulb(t_wb_c)) => self.resolve_from_wet_bulb(p_kpa, t_db_c, t_wb_c),
            Some(Secondary::DewPoint(t_dp_c)) => {
                self.resolve_from_dew_point(p_kpa, t_db_c, t_dp_c)
            }
            Some(Secondary::RelativeHumidity(rh)) => {
                self.resolve_from_relative_humidity(p_kpa, t_db_c, rh)
            }
        }
    }

    /// [`Resolver::resolve`] with `uom` pressure and temperature.
    pub fn resolve_quantities(
        &self,
        p: Pressure,
        t_db: Temperature,
        secondary: Option<Secondary>,
    ) -> PsyResult<MoistAirState> {
        self.resolve(to_kpa(p), to_degc(t_db), secondary)
    }

    /// Resolve at the standard-atmosphere pressure for `altitude_m`.
    pub fn resolve_at_altitude(
        &self,
        altitude_m: f64,
        t_db_c: f64,
        secondary: Option<Secondary>,
    ) -> PsyResult<MoistAirState> {
        let p_kpa = standard_atmosphere_pressure(altitude_m).at(ResolveStep::Inputs)?;
        self.resolve(p_kpa, t_db_c, secondary)
    }

    /// Saturated air: wet-bulb = dew point = dry-bulb, φ = µ = 1.
    pub fn resolve_saturated(&self, p_kpa: f64, t_db_c: f64) -> PsyResult<MoistAirState> {
        debug!(p_kpa, t_db_c, "resolving saturated state");
        Ok(self.saturation_line(p_kpa, t_db_c)?.state())
    }

    pub fn resolve_from_wet_bulb(
        &self,
        p_kpa: f64,
        t_db_c: f64,
        t_wb_c: f64,
    ) -> PsyResult<MoistAirState> {
        debug!(p_kpa, t_db_c, t_wb_c, "resolving from wet-bulb");
        let sat = self.saturation_line(p_kpa, t_db_c)?;
        let t_wb_c = check_finite(t_wb_c, "wet-bulb temperature")?;
        if t_wb_c > t_db_c {
            return Err(PsyError::PhysicalImpossibility {
                what: "wet-bulb temperature [°C] vs dry-bulb",
                value: t_wb_c,
                limit: t_db_c,
            }
            .at(ResolveStep::Inputs));
        }
        if t_wb_c == t_db_c {
            return Ok(sat.state());
        }

        let p_ws_wb = saturation_vapor_pressure(t_wb_c).at(ResolveStep::WetBulbSaturation)?;
        let w_s_wb = humidity_ratio_from_partial_pressure(p_kpa, p_ws_wb)
            .at(ResolveStep::WetBulbSaturation)?;
        let w = humidity_ratio_from_wet_bulb(t_db_c, t_wb_c, w_s_wb)
            .at(ResolveStep::HumidityRatio)?;

        self.finish(
            &sat,
            w,
            Known {
                wet_bulb_c: Some(t_wb_c),
                ..Known::default()
            },
        )
    }

    pub fn resolve_from_dew_point(
        &self,
        p_kpa: f64,
        t_db_c: f64,
        t_dp_c: f64,
    ) -> PsyResult<MoistAirState> {
        debug!(p_kpa, t_db_c, t_dp_c, "resolving from dew point");
        let sat = self.saturation_line(p_kpa, t_db_c)?;
        let t_dp_c = check_finite(t_dp_c, "dew-point temperature")?;
        if t_dp_c > t_db_c {
            return Err(PsyError::PhysicalImpossibility {
                what: "dew-point temperature [°C] vs dry-bulb",
                value: t_dp_c,
                limit: t_db_c,
            }
            .at(ResolveStep::Inputs));
        }
        if t_dp_c == t_db_c {
            return Ok(sat.state());
        }

        let p_w = saturation_vapor_pressure(t_dp_c).at(ResolveStep::VaporPressure)?;
        let w = humidity_ratio_from_partial_pressure(p_kpa, p_w).at(ResolveStep::HumidityRatio)?;

        self.finish(
            &sat,
            w,
            Known {
                dew_point_c: Some(t_dp_c),
                vapor_pressure_kpa: Some(p_w),
                ..Known::default()
            },
        )
    }

    /// `rh` is a 0-1 fraction.
    pub fn resolve_from_relative_humidity(
        &self,
        p_kpa: f64,
        t_db_c: f64,
        rh: f64,
    ) -> PsyResult<MoistAirState> {
        debug!(p_kpa, t_db_c, rh, "resolving from relative humidity");
        let sat = self.saturation_line(p_kpa, t_db_c)?;
        let rh = check_finite(rh, "relative humidity")?;
        if !(0.0..=1.0).contains(&rh) {
            return Err(PsyError::Domain {
                what: "relative humidity",
                value: rh,
                min: 0.0,
                max: 1.0,
            }
            .at(ResolveStep::Inputs));
        }
        if rh == 1.0 {
            return Ok(sat.state());
        }

        let p_w = rh * sat.p_ws_kpa;
        let w = humidity_ratio_from_partial_pressure(p_kpa, p_w).at(ResolveStep::HumidityRatio)?;

        self.finish(
            &sat,
            w,
            Known {
                relative_humidity: Some(rh),
                vapor_pressure_kpa: Some(p_w),
                ..Known::default()
            },
        )
    }

    fn saturation_line(&self, p_kpa: f64, t_db_c: f64) -> PsyResult<SaturationLine> {
        let p_kpa = check_finite(p_kpa, "total pressure")?;
        if p_kpa <= 0.0 {
            return Err(PsyError::Domain {
                what: "total pressure [kPa]",
                value: p_kpa,
                min: 0.0,
                max: f64::INFINITY,
            }
            .at(ResolveStep::Inputs));
        }
        let t_db_c = check_finite(t_db_c, "dry-bulb temperature")?;

        let p_ws_kpa = saturation_vapor_pressure(t_db_c).at(ResolveStep::SaturationLine)?;
        let w_s =
            humidity_ratio_from_partial_pressure(p_kpa, p_ws_kpa).at(ResolveStep::SaturationLine)?;
        Ok(SaturationLine {
            p_kpa,
            t_db_c,
            p_ws_kpa,
            w_s,
        })
    }

    /// Shared tail: µ, φ, p_w, dew point, v, h and wet-bulb from `w`.
    fn finish(&self, sat: &SaturationLine, w: f64, known: Known) -> PsyResult<MoistAirState> {
        let tol = self.config.invariant_tolerance;

        let mu = match degree_of_saturation(w, sat.w_s) {
            Ok(mu) => mu,
            Err(e) => snap_into(w / sat.w_s, 0.0, 1.0, tol)
                .ok_or(e)
                .at(ResolveStep::DegreeOfSaturation)?,
        };
        let rh = match known.relative_humidity {
            Some(rh) => rh,
            None => relative_humidity_from_degree_of_saturation(mu, sat.p_kpa, sat.p_ws_kpa)
                .at(ResolveStep::RelativeHumidity)?,
        };
        let p_w = known
            .vapor_pressure_kpa
            .unwrap_or_else(|| partial_vapor_pressure_from_humidity_ratio(sat.p_kpa, w));
        let t_dp_c = match known.dew_point_c {
            Some(t_dp_c) => t_dp_c,
            None => self.dew_point(p_w)?,
        };
        let t_wb_c = match known.wet_bulb_c {
            Some(t_wb_c) => t_wb_c,
            None => self.wet_bulb(sat, w, t_dp_c)?,
        };

        let state = MoistAirState {
            pressure_kpa: sat.p_kpa,
            dry_bulb_c: sat.t_db_c,
            wet_bulb_c: t_wb_c,
            dew_point_c: t_dp_c,
            relative_humidity: rh,
            humidity_ratio: w,
            degree_of_saturation: mu,
            vapor_pressure_kpa: p_w,
            saturation_vapor_pressure_kpa: sat.p_ws_kpa,
            specific_volume_m3_per_kg: specific_volume(sat.t_db_c, w, sat.p_kpa),
            specific_enthalpy_kj_per_kg: specific_enthalpy(sat.t_db_c, w),
        };
        let state = self.enforce_invariants(state).at(ResolveStep::Invariants)?;
        debug!(state = %state.summary(), "resolved");
        Ok(state)
    }

    /// Dew point as the exact inverse of the saturation-pressure correlation,
    /// seeded by the eqs. (37)/(38) fit.
    fn dew_point(&self, p_w_kpa: f64) -> PsyResult<f64> {
        let estimate = dew_point_from_vapor_pressure(p_w_kpa).at(ResolveStep::DewPoint)?;
        let t_dp_c =
            saturation_temperature_with(p_w_kpa, Some(estimate), &self.config.saturation_bracket())
                .at(ResolveStep::DewPoint)?;
        debug!(p_w_kpa, estimate, t_dp_c, "dew point");
        Ok(t_dp_c)
    }

    /// Wet-bulb `t*` in `[t_dp, t_db]` whose eq. (35) humidity ratio is `w`.
    ///
    /// Near 0 °C the vapor pressure can fall between the ice and water
    /// branches of eqs. (5)/(6). The dew point then sits on the branch switch
    /// with a positive residual, so the lower end is pushed down until the
    /// bracket straddles the root; the search converges onto the switch.
    fn wet_bulb(&self, sat: &SaturationLine, w: f64, t_dp_c: f64) -> PsyResult<f64> {
        let (p_kpa, t_db_c) = (sat.p_kpa, sat.t_db_c);
        let residual = |t_wb_c: f64| -> PsyResult<f64> {
            let p_ws_wb = saturation_vapor_pressure(t_wb_c)?;
            let w_s_wb = humidity_ratio_from_partial_pressure(p_kpa, p_ws_wb)?;
            Ok(humidity_ratio_from_wet_bulb(t_db_c, t_wb_c, w_s_wb)? - w)
        };

        let mut lo = t_dp_c.min(t_db_c);
        let mut step = 1e-3;
        while lo > T_SAT_MIN_C && residual(lo).at(ResolveStep::WetBulbSearch)? > 0.0 {
            lo = (lo - step).max(T_SAT_MIN_C);
            step *= 2.0;
        }
        if lo < t_dp_c.min(t_db_c) {
            debug!(t_dp_c, lo, "widened wet-bulb bracket below the dew point");
        }

        let root = bisect(
            "wet-bulb temperature",
            lo,
            t_db_c,
            &residual,
            &self.config.wet_bulb_bracket(),
        )
        .at(ResolveStep::WetBulbSearch)?;
        debug!(
            t_wb_c = root.x,
            iterations = root.iterations,
            residual = root.residual,
            "wet-bulb"
        );
        Ok(root.x)
    }

    /// Check every state invariant, snapping sub-tolerance violations.
    fn enforce_invariants(&self, mut s: MoistAirState) -> PsyResult<MoistAirState> {
        let tol = self.config.invariant_tolerance;

        s.relative_humidity = bounded("relative humidity", s.relative_humidity, 0.0, 1.0, tol)?;
        s.degree_of_saturation =
            bounded("degree of saturation", s.degree_of_saturation, 0.0, 1.0, tol)?;
        s.humidity_ratio =
            bounded("humidity ratio [kg/kg]", s.humidity_ratio, 0.0, f64::INFINITY, tol)?;
        s.vapor_pressure_kpa = bounded(
            "vapor pressure [kPa] vs saturation pressure",
            s.vapor_pressure_kpa,
            0.0,
            s.saturation_vapor_pressure_kpa,
            tol * s.saturation_vapor_pressure_kpa,
        )?;
        if s.vapor_pressure_kpa >= s.pressure_kpa {
            return Err(PsyError::PhysicalImpossibility {
                what: "vapor pressure [kPa] vs total pressure",
                value: s.vapor_pressure_kpa,
                limit: s.pressure_kpa,
            });
        }
        s.wet_bulb_c = bounded(
            "wet-bulb temperature [°C] vs dry-bulb",
            s.wet_bulb_c,
            f64::NEG_INFINITY,
            s.dry_bulb_c,
            tol,
        )?;
        s.dew_point_c = bounded(
            "dew-point temperature [°C] vs wet-bulb",
            s.dew_point_c,
            f64::NEG_INFINITY,
            s.wet_bulb_c,
            tol,
        )?;
        Ok(s)
    }
}

/// Saturated state from pressure [kPa] and dry-bulb [°C], default config.
pub fn resolve_saturated(p_kpa: f64, t_db_c: f64) -> PsyResult<MoistAirState> {
    Resolver::default().resolve_saturated(p_kpa, t_db_c)
}

/// Resolve from wet-bulb with the default config.
pub fn resolve_from_wet_bulb(p_kpa: f64, t_db_c: f64, t_wb_c: f64) -> PsyResult<MoistAirState> {
    Resolver::default().resolve_from_wet_bulb(p_kpa, t_db_c, t_wb_c)
}

/// Resolve from dew point with the default config.
pub fn resolve_from_dew_point(p_kpa: f64, t_db_c: f64, t_dp_c: f64) -> PsyResult<MoistAirState> {
    Resolver::default().resolve_from_dew_point(p_kpa, t_db_c, t_dp_c)
}

/// Resolve from relative humidity (0-1) with the default config.
pub fn resolve_from_relative_humidity(
    p_kpa: f64,
    t_db_c: f64,
    rh: f64,
) -> PsyResult<MoistAirState> {
    Resolver::default().resolve_from_relative_humidity(p_kpa, t_db_c, rh)
}

fn check_finite(value: f64, what: &'static str) -> PsyResult<f64> {
    psy_core::ensure_finite(value, what).at(ResolveStep::Inputs)
}

fn bounded(what: &'static str, value: f64, lo: f64, hi: f64, slack: f64) -> PsyResult<f64> {
    match snap_into(value, lo, hi, slack) {
        Some(v) => {
            if v != value {
                debug!(what, value, snapped = v, "snapped round-off onto bound");
            }
            Ok(v)
        }
        None if value > hi => Err(PsyError::PhysicalImpossibility {
            what,
            value,
            limit: hi,
        }),
        None => Err(PsyError::Domain {
            what,
            value,
            min: lo,
            max: hi,
        }),
    }
}
