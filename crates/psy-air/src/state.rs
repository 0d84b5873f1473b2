//! Resolved moist-air state.

use crate::error::PsyResult;
use crate::resolver::Resolver;
use psy_core::units::{
    Pressure, SpecEnthalpy, SpecVolume, Temperature, degc, kj_per_kg, kpa, m3_per_kg,
};

/// The one humidity-related measurement that accompanies dry-bulb and
/// pressure.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Secondary {
    /// Thermodynamic wet-bulb temperature [°C].
    WetBulb(f64),
    /// Dew-point temperature [°C].
    DewPoint(f64),
    /// Relative humidity as a 0-1 fraction.
    RelativeHumidity(f64),
}

impl Secondary {
    pub fn label(self) -> &'static str {
        match self {
            Self::WetBulb(_) => "wet-bulb",
            Self::DewPoint(_) => "dew point",
            Self::RelativeHumidity(_) => "relative humidity",
        }
    }

    pub fn value(self) -> f64 {
        match self {
            Self::WetBulb(v) | Self::DewPoint(v) | Self::RelativeHumidity(v) => v,
        }
    }
}

/// Fully resolved, mutually consistent moist-air properties.
///
/// Only the resolver constructs these, and only once every invariant holds:
/// `0 ≤ φ, µ ≤ 1`, `p_w ≤ p_ws` and `p_w < p`, `t_dp ≤ t_wb ≤ t_db`, `W ≥ 0`.
/// Changing the secondary measurement yields a new state, see
/// [`MoistAirState::with_secondary`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MoistAirState {
    pub(crate) pressure_kpa: f64,
    pub(crate) dry_bulb_c: f64,
    pub(crate) wet_bulb_c: f64,
    pub(crate) dew_point_c: f64,
    pub(crate) relative_humidity: f64,
    pub(crate) humidity_ratio: f64,
    pub(crate) degree_of_saturation: f64,
    pub(crate) vapor_pressure_kpa: f64,
    pub(crate) saturation_vapor_pressure_kpa: f64,
    pub(crate) specific_volume_m3_per_kg: f64,
    pub(crate) specific_enthalpy_kj_per_kg: f64,
}

impl MoistAirState {
    /// Total (barometric) pressure [kPa].
    pub fn pressure_kpa(&self) -> f64 {
        self.pressure_kpa
    }

    /// Dry-bulb temperature [°C].
    pub fn dry_bulb_c(&self) -> f64 {
        self.dry_bulb_c
    }

    /// Thermodynamic wet-bulb temperature [°C].
    pub fn wet_bulb_c(&self) -> f64 {
        self.wet_bulb_c
    }

    /// Dew-point temperature [°C].
    pub fn dew_point_c(&self) -> f64 {
        self.dew_point_c
    }

    /// Relative humidity, 0-1.
    pub fn relative_humidity(&self) -> f64 {
        self.relative_humidity
    }

    /// Humidity ratio [kg water / kg dry air].
    pub fn humidity_ratio(&self) -> f64 {
        self.humidity_ratio
    }

    /// Degree of saturation µ, 0-1.
    pub fn degree_of_saturation(&self) -> f64 {
        self.degree_of_saturation
    }

    /// Water-vapor partial pressure [kPa].
    pub fn vapor_pressure_kpa(&self) -> f64 {
        self.vapor_pressure_kpa
    }

    /// Saturation vapor pressure at the dry-bulb temperature [kPa].
    pub fn saturation_vapor_pressure_kpa(&self) -> f64 {
        self.saturation_vapor_pressure_kpa
    }

    /// Specific volume [m³/kg dry air].
    pub fn specific_volume_m3_per_kg(&self) -> f64 {
        self.specific_volume_m3_per_kg
    }

    /// Specific enthalpy [kJ/kg dry air].
    pub fn specific_enthalpy_kj_per_kg(&self) -> f64 {
        self.specific_enthalpy_kj_per_kg
    }

    pub fn pressure(&self) -> Pressure {
        kpa(self.pressure_kpa)
    }

    pub fn dry_bulb(&self) -> Temperature {
        degc(self.dry_bulb_c)
    }

    pub fn wet_bulb(&self) -> Temperature {
        degc(self.wet_bulb_c)
    }

    pub fn dew_point(&self) -> Temperature {
        degc(self.dew_point_c)
    }

    pub fn specific_volume(&self) -> SpecVolume {
        m3_per_kg(self.specific_volume_m3_per_kg)
    }

    pub fn specific_enthalpy(&self) -> SpecEnthalpy {
        kj_per_kg(self.specific_enthalpy_kj_per_kg)
    }

    /// True on the saturation line (wet-bulb equals dry-bulb).
    pub fn is_saturated(&self) -> bool {
        self.wet_bulb_c == self.dry_bulb_c
    }

    /// Re-resolve from the same pressure and dry-bulb with a new secondary
    /// measurement. `self` is left untouched.
    pub fn with_secondary(
        &self,
        resolver: &Resolver,
        secondary: Secondary,
    ) -> PsyResult<MoistAirState> {
        resolver.resolve(self.pressure_kpa, self.dry_bulb_c, Some(secondary))
    }

    /// Return a one-line summary string (for logging and the CLI).
    pub fn summary(&self) -> String {
        format!(
            "State(P={:.3}kPa,Tdb={:.2}°C,Twb={:.2}°C,Tdp={:.2}°C,φ={:.3},W={:.5},h={:.2}kJ/kg,v={:.4}m³/kg)",
            self.pressure_kpa,
            self.dry_bulb_c,
            self.wet_bulb_c,
            self.dew_point_c,
            self.relative_humidity,
            self.humidity_ratio,
            self.specific_enthalpy_kj_per_kg,
            self.specific_volume_m3_per_kg
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use psy_core::units::{to_degc, to_kpa};

    #[test]
    fn secondary_labels_and_values() {
        assert_eq!(Secondary::WetBulb(18.0).label(), "wet-bulb");
        assert_eq!(Secondary::DewPoint(-3.0).value(), -3.0);
        assert_eq!(Secondary::RelativeHumidity(0.4).label(), "relative humidity");
    }

    #[test]
    fn uom_accessors_match_plain_values() {
        let state = Resolver::default().resolve_saturated(101.325, 20.0).unwrap();
        assert!((to_kpa(state.pressure()) - 101.325).abs() < 1e-9);
        assert!((to_degc(state.dry_bulb()) - 20.0).abs() < 1e-9);
        assert!((to_degc(state.dew_point()) - 20.0).abs() < 1e-9);
        assert!(state.is_saturated());
        assert!(state.summary().contains("Tdb=20.00"));
    }

    #[test]
    fn with_secondary_leaves_original_untouched() {
        let resolver = Resolver::default();
        let dry = resolver
            .resolve_from_relative_humidity(101.325, 25.0, 0.3)
            .unwrap();
        let humid = dry
            .with_secondary(&resolver, Secondary::RelativeHumidity(0.7))
            .unwrap();
        assert_eq!(dry.relative_humidity(), 0.3);
        assert_eq!(humid.relative_humidity(), 0.7);
        assert_eq!(humid.pressure_kpa(), dry.pressure_kpa());
        assert_eq!(humid.dry_bulb_c(), dry.dry_bulb_c());
        assert!(humid.humidity_ratio() > dry.humidity_ratio());
    }
}
