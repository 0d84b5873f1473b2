// psy-core/src/units.rs

use uom::si::f64::{
    AvailableEnergy as UomAvailableEnergy, Pressure as UomPressure,
    SpecificVolume as UomSpecificVolume, ThermodynamicTemperature as UomThermodynamicTemperature,
};

// Public canonical unit types (SI, f64)
pub type Pressure = UomPressure;
/// Specific enthalpy per kg dry air (`uom` models it as available energy).
pub type SpecEnthalpy = UomAvailableEnergy;
pub type SpecVolume = UomSpecificVolume;
pub type Temperature = UomThermodynamicTemperature;

/// Offset between the Celsius and Kelvin scales.
pub const CELSIUS_SHIFT_K: f64 = 273.15;

#[inline]
pub fn celsius_to_kelvin(t_c: f64) -> f64 {
    t_c + CELSIUS_SHIFT_K
}

#[inline]
pub fn kelvin_to_celsius(t_k: f64) -> f64 {
    t_k - CELSIUS_SHIFT_K
}

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn kpa(v: f64) -> Pressure {
    use uom::si::pressure::kilopascal;
    Pressure::new::<kilopascal>(v)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn degc(v: f64) -> Temperature {
    k(celsius_to_kelvin(v))
}

#[inline]
pub fn m3_per_kg(v: f64) -> SpecVolume {
    use uom::si::specific_volume::cubic_meter_per_kilogram;
    SpecVolume::new::<cubic_meter_per_kilogram>(v)
}

#[inline]
pub fn kj_per_kg(v: f64) -> SpecEnthalpy {
    use uom::si::available_energy::kilojoule_per_kilogram;
    SpecEnthalpy::new::<kilojoule_per_kilogram>(v)
}

/// Pressure as a plain kPa value, the unit every correlation works in.
#[inline]
pub fn to_kpa(p: Pressure) -> f64 {
    use uom::si::pressure::kilopascal;
    p.get::<kilopascal>()
}

/// Temperature as a plain °C value.
#[inline]
pub fn to_degc(t: Temperature) -> f64 {
    use uom::si::thermodynamic_temperature::kelvin;
    kelvin_to_celsius(t.get::<kelvin>())
}

pub mod constants {
    /// Standard sea-level pressure [kPa].
    pub const P_STD_KPA: f64 = 101.325;
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn constructors_smoke() {
        let _p = pa(101_325.0);
        let _t = k(300.0);
        let _v = m3_per_kg(0.85);
        let _h = kj_per_kg(50.0);
    }

    #[test]
    fn celsius_kelvin_shift() {
        assert_eq!(celsius_to_kelvin(0.0), 273.15);
        assert_eq!(kelvin_to_celsius(273.15), 0.0);
        let t = 21.7;
        assert!((kelvin_to_celsius(celsius_to_kelvin(t)) - t).abs() < 1e-12);
    }

    #[test]
    fn kpa_round_trips_through_uom() {
        assert!((to_kpa(pa(101_325.0)) - 101.325).abs() < 1e-9);
        assert!((to_kpa(kpa(84.5)) - 84.5).abs() < 1e-12);
        assert!((to_degc(degc(-12.5)) + 12.5).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn degc_round_trips(t_c in -100.0_f64..200.0) {
            prop_assert!((to_degc(degc(t_c)) - t_c).abs() < 1e-9);
        }
    }
}
