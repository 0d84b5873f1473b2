//! Unit-tagged numeric input.
//!
//! Parses text such as `"77F"`, `"14.7 psia"` or `"50%"` into the canonical
//! units the psychrometric correlations work in: °C, kPa, 0-1 fractions and
//! metres. Bare numbers are taken to already be canonical.

use std::fmt;

/// Dimension/quantity family for a numeric input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    /// Temperature (canonical: °C)
    Temperature,
    /// Absolute pressure (canonical: kPa)
    Pressure,
    /// Fraction such as relative humidity (canonical: 0-1, accepts %)
    Fraction,
    /// Altitude / elevation (canonical: m)
    Altitude,
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Temperature => write!(f, "Temperature"),
            Self::Pressure => write!(f, "Absolute Pressure"),
            Self::Fraction => write!(f, "Fraction"),
            Self::Altitude => write!(f, "Altitude"),
        }
    }
}

/// Error in unit parsing or conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum UnitError {
    /// Input text did not parse to a number + optional unit
    ParseError(String),
    /// Unit not recognized for this quantity
    UnknownUnit { unit: String, quantity: String },
    /// Unit not allowed for this quantity (e.g., plain "psi" requires "psia")
    AmbiguousUnit { unit: String, reason: String },
    /// Value out of physical range (e.g., negative absolute temperature)
    OutOfRange { value: f64, reason: String },
}

impl fmt::Display for UnitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParseError(msg) => write!(f, "Parse error: {}", msg),
            Self::UnknownUnit { unit, quantity } => {
                write!(f, "Unknown unit '{}' for {}", unit, quantity)
            }
            Self::AmbiguousUnit { unit, reason } => {
                write!(f, "Ambiguous unit '{}': {}", unit, reason)
            }
            Self::OutOfRange { value, reason } => {
                write!(f, "Value {} out of range: {}", value, reason)
            }
        }
    }
}

impl std::error::Error for UnitError {}

/// Parse a quantity value from user input text into canonical units.
///
/// - `raw_text`: User input (e.g., "70F", "14.7 psia", "50%")
/// - `quantity`: Dimension/quantity family for validation
pub fn parse_quantity(raw_text: &str, quantity: Quantity) -> Result<f64, UnitError> {
    let trimmed = raw_text.trim();

    match quantity {
        Quantity::Temperature => parse_temperature(trimmed),
        Quantity::Pressure => parse_pressure(trimmed),
        Quantity::Fraction => parse_fraction(trimmed),
        Quantity::Altitude => parse_altitude(trimmed),
    }
}

/// Parse temperature in various units, return °C.
fn parse_temperature(input: &str) -> Result<f64, UnitError> {
    let (value, unit) = split_value_and_unit(input)?;

    let celsius = match unit.to_lowercase().as_str() {
        "c" | "°c" | "celsius" | "" => value,
        "k" | "kelvin" => value - crate::units::CELSIUS_SHIFT_K,
        "f" | "°f" | "fahrenheit" => (value - 32.0) * 5.0 / 9.0,
        "r" | "°r" | "rankine" => (value - 491.67) * 5.0 / 9.0,
        _ => {
            return Err(UnitError::UnknownUnit {
                unit: unit.to_string(),
                quantity: "Temperature".to_string(),
            });
        }
    };

    if celsius <= -crate::units::CELSIUS_SHIFT_K {
        return Err(UnitError::OutOfRange {
            value: celsius,
            reason: "Absolute temperature must be > 0 K".to_string(),
        });
    }

    Ok(celsius)
}

/// Parse absolute pressure in various units, return kPa.
fn parse_pressure(input: &str) -> Result<f64, UnitError> {
    let (value, unit) = split_value_and_unit(input)?;

    let kpa = match unit.to_lowercase().as_str() {
        "kpa" | "" => value,
        "pa" | "pascal" => value / 1e3,
        "hpa" | "mbar" | "millibar" => value / 10.0,
        "mpa" => value * 1e3,
        "bar" => value * 100.0,
        "atm" => value * 101.325,
        "inhg" => value * 3.386_39,
        "mmhg" | "torr" => value * 0.133_322,
        "psia" => value * 6.894_76,
        "psi" => {
            return Err(UnitError::AmbiguousUnit {
                unit: "psi".to_string(),
                reason: "Use 'psia' (absolute)".to_string(),
            });
        }
        _ => {
            return Err(UnitError::UnknownUnit {
                unit: unit.to_string(),
                quantity: "Pressure".to_string(),
            });
        }
    };

    if kpa <= 0.0 {
        return Err(UnitError::OutOfRange {
            value: kpa,
            reason: "Absolute pressure must be positive".to_string(),
        });
    }

    Ok(kpa)
}

/// Parse a 0-1 fraction, accepting percent notation.
fn parse_fraction(input: &str) -> Result<f64, UnitError> {
    let fraction = if let Some(num_str) = input.strip_suffix('%') {
        let percent: f64 = num_str.trim().parse().map_err(|_| {
            UnitError::ParseError(format!("Could not parse fraction from '{}'", input))
        })?;
        percent / 100.0
    } else {
        input.parse().map_err(|_| {
            UnitError::ParseError(format!("Could not parse fraction from '{}'", input))
        })?
    };

    Ok(fraction)
}

/// Parse altitude, return m.
fn parse_altitude(input: &str) -> Result<f64, UnitError> {
    let (value, unit) = split_value_and_unit(input)?;

    match unit.to_lowercase().as_str() {
        "m" | "meter" | "meters" | "" => Ok(value),
        "km" => Ok(value * 1e3),
        "ft" | "feet" => Ok(value * 0.3048),
        _ => Err(UnitError::UnknownUnit {
            unit: unit.to_string(),
            quantity: "Altitude".to_string(),
        }),
    }
}

/// Split a value+unit string into (numeric_value, unit_string).
///
/// Examples:
/// - "70F" -> (70.0, "F")
/// - "14.7 psia" -> (14.7, "psia")
/// - "300" -> (300.0, "")
/// - "1e5 Pa" -> (100000.0, "Pa")
fn split_value_and_unit(input: &str) -> Result<(f64, String), UnitError> {
    let trimmed = input.trim();
    let bytes = trimmed.as_bytes();

    let mut split_idx = 0;
    while split_idx < bytes.len() {
        let c = bytes[split_idx];
        if c.is_ascii_digit() || matches!(c, b'.' | b'-' | b'+') {
            split_idx += 1;
        } else if matches!(c, b'e' | b'E') && is_exponent(bytes, split_idx) {
            split_idx += 2;
        } else {
            break;
        }
    }

    let (num_part, unit_part) = trimmed.split_at(split_idx);
    let num_part = num_part.trim();
    let unit_part = unit_part.trim();

    let value: f64 = num_part.parse().map_err(|_| {
        UnitError::ParseError(format!("Could not parse numeric value from '{}'", input))
    })?;

    Ok((value, unit_part.to_string()))
}

/// `bytes[idx]` is an `e`/`E` between a mantissa digit and an exponent.
fn is_exponent(bytes: &[u8], idx: usize) -> bool {
    let after_digit = idx > 0 && bytes[idx - 1].is_ascii_digit();
    let exponent = match bytes.get(idx + 1).copied() {
        Some(b'+' | b'-') => bytes.get(idx + 2).is_some_and(u8::is_ascii_digit),
        Some(c) => c.is_ascii_digit(),
        None => false,
    };
    after_digit && exponent
}
