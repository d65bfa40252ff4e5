//! Unit conversion
//!
//! Physical lengths arrive either as bare numbers (already in the project's
//! base unit) or as strings carrying a unit suffix (`"10mm"`, `"0.1in"`,
//! `"50mil"`). Electrical values use SI prefixes (`"10k"`, `"100nF"`).
//! Every builder converts user-supplied quantities through the
//! [`UnitSystem`] held by the build context before embedding them in an
//! element.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::BuildError;
use crate::elements::Point;

/// Length units understood by [`Length`] strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    Mm,
    Cm,
    Um,
    In,
    Mil,
}

impl LengthUnit {
    /// Size of one unit in millimetres
    pub fn in_mm(self) -> f64 {
        match self {
            LengthUnit::Mm => 1.0,
            LengthUnit::Cm => 10.0,
            LengthUnit::Um => 0.001,
            LengthUnit::In => 25.4,
            LengthUnit::Mil => 0.0254,
        }
    }
}

impl FromStr for LengthUnit {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mm" => Ok(LengthUnit::Mm),
            "cm" => Ok(LengthUnit::Cm),
            "um" | "µm" => Ok(LengthUnit::Um),
            "in" | "inch" => Ok(LengthUnit::In),
            "mil" | "mils" | "thou" => Ok(LengthUnit::Mil),
            other => Err(BuildError::InvalidQuantity {
                value: s.to_string(),
                reason: format!("unknown length unit \"{}\"", other),
            }),
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LengthUnit::Mm => write!(f, "mm"),
            LengthUnit::Cm => write!(f, "cm"),
            LengthUnit::Um => write!(f, "um"),
            LengthUnit::In => write!(f, "in"),
            LengthUnit::Mil => write!(f, "mil"),
        }
    }
}

/// A user-supplied length, converted lazily at build time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Length {
    /// Already expressed in the base unit
    Value(f64),
    /// Number with a unit suffix, e.g. `"2.54mm"`
    Text(String),
}

impl From<f64> for Length {
    fn from(v: f64) -> Self {
        Length::Value(v)
    }
}

impl From<i32> for Length {
    fn from(v: i32) -> Self {
        Length::Value(f64::from(v))
    }
}

impl From<&str> for Length {
    fn from(s: &str) -> Self {
        Length::Text(s.to_string())
    }
}

impl From<String> for Length {
    fn from(s: String) -> Self {
        Length::Text(s)
    }
}

/// A point whose coordinates are [`Length`]s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LengthPoint {
    pub x: Length,
    pub y: Length,
}

impl LengthPoint {
    pub fn new(x: impl Into<Length>, y: impl Into<Length>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
        }
    }
}

impl From<(f64, f64)> for LengthPoint {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// The project's unit system: everything is converted into `base`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSystem {
    pub base: LengthUnit,
}

impl Default for UnitSystem {
    fn default() -> Self {
        Self {
            base: LengthUnit::Mm,
        }
    }
}

impl UnitSystem {
    pub fn new(base: LengthUnit) -> Self {
        Self { base }
    }

    /// Convert a length into the base unit. Bare numbers pass through.
    pub fn convert(&self, length: &Length) -> Result<f64, BuildError> {
        match length {
            Length::Value(v) => Ok(*v),
            Length::Text(s) => {
                let (value, suffix) = split_number(s)?;
                if suffix.is_empty() {
                    return Ok(value);
                }
                let unit: LengthUnit = suffix.parse()?;
                Ok(value * unit.in_mm() / self.base.in_mm())
            }
        }
    }

    pub fn convert_point(&self, point: &LengthPoint) -> Result<Point, BuildError> {
        Ok(Point::new(self.convert(&point.x)?, self.convert(&point.y)?))
    }
}

/// An electrical value such as a resistance or a voltage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Value(f64),
    Text(String),
}

impl Quantity {
    pub fn resolve(&self) -> Result<f64, BuildError> {
        match self {
            Quantity::Value(v) => Ok(*v),
            Quantity::Text(s) => parse_si_value(s),
        }
    }
}

impl From<f64> for Quantity {
    fn from(v: f64) -> Self {
        Quantity::Value(v)
    }
}

impl From<i32> for Quantity {
    fn from(v: i32) -> Self {
        Quantity::Value(f64::from(v))
    }
}

impl From<&str> for Quantity {
    fn from(s: &str) -> Self {
        Quantity::Text(s.to_string())
    }
}

impl From<String> for Quantity {
    fn from(s: String) -> Self {
        Quantity::Text(s)
    }
}

/// Parse an SI-prefixed value: `"10k"`, `"100nF"`, `"4.7uH"`, `"3.3V"`, `"1MΩ"`.
///
/// `M` is mega and `m` is milli. Anything after the prefix is treated as a
/// unit symbol and ignored.
pub fn parse_si_value(s: &str) -> Result<f64, BuildError> {
    let (value, suffix) = split_number(s)?;
    let multiplier = match suffix.chars().next() {
        Some('p') => 1e-12,
        Some('n') => 1e-9,
        Some('u') | Some('µ') | Some('μ') => 1e-6,
        Some('m') => 1e-3,
        Some('k') | Some('K') => 1e3,
        Some('M') => 1e6,
        Some('G') => 1e9,
        _ => 1.0,
    };
    Ok(value * multiplier)
}

fn split_number(s: &str) -> Result<(f64, &str), BuildError> {
    let trimmed = s.trim();
    let end = trimmed
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || ((c == '-' || c == '+') && i == 0)))
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());
    let (number, suffix) = trimmed.split_at(end);
    let value = number
        .parse::<f64>()
        .map_err(|_| BuildError::InvalidQuantity {
            value: s.to_string(),
            reason: "expected a number".to_string(),
        })?;
    Ok((value, suffix.trim()))
}
