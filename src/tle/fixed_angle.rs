//! Fixed-point angles for exact sweep increments.
//!
//! TLE angular fields carry four decimals. Storing them as integer multiples of
//! 1e-4 degree keeps every 0.1° and 0.01° sweep step exact and makes the
//! 4-decimal rendering lossless.
use std::fmt;
use std::str::FromStr;

use crate::constants::{Degree, ANGLE_UNITS_PER_DEGREE, UNITS_PER_HUNDREDTH, UNITS_PER_TENTH};

/// An angle stored as an integer number of 1e-4 degree units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FixedAngle(i64);

impl FixedAngle {
    /// One full turn, 360°.
    pub const FULL_TURN: FixedAngle = FixedAngle(360 * ANGLE_UNITS_PER_DEGREE);

    pub const fn from_units(units: i64) -> Self {
        FixedAngle(units)
    }

    /// Angle from a count of tenths of a degree.
    pub const fn from_tenths(tenths: i64) -> Self {
        FixedAngle(tenths * UNITS_PER_TENTH)
    }

    /// Angle from a count of hundredths of a degree.
    pub const fn from_hundredths(hundredths: i64) -> Self {
        FixedAngle(hundredths * UNITS_PER_HUNDREDTH)
    }

    /// Angle from degrees, rounded to the nearest 1e-4 degree.
    pub fn from_degrees(degrees: Degree) -> Self {
        FixedAngle((degrees * ANGLE_UNITS_PER_DEGREE as f64).round() as i64)
    }

    pub const fn units(self) -> i64 {
        self.0
    }

    pub fn degrees(self) -> Degree {
        self.0 as f64 / ANGLE_UNITS_PER_DEGREE as f64
    }

    /// Shift by a whole number of tenths of a degree (may leave [0°, 360°)).
    pub const fn add_tenths(self, tenths: i64) -> Self {
        FixedAngle(self.0 + tenths * UNITS_PER_TENTH)
    }

    /// Shift by an arbitrary number of degrees, rounded to 1e-4 degree.
    ///
    /// The shift is reduced modulo 360° first, which keeps any finite shift inside
    /// the integer range.
    pub fn add_degrees(self, degrees: Degree) -> Self {
        let shift = FixedAngle::from_degrees(degrees.rem_euclid(360.0));
        FixedAngle(self.0 + shift.0)
    }

    /// Wrap into [0°, 360°) using the Euclidean remainder.
    pub const fn normalized(self) -> Self {
        FixedAngle(self.0.rem_euclid(Self::FULL_TURN.0))
    }
}

/// Renders `DDD.DDDD`: four decimals, zero-left-padded to eight characters.
impl fmt::Display for FixedAngle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let whole = abs / ANGLE_UNITS_PER_DEGREE as u64;
        let frac = abs % ANGLE_UNITS_PER_DEGREE as u64;
        let width = 3 - sign.len();
        write!(f, "{sign}{whole:0width$}.{frac:04}")
    }
}

impl FromStr for FixedAngle {
    type Err = std::num::ParseFloatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<f64>().map(FixedAngle::from_degrees)
    }
}

#[cfg(test)]
mod fixed_angle_test {
    use super::*;

    #[test]
    fn test_display_zero_padded() {
        assert_eq!(FixedAngle::from_degrees(51.6416).to_string(), "051.6416");
        assert_eq!(FixedAngle::from_degrees(0.0).to_string(), "000.0000");
        assert_eq!(FixedAngle::from_tenths(3599).to_string(), "359.9000");
        assert_eq!(FixedAngle::from_hundredths(1).to_string(), "000.0100");
        assert_eq!(FixedAngle::from_degrees(-5.5).to_string(), "-05.5000");
    }

    #[test]
    fn test_parse_is_exact() {
        let raan: FixedAngle = " 247.4627".parse().unwrap();
        assert_eq!(raan.units(), 2_474_627);
        let inc: FixedAngle = "51.6416".parse().unwrap();
        assert_eq!(inc.units(), 516_416);
        assert!("abc".parse::<FixedAngle>().is_err());
    }

    #[test]
    fn test_steps_are_exact() {
        let mut angle = FixedAngle::default();
        for _ in 0..3600 {
            angle = angle.add_tenths(1);
        }
        assert_eq!(angle, FixedAngle::FULL_TURN);
        assert_eq!(FixedAngle::from_hundredths(36_000), FixedAngle::FULL_TURN);
    }

    #[test]
    fn test_normalized() {
        assert_eq!(FixedAngle::FULL_TURN.normalized(), FixedAngle::default());
        assert_eq!(
            FixedAngle::from_degrees(-10.0).normalized(),
            FixedAngle::from_degrees(350.0)
        );
        assert_eq!(
            FixedAngle::from_hundredths(52_000 - 1).normalized(),
            FixedAngle::from_hundredths(15_999)
        );
        assert_eq!(
            FixedAngle::from_degrees(10.0).add_degrees(-725.0).normalized(),
            FixedAngle::from_degrees(5.0)
        );
    }

    #[test]
    fn test_add_huge_shift() {
        // 1e16 = 280 (mod 360)
        assert_eq!(
            FixedAngle::from_hundredths(100).add_degrees(1e16).normalized(),
            FixedAngle::from_degrees(281.0)
        );
        assert_eq!(
            FixedAngle::from_hundredths(100).add_degrees(-1e16).normalized(),
            FixedAngle::from_degrees(81.0)
        );
    }
}
