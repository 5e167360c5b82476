//! # TLE field codec
//!
//! Utilities to split a **two-line element set** into the fields the orbit search
//! works on, and to render an updated set back into standard fixed-column lines.
//!
//! ## Overview
//! -----------------
//! This module provides:
//! - A small error type [`ParseTleError`] describing field-level failures.
//! - [`OrbitalElementSet`], the working orbit: the angular fields the search
//!   mutates are held as [`FixedAngle`] values, everything else is carried through
//!   as the original column text.
//! - [`OrbitalElementSet::to_lines`], which re-assembles both lines and recomputes
//!   their modulo-10 checksums.
//!
//! ## Field Layout
//! -----------------
//! Line 1 (0-based byte columns):
//! * `2..7`   – catalog number
//! * `7`      – classification
//! * `9..17`  – international designator
//! * `18..20` – epoch year (two digits)
//! * `20..32` – epoch day of year with fraction
//! * `32..68` – trailer (mean motion derivatives, drag term, ephemeris type, element set number)
//! * `68`     – checksum
//!
//! Line 2:
//! * `8..16`  – inclination (deg)
//! * `17..25` – right ascension of the ascending node (deg)
//! * `26..33` – eccentricity (decimal point assumed)
//! * `34..42` – argument of perigee (deg)
//! * `43..51` – mean anomaly (deg)
//! * `52..63` – mean motion (rev/day)
//! * `63..68` – revolution number at epoch
//! * `68`     – checksum
//!
//! ## Conventions
//! -----------------
//! - Angular fields are rendered as `DDD.DDDD`, zero-left-padded to eight columns.
//! - Eccentricity is rendered as seven digits with the leading `0.` stripped.
//! - Input checksums are **not** verified; the output checksums are always recomputed.
//!
//! ## See also
//! ------------
//! * [`FixedAngle`] – Fixed-point angle used by the sweeps.
//! * [`tle_epoch`] – Converts the epoch columns to a [`hifitime::Epoch`].
pub mod fixed_angle;

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use hifitime::Epoch;
use thiserror::Error;

use crate::constants::ECCENTRICITY_SCALE;
use crate::orbit_finder_errors::OrbitFinderError;
use crate::time::tle_epoch;
use fixed_angle::FixedAngle;

/// Number of columns of a TLE line, checksum included.
pub const TLE_LINE_LEN: usize = 69;

/// Field-level parsing errors for two-line element sets.
///
/// Variants
/// -----------------
/// * `TooShortLine` – The line does not reach 69 columns once trailing whitespace is removed.
/// * `MissingLine` – A text block did not contain two element lines.
/// * `InvalidField` – A numeric field could not be parsed; payload carries the field name and slice.
#[derive(Error, Debug, PartialEq)]
pub enum ParseTleError {
    #[error("Line {line} is too short: {len} columns, expected {TLE_LINE_LEN}")]
    TooShortLine { line: u8, len: usize },
    #[error("Expected two element lines, found {0}")]
    MissingLine(usize),
    #[error("Invalid {field} value: {value:?}")]
    InvalidField { field: &'static str, value: String },
}

/// The working orbit derived from a TLE.
///
/// Only the three angles searched by the finder (RAAN, argument of perigee and mean
/// anomaly) are expected to change; the other fields are copied verbatim into the
/// rendered lines.
///
/// Units
/// -----
/// * `inclination`, `right_ascension`, `arg_perigee`, `mean_anomaly`: 1e-4 degree fixed point.
/// * `eccentricity`: 1e-7 fixed point (the seven TLE digits).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrbitalElementSet {
    pub catalog_number: String,
    pub classification: char,
    pub international_designator: String,
    pub epoch_year: String,
    pub epoch_day: String,
    pub line1_trailer: String,
    pub inclination: FixedAngle,
    pub right_ascension: FixedAngle,
    pub eccentricity: u32,
    pub arg_perigee: FixedAngle,
    pub mean_anomaly: FixedAngle,
    pub mean_motion: String,
    pub revolution_number: String,
}

fn checked_line(line: &str, line_no: u8) -> Result<&str, ParseTleError> {
    let line = line.trim_end();
    if line.len() < TLE_LINE_LEN {
        return Err(ParseTleError::TooShortLine {
            line: line_no,
            len: line.len(),
        });
    }
    Ok(line)
}

fn column<'a>(
    line: &'a str,
    range: Range<usize>,
    field: &'static str,
) -> Result<&'a str, ParseTleError> {
    line.get(range).ok_or_else(|| ParseTleError::InvalidField {
        field,
        value: line.to_string(),
    })
}

fn angle_column(
    line: &str,
    range: Range<usize>,
    field: &'static str,
) -> Result<FixedAngle, ParseTleError> {
    let raw = column(line, range, field)?;
    raw.parse().map_err(|_| ParseTleError::InvalidField {
        field,
        value: raw.to_string(),
    })
}

fn numeric_column<'a, T: FromStr>(
    line: &'a str,
    range: Range<usize>,
    field: &'static str,
) -> Result<&'a str, ParseTleError> {
    let raw = column(line, range, field)?;
    match raw.trim().parse::<T>() {
        Ok(_) => Ok(raw),
        Err(_) => Err(ParseTleError::InvalidField {
            field,
            value: raw.to_string(),
        }),
    }
}

/// Modulo-10 checksum over the first 68 columns of a TLE line.
///
/// Digits count for their value, a minus sign counts for one, everything else for zero.
pub fn checksum(line: &str) -> u8 {
    let sum: u32 = line
        .bytes()
        .take(TLE_LINE_LEN - 1)
        .map(|b| match b {
            b'0'..=b'9' => (b - b'0') as u32,
            b'-' => 1,
            _ => 0,
        })
        .sum();
    (sum % 10) as u8
}

impl OrbitalElementSet {
    /// Parse the two element lines.
    ///
    /// Arguments
    /// -----------------
    /// * `line1`, `line2` – The TLE lines; trailing whitespace (e.g. `\r`) is ignored.
    ///
    /// Return
    /// ----------
    /// * The parsed [`OrbitalElementSet`], or a [`ParseTleError`] if a line is shorter than
    ///   69 columns or a numeric field does not parse.
    pub fn parse(line1: &str, line2: &str) -> Result<Self, ParseTleError> {
        let line1 = checked_line(line1, 1)?;
        let line2 = checked_line(line2, 2)?;

        let classification = column(line1, 7..8, "classification")?
            .chars()
            .next()
            .unwrap_or('U');

        let eccentricity_raw = column(line2, 26..33, "eccentricity")?;
        let eccentricity =
            eccentricity_raw
                .trim()
                .parse::<u32>()
                .map_err(|_| ParseTleError::InvalidField {
                    field: "eccentricity",
                    value: eccentricity_raw.to_string(),
                })?;

        Ok(OrbitalElementSet {
            catalog_number: column(line1, 2..7, "catalog number")?.to_string(),
            classification,
            international_designator: column(line1, 9..17, "international designator")?
                .to_string(),
            epoch_year: numeric_column::<u32>(line1, 18..20, "epoch year")?.to_string(),
            epoch_day: numeric_column::<f64>(line1, 20..32, "epoch day")?.to_string(),
            line1_trailer: column(line1, 32..68, "line 1 trailer")?.to_string(),
            inclination: angle_column(line2, 8..16, "inclination")?,
            right_ascension: angle_column(line2, 17..25, "right ascension")?,
            eccentricity,
            arg_perigee: angle_column(line2, 34..42, "argument of perigee")?,
            mean_anomaly: angle_column(line2, 43..51, "mean anomaly")?,
            mean_motion: numeric_column::<f64>(line2, 52..63, "mean motion")?.to_string(),
            revolution_number: column(line2, 63..68, "revolution number")?.to_string(),
        })
    }

    /// Render both lines in standard fixed-column layout with fresh checksums.
    pub fn to_lines(&self) -> (String, String) {
        let mut line1 = format!(
            "1 {}{} {} {}{}{}",
            self.catalog_number,
            self.classification,
            self.international_designator,
            self.epoch_year,
            self.epoch_day,
            self.line1_trailer
        );
        line1.push(char::from(b'0' + checksum(&line1)));

        let mut line2 = format!(
            "2 {} {} {} {:07} {} {} {}{}",
            self.catalog_number,
            self.inclination,
            self.right_ascension.normalized(),
            self.eccentricity,
            self.arg_perigee.normalized(),
            self.mean_anomaly.normalized(),
            self.mean_motion,
            self.revolution_number
        );
        line2.push(char::from(b'0' + checksum(&line2)));

        (line1, line2)
    }

    pub fn eccentricity(&self) -> f64 {
        self.eccentricity as f64 / ECCENTRICITY_SCALE
    }

    /// Epoch of the element set, in UTC.
    pub fn epoch(&self) -> Result<Epoch, OrbitFinderError> {
        tle_epoch(&self.epoch_year, &self.epoch_day)
    }

    pub fn with_mean_anomaly(&self, mean_anomaly: FixedAngle) -> Self {
        OrbitalElementSet {
            mean_anomaly,
            ..self.clone()
        }
    }

    pub fn with_arg_perigee(&self, arg_perigee: FixedAngle) -> Self {
        OrbitalElementSet {
            arg_perigee,
            ..self.clone()
        }
    }

    pub fn with_right_ascension(&self, right_ascension: FixedAngle) -> Self {
        OrbitalElementSet {
            right_ascension,
            ..self.clone()
        }
    }
}

/// Parse a two- or three-line text block; a leading name line is skipped.
impl FromStr for OrbitalElementSet {
    type Err = ParseTleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s.lines().filter(|l| !l.trim().is_empty()).collect();
        match lines.as_slice() {
            [.., line1, line2] if lines.len() <= 3 => OrbitalElementSet::parse(line1, line2),
            _ => Err(ParseTleError::MissingLine(lines.len())),
        }
    }
}

impl fmt::Display for OrbitalElementSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (line1, line2) = self.to_lines();
        write!(f, "{line1}\n{line2}")
    }
}

#[cfg(test)]
mod tle_test {
    use super::*;

    const ISS_LINE1: &str =
        "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927";
    const ISS_LINE2: &str =
        "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537";

    #[test]
    fn test_parse_fields() {
        let set = OrbitalElementSet::parse(ISS_LINE1, ISS_LINE2).unwrap();
        assert_eq!(set.catalog_number, "25544");
        assert_eq!(set.classification, 'U');
        assert_eq!(set.international_designator, "98067A  ");
        assert_eq!(set.epoch_year, "08");
        assert_eq!(set.epoch_day, "264.51782528");
        assert_eq!(set.line1_trailer, " -.00002182  00000-0 -11606-4 0  292");
        assert_eq!(set.inclination, FixedAngle::from_units(516_416));
        assert_eq!(set.right_ascension, FixedAngle::from_units(2_474_627));
        assert_eq!(set.eccentricity, 6703);
        assert_eq!(set.arg_perigee, FixedAngle::from_units(1_305_360));
        assert_eq!(set.mean_anomaly, FixedAngle::from_units(3_250_288));
        assert_eq!(set.mean_motion, "15.72125391");
        assert_eq!(set.revolution_number, "56353");
        assert!((set.eccentricity() - 0.0006703).abs() < 1e-12);
    }

    #[test]
    fn test_checksum_matches_reference_lines() {
        assert_eq!(checksum(ISS_LINE1), 7);
        assert_eq!(checksum(ISS_LINE2), 7);
    }

    #[test]
    fn test_serialize_unchanged_set() {
        let set = OrbitalElementSet::parse(ISS_LINE1, ISS_LINE2).unwrap();
        let (line1, line2) = set.to_lines();
        assert_eq!(line1, ISS_LINE1);
        // inclination is zero-padded, which leaves the checksum untouched
        assert_eq!(
            line2,
            "2 25544 051.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537"
        );
        assert_eq!(line2.len(), TLE_LINE_LEN);
    }

    #[test]
    fn test_serialize_updated_angles() {
        let set = OrbitalElementSet::parse(ISS_LINE1, ISS_LINE2)
            .unwrap()
            .with_mean_anomaly(FixedAngle::from_tenths(5))
            .with_right_ascension(FixedAngle::from_hundredths(36_001))
            .with_arg_perigee(FixedAngle::from_tenths(-100));
        let (_, line2) = set.to_lines();
        assert_eq!(&line2[17..25], "000.0100");
        assert_eq!(&line2[34..42], "350.0000");
        assert_eq!(&line2[43..51], "000.5000");
        assert_eq!(line2.len(), TLE_LINE_LEN);
        assert_eq!(
            line2.as_bytes()[68] - b'0',
            checksum(&line2),
            "checksum digit must be recomputed"
        );
    }

    #[test]
    fn test_too_short_line() {
        let result = OrbitalElementSet::parse("1 25544U", ISS_LINE2);
        assert_eq!(
            result,
            Err(ParseTleError::TooShortLine { line: 1, len: 8 })
        );
    }

    #[test]
    fn test_invalid_angle() {
        let broken = ISS_LINE2.replace("247.4627", "24x.4627");
        let result = OrbitalElementSet::parse(ISS_LINE1, &broken);
        assert!(matches!(
            result,
            Err(ParseTleError::InvalidField {
                field: "right ascension",
                ..
            })
        ));
    }

    #[test]
    fn test_from_str_with_name_line() {
        let text = format!("ISS (ZARYA)\n{ISS_LINE1}\r\n{ISS_LINE2}\n");
        let set: OrbitalElementSet = text.parse().unwrap();
        assert_eq!(set.catalog_number, "25544");

        let missing: Result<OrbitalElementSet, _> = ISS_LINE1.parse();
        assert_eq!(missing, Err(ParseTleError::MissingLine(1)));
    }

    #[test]
    fn test_epoch() {
        let set = OrbitalElementSet::parse(ISS_LINE1, ISS_LINE2).unwrap();
        let epoch = set.epoch().unwrap();
        let expected = Epoch::from_gregorian_utc(2008, 9, 20, 12, 25, 40, 104_192_000);
        assert!((epoch - expected).abs().to_seconds() < 1e-3);
    }
}
