//! Time variables for propagating an element set to a reference time.
//!
//! * [`tle_epoch`] – TLE epoch columns (two-digit year, fractional day of year) → [`Epoch`].
//! * [`minutes_since_epoch`] – Elapsed minutes between two epochs, as SGP4 expects them.
//! * [`gmst`] – Greenwich mean sidereal time for the inertial → Earth-fixed rotation.
use hifitime::{Epoch, Unit};

use crate::constants::{Minutes, Radian, DPI, MJD, T2000};
use crate::orbit_finder_errors::OrbitFinderError;

/// Convert the epoch columns of a TLE into a UTC [`Epoch`].
///
/// Arguments
/// -----------------
/// * `year`: the two-digit year (columns 19–20 of line 1). Years below 57 map to 20xx,
///   the others to 19xx.
/// * `day`: the day of year with fraction (columns 21–32 of line 1); day `1.0` is
///   January 1st at 00:00 UTC.
///
/// Return
/// ----------
/// * The epoch in UTC, or [`OrbitFinderError::InvalidTleEpoch`] if a field does not parse
///   or the day is outside `[1, 367)`.
pub fn tle_epoch(year: &str, day: &str) -> Result<Epoch, OrbitFinderError> {
    let yy = year
        .trim()
        .parse::<i32>()
        .map_err(|_| OrbitFinderError::InvalidTleEpoch(format!("year {year:?}")))?;
    let day_of_year = day
        .trim()
        .parse::<f64>()
        .map_err(|_| OrbitFinderError::InvalidTleEpoch(format!("day {day:?}")))?;

    if !(1.0..367.0).contains(&day_of_year) {
        return Err(OrbitFinderError::InvalidTleEpoch(format!(
            "day of year {day_of_year} out of range"
        )));
    }

    let full_year = if yy < 57 { 2000 + yy } else { 1900 + yy };
    let new_year = Epoch::from_gregorian_utc_at_midnight(full_year, 1, 1);
    Ok(new_year + Unit::Day * (day_of_year - 1.0))
}

/// Minutes elapsed from `epoch` to `at` (negative when `at` is earlier).
pub fn minutes_since_epoch(epoch: &Epoch, at: &Epoch) -> Minutes {
    (*at - *epoch).to_unit(Unit::Minute)
}

/// Compute the Greenwich Mean Sidereal Time (GMST) in radians
/// for a given Modified Julian Date (UT1 time scale).
///
/// The IAU 1982 polynomial gives the mean sidereal time at 0h UT1; the fraction of
/// the day is then added, scaled by the ratio of sidereal to solar day.
///
/// # Arguments
/// * `tjm` - Modified Julian Date. UTC is an acceptable stand-in for UT1 here:
///   the sub-second difference moves the ground track by a few hundred meters at most.
///
/// # Returns
/// * GMST angle in radians, normalized to the interval [0, 2π).
pub fn gmst(tjm: MJD) -> Radian {
    // Polynomial coefficients for GMST at 0h UT1 (in seconds)
    const C0: f64 = 24110.54841;
    const C1: f64 = 8640184.812866;
    const C2: f64 = 9.3104e-2;
    const C3: f64 = -6.2e-6;

    // Ratio of sidereal day to solar day
    const RAP: f64 = 1.00273790934;

    let itjm = tjm.floor();
    let t = (itjm - T2000) / 36525.0;

    let mut gmst0 = ((C3 * t + C2) * t + C1) * t + C0;
    gmst0 *= DPI / 86400.0;

    let h = tjm.fract() * DPI;
    (gmst0 + h * RAP).rem_euclid(DPI)
}

#[cfg(test)]
mod time_test {
    use super::*;

    #[test]
    fn test_gmst() {
        let tut = 57028.478514610404;
        let res_gmst = gmst(tut);
        assert!((res_gmst - 4.851925725092499).abs() < 1e-12);

        let res_gmst = gmst(T2000);
        assert!((res_gmst - 4.894961212789145).abs() < 1e-12);
    }

    #[test]
    fn test_tle_epoch_century_pivot() {
        let epoch = tle_epoch("57", "1.0").unwrap();
        assert_eq!(epoch, Epoch::from_gregorian_utc_at_midnight(1957, 1, 1));

        let epoch = tle_epoch("24", "32.5").unwrap();
        assert_eq!(epoch, Epoch::from_gregorian_utc_at_noon(2024, 2, 1));
    }

    #[test]
    fn test_tle_epoch_invalid() {
        assert!(matches!(
            tle_epoch("xx", "1.0"),
            Err(OrbitFinderError::InvalidTleEpoch(_))
        ));
        assert!(matches!(
            tle_epoch("24", "0.5"),
            Err(OrbitFinderError::InvalidTleEpoch(_))
        ));
    }

    #[test]
    fn test_minutes_since_epoch() {
        let epoch = Epoch::from_gregorian_utc_at_midnight(2024, 3, 1);
        let later = Epoch::from_gregorian_utc_hms(2024, 3, 1, 1, 30, 0);
        assert!((minutes_since_epoch(&epoch, &later) - 90.0).abs() < 1e-9);
        assert!((minutes_since_epoch(&later, &epoch) + 90.0).abs() < 1e-9);
    }
}
