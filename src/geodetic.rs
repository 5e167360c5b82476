//! # Inertial → geodetic coordinate transform
//!
//! Converts a TEME/ECI position (km) into geodetic latitude, longitude and altitude
//! above the WGS-84 ellipsoid, given the Greenwich mean sidereal time of the sample.
//!
//! ## Conventions
//!
//! - Latitude: **degrees**, geodetic, in [-90, 90].
//! - Longitude: **degrees**, east positive, wrapped into [-180, 180].
//! - Altitude: **kilometers** above the ellipsoid.
//!
//! The geodetic latitude is obtained by fixed-point iteration on the ellipsoid normal,
//! starting from the geocentric latitude. The reference ellipsoid is defined by
//! [`EARTH_MAJOR_AXIS`] and [`EARTH_MINOR_AXIS`].
use std::f64::consts::PI;

use nalgebra::Vector3;

use crate::constants::{Degree, Kilometer, Radian, DPI, EARTH_MAJOR_AXIS, EARTH_MINOR_AXIS};

/// Maximum number of latitude refinements.
const MAX_LATITUDE_ITERATIONS: usize = 20;

/// Convergence threshold on the latitude update, in radians.
const LATITUDE_EPS: Radian = 1.0e-12;

/// A ground-referenced sample of the satellite position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geodetic {
    pub latitude: Degree,
    pub longitude: Degree,
    pub altitude: Kilometer,
}

/// Wrap an angle in degrees into [-180, 180].
pub fn wrap_longitude(longitude: Degree) -> Degree {
    let wrapped = (longitude + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 && longitude > 0.0 {
        180.0
    } else {
        wrapped
    }
}

/// Convert an inertial position into geodetic coordinates.
///
/// Arguments
/// ---------
/// * `position` - Inertial (TEME) position in **kilometers**.
/// * `gmst` - Greenwich mean sidereal time in **radians** at the sample epoch.
///
/// Returns
/// -------
/// A [`Geodetic`] sample. The result is non-finite when the input is.
///
/// Details
/// -------
/// With `a`, `b` the ellipsoid semi-axes and `e² = 2f − f²`:
///
/// ```text
/// λ = atan2(y, x) − θ_GMST
/// R = √(x² + y²)
/// φ₀ = atan2(z, R)
/// C = 1 / √(1 − e² sin²φ)
/// φ ← atan2(z + a C e² sin φ, R)      (iterated)
/// h = R / cos φ − a C
/// ```
pub fn eci_to_geodetic(position: &Vector3<f64>, gmst: Radian) -> Geodetic {
    let flattening = (EARTH_MAJOR_AXIS - EARTH_MINOR_AXIS) / EARTH_MAJOR_AXIS;
    let e2 = 2.0 * flattening - flattening * flattening;

    let mut longitude = position.y.atan2(position.x) - gmst;
    longitude = (longitude + PI).rem_euclid(DPI) - PI;

    let r = position.x.hypot(position.y);
    let mut latitude = position.z.atan2(r);
    let mut c = 1.0;

    for _ in 0..MAX_LATITUDE_ITERATIONS {
        let sin_lat = latitude.sin();
        c = 1.0 / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        let next = (position.z + EARTH_MAJOR_AXIS * c * e2 * sin_lat).atan2(r);
        let converged = (next - latitude).abs() < LATITUDE_EPS;
        latitude = next;
        if converged {
            break;
        }
    }

    // Near the poles R / cos φ is ill-conditioned: use the polar form instead
    let altitude = if latitude.cos().abs() > 1.0e-6 {
        r / latitude.cos() - EARTH_MAJOR_AXIS * c
    } else {
        position.z.abs() / latitude.sin().abs() - EARTH_MAJOR_AXIS * c * (1.0 - e2)
    };

    Geodetic {
        latitude: latitude.to_degrees(),
        longitude: longitude.to_degrees(),
        altitude,
    }
}

#[cfg(test)]
mod geodetic_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_equatorial_point() {
        let position = Vector3::new(EARTH_MAJOR_AXIS + 400.0, 0.0, 0.0);
        let geo = eci_to_geodetic(&position, 0.0);
        assert_relative_eq!(geo.latitude, 0.0, epsilon = 1e-12);
        assert_relative_eq!(geo.longitude, 0.0, epsilon = 1e-12);
        assert_relative_eq!(geo.altitude, 400.0, epsilon = 1e-9);
    }

    #[test]
    fn test_sidereal_rotation_shifts_longitude() {
        let position = Vector3::new(0.0, EARTH_MAJOR_AXIS + 400.0, 0.0);
        let geo = eci_to_geodetic(&position, 30f64.to_radians());
        assert_relative_eq!(geo.longitude, 60.0, epsilon = 1e-9);

        let geo = eci_to_geodetic(&position, 120f64.to_radians());
        assert_relative_eq!(geo.longitude, -30.0, epsilon = 1e-9);
    }

    #[test]
    fn test_polar_point() {
        let position = Vector3::new(0.0, 0.0, EARTH_MINOR_AXIS + 800.0);
        let geo = eci_to_geodetic(&position, 1.0);
        assert_relative_eq!(geo.latitude, 90.0, epsilon = 1e-9);
        assert_relative_eq!(geo.altitude, 800.0, epsilon = 1e-6);
    }

    #[test]
    fn test_geodetic_latitude_exceeds_geocentric() {
        let lat: f64 = 45f64.to_radians();
        let r = EARTH_MAJOR_AXIS + 500.0;
        let position = Vector3::new(r * lat.cos(), 0.0, r * lat.sin());
        let geo = eci_to_geodetic(&position, 0.0);
        assert!(geo.latitude > 45.0);
        assert!(geo.latitude < 45.2);
        assert!(geo.altitude > 500.0 && geo.altitude < 515.0);
    }

    #[test]
    fn test_non_finite_input() {
        let position = Vector3::new(f64::NAN, 0.0, 0.0);
        let geo = eci_to_geodetic(&position, 0.0);
        assert!(!geo.longitude.is_finite());
    }

    #[test]
    fn test_wrap_longitude() {
        assert_relative_eq!(wrap_longitude(190.0), -170.0);
        assert_relative_eq!(wrap_longitude(-190.0), 170.0);
        assert_relative_eq!(wrap_longitude(180.0), 180.0);
        assert_relative_eq!(wrap_longitude(-180.0), -180.0);
        assert_relative_eq!(wrap_longitude(45.0), 45.0);
    }
}
