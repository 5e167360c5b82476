//! # Constants and type definitions for orbit-finder
//!
//! This module centralizes the **physical constants**, **conversion factors**, and **common type
//! aliases** used throughout the crate.
//!
//! ## Overview
//!
//! - Geodetic constants of the WGS-84 ellipsoid (used by the inertial → geodetic transform)
//! - The J2000 reference epoch used by the sidereal time polynomial
//! - Fixed-point scales used by the angular sweeps
//! - Core type aliases used across the crate

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// MJD epoch of J2000.0 (2000-01-01 12:00:00)
pub const T2000: f64 = 51544.5;

/// Earth equatorial radius in kilometers (WGS84)
pub const EARTH_MAJOR_AXIS: f64 = 6_378.137;

/// Earth polar radius in kilometers (WGS84)
pub const EARTH_MINOR_AXIS: f64 = 6_356.752_314_2;

// -------------------------------------------------------------------------------------------------
// Fixed-point scales
// -------------------------------------------------------------------------------------------------

/// Fixed-point units per degree stored by [`FixedAngle`](crate::tle::fixed_angle::FixedAngle).
///
/// TLE angles carry four decimals, so one unit is 1e-4 degree.
pub const ANGLE_UNITS_PER_DEGREE: i64 = 10_000;

/// Fixed-point units in one tenth of a degree (mean anomaly and argument of perigee sweeps).
pub const UNITS_PER_TENTH: i64 = ANGLE_UNITS_PER_DEGREE / 10;

/// Fixed-point units in one hundredth of a degree (RAAN sweep).
pub const UNITS_PER_HUNDREDTH: i64 = ANGLE_UNITS_PER_DEGREE / 100;

/// Eccentricity is stored as an integer fraction with this many units per 1.0.
pub const ECCENTRICITY_SCALE: f64 = 1.0e7;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Modified Julian Date (days)
pub type MJD = f64;
/// Elapsed time in minutes
pub type Minutes = f64;
