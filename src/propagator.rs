//! # Propagator seam
//!
//! The search never integrates an orbit itself: it hands a candidate TLE to a
//! [`Propagator`] and reads back an inertial position. The trait mirrors the three
//! collaborator calls the finder needs:
//!
//! 1. [`Propagator::init`] – build an orbit record from the two TLE lines,
//! 2. [`Propagator::time_variables`] – minutes since the record epoch and GMST at the
//!    reference time,
//! 3. [`Propagator::propagate`] – inertial position (km) at a number of minutes since epoch.
//!
//! Propagation failures are **not** errors at this level: a decayed or degenerate orbit
//! yields a position with non-finite components, which the classifier turns into
//! [`PropagationOutcome::Error`](crate::search::classifier::PropagationOutcome::Error).
//!
//! [`Sgp4Propagator`] is the default implementation, built on the `sgp4` crate.
use hifitime::Epoch;
use nalgebra::Vector3;
use sgp4::{Constants, Elements, MinutesSinceEpoch};

use crate::constants::{Minutes, Radian};
use crate::orbit_finder_errors::OrbitFinderError;
use crate::time::{gmst, minutes_since_epoch, tle_epoch};

/// Time arguments of one propagation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeVariables {
    /// Minutes elapsed from the record epoch to the reference time.
    pub minutes_since_epoch: Minutes,
    /// Greenwich mean sidereal time at the reference time.
    pub gmst: Radian,
}

/// Orbit propagator used by the classifier.
pub trait Propagator {
    /// Propagator-specific orbit record built from a TLE.
    type Record;

    /// Build an orbit record from a TLE pair.
    ///
    /// Return
    /// ----------
    /// * The record, or [`OrbitFinderError::PropagatorInit`] if the propagator refuses the
    ///   element set. The classifier treats a refusal like a numerical breakdown.
    fn init(&self, line1: &str, line2: &str) -> Result<Self::Record, OrbitFinderError>;

    /// Minutes since the record epoch and GMST at `at`.
    fn time_variables(&self, record: &Self::Record, at: &Epoch) -> TimeVariables;

    /// Inertial position in kilometers; non-finite components signal a failed propagation.
    fn propagate(&self, record: &Self::Record, minutes: Minutes) -> Vector3<f64>;
}

/// SGP4/SDP4 record: propagation constants and the element-set epoch.
pub struct Sgp4Record {
    constants: Constants,
    epoch: Epoch,
}

impl Sgp4Record {
    pub fn epoch(&self) -> &Epoch {
        &self.epoch
    }
}

/// Default propagator backed by the `sgp4` crate (TEME output).
#[derive(Debug, Clone, Copy, Default)]
pub struct Sgp4Propagator;

impl Propagator for Sgp4Propagator {
    type Record = Sgp4Record;

    fn init(&self, line1: &str, line2: &str) -> Result<Sgp4Record, OrbitFinderError> {
        let elements = Elements::from_tle(None, line1.as_bytes(), line2.as_bytes())
            .map_err(|e| OrbitFinderError::PropagatorInit(format!("{e:?}")))?;
        let constants = Constants::from_elements(&elements)
            .map_err(|e| OrbitFinderError::PropagatorInit(format!("{e:?}")))?;

        let (year, day) = line1
            .get(18..20)
            .zip(line1.get(20..32))
            .ok_or_else(|| OrbitFinderError::InvalidTleEpoch(line1.to_string()))?;

        Ok(Sgp4Record {
            constants,
            epoch: tle_epoch(year, day)?,
        })
    }

    fn time_variables(&self, record: &Sgp4Record, at: &Epoch) -> TimeVariables {
        TimeVariables {
            minutes_since_epoch: minutes_since_epoch(&record.epoch, at),
            gmst: gmst(at.to_mjd_utc_days()),
        }
    }

    fn propagate(&self, record: &Sgp4Record, minutes: Minutes) -> Vector3<f64> {
        match record.constants.propagate(MinutesSinceEpoch(minutes)) {
            Ok(prediction) => Vector3::from(prediction.position),
            Err(_) => Vector3::repeat(f64::NAN),
        }
    }
}


#[cfg(test)]
mod propagator_test {
    use super::*;

    const ISS_LINE1: &str =
        "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927";
    const ISS_LINE2: &str =
        "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537";

    #[test]
    fn test_sgp4_position_is_leo() {
        let propagator = Sgp4Propagator;
        let record = propagator.init(ISS_LINE1, ISS_LINE2).unwrap();
        let at = Epoch::from_gregorian_utc_hms(2008, 9, 20, 18, 0, 0);
        let tv = propagator.time_variables(&record, &at);
        assert!(tv.minutes_since_epoch > 0.0 && tv.minutes_since_epoch < 360.0);

        let position = propagator.propagate(&record, tv.minutes_since_epoch);
        let radius = position.norm();
        assert!(radius > 6_600.0 && radius < 6_800.0, "radius = {radius}");
    }

    #[test]
    fn test_sgp4_at_epoch() {
        let propagator = Sgp4Propagator;
        let record = propagator.init(ISS_LINE1, ISS_LINE2).unwrap();
        let tv = propagator.time_variables(&record, record.epoch());
        assert!(tv.minutes_since_epoch.abs() < 1e-6);
    }

    #[test]
    fn test_sgp4_rejects_garbage() {
        let propagator = Sgp4Propagator;
        let result = propagator.init("1 garbage", ISS_LINE2);
        assert!(matches!(result, Err(OrbitFinderError::PropagatorInit(_))));
    }
}
