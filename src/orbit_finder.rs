//! # OrbitFinder: rotate a TLE onto a ground-track point
//!
//! This module defines the [`OrbitFinder`] façade, which owns a [`Propagator`] and a set of
//! [`FinderParams`] and sequences the three angular searches:
//!
//! 1. **Mean anomaly** ([`search_mean_anomaly`]) – target latitude and direction of travel.
//! 2. **Argument of perigee** ([`search_arg_perigee`]) – target altitude, only when the
//!    [`SearchTarget`] carries a positive altitude goal.
//! 3. **Right ascension of the ascending node** ([`search_right_ascension`]) – target
//!    longitude, plus the caller's RAAN offset.
//!
//! The working [`OrbitalElementSet`] is updated only with the committed result of each
//! phase that converged; the first failing phase ends the request with an
//! [`OrbitFinderError`] naming it.
//!
//! ## Typical usage
//!
//! ```rust, no_run
//! use hifitime::Epoch;
//! use orbit_finder::orbit_finder::OrbitFinder;
//! use orbit_finder::search::{Direction, FinderParams, SearchTarget};
//!
//! let line1 = "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927";
//! let line2 = "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537";
//!
//! let finder = OrbitFinder::new(FinderParams::default());
//! let when = Epoch::from_gregorian_utc_hms(2008, 9, 21, 12, 0, 0);
//! let target = SearchTarget::new(48.85, 2.35, Direction::North, when).unwrap();
//!
//! let rotated = finder.rotate_orbit_to_lat_lon(line1, line2, &target).unwrap();
//! println!("{}\n{}", rotated.line1, rotated.line2);
//! ```
//!
//! ## Notes
//!
//! - The search is deterministic: the same request always returns the same lines and the
//!   same [`PhasePropagations`].
//! - [`OrbitFinder`] is `Send + Sync` whenever its propagator is, so independent requests
//!   can run in parallel against one instance.
//!
//! ## See also
//! ------------
//! * [`Propagator`] – Collaborator seam; [`Sgp4Propagator`] is the default.
//! * [`FinderParams`] – Tolerances, sweep bounds and skips.
use std::fmt;

use tracing::{debug, warn};

use crate::orbit_finder_errors::OrbitFinderError;
use crate::propagator::{Propagator, Sgp4Propagator};
use crate::search::arg_perigee::search_arg_perigee;
use crate::search::classifier::Classifier;
use crate::search::mean_anomaly::search_mean_anomaly;
use crate::search::raan::search_right_ascension;
use crate::search::{FinderParams, SearchPhase, SearchState, SearchTarget, SweepResult};
use crate::tle::fixed_angle::FixedAngle;
use crate::tle::OrbitalElementSet;

/// Number of propagations performed by each phase of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PhasePropagations {
    pub mean_anomaly: usize,
    /// `None` when no altitude goal was set.
    pub arg_perigee: Option<usize>,
    pub right_ascension: usize,
}

impl PhasePropagations {
    pub fn total(&self) -> usize {
        self.mean_anomaly + self.arg_perigee.unwrap_or(0) + self.right_ascension
    }
}

/// Successful result: the rotated element set and its rendered lines.
#[derive(Debug, Clone, PartialEq)]
pub struct RotatedOrbit {
    pub line1: String,
    pub line2: String,
    pub elements: OrbitalElementSet,
    pub propagations: PhasePropagations,
}

impl fmt::Display for RotatedOrbit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.line1, self.line2)
    }
}

/// Ground-track finder over a [`Propagator`].
#[derive(Debug, Clone)]
pub struct OrbitFinder<P: Propagator = Sgp4Propagator> {
    propagator: P,
    params: FinderParams,
}

impl OrbitFinder<Sgp4Propagator> {
    /// Finder using the SGP4/SDP4 propagator.
    pub fn new(params: FinderParams) -> Self {
        OrbitFinder {
            propagator: Sgp4Propagator,
            params,
        }
    }
}

impl Default for OrbitFinder<Sgp4Propagator> {
    fn default() -> Self {
        OrbitFinder::new(FinderParams::default())
    }
}

/// Log and convert a sweep result into the accepted angle, or a tagged error.
fn commit(
    phase: SearchPhase,
    sweep: SweepResult,
) -> Result<(FixedAngle, SearchState), OrbitFinderError> {
    if let SweepResult::Exhausted { last, samples, .. } = &sweep {
        warn!(%phase, %last, samples, "sweep exhausted");
    }
    let (angle, state) = sweep.converged(phase)?;
    debug!(%phase, %angle, "phase converged");
    Ok((angle, state))
}

impl<P: Propagator> OrbitFinder<P> {
    /// Finder over a caller-supplied propagator.
    pub fn with_propagator(propagator: P, params: FinderParams) -> Self {
        OrbitFinder { propagator, params }
    }

    pub fn params(&self) -> &FinderParams {
        &self.params
    }

    pub fn propagator(&self) -> &P {
        &self.propagator
    }

    /// Rotate the orbit described by a TLE pair so that its ground track passes over the
    /// target at the reference time.
    ///
    /// Arguments
    /// -----------------
    /// * `line1`, `line2` – The TLE lines (69 columns each; input checksums are ignored).
    /// * `target` – Ground point, direction, optional altitude, RAAN offset and reference time.
    ///
    /// Return
    /// ----------
    /// * `Ok(RotatedOrbit)` holding the rendered lines (fresh checksums), the final element
    ///   set and the propagation counts.
    /// * `Err(OrbitFinderError)`:
    ///   - [`InvalidTarget`](OrbitFinderError::InvalidTarget) or
    ///     [`TleParsing`](OrbitFinderError::TleParsing) before any propagation,
    ///   - [`PropagationBreakdown`](OrbitFinderError::PropagationBreakdown) or
    ///     [`SweepExhausted`](OrbitFinderError::SweepExhausted) tagged with the failing phase.
    pub fn rotate_orbit_to_lat_lon(
        &self,
        line1: &str,
        line2: &str,
        target: &SearchTarget,
    ) -> Result<RotatedOrbit, OrbitFinderError> {
        target.validate()?;
        let elements = OrbitalElementSet::parse(line1, line2)?;
        self.rotate_elements(&elements, target)
    }

    /// Same as [`rotate_orbit_to_lat_lon`](Self::rotate_orbit_to_lat_lon) on an already
    /// parsed element set.
    pub fn rotate_elements(
        &self,
        elements: &OrbitalElementSet,
        target: &SearchTarget,
    ) -> Result<RotatedOrbit, OrbitFinderError> {
        target.validate()?;
        let classifier = Classifier::new(&self.propagator, target, &self.params);
        let mut working = elements.clone();
        let mut propagations = PhasePropagations::default();

        debug!(
            catalog = working.catalog_number.trim(),
            latitude = target.latitude,
            longitude = target.longitude,
            direction = %target.direction,
            altitude = ?target.altitude_goal(),
            "rotating orbit"
        );

        let phase = SearchPhase::MeanAnomaly;
        let sweep = search_mean_anomaly(&classifier, &working, SearchState::default(), phase)?;
        propagations.mean_anomaly = sweep.samples();
        let (mean_anomaly, mut state) = commit(phase, sweep)?;
        working.mean_anomaly = mean_anomaly;

        if target.altitude_goal().is_some() {
            let phase = SearchPhase::ArgumentOfPerigee;
            let sweep = search_arg_perigee(&classifier, &working, working.mean_anomaly, state)?;
            propagations.arg_perigee = Some(sweep.samples());
            let (arg_perigee, next) = commit(phase, sweep)?;
            working.arg_perigee = arg_perigee;
            working.mean_anomaly = next.mean_anomaly.unwrap_or(working.mean_anomaly);
            state = next;
        }

        let phase = SearchPhase::RightAscension;
        let sweep = search_right_ascension(
            &classifier,
            &working,
            working.mean_anomaly,
            working.arg_perigee,
            state,
        )?;
        propagations.right_ascension = sweep.samples();
        let (right_ascension, _) = commit(phase, sweep)?;
        working.right_ascension = right_ascension;

        let (line1, line2) = working.to_lines();
        debug!(total = propagations.total(), "orbit rotated");

        Ok(RotatedOrbit {
            line1,
            line2,
            elements: working,
            propagations,
        })
    }
}

#[cfg(test)]
mod orbit_finder_test {
    use super::*;
    use crate::propagator::test_propagators::{
        AnalyticPropagator, DecayedPropagator, EQUATORIAL_LINE1, EQUATORIAL_LINE2,
    };
    use crate::search::Direction;
    use crate::tle::ParseTleError;
    use hifitime::Epoch;

    fn reference_time() -> Epoch {
        Epoch::from_gregorian_utc_at_noon(2024, 3, 1)
    }

    fn analytic_finder() -> OrbitFinder<AnalyticPropagator> {
        OrbitFinder::with_propagator(AnalyticPropagator, FinderParams::default())
    }

    #[test]
    fn test_all_phases_commit() {
        let finder = analytic_finder();
        let target = SearchTarget::new(0.0, 45.0, Direction::North, reference_time())
            .unwrap()
            .with_raan_offset(-50.0);

        let rotated = finder
            .rotate_orbit_to_lat_lon(EQUATORIAL_LINE1, EQUATORIAL_LINE2, &target)
            .unwrap();

        assert_eq!(rotated.elements.mean_anomaly, FixedAngle::from_tenths(1));
        assert_eq!(rotated.propagations.mean_anomaly, 2);
        assert_eq!(rotated.propagations.arg_perigee, None);
        assert!(rotated.propagations.right_ascension > 0);

        let raan = rotated.elements.right_ascension.degrees();
        assert!((0.0..360.0).contains(&raan));
        assert!(raan > 354.0 && raan < 356.0, "raan = {raan}");

        assert_eq!(&rotated.line2[43..51], "000.1000");
        assert_eq!(rotated.to_string(), format!("{}\n{}", rotated.line1, rotated.line2));
    }

    #[test]
    fn test_altitude_phase_runs_only_with_goal() {
        let finder = analytic_finder();
        let mut elements = OrbitalElementSet::parse(EQUATORIAL_LINE1, EQUATORIAL_LINE2).unwrap();
        elements.eccentricity = 500_000;

        let target = SearchTarget::new(0.0, 45.0, Direction::North, reference_time())
            .unwrap()
            .with_altitude(700.0);
        let rotated = finder.rotate_elements(&elements, &target).unwrap();
        assert!(rotated.propagations.arg_perigee.is_some());
        assert_ne!(rotated.elements.arg_perigee, elements.arg_perigee);

        let zero_alt = target.with_altitude(0.0);
        let rotated = finder.rotate_elements(&elements, &zero_alt).unwrap();
        assert_eq!(rotated.propagations.arg_perigee, None);
        assert_eq!(rotated.elements.arg_perigee, elements.arg_perigee);
    }

    #[test]
    fn test_failures_are_tagged() {
        let target = SearchTarget::new(70.0, 0.0, Direction::North, reference_time()).unwrap();
        let err = analytic_finder()
            .rotate_orbit_to_lat_lon(EQUATORIAL_LINE1, EQUATORIAL_LINE2, &target)
            .unwrap_err();
        assert_eq!(err.phase(), Some(SearchPhase::MeanAnomaly));
        assert!(err.to_string().contains("Mean Anomaly"));

        let decayed = OrbitFinder::with_propagator(DecayedPropagator, FinderParams::default());
        let target = SearchTarget::new(0.0, 0.0, Direction::North, reference_time()).unwrap();
        let err = decayed
            .rotate_orbit_to_lat_lon(EQUATORIAL_LINE1, EQUATORIAL_LINE2, &target)
            .unwrap_err();
        assert_eq!(
            err,
            OrbitFinderError::PropagationBreakdown {
                phase: SearchPhase::MeanAnomaly
            }
        );
    }

    #[test]
    fn test_invalid_inputs_fail_before_search() {
        let finder = analytic_finder();
        let mut target = SearchTarget::new(0.0, 0.0, Direction::South, reference_time()).unwrap();

        let err = finder
            .rotate_orbit_to_lat_lon("1 25544U", EQUATORIAL_LINE2, &target)
            .unwrap_err();
        assert_eq!(
            err,
            OrbitFinderError::TleParsing(ParseTleError::TooShortLine { line: 1, len: 8 })
        );

        target.longitude = 200.0;
        let err = finder
            .rotate_orbit_to_lat_lon(EQUATORIAL_LINE1, EQUATORIAL_LINE2, &target)
            .unwrap_err();
        assert!(matches!(err, OrbitFinderError::InvalidTarget(_)));
    }

    #[test]
    fn test_finder_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<OrbitFinder<AnalyticPropagator>>();
    }
}
