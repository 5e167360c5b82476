//! Argument of perigee sweep: altitude at the target point.
//!
//! Only runs when the target carries an altitude goal. Candidates start
//! `arg_perigee_start_offset` tenths of a degree below the incoming argument of perigee and
//! advance in 0.1° steps for at most `arg_perigee_sweep` offsets. Changing the argument of
//! perigee moves the satellite along its orbit, so every candidate needs a fresh mean
//! anomaly to stay on the target latitude:
//!
//! 1. classify the candidate along altitude, using the best mean anomaly found so far;
//! 2. if the altitude is a `Success` **and** that mean anomaly was matched for this very
//!    argument of perigee, stop;
//! 3. otherwise re-run the [mean anomaly sweep](crate::search::mean_anomaly) for the
//!    candidate and, when it converges after an altitude `Success`, re-check the altitude
//!    with the new mean anomaly before moving on.
//!
//! Skips
//! -----------------
//! * altitude `Far` → `arg_perigee_far_skip` extra steps;
//! * re-search exhausted on a wrong-direction `Success` → `arg_perigee_direction_skip`;
//! * re-search exhausted on `Far` → `arg_perigee_mean_anomaly_far_skip`.
//!
//! Skips accumulate within one step.
use tracing::trace;

use crate::orbit_finder_errors::OrbitFinderError;
use crate::propagator::Propagator;
use crate::search::classifier::{Classifier, PropagationOutcome, SearchDimension};
use crate::search::mean_anomaly::search_mean_anomaly;
use crate::search::{SearchPhase, SearchState, SweepResult};
use crate::tle::fixed_angle::FixedAngle;
use crate::tle::OrbitalElementSet;

/// Sweep the argument of perigee of `base` until the altitude matches.
///
/// Arguments
/// -----------------
/// * `classifier` – Propagates and grades candidates.
/// * `base` – Element set after the mean anomaly phase; its argument of perigee is the
///   sweep origin.
/// * `mean_anomaly` – Mean anomaly matched for `base` by the previous phase.
/// * `state` – State returned by the mean anomaly phase.
///
/// Return
/// ----------
/// * [`SweepResult::Converged`] with the accepted argument of perigee; the matching mean
///   anomaly is in the returned state's `mean_anomaly`.
/// * [`SweepResult::Exhausted`] when every offset was tried.
/// * `Err(PropagationBreakdown)` on the first failed propagation, nested re-searches included.
pub fn search_arg_perigee<P: Propagator>(
    classifier: &Classifier<'_, P>,
    base: &OrbitalElementSet,
    mean_anomaly: FixedAngle,
    state: SearchState,
) -> Result<SweepResult, OrbitFinderError> {
    let phase = SearchPhase::ArgumentOfPerigee;
    let params = classifier.params();
    let start = base
        .arg_perigee
        .add_tenths(-(params.arg_perigee_start_offset as i64));

    let mut state = SearchState {
        mean_anomaly: Some(mean_anomaly),
        ..state
    };
    // the incoming mean anomaly was matched for the incoming argument of perigee
    let mut matched_for = Some(base.arg_perigee.normalized());
    let mut last = PropagationOutcome::Near;
    let mut samples = 0;
    let mut offset: u32 = 0;

    while offset < params.arg_perigee_sweep {
        let arg_perigee = start.add_tenths(offset as i64).normalized();
        let best_mean_anomaly = state.mean_anomaly.unwrap_or(mean_anomaly);
        let candidate = base
            .with_arg_perigee(arg_perigee)
            .with_mean_anomaly(best_mean_anomaly);

        let (outcome, next) = classifier.classify(&candidate, SearchDimension::Altitude, state);
        state = next;
        last = outcome;
        samples += 1;

        if outcome == PropagationOutcome::Error {
            return Err(OrbitFinderError::PropagationBreakdown { phase });
        }

        let latitude_fixed = matched_for == Some(arg_perigee);
        if outcome == PropagationOutcome::Success {
            state.arg_perigee = Some(arg_perigee);
            if latitude_fixed {
                trace!(%arg_perigee, mean_anomaly = %best_mean_anomaly, samples, "argument of perigee converged");
                return Ok(SweepResult::Converged {
                    angle: arg_perigee,
                    state,
                    samples,
                });
            }
        }

        let mut skip = 0;
        if outcome == PropagationOutcome::Far {
            skip += params.arg_perigee_far_skip;
        }

        if !latitude_fixed {
            let resweep = search_mean_anomaly(
                classifier,
                &base.with_arg_perigee(arg_perigee),
                state,
                phase,
            )?;
            samples += resweep.samples();
            state = *resweep.state();

            match resweep {
                SweepResult::Converged { .. } => {
                    matched_for = Some(arg_perigee);
                    if outcome == PropagationOutcome::Success {
                        // altitude was graded with the previous mean anomaly
                        continue;
                    }
                }
                SweepResult::Exhausted { last: inner, .. } => {
                    matched_for = None;
                    match inner {
                        PropagationOutcome::Success => skip += params.arg_perigee_direction_skip,
                        PropagationOutcome::Far => {
                            skip += params.arg_perigee_mean_anomaly_far_skip
                        }
                        _ => {}
                    }
                }
            }
        }

        offset = offset.saturating_add(1).saturating_add(skip);
    }

    Ok(SweepResult::Exhausted {
        last,
        state,
        samples,
    })
}

#[cfg(test)]
mod arg_perigee_test {
    use super::*;
    use crate::propagator::test_propagators::{
        AnalyticPropagator, DecayedPropagator, EQUATORIAL_LINE1, EQUATORIAL_LINE2,
    };
    use crate::search::classifier::classify_sample;
    use crate::search::{Direction, FinderParams, SearchTarget};
    use hifitime::Epoch;

    /// Circular test orbit made eccentric so that altitude varies with mean anomaly.
    fn eccentric_set() -> OrbitalElementSet {
        let mut set = OrbitalElementSet::parse(EQUATORIAL_LINE1, EQUATORIAL_LINE2).unwrap();
        set.eccentricity = 500_000;
        set
    }

    fn target(altitude: f64) -> SearchTarget {
        SearchTarget::new(
            0.0,
            0.0,
            Direction::North,
            Epoch::from_gregorian_utc_at_noon(2024, 3, 1),
        )
        .unwrap()
        .with_altitude(altitude)
    }

    #[test]
    fn test_altitude_and_latitude_both_hold() {
        let propagator = AnalyticPropagator;
        let params = FinderParams::default();
        let target = target(700.0);
        let classifier = Classifier::new(&propagator, &target, &params);

        let base = eccentric_set();
        let (mean_anomaly, state) = search_mean_anomaly(
            &classifier,
            &base,
            SearchState::default(),
            SearchPhase::MeanAnomaly,
        )
        .unwrap()
        .converged(SearchPhase::MeanAnomaly)
        .unwrap();

        let result = search_arg_perigee(
            &classifier,
            &base.with_mean_anomaly(mean_anomaly),
            mean_anomaly,
            state,
        )
        .unwrap();
        let samples = result.samples();
        let (arg_perigee, state) = result.converged(SearchPhase::ArgumentOfPerigee).unwrap();
        assert!(samples > 1);
        assert_eq!(state.arg_perigee, Some(arg_perigee));
        assert_eq!(state.direction, Some(Direction::North));

        let final_set = base
            .with_arg_perigee(arg_perigee)
            .with_mean_anomaly(state.mean_anomaly.unwrap());
        let geo = classifier.sample(&final_set).unwrap();
        assert!((geo.altitude - 700.0).abs() < params.max_alt_error);
        assert!(geo.latitude.abs() < params.max_lat_error);

        let (outcome, _) = classify_sample(
            &geo,
            SearchDimension::Altitude,
            &target,
            &params,
            SearchState::default(),
        );
        assert_eq!(outcome, PropagationOutcome::Success);
    }

    #[test]
    fn test_unreachable_altitude_exhausts() {
        let propagator = AnalyticPropagator;
        let params = FinderParams::builder().arg_perigee_sweep(40).build().unwrap();
        // perigee and apogee of the analytic orbit are 631 km and 1369 km
        let target = target(5_000.0);
        let classifier = Classifier::new(&propagator, &target, &params);

        let base = eccentric_set().with_mean_anomaly(FixedAngle::from_tenths(1));
        let state = SearchState {
            direction: Some(Direction::North),
            ..SearchState::default()
        };
        let result =
            search_arg_perigee(&classifier, &base, FixedAngle::from_tenths(1), state).unwrap();
        assert!(matches!(
            result,
            SweepResult::Exhausted {
                last: PropagationOutcome::Far,
                ..
            }
        ));
    }

    #[test]
    fn test_breakdown_is_tagged() {
        let propagator = DecayedPropagator;
        let params = FinderParams::default();
        let target = target(700.0);
        let classifier = Classifier::new(&propagator, &target, &params);

        let result = search_arg_perigee(
            &classifier,
            &eccentric_set(),
            FixedAngle::default(),
            SearchState::default(),
        );
        assert_eq!(
            result,
            Err(OrbitFinderError::PropagationBreakdown {
                phase: SearchPhase::ArgumentOfPerigee
            })
        );
    }
}
