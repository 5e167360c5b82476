//! # Propagation classifier
//!
//! Propagates a candidate element set to the reference time and grades how close its
//! ground point lands to the target along one [`SearchDimension`].
//!
//! Grading
//! -----------------
//! With `d` the absolute deviation from the target along the dimension:
//!
//! * `d < tolerance` → [`PropagationOutcome::Success`]
//! * `d > far threshold` → [`PropagationOutcome::Far`]
//! * otherwise → [`PropagationOutcome::Near`]
//!
//! A propagator refusal or a non-finite position is [`PropagationOutcome::Error`].
//!
//! Latitude specifics
//! -----------------
//! Latitude samples also drive the direction estimate. The previous latitude is kept in
//! [`SearchState::last_latitude`]; a sample equal to it (which is always the case for the
//! very first sample of a search) yields `Near` without updating the direction. Otherwise
//! the direction is set to `North` when latitude increased and `South` when it decreased.
//!
//! Longitude deviations are wrapped into [-180, 180] before grading.
use std::fmt;

use tracing::{debug, trace};

use crate::constants::Degree;
use crate::geodetic::{eci_to_geodetic, wrap_longitude, Geodetic};
use crate::propagator::Propagator;
use crate::search::{Direction, FinderParams, SearchState, SearchTarget};
use crate::tle::OrbitalElementSet;

/// Grade of one propagated candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropagationOutcome {
    Success,
    Near,
    Far,
    Error,
}

impl fmt::Display for PropagationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PropagationOutcome::Success => "Success",
            PropagationOutcome::Near => "Near",
            PropagationOutcome::Far => "Far",
            PropagationOutcome::Error => "Error",
        };
        f.write_str(name)
    }
}

/// Coordinate compared against the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchDimension {
    Latitude,
    Longitude,
    Altitude,
}

fn grade(deviation: f64, tolerance: f64, far: f64) -> PropagationOutcome {
    let d = deviation.abs();
    if d < tolerance {
        PropagationOutcome::Success
    } else if d > far {
        PropagationOutcome::Far
    } else {
        PropagationOutcome::Near
    }
}

/// Grade a geodetic sample against the target.
///
/// Arguments
/// -----------------
/// * `sample` – Ground point of the propagated candidate.
/// * `dimension` – Coordinate being searched.
/// * `target`, `params` – Goal and tolerances.
/// * `state` – Search state before this sample.
///
/// Return
/// ----------
/// * The outcome and the updated state. Only the latitude dimension modifies the state.
///
/// Remarks
/// -------------
/// * Without an active altitude goal every altitude sample is a `Success`.
pub fn classify_sample(
    sample: &Geodetic,
    dimension: SearchDimension,
    target: &SearchTarget,
    params: &FinderParams,
    state: SearchState,
) -> (PropagationOutcome, SearchState) {
    let mut state = state;
    let outcome = match dimension {
        SearchDimension::Latitude => {
            let previous: Degree = state.last_latitude.unwrap_or(sample.latitude);
            state.last_latitude = Some(sample.latitude);
            if sample.latitude == previous {
                return (PropagationOutcome::Near, state);
            }
            state.direction = Some(if sample.latitude > previous {
                Direction::North
            } else {
                Direction::South
            });
            grade(
                sample.latitude - target.latitude,
                params.max_lat_error,
                params.far_lat_error,
            )
        }
        SearchDimension::Longitude => grade(
            wrap_longitude(sample.longitude - target.longitude),
            params.max_lon_error,
            params.far_lon_error,
        ),
        SearchDimension::Altitude => match target.altitude_goal() {
            Some(goal) => grade(
                sample.altitude - goal,
                params.max_alt_error,
                params.far_alt_error,
            ),
            None => PropagationOutcome::Success,
        },
    };
    (outcome, state)
}

/// Propagates candidates with a [`Propagator`] and grades them against a target.
pub struct Classifier<'a, P: Propagator> {
    propagator: &'a P,
    target: &'a SearchTarget,
    params: &'a FinderParams,
}

impl<'a, P: Propagator> Classifier<'a, P> {
    pub fn new(propagator: &'a P, target: &'a SearchTarget, params: &'a FinderParams) -> Self {
        Classifier {
            propagator,
            target,
            params,
        }
    }

    pub fn target(&self) -> &SearchTarget {
        self.target
    }

    pub fn params(&self) -> &FinderParams {
        self.params
    }

    /// Ground point of `candidate` at the reference time, or `None` if propagation failed.
    pub fn sample(&self, candidate: &OrbitalElementSet) -> Option<Geodetic> {
        let (line1, line2) = candidate.to_lines();
        let record = match self.propagator.init(&line1, &line2) {
            Ok(record) => record,
            Err(err) => {
                debug!(error = %err, "candidate rejected by propagator");
                return None;
            }
        };

        let tv = self
            .propagator
            .time_variables(&record, &self.target.reference_time);
        let position = self.propagator.propagate(&record, tv.minutes_since_epoch);
        if !position.iter().all(|c| c.is_finite()) {
            debug!(minutes = tv.minutes_since_epoch, "non-finite propagated position");
            return None;
        }

        Some(eci_to_geodetic(&position, tv.gmst))
    }

    /// Propagate `candidate` and grade it along `dimension`.
    pub fn classify(
        &self,
        candidate: &OrbitalElementSet,
        dimension: SearchDimension,
        state: SearchState,
    ) -> (PropagationOutcome, SearchState) {
        let Some(sample) = self.sample(candidate) else {
            return (PropagationOutcome::Error, state);
        };

        let (outcome, state) =
            classify_sample(&sample, dimension, self.target, self.params, state);
        trace!(
            ?dimension,
            %outcome,
            latitude = sample.latitude,
            longitude = sample.longitude,
            altitude = sample.altitude,
            direction = ?state.direction,
            "classified candidate"
        );
        (outcome, state)
    }
}
