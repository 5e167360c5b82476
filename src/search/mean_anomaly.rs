//! Mean anomaly sweep: latitude and direction of travel.
//!
//! Steps the mean anomaly from 0° in 0.1° increments (up to
//! [`FinderParams::mean_anomaly_sweep`](crate::search::FinderParams::mean_anomaly_sweep)
//! steps) and classifies each candidate along latitude. The sweep stops on the first
//! latitude `Success` whose inferred direction equals the target direction.
//!
//! Skips
//! -----------------
//! * `Success` in the wrong direction → jump `mean_anomaly_direction_skip` extra steps
//!   (the satellite needs to come round again).
//! * `Far` → jump `mean_anomaly_far_skip` extra steps.
//! * `Error` → abort with [`OrbitFinderError::PropagationBreakdown`].
//!
//! Every latitude `Success` is recorded in [`SearchState::mean_anomaly`], whatever its
//! direction, so callers always see the last mean anomaly that hit the target latitude.
use tracing::trace;

use crate::orbit_finder_errors::OrbitFinderError;
use crate::propagator::Propagator;
use crate::search::classifier::{Classifier, PropagationOutcome, SearchDimension};
use crate::search::{SearchPhase, SearchState, SweepResult};
use crate::tle::fixed_angle::FixedAngle;
use crate::tle::OrbitalElementSet;

/// Sweep the mean anomaly of `base` until latitude and direction match.
///
/// Arguments
/// -----------------
/// * `classifier` – Propagates and grades candidates.
/// * `base` – Element set whose other angles stay fixed during the sweep.
/// * `state` – Incoming search state; its latitude history seeds the direction estimate.
/// * `phase` – Phase reported on breakdown ([`SearchPhase::MeanAnomaly`], or
///   [`SearchPhase::ArgumentOfPerigee`] for the nested re-search).
///
/// Return
/// ----------
/// * [`SweepResult::Converged`] with the matched mean anomaly, or
///   [`SweepResult::Exhausted`] with the last classification once the sweep runs out.
/// * `Err(PropagationBreakdown)` as soon as a candidate fails to propagate.
pub fn search_mean_anomaly<P: Propagator>(
    classifier: &Classifier<'_, P>,
    base: &OrbitalElementSet,
    state: SearchState,
    phase: SearchPhase,
) -> Result<SweepResult, OrbitFinderError> {
    let params = classifier.params();
    let goal = classifier.target().direction;

    let mut state = state;
    let mut last = PropagationOutcome::Near;
    let mut samples = 0;
    let mut step: u32 = 0;

    while step < params.mean_anomaly_sweep {
        let mean_anomaly = FixedAngle::from_tenths(step as i64);
        let candidate = base.with_mean_anomaly(mean_anomaly);
        let (outcome, next) = classifier.classify(&candidate, SearchDimension::Latitude, state);
        state = next;
        last = outcome;
        samples += 1;

        let skip = match outcome {
            PropagationOutcome::Success => {
                state.mean_anomaly = Some(mean_anomaly);
                if state.direction == Some(goal) {
                    trace!(%mean_anomaly, samples, "mean anomaly converged");
                    return Ok(SweepResult::Converged {
                        angle: mean_anomaly,
                        state,
                        samples,
                    });
                }
                params.mean_anomaly_direction_skip
            }
            PropagationOutcome::Far => params.mean_anomaly_far_skip,
            PropagationOutcome::Near => 0,
            PropagationOutcome::Error => {
                return Err(OrbitFinderError::PropagationBreakdown { phase });
            }
        };
        step = step.saturating_add(1).saturating_add(skip);
    }

    Ok(SweepResult::Exhausted {
        last,
        state,
        samples,
    })
}
