//! Right ascension of the ascending node sweep: longitude.
//!
//! Rotating the orbit plane moves the ground point in longitude without touching its
//! latitude or altitude. The sweep steps the RAAN from 0° in 0.01° increments for at most
//! `raan_sweep` steps, skipping `raan_far_skip` extra steps after a `Far` sample, and stops
//! on the first longitude `Success`. The caller's RAAN offset is added to the matched value
//! and the result wrapped into [0°, 360°).
use tracing::trace;

use crate::orbit_finder_errors::OrbitFinderError;
use crate::propagator::Propagator;
use crate::search::classifier::{Classifier, PropagationOutcome, SearchDimension};
use crate::search::{SearchPhase, SearchState, SweepResult};
use crate::tle::fixed_angle::FixedAngle;
use crate::tle::OrbitalElementSet;

/// Sweep the RAAN of `base` until the longitude matches.
///
/// Arguments
/// -----------------
/// * `classifier` – Propagates and grades candidates.
/// * `base` – Element set whose inclination, eccentricity and mean motion are kept.
/// * `mean_anomaly`, `arg_perigee` – Angles settled by the previous phases.
/// * `state` – Incoming state, returned unchanged on success.
///
/// Return
/// ----------
/// * [`SweepResult::Converged`] with the **offset** RAAN, normalized.
/// * [`SweepResult::Exhausted`] when the sweep runs out.
/// * `Err(PropagationBreakdown)` on the first failed propagation.
pub fn search_right_ascension<P: Propagator>(
    classifier: &Classifier<'_, P>,
    base: &OrbitalElementSet,
    mean_anomaly: FixedAngle,
    arg_perigee: FixedAngle,
    state: SearchState,
) -> Result<SweepResult, OrbitFinderError> {
    let params = classifier.params();
    let raan_offset = classifier.target().raan_offset;
    let positioned = base
        .with_mean_anomaly(mean_anomaly)
        .with_arg_perigee(arg_perigee);

    let mut state = state;
    let mut last = PropagationOutcome::Near;
    let mut samples = 0;
    let mut step: u32 = 0;

    while step < params.raan_sweep {
        let raan = FixedAngle::from_hundredths(step as i64);
        let candidate = positioned.with_right_ascension(raan);
        let (outcome, next) = classifier.classify(&candidate, SearchDimension::Longitude, state);
        state = next;
        last = outcome;
        samples += 1;

        let skip = match outcome {
            PropagationOutcome::Success => {
                let angle = raan.add_degrees(raan_offset).normalized();
                trace!(matched = %raan.normalized(), %angle, samples, "right ascension converged");
                return Ok(SweepResult::Converged {
                    angle,
                    state,
                    samples,
                });
            }
            PropagationOutcome::Far => params.raan_far_skip,
            PropagationOutcome::Near => 0,
            PropagationOutcome::Error => {
                return Err(OrbitFinderError::PropagationBreakdown {
                    phase: SearchPhase::RightAscension,
                });
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
