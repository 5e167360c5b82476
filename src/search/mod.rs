//! # Ground-track search
//!
//! This module holds the shared vocabulary of the three angular sweeps that rotate an
//! element set onto a target ground point, and the [`FinderParams`] object that tunes them.
//!
//! ## Pipeline
//! -----------------
//! 1. [`mean_anomaly`] – place the satellite at the target latitude, heading in the target
//!    direction, by stepping the mean anomaly in 0.1° increments.
//! 2. [`arg_perigee`] – *only when an altitude goal is set*: step the argument of perigee in
//!    0.1° increments, re-converging the mean anomaly for every candidate, until the
//!    altitude matches.
//! 3. [`raan`] – rotate the orbit plane in 0.01° increments until the longitude matches,
//!    then add the caller's RAAN offset.
//!
//! Every candidate is judged by the [`classifier`], which propagates it to the reference
//! time and grades the deviation along one dimension as
//! [`Success`](classifier::PropagationOutcome::Success),
//! [`Near`](classifier::PropagationOutcome::Near),
//! [`Far`](classifier::PropagationOutcome::Far) or
//! [`Error`](classifier::PropagationOutcome::Error).
//!
//! ## Example
//! -----------------
//! ```rust
//! use orbit_finder::search::FinderParams;
//!
//! let params = FinderParams::builder()
//!     .max_lat_error(0.05)
//!     .raan_far_skip(500)
//!     .build()
//!     .unwrap();
//! assert_eq!(params.raan_far_skip, 500);
//! ```
//!
//! See also
//! ------------
//! * [`OrbitFinder`](crate::orbit_finder::OrbitFinder) – Orchestrates the three phases.
pub mod arg_perigee;
pub mod classifier;
pub mod mean_anomaly;
pub mod raan;

use std::fmt;
use std::str::FromStr;

use hifitime::Epoch;
use serde::{Deserialize, Serialize};

use crate::constants::{Degree, Kilometer};
use crate::orbit_finder_errors::OrbitFinderError;
use crate::tle::fixed_angle::FixedAngle;
use classifier::PropagationOutcome;

/// Travel direction of the satellite across the target latitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Latitude increasing (ascending pass).
    #[serde(rename = "N")]
    North,
    /// Latitude decreasing (descending pass).
    #[serde(rename = "S")]
    South,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::North => write!(f, "N"),
            Direction::South => write!(f, "S"),
        }
    }
}

impl FromStr for Direction {
    type Err = OrbitFinderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "N" | "n" => Ok(Direction::North),
            "S" | "s" => Ok(Direction::South),
            other => Err(OrbitFinderError::InvalidTarget(format!(
                "direction must be N or S, got {other:?}"
            ))),
        }
    }
}

/// Search phase, used to tag sweep failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchPhase {
    MeanAnomaly,
    ArgumentOfPerigee,
    RightAscension,
}

impl fmt::Display for SearchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SearchPhase::MeanAnomaly => "Mean Anomaly",
            SearchPhase::ArgumentOfPerigee => "Argument of Perigee",
            SearchPhase::RightAscension => "Right Ascension of Ascending Node",
        };
        f.write_str(name)
    }
}

/// Where and when the ground track must pass.
///
/// Fields
/// -----------------
/// * `latitude` – Target geodetic latitude, degrees in [-90, 90].
/// * `longitude` – Target longitude, degrees in [-180, 180].
/// * `direction` – Required direction of travel at the target.
/// * `altitude` – Optional altitude goal in km; `None` or a non-positive value disables the
///   argument-of-perigee phase.
/// * `raan_offset` – Degrees added to the matched RAAN (default `0`).
/// * `reference_time` – Instant at which the satellite must be over the target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchTarget {
    pub latitude: Degree,
    pub longitude: Degree,
    pub direction: Direction,
    pub altitude: Option<Kilometer>,
    pub raan_offset: Degree,
    pub reference_time: Epoch,
}

impl SearchTarget {
    /// Build a validated target without altitude goal and with a zero RAAN offset.
    pub fn new(
        latitude: Degree,
        longitude: Degree,
        direction: Direction,
        reference_time: Epoch,
    ) -> Result<Self, OrbitFinderError> {
        let target = SearchTarget {
            latitude,
            longitude,
            direction,
            altitude: None,
            raan_offset: 0.0,
            reference_time,
        };
        target.validate()?;
        Ok(target)
    }

    pub fn with_altitude(self, altitude: Kilometer) -> Self {
        SearchTarget {
            altitude: Some(altitude),
            ..self
        }
    }

    pub fn with_raan_offset(self, raan_offset: Degree) -> Self {
        SearchTarget {
            raan_offset,
            ..self
        }
    }

    /// The altitude goal, if one is active (strictly positive).
    pub fn altitude_goal(&self) -> Option<Kilometer> {
        self.altitude.filter(|alt| *alt > 0.0)
    }

    /// Check the ranges of every numeric field.
    pub fn validate(&self) -> Result<(), OrbitFinderError> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(OrbitFinderError::InvalidTarget(format!(
                "latitude {} outside [-90, 90]",
                self.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(OrbitFinderError::InvalidTarget(format!(
                "longitude {} outside [-180, 180]",
                self.longitude
            )));
        }
        if let Some(alt) = self.altitude {
            if !alt.is_finite() {
                return Err(OrbitFinderError::InvalidTarget(format!(
                    "altitude {alt} is not finite"
                )));
            }
        }
        if !self.raan_offset.is_finite() {
            return Err(OrbitFinderError::InvalidTarget(format!(
                "raan offset {} is not finite",
                self.raan_offset
            )));
        }
        Ok(())
    }
}

/// State threaded through successive classifications.
///
/// * `last_latitude` – Latitude of the previous latitude-dimension sample.
/// * `direction` – Direction inferred from the last two latitude samples.
/// * `mean_anomaly` – Last mean anomaly that produced a latitude `Success`.
/// * `arg_perigee` – Last argument of perigee that produced an altitude `Success`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SearchState {
    pub last_latitude: Option<Degree>,
    pub direction: Option<Direction>,
    pub mean_anomaly: Option<FixedAngle>,
    pub arg_perigee: Option<FixedAngle>,
}

/// Result of one bounded sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SweepResult {
    /// The sweep stopped on an accepted angle.
    Converged {
        angle: FixedAngle,
        state: SearchState,
        samples: usize,
    },
    /// The sweep ran out of candidates; `last` is the final classification.
    Exhausted {
        last: PropagationOutcome,
        state: SearchState,
        samples: usize,
    },
}

impl SweepResult {
    /// Number of propagations performed, nested sweeps included.
    pub fn samples(&self) -> usize {
        match self {
            SweepResult::Converged { samples, .. } | SweepResult::Exhausted { samples, .. } => {
                *samples
            }
        }
    }

    pub fn state(&self) -> &SearchState {
        match self {
            SweepResult::Converged { state, .. } | SweepResult::Exhausted { state, .. } => state,
        }
    }

    /// Accepted angle and final state, or [`OrbitFinderError::SweepExhausted`] tagged with `phase`.
    pub fn converged(
        self,
        phase: SearchPhase,
    ) -> Result<(FixedAngle, SearchState), OrbitFinderError> {
        match self {
            SweepResult::Converged { angle, state, .. } => Ok((angle, state)),
            SweepResult::Exhausted { last, samples, .. } => {
                Err(OrbitFinderError::SweepExhausted {
                    phase,
                    last,
                    samples,
                })
            }
        }
    }
}

/// Configuration parameters controlling the ground-track search.
///
/// Overview
/// -----------------
/// All tolerances are **absolute deviations** from the target. A sample is a `Success` when
/// its deviation is strictly below the tolerance, and `Far` when it is strictly beyond the
/// far threshold. Sweep lengths are counted in sweep steps (0.1° for mean anomaly and
/// argument of perigee, 0.01° for RAAN) and skips are **extra** steps added to the regular
/// one-step advance.
///
/// Fields
/// -----------------
/// **Tolerances**
/// * `max_lat_error` – Latitude acceptance (deg).
/// * `max_lon_error` – Longitude acceptance (deg).
/// * `max_alt_error` – Altitude acceptance (km).
/// * `far_lat_error`, `far_lon_error` – Far thresholds (deg).
/// * `far_alt_error` – Far threshold on altitude (km).
///
/// **Mean anomaly sweep**
/// * `mean_anomaly_sweep` – Number of 0.1° steps (default 5200, i.e. 520° so the target is
///   crossed in both directions).
/// * `mean_anomaly_direction_skip` – Extra steps after a `Success` with the wrong direction.
/// * `mean_anomaly_far_skip` – Extra steps after a `Far` sample.
///
/// **Argument of perigee sweep**
/// * `arg_perigee_sweep` – Number of 0.1° offsets (default 3600, one full turn).
/// * `arg_perigee_start_offset` – Steps subtracted from the initial argument of perigee to
///   obtain the first candidate.
/// * `arg_perigee_far_skip` – Extra steps after an altitude `Far`.
/// * `arg_perigee_direction_skip` – Extra steps when the mean anomaly re-search ends on a
///   wrong-direction `Success`.
/// * `arg_perigee_mean_anomaly_far_skip` – Extra steps when the re-search ends on `Far`.
///
/// **RAAN sweep**
/// * `raan_sweep` – Number of 0.01° steps (default 52000, i.e. 520°).
/// * `raan_far_skip` – Extra steps after a longitude `Far`.
///
/// Validation rules (enforced by [`FinderParamsBuilder::build`])
/// -----------------
/// * tolerances are finite and `> 0`,
/// * each far threshold is `>=` its tolerance,
/// * every sweep length is `>= 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinderParams {
    // --- Tolerances ---
    pub max_lat_error: Degree,
    pub max_lon_error: Degree,
    pub max_alt_error: Kilometer,
    pub far_lat_error: Degree,
    pub far_lon_error: Degree,
    pub far_alt_error: Kilometer,

    // --- Mean anomaly sweep ---
    pub mean_anomaly_sweep: u32,
    pub mean_anomaly_direction_skip: u32,
    pub mean_anomaly_far_skip: u32,

    // --- Argument of perigee sweep ---
    pub arg_perigee_sweep: u32,
    pub arg_perigee_start_offset: u32,
    pub arg_perigee_far_skip: u32,
    pub arg_perigee_direction_skip: u32,
    pub arg_perigee_mean_anomaly_far_skip: u32,

    // --- RAAN sweep ---
    pub raan_sweep: u32,
    pub raan_far_skip: u32,
}

impl FinderParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new [`FinderParamsBuilder`] starting from the defaults.
    pub fn builder() -> FinderParamsBuilder {
        FinderParamsBuilder::new()
    }
}

impl Default for FinderParams {
    fn default() -> Self {
        FinderParams {
            max_lat_error: 0.1,
            max_lon_error: 0.1,
            max_alt_error: 30.0,
            far_lat_error: 11.0,
            far_lon_error: 11.0,
            far_alt_error: 100.0,

            mean_anomaly_sweep: 5200,
            mean_anomaly_direction_skip: 20,
            mean_anomaly_far_skip: 100,

            arg_perigee_sweep: 3600,
            arg_perigee_start_offset: 100,
            arg_perigee_far_skip: 49,
            arg_perigee_direction_skip: 20,
            arg_perigee_mean_anomaly_far_skip: 100,

            raan_sweep: 52_000,
            raan_far_skip: 1000,
        }
    }
}

/// Builder for [`FinderParams`], with validation.
#[derive(Debug, Clone, Default)]
pub struct FinderParamsBuilder {
    params: FinderParams,
}

impl FinderParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: FinderParams::default(),
        }
    }

    // --- Tolerances ---
    pub fn max_lat_error(mut self, v: Degree) -> Self {
        self.params.max_lat_error = v;
        self
    }
    pub fn max_lon_error(mut self, v: Degree) -> Self {
        self.params.max_lon_error = v;
        self
    }
    pub fn max_alt_error(mut self, v: Kilometer) -> Self {
        self.params.max_alt_error = v;
        self
    }
    pub fn far_lat_error(mut self, v: Degree) -> Self {
        self.params.far_lat_error = v;
        self
    }
    pub fn far_lon_error(mut self, v: Degree) -> Self {
        self.params.far_lon_error = v;
        self
    }
    pub fn far_alt_error(mut self, v: Kilometer) -> Self {
        self.params.far_alt_error = v;
        self
    }

    // --- Mean anomaly ---
    pub fn mean_anomaly_sweep(mut self, v: u32) -> Self {
        self.params.mean_anomaly_sweep = v;
        self
    }
    pub fn mean_anomaly_direction_skip(mut self, v: u32) -> Self {
        self.params.mean_anomaly_direction_skip = v;
        self
    }
    pub fn mean_anomaly_far_skip(mut self, v: u32) -> Self {
        self.params.mean_anomaly_far_skip = v;
        self
    }

    // --- Argument of perigee ---
    pub fn arg_perigee_sweep(mut self, v: u32) -> Self {
        self.params.arg_perigee_sweep = v;
        self
    }
    pub fn arg_perigee_start_offset(mut self, v: u32) -> Self {
        self.params.arg_perigee_start_offset = v;
        self
    }
    pub fn arg_perigee_far_skip(mut self, v: u32) -> Self {
        self.params.arg_perigee_far_skip = v;
        self
    }
    pub fn arg_perigee_direction_skip(mut self, v: u32) -> Self {
        self.params.arg_perigee_direction_skip = v;
        self
    }
    pub fn arg_perigee_mean_anomaly_far_skip(mut self, v: u32) -> Self {
        self.params.arg_perigee_mean_anomaly_far_skip = v;
        self
    }

    // --- RAAN ---
    pub fn raan_sweep(mut self, v: u32) -> Self {
        self.params.raan_sweep = v;
        self
    }
    pub fn raan_far_skip(mut self, v: u32) -> Self {
        self.params.raan_far_skip = v;
        self
    }

    #[inline]
    fn gt0(x: f64) -> bool {
        x.is_finite() && x > 0.0
    }

    /// Finalize the builder.
    ///
    /// Return
    /// ----------
    /// * `Ok(FinderParams)` if every rule listed on [`FinderParams`] holds.
    /// * `Err(OrbitFinderError::InvalidFinderParameter)` naming the first offending field.
    pub fn build(self) -> Result<FinderParams, OrbitFinderError> {
        let p = &self.params;

        let tolerances = [
            ("max_lat_error", p.max_lat_error, "far_lat_error", p.far_lat_error),
            ("max_lon_error", p.max_lon_error, "far_lon_error", p.far_lon_error),
            ("max_alt_error", p.max_alt_error, "far_alt_error", p.far_alt_error),
        ];
        for (name, tolerance, far_name, far) in tolerances {
            if !Self::gt0(tolerance) {
                return Err(OrbitFinderError::InvalidFinderParameter(format!(
                    "{name} must be > 0"
                )));
            }
            if !far.is_finite() || far < tolerance {
                return Err(OrbitFinderError::InvalidFinderParameter(format!(
                    "{far_name} must be >= {name}"
                )));
            }
        }

        let sweeps = [
            ("mean_anomaly_sweep", p.mean_anomaly_sweep),
            ("arg_perigee_sweep", p.arg_perigee_sweep),
            ("raan_sweep", p.raan_sweep),
        ];
        for (name, steps) in sweeps {
            if steps == 0 {
                return Err(OrbitFinderError::InvalidFinderParameter(format!(
                    "{name} must be >= 1"
                )));
            }
        }

        Ok(self.params)
    }
}

impl fmt::Display for FinderParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            const PARAM_COL: usize = 46;
            writeln!(f, "Orbit Finder Parameters")?;
            writeln!(f, "-----------------------")?;

            macro_rules! line {
                ($fmt:expr, $val:expr, $comment:expr) => {{
                    let s = format!($fmt, $val);
                    let pad = if s.len() < PARAM_COL {
                        " ".repeat(PARAM_COL - s.len())
                    } else {
                        " ".to_string()
                    };
                    writeln!(f, "  {}{}# {}", s, pad, $comment)
                }};
            }

            writeln!(f, "[Tolerances]")?;
            line!("max_lat_error = {:.3} deg", self.max_lat_error, "Latitude acceptance")?;
            line!("max_lon_error = {:.3} deg", self.max_lon_error, "Longitude acceptance")?;
            line!("max_alt_error = {:.1} km", self.max_alt_error, "Altitude acceptance")?;
            line!("far_lat_error = {:.1} deg", self.far_lat_error, "Latitude far threshold")?;
            line!("far_lon_error = {:.1} deg", self.far_lon_error, "Longitude far threshold")?;
            line!("far_alt_error = {:.1} km", self.far_alt_error, "Altitude far threshold")?;

            writeln!(f, "\n[Mean anomaly sweep]")?;
            line!(
                "mean_anomaly_sweep          = {}",
                self.mean_anomaly_sweep,
                "0.1 deg steps"
            )?;
            line!(
                "mean_anomaly_direction_skip = {}",
                self.mean_anomaly_direction_skip,
                "Extra steps after wrong direction"
            )?;
            line!(
                "mean_anomaly_far_skip       = {}",
                self.mean_anomaly_far_skip,
                "Extra steps after Far"
            )?;

            writeln!(f, "\n[Argument of perigee sweep]")?;
            line!(
                "arg_perigee_sweep                 = {}",
                self.arg_perigee_sweep,
                "0.1 deg offsets"
            )?;
            line!(
                "arg_perigee_start_offset          = {}",
                self.arg_perigee_start_offset,
                "Steps before the initial value"
            )?;
            line!(
                "arg_perigee_far_skip              = {}",
                self.arg_perigee_far_skip,
                "Extra steps after altitude Far"
            )?;
            line!(
                "arg_perigee_direction_skip        = {}",
                self.arg_perigee_direction_skip,
                "Re-search ended on wrong direction"
            )?;
            line!(
                "arg_perigee_mean_anomaly_far_skip = {}",
                self.arg_perigee_mean_anomaly_far_skip,
                "Re-search ended on Far"
            )?;

            writeln!(f, "\n[RAAN sweep]")?;
            line!("raan_sweep    = {}", self.raan_sweep, "0.01 deg steps")?;
            line!("raan_far_skip = {}", self.raan_far_skip, "Extra steps after Far")?;

            Ok(())
        } else {
            write!(
                f,
                "FinderParams(lat±{:.2}°, lon±{:.2}°, alt±{:.1}km, far=({:.1}°, {:.1}°, {:.1}km), sweeps=({}, {}, {}))",
                self.max_lat_error,
                self.max_lon_error,
                self.max_alt_error,
                self.far_lat_error,
                self.far_lon_error,
                self.far_alt_error,
                self.mean_anomaly_sweep,
                self.arg_perigee_sweep,
                self.raan_sweep,
            )
        }
    }
}
