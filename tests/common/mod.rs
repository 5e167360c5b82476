#![allow(dead_code)]

use hifitime::Epoch;
use orbit_finder::geodetic::{eci_to_geodetic, Geodetic};
use orbit_finder::propagator::{Propagator, Sgp4Propagator};

pub const ISS_LINE1: &str =
    "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927";
pub const ISS_LINE2: &str =
    "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537";

/// About one day after the ISS element set epoch.
pub fn reference_time() -> Epoch {
    Epoch::from_gregorian_utc_hms(2008, 9, 21, 12, 0, 0)
}

/// Re-propagate a TLE with SGP4 and return its ground point at `at`.
pub fn ground_point(line1: &str, line2: &str, at: &Epoch) -> Geodetic {
    let propagator = Sgp4Propagator;
    let record = propagator.init(line1, line2).unwrap();
    let tv = propagator.time_variables(&record, at);
    let position = propagator.propagate(&record, tv.minutes_since_epoch);
    eci_to_geodetic(&position, tv.gmst)
}
