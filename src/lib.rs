//! Rotate a two-line element set so that its ground track passes over a chosen point.
//!
//! Start with [`OrbitFinder`](crate::orbit_finder::OrbitFinder).
pub mod constants;
pub mod geodetic;
pub mod orbit_finder;
pub mod orbit_finder_errors;
pub mod propagator;
pub mod search;
pub mod time;
pub mod tle;

pub use orbit_finder::{OrbitFinder, PhasePropagations, RotatedOrbit};
pub use orbit_finder_errors::OrbitFinderError;
pub use propagator::{Propagator, Sgp4Propagator, TimeVariables};
pub use search::{Direction, FinderParams, SearchTarget};
pub use tle::OrbitalElementSet;
