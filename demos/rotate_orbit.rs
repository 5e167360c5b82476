use std::env;
use std::error::Error;
use std::fs;
use std::str::FromStr;

use hifitime::Epoch;
use orbit_finder::search::{Direction, FinderParams, SearchTarget};
use orbit_finder::{OrbitFinder, OrbitalElementSet};
use tracing_subscriber::EnvFilter;

const ISS_TLE: &str = "ISS (ZARYA)
1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927
2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537";

fn take_flag(args: &mut Vec<String>, flag: &str) -> Option<String> {
    let pos = args.iter().position(|a| a == flag)?;
    args.remove(pos);
    (pos < args.len()).then(|| args.remove(pos))
}

/// Rotate a TLE so that its ground track crosses a point at a given time.
/// Usage:
///   rotate_orbit <lat> <lon> <N|S> [alt_km] [raan_offset] [--tle FILE] [--at EPOCH]
/// Example:
///   RUST_LOG=orbit_finder=debug rotate_orbit 48.85 2.35 N --at "2008-09-21T12:00:00 UTC"
///
/// Without `--tle` the ISS element set of 2008-09-20 is used; without `--at` the reference
/// time is one day after its epoch.
fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let mut args = env::args().skip(1).collect::<Vec<_>>();
    let tle_text = match take_flag(&mut args, "--tle") {
        Some(path) => fs::read_to_string(path)?,
        None => ISS_TLE.to_string(),
    };
    let at = take_flag(&mut args, "--at");

    if args.len() < 3 {
        eprintln!("usage: rotate_orbit <lat> <lon> <N|S> [alt_km] [raan_offset] [--tle FILE] [--at EPOCH]");
        std::process::exit(2);
    }

    let elements = OrbitalElementSet::from_str(&tle_text)?;
    let reference_time = match at {
        Some(text) => Epoch::from_str(&text)?,
        None => elements.epoch()? + hifitime::Unit::Day * 1,
    };

    let mut target = SearchTarget::new(
        args[0].parse()?,
        args[1].parse()?,
        args[2].parse::<Direction>()?,
        reference_time,
    )?;
    if let Some(alt) = args.get(3) {
        target = target.with_altitude(alt.parse()?);
    }
    if let Some(offset) = args.get(4) {
        target = target.with_raan_offset(offset.parse()?);
    }

    let finder = OrbitFinder::new(FinderParams::default());
    tracing::info!("{:#}", finder.params());

    let rotated = finder.rotate_elements(&elements, &target)?;
    tracing::info!(
        propagations = rotated.propagations.total(),
        "rotated orbit for target ({}, {}, {}) at {}",
        target.latitude,
        target.longitude,
        target.direction,
        target.reference_time
    );
    println!("{rotated}");

    Ok(())
}
