//! Trajectory Projector
//!
//! Advances any station, real or synthetic, by one course (distance, inc,
//! azi) and returns the new station with its position, VS and dogleg.

use tracing::warn;

use super::min_curvature::advance;
use super::normalize_azimuth;
use super::vertical_section::vertical_section;
use crate::types::{ScenarioLeg, ScenarioStation, StationGeometry};

/// Project one leg forward from `from`.
///
/// A non-positive leg distance leaves the position and MD unchanged (the
/// kernel returns zero deltas); callers should avoid such legs.
pub fn project<S>(from: &S, leg: ScenarioLeg, vs_azimuth: f64) -> ScenarioStation
where
    S: StationGeometry + ?Sized,
{
    if leg.distance <= 0.0 {
        warn!(
            from_md = from.md(),
            distance = leg.distance,
            "Non-positive projection distance, position held"
        );
    }

    let step = advance(from.inc(), from.azi(), leg.inc, leg.azi, leg.distance);
    let northing = from.northing() + step.ns_delta;
    let easting = from.easting() + step.ew_delta;

    ScenarioStation {
        leg,
        md: from.md() + leg.distance.max(0.0),
        inc: leg.inc,
        azi: normalize_azimuth(leg.azi),
        tvd: from.tvd() + step.tvd_delta,
        northing,
        easting,
        vs: vertical_section(northing, easting, vs_azimuth),
        dogleg_deg: step.dogleg_deg(),
        dls: step.dls,
    }
}
