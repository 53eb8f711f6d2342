//! Survey position resolver
//!
//! Fills in survey positions that have not been computed yet by walking the
//! survey list with the minimum curvature step. Known components are kept
//! as supplied.

use tracing::debug;

use super::min_curvature::advance;
use super::variance::sorted_by_md;
use crate::types::{GeoValue, StationGeometry, SurveyStation, TieIn};

/// Return a copy of `surveys`, sorted by MD, with every unresolved
/// TVD/northing/easting computed from the previous station (the first from
/// `tie_in`).
pub fn resolve_positions(surveys: &[SurveyStation], tie_in: &TieIn) -> Vec<SurveyStation> {
    let mut resolved = sorted_by_md(surveys);
    let mut prev = tie_in.as_survey();
    let mut filled = 0usize;

    for station in &mut resolved {
        if !station.is_resolved() {
            let step = advance(
                prev.inc,
                prev.azi,
                station.inc,
                station.azi,
                station.md - prev.md,
            );
            station.tvd = fill(station.tvd, prev.tvd() + step.tvd_delta);
            station.northing = fill(station.northing, prev.northing() + step.ns_delta);
            station.easting = fill(station.easting, prev.easting() + step.ew_delta);
            filled += 1;
        }
        prev = *station;
    }

    if filled > 0 {
        debug!(filled, total = resolved.len(), "Resolved survey positions");
    }
    resolved
}

fn fill(value: GeoValue, computed: f64) -> GeoValue {
    match value {
        GeoValue::Known(_) => value,
        GeoValue::Unresolved => GeoValue::Known(computed),
    }
}
