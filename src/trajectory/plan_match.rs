//! Plan position lookup at an arbitrary MD
//!
//! Matching policy:
//! - a plan station within `MD_MATCH_TOLERANCE_M` of the MD is used as-is
//! - strictly between two stations, TVD/N/E and inclination are linearly
//!   interpolated; azimuth follows the shortest turn between the two
//! - outside the plan's MD range the nearest end station is used
//!
//! Plan build/turn rates come from the bracketing segment (the first or
//! last segment when the MD is off either end).

use super::vertical_section::vertical_section;
use super::{azimuth_difference, build_rate, normalize_azimuth, turn_rate};
use crate::config::defaults::MD_MATCH_TOLERANCE_M;
use crate::types::{Plan, PlanMatch, PlanPoint, PlanStation};

/// Plan position at `md`, or `None` for a plan without stations.
pub fn position_at(plan: &Plan, md: f64, vs_azimuth: f64) -> Option<PlanPoint> {
    let stations = &plan.stations;
    let len = stations.len();
    if len == 0 {
        return None;
    }

    let idx = stations.partition_point(|s| s.md < md - MD_MATCH_TOLERANCE_M);

    let (point, matched, segment) = if idx < len && (stations[idx].md - md).abs() <= MD_MATCH_TOLERANCE_M {
        let segment = if idx > 0 { (idx - 1, idx) } else { (0, 1) };
        (stations[idx], PlanMatch::Exact, segment)
    } else if idx == 0 {
        (stations[0], PlanMatch::Nearest, (0, 1))
    } else if idx == len {
        (stations[len - 1], PlanMatch::Nearest, (len.saturating_sub(2), len - 1))
    } else {
        let (lo, hi) = (&stations[idx - 1], &stations[idx]);
        (interpolate(lo, hi, md), PlanMatch::Interpolated, (idx - 1, idx))
    };

    let (build, turn) = segment_rates(stations, segment);

    Some(PlanPoint {
        md,
        inc: point.inc,
        azi: normalize_azimuth(point.azi),
        tvd: point.tvd,
        northing: point.northing,
        easting: point.easting,
        vs: vertical_section(point.northing, point.easting, vs_azimuth),
        matched,
        build_rate: build,
        turn_rate: turn,
    })
}

fn interpolate(lo: &PlanStation, hi: &PlanStation, md: f64) -> PlanStation {
    let span = hi.md - lo.md;
    let t = if span > 0.0 { (md - lo.md) / span } else { 0.0 };
    let lerp = |a: f64, b: f64| a + (b - a) * t;

    PlanStation {
        md,
        inc: lerp(lo.inc, hi.inc),
        azi: lo.azi + azimuth_difference(hi.azi, lo.azi) * t,
        tvd: lerp(lo.tvd, hi.tvd),
        northing: lerp(lo.northing, hi.northing),
        easting: lerp(lo.easting, hi.easting),
        vs: None,
    }
}

fn segment_rates(stations: &[PlanStation], (lo, hi): (usize, usize)) -> (f64, f64) {
    match (stations.get(lo), stations.get(hi)) {
        (Some(a), Some(b)) if lo != hi => {
            let course = b.md - a.md;
            (build_rate(a.inc, b.inc, course), turn_rate(a.azi, b.azi, course))
        }
        _ => (0.0, 0.0),
    }
}

/// First MD at or beyond `from_md` where the plan reaches `target_tvd`.
///
/// Walks the plan forward from its position at `from_md` and linearly
/// interpolates the crossing. `None` if the plan never reaches the target
/// ahead of `from_md`.
pub fn md_at_tvd(plan: &Plan, target_tvd: f64, from_md: f64) -> Option<f64> {
    let start = position_at(plan, from_md, 0.0)?;
    let ahead = plan
        .stations
        .iter()
        .filter(|s| s.md > from_md + MD_MATCH_TOLERANCE_M)
        .map(|s| (s.md, s.tvd));

    let mut prev = (from_md, start.tvd);
    if (prev.1 - target_tvd).abs() <= MD_MATCH_TOLERANCE_M {
        return Some(from_md);
    }

    for (md, tvd) in ahead {
        let (prev_md, prev_tvd) = prev;
        let crosses = (prev_tvd - target_tvd) * (tvd - target_tvd) <= 0.0;
        if crosses && tvd != prev_tvd {
            let t = (target_tvd - prev_tvd) / (tvd - prev_tvd);
            return Some(prev_md + t * (md - prev_md));
        }
        prev = (md, tvd);
    }
    None
}
