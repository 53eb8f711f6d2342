//! Variance Engine
//!
//! Compares every actual survey station against the plan position at the
//! same MD. Output is a fresh list in MD order, one entry per station; the
//! input stations are never touched.

use tracing::debug;

use super::limits::classify_axes;
use super::min_curvature::dogleg_severity;
use super::plan_match::position_at;
use super::vertical_section::vertical_section;
use super::{azimuth_difference, build_rate, check_md_order, required_rate, turn_rate};
use crate::types::{
    Deviation, Limits, Plan, PlanPoint, StationGeometry, Status, SurveyStation, Variance,
    VarianceSummary,
};

/// Deltas between an actual point and its matched plan point.
pub fn deviation_from_plan<S>(actual: &S, actual_vs: f64, plan: &PlanPoint) -> Deviation
where
    S: StationGeometry + ?Sized,
{
    let tvd = actual.tvd() - plan.tvd;
    let dn = actual.northing() - plan.northing;
    let de = actual.easting() - plan.easting;

    Deviation {
        tvd,
        vs: actual_vs - plan.vs,
        closure: dn.hypot(de),
        distance_3d: (tvd * tvd + dn * dn + de * de).sqrt(),
        inc: actual.inc() - plan.inc,
        azi: azimuth_difference(actual.azi(), plan.azi),
    }
}

/// Copy of `surveys` sorted ascending by MD (stable for equal MDs).
pub fn sorted_by_md(surveys: &[SurveyStation]) -> Vec<SurveyStation> {
    let mut sorted = surveys.to_vec();
    sorted.sort_by(|a, b| a.md.total_cmp(&b.md));
    sorted
}

/// Per-station variance against `plan`.
///
/// Empty plan or no surveys yields an empty list. The first station has no
/// predecessor, so its DLS and build/turn rates are 0 with
/// `rates_available == false`.
pub fn compute_variances(
    surveys: &[SurveyStation],
    plan: &Plan,
    limits: &Limits,
    vs_azimuth: f64,
    correction_interval: f64,
) -> Vec<Variance> {
    if surveys.is_empty() || plan.is_empty() {
        return Vec::new();
    }

    check_md_order("surveys", surveys.iter().map(|s| s.md));
    let sorted = sorted_by_md(surveys);

    let mut variances = Vec::with_capacity(sorted.len());
    let mut prev: Option<&SurveyStation> = None;

    for station in &sorted {
        let Some(plan_point) = position_at(plan, station.md, vs_azimuth) else {
            break;
        };

        let vs = vertical_section(station.northing(), station.easting(), vs_azimuth);
        let deviation = deviation_from_plan(station, vs, &plan_point);

        let (dls, build, turn, rates_available) = match prev {
            Some(p) if station.md > p.md => {
                let course = station.md - p.md;
                (
                    dogleg_severity(p.inc, p.azi, station.inc, station.azi, course),
                    build_rate(p.inc, station.inc, course),
                    turn_rate(p.azi, station.azi, course),
                    true,
                )
            }
            _ => (0.0, 0.0, 0.0, false),
        };

        let statuses = classify_axes(
            limits,
            dls,
            deviation.distance_3d,
            deviation.tvd.abs(),
            deviation.closure,
        );

        variances.push(Variance {
            md: station.md,
            inc: station.inc,
            azi: station.azi,
            tvd: station.tvd,
            northing: station.northing,
            easting: station.easting,
            vs,
            plan: plan_point,
            deviation,
            dls,
            build_rate: build,
            turn_rate: turn,
            rates_available,
            required_build_rate: required_rate(deviation.inc, correction_interval),
            required_turn_rate: required_rate(deviation.azi, correction_interval),
            statuses,
            status: statuses.overall(),
        });

        prev = Some(station);
    }

    debug!(stations = variances.len(), plan = %plan.name, "Variances computed");
    variances
}

/// Counts and maxima over a variance list.
pub fn summarize(variances: &[Variance]) -> VarianceSummary {
    variances.iter().fold(
        VarianceSummary {
            station_count: variances.len(),
            ..VarianceSummary::default()
        },
        |mut acc, v| {
            match v.status {
                Status::Alarm => acc.alarm_count += 1,
                Status::Warning => acc.warning_count += 1,
                Status::Ok => {}
            }
            acc.max_distance_3d = acc.max_distance_3d.max(v.deviation.distance_3d);
            acc.max_dls = acc.max_dls.max(v.dls);
            acc.max_tvd_variance = acc.max_tvd_variance.max(v.deviation.tvd.abs());
            acc
        },
    )
}
