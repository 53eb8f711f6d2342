//! Bit Projection Engine
//!
//! Extrapolates from the last known station (last scenario station if a
//! chain exists, otherwise the last survey) to the bit, then compares the
//! bit against the plan exactly like an ordinary station.

use tracing::debug;

use super::limits::classify_axes;
use super::plan_match::{md_at_tvd, position_at};
use super::projector::project;
use super::variance::{deviation_from_plan, sorted_by_md};
use super::{build_rate, normalize_azimuth, required_rate, turn_rate};
use crate::config::defaults::{
    BISECTION_ITERATIONS, DLS_REFERENCE_LENGTH_M, MIN_COS_FOR_HOLD, TARGET_TVD_TOLERANCE_M,
};
use crate::types::{
    BitProjection, BitProjectionConfig, Limits, Plan, ProjectionSource, ScenarioLeg,
    ScenarioStation, StationGeometry, SurveyStation,
};

/// Everything the bit projection reads. Borrowed snapshot, never mutated.
#[derive(Debug, Clone, Copy)]
pub struct BitProjectionInputs<'a> {
    pub surveys: &'a [SurveyStation],
    pub scenario: &'a [ScenarioStation],
    pub plan: Option<&'a Plan>,
    pub limits: &'a Limits,
    pub vs_azimuth: f64,
    pub config: &'a BitProjectionConfig,
    pub correction_interval: f64,
}

/// Project the bit ahead of the last known station.
///
/// `None` when there is no plan (or it has no stations), or when there is
/// neither a survey nor a scenario station to start from.
pub fn project_bit(inputs: &BitProjectionInputs<'_>) -> Option<BitProjection> {
    let plan = inputs.plan.filter(|p| !p.is_empty())?;
    let surveys = sorted_by_md(inputs.surveys);

    let (source, last, prev) = last_two_known(inputs.scenario, &surveys)?;

    let config = inputs.config;
    let (applied_build, applied_turn) = match prev {
        Some(p) if config.apply_rates => {
            let course = last.md() - p.md();
            (build_rate(p.inc(), last.inc(), course), turn_rate(p.azi(), last.azi(), course))
        }
        _ => (0.0, 0.0),
    };

    let distance = config.survey_to_bit_distance;
    let span = distance / DLS_REFERENCE_LENGTH_M;
    let leg = ScenarioLeg::new(
        distance,
        last.inc() + applied_build * span,
        normalize_azimuth(last.azi() + applied_turn * span),
    );
    let bit = project(last, leg, inputs.vs_azimuth);

    let plan_point = position_at(plan, bit.md, inputs.vs_azimuth)?;
    let deviation = deviation_from_plan(&bit, bit.vs, &plan_point);

    let (distance_to_target, required_build_rate_to_target) = match config.target_tvd {
        Some(target) if (target - plan_point.tvd).abs() > TARGET_TVD_TOLERANCE_M => {
            let gap = target - bit.tvd;
            let distance = distance_to_target(plan, target, &bit, gap);
            let rate = distance.map(|d| constant_build_rate_for_tvd(bit.inc, gap, d));
            (distance, rate)
        }
        _ => (None, None),
    };

    let statuses = classify_axes(
        inputs.limits,
        bit.dls,
        deviation.distance_3d,
        deviation.tvd.abs(),
        deviation.closure,
    );

    debug!(
        bit_md = bit.md,
        bit_tvd = bit.tvd,
        distance_3d = deviation.distance_3d,
        status = %statuses.overall(),
        "Bit projected"
    );

    Some(BitProjection {
        source,
        from_md: last.md(),
        md: bit.md,
        inc: bit.inc,
        azi: bit.azi,
        tvd: bit.tvd,
        northing: bit.northing,
        easting: bit.easting,
        vs: bit.vs,
        dls: bit.dls,
        applied_build_rate: applied_build,
        applied_turn_rate: applied_turn,
        plan: plan_point,
        deviation,
        required_build_rate: required_rate(deviation.inc, inputs.correction_interval),
        required_turn_rate: required_rate(deviation.azi, inputs.correction_interval),
        target_tvd: config.target_tvd,
        distance_to_target,
        required_build_rate_to_target,
        statuses,
        status: statuses.overall(),
    })
}

type KnownStation<'s> = &'s dyn StationGeometry;

/// The last known station and the one before it, scenario chain first.
fn last_two_known<'s>(
    scenario: &'s [ScenarioStation],
    surveys: &'s [SurveyStation],
) -> Option<(ProjectionSource, KnownStation<'s>, Option<KnownStation<'s>>)> {
    let as_known = |s: &'s SurveyStation| s as KnownStation<'s>;

    match scenario {
        [.., before, last] => Some((
            ProjectionSource::Scenario,
            last as KnownStation<'s>,
            Some(before as KnownStation<'s>),
        )),
        [last] => Some((
            ProjectionSource::Scenario,
            last as KnownStation<'s>,
            surveys.last().map(as_known),
        )),
        [] => match surveys {
            [.., before, last] => Some((ProjectionSource::Survey, as_known(last), Some(as_known(before)))),
            [last] => Some((ProjectionSource::Survey, as_known(last), None)),
            [] => None,
        },
    }
}

/// Along-hole distance over which the bit should reach `target`.
///
/// Uses where the plan itself reaches the target ahead of the bit; if it
/// never does, the distance needed holding the bit's inclination.
fn distance_to_target(plan: &Plan, target: f64, bit: &ScenarioStation, gap: f64) -> Option<f64> {
    let along_plan = md_at_tvd(plan, target, bit.md)
        .map(|md| md - bit.md)
        .filter(|d| *d > 0.0);

    along_plan.or_else(|| {
        let cos_inc = bit.inc.to_radians().cos();
        if cos_inc.abs() < MIN_COS_FOR_HOLD {
            return None;
        }
        Some(gap / cos_inc).filter(|d| *d > 0.0)
    })
}

/// Mean of cos(θ) over [a, b] (radians).
fn mean_cos(a: f64, b: f64) -> f64 {
    if (b - a).abs() < 1e-12 {
        a.cos()
    } else {
        (b.sin() - a.sin()) / (b - a)
    }
}

/// Constant vertical-plane build rate (deg/30m) starting at `inc_deg` that
/// gains `tvd_gap` of depth over `distance` along hole.
///
/// Over a constant-build arc TVD gained is `distance` times the mean cosine
/// of the inclination, which is monotonic in the final inclination on
/// [0°, 180°]; the final inclination is found by bisection and clamped to
/// that range when the gap is unreachable.
pub fn constant_build_rate_for_tvd(inc_deg: f64, tvd_gap: f64, distance: f64) -> f64 {
    if distance <= 0.0 {
        return 0.0;
    }
    let start = inc_deg.to_radians().clamp(0.0, std::f64::consts::PI);
    let wanted = tvd_gap / distance;

    // mean_cos decreases as the final inclination grows
    let (mut lo, mut hi) = (0.0_f64, std::f64::consts::PI);
    for _ in 0..BISECTION_ITERATIONS {
        let mid = 0.5 * (lo + hi);
        if mean_cos(start, mid) > wanted {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    let end = 0.5 * (lo + hi);

    (end - start).to_degrees() * DLS_REFERENCE_LENGTH_M / distance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PlanStation, Status};

    fn plan() -> Plan {
        // Vertical to 500, then build 3 deg/30m due east
        Plan::new(
            "Build",
            1,
            vec![
                PlanStation::new(0.0, 0.0, 90.0, 0.0, 0.0, 0.0),
                PlanStation::new(500.0, 0.0, 90.0, 500.0, 0.0, 0.0),
                PlanStation::new(800.0, 30.0, 90.0, 785.0, 0.0, 76.0),
                PlanStation::new(1200.0, 30.0, 90.0, 1131.4, 0.0, 276.0),
            ],
        )
    }

    fn base_config() -> BitProjectionConfig {
        BitProjectionConfig {
            survey_to_bit_distance: 15.0,
            apply_rates: false,
            target_tvd: None,
        }
    }

    fn inputs<'a>(
        surveys: &'a [SurveyStation],
        scenario: &'a [ScenarioStation],
        plan: Option<&'a Plan>,
        limits: &'a Limits,
        config: &'a BitProjectionConfig,
    ) -> BitProjectionInputs<'a> {
        BitProjectionInputs {
            surveys,
            scenario,
            plan,
            limits,
            vs_azimuth: 90.0,
            config,
            correction_interval: 30.0,
        }
    }

    #[test]
    fn test_nil_without_stations() {
        let (p, limits, cfg) = (plan(), Limits::default(), base_config());
        assert!(project_bit(&inputs(&[], &[], Some(&p), &limits, &cfg)).is_none());
    }

    #[test]
    fn test_nil_without_plan() {
        let surveys = [SurveyStation::new(600.0, 10.0, 90.0).with_position(599.0, 0.0, 9.0)];
        let (limits, cfg) = (Limits::default(), base_config());
        assert!(project_bit(&inputs(&surveys, &[], None, &limits, &cfg)).is_none());

        let empty = Plan::new("Empty", 0, Vec::new());
        assert!(project_bit(&inputs(&surveys, &[], Some(&empty), &limits, &cfg)).is_none());
    }

    #[test]
    fn test_hold_projection() {
        let surveys = [
            SurveyStation::new(570.0, 5.0, 90.0).with_position(569.9, 0.0, 1.0),
            SurveyStation::new(600.0, 10.0, 90.0).with_position(599.7, 0.0, 4.9),
        ];
        let (p, limits, cfg) = (plan(), Limits::default(), base_config());
        let bit = project_bit(&inputs(&surveys, &[], Some(&p), &limits, &cfg)).unwrap();

        assert_eq!(bit.source, ProjectionSource::Survey);
        assert_eq!(bit.from_md, 600.0);
        assert!((bit.md - 615.0).abs() < 1e-9);
        assert_eq!(bit.inc, 10.0);
        assert_eq!(bit.applied_build_rate, 0.0);
        assert_eq!(bit.dls, 0.0);
        let expected_tvd = 599.7 + 15.0 * 10.0_f64.to_radians().cos();
        assert!((bit.tvd - expected_tvd).abs() < 1e-9);
        assert!(bit.distance_to_target.is_none());
    }

    #[test]
    fn test_apply_rates_extrapolates() {
        let surveys = [
            SurveyStation::new(570.0, 5.0, 90.0).with_position(569.9, 0.0, 1.0),
            SurveyStation::new(600.0, 8.0, 92.0).with_position(599.7, 0.0, 3.5),
        ];
        let (p, limits) = (plan(), Limits::default());
        let cfg = BitProjectionConfig {
            apply_rates: true,
            ..base_config()
        };
        let bit = project_bit(&inputs(&surveys, &[], Some(&p), &limits, &cfg)).unwrap();

        assert!((bit.applied_build_rate - 3.0).abs() < 1e-9);
        assert!((bit.applied_turn_rate - 2.0).abs() < 1e-9);
        // Half a reference length at 3 deg/30m
        assert!((bit.inc - 9.5).abs() < 1e-9);
        assert!((bit.azi - 93.0).abs() < 1e-9);
        assert!((bit.dls - 3.0).abs() < 0.2);
    }

    #[test]
    fn test_projects_from_last_scenario_station() {
        let surveys = [SurveyStation::new(600.0, 10.0, 90.0).with_position(599.7, 0.0, 4.9)];
        let scenario = [project(&surveys[0], ScenarioLeg::new(30.0, 12.0, 90.0), 90.0)];
        let (p, limits) = (plan(), Limits::default());
        let cfg = BitProjectionConfig {
            apply_rates: true,
            ..base_config()
        };
        let bit = project_bit(&inputs(&surveys, &scenario, Some(&p), &limits, &cfg)).unwrap();

        assert_eq!(bit.source, ProjectionSource::Scenario);
        assert_eq!(bit.from_md, 630.0);
        // Rate derived from the last survey -> scenario leg: 2 deg over 30 m
        assert!((bit.applied_build_rate - 2.0).abs() < 1e-9);
        assert!((bit.md - 645.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_survey_has_no_rates() {
        let surveys = [SurveyStation::new(600.0, 10.0, 90.0).with_position(599.7, 0.0, 4.9)];
        let (p, limits) = (plan(), Limits::default());
        let cfg = BitProjectionConfig {
            apply_rates: true,
            ..base_config()
        };
        let bit = project_bit(&inputs(&surveys, &[], Some(&p), &limits, &cfg)).unwrap();
        assert_eq!(bit.applied_build_rate, 0.0);
        assert_eq!(bit.inc, 10.0);
    }

    #[test]
    fn test_target_tvd_follows_plan() {
        let surveys = [SurveyStation::new(600.0, 10.0, 90.0).with_position(599.7, 0.0, 4.9)];
        let (p, limits) = (plan(), Limits::default());
        let cfg = BitProjectionConfig {
            target_tvd: Some(785.0),
            ..base_config()
        };
        let bit = project_bit(&inputs(&surveys, &[], Some(&p), &limits, &cfg)).unwrap();

        // Plan reaches 785 at MD 800
        let distance = bit.distance_to_target.unwrap();
        assert!((distance - (800.0 - bit.md)).abs() < 1e-6);
        let rate = bit.required_build_rate_to_target.unwrap();
        assert!(rate.is_finite());
        assert_eq!(bit.status.max(Status::Ok), bit.status);
    }

    #[test]
    fn test_target_equal_to_plan_is_ignored() {
        let surveys = [SurveyStation::new(600.0, 10.0, 90.0).with_position(599.7, 0.0, 4.9)];
        let (p, limits) = (plan(), Limits::default());
        let probe = project_bit(&inputs(&surveys, &[], Some(&p), &limits, &base_config())).unwrap();
        let cfg = BitProjectionConfig {
            target_tvd: Some(probe.plan.tvd),
            ..base_config()
        };
        let bit = project_bit(&inputs(&surveys, &[], Some(&p), &limits, &cfg)).unwrap();
        assert!(bit.distance_to_target.is_none());
        assert!(bit.required_build_rate_to_target.is_none());
    }

    #[test]
    fn test_constant_build_rate_for_tvd() {
        // Holding 30 deg over 100 m gains 100·cos30 of TVD: no build needed
        let hold_gap = 100.0 * 30.0_f64.to_radians().cos();
        assert!(constant_build_rate_for_tvd(30.0, hold_gap, 100.0).abs() < 1e-6);

        // Quarter circle from vertical to horizontal, R = 100:
        // length 157.08 m, TVD gain 100 m, build 90 deg over that length
        let length = 100.0 * std::f64::consts::FRAC_PI_2;
        let rate = constant_build_rate_for_tvd(0.0, 100.0, length);
        assert!((rate - 90.0 * 30.0 / length).abs() < 1e-6);

        // Horizontal, target deeper: must drop (negative build)
        assert!(constant_build_rate_for_tvd(90.0, 10.0, 100.0) < 0.0);

        assert_eq!(constant_build_rate_for_tvd(30.0, 10.0, 0.0), 0.0);
    }
}
