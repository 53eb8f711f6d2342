//! Trajectory Regression Tests
//!
//! Numerical properties of the minimum curvature kernel and the layers built
//! on it: singularity handling, path symmetry, status precedence, scenario
//! propagation and the bit projection guards.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use wellpath::trajectory::{
    advance, classify, classify_axes, project, project_bit, ratio_factor, required_rate,
    BitProjectionInputs,
};
use wellpath::{
    BitProjectionConfig, Limits, Plan, PlanStation, ProjectionSource, ScenarioChain, ScenarioLeg,
    Status, SurveyStation,
};

fn approx(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}

/// Straight hold plan at 30° inclination, azimuth 90°, stations every 30 m.
fn hold_plan(from_md: f64, to_md: f64) -> Plan {
    let inc = 30.0_f64;
    let mut stations = Vec::new();
    let mut md = from_md;
    while md <= to_md {
        let along = md - from_md;
        stations.push(PlanStation::new(
            md,
            inc,
            90.0,
            900.0 + along * inc.to_radians().cos(),
            0.0,
            along * inc.to_radians().sin(),
        ));
        md += 30.0;
    }
    Plan::new("Hold", 1, stations)
}

// ============================================================================
// Minimum Curvature Kernel
// ============================================================================

#[test]
fn zero_dogleg_is_a_straight_line() {
    let step = advance(30.0, 45.0, 30.0, 45.0, 100.0);
    let (i, a) = (30.0_f64.to_radians(), 45.0_f64.to_radians());

    assert_eq!(step.dogleg_rad, 0.0);
    assert_eq!(step.dls, 0.0);
    assert!(approx(step.tvd_delta, 100.0 * i.cos(), 1e-9));
    assert!(approx(step.ns_delta, 100.0 * i.sin() * a.cos(), 1e-9));
    assert!(approx(step.ew_delta, 100.0 * i.sin() * a.sin(), 1e-9));
}

#[test]
fn identical_directions_give_zero_dogleg_everywhere() {
    for inc in [10.0, 35.0, 45.0, 60.0, 89.0] {
        for azi in [0.0, 90.0, 210.0, 333.3] {
            let step = advance(inc, azi, inc, azi, 15.0);
            assert_eq!(step.dogleg_rad, 0.0, "inc {inc} azi {azi}");
            assert_eq!(step.dls, 0.0, "inc {inc} azi {azi}");
        }
    }
}

#[test]
fn positions_are_continuous_across_the_singularity() {
    let tiny = 1e-5_f64;
    let (inc, azi) = (30.0_f64, 120.0_f64);
    let distance = 0.1;

    let straight = advance(inc, azi, inc, azi, distance);
    let bent = advance(inc, azi, inc + tiny.to_degrees(), azi, distance);
    assert!(approx(bent.dogleg_rad, tiny, 1e-12));

    assert!(approx(bent.tvd_delta, straight.tvd_delta, 1e-6));
    assert!(approx(bent.ns_delta, straight.ns_delta, 1e-6));
    assert!(approx(bent.ew_delta, straight.ew_delta, 1e-6));

    // The general ratio factor at the same dogleg moves nothing measurable
    let general = 2.0 / tiny * (tiny / 2.0).tan();
    let (i1, i2) = (inc.to_radians(), (inc + tiny.to_degrees()).to_radians());
    let tvd_general = distance / 2.0 * (i1.cos() + i2.cos()) * general;
    assert!(approx(bent.tvd_delta, tvd_general, 1e-12));
}

#[test]
fn ratio_factor_is_continuous_across_the_singularity() {
    assert!(approx(ratio_factor(1e-5), ratio_factor(0.0), 1e-6));
    // Either side of the threshold stays within rounding of 1.0
    assert!(approx(ratio_factor(0.99e-4), 1.0, 1e-8));
    assert!(approx(ratio_factor(1.01e-4), 1.0, 1e-8));
    assert!(ratio_factor(0.5) > 1.0);
}

#[test]
fn near_parallel_directions_never_produce_nan() {
    let step = advance(45.0, 120.0, 45.0 + 1e-12, 120.0 - 1e-12, 30.0);
    assert!(step.dogleg_rad.is_finite());
    assert!(step.tvd_delta.is_finite());
    assert!(step.ns_delta.is_finite());
    assert!(step.ew_delta.is_finite());
}

#[test]
fn course_is_symmetric_under_station_swap() {
    let mut rng = StdRng::seed_from_u64(0x5eed_2026);
    for _ in 0..500 {
        let (inc_a, azi_a) = (rng.gen_range(0.0..90.0), rng.gen_range(0.0..360.0));
        let (inc_b, azi_b) = (rng.gen_range(0.0..90.0), rng.gen_range(0.0..360.0));
        let distance = rng.gen_range(1.0..100.0);

        let forward = advance(inc_a, azi_a, inc_b, azi_b, distance);
        let backward = advance(inc_b, azi_b, inc_a, azi_a, distance);

        assert!(approx(forward.dogleg_rad, backward.dogleg_rad, 1e-12));
        assert!(approx(forward.dls, backward.dls, 1e-9));
        assert!(approx(forward.tvd_delta, backward.tvd_delta, 1e-9));
        assert!(approx(forward.ns_delta, backward.ns_delta, 1e-9));
        assert!(approx(forward.ew_delta, backward.ew_delta, 1e-9));

        let length = (forward.tvd_delta.powi(2) + forward.ns_delta.powi(2) + forward.ew_delta.powi(2))
            .sqrt();
        assert!(length <= distance + 1e-9, "chord longer than the arc");
    }
}

#[test]
fn two_degree_build_over_thirty_metres() {
    let from = SurveyStation::new(1000.0, 30.0, 90.0).with_position(900.0, 0.0, 400.0);
    let station = project(&from, ScenarioLeg::new(30.0, 32.0, 90.0), 90.0);

    assert_eq!(station.md, 1030.0);
    assert!(approx(station.dogleg_deg, 2.0, 1e-6));
    assert!(approx(station.dls, 2.0, 1e-6));
    // Pure build in the east-west plane
    assert!(approx(station.northing, 0.0, 1e-9));
    assert!(approx(station.tvd - 900.0, 25.71, 0.01));
    assert!(approx(station.vs, station.easting, 1e-9));
}

// ============================================================================
// Status Precedence
// ============================================================================

#[test]
fn thresholds_are_inclusive() {
    assert_eq!(classify(2.999, 3.0, 5.0), Status::Ok);
    assert_eq!(classify(3.0, 3.0, 5.0), Status::Warning);
    assert_eq!(classify(5.0, 3.0, 5.0), Status::Alarm);
}

#[test]
fn worst_axis_wins() {
    let limits = Limits {
        tvd_warning: Some(2.0),
        tvd_alarm: Some(4.0),
        ..Limits::default()
    };

    let quiet = classify_axes(&limits, 1.0, 1.0, 0.5, 1.0);
    assert_eq!(quiet.overall(), Status::Ok);

    let tvd_alarm = classify_axes(&limits, 1.0, 1.0, 4.5, 1.0);
    assert_eq!(tvd_alarm.tvd, Status::Alarm);
    assert_eq!(tvd_alarm.distance_3d, Status::Ok);
    assert_eq!(tvd_alarm.overall(), Status::Alarm);

    let dls_warning = classify_axes(&limits, 3.5, 1.0, 0.5, 1.0);
    assert_eq!(dls_warning.overall(), Status::Warning);
}

#[test]
fn unconfigured_closure_axis_follows_distance_3d() {
    let limits = Limits::default();
    let statuses = classify_axes(&limits, 0.0, 25.0, 0.0, 0.0);
    assert_eq!(statuses.closure, Status::Alarm);
    assert_eq!(statuses.tvd, Status::Alarm);
}

// ============================================================================
// Scenario Chain
// ============================================================================

fn five_legs() -> Vec<ScenarioLeg> {
    (1..=5)
        .map(|i| ScenarioLeg::new(30.0, 30.0 + i as f64, 90.0 + i as f64))
        .collect()
}

#[test]
fn truncation_keeps_the_prefix_untouched() {
    let anchor = SurveyStation::new(1000.0, 30.0, 90.0).with_position(900.0, 0.0, 400.0);
    let mut chain = ScenarioChain::from_legs(&anchor, five_legs(), 90.0);
    let before: Vec<_> = chain.stations()[..2].to_vec();

    chain.truncate(2, &anchor, 90.0);
    assert_eq!(chain.len(), 2);
    assert_eq!(chain.stations(), &before[..]);

    chain.truncate(0, &anchor, 90.0);
    assert!(chain.is_empty());
}

#[test]
fn updates_only_move_downstream_stations() {
    let anchor = SurveyStation::new(1000.0, 30.0, 90.0).with_position(900.0, 0.0, 400.0);
    let mut chain = ScenarioChain::from_legs(&anchor, five_legs(), 90.0);
    let before = chain.stations().to_vec();

    assert!(chain.update(2, ScenarioLeg::new(45.0, 40.0, 100.0), &anchor, 90.0));

    assert_eq!(&chain.stations()[..2], &before[..2]);
    assert_ne!(chain.stations()[2], before[2]);
    // Later stations keep their own legs but shift by the extra 15 m
    for (after, original) in chain.stations()[3..].iter().zip(&before[3..]) {
        assert_eq!(after.leg, original.leg);
        assert!(approx(after.md, original.md + 15.0, 1e-9));
    }
}

// ============================================================================
// Bit Projection
// ============================================================================

#[test]
fn bit_needs_a_plan_and_a_starting_station() {
    let limits = Limits::default();
    let config = BitProjectionConfig::default();
    let surveys = vec![SurveyStation::new(1000.0, 30.0, 90.0).with_position(900.0, 0.0, 0.0)];
    let plan = hold_plan(1000.0, 1200.0);
    let empty_plan = Plan::new("Empty", 0, Vec::new());

    let inputs = |surveys: &[SurveyStation], plan: Option<&Plan>| {
        project_bit(&BitProjectionInputs {
            surveys,
            scenario: &[],
            plan,
            limits: &limits,
            vs_azimuth: 90.0,
            config: &config,
            correction_interval: 30.0,
        })
    };

    assert!(inputs(&surveys, None).is_none());
    assert!(inputs(&surveys, Some(&empty_plan)).is_none());
    assert!(inputs(&[], Some(&plan)).is_none());
    assert!(inputs(&surveys, Some(&plan)).is_some());
}

#[test]
fn bit_on_a_hold_plan_stays_on_plan() {
    let limits = Limits::default();
    let config = BitProjectionConfig {
        survey_to_bit_distance: 15.0,
        ..BitProjectionConfig::default()
    };
    let plan = hold_plan(1000.0, 1300.0);
    let last = plan.stations[3];
    let surveys = vec![SurveyStation::new(last.md, last.inc, last.azi).with_position(
        last.tvd,
        last.northing,
        last.easting,
    )];

    let bit = project_bit(&BitProjectionInputs {
        surveys: &surveys,
        scenario: &[],
        plan: Some(&plan),
        limits: &limits,
        vs_azimuth: 90.0,
        config: &config,
        correction_interval: 30.0,
    })
    .expect("bit projection");

    assert_eq!(bit.source, ProjectionSource::Survey);
    assert_eq!(bit.from_md, last.md);
    assert!(approx(bit.md, last.md + 15.0, 1e-9));
    assert!(bit.deviation.distance_3d < 1e-6);
    assert_eq!(bit.status, Status::Ok);
}

// ============================================================================
// Required Rates
// ============================================================================

#[test]
fn required_rate_cancels_the_variance_over_the_interval() {
    for (variance, interval) in [(1.5, 30.0), (-2.0, 60.0), (0.25, 15.0)] {
        let rate = required_rate(variance, interval);
        let correction = rate * interval / 30.0;
        assert!(approx(variance + correction, 0.0, 1e-12));
    }
    assert_eq!(required_rate(1.5, 0.0), 0.0);
}
