//! Minimum Curvature Position Solver
//!
//! Assumes a constant-curvature arc between two stations and returns the
//! TVD / north / east deltas across it. Pure function of its inputs, no
//! allocation.

use crate::config::defaults::{DLS_REFERENCE_LENGTH_M, MIN_DOGLEG_RAD};

/// Result of advancing along one course.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CurvatureStep {
    /// Vertical depth gained (m)
    pub tvd_delta: f64,
    /// Northing gained (m)
    pub ns_delta: f64,
    /// Easting gained (m)
    pub ew_delta: f64,
    /// Total angular change over the course, in [0, π]
    pub dogleg_rad: f64,
    /// Dogleg severity (deg/30m), 0 when the course length is not positive
    pub dls: f64,
}

impl CurvatureStep {
    pub fn dogleg_deg(&self) -> f64 {
        self.dogleg_rad.to_degrees()
    }
}

/// Dogleg angle between two directions (radians, in [0, π]).
///
/// Haversine form of `acos(cos i1·cos i2 + sin i1·sin i2·cos Δa)`:
/// `2·asin(sqrt(sin²(Δi/2) + sin i1·sin i2·sin²(Δa/2)))`. Identical
/// directions give exactly 0, and the argument is clamped to [0, 1].
pub fn dogleg_angle(inc1: f64, azi1: f64, inc2: f64, azi2: f64) -> f64 {
    let (i1, i2) = (inc1.to_radians(), inc2.to_radians());
    let half_d_inc = ((i2 - i1) / 2.0).sin();
    let half_d_azi = ((azi2 - azi1).to_radians() / 2.0).sin();
    let h = half_d_inc * half_d_inc + i1.sin() * i2.sin() * half_d_azi * half_d_azi;
    2.0 * h.clamp(0.0, 1.0).sqrt().asin()
}

/// Ratio factor `2/β · tan(β/2)`, fixed at 1.0 below the singularity threshold.
pub fn ratio_factor(dogleg_rad: f64) -> f64 {
    if dogleg_rad < MIN_DOGLEG_RAD {
        1.0
    } else {
        (2.0 / dogleg_rad) * (dogleg_rad / 2.0).tan()
    }
}

/// Dogleg severity in deg/30m over `course_length`.
pub fn dogleg_severity(inc1: f64, azi1: f64, inc2: f64, azi2: f64, course_length: f64) -> f64 {
    severity_from_dogleg(dogleg_angle(inc1, azi1, inc2, azi2), course_length)
}

fn severity_from_dogleg(dogleg_rad: f64, course_length: f64) -> f64 {
    if course_length <= 0.0 {
        0.0
    } else {
        dogleg_rad.to_degrees() * DLS_REFERENCE_LENGTH_M / course_length
    }
}

/// Advance from direction (inc1, azi1) to (inc2, azi2) over `distance`.
///
/// Angles in degrees. A non-positive distance yields zero deltas and zero
/// DLS; the dogleg angle itself is still reported.
pub fn advance(inc1: f64, azi1: f64, inc2: f64, azi2: f64, distance: f64) -> CurvatureStep {
    let dogleg_rad = dogleg_angle(inc1, azi1, inc2, azi2);

    if distance <= 0.0 {
        return CurvatureStep {
            dogleg_rad,
            ..CurvatureStep::default()
        };
    }

    let (i1, i2) = (inc1.to_radians(), inc2.to_radians());
    let (a1, a2) = (azi1.to_radians(), azi2.to_radians());
    let half = distance / 2.0 * ratio_factor(dogleg_rad);

    CurvatureStep {
        tvd_delta: half * (i1.cos() + i2.cos()),
        ns_delta: half * (i1.sin() * a1.cos() + i2.sin() * a2.cos()),
        ew_delta: half * (i1.sin() * a1.sin() + i2.sin() * a2.sin()),
        dogleg_rad,
        dls: severity_from_dogleg(dogleg_rad, distance),
    }
}
