//! Limits classification
//!
//! Single-threshold rule: `value >= alarm` is an alarm, otherwise
//! `value >= warning` is a warning, otherwise ok. The station status is the
//! worst of its axis statuses.

use crate::types::{AxisStatuses, Limits, Status};

/// Classify one value against a warning/alarm pair.
pub fn classify(value: f64, warning: f64, alarm: f64) -> Status {
    if value >= alarm {
        Status::Alarm
    } else if value >= warning {
        Status::Warning
    } else {
        Status::Ok
    }
}

/// Classify every axis for one station.
///
/// `tvd_variance` and `closure` are magnitudes. Their axes fall back to the
/// 3D-distance thresholds applied to `distance_3d` unless both of their own
/// thresholds are configured.
pub fn classify_axes(
    limits: &Limits,
    dls: f64,
    distance_3d: f64,
    tvd_variance: f64,
    closure: f64,
) -> AxisStatuses {
    let distance_status = classify(distance_3d, limits.distance_3d_warning, limits.distance_3d_alarm);

    AxisStatuses {
        dls: classify(dls, limits.dls_warning, limits.dls_alarm),
        distance_3d: distance_status,
        tvd: limits
            .tvd_thresholds()
            .map_or(distance_status, |(w, a)| classify(tvd_variance.abs(), w, a)),
        closure: limits
            .closure_thresholds()
            .map_or(distance_status, |(w, a)| classify(closure.abs(), w, a)),
    }
}
