//! Vertical section and closure projections

/// Project (northing, easting) onto the vertical-section azimuth (deg).
pub fn vertical_section(northing: f64, easting: f64, vs_azimuth: f64) -> f64 {
    let theta = vs_azimuth.to_radians();
    northing * theta.cos() + easting * theta.sin()
}

/// Effective VS azimuth: plan override, then project default, then 0.
pub fn resolve_vs_azimuth(plan_override: Option<f64>, project_default: Option<f64>) -> f64 {
    plan_override.or(project_default).unwrap_or(0.0)
}

/// Horizontal displacement from the well reference (m).
pub fn closure_distance(northing: f64, easting: f64) -> f64 {
    northing.hypot(easting)
}

/// Heading of the horizontal displacement, in [0, 360) deg.
pub fn closure_azimuth(northing: f64, easting: f64) -> f64 {
    super::normalize_azimuth(easting.atan2(northing).to_degrees())
}
