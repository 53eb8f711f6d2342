//! Trajectory Engine Module
//!
//! Deterministic wellbore geometry and plan-variance calculations.
//! Everything here is a pure function of its inputs: no I/O, no shared
//! state, no error type. Edge cases degrade to well-defined defaults.
//!
//! ## Position
//! - `advance()` - Minimum curvature step between two directions
//! - `vertical_section()` - Project N/E onto the VS azimuth
//! - `project()` - Advance any station by one (distance, inc, azi) leg
//! - `ScenarioChain` - What-if stations with forward-only edit propagation
//! - `resolve_positions()` - Fill unresolved survey positions
//!
//! ## Comparison
//! - `position_at()` - Plan position at an arbitrary MD
//! - `compute_variances()` - Per-station deviation from plan
//! - `classify()` / `classify_axes()` - ok / warning / alarm
//! - `project_bit()` - Bit position ahead of the last known station

pub mod bit_projection;
pub mod limits;
pub mod min_curvature;
pub mod plan_match;
pub mod projector;
pub mod resolver;
pub mod scenario;
pub mod variance;
pub mod vertical_section;

pub use bit_projection::{project_bit, BitProjectionInputs};
pub use limits::{classify, classify_axes};
pub use min_curvature::{advance, dogleg_angle, dogleg_severity, ratio_factor, CurvatureStep};
pub use plan_match::{md_at_tvd, position_at};
pub use projector::project;
pub use resolver::resolve_positions;
pub use scenario::ScenarioChain;
pub use variance::{compute_variances, summarize};
pub use vertical_section::{closure_azimuth, closure_distance, resolve_vs_azimuth, vertical_section};

use tracing::warn;

use crate::config::defaults::DLS_REFERENCE_LENGTH_M;

// ============================================================================
// Angle helpers
// ============================================================================

/// Wrap an azimuth into [0, 360).
pub fn normalize_azimuth(azi: f64) -> f64 {
    let wrapped = azi.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Signed shortest angular difference `to - from`, in [-180, 180].
pub fn azimuth_difference(to: f64, from: f64) -> f64 {
    let d = (to - from).rem_euclid(360.0);
    if d > 180.0 {
        d - 360.0
    } else {
        d
    }
}

// ============================================================================
// Rates
// ============================================================================

/// Build rate (deg/30m) from `inc1` to `inc2` over `course_length`.
/// Zero when the course length is not positive.
pub fn build_rate(inc1: f64, inc2: f64, course_length: f64) -> f64 {
    per_reference_length(inc2 - inc1, course_length)
}

/// Turn rate (deg/30m) using the signed shortest azimuth change.
pub fn turn_rate(azi1: f64, azi2: f64, course_length: f64) -> f64 {
    per_reference_length(azimuth_difference(azi2, azi1), course_length)
}

/// Rate needed over `interval` to cancel `variance` (deg/30m).
///
/// Opposite sign to the variance: a station 1.5° under plan inclination
/// needs +1.5°/30m over a 30 m interval.
pub fn required_rate(variance: f64, interval: f64) -> f64 {
    per_reference_length(-variance, interval)
}

fn per_reference_length(change: f64, length: f64) -> f64 {
    if length <= 0.0 {
        0.0
    } else {
        change / length * DLS_REFERENCE_LENGTH_M
    }
}

// ============================================================================
// Input sanity
// ============================================================================

/// Count (and warn about) MD values that do not strictly increase.
///
/// Non-increasing MD is tolerated everywhere; this only reports it.
pub fn check_md_order<I>(label: &str, mds: I) -> usize
where
    I: IntoIterator<Item = f64>,
{
    let mut violations = 0;
    let mut prev: Option<f64> = None;
    for md in mds {
        if let Some(p) = prev {
            if md <= p {
                violations += 1;
            }
        }
        prev = Some(md);
    }
    if violations > 0 {
        warn!(sequence = label, violations, "MD sequence is not strictly increasing");
    }
    violations
}
