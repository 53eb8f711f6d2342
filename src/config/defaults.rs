//! System-wide default constants.
//!
//! Centralises the numeric constants of the trajectory engine.
//! Grouped by subsystem for easy discovery.

// ============================================================================
// Geometry
// ============================================================================

/// Course length that dogleg severity and build/turn rates are normalised to (m).
pub const DLS_REFERENCE_LENGTH_M: f64 = 30.0;

/// Dogleg below which the minimum curvature ratio factor is fixed at 1.0 (rad).
///
/// `tan(β/2)/β` is 0/0 at β = 0; its limit is 1/2, so the factor tends to 1.
pub const MIN_DOGLEG_RAD: f64 = 1e-4;

/// |cos(inc)| below which a hold-inclination TVD distance is undefined.
pub const MIN_COS_FOR_HOLD: f64 = 1e-6;

/// Bisection steps when solving for a constant build rate. 60 halvings of π
/// is well below f64 resolution.
pub const BISECTION_ITERATIONS: usize = 60;

// ============================================================================
// Plan Matching
// ============================================================================

/// Two MDs closer than this are the same station (m).
pub const MD_MATCH_TOLERANCE_M: f64 = 1e-6;

/// A target TVD within this of the plan TVD is treated as "on plan" (m).
pub const TARGET_TVD_TOLERANCE_M: f64 = 1e-6;

// ============================================================================
// Corrections & Bit Projection
// ============================================================================

/// Interval over which required build/turn rates cancel the current variance (m).
pub const CORRECTION_INTERVAL_M: f64 = 30.0;

/// Default survey sensor to bit distance (m).
pub const SURVEY_TO_BIT_DISTANCE_M: f64 = 15.0;

// ============================================================================
// Config Loading
// ============================================================================

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "WELLPATH_CONFIG";

/// Config file searched for in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "wellpath.toml";
