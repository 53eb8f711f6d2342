//! Derived analysis outputs: variances, summary, bit projection

use serde::{Deserialize, Serialize};

use super::{AxisStatuses, GeoValue, ScenarioStation, Status, StationGeometry};

// ============================================================================
// Plan Matching
// ============================================================================

/// How a plan position was obtained for a given MD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanMatch {
    /// A plan station exists at exactly this MD
    Exact,
    /// Linearly interpolated between the two bracketing plan stations
    Interpolated,
    /// MD lies outside the plan; nearest end station used
    Nearest,
}

/// Plan position at an arbitrary MD.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanPoint {
    pub md: f64,
    pub inc: f64,
    pub azi: f64,
    pub tvd: f64,
    pub northing: f64,
    pub easting: f64,
    /// VS against the effective azimuth
    pub vs: f64,
    pub matched: PlanMatch,
    /// Build rate over the bracketing plan segment (deg/30m)
    pub build_rate: f64,
    /// Turn rate over the bracketing plan segment (deg/30m)
    pub turn_rate: f64,
}

// ============================================================================
// Deviation
// ============================================================================

/// Positional and directional deltas between an actual point and the plan.
/// Shared by station variances and the bit projection.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Deviation {
    /// actual TVD - plan TVD (m)
    pub tvd: f64,
    /// actual VS - plan VS (m)
    pub vs: f64,
    /// Horizontal distance to plan (m)
    pub closure: f64,
    /// Straight-line distance to plan (m)
    pub distance_3d: f64,
    /// actual inc - plan inc (deg)
    pub inc: f64,
    /// Signed shortest azimuth difference, actual - plan, in [-180, 180] (deg)
    pub azi: f64,
}

// ============================================================================
// Station Variance
// ============================================================================

/// Comparison of one actual survey station against the plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variance {
    pub md: f64,
    pub inc: f64,
    pub azi: f64,
    /// Actual position as supplied (unresolved components stay unresolved)
    pub tvd: GeoValue,
    pub northing: GeoValue,
    pub easting: GeoValue,
    /// Actual VS against the effective azimuth
    pub vs: f64,

    pub plan: PlanPoint,
    pub deviation: Deviation,

    /// Dogleg severity from the previous actual station (deg/30m)
    pub dls: f64,
    /// Actual build rate from the previous actual station (deg/30m)
    pub build_rate: f64,
    /// Actual turn rate from the previous actual station (deg/30m)
    pub turn_rate: f64,
    /// False for the first station, where dls/build/turn are reported as 0
    pub rates_available: bool,

    /// Build rate needed over the correction interval to cancel the
    /// inclination variance (deg/30m, positive = build)
    pub required_build_rate: f64,
    /// Turn rate needed over the correction interval to cancel the
    /// azimuth variance (deg/30m, positive = turn right)
    pub required_turn_rate: f64,

    pub statuses: AxisStatuses,
    pub status: Status,
}

/// Aggregate over a variance list.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VarianceSummary {
    pub station_count: usize,
    pub alarm_count: usize,
    pub warning_count: usize,
    pub max_distance_3d: f64,
    pub max_dls: f64,
    /// Largest |TVD variance| (m)
    pub max_tvd_variance: f64,
}

// ============================================================================
// Bit Projection
// ============================================================================

/// Bit projection settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BitProjectionConfig {
    /// Distance from the last survey sensor to the bit (m)
    #[serde(default = "default_survey_to_bit")]
    pub survey_to_bit_distance: f64,
    /// Extrapolate the last observed build/turn rates instead of holding
    #[serde(default)]
    pub apply_rates: bool,
    /// Optional landing TVD (m)
    #[serde(default)]
    pub target_tvd: Option<f64>,
}

fn default_survey_to_bit() -> f64 {
    crate::config::defaults::SURVEY_TO_BIT_DISTANCE_M
}

impl Default for BitProjectionConfig {
    fn default() -> Self {
        Self {
            survey_to_bit_distance: default_survey_to_bit(),
            apply_rates: false,
            target_tvd: None,
        }
    }
}

/// Which kind of station the bit was projected from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionSource {
    Survey,
    Scenario,
}

/// Extrapolated bit position compared against the plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BitProjection {
    pub source: ProjectionSource,
    /// MD of the station the projection started from
    pub from_md: f64,

    pub md: f64,
    pub inc: f64,
    pub azi: f64,
    pub tvd: f64,
    pub northing: f64,
    pub easting: f64,
    pub vs: f64,
    /// Dogleg severity of the survey-to-bit leg (deg/30m)
    pub dls: f64,

    /// Build rate used for the extrapolation (0 when holding)
    pub applied_build_rate: f64,
    /// Turn rate used for the extrapolation (0 when holding)
    pub applied_turn_rate: f64,

    pub plan: PlanPoint,
    pub deviation: Deviation,

    pub required_build_rate: f64,
    pub required_turn_rate: f64,

    pub target_tvd: Option<f64>,
    /// Along-hole distance over which the target TVD should be reached (m)
    pub distance_to_target: Option<f64>,
    /// Constant build rate that closes the TVD gap over `distance_to_target`
    /// (deg/30m)
    pub required_build_rate_to_target: Option<f64>,

    pub statuses: AxisStatuses,
    pub status: Status,
}

impl StationGeometry for BitProjection {
    fn md(&self) -> f64 {
        self.md
    }
    fn inc(&self) -> f64 {
        self.inc
    }
    fn azi(&self) -> f64 {
        self.azi
    }
    fn tvd(&self) -> f64 {
        self.tvd
    }
    fn northing(&self) -> f64 {
        self.northing
    }
    fn easting(&self) -> f64 {
        self.easting
    }
}

// ============================================================================
// Full Analysis
// ============================================================================

/// Everything produced by one recompute.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrajectoryAnalysis {
    /// VS azimuth the analysis was computed against (deg)
    pub vs_azimuth: f64,
    pub variances: Vec<Variance>,
    pub summary: VarianceSummary,
    pub bit_projection: Option<BitProjection>,
    /// Scenario chain positions, in chain order
    pub scenario: Vec<ScenarioStation>,
}
