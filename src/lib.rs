//! wellpath: Wellbore Trajectory Geometry & Plan Variance
//!
//! Reconstructs wellbore position from directional surveys, compares the
//! actual path against a planned trajectory, classifies deviations against
//! alarm limits and projects the bit ahead of the last station.
//!
//! ## Architecture
//!
//! - **Trajectory**: Minimum curvature, vertical section, projection,
//!   scenario chains, plan matching, variances, limits, bit projection
//! - **Engine**: `recompute()` over an immutable input snapshot, plus a
//!   shareable `TrajectoryEngine` that publishes the latest analysis
//! - **Config**: Project limits and engine settings from TOML

pub mod config;
pub mod engine;
pub mod snapshot;
pub mod trajectory;
pub mod types;

// Re-export configuration
pub use config::WellpathConfig;

// Re-export the recompute facade
pub use engine::{recompute, AnalysisInputs, PublishedAnalysis, ScenarioEdit, TrajectoryEngine};

// Re-export commonly used types
pub use types::{
    AxisStatuses, BitProjection, BitProjectionConfig, Deviation, GeoValue, Limits, Plan,
    PlanMatch, PlanPoint, PlanStation, ProjectionSource, ScenarioLeg, ScenarioStation,
    StationGeometry, Status, SurveyStation, TieIn, TrajectoryAnalysis, Variance,
    VarianceSummary,
};

// Re-export the scenario chain
pub use trajectory::ScenarioChain;
