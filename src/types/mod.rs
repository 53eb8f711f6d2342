//! Shared data structures for wellbore trajectory analysis
//!
//! This module defines the core types flowing through the engine:
//! - Stations: SurveyStation (actual), PlanStation / Plan (planned),
//!   ScenarioLeg / ScenarioStation (what-if projections)
//! - Limits: alarm thresholds and the three-level Status
//! - Analysis: Variance, VarianceSummary, BitProjection (derived outputs)

mod station;
mod limits;
mod analysis;

pub use station::*;
pub use limits::*;
pub use analysis::*;
