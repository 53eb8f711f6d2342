//! Recompute facade
//!
//! `recompute()` is the single entry point that turns an immutable input
//! snapshot into a full analysis. Nothing is patched incrementally: any
//! change to surveys, plan, limits, scenario legs or bit settings means a
//! fresh call.
//!
//! `TrajectoryEngine` wraps that for shared use: readers load the latest
//! published analysis lock-free, writers are serialised behind a mutex
//! and each write republishes a complete new analysis.

use std::sync::{Arc, Mutex, MutexGuard};

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{defaults, WellpathConfig};
use crate::trajectory::{
    check_md_order, compute_variances, project_bit, resolve_positions, resolve_vs_azimuth,
    summarize, variance::sorted_by_md, BitProjectionInputs, ScenarioChain,
};
use crate::types::{
    BitProjectionConfig, Limits, Plan, ScenarioLeg, Status, SurveyStation, TieIn,
    TrajectoryAnalysis,
};

// ============================================================================
// Inputs
// ============================================================================

/// Immutable snapshot of everything an analysis depends on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisInputs {
    #[serde(default)]
    pub surveys: Vec<SurveyStation>,
    /// Selected plan, if any
    #[serde(default)]
    pub plan: Option<Plan>,
    #[serde(default)]
    pub limits: Limits,
    /// Project-level VS azimuth (deg)
    #[serde(default)]
    pub project_vs_azimuth: Option<f64>,
    /// Recorded what-if legs, in chain order
    #[serde(default)]
    pub scenario: Vec<ScenarioLeg>,
    #[serde(default)]
    pub bit: BitProjectionConfig,
    #[serde(default = "default_correction_interval")]
    pub correction_interval: f64,
    #[serde(default)]
    pub tie_in: TieIn,
    #[serde(default)]
    pub resolve_unresolved_positions: bool,
}

fn default_correction_interval() -> f64 {
    defaults::CORRECTION_INTERVAL_M
}

impl Default for AnalysisInputs {
    fn default() -> Self {
        Self {
            surveys: Vec::new(),
            plan: None,
            limits: Limits::default(),
            project_vs_azimuth: None,
            scenario: Vec::new(),
            bit: BitProjectionConfig::default(),
            correction_interval: default_correction_interval(),
            tie_in: TieIn::default(),
            resolve_unresolved_positions: false,
        }
    }
}

impl AnalysisInputs {
    /// Inputs carrying the project settings from `config` and no stations.
    pub fn from_config(config: &WellpathConfig) -> Self {
        Self {
            limits: config.limits,
            project_vs_azimuth: config.project_vs_azimuth(),
            bit: config.bit_projection,
            correction_interval: config.engine.correction_interval_m,
            tie_in: config.engine.tie_in,
            resolve_unresolved_positions: config.engine.resolve_unresolved_positions,
            ..Self::default()
        }
    }

    /// Effective VS azimuth: plan override, then project default, then 0.
    pub fn vs_azimuth(&self) -> f64 {
        resolve_vs_azimuth(
            self.plan.as_ref().and_then(|p| p.vs_azimuth),
            self.project_vs_azimuth,
        )
    }

    /// Surveys sorted by MD, with positions resolved when enabled.
    pub fn prepared_surveys(&self) -> Vec<SurveyStation> {
        if self.resolve_unresolved_positions {
            resolve_positions(&self.surveys, &self.tie_in)
        } else {
            sorted_by_md(&self.surveys)
        }
    }

    /// Where the scenario chain starts: the last survey, or the tie-in.
    pub fn scenario_anchor(surveys: &[SurveyStation], tie_in: &TieIn) -> SurveyStation {
        surveys.last().copied().unwrap_or_else(|| tie_in.as_survey())
    }

    fn scenario_chain(&self, surveys: &[SurveyStation]) -> ScenarioChain {
        let anchor = Self::scenario_anchor(surveys, &self.tie_in);
        ScenarioChain::from_legs(&anchor, self.scenario.iter().copied(), self.vs_azimuth())
    }
}

// ============================================================================
// Recompute
// ============================================================================

/// Run the full analysis for one input snapshot.
pub fn recompute(inputs: &AnalysisInputs) -> TrajectoryAnalysis {
    let vs_azimuth = inputs.vs_azimuth();

    check_md_order("surveys", inputs.surveys.iter().map(|s| s.md));
    if let Some(plan) = &inputs.plan {
        check_md_order("plan", plan.stations.iter().map(|s| s.md));
    }

    let surveys = inputs.prepared_surveys();
    let chain = inputs.scenario_chain(&surveys);

    let variances = inputs
        .plan
        .as_ref()
        .map(|plan| {
            compute_variances(
                &surveys,
                plan,
                &inputs.limits,
                vs_azimuth,
                inputs.correction_interval,
            )
        })
        .unwrap_or_default();
    let summary = summarize(&variances);

    let bit_projection = project_bit(&BitProjectionInputs {
        surveys: &surveys,
        scenario: chain.stations(),
        plan: inputs.plan.as_ref(),
        limits: &inputs.limits,
        vs_azimuth,
        config: &inputs.bit,
        correction_interval: inputs.correction_interval,
    });

    debug!(
        stations = summary.station_count,
        alarms = summary.alarm_count,
        warnings = summary.warning_count,
        scenario = chain.len(),
        bit = bit_projection.is_some(),
        "Trajectory analysis recomputed"
    );

    TrajectoryAnalysis {
        vs_azimuth,
        variances,
        summary,
        bit_projection,
        scenario: chain.into_stations(),
    }
}

// ============================================================================
// Shared Engine
// ============================================================================

/// One published analysis.
#[derive(Debug, Clone, Serialize)]
pub struct PublishedAnalysis {
    /// Increments on every recompute
    pub revision: u64,
    pub computed_at: DateTime<Utc>,
    pub analysis: TrajectoryAnalysis,
}

/// Scenario chain edit request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScenarioEdit {
    Push(ScenarioLeg),
    Update(usize, ScenarioLeg),
    Insert(usize, ScenarioLeg),
    Truncate(usize),
}

/// Inputs plus the latest analysis, safe to share across threads.
pub struct TrajectoryEngine {
    inputs: Mutex<AnalysisInputs>,
    published: ArcSwap<PublishedAnalysis>,
}

impl TrajectoryEngine {
    pub fn new(inputs: AnalysisInputs) -> Self {
        let analysis = recompute(&inputs);
        Self {
            inputs: Mutex::new(inputs),
            published: ArcSwap::from_pointee(PublishedAnalysis {
                revision: 0,
                computed_at: Utc::now(),
                analysis,
            }),
        }
    }

    /// Latest published analysis. Never blocks on a running recompute.
    pub fn latest(&self) -> Arc<PublishedAnalysis> {
        self.published.load_full()
    }

    /// Copy of the current inputs.
    pub fn inputs(&self) -> AnalysisInputs {
        self.lock_inputs().clone()
    }

    /// Apply `change` to the inputs and publish a fresh analysis.
    ///
    /// Writers are serialised: concurrent calls run one after another and
    /// each sees the previous writer's inputs.
    pub fn update<F>(&self, change: F) -> Arc<PublishedAnalysis>
    where
        F: FnOnce(&mut AnalysisInputs),
    {
        let mut inputs = self.lock_inputs();
        change(&mut inputs);
        self.publish(&inputs)
    }

    pub fn set_surveys(&self, surveys: Vec<SurveyStation>) -> Arc<PublishedAnalysis> {
        self.update(|i| i.surveys = surveys)
    }

    pub fn set_plan(&self, plan: Option<Plan>) -> Arc<PublishedAnalysis> {
        self.update(|i| i.plan = plan)
    }

    pub fn set_limits(&self, limits: Limits) -> Arc<PublishedAnalysis> {
        self.update(|i| i.limits = limits)
    }

    pub fn set_bit_config(&self, bit: BitProjectionConfig) -> Arc<PublishedAnalysis> {
        self.update(|i| i.bit = bit)
    }

    /// Edit the scenario chain. Out-of-range edits leave the chain as it is
    /// (and are logged); an analysis is published either way.
    pub fn edit_scenario(&self, edit: ScenarioEdit) -> Arc<PublishedAnalysis> {
        self.update(|inputs| {
            let surveys = inputs.prepared_surveys();
            let anchor = AnalysisInputs::scenario_anchor(&surveys, &inputs.tie_in);
            let vs_azimuth = inputs.vs_azimuth();
            let mut chain = inputs.scenario_chain(&surveys);

            let applied = match edit {
                ScenarioEdit::Push(leg) => {
                    chain.push(leg, &anchor, vs_azimuth);
                    true
                }
                ScenarioEdit::Update(index, leg) => chain.update(index, leg, &anchor, vs_azimuth),
                ScenarioEdit::Insert(index, leg) => chain.insert(index, leg, &anchor, vs_azimuth),
                ScenarioEdit::Truncate(index) => {
                    chain.truncate(index, &anchor, vs_azimuth);
                    true
                }
            };

            if applied {
                inputs.scenario = chain.legs();
            } else {
                warn!(?edit, len = chain.len(), "Scenario edit index out of range, ignored");
            }
        })
    }

    fn publish(&self, inputs: &AnalysisInputs) -> Arc<PublishedAnalysis> {
        let analysis = recompute(inputs);
        let revision = self.published.load().revision + 1;

        if analysis.summary.alarm_count > 0
            || analysis.bit_projection.as_ref().is_some_and(|b| b.status == Status::Alarm)
        {
            info!(
                revision,
                alarms = analysis.summary.alarm_count,
                max_distance_3d = analysis.summary.max_distance_3d,
                "Trajectory outside alarm limits"
            );
        }

        let published = Arc::new(PublishedAnalysis {
            revision,
            computed_at: Utc::now(),
            analysis,
        });
        self.published.store(Arc::clone(&published));
        published
    }

    fn lock_inputs(&self) -> MutexGuard<'_, AnalysisInputs> {
        // A panic inside a writer leaves the previous inputs intact
        self.inputs.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl std::fmt::Debug for TrajectoryEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrajectoryEngine")
            .field("revision", &self.published.load().revision)
            .finish_non_exhaustive()
    }
}
