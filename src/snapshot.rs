//! Well snapshot input for the report binary
//!
//! A JSON document carrying the station lists the surrounding application
//! would normally hand to the engine in-process:
//!
//! ```json
//! {
//!   "surveys":  [{ "md": 100.0, "inc": 0.5, "azi": 45.0, "tvd": 99.99, "northing": 0.3, "easting": 0.3 }],
//!   "plan":     { "name": "Plan A", "revision": 3, "vs_azimuth": 45.0, "stations": [...] },
//!   "scenario": [{ "distance": 30.0, "inc": 12.0, "azi": 46.0 }],
//!   "limits":   { "dls_warning": 2.5, "dls_alarm": 4.0 }
//! }
//! ```
//!
//! `limits` and `bit_projection`, when present, replace the project-level
//! values from the config file for this well.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::config::WellpathConfig;
use crate::engine::AnalysisInputs;
use crate::types::{BitProjectionConfig, Limits, Plan, ScenarioLeg, SurveyStation};

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Failed to read snapshot {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WellSnapshot {
    #[serde(default)]
    pub surveys: Vec<SurveyStation>,
    #[serde(default)]
    pub plan: Option<Plan>,
    #[serde(default)]
    pub scenario: Vec<ScenarioLeg>,
    /// Plan-level limits overriding the project config
    #[serde(default)]
    pub limits: Option<Limits>,
    #[serde(default)]
    pub bit_projection: Option<BitProjectionConfig>,
}

impl WellSnapshot {
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let contents = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let snapshot = Self::from_json_str(&contents)?;
        info!(
            path = %path.display(),
            surveys = snapshot.surveys.len(),
            plan = snapshot.plan.as_ref().map_or("-", |p| p.name.as_str()),
            scenario = snapshot.scenario.len(),
            "Loaded well snapshot"
        );
        Ok(snapshot)
    }

    pub fn from_json_str(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Combine with project settings into engine inputs.
    pub fn into_inputs(self, config: &WellpathConfig) -> AnalysisInputs {
        let base = AnalysisInputs::from_config(config);
        AnalysisInputs {
            surveys: self.surveys,
            plan: self.plan,
            scenario: self.scenario,
            limits: self.limits.unwrap_or(base.limits),
            bit: self.bit_projection.unwrap_or(base.bit),
            ..base
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_snapshot() {
        let snapshot = WellSnapshot::from_json_str("{}").unwrap();
        assert!(snapshot.surveys.is_empty());
        assert!(snapshot.plan.is_none());
    }

    #[test]
    fn test_limits_override_config() {
        let json = r#"{
            "surveys": [{"md": 100.0, "inc": 1.0, "azi": 10.0}],
            "limits": {"dls_warning": 1.0, "dls_alarm": 2.0}
        }"#;
        let mut config = WellpathConfig::default();
        config.limits.distance_3d_alarm = 50.0;
        config.engine.correction_interval_m = 60.0;

        let inputs = WellSnapshot::from_json_str(json).unwrap().into_inputs(&config);
        assert_eq!(inputs.limits.dls_alarm, 2.0);
        // Snapshot limits replace the whole project set
        assert_eq!(inputs.limits.distance_3d_alarm, Limits::default().distance_3d_alarm);
        assert_eq!(inputs.correction_interval, 60.0);
        assert_eq!(inputs.surveys.len(), 1);
    }

    #[test]
    fn test_positions_read_back_bit_exact() {
        let station = SurveyStation::new(1234.5, 31.7, 271.3).with_position(
            1100.123_456_789_012_3,
            0.370_202_652_497_368_45,
            -412.987_654_321_098_7,
        );
        let snapshot = WellSnapshot {
            surveys: vec![station],
            ..WellSnapshot::default()
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        let loaded = WellSnapshot::from_json_str(&json).unwrap();
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            WellSnapshot::from_json_str("{\"surveys\": 3}"),
            Err(SnapshotError::Json(_))
        ));
    }
}
