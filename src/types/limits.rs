//! Alarm thresholds and deviation status

use serde::{Deserialize, Serialize};

/// Default limit values, used when no `[limits]` section is configured.
pub mod default_limits {
    /// Dogleg severity warning (deg/30m)
    pub const DLS_WARNING: f64 = 3.0;
    /// Dogleg severity alarm (deg/30m)
    pub const DLS_ALARM: f64 = 5.0;
    /// 3D distance from plan, warning (m)
    pub const DISTANCE_3D_WARNING: f64 = 10.0;
    /// 3D distance from plan, alarm (m)
    pub const DISTANCE_3D_ALARM: f64 = 20.0;
}

// ============================================================================
// Status
// ============================================================================

/// Three-level deviation status. Ordered so that `max()` yields the worst.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Ok,
    Warning,
    Alarm,
}

impl Status {
    pub const ALL: [Self; 3] = [Self::Ok, Self::Warning, Self::Alarm];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Warning => "WARNING",
            Self::Alarm => "ALARM",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-axis statuses for one station or the bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AxisStatuses {
    pub dls: Status,
    pub distance_3d: Status,
    pub tvd: Status,
    pub closure: Status,
}

impl AxisStatuses {
    /// Worst status across all axes (alarm > warning > ok).
    pub fn overall(&self) -> Status {
        [self.dls, self.distance_3d, self.tvd, self.closure]
            .into_iter()
            .max()
            .unwrap_or_default()
    }
}

// ============================================================================
// Limits
// ============================================================================

/// Deviation thresholds for a project or plan.
///
/// The TVD and closure axes are optional: an axis with both thresholds set
/// is classified on its own value, otherwise the 3D-distance thresholds
/// govern it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Limits {
    /// Dogleg severity warning (deg/30m)
    #[serde(default = "default_dls_warning")]
    pub dls_warning: f64,
    /// Dogleg severity alarm (deg/30m)
    #[serde(default = "default_dls_alarm")]
    pub dls_alarm: f64,
    /// 3D distance warning (m)
    #[serde(default = "default_distance_3d_warning")]
    pub distance_3d_warning: f64,
    /// 3D distance alarm (m)
    #[serde(default = "default_distance_3d_alarm")]
    pub distance_3d_alarm: f64,
    /// |TVD variance| warning (m)
    #[serde(default)]
    pub tvd_warning: Option<f64>,
    /// |TVD variance| alarm (m)
    #[serde(default)]
    pub tvd_alarm: Option<f64>,
    /// Horizontal closure warning (m)
    #[serde(default)]
    pub closure_warning: Option<f64>,
    /// Horizontal closure alarm (m)
    #[serde(default)]
    pub closure_alarm: Option<f64>,
}

fn default_dls_warning() -> f64 {
    default_limits::DLS_WARNING
}
fn default_dls_alarm() -> f64 {
    default_limits::DLS_ALARM
}
fn default_distance_3d_warning() -> f64 {
    default_limits::DISTANCE_3D_WARNING
}
fn default_distance_3d_alarm() -> f64 {
    default_limits::DISTANCE_3D_ALARM
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            dls_warning: default_dls_warning(),
            dls_alarm: default_dls_alarm(),
            distance_3d_warning: default_distance_3d_warning(),
            distance_3d_alarm: default_distance_3d_alarm(),
            tvd_warning: None,
            tvd_alarm: None,
            closure_warning: None,
            closure_alarm: None,
        }
    }
}

impl Limits {
    /// Dedicated TVD thresholds, if both are configured.
    pub fn tvd_thresholds(&self) -> Option<(f64, f64)> {
        self.tvd_warning.zip(self.tvd_alarm)
    }

    /// Dedicated closure thresholds, if both are configured.
    pub fn closure_thresholds(&self) -> Option<(f64, f64)> {
        self.closure_warning.zip(self.closure_alarm)
    }
}
