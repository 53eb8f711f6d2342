//! Survey, plan and scenario stations

use serde::{Deserialize, Serialize};

// ============================================================================
// GeoValue - nullable geometry
// ============================================================================

/// A position component that may not have been computed yet.
///
/// Serialises as a plain nullable number. Arithmetic consumers call
/// [`GeoValue::or_zero`]; display consumers can still tell a true zero
/// apart from "not yet resolved".
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum GeoValue {
    Known(f64),
    #[default]
    Unresolved,
}

impl GeoValue {
    /// Value for arithmetic, with `Unresolved` treated as 0.0.
    pub fn or_zero(self) -> f64 {
        match self {
            Self::Known(v) => v,
            Self::Unresolved => 0.0,
        }
    }

    pub fn is_known(self) -> bool {
        matches!(self, Self::Known(_))
    }

    pub fn as_option(self) -> Option<f64> {
        self.into()
    }
}

impl From<Option<f64>> for GeoValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Unresolved, Self::Known)
    }
}

impl From<GeoValue> for Option<f64> {
    fn from(value: GeoValue) -> Self {
        match value {
            GeoValue::Known(v) => Some(v),
            GeoValue::Unresolved => None,
        }
    }
}

impl From<f64> for GeoValue {
    fn from(value: f64) -> Self {
        Self::Known(value)
    }
}

// ============================================================================
// StationGeometry - anything the projector can start from
// ============================================================================

/// Read access to the geometry of a station, real or synthetic.
///
/// Angles are degrees, lengths metres. Unresolved position components
/// report 0.0.
pub trait StationGeometry {
    fn md(&self) -> f64;
    fn inc(&self) -> f64;
    fn azi(&self) -> f64;
    fn tvd(&self) -> f64;
    fn northing(&self) -> f64;
    fn easting(&self) -> f64;
}

// ============================================================================
// Survey Station
// ============================================================================

/// A directional survey measurement from the actual wellbore.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurveyStation {
    /// Measured depth (m)
    pub md: f64,
    /// Inclination (deg, 0-180)
    pub inc: f64,
    /// Azimuth (deg, 0-360)
    pub azi: f64,
    #[serde(default)]
    pub tvd: GeoValue,
    #[serde(default)]
    pub northing: GeoValue,
    #[serde(default)]
    pub easting: GeoValue,
}

impl SurveyStation {
    /// Station with position not yet computed.
    pub fn new(md: f64, inc: f64, azi: f64) -> Self {
        Self {
            md,
            inc,
            azi,
            tvd: GeoValue::Unresolved,
            northing: GeoValue::Unresolved,
            easting: GeoValue::Unresolved,
        }
    }

    pub fn with_position(mut self, tvd: f64, northing: f64, easting: f64) -> Self {
        self.tvd = GeoValue::Known(tvd);
        self.northing = GeoValue::Known(northing);
        self.easting = GeoValue::Known(easting);
        self
    }

    /// True when all three position components are known.
    pub fn is_resolved(&self) -> bool {
        self.tvd.is_known() && self.northing.is_known() && self.easting.is_known()
    }
}

impl StationGeometry for SurveyStation {
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
        self.tvd.or_zero()
    }
    fn northing(&self) -> f64 {
        self.northing.or_zero()
    }
    fn easting(&self) -> f64 {
        self.easting.or_zero()
    }
}

// ============================================================================
// Tie-In
// ============================================================================

/// Reference point the first survey (or an anchorless scenario chain) is
/// measured from. Defaults to the surface origin, vertical.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TieIn {
    #[serde(default)]
    pub md: f64,
    #[serde(default)]
    pub inc: f64,
    #[serde(default)]
    pub azi: f64,
    #[serde(default)]
    pub tvd: f64,
    #[serde(default)]
    pub northing: f64,
    #[serde(default)]
    pub easting: f64,
}

impl TieIn {
    /// The tie-in expressed as a resolved survey station.
    pub fn as_survey(&self) -> SurveyStation {
        SurveyStation::new(self.md, self.inc, self.azi).with_position(
            self.tvd,
            self.northing,
            self.easting,
        )
    }
}

impl StationGeometry for TieIn {
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
// Plan
// ============================================================================

/// A station on a planned trajectory. Plan positions are always known.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanStation {
    pub md: f64,
    pub inc: f64,
    pub azi: f64,
    pub tvd: f64,
    pub northing: f64,
    pub easting: f64,
    /// Vertical section as supplied by the planning package (display only;
    /// the engine recomputes VS against the effective azimuth)
    #[serde(default)]
    pub vs: Option<f64>,
}

impl PlanStation {
    pub fn new(md: f64, inc: f64, azi: f64, tvd: f64, northing: f64, easting: f64) -> Self {
        Self {
            md,
            inc,
            azi,
            tvd,
            northing,
            easting,
            vs: None,
        }
    }
}

impl StationGeometry for PlanStation {
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

/// A named, versioned well plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub name: String,
    #[serde(default)]
    pub revision: u32,
    /// Plan-level VS azimuth override (deg)
    #[serde(default)]
    pub vs_azimuth: Option<f64>,
    /// Stations ordered by MD
    #[serde(default)]
    pub stations: Vec<PlanStation>,
}

impl Plan {
    pub fn new(name: impl Into<String>, revision: u32, stations: Vec<PlanStation>) -> Self {
        Self {
            name: name.into(),
            revision,
            vs_azimuth: None,
            stations,
        }
    }

    pub fn with_vs_azimuth(mut self, azimuth: f64) -> Self {
        self.vs_azimuth = Some(azimuth);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

// ============================================================================
// Scenario Stations
// ============================================================================

/// The user-recorded input of a what-if station: course length from the
/// predecessor plus the inclination/azimuth expected at the end of it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioLeg {
    /// Course length (m)
    pub distance: f64,
    pub inc: f64,
    pub azi: f64,
}

impl ScenarioLeg {
    pub fn new(distance: f64, inc: f64, azi: f64) -> Self {
        Self { distance, inc, azi }
    }
}

/// An ephemeral projected station. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioStation {
    /// The leg this station was projected with
    pub leg: ScenarioLeg,
    pub md: f64,
    pub inc: f64,
    pub azi: f64,
    pub tvd: f64,
    pub northing: f64,
    pub easting: f64,
    pub vs: f64,
    /// Dogleg relative to the predecessor (deg)
    pub dogleg_deg: f64,
    /// Dogleg severity relative to the predecessor (deg/30m)
    pub dls: f64,
}

impl StationGeometry for ScenarioStation {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geo_value_null_round_trip() {
        let json = r#"{"md": 100.0, "inc": 1.0, "azi": 45.0, "tvd": null, "northing": 0.0}"#;
        let station: SurveyStation = serde_json::from_str(json).unwrap();

        assert_eq!(station.tvd, GeoValue::Unresolved);
        assert_eq!(station.northing, GeoValue::Known(0.0));
        // Field omitted entirely
        assert_eq!(station.easting, GeoValue::Unresolved);
        assert!(!station.is_resolved());

        let out = serde_json::to_value(station).unwrap();
        assert!(out["tvd"].is_null());
        assert_eq!(out["northing"], serde_json::json!(0.0));
    }

    #[test]
    fn test_unresolved_reads_as_zero() {
        let station = SurveyStation::new(500.0, 10.0, 120.0);
        assert_eq!(StationGeometry::tvd(&station), 0.0);
        assert!(!station.tvd.is_known());

        let resolved = station.with_position(498.0, -12.0, 20.0);
        assert!(resolved.is_resolved());
        assert_eq!(resolved.tvd.as_option(), Some(498.0));
    }
}
