//! Wellpath Configuration - limits and engine settings as operator-tunable TOML
//!
//! Each struct implements `Default`, so a missing file or a missing section
//! behaves exactly like the built-in constants in `defaults`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::defaults;
use crate::types::{BitProjectionConfig, Limits, TieIn};

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for one well / project.
///
/// Load with `WellpathConfig::load()` which searches:
/// 1. `$WELLPATH_CONFIG` env var
/// 2. `./wellpath.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WellpathConfig {
    /// Well identification
    #[serde(default)]
    pub well: WellInfo,

    /// Project-level deviation limits
    #[serde(default)]
    pub limits: Limits,

    /// Vertical section reference
    #[serde(default)]
    pub vertical_section: VerticalSectionConfig,

    /// Bit projection settings
    #[serde(default)]
    pub bit_projection: BitProjectionConfig,

    /// Engine constants
    #[serde(default)]
    pub engine: EngineConfig,
}

impl WellpathConfig {
    /// Load configuration using the standard search order:
    /// 1. `$WELLPATH_CONFIG` environment variable
    /// 2. `./wellpath.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        // 1. Check env var
        if let Ok(path) = std::env::var(defaults::CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), well = %config.well.name, "Loaded wellpath config from WELLPATH_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from WELLPATH_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "WELLPATH_CONFIG points to non-existent file, falling back");
            }
        }

        // 2. Check ./wellpath.toml
        let local = PathBuf::from(defaults::LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!(well = %config.well.name, "Loaded wellpath config from ./wellpath.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./wellpath.toml, using defaults");
                }
            }
        }

        // 3. Defaults
        info!("No wellpath.toml found, using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, err) => ConfigError::Parse(path.to_path_buf(), err),
            other => other,
        })
    }

    /// Parse and validate a TOML document.
    ///
    /// Unknown keys are reported as warnings only.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(contents)
            .map_err(|e| ConfigError::Parse(PathBuf::new(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Save config to a file.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_toml()?;
        std::fs::write(path, contents)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        info!(path = %path.display(), "Wellpath config saved");
        Ok(())
    }

    /// VS azimuth used when the selected plan has no override.
    pub fn project_vs_azimuth(&self) -> Option<f64> {
        self.vertical_section.default_azimuth_deg
    }

    /// Validate all thresholds for internal consistency.
    ///
    /// Rules:
    /// - Alarm thresholds must be >= warning thresholds
    /// - Thresholds must be finite and non-negative
    /// - Correction interval must be > 0
    /// - Survey-to-bit distance must not be negative
    pub fn validate(&self) -> Result<(), ConfigError> {
        let l = &self.limits;
        let mut errors: Vec<String> = Vec::new();

        Self::check_escalation(l.dls_warning, l.dls_alarm, "limits.dls", &mut errors);
        Self::check_escalation(
            l.distance_3d_warning,
            l.distance_3d_alarm,
            "limits.distance_3d",
            &mut errors,
        );
        if let Some((warning, alarm)) = l.tvd_thresholds() {
            Self::check_escalation(warning, alarm, "limits.tvd", &mut errors);
        }
        if let Some((warning, alarm)) = l.closure_thresholds() {
            Self::check_escalation(warning, alarm, "limits.closure", &mut errors);
        }

        let e = &self.engine;
        if !(e.correction_interval_m > 0.0) {
            errors.push(format!(
                "engine.correction_interval_m must be > 0 (got {})",
                e.correction_interval_m
            ));
        }

        if self.bit_projection.survey_to_bit_distance < 0.0 {
            errors.push(format!(
                "bit_projection.survey_to_bit_distance = {:.1} cannot be negative",
                self.bit_projection.survey_to_bit_distance
            ));
        }

        // Physical range validation
        let (range_errors, range_warnings) = super::validation::validate_physical_ranges(self);
        errors.extend(range_errors);
        for w in &range_warnings {
            warn!("{}", w);
        }

        // Reject NaN/Inf in any config value (sweep all f64 fields via serialization)
        for key in super::validation::non_finite_keys(self) {
            errors.push(format!("{key} is NaN or Inf, all values must be finite numbers"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    fn check_escalation(warning: f64, alarm: f64, name: &str, errors: &mut Vec<String>) {
        // NaN/Inf comparisons silently pass, catch them explicitly
        if !warning.is_finite() || !alarm.is_finite() {
            errors.push(format!(
                "{name}: values must be finite (got warning={warning}, alarm={alarm})"
            ));
            return;
        }
        if warning < 0.0 {
            errors.push(format!("{name}: warning ({warning:.3}) cannot be negative"));
        }
        if alarm < warning {
            errors.push(format!(
                "{name}: alarm ({alarm:.3}) must be >= warning ({warning:.3})"
            ));
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
    Serialize(toml::ser::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "Config I/O error ({}): {}", path.display(), e),
            ConfigError::Parse(path, e) => {
                write!(f, "Config parse error ({}): {}", path.display(), e)
            }
            ConfigError::Serialize(e) => write!(f, "Config serialization error: {}", e),
            ConfigError::Validation(errors) => {
                writeln!(f, "Config validation failed:")?;
                for e in errors {
                    writeln!(f, "  - {}", e)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Well Info
// ============================================================================

/// Identification metadata, not used for logic but appears in logs and reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellInfo {
    /// Well name / identifier
    #[serde(default = "default_well_name")]
    pub name: String,

    /// Field name
    #[serde(default)]
    pub field: String,

    /// Rig name
    #[serde(default)]
    pub rig: String,
}

fn default_well_name() -> String {
    "DEFAULT".to_string()
}

impl Default for WellInfo {
    fn default() -> Self {
        Self {
            name: default_well_name(),
            field: String::new(),
            rig: String::new(),
        }
    }
}

// ============================================================================
// Vertical Section
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VerticalSectionConfig {
    /// Project-level VS azimuth (deg). A plan-level override wins.
    #[serde(default)]
    pub default_azimuth_deg: Option<f64>,
}

// ============================================================================
// Engine
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Interval over which required build/turn rates cancel a variance (m)
    #[serde(default = "default_correction_interval")]
    pub correction_interval_m: f64,

    /// Compute missing survey positions by minimum curvature instead of
    /// treating them as zero
    #[serde(default)]
    pub resolve_unresolved_positions: bool,

    /// Reference point for the first survey
    #[serde(default)]
    pub tie_in: TieIn,
}

fn default_correction_interval() -> f64 {
    defaults::CORRECTION_INTERVAL_M
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            correction_interval_m: default_correction_interval(),
            resolve_unresolved_positions: false,
            tie_in: TieIn::default(),
        }
    }
}
