//! Config validation: unknown-key detection with Levenshtein suggestions
//! and physical range checks.
//!
//! Two-pass parse approach: first deserialize raw TOML into `toml::Value`,
//! walk the key tree, compare against known field names, and emit warnings
//! with "did you mean?" suggestions. Then proceed with normal serde
//! deserialization. Warnings never break existing configs.

use std::collections::HashSet;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " (did you mean '{s}'?)")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Returns the complete set of valid dotted key paths for WellpathConfig.
///
/// Maintained by hand to match the struct hierarchy in well_config.rs.
/// Any new field added to WellpathConfig must be added here too.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [well]
        "well",
        "well.name",
        "well.field",
        "well.rig",
        // [limits]
        "limits",
        "limits.dls_warning",
        "limits.dls_alarm",
        "limits.distance_3d_warning",
        "limits.distance_3d_alarm",
        "limits.tvd_warning",
        "limits.tvd_alarm",
        "limits.closure_warning",
        "limits.closure_alarm",
        // [vertical_section]
        "vertical_section",
        "vertical_section.default_azimuth_deg",
        // [bit_projection]
        "bit_projection",
        "bit_projection.survey_to_bit_distance",
        "bit_projection.apply_rates",
        "bit_projection.target_tvd",
        // [engine]
        "engine",
        "engine.correction_interval_m",
        "engine.resolve_unresolved_positions",
        // [engine.tie_in]
        "engine.tie_in",
        "engine.tie_in.md",
        "engine.tie_in.inc",
        "engine.tie_in.azi",
        "engine.tie_in.tvd",
        "engine.tie_in.northing",
        "engine.tie_in.easting",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// For example, a table `{ a = { b = 1, c = 2 } }` yields:
/// `["a", "a.b", "a.c"]`
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

/// Dotted paths of every float in the config that is NaN or infinite.
pub fn non_finite_keys(config: &super::WellpathConfig) -> Vec<String> {
    fn walk(value: &toml::Value, prefix: &str, out: &mut Vec<String>) {
        match value {
            toml::Value::Float(f) if !f.is_finite() => out.push(prefix.to_string()),
            toml::Value::Table(table) => {
                for (k, v) in table {
                    let path = if prefix.is_empty() {
                        k.clone()
                    } else {
                        format!("{prefix}.{k}")
                    };
                    walk(v, &path, out);
                }
            }
            _ => {}
        }
    }

    let mut out = Vec::new();
    if let Ok(value) = toml::Value::try_from(config) {
        walk(&value, "", &mut out);
    }
    out
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

/// Compute the Levenshtein edit distance between two strings.
fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
///
/// Ties go to the lexicographically smaller key so the suggestion is stable.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|&k| (levenshtein(unknown, k), k))
        .filter(|(dist, _)| *dist <= 3)
        .min()
        .map(|(_, k)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// This does NOT fail on unknown keys, it only warns. Existing configs
/// always continue to work.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let value: toml::Value = match raw_toml.parse() {
        Ok(v) => v,
        Err(_) => return Vec::new(), // parse errors are handled by serde later
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}

// ============================================================================
// Physical Range Validation
// ============================================================================

/// Validate physical ranges on a parsed WellpathConfig.
///
/// Returns (errors, warnings): errors are impossible values that must
/// prevent startup; warnings are suspicious but not fatal.
pub fn validate_physical_ranges(
    config: &super::WellpathConfig,
) -> (Vec<String>, Vec<ValidationWarning>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let l = &config.limits;

    // Half-configured optional axes fall back to 3D distance
    for (name, warning, alarm) in [
        ("limits.tvd", l.tvd_warning, l.tvd_alarm),
        ("limits.closure", l.closure_warning, l.closure_alarm),
    ] {
        if warning.is_some() != alarm.is_some() {
            warnings.push(ValidationWarning {
                field: name.to_string(),
                message: format!(
                    "{name}: only one of warning/alarm is set; the 3D distance limits will govern this axis"
                ),
                suggestion: None,
            });
        }
    }

    // DLS above 30 deg/30m is beyond any steerable assembly
    if l.dls_alarm > 30.0 {
        warnings.push(ValidationWarning {
            field: "limits.dls_alarm".to_string(),
            message: format!(
                "limits.dls_alarm = {:.1} deg/30m is unusually high",
                l.dls_alarm
            ),
            suggestion: None,
        });
    }

    if let Some(azi) = config.vertical_section.default_azimuth_deg {
        if !(0.0..360.0).contains(&azi) {
            warnings.push(ValidationWarning {
                field: "vertical_section.default_azimuth_deg".to_string(),
                message: format!(
                    "vertical_section.default_azimuth_deg = {azi:.1} is outside 0-360 and will be used modulo 360"
                ),
                suggestion: None,
            });
        }
    }

    let bit = &config.bit_projection;
    if bit.survey_to_bit_distance == 0.0 {
        warnings.push(ValidationWarning {
            field: "bit_projection.survey_to_bit_distance".to_string(),
            message: "bit_projection.survey_to_bit_distance = 0, the bit projection will sit on the last station".to_string(),
            suggestion: None,
        });
    } else if bit.survey_to_bit_distance > 100.0 {
        warnings.push(ValidationWarning {
            field: "bit_projection.survey_to_bit_distance".to_string(),
            message: format!(
                "bit_projection.survey_to_bit_distance = {:.1} m is unusually long",
                bit.survey_to_bit_distance
            ),
            suggestion: None,
        });
    }

    let tie_in = &config.engine.tie_in;
    if !(0.0..=180.0).contains(&tie_in.inc) {
        errors.push(format!(
            "engine.tie_in.inc = {:.1} is outside physical range (0-180 deg)",
            tie_in.inc
        ));
    }
    if tie_in.md < 0.0 {
        errors.push(format!(
            "engine.tie_in.md = {:.1} cannot be negative",
            tie_in.md
        ));
    }

    (errors, warnings)
}
