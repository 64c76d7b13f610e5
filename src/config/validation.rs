//! Config validation: unknown-key detection with Levenshtein suggestions
//! and agronomic range checks.
//!
//! Two-pass parse approach: first deserialize raw TOML into `toml::Value`,
//! walk the key tree, compare against known field names, and emit warnings
//! with "did you mean?" suggestions. Then proceed with normal serde
//! deserialization. Warnings never break existing configs.

use std::collections::HashSet;

use crate::types::soil_thresholds::{PH_DOMAIN_MAX, PH_DOMAIN_MIN};

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
            write!(f, ", did you mean '{s}'?")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Returns the complete set of valid dotted key paths for AppConfig.
///
/// Maintained by hand to match the struct hierarchy in app_config.rs.
/// Any new field added to AppConfig must be added here too.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [server]
        "server",
        "server.addr",
        // [storage]
        "storage",
        "storage.path",
        "storage.seed_sample_fields",
        // [soil]
        "soil",
        "soil.ph_good_min",
        "soil.ph_good_max",
        "soil.ph_fair_min",
        "soil.nitrogen_optimal_ppm",
        "soil.phosphorus_optimal_ppm",
        "soil.potassium_optimal_ppm",
        "soil.nutrient_good_percent",
        "soil.nutrient_fair_percent",
        "soil.organic_matter_good_percent",
        // [imaging]
        "imaging",
        "imaging.weed_detection_probability",
        "imaging.confidence_floor",
        "imaging.confidence_span",
        "imaging.max_upload_bytes",
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

// ============================================================================
// Levenshtein Distance
// ============================================================================

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
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|&k| (k, levenshtein(unknown, k)))
        .filter(|&(_, dist)| dist <= 3)
        // Tie-break on the key so the suggestion does not depend on hash order
        .min_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)))
        .map(|(k, _)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// This does NOT fail on unknown keys, it only warns.
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
// Agronomic Range Validation
// ============================================================================

/// Validate value ranges on a parsed AppConfig.
///
/// Returns (errors, warnings): errors are impossible values that must
/// prevent startup; warnings are suspicious but not fatal.
pub fn validate_physical_ranges(
    config: &super::AppConfig,
) -> (Vec<String>, Vec<ValidationWarning>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let s = &config.soil;

    for (name, value) in [
        ("soil.ph_fair_min", s.ph_fair_min),
        ("soil.ph_good_min", s.ph_good_min),
        ("soil.ph_good_max", s.ph_good_max),
    ] {
        if value < PH_DOMAIN_MIN || value > PH_DOMAIN_MAX {
            errors.push(format!(
                "{name} = {value:.2} is outside the pH scale ({PH_DOMAIN_MIN:.0}-{PH_DOMAIN_MAX:.0})"
            ));
        }
    }

    if s.organic_matter_good_percent < 0.0 || s.organic_matter_good_percent > 100.0 {
        errors.push(format!(
            "soil.organic_matter_good_percent = {:.2} is not a percentage",
            s.organic_matter_good_percent
        ));
    }

    // Most mineral soils sit between 1% and 10% organic matter
    if s.organic_matter_good_percent > 10.0 {
        warnings.push(ValidationWarning {
            field: "soil.organic_matter_good_percent".to_string(),
            message: format!(
                "organic_matter_good_percent = {:.1} is above the typical range (1-10 %)",
                s.organic_matter_good_percent
            ),
            suggestion: None,
        });
    }

    for (name, value) in [
        ("soil.nitrogen_optimal_ppm", s.nitrogen_optimal_ppm),
        ("soil.phosphorus_optimal_ppm", s.phosphorus_optimal_ppm),
        ("soil.potassium_optimal_ppm", s.potassium_optimal_ppm),
    ] {
        if value > 1000.0 {
            warnings.push(ValidationWarning {
                field: name.to_string(),
                message: format!("{name} = {value:.1} is outside the typical range (1-1000 ppm)"),
                suggestion: None,
            });
        }
    }

    if s.nutrient_good_percent > 200.0 {
        warnings.push(ValidationWarning {
            field: "soil.nutrient_good_percent".to_string(),
            message: format!(
                "nutrient_good_percent = {:.1} means readings well above optimal still classify as Fair",
                s.nutrient_good_percent
            ),
            suggestion: None,
        });
    }

    (errors, warnings)
}

// ============================================================================
// Tests
// ============================================================================
