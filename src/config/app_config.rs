//! Application configuration - soil bands, image mock tuning, storage and server
//!
//! Every classification threshold is a field here. Each struct implements
//! `Default` with the built-in constants, so running without a config file
//! gives the standard behavior.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::types::soil_thresholds as soil;

use super::defaults;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration.
///
/// Load with `AppConfig::load()` which searches:
/// 1. `$AGRI_CONFIG` env var
/// 2. `./agri_config.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Field store location and first-run behavior
    #[serde(default)]
    pub storage: StorageConfig,

    /// Soil classification bands
    #[serde(default)]
    pub soil: SoilThresholds,

    /// Image analysis mock and upload limits
    #[serde(default)]
    pub imaging: ImagingConfig,
}

impl AppConfig {
    /// Load configuration using the standard search order:
    /// 1. `$AGRI_CONFIG` environment variable
    /// 2. `./agri_config.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(defaults::CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded config from AGRI_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from AGRI_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "AGRI_CONFIG points to non-existent file, falling back");
            }
        }

        let local = PathBuf::from(defaults::LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded config from ./{}", defaults::LOCAL_CONFIG_FILE);
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{}, using defaults", defaults::LOCAL_CONFIG_FILE);
                }
            }
        }

        info!("No {} found, using built-in defaults", defaults::LOCAL_CONFIG_FILE);
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
    /// Unknown keys are logged as warnings and never fail the load.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let typo_warnings = super::validation::validate_unknown_keys(contents);
        for w in &typo_warnings {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(contents)
            .map_err(|e| ConfigError::Parse(PathBuf::from("<inline>"), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Validate all thresholds for internal consistency.
    ///
    /// Rules:
    /// - pH bands must nest: fair_min <= good_min <= good_max
    /// - Nutrient Fair percentage must be below the Good percentage
    /// - Optimal ppm values must be positive (they are divisors)
    /// - Probabilities within [0, 1], confidence within [0, 100]
    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.soil;
        let mut errors: Vec<String> = Vec::new();

        Self::check_ordered(s.ph_fair_min, s.ph_good_min, "soil.ph_fair_min", "soil.ph_good_min", &mut errors);
        Self::check_ordered(s.ph_good_min, s.ph_good_max, "soil.ph_good_min", "soil.ph_good_max", &mut errors);

        if s.nutrient_fair_percent >= s.nutrient_good_percent {
            errors.push(format!(
                "soil.nutrient_fair_percent ({:.1}) must be less than nutrient_good_percent ({:.1})",
                s.nutrient_fair_percent, s.nutrient_good_percent
            ));
        }

        for (name, value) in [
            ("soil.nitrogen_optimal_ppm", s.nitrogen_optimal_ppm),
            ("soil.phosphorus_optimal_ppm", s.phosphorus_optimal_ppm),
            ("soil.potassium_optimal_ppm", s.potassium_optimal_ppm),
        ] {
            if value <= 0.0 {
                errors.push(format!("{name} = {value:.3} must be > 0 (used as divisor)"));
            }
        }

        let img = &self.imaging;
        if !(0.0..=1.0).contains(&img.weed_detection_probability) {
            errors.push(format!(
                "imaging.weed_detection_probability = {:.3} must be within [0, 1]",
                img.weed_detection_probability
            ));
        }
        if img.confidence_floor < 0.0 || img.confidence_span < 0.0 {
            errors.push("imaging.confidence_floor and confidence_span must be >= 0".to_string());
        }
        if img.confidence_floor + img.confidence_span > 100.0 {
            errors.push(format!(
                "imaging.confidence_floor + confidence_span = {:.1} exceeds 100",
                img.confidence_floor + img.confidence_span
            ));
        }
        if img.max_upload_bytes == 0 {
            errors.push("imaging.max_upload_bytes must be > 0".to_string());
        }

        if self.storage.path.as_os_str().is_empty() {
            errors.push("storage.path must not be empty".to_string());
        }

        let (range_errors, range_warnings) = super::validation::validate_physical_ranges(self);
        errors.extend(range_errors);
        for w in &range_warnings {
            warn!("{}", w);
        }

        let non_finite: Vec<&str> = self
            .float_fields()
            .into_iter()
            .filter(|(_, v)| !v.is_finite())
            .map(|(name, _)| name)
            .collect();
        if !non_finite.is_empty() {
            errors.push(format!(
                "Config contains NaN or Inf values ({}), all thresholds must be finite numbers",
                non_finite.join(", ")
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    fn float_fields(&self) -> [(&'static str, f64); 12] {
        let s = &self.soil;
        let i = &self.imaging;
        [
            ("soil.ph_good_min", s.ph_good_min),
            ("soil.ph_good_max", s.ph_good_max),
            ("soil.ph_fair_min", s.ph_fair_min),
            ("soil.nitrogen_optimal_ppm", s.nitrogen_optimal_ppm),
            ("soil.phosphorus_optimal_ppm", s.phosphorus_optimal_ppm),
            ("soil.potassium_optimal_ppm", s.potassium_optimal_ppm),
            ("soil.nutrient_good_percent", s.nutrient_good_percent),
            ("soil.nutrient_fair_percent", s.nutrient_fair_percent),
            ("soil.organic_matter_good_percent", s.organic_matter_good_percent),
            ("imaging.weed_detection_probability", i.weed_detection_probability),
            ("imaging.confidence_floor", i.confidence_floor),
            ("imaging.confidence_span", i.confidence_span),
        ]
    }

    fn check_ordered(lower: f64, upper: f64, lower_name: &str, upper_name: &str, errors: &mut Vec<String>) {
        // NaN/Inf comparisons silently pass, catch them explicitly
        if !lower.is_finite() || !upper.is_finite() {
            errors.push(format!(
                "{lower_name}/{upper_name}: values must be finite (got {lower}, {upper})"
            ));
            return;
        }
        if lower > upper {
            errors.push(format!(
                "{lower_name} ({lower:.2}) must be <= {upper_name} ({upper:.2})"
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
// Server
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address for `serve`
    #[serde(default = "default_server_addr")]
    pub addr: String,
}

fn default_server_addr() -> String {
    defaults::SERVER_ADDR.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { addr: default_server_addr() }
    }
}

// ============================================================================
// Storage
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory of the sled field database
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,

    /// Insert the two sample fields when the store is empty
    #[serde(default = "default_seed_sample_fields")]
    pub seed_sample_fields: bool,
}

fn default_storage_path() -> PathBuf {
    PathBuf::from(defaults::FIELD_DB_PATH)
}
fn default_seed_sample_fields() -> bool { true }

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
            seed_sample_fields: default_seed_sample_fields(),
        }
    }
}

// ============================================================================
// Soil Thresholds
// ============================================================================

/// Classification bands for soil parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoilThresholds {
    /// Lower bound of the Good pH band (inclusive).
    #[serde(default = "default_ph_good_min")]
    pub ph_good_min: f64,

    /// Upper bound of the Good pH band (inclusive).
    #[serde(default = "default_ph_good_max")]
    pub ph_good_max: f64,

    /// Lower bound of the Fair pH band (inclusive); Fair runs up to `ph_good_min`.
    #[serde(default = "default_ph_fair_min")]
    pub ph_fair_min: f64,

    /// Nitrogen reference level (ppm).
    #[serde(default = "default_nitrogen_optimal")]
    pub nitrogen_optimal_ppm: f64,

    /// Phosphorus reference level (ppm).
    #[serde(default = "default_phosphorus_optimal")]
    pub phosphorus_optimal_ppm: f64,

    /// Potassium reference level (ppm).
    #[serde(default = "default_potassium_optimal")]
    pub potassium_optimal_ppm: f64,

    /// Percent of optimal at or above which a nutrient is Good.
    #[serde(default = "default_nutrient_good")]
    pub nutrient_good_percent: f64,

    /// Percent of optimal at or above which a nutrient is Fair.
    #[serde(default = "default_nutrient_fair")]
    pub nutrient_fair_percent: f64,

    /// Organic matter (%) at or above which it is Good.
    #[serde(default = "default_organic_matter_good")]
    pub organic_matter_good_percent: f64,
}

fn default_ph_good_min() -> f64 { soil::PH_GOOD_MIN }
fn default_ph_good_max() -> f64 { soil::PH_GOOD_MAX }
fn default_ph_fair_min() -> f64 { soil::PH_FAIR_MIN }
fn default_nitrogen_optimal() -> f64 { soil::NITROGEN_OPTIMAL_PPM }
fn default_phosphorus_optimal() -> f64 { soil::PHOSPHORUS_OPTIMAL_PPM }
fn default_potassium_optimal() -> f64 { soil::POTASSIUM_OPTIMAL_PPM }
fn default_nutrient_good() -> f64 { soil::NUTRIENT_GOOD_PERCENT }
fn default_nutrient_fair() -> f64 { soil::NUTRIENT_FAIR_PERCENT }
fn default_organic_matter_good() -> f64 { soil::ORGANIC_MATTER_GOOD_PERCENT }

impl Default for SoilThresholds {
    fn default() -> Self {
        Self {
            ph_good_min: default_ph_good_min(),
            ph_good_max: default_ph_good_max(),
            ph_fair_min: default_ph_fair_min(),
            nitrogen_optimal_ppm: default_nitrogen_optimal(),
            phosphorus_optimal_ppm: default_phosphorus_optimal(),
            potassium_optimal_ppm: default_potassium_optimal(),
            nutrient_good_percent: default_nutrient_good(),
            nutrient_fair_percent: default_nutrient_fair(),
            organic_matter_good_percent: default_organic_matter_good(),
        }
    }
}

// ============================================================================
// Imaging
// ============================================================================

/// Tuning for the randomized image analyzer and upload limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagingConfig {
    /// Chance that a mock analysis reports weeds.
    #[serde(default = "default_weed_probability")]
    pub weed_detection_probability: f64,

    /// Lowest mock confidence (%).
    #[serde(default = "default_confidence_floor")]
    pub confidence_floor: f64,

    /// Width of the mock confidence range above the floor (%).
    #[serde(default = "default_confidence_span")]
    pub confidence_span: f64,

    /// Largest accepted image upload (bytes).
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_weed_probability() -> f64 { defaults::WEED_DETECTION_PROBABILITY }
fn default_confidence_floor() -> f64 { defaults::MOCK_CONFIDENCE_FLOOR }
fn default_confidence_span() -> f64 { defaults::MOCK_CONFIDENCE_SPAN }
fn default_max_upload_bytes() -> usize { defaults::MAX_IMAGE_UPLOAD_BYTES }

impl Default for ImagingConfig {
    fn default() -> Self {
        Self {
            weed_detection_probability: default_weed_probability(),
            confidence_floor: default_confidence_floor(),
            confidence_span: default_confidence_span(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}
