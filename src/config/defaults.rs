//! System-wide default constants.
//!
//! Grouped by subsystem for easy discovery. Soil bands live in
//! [`crate::types::soil_thresholds`].

// ============================================================================
// Configuration Loading
// ============================================================================

/// Environment variable naming a config file.
pub const CONFIG_ENV_VAR: &str = "AGRI_CONFIG";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "agri_config.toml";

// ============================================================================
// Server
// ============================================================================

/// Default HTTP bind address.
pub const SERVER_ADDR: &str = "127.0.0.1:8080";

/// Environment variable overriding the bind address.
pub const SERVER_ADDR_ENV_VAR: &str = "AGRI_SERVER_ADDR";

/// Comma-separated list of allowed CORS origins.
pub const CORS_ORIGINS_ENV_VAR: &str = "AGRI_CORS_ORIGINS";

// ============================================================================
// Storage
// ============================================================================

/// Default sled database for field records.
pub const FIELD_DB_PATH: &str = "./data/fields.db";

// ============================================================================
// Image Analysis Mock
// ============================================================================

/// Probability that the mock analyzer reports weeds.
pub const WEED_DETECTION_PROBABILITY: f64 = 0.7;

/// Lowest mock detection confidence (%).
pub const MOCK_CONFIDENCE_FLOOR: f64 = 85.0;

/// Mock confidence is drawn from `[floor, floor + span)`.
pub const MOCK_CONFIDENCE_SPAN: f64 = 14.0;

/// Largest accepted image upload (bytes). 10 MiB.
pub const MAX_IMAGE_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

// ============================================================================
// Logging
// ============================================================================

/// Set to `json` for machine-readable log lines.
pub const LOG_FORMAT_ENV_VAR: &str = "AGRI_LOG_FORMAT";
