//! Application Configuration Module
//!
//! Provides configuration loaded from TOML files: soil classification bands,
//! image mock tuning, storage location and server address.
//!
//! ## Loading Order
//!
//! 1. `--config PATH` on the command line
//! 2. `AGRI_CONFIG` environment variable (path to TOML file)
//! 3. `agri_config.toml` in the current working directory
//! 4. Built-in defaults
//!
//! ## Usage
//!
//! The loaded config is passed explicitly to the components that need it:
//!
//! ```ignore
//! let config = AppConfig::load();
//! let classifier = SoilClassifier::new(config.soil);
//! ```

mod app_config;
pub mod defaults;
pub mod validation;

pub use app_config::*;

/// Resolve the server bind address: explicit override, then
/// `AGRI_SERVER_ADDR`, then the config file value.
pub fn resolve_server_addr(cli_override: Option<String>, config: &AppConfig) -> String {
    cli_override
        .or_else(|| std::env::var(defaults::SERVER_ADDR_ENV_VAR).ok())
        .unwrap_or_else(|| config.server.addr.clone())
}
