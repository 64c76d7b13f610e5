//! agri-fields - farm field records with soil and image analysis
//!
//! # Usage
//!
//! ```bash
//! # Serve the HTTP API
//! agri-fields serve --addr 0.0.0.0:8080
//!
//! # Record a soil test and print the report
//! agri-fields soil 1 --ph 5.2 --nitrogen 22
//! agri-fields report 1
//! ```
//!
//! # Environment Variables
//!
//! - `AGRI_CONFIG`: Path to a config file (default: ./agri_config.toml)
//! - `AGRI_SERVER_ADDR`: Bind address for `serve`
//! - `AGRI_CORS_ORIGINS`: Comma-separated allowed CORS origins
//! - `AGRI_LOG_FORMAT`: Set to "json" for JSON log lines
//! - `RUST_LOG`: Logging level (default: info)
//! - `RESET_DB`: Set to "true" to wipe the field store on startup

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use agri_fields::api::{create_app, ApiState};
use agri_fields::config::{self, defaults, AppConfig};
use agri_fields::imaging::{ImageUpload, MockImageAnalyzer};
use agri_fields::report::render_text;
use agri_fields::{FieldService, NewField, SledFieldStore, SoilClassifier, SoilParameter, SoilReading};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "agri-fields")]
#[command(about = "Farm field records with soil and image analysis")]
#[command(version)]
struct CliArgs {
    /// Path to a TOML config file (overrides AGRI_CONFIG and ./agri_config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Wipe the field store before opening it.
    /// WARNING: This is destructive and cannot be undone!
    /// Can also be set via RESET_DB=true environment variable.
    #[arg(long, global = true)]
    reset_db: bool,

    #[command(subcommand)]
    command: SubCommand,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Serve the HTTP API
    Serve {
        /// Override the server address (default: "127.0.0.1:8080")
        #[arg(short, long)]
        addr: Option<String>,
    },

    /// List, add or show fields
    #[command(subcommand)]
    Fields(FieldsCommand),

    /// Record a soil test for a field
    Soil {
        /// Field id
        id: String,
        #[arg(long, default_value_t = 6.5)]
        ph: f64,
        /// Nitrogen (ppm)
        #[arg(long, default_value_t = 45.0)]
        nitrogen: f64,
        /// Phosphorus (ppm)
        #[arg(long, default_value_t = 35.0)]
        phosphorus: f64,
        /// Potassium (ppm)
        #[arg(long, default_value_t = 40.0)]
        potassium: f64,
        /// Organic matter (%)
        #[arg(long, default_value_t = 3.5)]
        organic_matter: f64,
    },

    /// Analyze an image file for a field
    Image {
        /// Field id
        id: String,
        /// Image file (PNG, JPG)
        path: PathBuf,
    },

    /// Print the report for a field
    Report {
        /// Field id
        id: String,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print dashboard counts
    Stats,

    /// Show or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(clap::Subcommand, Debug)]
enum FieldsCommand {
    /// List all fields
    List,
    /// Add a field
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        location: String,
    },
    /// Show one field as JSON
    Show { id: String },
}

#[derive(clap::Subcommand, Debug)]
enum ConfigCommand {
    /// Print the effective configuration as TOML
    Show,
    /// Validate a config file without starting anything
    Check { path: PathBuf },
}

// ============================================================================
// Logging
// ============================================================================

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = std::env::var(defaults::LOG_FORMAT_ENV_VAR)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }
}

// ============================================================================
// Database Reset
// ============================================================================

/// Check if database reset is requested via CLI flag or environment variable.
fn should_reset_db(cli_flag: bool) -> bool {
    if cli_flag {
        return true;
    }
    if let Ok(val) = std::env::var("RESET_DB") {
        let val_lower = val.to_lowercase();
        return val_lower == "true" || val_lower == "1" || val_lower == "yes";
    }
    false
}

/// Remove the field store directory and all its contents.
fn reset_store_directory(store_path: &Path) -> Result<()> {
    if !store_path.exists() {
        info!(path = %store_path.display(), "Field store does not exist, nothing to reset");
        return Ok(());
    }

    warn!(path = %store_path.display(), "RESET_DB detected, wiping field store");
    std::fs::remove_dir_all(store_path)
        .with_context(|| format!("Failed to remove {}", store_path.display()))?;
    warn!("Field store removed. A fresh one will be created on startup.");

    Ok(())
}

// ============================================================================
// Startup
// ============================================================================

fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    match explicit {
        Some(path) => {
            let config = AppConfig::load_from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?;
            info!(path = %path.display(), "Loaded config from --config");
            Ok(config)
        }
        None => Ok(AppConfig::load()),
    }
}

fn open_service(config: &AppConfig) -> Result<FieldService> {
    if let Some(parent) = config.storage.path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    let store = SledFieldStore::open(&config.storage.path).with_context(|| {
        format!("Failed to open field store at {}", config.storage.path.display())
    })?;

    let service = FieldService::new(
        Arc::new(store),
        Arc::new(MockImageAnalyzer::new(&config.imaging)),
        SoilClassifier::new(config.soil),
        config.imaging.max_upload_bytes,
    );

    if config.storage.seed_sample_fields {
        service.seed_sample_fields().context("Failed to seed sample fields")?;
    }
    Ok(service)
}

async fn serve(config: AppConfig, service: FieldService, addr_override: Option<String>) -> Result<()> {
    let server_addr = config::resolve_server_addr(addr_override, &config);
    let app = create_app(ApiState::new(Arc::new(service), Arc::new(config)));

    let listener = tokio::net::TcpListener::bind(&server_addr)
        .await
        .with_context(|| format!("Failed to bind {server_addr}"))?;
    info!(addr = %server_addr, "HTTP API listening");

    // Graceful shutdown via Ctrl+C
    let cancel_token = CancellationToken::new();
    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received Ctrl+C, initiating shutdown...");
        shutdown_token.cancel();
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            cancel_token.cancelled().await;
        })
        .await
        .context("HTTP server error")?;

    info!("Graceful shutdown complete");
    Ok(())
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let args = CliArgs::parse();

    // Config commands never touch the store
    if let SubCommand::Config(cmd) = &args.command {
        return match cmd {
            ConfigCommand::Show => {
                let config = load_config(args.config.as_deref())?;
                print!("{}", config.to_toml()?);
                Ok(())
            }
            ConfigCommand::Check { path } => {
                AppConfig::load_from_file(path)?;
                println!("{}: OK", path.display());
                Ok(())
            }
        };
    }

    let config = load_config(args.config.as_deref())?;

    // Reset DB check, before the store is opened
    if should_reset_db(args.reset_db) {
        reset_store_directory(&config.storage.path)?;
    }

    let service = open_service(&config)?;

    match args.command {
        SubCommand::Serve { addr } => serve(config, service, addr).await?,

        SubCommand::Fields(FieldsCommand::List) => {
            for field in service.list_fields()? {
                println!(
                    "{:<15} {:<20} {:<25} {}  images:{} soil:{}",
                    field.id,
                    field.name,
                    field.location,
                    field.last_updated.format("%Y-%m-%d"),
                    if field.has_images { "yes" } else { "no" },
                    if field.has_soil_data { "yes" } else { "no" },
                );
            }
        }
        SubCommand::Fields(FieldsCommand::Add { name, location }) => {
            let field = service.add_field(NewField { name, location })?;
            println!("Added field {} ({})", field.id, field.name);
        }
        SubCommand::Fields(FieldsCommand::Show { id }) => {
            let field = service.field(&id)?;
            println!("{}", serde_json::to_string_pretty(&field)?);
        }

        SubCommand::Soil {
            id,
            ph,
            nitrogen,
            phosphorus,
            potassium,
            organic_matter,
        } => {
            let reading = SoilReading {
                ph,
                nitrogen,
                phosphorus,
                potassium,
                organic_matter,
            };
            let field = service.save_soil_data(&id, reading)?;
            let Some(analysis) = field.soil_analysis else {
                bail!("soil analysis missing after save for field {id}");
            };
            println!("Soil data saved for {}", field.name);
            for parameter in SoilParameter::ALL {
                println!(
                    "  {:<15} {:>7.1}  {}",
                    parameter.display_name(),
                    reading.value(parameter),
                    analysis.get(parameter).status
                );
            }
        }

        SubCommand::Image { id, path } => {
            let upload = ImageUpload::from_path(&path)?;
            let field = service.analyze_image(&id, &upload)?;
            if let Some(analysis) = field.image_analysis {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            }
        }

        SubCommand::Report { id, json } => {
            let report = service.report(&id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", render_text(&report));
            }
        }

        SubCommand::Stats => {
            let stats = service.dashboard_stats()?;
            println!("Total fields:    {}", stats.total_fields);
            println!("Images analyzed: {}", stats.images_analyzed);
            println!("Soil reports:    {}", stats.soil_reports);
        }

        SubCommand::Config(_) => {}
    }

    Ok(())
}
