//! Agri Fields: farm field records with soil and image analysis
//!
//! ## Architecture
//!
//! - **Analysis**: soil parameter classification and recommendation rules
//! - **Imaging**: image analyzer seam with a randomized stand-in model
//! - **Storage**: field record store (sled on disk, or in memory)
//! - **Report**: per-field reports, chart series and dashboard counts
//! - **Service**: the operations the CLI and HTTP API expose
//! - **API**: axum router over the service

pub mod analysis;
pub mod api;
pub mod config;
pub mod imaging;
pub mod report;
pub mod service;
pub mod storage;
pub mod types;

// Re-export configuration
pub use config::{AppConfig, SoilThresholds};

// Re-export commonly used types
pub use types::{
    FieldRecord, ImageAnalysis, NewField, ParameterStatus, RecommendationSet, SoilAnalysis,
    SoilParameter, SoilReading, SoilStatus, StatusLabel,
};

// Re-export the classification engine
pub use analysis::{
    build_recommendations, build_soil_analysis, classify_nutrient, classify_organic_matter,
    classify_ph, SoilClassifier,
};

// Re-export storage, imaging and service
pub use imaging::{ImageAnalyzer, ImageUpload, MockImageAnalyzer, StaticImageAnalyzer};
pub use report::{DashboardStats, FieldReport};
pub use service::{FieldService, ServiceError};
pub use storage::{FieldStore, InMemoryFieldStore, SledFieldStore, StoreError};
