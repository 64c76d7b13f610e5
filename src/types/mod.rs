//! Shared data structures for field record keeping
//!
//! - Soil readings and their classification (`SoilReading`, `SoilAnalysis`)
//! - Image analysis results (`ImageAnalysis`)
//! - Field records (`FieldRecord`)
//! - Threshold and chart constants

mod field;
mod image;
mod soil;
pub mod thresholds;

pub use field::*;
pub use image::*;
pub use soil::*;
pub use thresholds::*;

/// Ordered, human-readable actions for a field.
pub type RecommendationSet = Vec<String>;
