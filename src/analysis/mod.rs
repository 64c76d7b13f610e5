//! Soil Classification & Recommendation Engine
//!
//! - `classify`: threshold rules mapping soil readings to status labels
//! - `recommendations`: ordered action list from image and soil analyses
//!
//! Everything here is synchronous and side-effect free. Callers classify a
//! reading once, persist the result, and build recommendations from what is
//! stored.

pub mod classify;
pub mod recommendations;

pub use classify::{
    build_soil_analysis, classify_nutrient, classify_organic_matter, classify_ph,
    nutrient_percentage, Nutrient, SoilClassifier,
};
pub use recommendations::build_recommendations;
