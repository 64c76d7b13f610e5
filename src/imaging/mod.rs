//! Field image analysis
//!
//! There is no vision model behind this module. [`MockImageAnalyzer`] draws a
//! plausible weed/crop result at random, and [`StaticImageAnalyzer`] returns a
//! fixed one. Both sit behind [`ImageAnalyzer`] so a real model can be dropped
//! in without touching the soil engine or the store.

use std::path::Path;
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::config::ImagingConfig;
use crate::types::ImageAnalysis;

pub const WEED_TYPES: [&str; 3] = ["Broadleaf Weed", "Grass Weed", "Sedge Weed"];
pub const CROP_HEALTH_GRADES: [&str; 3] = ["Excellent", "Good", "Fair"];
pub const WEED_ACTIONS: [&str; 3] = [
    "Apply selective herbicide within 48 hours",
    "Monitor for spread to adjacent areas",
    "Consider manual removal for small patches",
];

/// Anything that turns an uploaded image into an [`ImageAnalysis`].
pub trait ImageAnalyzer: Send + Sync {
    fn analyze(&self, image: &ImageUpload) -> ImageAnalysis;

    /// Analyzer name for logging
    fn name(&self) -> &'static str;
}

// ============================================================================
// Uploads
// ============================================================================

/// An image submitted for analysis.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: Option<String>,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("Please select an image file (got content type '{0}')")]
    NotAnImage(String),
    #[error("Image is empty")]
    Empty,
    #[error("Image is {size} bytes, limit is {limit} bytes")]
    TooLarge { size: usize, limit: usize },
    #[error("Failed to read image {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ImageUpload {
    pub fn new(content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: None,
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Read an image from disk, guessing its content type from the extension.
    pub fn from_path(path: &Path) -> Result<Self, ImageError> {
        let bytes = std::fs::read(path).map_err(|source| ImageError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let content_type = mime_guess::from_path(path).first_or_octet_stream();
        Ok(Self {
            file_name: path.file_name().map(|n| n.to_string_lossy().into_owned()),
            content_type: content_type.essence_str().to_string(),
            bytes,
        })
    }

    /// Reject non-images, empty bodies and oversized uploads.
    pub fn validate(&self, max_bytes: usize) -> Result<(), ImageError> {
        if !self.content_type.trim().to_ascii_lowercase().starts_with("image/") {
            return Err(ImageError::NotAnImage(self.content_type.clone()));
        }
        if self.bytes.is_empty() {
            return Err(ImageError::Empty);
        }
        if self.bytes.len() > max_bytes {
            return Err(ImageError::TooLarge {
                size: self.bytes.len(),
                limit: max_bytes,
            });
        }
        Ok(())
    }
}

// ============================================================================
// Randomized analyzer
// ============================================================================

/// Randomized stand-in for a weed detection model.
pub struct MockImageAnalyzer {
    rng: Mutex<StdRng>,
    weed_probability: f64,
    confidence_floor: f64,
    confidence_span: f64,
}

impl MockImageAnalyzer {
    /// Entropy-seeded analyzer tuned from configuration.
    pub fn new(config: &ImagingConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Deterministic analyzer for tests and demos.
    pub fn seeded(config: &ImagingConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &ImagingConfig, rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
            weed_probability: config.weed_detection_probability.clamp(0.0, 1.0),
            confidence_floor: config.confidence_floor,
            confidence_span: config.confidence_span.max(0.0),
        }
    }
}

impl ImageAnalyzer for MockImageAnalyzer {
    fn analyze(&self, image: &ImageUpload) -> ImageAnalysis {
        let mut rng = self.rng.lock().unwrap_or_else(|e| {
            tracing::warn!("Mutex poisoned on analyzer RNG, recovering");
            e.into_inner()
        });

        let weed_detected = rng.gen_bool(self.weed_probability);
        let weed_type = WEED_TYPES.choose(&mut *rng).copied().unwrap_or(WEED_TYPES[0]);
        let raw_confidence = self.confidence_floor + rng.gen::<f64>() * self.confidence_span;
        let crop_health = CROP_HEALTH_GRADES
            .choose(&mut *rng)
            .copied()
            .unwrap_or(CROP_HEALTH_GRADES[0]);

        tracing::debug!(
            file = image.file_name.as_deref().unwrap_or("<upload>"),
            bytes = image.bytes.len(),
            weed_detected,
            "Mock image analysis"
        );

        ImageAnalysis {
            weed_detected,
            weed_type: weed_type.to_string(),
            confidence: (raw_confidence * 10.0).round() / 10.0,
            crop_health: crop_health.to_string(),
            recommendations: WEED_ACTIONS.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

// ============================================================================
// Fixed analyzer
// ============================================================================

/// Returns the same analysis for every image.
pub struct StaticImageAnalyzer {
    result: ImageAnalysis,
}

impl StaticImageAnalyzer {
    pub fn new(result: ImageAnalysis) -> Self {
        Self { result }
    }
}

impl ImageAnalyzer for StaticImageAnalyzer {
    fn analyze(&self, _image: &ImageUpload) -> ImageAnalysis {
        self.result.clone()
    }

    fn name(&self) -> &'static str {
        "static"
    }
}
