//! Image analysis results (weed and crop detection)

use serde::{Deserialize, Deserializer, Serialize};

/// Result of analysing one field image.
///
/// Produced by an [`crate::imaging::ImageAnalyzer`]; the classification engine
/// only reads `weed_detected` and `recommendations`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAnalysis {
    pub weed_detected: bool,
    pub weed_type: String,
    /// Detection confidence (0-100)
    #[serde(deserialize_with = "number_or_text")]
    pub confidence: f64,
    pub crop_health: String,
    /// Weed management actions, in display order
    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl ImageAnalysis {
    /// Analysis with no weeds and nothing to recommend.
    pub fn clean(crop_health: impl Into<String>) -> Self {
        Self {
            weed_detected: false,
            weed_type: String::new(),
            confidence: 0.0,
            crop_health: crop_health.into(),
            recommendations: Vec::new(),
        }
    }
}

/// Older records hold confidence as a fixed-point string such as `"91.3"`.
fn number_or_text<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Confidence {
        Number(f64),
        Text(String),
    }

    match Confidence::deserialize(deserializer)? {
        Confidence::Number(value) => Ok(value),
        Confidence::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}
