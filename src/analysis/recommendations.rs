//! Recommendation assembly
//!
//! Image-derived actions come first (only when weeds were detected), followed
//! by soil actions in a fixed order: nitrogen, phosphorus, potassium, pH.
//! The order is part of the contract; reports number the items.

use crate::types::{ImageAnalysis, RecommendationSet, SoilAnalysis, SoilStatus};

pub const NITROGEN_LOW: &str = "Apply nitrogen-rich fertilizer to improve soil fertility";
pub const PHOSPHORUS_LOW: &str = "Consider adding phosphate fertilizer for root development";
pub const POTASSIUM_LOW: &str = "Apply potassium fertilizer to enhance plant resistance";
pub const PH_POOR: &str = "Adjust soil pH using lime (if acidic) or sulfur (if alkaline)";

/// Build the ordered action list for a field.
///
/// Either input may be absent; absent inputs contribute nothing.
pub fn build_recommendations(
    image_analysis: Option<&ImageAnalysis>,
    soil_analysis: Option<&SoilAnalysis>,
) -> RecommendationSet {
    let mut recommendations = RecommendationSet::new();

    if let Some(image) = image_analysis.filter(|i| i.weed_detected) {
        recommendations.extend(image.recommendations.iter().cloned());
    }

    if let Some(soil) = soil_analysis {
        let soil_rules = [
            (soil.nitrogen.status == SoilStatus::Low, NITROGEN_LOW),
            (soil.phosphorus.status == SoilStatus::Low, PHOSPHORUS_LOW),
            (soil.potassium.status == SoilStatus::Low, POTASSIUM_LOW),
            (soil.ph.status == SoilStatus::Poor, PH_POOR),
        ];
        recommendations.extend(
            soil_rules
                .into_iter()
                .filter(|(triggered, _)| *triggered)
                .map(|(_, text)| text.to_string()),
        );
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ParameterStatus, StatusLabel};

    fn image(weed_detected: bool, recs: &[&str]) -> ImageAnalysis {
        ImageAnalysis {
            weed_detected,
            weed_type: "Broadleaf Weed".to_string(),
            confidence: 91.2,
            crop_health: "Good".to_string(),
            recommendations: recs.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn low() -> ParameterStatus {
        ParameterStatus::new(SoilStatus::Low, StatusLabel::Destructive)
    }

    fn all_good() -> SoilAnalysis {
        SoilAnalysis {
            ph: ParameterStatus::good(),
            nitrogen: ParameterStatus::good(),
            phosphorus: ParameterStatus::good(),
            potassium: ParameterStatus::good(),
            organic_matter: ParameterStatus::good(),
        }
    }

    #[test]
    fn test_nothing_in_nothing_out() {
        assert!(build_recommendations(None, None).is_empty());
    }

    #[test]
    fn test_image_recommendations_suppressed_without_weeds() {
        let img = image(false, &["X"]);
        assert!(build_recommendations(Some(&img), None).is_empty());
    }

    #[test]
    fn test_image_then_soil_order() {
        let img = image(true, &["A", "B"]);
        let soil = SoilAnalysis {
            nitrogen: low(),
            ph: ParameterStatus::new(SoilStatus::Poor, StatusLabel::Destructive),
            ..all_good()
        };
        assert_eq!(
            build_recommendations(Some(&img), Some(&soil)),
            vec!["A", "B", NITROGEN_LOW, PH_POOR]
        );
    }

    #[test]
    fn test_all_soil_rules_fixed_order() {
        let soil = SoilAnalysis {
            ph: ParameterStatus::new(SoilStatus::Poor, StatusLabel::Destructive),
            nitrogen: low(),
            phosphorus: low(),
            potassium: low(),
            organic_matter: ParameterStatus::new(SoilStatus::Low, StatusLabel::Warning),
        };
        assert_eq!(
            build_recommendations(None, Some(&soil)),
            vec![NITROGEN_LOW, PHOSPHORUS_LOW, POTASSIUM_LOW, PH_POOR]
        );
    }

    #[test]
    fn test_fair_does_not_trigger() {
        let soil = SoilAnalysis {
            ph: ParameterStatus::fair(),
            nitrogen: ParameterStatus::fair(),
            ..all_good()
        };
        assert!(build_recommendations(None, Some(&soil)).is_empty());
    }

    #[test]
    fn test_low_organic_matter_has_no_action() {
        let soil = SoilAnalysis {
            organic_matter: ParameterStatus::new(SoilStatus::Low, StatusLabel::Warning),
            ..all_good()
        };
        assert!(build_recommendations(None, Some(&soil)).is_empty());
    }
}
