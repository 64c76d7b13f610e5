//! Field reports and dashboard statistics
//!
//! A report is a read-only view over a stored [`FieldRecord`]: the stored image
//! and soil analyses, chart series for the soil reading, and the recommendation
//! list rebuilt from whatever is stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::build_recommendations;
use crate::config::SoilThresholds;
use crate::types::chart_scales;
use crate::types::{
    FieldRecord, ImageAnalysis, RecommendationSet, SoilAnalysis, SoilParameter, SoilReading,
};

// ============================================================================
// Report Types
// ============================================================================

/// Everything known about one field, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldReport {
    pub field_id: String,
    pub field_name: String,
    pub location: String,
    /// Last time the field's data changed
    pub generated_at: DateTime<Utc>,
    pub has_data: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_analysis: Option<ImageAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub soil: Option<SoilSection>,
    pub recommendations: RecommendationSet,
}

/// Soil reading with its classification and chart series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoilSection {
    pub reading: SoilReading,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<SoilAnalysis>,
    pub nutrient_chart: Vec<NutrientBar>,
    pub radar: Vec<RadarPoint>,
}

/// One bar of the measured-vs-optimal chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutrientBar {
    pub name: String,
    pub value: f64,
    pub optimal: f64,
}

/// One axis of the soil health radar, both values on a 0-100 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarPoint {
    pub parameter: String,
    pub value: f64,
    pub optimal: f64,
}

/// Counts shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_fields: usize,
    pub images_analyzed: usize,
    pub soil_reports: usize,
}

impl DashboardStats {
    pub fn from_fields(fields: &[FieldRecord]) -> Self {
        Self {
            total_fields: fields.len(),
            images_analyzed: fields.iter().filter(|f| f.has_images).count(),
            soil_reports: fields.iter().filter(|f| f.has_soil_data).count(),
        }
    }
}

// ============================================================================
// Building
// ============================================================================

/// Build the report for a stored field.
pub fn build_report(field: &FieldRecord, thresholds: &SoilThresholds) -> FieldReport {
    let soil = field.soil_data.map(|reading| SoilSection {
        reading,
        analysis: field.soil_analysis,
        nutrient_chart: nutrient_chart(&reading, thresholds),
        radar: radar_series(&reading, thresholds),
    });

    FieldReport {
        field_id: field.id.clone(),
        field_name: field.name.clone(),
        location: field.location.clone(),
        generated_at: field.last_updated,
        has_data: field.has_data(),
        image_analysis: field.image_analysis.clone(),
        soil,
        recommendations: build_recommendations(
            field.image_analysis.as_ref(),
            field.soil_analysis.as_ref(),
        ),
    }
}

/// Measured values next to their targets, in raw units.
pub fn nutrient_chart(reading: &SoilReading, thresholds: &SoilThresholds) -> Vec<NutrientBar> {
    let bar = |parameter: SoilParameter, optimal: f64| NutrientBar {
        name: parameter.display_name().to_string(),
        value: reading.value(parameter),
        optimal,
    };
    vec![
        bar(SoilParameter::Ph, chart_scales::PH_TARGET),
        bar(SoilParameter::Nitrogen, thresholds.nitrogen_optimal_ppm),
        bar(SoilParameter::Phosphorus, thresholds.phosphorus_optimal_ppm),
        bar(SoilParameter::Potassium, thresholds.potassium_optimal_ppm),
    ]
}

/// All five parameters normalised to a 0-100 axis.
pub fn radar_series(reading: &SoilReading, thresholds: &SoilThresholds) -> Vec<RadarPoint> {
    SoilParameter::ALL
        .iter()
        .map(|&parameter| {
            let (scale, target) = match parameter {
                SoilParameter::Ph => (chart_scales::RADAR_PH_SCALE, chart_scales::PH_TARGET),
                SoilParameter::Nitrogen => {
                    (chart_scales::RADAR_NUTRIENT_SCALE_PPM, thresholds.nitrogen_optimal_ppm)
                }
                SoilParameter::Phosphorus => {
                    (chart_scales::RADAR_NUTRIENT_SCALE_PPM, thresholds.phosphorus_optimal_ppm)
                }
                SoilParameter::Potassium => {
                    (chart_scales::RADAR_NUTRIENT_SCALE_PPM, thresholds.potassium_optimal_ppm)
                }
                SoilParameter::OrganicMatter => (
                    chart_scales::RADAR_ORGANIC_MATTER_SCALE_PERCENT,
                    chart_scales::ORGANIC_MATTER_TARGET_PERCENT,
                ),
            };
            RadarPoint {
                parameter: parameter.display_name().to_string(),
                value: reading.value(parameter) / scale * 100.0,
                optimal: target / scale * 100.0,
            }
        })
        .collect()
}

// ============================================================================
// Text Rendering
// ============================================================================

impl std::fmt::Display for FieldReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Field Report: {} ({})", self.field_name, self.location)?;
        writeln!(f, "Updated {}", self.generated_at.format("%Y-%m-%d %H:%M UTC"))?;

        if !self.has_data {
            writeln!(f)?;
            return writeln!(f, "No data available. Upload an image or add soil data first.");
        }

        if let Some(image) = &self.image_analysis {
            writeln!(f)?;
            writeln!(f, "Image Analysis")?;
            if image.weed_detected {
                writeln!(
                    f,
                    "  Weeds detected: {} ({:.1}% confidence)",
                    image.weed_type, image.confidence
                )?;
            } else {
                writeln!(f, "  No weeds detected")?;
            }
            writeln!(f, "  Crop health: {}", image.crop_health)?;
        }

        if let Some(soil) = &self.soil {
            writeln!(f)?;
            writeln!(f, "Soil Analysis")?;
            for parameter in SoilParameter::ALL {
                let value = soil.reading.value(parameter);
                let unit = match parameter.unit() {
                    "" => String::new(),
                    "%" => "%".to_string(),
                    u => format!(" {u}"),
                };
                match &soil.analysis {
                    Some(analysis) => writeln!(
                        f,
                        "  {:<15} {:>7.1}{:<4} {}",
                        parameter.display_name(),
                        value,
                        unit,
                        analysis.get(parameter).status
                    )?,
                    None => writeln!(f, "  {:<15} {:>7.1}{}", parameter.display_name(), value, unit)?,
                }
            }
        }

        writeln!(f)?;
        writeln!(f, "Recommendations")?;
        if self.recommendations.is_empty() {
            writeln!(f, "  No actions needed.")?;
        }
        for (i, rec) in self.recommendations.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, rec)?;
        }
        Ok(())
    }
}

/// Plain-text rendering for terminals.
pub fn render_text(report: &FieldReport) -> String {
    report.to_string()
}
