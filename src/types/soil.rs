//! Soil readings and their per-parameter classification

use serde::{Deserialize, Serialize};

// ============================================================================
// Reading
// ============================================================================

/// Raw soil test values for one field at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoilReading {
    /// Soil pH (0-14)
    pub ph: f64,
    /// Nitrogen (ppm)
    pub nitrogen: f64,
    /// Phosphorus (ppm)
    pub phosphorus: f64,
    /// Potassium (ppm)
    pub potassium: f64,
    /// Organic matter (%)
    pub organic_matter: f64,
}

impl Default for SoilReading {
    /// Starting values of the soil entry form.
    fn default() -> Self {
        Self {
            ph: 6.5,
            nitrogen: 45.0,
            phosphorus: 35.0,
            potassium: 40.0,
            organic_matter: 3.5,
        }
    }
}

impl SoilReading {
    /// Value of a single parameter.
    pub fn value(&self, parameter: SoilParameter) -> f64 {
        match parameter {
            SoilParameter::Ph => self.ph,
            SoilParameter::Nitrogen => self.nitrogen,
            SoilParameter::Phosphorus => self.phosphorus,
            SoilParameter::Potassium => self.potassium,
            SoilParameter::OrganicMatter => self.organic_matter,
        }
    }
}

// ============================================================================
// Parameters
// ============================================================================

/// The five measured soil parameters, in report order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum SoilParameter {
    Ph,
    Nitrogen,
    Phosphorus,
    Potassium,
    OrganicMatter,
}

impl SoilParameter {
    pub const ALL: [SoilParameter; 5] = [
        SoilParameter::Ph,
        SoilParameter::Nitrogen,
        SoilParameter::Phosphorus,
        SoilParameter::Potassium,
        SoilParameter::OrganicMatter,
    ];

    /// Key used in stored JSON
    pub fn key(&self) -> &'static str {
        match self {
            SoilParameter::Ph => "ph",
            SoilParameter::Nitrogen => "nitrogen",
            SoilParameter::Phosphorus => "phosphorus",
            SoilParameter::Potassium => "potassium",
            SoilParameter::OrganicMatter => "organicMatter",
        }
    }

    /// Get display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            SoilParameter::Ph => "pH",
            SoilParameter::Nitrogen => "Nitrogen",
            SoilParameter::Phosphorus => "Phosphorus",
            SoilParameter::Potassium => "Potassium",
            SoilParameter::OrganicMatter => "Organic Matter",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            SoilParameter::Ph => "",
            SoilParameter::Nitrogen | SoilParameter::Phosphorus | SoilParameter::Potassium => "ppm",
            SoilParameter::OrganicMatter => "%",
        }
    }
}

impl std::fmt::Display for SoilParameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Status
// ============================================================================

/// Categorical result of classifying one parameter.
///
/// pH uses Good/Fair/Poor, nutrients Good/Fair/Low, organic matter Good/Low.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SoilStatus {
    Good,
    Fair,
    Poor,
    Low,
}

impl std::fmt::Display for SoilStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SoilStatus::Good => write!(f, "Good"),
            SoilStatus::Fair => write!(f, "Fair"),
            SoilStatus::Poor => write!(f, "Poor"),
            SoilStatus::Low => write!(f, "Low"),
        }
    }
}

/// Visual severity bucket a status is rendered with.
///
/// Deserialization also accepts the `bg-*` badge classes older records carry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum StatusLabel {
    #[serde(alias = "bg-success")]
    Success,
    #[serde(alias = "bg-warning")]
    Warning,
    #[serde(alias = "bg-destructive")]
    Destructive,
}

/// Classification of one soil parameter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParameterStatus {
    pub status: SoilStatus,
    #[serde(alias = "color")]
    pub label: StatusLabel,
}

impl ParameterStatus {
    pub const fn new(status: SoilStatus, label: StatusLabel) -> Self {
        Self { status, label }
    }

    pub const fn good() -> Self {
        Self::new(SoilStatus::Good, StatusLabel::Success)
    }

    pub const fn fair() -> Self {
        Self::new(SoilStatus::Fair, StatusLabel::Warning)
    }
}

// ============================================================================
// Analysis
// ============================================================================

/// Classification of a full [`SoilReading`].
///
/// A struct rather than a map: all five parameters are always present.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SoilAnalysis {
    pub ph: ParameterStatus,
    pub nitrogen: ParameterStatus,
    pub phosphorus: ParameterStatus,
    pub potassium: ParameterStatus,
    pub organic_matter: ParameterStatus,
}

impl SoilAnalysis {
    pub fn get(&self, parameter: SoilParameter) -> &ParameterStatus {
        match parameter {
            SoilParameter::Ph => &self.ph,
            SoilParameter::Nitrogen => &self.nitrogen,
            SoilParameter::Phosphorus => &self.phosphorus,
            SoilParameter::Potassium => &self.potassium,
            SoilParameter::OrganicMatter => &self.organic_matter,
        }
    }

    /// All five statuses in report order.
    pub fn entries(&self) -> impl Iterator<Item = (SoilParameter, &ParameterStatus)> + '_ {
        SoilParameter::ALL.into_iter().map(move |p| (p, self.get(p)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_wire_format_uses_camel_case() {
        let json = serde_json::to_value(SoilReading::default()).unwrap();
        assert_eq!(json["organicMatter"], 3.5);
        assert!(json.get("organic_matter").is_none());
    }

    #[test]
    fn test_analysis_wire_format() {
        let analysis = SoilAnalysis {
            ph: ParameterStatus::good(),
            nitrogen: ParameterStatus::fair(),
            phosphorus: ParameterStatus::good(),
            potassium: ParameterStatus::new(SoilStatus::Low, StatusLabel::Destructive),
            organic_matter: ParameterStatus::new(SoilStatus::Low, StatusLabel::Warning),
        };
        let json = serde_json::to_value(analysis).unwrap();
        assert_eq!(json["nitrogen"]["status"], "Fair");
        assert_eq!(json["potassium"]["label"], "destructive");
        assert_eq!(json["organicMatter"]["status"], "Low");
        assert_eq!(json.as_object().unwrap().len(), 5);
    }

    #[test]
    fn test_badge_color_records_deserialize() {
        let json = r#"{
            "ph": {"status": "Poor", "color": "bg-destructive"},
            "nitrogen": {"status": "Fair", "color": "bg-warning"},
            "phosphorus": {"status": "Good", "color": "bg-success"},
            "potassium": {"status": "Low", "color": "bg-destructive"},
            "organicMatter": {"status": "Low", "color": "bg-warning"}
        }"#;
        let analysis: SoilAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(analysis.ph, ParameterStatus::new(SoilStatus::Poor, StatusLabel::Destructive));
        assert_eq!(analysis.phosphorus, ParameterStatus::good());
        assert_eq!(analysis.organic_matter.label, StatusLabel::Warning);

        // Written back in the current shape
        let out = serde_json::to_value(analysis).unwrap();
        assert_eq!(out["ph"]["label"], "destructive");
        assert!(out["ph"].get("color").is_none());
    }

    #[test]
    fn test_entries_follow_report_order() {
        let analysis = SoilAnalysis {
            ph: ParameterStatus::good(),
            nitrogen: ParameterStatus::good(),
            phosphorus: ParameterStatus::good(),
            potassium: ParameterStatus::good(),
            organic_matter: ParameterStatus::good(),
        };
        let keys: Vec<_> = analysis.entries().map(|(p, _)| p.key()).collect();
        assert_eq!(keys, ["ph", "nitrogen", "phosphorus", "potassium", "organicMatter"]);
    }
}
