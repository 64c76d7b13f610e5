//! Field records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ImageAnalysis, SoilAnalysis, SoilReading};

/// One farm field and everything recorded against it.
///
/// Serialized shape matches the flat JSON array the field store has always
/// used. Exports from the browser store also load: their `color` badge classes
/// map onto [`crate::types::StatusLabel`] and string confidences are parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRecord {
    pub id: String,
    pub name: String,
    pub location: String,
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub has_images: bool,
    #[serde(default)]
    pub has_soil_data: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_analysis: Option<ImageAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soil_data: Option<SoilReading>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soil_analysis: Option<SoilAnalysis>,
}

impl FieldRecord {
    /// Fresh record with no analyses attached.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        location: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location: location.into(),
            last_updated: now,
            has_images: false,
            has_soil_data: false,
            image_analysis: None,
            soil_data: None,
            soil_analysis: None,
        }
    }

    /// Whether there is anything to put in a report.
    pub fn has_data(&self) -> bool {
        self.image_analysis.is_some() || self.soil_data.is_some()
    }
}

/// Request to create a field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewField {
    pub name: String,
    pub location: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StatusLabel;

    #[test]
    fn test_record_json_shape() {
        let record = FieldRecord::new("1", "North Field", "Plot A, Section 1", Utc::now());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["hasImages"], false);
        assert_eq!(json["hasSoilData"], false);
        assert!(json.get("lastUpdated").is_some());
        assert!(json.get("soilData").is_none());
    }

    #[test]
    fn test_record_without_flags_deserializes() {
        let json = r#"{
            "id": "2",
            "name": "South Field",
            "location": "Plot B, Section 2",
            "lastUpdated": "2024-05-01T10:00:00Z"
        }"#;
        let record: FieldRecord = serde_json::from_str(json).unwrap();
        assert!(!record.has_images);
        assert!(!record.has_data());
    }

    #[test]
    fn test_browser_export_deserializes() {
        let json = r#"{
            "id": "1",
            "name": "North Field",
            "location": "Plot A, Section 1",
            "lastUpdated": "2024-06-03T08:15:42.117Z",
            "hasImages": true,
            "hasSoilData": true,
            "imageAnalysis": {
                "weedDetected": true,
                "weedType": "Grass Weed",
                "confidence": "87.4",
                "cropHealth": "Good",
                "recommendations": ["Apply selective herbicide"]
            },
            "soilData": {"ph": 5.8, "nitrogen": 30, "phosphorus": 40, "potassium": 50, "organicMatter": 2.5},
            "soilAnalysis": {
                "ph": {"status": "Fair", "color": "bg-warning"},
                "nitrogen": {"status": "Fair", "color": "bg-warning"},
                "phosphorus": {"status": "Good", "color": "bg-success"},
                "potassium": {"status": "Good", "color": "bg-success"},
                "organicMatter": {"status": "Low", "color": "bg-warning"}
            }
        }"#;
        let record: FieldRecord = serde_json::from_str(json).unwrap();
        assert!(record.has_data());
        assert_eq!(record.last_updated.timestamp_subsec_millis(), 117);

        let image = record.image_analysis.as_ref().unwrap();
        assert!((image.confidence - 87.4).abs() < 1e-9);
        assert_eq!(record.soil_data.unwrap().nitrogen, 30.0);

        let soil = record.soil_analysis.unwrap();
        assert_eq!(soil.ph.label, StatusLabel::Warning);
        assert_eq!(soil.potassium.label, StatusLabel::Success);
    }
}
