//! Field service: ties the store, the image analyzer and the soil classifier
//! together behind the operations the CLI and HTTP API expose.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::analysis::SoilClassifier;
use crate::imaging::{ImageAnalyzer, ImageError, ImageUpload};
use crate::report::{build_report, DashboardStats, FieldReport};
use crate::storage::{sample_fields, FieldStore, StoreError};
use crate::types::{soil_thresholds, FieldRecord, NewField, SoilAnalysis, SoilReading};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("field '{0}' not found")]
    FieldNotFound(String),
    #[error("invalid field: {0}")]
    InvalidField(String),
    #[error("invalid soil reading: {0}")]
    InvalidReading(String),
    #[error(transparent)]
    InvalidImage(#[from] ImageError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct FieldService {
    store: Arc<dyn FieldStore>,
    analyzer: Arc<dyn ImageAnalyzer>,
    classifier: SoilClassifier,
    max_upload_bytes: usize,
}

impl FieldService {
    pub fn new(
        store: Arc<dyn FieldStore>,
        analyzer: Arc<dyn ImageAnalyzer>,
        classifier: SoilClassifier,
        max_upload_bytes: usize,
    ) -> Self {
        info!(
            store = store.backend_name(),
            analyzer = analyzer.name(),
            max_upload_bytes,
            "Field service ready"
        );
        Self {
            store,
            analyzer,
            classifier,
            max_upload_bytes,
        }
    }

    /// Insert the sample fields if the store is empty. Returns how many were added.
    pub fn seed_sample_fields(&self) -> Result<usize, ServiceError> {
        if self.store.count()? > 0 {
            return Ok(0);
        }
        let samples = sample_fields();
        for field in &samples {
            self.store.insert(field)?;
        }
        info!(count = samples.len(), "Seeded sample fields");
        Ok(samples.len())
    }

    // ========================================================================
    // Fields
    // ========================================================================

    pub fn add_field(&self, new_field: NewField) -> Result<FieldRecord, ServiceError> {
        let name = new_field.name.trim();
        let location = new_field.location.trim();
        if name.is_empty() {
            return Err(ServiceError::InvalidField("name is required".to_string()));
        }
        if location.is_empty() {
            return Err(ServiceError::InvalidField("location is required".to_string()));
        }

        let now = Utc::now();
        let mut id = now.timestamp_millis();
        while self.store.get(&id.to_string())?.is_some() {
            id += 1;
        }

        let field = FieldRecord::new(id.to_string(), name, location, now);
        self.store.insert(&field)?;
        info!(field_id = %field.id, name = %field.name, "Field added");
        Ok(field)
    }

    pub fn list_fields(&self) -> Result<Vec<FieldRecord>, ServiceError> {
        Ok(self.store.list()?)
    }

    pub fn field(&self, id: &str) -> Result<FieldRecord, ServiceError> {
        self.store
            .get(id)?
            .ok_or_else(|| ServiceError::FieldNotFound(id.to_string()))
    }

    // ========================================================================
    // Analyses
    // ========================================================================

    /// Classify a reading without storing anything.
    pub fn classify(&self, reading: &SoilReading) -> Result<SoilAnalysis, ServiceError> {
        validate_reading(reading)?;
        Ok(self.classifier.build_soil_analysis(reading))
    }

    /// Classify and store a soil reading against a field.
    pub fn save_soil_data(
        &self,
        id: &str,
        reading: SoilReading,
    ) -> Result<FieldRecord, ServiceError> {
        let analysis = self.classify(&reading)?;
        let mut field = self.field(id)?;

        field.soil_data = Some(reading);
        field.soil_analysis = Some(analysis);
        field.has_soil_data = true;
        field.last_updated = Utc::now();
        self.store.update(&field)?;

        info!(
            field_id = %field.id,
            ph = %analysis.ph.status,
            nitrogen = %analysis.nitrogen.status,
            phosphorus = %analysis.phosphorus.status,
            potassium = %analysis.potassium.status,
            organic_matter = %analysis.organic_matter.status,
            "Soil data saved"
        );
        Ok(field)
    }

    /// Run the image analyzer on an upload and store the result against a field.
    pub fn analyze_image(
        &self,
        id: &str,
        upload: &ImageUpload,
    ) -> Result<FieldRecord, ServiceError> {
        upload.validate(self.max_upload_bytes)?;
        let mut field = self.field(id)?;

        let analysis = self.analyzer.analyze(upload);
        info!(
            field_id = %field.id,
            analyzer = self.analyzer.name(),
            weed_detected = analysis.weed_detected,
            confidence = analysis.confidence,
            "Image analyzed"
        );

        field.image_analysis = Some(analysis);
        field.has_images = true;
        field.last_updated = Utc::now();
        self.store.update(&field)?;
        Ok(field)
    }

    // ========================================================================
    // Reporting
    // ========================================================================

    pub fn report(&self, id: &str) -> Result<FieldReport, ServiceError> {
        let field = self.field(id)?;
        let report = build_report(&field, self.classifier.thresholds());
        debug!(field_id = %id, recommendations = report.recommendations.len(), "Report built");
        Ok(report)
    }

    pub fn dashboard_stats(&self) -> Result<DashboardStats, ServiceError> {
        Ok(DashboardStats::from_fields(&self.store.list()?))
    }
}

/// Reject readings that cannot describe real soil.
pub fn validate_reading(reading: &SoilReading) -> Result<(), ServiceError> {
    let values = [
        ("ph", reading.ph),
        ("nitrogen", reading.nitrogen),
        ("phosphorus", reading.phosphorus),
        ("potassium", reading.potassium),
        ("organicMatter", reading.organic_matter),
    ];
    for (name, value) in values {
        if !value.is_finite() {
            return Err(ServiceError::InvalidReading(format!("{name} must be a finite number")));
        }
        if value < 0.0 {
            return Err(ServiceError::InvalidReading(format!("{name} must not be negative")));
        }
    }
    if reading.ph > soil_thresholds::PH_DOMAIN_MAX {
        return Err(ServiceError::InvalidReading(format!(
            "ph must be between {} and {}",
            soil_thresholds::PH_DOMAIN_MIN,
            soil_thresholds::PH_DOMAIN_MAX
        )));
    }
    Ok(())
}
