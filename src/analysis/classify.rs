//! Soil parameter classification
//!
//! Pure threshold rules turning a [`SoilReading`] into a [`SoilAnalysis`].
//! No I/O, no clock, no hidden state: the same reading always yields the same
//! analysis.

use crate::config::SoilThresholds;
use crate::types::{ParameterStatus, SoilAnalysis, SoilReading, SoilStatus, StatusLabel};

/// Macronutrients classified against an optimal ppm level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nutrient {
    Nitrogen,
    Phosphorus,
    Potassium,
}

impl Nutrient {
    /// Reference level (ppm) used as the percentage denominator.
    pub fn optimal_ppm(&self, thresholds: &SoilThresholds) -> f64 {
        match self {
            Nutrient::Nitrogen => thresholds.nitrogen_optimal_ppm,
            Nutrient::Phosphorus => thresholds.phosphorus_optimal_ppm,
            Nutrient::Potassium => thresholds.potassium_optimal_ppm,
        }
    }
}

/// Percentage of `optimal` that `value` represents.
pub fn nutrient_percentage(value: f64, optimal: f64) -> f64 {
    value / optimal * 100.0
}

/// Soil classifier bound to a set of thresholds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SoilClassifier {
    thresholds: SoilThresholds,
}

impl SoilClassifier {
    pub fn new(thresholds: SoilThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &SoilThresholds {
        &self.thresholds
    }

    /// Good inside `[ph_good_min, ph_good_max]`, Fair in `[ph_fair_min, ph_good_min)`,
    /// Poor everywhere else (including NaN).
    pub fn classify_ph(&self, ph: f64) -> ParameterStatus {
        let t = &self.thresholds;
        if ph >= t.ph_good_min && ph <= t.ph_good_max {
            ParameterStatus::good()
        } else if ph >= t.ph_fair_min && ph < t.ph_good_min {
            ParameterStatus::fair()
        } else {
            ParameterStatus::new(SoilStatus::Poor, StatusLabel::Destructive)
        }
    }

    /// Classify a nutrient level by its percentage of `optimal`.
    ///
    /// # Preconditions
    ///
    /// `optimal` must be positive. Callers pass configured reference levels,
    /// which config validation keeps above zero; a zero divisor produces an
    /// unspecified status.
    pub fn classify_nutrient(&self, value: f64, optimal: f64) -> ParameterStatus {
        let percentage = nutrient_percentage(value, optimal);
        if percentage >= self.thresholds.nutrient_good_percent {
            ParameterStatus::good()
        } else if percentage >= self.thresholds.nutrient_fair_percent {
            ParameterStatus::fair()
        } else {
            ParameterStatus::new(SoilStatus::Low, StatusLabel::Destructive)
        }
    }

    /// Two buckets only: Good at or above the threshold, Low otherwise.
    /// Low organic matter is a warning, not a destructive status.
    pub fn classify_organic_matter(&self, value: f64) -> ParameterStatus {
        if value >= self.thresholds.organic_matter_good_percent {
            ParameterStatus::good()
        } else {
            ParameterStatus::new(SoilStatus::Low, StatusLabel::Warning)
        }
    }

    pub fn classify_named_nutrient(&self, nutrient: Nutrient, value: f64) -> ParameterStatus {
        self.classify_nutrient(value, nutrient.optimal_ppm(&self.thresholds))
    }

    /// Classify every parameter of a reading in one step.
    pub fn build_soil_analysis(&self, reading: &SoilReading) -> SoilAnalysis {
        SoilAnalysis {
            ph: self.classify_ph(reading.ph),
            nitrogen: self.classify_named_nutrient(Nutrient::Nitrogen, reading.nitrogen),
            phosphorus: self.classify_named_nutrient(Nutrient::Phosphorus, reading.phosphorus),
            potassium: self.classify_named_nutrient(Nutrient::Potassium, reading.potassium),
            organic_matter: self.classify_organic_matter(reading.organic_matter),
        }
    }
}

// ============================================================================
// Default-threshold entry points
// ============================================================================

/// [`SoilClassifier::classify_ph`] with the built-in bands.
pub fn classify_ph(ph: f64) -> ParameterStatus {
    SoilClassifier::default().classify_ph(ph)
}

/// [`SoilClassifier::classify_nutrient`] with the built-in bands.
///
/// `optimal` must be positive.
pub fn classify_nutrient(value: f64, optimal: f64) -> ParameterStatus {
    SoilClassifier::default().classify_nutrient(value, optimal)
}

/// [`SoilClassifier::classify_organic_matter`] with the built-in bands.
pub fn classify_organic_matter(value: f64) -> ParameterStatus {
    SoilClassifier::default().classify_organic_matter(value)
}

/// [`SoilClassifier::build_soil_analysis`] with the built-in bands.
pub fn build_soil_analysis(reading: &SoilReading) -> SoilAnalysis {
    SoilClassifier::default().build_soil_analysis(reading)
}
