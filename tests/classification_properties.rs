//! Classification Property Tests
//!
//! Sweeps across each parameter's range to check the band boundaries,
//! monotonicity, determinism and agreement between the free functions and a
//! classifier built from default configuration.

use agri_fields::analysis::recommendations::{
    NITROGEN_LOW, PHOSPHORUS_LOW, PH_POOR, POTASSIUM_LOW,
};
use agri_fields::config::AppConfig;
use agri_fields::{
    build_recommendations, build_soil_analysis, classify_nutrient, classify_organic_matter,
    classify_ph, ImageAnalysis, SoilClassifier, SoilReading, SoilStatus, StatusLabel,
};

fn rank(status: SoilStatus) -> u8 {
    match status {
        SoilStatus::Good => 2,
        SoilStatus::Fair => 1,
        SoilStatus::Poor | SoilStatus::Low => 0,
    }
}

fn sweep(from: f64, to: f64, step: f64) -> impl Iterator<Item = f64> {
    let steps = ((to - from) / step).round() as usize;
    (0..=steps).map(move |i| from + i as f64 * step)
}

// ============================================================================
// Boundaries
// ============================================================================

#[test]
fn ph_band_edges() {
    assert_eq!(classify_ph(6.0).status, SoilStatus::Good);
    assert_eq!(classify_ph(7.5).status, SoilStatus::Good);
    assert_eq!(classify_ph(5.5).status, SoilStatus::Fair);
    assert_eq!(classify_ph(5.99).status, SoilStatus::Fair);
    assert_eq!(classify_ph(5.49).status, SoilStatus::Poor);
    assert_eq!(classify_ph(7.51).status, SoilStatus::Poor);
}

#[test]
fn alkaline_soil_is_never_fair() {
    for ph in sweep(7.51, 14.0, 0.01) {
        assert_eq!(classify_ph(ph).status, SoilStatus::Poor, "pH {ph}");
    }
}

#[test]
fn nutrient_band_edges() {
    assert_eq!(classify_nutrient(40.0, 50.0).status, SoilStatus::Good);
    assert_eq!(classify_nutrient(30.0, 50.0).status, SoilStatus::Fair);
    assert_eq!(classify_nutrient(29.9, 50.0).status, SoilStatus::Low);
    assert_eq!(classify_nutrient(32.0, 40.0).status, SoilStatus::Good);
    assert_eq!(classify_nutrient(500.0, 50.0).status, SoilStatus::Good);
    assert_eq!(classify_nutrient(0.0, 50.0).status, SoilStatus::Low);
}

#[test]
fn organic_matter_edges() {
    assert_eq!(classify_organic_matter(3.0).status, SoilStatus::Good);
    assert_eq!(classify_organic_matter(2.99).status, SoilStatus::Low);
    assert_eq!(classify_organic_matter(2.99).label, StatusLabel::Warning);
}

// ============================================================================
// Monotonicity
// ============================================================================

#[test]
fn nutrient_status_never_drops_as_value_rises() {
    for optimal in [40.0, 50.0] {
        let mut previous = 0;
        for value in sweep(0.0, 120.0, 0.1) {
            let current = rank(classify_nutrient(value, optimal).status);
            assert!(current >= previous, "value {value} optimal {optimal}");
            previous = current;
        }
    }
}

#[test]
fn organic_matter_status_never_drops_as_value_rises() {
    let mut previous = 0;
    for value in sweep(0.0, 10.0, 0.01) {
        let current = rank(classify_organic_matter(value).status);
        assert!(current >= previous, "organic matter {value}");
        previous = current;
    }
}

#[test]
fn acid_side_ph_rises_then_alkaline_side_falls() {
    let mut previous = 0;
    for ph in sweep(0.0, 6.0, 0.01) {
        let current = rank(classify_ph(ph).status);
        assert!(current >= previous, "pH {ph}");
        previous = current;
    }
    for ph in sweep(6.0, 14.0, 0.01) {
        let current = rank(classify_ph(ph).status);
        assert!(current <= previous, "pH {ph}");
        previous = current;
    }
}

// ============================================================================
// Labels, determinism, configuration
// ============================================================================

#[test]
fn labels_follow_status() {
    let reading = SoilReading {
        ph: 4.0,
        nitrogen: 10.0,
        phosphorus: 30.0,
        potassium: 50.0,
        organic_matter: 1.0,
    };
    let analysis = build_soil_analysis(&reading);
    assert_eq!(analysis.ph.label, StatusLabel::Destructive);
    assert_eq!(analysis.nitrogen.label, StatusLabel::Destructive);
    assert_eq!(analysis.phosphorus.label, StatusLabel::Warning);
    assert_eq!(analysis.potassium.label, StatusLabel::Success);
    assert_eq!(analysis.organic_matter.label, StatusLabel::Warning);
}

#[test]
fn analysis_is_deterministic() {
    let reading = SoilReading::default();
    let first = build_soil_analysis(&reading);
    for _ in 0..100 {
        assert_eq!(build_soil_analysis(&reading), first);
    }
}

#[test]
fn default_config_classifier_matches_free_functions() {
    let classifier = SoilClassifier::new(AppConfig::default().soil);
    for ph in sweep(3.0, 9.0, 0.25) {
        for nitrogen in sweep(0.0, 80.0, 5.0) {
            let reading = SoilReading { ph, nitrogen, ..SoilReading::default() };
            assert_eq!(classifier.build_soil_analysis(&reading), build_soil_analysis(&reading));
        }
    }
}

#[test]
fn tuned_thresholds_shift_bands() {
    let config = AppConfig::from_toml_str("[soil]\nnitrogen_optimal_ppm = 100.0\n").unwrap();
    let classifier = SoilClassifier::new(config.soil);
    let reading = SoilReading { nitrogen: 45.0, ..SoilReading::default() };
    assert_eq!(classifier.build_soil_analysis(&reading).nitrogen.status, SoilStatus::Low);
    assert_eq!(build_soil_analysis(&reading).nitrogen.status, SoilStatus::Good);
}

// ============================================================================
// Recommendations
// ============================================================================

#[test]
fn recommendation_example_from_field_records() {
    let image = ImageAnalysis {
        weed_detected: true,
        weed_type: "Sedge Weed".to_string(),
        confidence: 88.0,
        crop_health: "Fair".to_string(),
        recommendations: vec!["A".to_string(), "B".to_string()],
    };
    let reading = SoilReading {
        ph: 5.0,
        nitrogen: 20.0,
        phosphorus: 40.0,
        potassium: 50.0,
        organic_matter: 4.0,
    };
    let soil = build_soil_analysis(&reading);
    assert_eq!(
        build_recommendations(Some(&image), Some(&soil)),
        vec!["A", "B", NITROGEN_LOW, PH_POOR]
    );
}

#[test]
fn every_soil_rule_fires_once_in_order() {
    let reading = SoilReading {
        ph: 9.0,
        nitrogen: 1.0,
        phosphorus: 1.0,
        potassium: 1.0,
        organic_matter: 0.5,
    };
    let soil = build_soil_analysis(&reading);
    assert_eq!(
        build_recommendations(None, Some(&soil)),
        vec![NITROGEN_LOW, PHOSPHORUS_LOW, POTASSIUM_LOW, PH_POOR]
    );
}

#[test]
fn healthy_soil_without_weeds_needs_nothing() {
    let soil = build_soil_analysis(&SoilReading::default());
    let image = ImageAnalysis::clean("Excellent");
    assert!(build_recommendations(Some(&image), Some(&soil)).is_empty());
}
