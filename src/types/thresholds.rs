//! Soil classification thresholds and chart scale constants

/// Built-in soil classification bands.
///
/// These are the defaults for [`crate::config::SoilThresholds`]; operators can
/// override any of them in `agri_config.toml`.
pub mod soil_thresholds {
    // === pH ===
    /// Lower bound of the Good pH band (inclusive)
    pub const PH_GOOD_MIN: f64 = 6.0;
    /// Upper bound of the Good pH band (inclusive)
    pub const PH_GOOD_MAX: f64 = 7.5;
    /// Lower bound of the Fair pH band (inclusive). Fair ends where Good begins.
    pub const PH_FAIR_MIN: f64 = 5.5;
    /// Physically meaningful pH domain
    pub const PH_DOMAIN_MIN: f64 = 0.0;
    pub const PH_DOMAIN_MAX: f64 = 14.0;

    // === Macronutrients (ppm) ===
    /// Reference nitrogen level used as the percentage denominator (ppm)
    pub const NITROGEN_OPTIMAL_PPM: f64 = 50.0;
    /// Reference phosphorus level (ppm)
    pub const PHOSPHORUS_OPTIMAL_PPM: f64 = 40.0;
    /// Reference potassium level (ppm)
    pub const POTASSIUM_OPTIMAL_PPM: f64 = 50.0;
    /// Percentage of optimal at or above which a nutrient is Good
    pub const NUTRIENT_GOOD_PERCENT: f64 = 80.0;
    /// Percentage of optimal at or above which a nutrient is Fair
    pub const NUTRIENT_FAIR_PERCENT: f64 = 60.0;

    // === Organic matter ===
    /// Organic matter at or above this percentage is Good, anything less is Low
    pub const ORGANIC_MATTER_GOOD_PERCENT: f64 = 3.0;
}

/// Scale bases for report charts.
///
/// The radar chart normalises every parameter to a 0-100 axis using fixed
/// bases that do not match the classifier's ppm optima. Kept as-is so stored
/// reports render the same way they always have.
pub mod chart_scales {
    /// Target pH drawn on both charts
    pub const PH_TARGET: f64 = 6.5;
    /// Radar axis maximum for pH
    pub const RADAR_PH_SCALE: f64 = 9.0;
    /// Radar axis maximum for N/P/K (ppm)
    pub const RADAR_NUTRIENT_SCALE_PPM: f64 = 100.0;
    /// Radar axis maximum for organic matter (%)
    pub const RADAR_ORGANIC_MATTER_SCALE_PERCENT: f64 = 10.0;
    /// Target organic matter drawn on the radar (middle of the 3-5% ideal range)
    pub const ORGANIC_MATTER_TARGET_PERCENT: f64 = 4.0;
}
