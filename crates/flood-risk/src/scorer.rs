//! Flood risk scoring implementation
//!
//! Implements the 3-component capped model:
//! Risk = clamp(P + G + C, 0, 10)
//!
//! Each component is capped on its own before summing. Inputs are not
//! validated: out-of-range elevation or infrastructure values flow through
//! the formula and only the final sum is clamped.
//!
//! Rounding is half-away-from-zero to two decimals (`f64::round` on the
//! score scaled by 100), so 8.685 reports as 8.69.

use serde::{Deserialize, Serialize};

/// Maximum score (clamp ceiling)
pub const MAX_RISK_SCORE: f64 = 10.0;
/// Minimum score (clamp floor)
pub const MIN_RISK_SCORE: f64 = 0.0;

/// Precipitation component cap
pub const PRECIPITATION_CAP: f64 = 6.0;
/// Rain rate (mm/h) that reaches the cap before the multiplier
pub const PRECIPITATION_SATURATION_MM_H: f64 = 15.0;

/// Multiplier brackets (mm/h); the bracket edges belong to the lower bracket
pub const MODERATE_RAIN_MM_H: f64 = 5.0;
pub const HEAVY_RAIN_MM_H: f64 = 10.0;
pub const MODERATE_RAIN_MULTIPLIER: f64 = 1.1;
pub const HEAVY_RAIN_MULTIPLIER: f64 = 1.2;

/// Elevation above which terrain adds no risk (m)
pub const LOW_ELEVATION_CEILING_M: f64 = 200.0;
/// Max weight of each geography term
pub const ELEVATION_WEIGHT: f64 = 0.75;
pub const INFRASTRUCTURE_WEIGHT: f64 = 0.75;
/// Top of the nominal infrastructure scale
pub const INFRASTRUCTURE_SCALE: f64 = 10.0;

/// Precipitation component above which rain counts as an active signal
pub const ACTIVE_RAIN_THRESHOLD: f64 = 0.05;
/// Cloud weight with and without active rain
pub const CLOUD_WEIGHT_ACTIVE: f64 = 2.5;
pub const CLOUD_WEIGHT_DRY: f64 = 0.5;

/// Per-component contributions behind a risk score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Precipitation intensity multiplier applied (1.0, 1.1 or 1.2)
    pub multiplier: f64,
    /// Precipitation component (0-6)
    pub precipitation: f64,
    /// Low-elevation term (0-0.75 for elevation >= 0)
    pub elevation: f64,
    /// Weak-infrastructure term (0-0.75 for index in 0-10)
    pub infrastructure: f64,
    /// Cloud/uncertainty component (0-2.5)
    pub cloud: f64,
    /// Unclamped, unrounded sum
    pub raw_total: f64,
}

impl ScoreBreakdown {
    /// Geography component (elevation + infrastructure)
    pub fn geography(&self) -> f64 {
        self.elevation + self.infrastructure
    }

    /// Final score: clamped to [0, 10] and rounded to two decimals
    pub fn score(&self) -> f64 {
        round_score(self.raw_total.clamp(MIN_RISK_SCORE, MAX_RISK_SCORE))
    }
}

/// Step amplifier for heavy rain
pub fn precipitation_multiplier(precipitation_mm_h: f64) -> f64 {
    if precipitation_mm_h > HEAVY_RAIN_MM_H {
        HEAVY_RAIN_MULTIPLIER
    } else if precipitation_mm_h > MODERATE_RAIN_MM_H {
        MODERATE_RAIN_MULTIPLIER
    } else {
        1.0
    }
}

/// Compute every component of the score
pub fn score_breakdown(
    precipitation_mm_h: f64,
    cloud_cover_pct: f64,
    elevation_m: f64,
    infrastructure_index: f64,
) -> ScoreBreakdown {
    // P: rain rate scaled so 15 mm/h hits the cap before amplification
    let multiplier = precipitation_multiplier(precipitation_mm_h);
    let precipitation = (precipitation_mm_h / PRECIPITATION_SATURATION_MM_H
        * PRECIPITATION_CAP
        * multiplier)
        .min(PRECIPITATION_CAP);

    // G: linear in elevation below 200 m, linear in missing infrastructure
    let elevation = ((LOW_ELEVATION_CEILING_M - elevation_m.min(LOW_ELEVATION_CEILING_M))
        / LOW_ELEVATION_CEILING_M
        * ELEVATION_WEIGHT)
        .max(0.0);
    let infrastructure =
        (INFRASTRUCTURE_SCALE - infrastructure_index) / INFRASTRUCTURE_SCALE * INFRASTRUCTURE_WEIGHT;

    // C: cloud cover only matters fully when it is actually raining
    let cloud = if precipitation > ACTIVE_RAIN_THRESHOLD {
        cloud_cover_pct / 100.0 * CLOUD_WEIGHT_ACTIVE
    } else {
        cloud_cover_pct / 100.0 * CLOUD_WEIGHT_DRY
    };

    ScoreBreakdown {
        multiplier,
        precipitation,
        elevation,
        infrastructure,
        cloud,
        raw_total: precipitation + (elevation + infrastructure) + cloud,
    }
}

/// Flood risk score in [0, 10], rounded to two decimals
pub fn compute_risk_score(
    precipitation_mm_h: f64,
    cloud_cover_pct: f64,
    elevation_m: f64,
    infrastructure_index: f64,
) -> f64 {
    score_breakdown(precipitation_mm_h, cloud_cover_pct, elevation_m, infrastructure_index).score()
}

/// Round half away from zero to two decimals
pub fn round_score(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}


// ============================================================================
// Property-based Tests
// ============================================================================
