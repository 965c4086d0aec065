//! Run summary and map export

use crate::{DisplayColor, RegionAssessment, RiskTier};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value as GeoValue};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Smallest map marker radius (px)
pub const MIN_MARKER_RADIUS: f64 = 5.0;
/// Marker radius per score point (px)
pub const MARKER_RADIUS_PER_POINT: f64 = 2.0;

/// Province with the highest score in a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighestRisk {
    pub region: String,
    pub risk_score: f64,
    pub tier: RiskTier,
}

/// Number of provinces in one tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierCount {
    pub tier: RiskTier,
    pub color: DisplayColor,
    pub count: usize,
}

/// Headline metrics for a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskSummary {
    pub total_regions: usize,
    pub scored_regions: usize,
    pub no_data_regions: usize,
    /// `None` when nothing could be scored
    pub highest_risk: Option<HighestRisk>,
    pub mean_precipitation_mm_h: Option<f64>,
    pub max_precipitation_mm_h: Option<f64>,
    /// All four tiers in ascending order, zero counts included
    pub tier_distribution: Vec<TierCount>,
    pub generated_at: String,
}

impl RiskSummary {
    pub fn count_for(&self, tier: RiskTier) -> usize {
        self.tier_distribution
            .iter()
            .find(|t| t.tier == tier)
            .map(|t| t.count)
            .unwrap_or(0)
    }
}

/// Summarize a run; NO_DATA provinces only count towards `no_data_regions`
pub fn summarize(assessments: &[RegionAssessment]) -> RiskSummary {
    let scored: Vec<_> = assessments.iter().filter_map(|a| a.as_scored()).collect();

    // First province wins ties
    let mut highest_risk: Option<HighestRisk> = None;
    for s in &scored {
        let is_higher = highest_risk
            .as_ref()
            .map_or(true, |h| s.risk_score > h.risk_score);
        if is_higher {
            highest_risk = Some(HighestRisk {
                region: s.region.clone(),
                risk_score: s.risk_score,
                tier: s.tier,
            });
        }
    }

    let (mean_precipitation_mm_h, max_precipitation_mm_h) = if scored.is_empty() {
        (None, None)
    } else {
        let total: f64 = scored.iter().map(|s| s.precipitation_mm_h).sum();
        let max = scored
            .iter()
            .map(|s| s.precipitation_mm_h)
            .fold(f64::NEG_INFINITY, f64::max);
        (Some(total / scored.len() as f64), Some(max))
    };

    let tier_distribution = RiskTier::ALL
        .iter()
        .map(|&tier| TierCount {
            tier,
            color: tier.color(),
            count: scored.iter().filter(|s| s.tier == tier).count(),
        })
        .collect();

    RiskSummary {
        total_regions: assessments.len(),
        scored_regions: scored.len(),
        no_data_regions: assessments.len() - scored.len(),
        highest_risk,
        mean_precipitation_mm_h,
        max_precipitation_mm_h,
        tier_distribution,
        generated_at: chrono::Utc::now().to_rfc3339(),
    }
}

/// Map marker radius for a score
pub fn marker_radius(risk_score: f64) -> f64 {
    (risk_score * MARKER_RADIUS_PER_POINT).max(MIN_MARKER_RADIUS)
}

/// Export scored provinces with coordinates as GeoJSON points
///
/// NO_DATA provinces and provinces without coordinates are left off the map.
pub fn to_geojson(assessments: &[RegionAssessment]) -> FeatureCollection {
    let features: Vec<Feature> = assessments
        .iter()
        .filter_map(|a| a.as_scored())
        .filter_map(|s| {
            let (lat, lon) = (s.latitude?, s.longitude?);

            let mut properties = JsonObject::new();
            properties.insert("region".to_string(), json!(s.region));
            properties.insert("risk_score".to_string(), json!(s.risk_score));
            properties.insert("tier".to_string(), json!(s.tier.label()));
            properties.insert("impact".to_string(), json!(s.impact));
            properties.insert("color".to_string(), json!(s.color.as_str()));
            properties.insert("fill_color".to_string(), json!(s.color.fill_rgba()));
            properties.insert("precipitation_mm_h".to_string(), json!(s.precipitation_mm_h));
            properties.insert("cloud_cover_pct".to_string(), json!(s.cloud_cover_pct));
            properties.insert("radius".to_string(), json!(marker_radius(s.risk_score)));

            Some(Feature {
                bbox: None,
                geometry: Some(Geometry::new(GeoValue::Point(vec![lon, lat]))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            })
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}
