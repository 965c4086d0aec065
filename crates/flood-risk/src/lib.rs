//! Provincial Flood Risk Scoring
//!
//! Combines live weather observations with static provincial attributes,
//! scores every province on a 0-10 flood risk scale and classifies it into
//! a display tier.
//!
//! # Scoring Model (3-Component, Capped)
//!
//! ```text
//! Risk = clamp(P + G + C, 0, 10)
//! ```
//!
//! | Component | Cap  | Description |
//! |-----------|------|-------------|
//! | P         | 6.0  | Precipitation rate (mm/h) with intensity multiplier |
//! | G         | 1.5  | Geography: low elevation + weak drainage infrastructure |
//! | C         | 2.5  | Cloud cover, damped to 0.5 without active rain |
//!
//! # Risk Tiers
//!
//! | Score       | Tier          | Color  |
//! |-------------|---------------|--------|
//! | < 1.5       | VERY_LOW      | green  |
//! | 1.5 - 3.5   | LOW_MODERATE  | lime   |
//! | 3.5 - 7.0   | HIGH          | orange |
//! | >= 7.0      | VERY_HIGH     | red    |
//!
//! Provinces whose observation could not be obtained are reported as
//! [`RegionAssessment::NoData`] (gray), never as a score of zero.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod assessor;
pub mod classifier;
pub mod loader;
pub mod regions;
pub mod scorer;
pub mod summary;

pub use classifier::{classify_risk, DisplayColor, RiskClass, RiskTier};
pub use regions::RegionTable;
pub use scorer::{compute_risk_score, precipitation_multiplier, ScoreBreakdown};

#[derive(Error, Debug)]
pub enum FloodRiskError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Duplicate region in table: {0}")]
    DuplicateRegion(String),
    #[error("Region table is empty")]
    EmptyRegionTable,
}

pub type Result<T> = std::result::Result<T, FloodRiskError>;

/// Static reference attributes of a province
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionProfile {
    pub name: String,
    /// Elevation in meters
    pub elevation_m: f64,
    /// Drainage/stormwater capacity proxy (nominal 0-10, higher = better)
    pub infrastructure_index: f64,
}

impl RegionProfile {
    pub fn new(name: impl Into<String>, elevation_m: f64, infrastructure_index: f64) -> Self {
        Self {
            name: name.into(),
            elevation_m,
            infrastructure_index,
        }
    }
}

/// One weather reading for a province
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub region: String,
    /// Rain over the last hour (mm/h), 0 when the provider omits it
    pub precipitation_mm_h: f64,
    /// Cloud cover percentage (0-100)
    pub cloud_cover_pct: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_at: Option<DateTime<Utc>>,
}

impl Observation {
    pub fn new(region: impl Into<String>, precipitation_mm_h: f64, cloud_cover_pct: f64) -> Self {
        Self {
            region: region.into(),
            precipitation_mm_h,
            cloud_cover_pct,
            latitude: None,
            longitude: None,
            observed_at: None,
        }
    }

    /// Attach provider coordinates
    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }
}

/// Why a province could not be scored
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnavailableReason {
    #[error("provider returned status {status}: {message}")]
    ProviderError { status: u16, message: String },
    #[error("network failure: {detail}")]
    Network { detail: String },
    #[error("no observation received")]
    NoObservation,
}

/// Sentinel for a province whose observation could not be obtained
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("observation unavailable for {region}: {reason}")]
pub struct Unavailable {
    pub region: String,
    pub reason: UnavailableReason,
}

impl Unavailable {
    pub fn new(region: impl Into<String>, reason: UnavailableReason) -> Self {
        Self {
            region: region.into(),
            reason,
        }
    }
}

/// What the fetch layer hands over for each province
pub type ObservationResult = std::result::Result<Observation, Unavailable>;

/// Scored province with echoed inputs and tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub region: String,
    pub precipitation_mm_h: f64,
    pub cloud_cover_pct: f64,
    pub elevation_m: f64,
    pub infrastructure_index: f64,
    /// Final score (0-10, two decimals)
    pub risk_score: f64,
    pub tier: RiskTier,
    pub impact: String,
    pub color: DisplayColor,
    pub breakdown: ScoreBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

/// Province that could not be scored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoDataAssessment {
    pub region: String,
    pub elevation_m: f64,
    pub infrastructure_index: f64,
    pub reason: UnavailableReason,
}

/// Per-province pipeline output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RegionAssessment {
    Scored(RiskAssessment),
    NoData(NoDataAssessment),
}

impl RegionAssessment {
    pub fn region(&self) -> &str {
        match self {
            Self::Scored(a) => &a.region,
            Self::NoData(n) => &n.region,
        }
    }

    /// Score, or `None` for NO_DATA
    pub fn risk_score(&self) -> Option<f64> {
        match self {
            Self::Scored(a) => Some(a.risk_score),
            Self::NoData(_) => None,
        }
    }

    pub fn tier(&self) -> Option<RiskTier> {
        match self {
            Self::Scored(a) => Some(a.tier),
            Self::NoData(_) => None,
        }
    }

    /// Tier label including the NO_DATA pseudo-tier
    pub fn tier_label(&self) -> &'static str {
        match self {
            Self::Scored(a) => a.tier.label(),
            Self::NoData(_) => classifier::NO_DATA_LABEL,
        }
    }

    pub fn color(&self) -> DisplayColor {
        match self {
            Self::Scored(a) => a.color,
            Self::NoData(_) => DisplayColor::Gray,
        }
    }

    pub fn as_scored(&self) -> Option<&RiskAssessment> {
        match self {
            Self::Scored(a) => Some(a),
            Self::NoData(_) => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_data_is_distinct_from_minimum_score() {
        let no_data = RegionAssessment::NoData(NoDataAssessment {
            region: "Van".to_string(),
            elevation_m: 500.0,
            infrastructure_index: 7.0,
            reason: UnavailableReason::NoObservation,
        });

        assert_eq!(no_data.risk_score(), None);
        assert_eq!(no_data.tier(), None);
        assert_eq!(no_data.tier_label(), "NO_DATA");
        assert_eq!(no_data.color(), DisplayColor::Gray);
        assert!(no_data.is_no_data());
    }

    #[test]
    fn test_unavailable_display() {
        let unavailable = Unavailable::new(
            "Kars",
            UnavailableReason::ProviderError {
                status: 503,
                message: "Service Unavailable".to_string(),
            },
        );
        assert_eq!(
            unavailable.to_string(),
            "observation unavailable for Kars: provider returned status 503: Service Unavailable"
        );
    }

    #[test]
    fn test_assessment_serializes_with_status_tag() {
        let no_data = RegionAssessment::NoData(NoDataAssessment {
            region: "Van".to_string(),
            elevation_m: 500.0,
            infrastructure_index: 7.0,
            reason: UnavailableReason::Network {
                detail: "timed out".to_string(),
            },
        });

        let value = serde_json::to_value(&no_data).unwrap();
        assert_eq!(value["status"], "no_data");
        assert_eq!(value["reason"]["kind"], "network");
    }
}
