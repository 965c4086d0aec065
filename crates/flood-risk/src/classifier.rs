//! Risk tier classification
//!
//! Half-open score bins, evaluated low to high, first match wins:
//!
//! | Score       | Tier          | Impact                     | Color  |
//! |-------------|---------------|----------------------------|--------|
//! | < 1.5       | VERY_LOW      | Minor puddling             | green  |
//! | 1.5 - 3.5   | LOW_MODERATE  | Localized street flooding  | lime   |
//! | 3.5 - 7.0   | HIGH          | Serious flood risk         | orange |
//! | >= 7.0      | VERY_HIGH     | Large-area inundation      | red    |
//!
//! NO_DATA is not produced here: it depends on data availability, not on a
//! score, and is modeled by [`crate::RegionAssessment::NoData`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lower bound of LOW_MODERATE
pub const LOW_MODERATE_THRESHOLD: f64 = 1.5;
/// Lower bound of HIGH
pub const HIGH_THRESHOLD: f64 = 3.5;
/// Lower bound of VERY_HIGH
pub const VERY_HIGH_THRESHOLD: f64 = 7.0;

/// Label of the pseudo-tier for provinces without an observation
pub const NO_DATA_LABEL: &str = "NO_DATA";

/// Flood risk tier, ordered from lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskTier {
    VeryLow,
    LowModerate,
    High,
    VeryHigh,
}

impl RiskTier {
    /// All tiers in ascending order
    pub const ALL: [RiskTier; 4] = [
        RiskTier::VeryLow,
        RiskTier::LowModerate,
        RiskTier::High,
        RiskTier::VeryHigh,
    ];

    /// Classify score into tier
    pub fn from_score(score: f64) -> Self {
        if score < LOW_MODERATE_THRESHOLD {
            RiskTier::VeryLow
        } else if score < HIGH_THRESHOLD {
            RiskTier::LowModerate
        } else if score < VERY_HIGH_THRESHOLD {
            RiskTier::High
        } else {
            RiskTier::VeryHigh
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::VeryLow => "VERY_LOW",
            RiskTier::LowModerate => "LOW_MODERATE",
            RiskTier::High => "HIGH",
            RiskTier::VeryHigh => "VERY_HIGH",
        }
    }

    /// Expected on-the-ground impact
    pub fn impact(&self) -> &'static str {
        match self {
            RiskTier::VeryLow => "Minor puddling",
            RiskTier::LowModerate => "Localized street flooding",
            RiskTier::High => "Serious flood risk",
            RiskTier::VeryHigh => "Large-area inundation",
        }
    }

    pub fn color(&self) -> DisplayColor {
        match self {
            RiskTier::VeryLow => DisplayColor::Green,
            RiskTier::LowModerate => DisplayColor::Lime,
            RiskTier::High => DisplayColor::Orange,
            RiskTier::VeryHigh => DisplayColor::Red,
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for RiskTier {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        RiskTier::ALL
            .into_iter()
            .find(|tier| tier.label() == normalized)
            .ok_or_else(|| {
                format!(
                    "unknown risk tier '{}', expected one of VERY_LOW, LOW_MODERATE, HIGH, VERY_HIGH",
                    s
                )
            })
    }
}

/// Map display color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayColor {
    Green,
    Lime,
    Orange,
    Red,
    /// NO_DATA
    Gray,
}

impl DisplayColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayColor::Green => "green",
            DisplayColor::Lime => "lime",
            DisplayColor::Orange => "orange",
            DisplayColor::Red => "red",
            DisplayColor::Gray => "gray",
        }
    }

    /// Translucent marker fill; higher tiers are more opaque
    pub fn fill_rgba(&self) -> &'static str {
        match self {
            DisplayColor::Green => "rgba(0, 128, 0, 0.7)",
            DisplayColor::Lime => "rgba(173, 255, 47, 0.8)",
            DisplayColor::Orange => "rgba(255, 140, 0, 0.9)",
            DisplayColor::Red => "rgba(255, 0, 0, 1.0)",
            DisplayColor::Gray => "rgba(128, 128, 128, 0.5)",
        }
    }
}

impl fmt::Display for DisplayColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Classification result for one score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskClass {
    pub tier: RiskTier,
    pub impact: &'static str,
    pub color: DisplayColor,
}

/// Map a risk score to its tier, impact description and display color
pub fn classify_risk(score: f64) -> RiskClass {
    let tier = RiskTier::from_score(score);
    RiskClass {
        tier,
        impact: tier.impact(),
        color: tier.color(),
    }
}
