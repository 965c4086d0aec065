//! Per-province assessment: profile + observation -> scored tier or NO_DATA

use crate::classifier::classify_risk;
use crate::scorer::score_breakdown;
use crate::{
    NoDataAssessment, ObservationResult, RegionAssessment, RegionProfile, RegionTable,
    RiskAssessment, RiskTier, UnavailableReason,
};
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Assess one province
///
/// An unavailable observation yields `NoData`; it is never scored as zero.
pub fn assess_region(profile: &RegionProfile, observation: &ObservationResult) -> RegionAssessment {
    let observation = match observation {
        Ok(obs) => obs,
        Err(unavailable) => {
            return no_data(profile, unavailable.reason.clone());
        }
    };

    let breakdown = score_breakdown(
        observation.precipitation_mm_h,
        observation.cloud_cover_pct,
        profile.elevation_m,
        profile.infrastructure_index,
    );
    let risk_score = breakdown.score();
    let class = classify_risk(risk_score);

    debug!(
        "Scored {}: {:.2} {} (precip={:.3} x{:.1}, elev={:.3}, infra={:.3}, cloud={:.3})",
        profile.name,
        risk_score,
        class.tier,
        breakdown.precipitation,
        breakdown.multiplier,
        breakdown.elevation,
        breakdown.infrastructure,
        breakdown.cloud
    );

    RegionAssessment::Scored(RiskAssessment {
        region: profile.name.clone(),
        precipitation_mm_h: observation.precipitation_mm_h,
        cloud_cover_pct: observation.cloud_cover_pct,
        elevation_m: profile.elevation_m,
        infrastructure_index: profile.infrastructure_index,
        risk_score,
        tier: class.tier,
        impact: class.impact.to_string(),
        color: class.color,
        breakdown,
        latitude: observation.latitude,
        longitude: observation.longitude,
    })
}

fn no_data(profile: &RegionProfile, reason: UnavailableReason) -> RegionAssessment {
    RegionAssessment::NoData(NoDataAssessment {
        region: profile.name.clone(),
        elevation_m: profile.elevation_m,
        infrastructure_index: profile.infrastructure_index,
        reason,
    })
}

/// Assess every province in the table
///
/// Observations are matched to provinces by name; the last observation for
/// a province wins. Observations for provinces missing from the table are
/// ignored. Provinces without an observation come back as `NoData`.
/// Results follow table order.
pub fn assess_all(table: &RegionTable, observations: Vec<ObservationResult>) -> Vec<RegionAssessment> {
    let mut by_region: HashMap<String, ObservationResult> = HashMap::with_capacity(observations.len());
    let mut unknown = 0;

    for observation in observations {
        let region = match &observation {
            Ok(obs) => obs.region.clone(),
            Err(unavailable) => unavailable.region.clone(),
        };

        if !table.contains(&region) {
            warn!("Observation for unknown region {} ignored", region);
            unknown += 1;
            continue;
        }

        if by_region.insert(region.clone(), observation).is_some() {
            warn!("Duplicate observation for {}, keeping the last one", region);
        }
    }

    let missing = UnavailableReason::NoObservation;
    let assessments: Vec<RegionAssessment> = table
        .profiles()
        .par_iter()
        .map(|profile| match by_region.get(&profile.name) {
            Some(observation) => assess_region(profile, observation),
            None => no_data(profile, missing.clone()),
        })
        .collect();

    let scored = assessments.iter().filter(|a| !a.is_no_data()).count();
    info!(
        "Assessed {} regions: {} scored, {} no data, {} unknown observations",
        assessments.len(),
        scored,
        assessments.len() - scored,
        unknown
    );

    assessments
}

/// Order by descending score (ties by name), NO_DATA last
pub fn sort_by_risk(assessments: &mut [RegionAssessment]) {
    assessments.sort_by(|a, b| match (a.risk_score(), b.risk_score()) {
        (Some(sa), Some(sb)) => sb
            .partial_cmp(&sa)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.region().cmp(b.region())),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.region().cmp(b.region()),
    });
}

/// Scored provinces in the given tier
pub fn filter_by_tier(assessments: &[RegionAssessment], tier: RiskTier) -> Vec<RegionAssessment> {
    assessments
        .iter()
        .filter(|a| a.tier() == Some(tier))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DisplayColor, Observation, Unavailable};

    fn table() -> RegionTable {
        RegionTable::from_profiles(vec![
            RegionProfile::new("Ankara", 938.0, 8.5),
            RegionProfile::new("İstanbul", 100.0, 6.0),
            RegionProfile::new("Rize", 10.0, 5.0),
            RegionProfile::new("Van", 500.0, 6.8),
        ])
        .unwrap()
    }

    #[test]
    fn test_assess_region_scored() {
        let profile = RegionProfile::new("İstanbul", 100.0, 6.0);
        let observation = Ok(Observation::new("İstanbul", 12.0, 90.0).with_coordinates(41.01, 28.97));

        let assessment = assess_region(&profile, &observation);
        let scored = assessment.as_scored().unwrap();

        assert_eq!(scored.risk_score, 8.69);
        assert_eq!(scored.tier, RiskTier::VeryHigh);
        assert_eq!(scored.impact, "Large-area inundation");
        assert_eq!(scored.color, DisplayColor::Red);
        assert_eq!(scored.elevation_m, 100.0);
        assert_eq!(scored.infrastructure_index, 6.0);
        assert_eq!(scored.latitude, Some(41.01));
    }

    #[test]
    fn test_assess_region_unavailable_is_no_data() {
        let profile = RegionProfile::new("Van", 500.0, 6.8);
        let observation = Err(Unavailable::new(
            "Van",
            UnavailableReason::Network {
                detail: "timed out".to_string(),
            },
        ));

        let assessment = assess_region(&profile, &observation);
        assert!(assessment.is_no_data());
        assert_eq!(assessment.risk_score(), None);
        assert_eq!(assessment.color(), DisplayColor::Gray);
    }

    #[test]
    fn test_zero_score_is_not_no_data() {
        // Infrastructure above the scale drives the sum below zero; clamps to 0.0
        let profile = RegionProfile::new("Test", 900.0, 12.0);
        let assessment = assess_region(&profile, &Ok(Observation::new("Test", 0.0, 0.0)));

        assert_eq!(assessment.risk_score(), Some(0.0));
        assert!(!assessment.is_no_data());
        assert_eq!(assessment.tier(), Some(RiskTier::VeryLow));
    }

    #[test]
    fn test_assess_all_covers_every_region_in_order() {
        let observations = vec![
            Ok(Observation::new("Rize", 11.0, 100.0)),
            Ok(Observation::new("Ankara", 0.0, 0.0)),
            Ok(Observation::new("Atlantis", 50.0, 100.0)),
            Err(Unavailable::new("İstanbul", UnavailableReason::NoObservation)),
        ];

        let assessments = assess_all(&table(), observations);
        let names: Vec<&str> = assessments.iter().map(|a| a.region()).collect();
        assert_eq!(names, vec!["Ankara", "İstanbul", "Rize", "Van"]);

        assert_eq!(assessments[0].risk_score(), Some(0.11));
        assert!(assessments[1].is_no_data());
        assert_eq!(assessments[2].tier(), Some(RiskTier::VeryHigh));
        // Van had no record at all
        match &assessments[3] {
            RegionAssessment::NoData(n) => assert_eq!(n.reason, UnavailableReason::NoObservation),
            other => panic!("expected NoData, got {:?}", other),
        }
    }

    #[test]
    fn test_assess_all_last_observation_wins() {
        let observations = vec![
            Ok(Observation::new("Rize", 0.0, 0.0)),
            Ok(Observation::new("Rize", 20.0, 100.0)),
        ];

        let assessments = assess_all(&table(), observations);
        let rize = assessments.iter().find(|a| a.region() == "Rize").unwrap();
        assert_eq!(rize.tier(), Some(RiskTier::VeryHigh));
    }

    #[test]
    fn test_sort_by_risk() {
        let observations = vec![
            Ok(Observation::new("Ankara", 0.0, 0.0)),
            Ok(Observation::new("İstanbul", 12.0, 90.0)),
            Ok(Observation::new("Rize", 3.0, 60.0)),
        ];

        let mut assessments = assess_all(&table(), observations);
        sort_by_risk(&mut assessments);

        let names: Vec<&str> = assessments.iter().map(|a| a.region()).collect();
        assert_eq!(names, vec!["İstanbul", "Rize", "Ankara", "Van"]);
        assert!(assessments[3].is_no_data());
    }

    #[test]
    fn test_filter_by_tier() {
        let observations = vec![
            Ok(Observation::new("Ankara", 0.0, 0.0)),
            Ok(Observation::new("İstanbul", 12.0, 90.0)),
            Ok(Observation::new("Rize", 0.0, 0.0)),
        ];

        let assessments = assess_all(&table(), observations);
        let very_low = filter_by_tier(&assessments, RiskTier::VeryLow);
        let names: Vec<&str> = very_low.iter().map(|a| a.region()).collect();
        assert_eq!(names, vec!["Ankara", "Rize"]);

        assert!(filter_by_tier(&assessments, RiskTier::High).is_empty());
    }
}
