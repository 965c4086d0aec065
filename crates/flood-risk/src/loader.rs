//! Data loading from JSON files
//!
//! Observations are provider payloads (OpenWeatherMap current-weather
//! shape) captured to disk by the fetch layer, one record per province.

use crate::regions::{DEFAULT_ELEVATION_M, DEFAULT_INFRASTRUCTURE_INDEX};
use crate::{
    FloodRiskError, Observation, ObservationResult, RegionProfile, RegionTable, Result,
    Unavailable, UnavailableReason,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{info, warn};

/// Validate latitude is in valid range
fn is_valid_latitude(lat: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && lat.is_finite()
}

/// Validate longitude is in valid range
fn is_valid_longitude(lon: f64) -> bool {
    (-180.0..=180.0).contains(&lon) && lon.is_finite()
}

/// Raw observation record from JSON
#[derive(Debug, Deserialize)]
struct RawObservationRecord {
    region: Option<String>,
    weather: Option<RawWeather>,
    error: Option<RawProviderError>,
}

/// Provider current-weather payload (only the fields scoring needs)
#[derive(Debug, Deserialize)]
struct RawWeather {
    coord: Option<RawCoord>,
    rain: Option<RawRain>,
    clouds: Option<RawClouds>,
    dt: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RawCoord {
    lat: Option<f64>,
    lon: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawRain {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawClouds {
    all: Option<f64>,
}

/// Failure recorded by the fetch layer
#[derive(Debug, Deserialize)]
struct RawProviderError {
    status: Option<u16>,
    message: Option<String>,
    network: Option<String>,
}

/// Raw region row from JSON
#[derive(Debug, Deserialize)]
struct RawRegion {
    name: Option<String>,
    elevation_m: Option<f64>,
    infrastructure_index: Option<f64>,
}

impl RawProviderError {
    fn into_reason(self) -> UnavailableReason {
        match (self.status, self.network) {
            (Some(status), _) => UnavailableReason::ProviderError {
                status,
                message: self.message.unwrap_or_else(|| "Unknown error".to_string()),
            },
            (None, Some(detail)) => UnavailableReason::Network { detail },
            (None, None) => UnavailableReason::Network {
                detail: self.message.unwrap_or_else(|| "unknown failure".to_string()),
            },
        }
    }
}

impl RawWeather {
    fn into_observation(self, region: String) -> Observation {
        let precipitation_mm_h = self.rain.and_then(|r| r.one_hour).unwrap_or(0.0);
        let cloud_cover_pct = self.clouds.and_then(|c| c.all).unwrap_or(0.0);

        let mut observation = Observation::new(region, precipitation_mm_h, cloud_cover_pct);

        match self.coord {
            Some(RawCoord {
                lat: Some(lat),
                lon: Some(lon),
            }) if is_valid_latitude(lat) && is_valid_longitude(lon) => {
                observation = observation.with_coordinates(lat, lon);
            }
            Some(_) => warn!(
                "Invalid coordinates for {}, observation kept without a map position",
                observation.region
            ),
            None => warn!(
                "No coordinates for {}, observation kept without a map position",
                observation.region
            ),
        }

        observation.observed_at = self
            .dt
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0));

        observation
    }
}

/// Convert parsed records into per-province observation results
fn convert_records(records: Vec<RawObservationRecord>) -> Vec<ObservationResult> {
    let mut results = Vec::with_capacity(records.len());
    let mut skipped = 0;
    let mut unavailable = 0;

    for record in records {
        let region = match record.region.map(|r| r.trim().to_string()) {
            Some(r) if !r.is_empty() => r,
            _ => {
                skipped += 1;
                continue;
            }
        };

        let result = match (record.error, record.weather) {
            (Some(error), _) => Err(Unavailable::new(region, error.into_reason())),
            (None, Some(weather)) => Ok(weather.into_observation(region)),
            (None, None) => Err(Unavailable::new(region, UnavailableReason::NoObservation)),
        };

        if let Err(ref e) = result {
            warn!("{}", e);
            unavailable += 1;
        }
        results.push(result);
    }

    info!(
        "Loaded {} observation records ({} unavailable, {} skipped for missing region)",
        results.len(),
        unavailable,
        skipped
    );

    results
}

/// Parse observation records from a JSON string
pub fn parse_observations(json: &str) -> Result<Vec<ObservationResult>> {
    let records: Vec<RawObservationRecord> = serde_json::from_str(json)?;
    Ok(convert_records(records))
}

/// Load observation records from JSON file
pub fn load_observations(path: impl AsRef<Path>) -> Result<Vec<ObservationResult>> {
    let path = path.as_ref();
    info!("Loading observations from {:?}", path);

    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let records: Vec<RawObservationRecord> = serde_json::from_reader(reader)?;

    Ok(convert_records(records))
}

/// Load a replacement region table from JSON file
///
/// Accepts either a bare array or an object with a `regions` field. Rows
/// without a name are skipped; missing attributes fall back to the
/// provincial defaults.
pub fn load_regions(path: impl AsRef<Path>) -> Result<RegionTable> {
    let path = path.as_ref();
    info!("Loading region table from {:?}", path);

    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let raw: serde_json::Value = serde_json::from_reader(reader)?;

    let rows: Vec<RawRegion> = if let Some(regions) = raw.get("regions") {
        serde_json::from_value(regions.clone())?
    } else if raw.is_array() {
        serde_json::from_value(raw)?
    } else {
        return Err(FloodRiskError::EmptyRegionTable);
    };

    let mut profiles = Vec::with_capacity(rows.len());
    let mut skipped = 0;

    for row in rows {
        let name = match row.name.map(|n| n.trim().to_string()) {
            Some(n) if !n.is_empty() => n,
            _ => {
                skipped += 1;
                continue;
            }
        };

        profiles.push(RegionProfile::new(
            name,
            row.elevation_m.unwrap_or(DEFAULT_ELEVATION_M),
            row.infrastructure_index.unwrap_or(DEFAULT_INFRASTRUCTURE_INDEX),
        ));
    }

    info!(
        "Loaded {} regions ({} skipped for missing name)",
        profiles.len(),
        skipped
    );

    RegionTable::from_profiles(profiles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_observations() {
        let json = r#"[
            {"region": "Rize", "weather": {"coord": {"lat": 41.02, "lon": 40.52}, "rain": {"1h": 6.2}, "clouds": {"all": 90}, "dt": 1760000000}},
            {"region": "Ankara", "weather": {"coord": {"lat": 39.92, "lon": 32.85}, "clouds": {"all": 20}}},
            {"region": "Van", "error": {"status": 503, "message": "Service Unavailable"}},
            {"name": "No Region"}
        ]"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let results = load_observations(file.path()).unwrap();
        assert_eq!(results.len(), 3);

        let rize = results[0].as_ref().unwrap();
        assert_eq!(rize.region, "Rize");
        assert_eq!(rize.precipitation_mm_h, 6.2);
        assert_eq!(rize.cloud_cover_pct, 90.0);
        assert_eq!(rize.latitude, Some(41.02));
        assert_eq!(rize.observed_at.map(|t| t.timestamp()), Some(1_760_000_000));

        // No rain block means no rain
        let ankara = results[1].as_ref().unwrap();
        assert_eq!(ankara.precipitation_mm_h, 0.0);
        assert_eq!(ankara.cloud_cover_pct, 20.0);
        assert_eq!(ankara.observed_at, None);

        let van = results[2].as_ref().unwrap_err();
        assert_eq!(van.region, "Van");
        assert_eq!(
            van.reason,
            UnavailableReason::ProviderError {
                status: 503,
                message: "Service Unavailable".to_string()
            }
        );
    }

    #[test]
    fn test_parse_error_variants() {
        let json = r#"[
            {"region": "Kars", "error": {"network": "timed out after 3 retries"}},
            {"region": "Muş", "error": {"status": 401}},
            {"region": "Siirt"},
            {"region": "Sinop", "error": {"message": "connection reset"}}
        ]"#;

        let results = parse_observations(json).unwrap();
        let reasons: Vec<UnavailableReason> = results
            .into_iter()
            .map(|r| r.unwrap_err().reason)
            .collect();

        assert_eq!(
            reasons,
            vec![
                UnavailableReason::Network {
                    detail: "timed out after 3 retries".to_string()
                },
                UnavailableReason::ProviderError {
                    status: 401,
                    message: "Unknown error".to_string()
                },
                UnavailableReason::NoObservation,
                UnavailableReason::Network {
                    detail: "connection reset".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_missing_or_invalid_coordinates_still_scored() {
        let json = r#"[
            {"region": "Bolu", "weather": {"rain": {"1h": 1.0}, "clouds": {"all": 40}}},
            {"region": "Sivas", "weather": {"coord": {"lat": 123.0, "lon": 37.0}, "clouds": {"all": 10}}}
        ]"#;

        let results = parse_observations(json).unwrap();
        let bolu = results[0].as_ref().unwrap();
        assert_eq!(bolu.latitude, None);
        assert_eq!(bolu.precipitation_mm_h, 1.0);

        let sivas = results[1].as_ref().unwrap();
        assert_eq!(sivas.latitude, None);
        assert_eq!(sivas.longitude, None);
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        assert!(matches!(
            parse_observations("{not json"),
            Err(FloodRiskError::Json(_))
        ));
    }

    #[test]
    fn test_load_regions() {
        let json = r#"{
            "regions": [
                {"name": "Rize", "elevation_m": 10.0, "infrastructure_index": 5.0},
                {"name": "Bayburt"},
                {"elevation_m": 3.0}
            ]
        }"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let table = load_regions(file.path()).unwrap();
        assert_eq!(table.len(), 2);

        let bayburt = table.get_region_profile("Bayburt").unwrap();
        assert_eq!(bayburt.elevation_m, DEFAULT_ELEVATION_M);
        assert_eq!(bayburt.infrastructure_index, DEFAULT_INFRASTRUCTURE_INDEX);
    }

    #[test]
    fn test_load_regions_rejects_duplicates() {
        let json = r#"[
            {"name": "Rize", "elevation_m": 10.0, "infrastructure_index": 5.0},
            {"name": "Rize", "elevation_m": 11.0, "infrastructure_index": 5.0}
        ]"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        assert!(matches!(
            load_regions(file.path()),
            Err(FloodRiskError::DuplicateRegion(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            load_observations("/nonexistent/observations.json"),
            Err(FloodRiskError::Io(_))
        ));
    }
}
