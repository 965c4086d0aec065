//! Static provincial reference table
//!
//! Elevation and infrastructure quality for the 81 provinces of Türkiye.
//! Most provinces use the 500 m default elevation with an infrastructure
//! index between 6.5 and 7.5; provinces with surveyed values (the large
//! coastal and inland metros) carry them explicitly. The table is fixed in
//! source so every build scores identically.

use crate::{FloodRiskError, RegionProfile, Result};
use std::collections::HashMap;
use tracing::debug;

/// Elevation assumed for provinces without a surveyed value (m)
pub const DEFAULT_ELEVATION_M: f64 = 500.0;
/// Baseline infrastructure index before per-province variation
pub const DEFAULT_INFRASTRUCTURE_INDEX: f64 = 7.0;

/// (name, elevation_m, infrastructure_index)
const PROVINCES: [(&str, f64, f64); 81] = [
        ("Adana", 500.0, 6.9),
        ("Adıyaman", 500.0, 7.5),
        ("Afyonkarahisar", 500.0, 7.2),
        ("Ağrı", 500.0, 7.1),
        ("Amasya", 500.0, 6.7),
        ("Ankara", 938.0, 8.5),
        ("Antalya", 30.0, 7.0),
        ("Artvin", 500.0, 7.4),
        ("Aydın", 500.0, 7.1),
        ("Balıkesir", 500.0, 7.2),
        ("Bilecik", 500.0, 6.5),
        ("Bingöl", 500.0, 7.5),
        ("Bitlis", 500.0, 7.3),
        ("Bolu", 500.0, 6.7),
        ("Burdur", 500.0, 6.7),
        ("Bursa", 500.0, 6.7),
        ("Çanakkale", 500.0, 6.8),
        ("Çankırı", 500.0, 7.0),
        ("Çorum", 500.0, 6.9),
        ("Denizli", 500.0, 6.8),
        ("Diyarbakır", 500.0, 7.1),
        ("Edirne", 500.0, 6.6),
        ("Elazığ", 500.0, 6.8),
        ("Erzincan", 500.0, 6.9),
        ("Erzurum", 500.0, 7.0),
        ("Eskişehir", 500.0, 7.3),
        ("Gaziantep", 850.0, 7.0),
        ("Giresun", 500.0, 7.0),
        ("Gümüşhane", 500.0, 7.1),
        ("Hakkari", 500.0, 6.5),
        ("Hatay", 500.0, 7.1),
        ("Isparta", 500.0, 6.7),
        ("Mersin", 15.0, 6.5),
        ("İstanbul", 100.0, 6.0),
        ("İzmir", 25.0, 7.5),
        ("Kars", 500.0, 7.3),
        ("Kastamonu", 500.0, 6.8),
        ("Kayseri", 500.0, 6.6),
        ("Kırklareli", 500.0, 7.2),
        ("Kırşehir", 500.0, 6.9),
        ("Kocaeli", 500.0, 6.6),
        ("Konya", 1021.0, 9.0),
        ("Kütahya", 500.0, 6.5),
        ("Malatya", 500.0, 7.4),
        ("Manisa", 500.0, 6.8),
        ("Kahramanmaraş", 500.0, 7.2),
        ("Mardin", 500.0, 6.8),
        ("Muğla", 500.0, 7.0),
        ("Muş", 500.0, 7.0),
        ("Nevşehir", 500.0, 6.7),
        ("Niğde", 500.0, 7.5),
        ("Ordu", 500.0, 7.3),
        ("Rize", 10.0, 5.0),
        ("Sakarya", 500.0, 7.4),
        ("Samsun", 500.0, 7.1),
        ("Siirt", 500.0, 7.4),
        ("Sinop", 500.0, 6.6),
        ("Sivas", 500.0, 6.7),
        ("Tekirdağ", 500.0, 6.5),
        ("Tokat", 500.0, 6.8),
        ("Trabzon", 500.0, 6.9),
        ("Tunceli", 500.0, 6.8),
        ("Şanlıurfa", 500.0, 7.3),
        ("Uşak", 500.0, 6.9),
        ("Van", 500.0, 6.8),
        ("Yozgat", 500.0, 7.0),
        ("Zonguldak", 500.0, 6.6),
        ("Aksaray", 500.0, 7.3),
        ("Bayburt", 500.0, 6.6),
        ("Karaman", 500.0, 7.5),
        ("Kırıkkale", 500.0, 7.3),
        ("Batman", 500.0, 6.7),
        ("Şırnak", 500.0, 6.5),
        ("Bartın", 500.0, 7.3),
        ("Ardahan", 500.0, 7.2),
        ("Iğdır", 500.0, 7.2),
        ("Yalova", 500.0, 7.3),
        ("Karabük", 500.0, 6.6),
        ("Kilis", 500.0, 6.9),
        ("Osmaniye", 500.0, 6.6),
        ("Düzce", 500.0, 7.4),
];

/// Province lookup keyed by name, iterated in table order
#[derive(Debug, Clone, Default)]
pub struct RegionTable {
    profiles: Vec<RegionProfile>,
    index: HashMap<String, usize>,
}

impl RegionTable {
    /// Create new empty table
    pub fn new() -> Self {
        Self {
            profiles: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Create table with the built-in 81 provinces
    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        table.load_default_data();
        table
    }

    /// Load the built-in province data
    pub fn load_default_data(&mut self) {
        for (name, elevation_m, infrastructure_index) in PROVINCES {
            self.upsert(RegionProfile::new(name, elevation_m, infrastructure_index));
        }
        debug!("Loaded {} built-in provinces", self.profiles.len());
    }

    /// Build a table from explicit profiles, rejecting duplicates and empty input
    pub fn from_profiles(profiles: Vec<RegionProfile>) -> Result<Self> {
        if profiles.is_empty() {
            return Err(FloodRiskError::EmptyRegionTable);
        }

        let mut table = Self::new();
        for profile in profiles {
            table.add_region(profile)?;
        }
        Ok(table)
    }

    /// Add a province; names must be unique
    pub fn add_region(&mut self, profile: RegionProfile) -> Result<()> {
        if self.index.contains_key(&profile.name) {
            return Err(FloodRiskError::DuplicateRegion(profile.name));
        }
        self.index.insert(profile.name.clone(), self.profiles.len());
        self.profiles.push(profile);
        Ok(())
    }

    /// Insert or replace a province by name
    pub fn upsert(&mut self, profile: RegionProfile) {
        match self.index.get(&profile.name) {
            Some(&i) => self.profiles[i] = profile,
            None => {
                self.index.insert(profile.name.clone(), self.profiles.len());
                self.profiles.push(profile);
            }
        }
    }

    /// Static profile for a province
    pub fn get_region_profile(&self, name: &str) -> Option<&RegionProfile> {
        self.index.get(name).map(|&i| &self.profiles[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Profiles in table order
    pub fn profiles(&self) -> &[RegionProfile] {
        &self.profiles
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.iter().map(|p| p.name.as_str())
    }
}
