//! Regions and the fixed registry they are drawn from.

use crate::error::{CorrelateError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Calendar year used as the index of every yearly series.
pub type Year = i32;

/// Parse a year label such as `"2001"` into a [`Year`].
///
/// # Example
/// ```
/// use tfr_correlate::core::parse_year;
///
/// assert_eq!(parse_year("2001").unwrap(), 2001);
/// assert!(parse_year("2001Q1").is_err());
/// ```
pub fn parse_year(label: &str) -> Result<Year> {
    label
        .trim()
        .parse::<Year>()
        .map_err(|_| CorrelateError::InvalidYear(label.to_string()))
}

/// Short region code, e.g. `cze`. Always stored lower-case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionCode(String);

impl RegionCode {
    pub fn new(code: &str) -> Self {
        Self(code.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for RegionCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

/// Geographical region. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    code: RegionCode,
    name: String,
}

impl Region {
    pub fn new(code: &str, name: &str) -> Self {
        Self {
            code: RegionCode::new(code),
            name: name.to_string(),
        }
    }

    pub fn code(&self) -> &RegionCode {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// The fixed set of regions known before collection starts.
///
/// Collectors may only deliver series for registered regions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionRegistry {
    regions: BTreeMap<RegionCode, Region>,
}

impl RegionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a region. Re-registering a code replaces its display name.
    pub fn register(&mut self, region: Region) {
        self.regions.insert(region.code.clone(), region);
    }

    pub fn with_region(mut self, code: &str, name: &str) -> Self {
        self.register(Region::new(code, name));
        self
    }

    pub fn get(&self, code: &RegionCode) -> Option<&Region> {
        self.regions.get(code)
    }

    pub fn contains(&self, code: &RegionCode) -> bool {
        self.regions.contains_key(code)
    }

    /// Look up a region by a raw code as delivered by a collector (`"CZE"`).
    pub fn resolve(&self, raw: &str) -> Option<&Region> {
        self.regions.get(&RegionCode::new(raw))
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.regions.values()
    }

    pub fn codes(&self) -> impl Iterator<Item = &RegionCode> {
        self.regions.keys()
    }

    /// World, the European Union, its member states, Norway and the United Kingdom.
    pub fn european() -> Self {
        const REGIONS: [(&str, &str); 31] = [
            ("wld", "World"),
            ("euu", "European Union"),
            ("aut", "Austria"),
            ("bel", "Belgium"),
            ("bgr", "Bulgaria"),
            ("hrv", "Croatia"),
            ("cyp", "Cyprus"),
            ("cze", "Czech Republic"),
            ("dnk", "Denmark"),
            ("est", "Estonia"),
            ("fin", "Finland"),
            ("fra", "France"),
            ("deu", "Germany"),
            ("grc", "Greece"),
            ("hun", "Hungary"),
            ("irl", "Ireland"),
            ("ita", "Italy"),
            ("lva", "Latvia"),
            ("ltu", "Lithuania"),
            ("lux", "Luxembourg"),
            ("mlt", "Malta"),
            ("nld", "Netherlands"),
            ("pol", "Poland"),
            ("prt", "Portugal"),
            ("rou", "Romania"),
            ("svk", "Slovakia"),
            ("svn", "Slovenia"),
            ("esp", "Spain"),
            ("swe", "Sweden"),
            ("nor", "Norway"),
            ("gbr", "United Kingdom"),
        ];

        REGIONS
            .iter()
            .fold(Self::new(), |registry, (code, name)| {
                registry.with_region(code, name)
            })
    }
}

impl FromIterator<Region> for RegionRegistry {
    fn from_iter<I: IntoIterator<Item = Region>>(iter: I) -> Self {
        let mut registry = Self::new();
        for region in iter {
            registry.register(region);
        }
        registry
    }
}
