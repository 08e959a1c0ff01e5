//! Static configuration: the region table and per-query options.

use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CheckError, CheckResult};

/// Default per-query timeout in seconds.
pub const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 5;

/// Reference region table: (label, nameserver address).
const REFERENCE_REGIONS: &[(&str, &str)] = &[
    ("Australia (Cloudflare)", "1.1.1.1"),
    ("Brazil (Claro)", "200.248.178.54"),
    ("Canada (Fortinet)", "208.91.112.53"),
    ("China (Aliyun)", "223.5.5.5"),
    ("Netherlands (OpenTLD)", "80.80.80.80"),
    ("Russia (IONICA)", "176.103.130.130"),
    ("South Africa (Liquid)", "5.11.11.5"),
    ("Switzerland (Oskar Emmenegger)", "194.209.157.109"),
    ("USA (Google)", "8.8.8.8"),
];

/// One row of the region table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    /// Human-readable label, unique within a table.
    pub region: String,
    /// Nameserver to query: a hostname or a literal IP address.
    pub nameserver: String,
}

/// Ordered region → nameserver mapping.
///
/// Iteration order is insertion order and drives the order of the
/// propagation report. Labels are unique and nothing is blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RegionTable {
    regions: Vec<Region>,
}

impl RegionTable {
    /// Build a table from `(label, nameserver)` pairs.
    pub fn new<L, N>(pairs: impl IntoIterator<Item = (L, N)>) -> CheckResult<Self>
    where
        L: Into<String>,
        N: Into<String>,
    {
        let regions = pairs
            .into_iter()
            .map(|(region, nameserver)| Region {
                region: region.into(),
                nameserver: nameserver.into(),
            })
            .collect();
        Self::from_regions(regions)
    }

    /// Parse a JSON array of `{"region": ..., "nameserver": ...}` objects.
    pub fn from_json(json: &str) -> CheckResult<Self> {
        let regions: Vec<Region> = serde_json::from_str(json)?;
        Self::from_regions(regions)
    }

    /// The built-in table of nine public resolvers.
    pub fn reference() -> Self {
        Self {
            regions: REFERENCE_REGIONS
                .iter()
                .map(|(region, nameserver)| Region {
                    region: (*region).to_string(),
                    nameserver: (*nameserver).to_string(),
                })
                .collect(),
        }
    }

    fn from_regions(regions: Vec<Region>) -> CheckResult<Self> {
        if regions.is_empty() {
            return Err(CheckError::ValidationError(
                "Region table must contain at least one region".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for r in &regions {
            if r.region.trim().is_empty() {
                return Err(CheckError::ValidationError(
                    "Region label must not be blank".to_string(),
                ));
            }
            if r.nameserver.trim().is_empty() {
                return Err(CheckError::ValidationError(format!(
                    "Nameserver for region '{}' must not be blank",
                    r.region
                )));
            }
            if !seen.insert(r.region.as_str()) {
                return Err(CheckError::ValidationError(format!(
                    "Duplicate region label: {}",
                    r.region
                )));
            }
        }

        Ok(Self { regions })
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Region> {
        self.regions.iter()
    }

    /// Nameserver configured for `label`, if present.
    pub fn nameserver_for(&self, label: &str) -> Option<&str> {
        self.regions
            .iter()
            .find(|r| r.region == label)
            .map(|r| r.nameserver.as_str())
    }
}

impl Default for RegionTable {
    fn default() -> Self {
        Self::reference()
    }
}

impl<'de> Deserialize<'de> for RegionTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let regions = Vec::<Region>::deserialize(deserializer)?;
        Self::from_regions(regions).map_err(serde::de::Error::custom)
    }
}

impl<'a> IntoIterator for &'a RegionTable {
    type Item = &'a Region;
    type IntoIter = std::slice::Iter<'a, Region>;

    fn into_iter(self) -> Self::IntoIter {
        self.regions.iter()
    }
}

/// Tunables shared by every query of a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckerOptions {
    /// Upper bound for one DNS query (each query has its own budget).
    pub query_timeout: Duration,
}

impl CheckerOptions {
    /// Options with a per-query timeout of `secs` seconds (must be non-zero).
    pub fn with_timeout_secs(secs: u64) -> CheckResult<Self> {
        if secs == 0 {
            return Err(CheckError::ValidationError(
                "Query timeout must be at least one second".to_string(),
            ));
        }
        Ok(Self {
            query_timeout: Duration::from_secs(secs),
        })
    }
}

impl Default for CheckerOptions {
    fn default() -> Self {
        Self {
            query_timeout: Duration::from_secs(DEFAULT_QUERY_TIMEOUT_SECS),
        }
    }
}
