//! Public types returned by propagation check operations.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// DNS record types the checker queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordKind {
    /// IPv4 address record.
    A,
    /// Name server record.
    Ns,
    /// Mail exchange record.
    Mx,
    /// Text record.
    Txt,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::Ns => write!(f, "NS"),
            Self::Mx => write!(f, "MX"),
            Self::Txt => write!(f, "TXT"),
        }
    }
}

impl FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "A" => Ok(Self::A),
            "NS" => Ok(Self::Ns),
            "MX" => Ok(Self::Mx),
            "TXT" => Ok(Self::Txt),
            _ => Err(format!("Unsupported record kind: {s}")),
        }
    }
}

/// Outcome of a single DNS query.
///
/// `Resolved` always holds at least one value, in the order the protocol
/// returned them. Anything else (error, timeout, empty answer) is `Missing`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "status", content = "values", rename_all = "lowercase")]
pub enum RecordValue {
    /// One or more record values.
    Resolved(Vec<String>),
    /// The query failed or produced nothing.
    Missing,
}

impl RecordValue {
    /// Build a value from query answers; an empty answer becomes `Missing`.
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            Self::Missing
        } else {
            Self::Resolved(values)
        }
    }

    /// A single resolved value.
    pub fn single(value: impl Into<String>) -> Self {
        Self::Resolved(vec![value.into()])
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Resolved values, or an empty slice for `Missing`.
    pub fn values(&self) -> &[String] {
        match self {
            Self::Resolved(values) => values,
            Self::Missing => &[],
        }
    }

    /// First resolved value, if any.
    pub fn first(&self) -> Option<&str> {
        self.values().first().map(String::as_str)
    }

    /// Exact textual membership test. `Missing` contains nothing.
    pub fn contains(&self, candidate: &str) -> bool {
        self.values().iter().any(|v| v == candidate)
    }
}

impl<S: Into<String>> FromIterator<S> for RecordValue {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_values(iter)
    }
}

/// Canonical (locally resolved) records for one domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainRecords {
    /// Host → IP via the system resolver (single value).
    pub address: RecordValue,
    /// IP → host name, first PTR answer only.
    pub ptr: RecordValue,
    /// NS records of the domain.
    pub nameservers: RecordValue,
    /// A records of the domain.
    pub primary_a: RecordValue,
    /// MX records of the domain, rendered `"<preference> <exchange>"`.
    pub primary_mx: RecordValue,
    /// TXT records of the domain.
    pub primary_txt: RecordValue,
    /// A records of `www.<domain>`.
    pub www_a: RecordValue,
    /// A records of `mail.<domain>`.
    pub mail_a: RecordValue,
}

impl DomainRecords {
    /// The canonical address the propagation check compares against.
    pub fn canonical_address(&self) -> Option<&str> {
        self.address.first()
    }
}

/// Result of querying one region's nameserver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropagationEntry {
    /// Region label from the region table.
    pub region: String,
    /// Nameserver address as configured (hostname or literal IP).
    pub nameserver: String,
    /// A records returned by that nameserver.
    pub value: RecordValue,
    /// At least one returned value equals the canonical address.
    pub matched: bool,
    /// The query (or the nameserver's own resolution) failed.
    pub failed: bool,
}

impl PropagationEntry {
    /// Classify an answer against the canonical address.
    ///
    /// A `Missing` answer is a failed entry; a `None` canonical address never matches.
    pub fn classify(
        region: impl Into<String>,
        nameserver: impl Into<String>,
        value: RecordValue,
        canonical: Option<&str>,
    ) -> Self {
        if value.is_missing() {
            return Self::failure(region, nameserver);
        }
        let matched = canonical.is_some_and(|c| value.contains(c));
        Self {
            region: region.into(),
            nameserver: nameserver.into(),
            value,
            matched,
            failed: false,
        }
    }

    /// A failed entry: no value, never matched.
    pub fn failure(region: impl Into<String>, nameserver: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            nameserver: nameserver.into(),
            value: RecordValue::Missing,
            matched: false,
            failed: true,
        }
    }
}

/// Per-region results in region-table order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropagationReport(Vec<PropagationEntry>);

impl PropagationReport {
    pub fn new(entries: Vec<PropagationEntry>) -> Self {
        Self(entries)
    }

    pub fn entries(&self) -> &[PropagationEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PropagationEntry> {
        self.0.iter()
    }

    /// Aggregate counts and distinct answers across all regions.
    pub fn summary(&self) -> PropagationSummary {
        let total = self.0.len();
        let matched = self.0.iter().filter(|e| e.matched).count();
        let failed = self.0.iter().filter(|e| e.failed).count();

        let distinct: BTreeSet<Vec<String>> = self
            .0
            .iter()
            .filter(|e| !e.failed)
            .map(|e| {
                let mut values = e.value.values().to_vec();
                values.sort();
                values
            })
            .collect();

        // usize -> f64: region tables hold a handful of entries
        #[allow(clippy::cast_precision_loss)]
        let consistency = if total == 0 {
            0.0
        } else {
            (matched as f64 / total as f64) * 100.0
        };

        // f64 -> f32: a percentage in 0.0..=100.0
        #[allow(clippy::cast_possible_truncation)]
        let consistency_percentage = consistency as f32;

        PropagationSummary {
            total,
            matched,
            mismatched: total.saturating_sub(matched + failed),
            failed,
            consistency_percentage,
            distinct_answers: distinct.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PropagationReport {
    type Item = &'a PropagationEntry;
    type IntoIter = std::slice::Iter<'a, PropagationEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Counts derived from a [`PropagationReport`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropagationSummary {
    /// Number of regions checked.
    pub total: usize,
    /// Regions answering with the canonical address.
    pub matched: usize,
    /// Regions answering with something else.
    pub mismatched: usize,
    /// Regions whose query failed.
    pub failed: usize,
    /// `matched / total` as a percentage (0-100).
    pub consistency_percentage: f32,
    /// Distinct (sorted) answer sets from answering regions.
    pub distinct_answers: Vec<Vec<String>>,
}

/// Everything the presentation layer receives for one domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainCheckResult {
    /// The domain exactly as supplied by the caller.
    pub domain: String,
    /// Canonical records.
    pub records: DomainRecords,
    /// Per-region A-record comparison.
    pub propagation: PropagationReport,
}
