//! DNS Propagation Core Library
//!
//! Checks how a domain resolves from several public resolvers around the world:
//! - Record aggregation (address, PTR, NS, A, MX, TXT, `www.`/`mail.` A)
//! - Per-region A-record comparison against the canonical address
//! - A presentation-agnostic [`DomainCheckResult`]
//!
//! Lookups go through the [`DnsClient`] trait; every lookup failure turns into
//! [`RecordValue::Missing`] or a failed propagation entry, so a check always
//! produces a complete result.

pub mod config;
pub mod error;
pub mod services;
pub mod traits;
pub mod types;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use config::{CheckerOptions, Region, RegionTable, DEFAULT_QUERY_TIMEOUT_SECS};
pub use error::{CheckError, CheckResult, LookupError};
pub use services::{assemble, HickoryDnsClient, PropagationService};
pub use traits::DnsClient;
pub use types::{
    DomainCheckResult, DomainRecords, PropagationEntry, PropagationReport, PropagationSummary,
    RecordKind, RecordValue,
};
