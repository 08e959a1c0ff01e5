//! DNS client abstract Trait

use async_trait::async_trait;

use crate::types::{RecordKind, RecordValue};

/// DNS Client Trait
///
/// The single point where network lookups happen. Every method is total:
/// timeouts, NXDOMAIN, SERVFAIL and unreachable nameservers all come back as
/// [`RecordValue::Missing`], never as an error or a panic.
///
/// Implementations:
/// - [`HickoryDnsClient`](crate::HickoryDnsClient): real lookups via `hickory-resolver`
/// - test stubs returning canned answers
#[async_trait]
pub trait DnsClient: Send + Sync {
    /// Forward-resolve `host` with the system resolver.
    ///
    /// # Returns
    /// * `Resolved` - exactly one address (IPv4 preferred)
    /// * `Missing` - lookup failed
    async fn resolve_address(&self, host: &str) -> RecordValue;

    /// Reverse-resolve `address` (PTR).
    ///
    /// # Returns
    /// * `Resolved` - the first host name only
    /// * `Missing` - not an IP literal, or lookup failed
    async fn reverse_lookup(&self, address: &str) -> RecordValue;

    /// Query `kind` records of `name`.
    ///
    /// # Arguments
    /// * `name` - Owner name to query
    /// * `kind` - Record type
    /// * `nameserver` - Query exactly this nameserver (hostname or IP) instead of
    ///   the system resolver
    async fn resolve_record(
        &self,
        name: &str,
        kind: RecordKind,
        nameserver: Option<&str>,
    ) -> RecordValue;
}
