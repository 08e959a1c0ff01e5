//! Service façade running a full domain check.

mod propagation;
mod records;
mod resolver;

use std::sync::Arc;

pub use resolver::HickoryDnsClient;

use crate::config::{CheckerOptions, RegionTable};
use crate::traits::DnsClient;
use crate::types::{DomainCheckResult, DomainRecords, PropagationReport};

/// Combine canonical records and the propagation report into one result.
pub fn assemble(
    domain: impl Into<String>,
    records: DomainRecords,
    propagation: PropagationReport,
) -> DomainCheckResult {
    DomainCheckResult {
        domain: domain.into(),
        records,
        propagation,
    }
}

/// Entry point for propagation checks.
///
/// Owns the DNS client, the region table and the query options; cheap to
/// share behind an `Arc` and never mutated after construction.
///
/// ```rust,no_run
/// use dns_propagation_core::PropagationService;
/// # async fn demo() {
/// let service = PropagationService::with_defaults();
/// let result = service.check_domain("example.com").await;
/// println!("{}", result.propagation.summary().matched);
/// # }
/// ```
pub struct PropagationService {
    client: Arc<dyn DnsClient>,
    regions: RegionTable,
    options: CheckerOptions,
}

impl PropagationService {
    pub fn new(client: Arc<dyn DnsClient>, regions: RegionTable, options: CheckerOptions) -> Self {
        Self {
            client,
            regions,
            options,
        }
    }

    /// Real resolver, reference region table, default timeout.
    pub fn with_defaults() -> Self {
        Self::with_config(RegionTable::reference(), CheckerOptions::default())
    }

    /// Real resolver with the given region table and options.
    pub fn with_config(regions: RegionTable, options: CheckerOptions) -> Self {
        Self::new(Arc::new(HickoryDnsClient::new(options)), regions, options)
    }

    pub fn regions(&self) -> &RegionTable {
        &self.regions
    }

    pub fn options(&self) -> &CheckerOptions {
        &self.options
    }

    /// Canonical records of `domain` from the system resolver.
    pub async fn aggregate(&self, domain: &str) -> DomainRecords {
        records::aggregate(self.client.as_ref(), domain).await
    }

    /// A records of `domain` from every configured region.
    pub async fn check_propagation(
        &self,
        domain: &str,
        canonical: Option<&str>,
    ) -> PropagationReport {
        propagation::check_propagation(
            self.client.as_ref(),
            domain,
            canonical,
            &self.regions,
            &self.options,
        )
        .await
    }

    /// Full check: aggregate, then compare every region against the canonical address.
    ///
    /// Never fails; unobtainable data shows up as `Missing` values and failed entries.
    pub async fn check_domain(&self, domain: &str) -> DomainCheckResult {
        log::info!("Checking {domain} against {} regions", self.regions.len());

        let records = self.aggregate(domain).await;
        let report = self
            .check_propagation(domain, records.canonical_address())
            .await;

        let summary = report.summary();
        log::info!(
            "{domain}: {}/{} regions matched, {} failed",
            summary.matched,
            summary.total,
            summary.failed
        );

        assemble(domain, records, report)
    }
}

impl Default for PropagationService {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::{example_com_client, StubDnsClient};
    use crate::types::{RecordKind, RecordValue};

    fn service(client: StubDnsClient, regions: RegionTable) -> PropagationService {
        PropagationService::new(Arc::new(client), regions, CheckerOptions::default())
    }

    #[test]
    fn test_assemble_keeps_domain_verbatim() {
        let records = DomainRecords {
            address: RecordValue::Missing,
            ptr: RecordValue::Missing,
            nameservers: RecordValue::Missing,
            primary_a: RecordValue::Missing,
            primary_mx: RecordValue::Missing,
            primary_txt: RecordValue::Missing,
            www_a: RecordValue::Missing,
            mail_a: RecordValue::Missing,
        };
        let result = assemble("Example.COM", records.clone(), PropagationReport::default());
        assert_eq!(result.domain, "Example.COM");
        assert_eq!(result.records, records);
        assert!(result.propagation.is_empty());
    }

    #[tokio::test]
    async fn test_check_domain_uses_canonical_address() {
        let regions = RegionTable::new([("One", "10.0.0.1"), ("Two", "10.0.0.2")]).unwrap();
        let client = example_com_client()
            .with_record("example.com", RecordKind::A, Some("10.0.0.1"), &["93.184.216.34"])
            .with_record("example.com", RecordKind::A, Some("10.0.0.2"), &["198.51.100.7"]);
        let result = service(client, regions).check_domain("example.com").await;

        assert_eq!(result.domain, "example.com");
        assert_eq!(result.records.address, RecordValue::single("93.184.216.34"));
        let entries = result.propagation.entries();
        assert!(entries[0].matched);
        assert!(!entries[1].matched);
        assert!(!entries[1].failed);
    }

    #[tokio::test]
    async fn test_check_domain_invalid_domain_never_fails() {
        let result = service(StubDnsClient::new(), RegionTable::reference())
            .check_domain("not a domain!")
            .await;

        assert!(result.records.address.is_missing());
        assert_eq!(result.propagation.len(), 9);
        assert!(result.propagation.iter().all(|e| e.failed));
    }

    #[test]
    fn test_service_accessors() {
        let svc = service(StubDnsClient::new(), RegionTable::reference());
        assert_eq!(svc.regions().len(), 9);
        assert_eq!(svc.options(), &CheckerOptions::default());
    }
}
