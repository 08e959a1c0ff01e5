//! Canonical record aggregation for one domain.

use crate::traits::DnsClient;
use crate::types::{DomainRecords, RecordKind, RecordValue};

/// Collect the canonical record set of `domain` via the system resolver.
///
/// Every field is queried on its own; a failure only ever turns that field
/// into [`RecordValue::Missing`].
pub async fn aggregate<C: DnsClient + ?Sized>(client: &C, domain: &str) -> DomainRecords {
    let www = format!("www.{domain}");
    let mail = format!("mail.{domain}");

    // PTR depends on the address; everything else is independent
    let address_and_ptr = async {
        let address = client.resolve_address(domain).await;
        let ptr = match address.first() {
            Some(ip) => client.reverse_lookup(ip).await,
            None => RecordValue::Missing,
        };
        (address, ptr)
    };

    let ((address, ptr), nameservers, primary_a, primary_mx, primary_txt, www_a, mail_a) = futures::join!(
        address_and_ptr,
        client.resolve_record(domain, RecordKind::Ns, None),
        client.resolve_record(domain, RecordKind::A, None),
        client.resolve_record(domain, RecordKind::Mx, None),
        client.resolve_record(domain, RecordKind::Txt, None),
        client.resolve_record(&www, RecordKind::A, None),
        client.resolve_record(&mail, RecordKind::A, None),
    );

    DomainRecords {
        address,
        ptr,
        nameservers,
        primary_a,
        primary_mx,
        primary_txt,
        www_a,
        mail_a,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::{example_com_client, StubDnsClient};

    #[tokio::test]
    async fn test_aggregate_all_fields() {
        let client = example_com_client();
        let records = aggregate(&client, "example.com").await;

        assert_eq!(records.address, RecordValue::single("93.184.216.34"));
        assert_eq!(records.ptr, RecordValue::single("example.com"));
        assert_eq!(
            records.nameservers.values(),
            ["a.iana-servers.net", "b.iana-servers.net"]
        );
        assert_eq!(records.primary_a, RecordValue::single("93.184.216.34"));
        assert_eq!(records.primary_mx, RecordValue::single("10 mail.example.com"));
        assert_eq!(records.primary_txt, RecordValue::single("v=spf1 mx a -all"));
        assert_eq!(records.www_a, RecordValue::single("93.184.216.34"));
        assert_eq!(records.mail_a, RecordValue::single("93.184.216.34"));
    }

    #[tokio::test]
    async fn test_aggregate_unknown_domain_all_missing() {
        let client = StubDnsClient::new();
        let records = aggregate(&client, "nonexistent.invalid").await;

        for value in [
            &records.address,
            &records.ptr,
            &records.nameservers,
            &records.primary_a,
            &records.primary_mx,
            &records.primary_txt,
            &records.www_a,
            &records.mail_a,
        ] {
            assert!(value.is_missing());
        }
    }

    #[tokio::test]
    async fn test_aggregate_skips_ptr_without_address() {
        let client = StubDnsClient::new()
            .with_ptr("93.184.216.34", "example.com")
            .with_record("example.com", RecordKind::Mx, None, &["10 mail.example.com"]);
        let records = aggregate(&client, "example.com").await;

        assert!(records.address.is_missing());
        assert!(records.ptr.is_missing());
        assert_eq!(records.primary_mx, RecordValue::single("10 mail.example.com"));
        assert!(!client.calls().await.iter().any(|c| c.starts_with("ptr")));
    }

    #[tokio::test]
    async fn test_aggregate_ptr_failure_is_isolated() {
        let client = StubDnsClient::new()
            .with_address("example.com", "93.184.216.34")
            .with_record("example.com", RecordKind::A, None, &["93.184.216.34"]);
        let records = aggregate(&client, "example.com").await;

        assert_eq!(records.address, RecordValue::single("93.184.216.34"));
        assert!(records.ptr.is_missing());
        assert_eq!(records.primary_a, RecordValue::single("93.184.216.34"));
        assert!(client
            .calls()
            .await
            .contains(&"ptr 93.184.216.34".to_string()));
    }

    #[tokio::test]
    async fn test_aggregate_queries_subdomains() {
        let client = StubDnsClient::new();
        let _ = aggregate(&client, "example.org").await;
        let calls = client.calls().await;

        assert!(calls.contains(&"record A www.example.org".to_string()));
        assert!(calls.contains(&"record A mail.example.org".to_string()));
        assert_eq!(calls.len(), 7);
    }
}
