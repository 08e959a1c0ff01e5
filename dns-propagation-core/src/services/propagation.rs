//! Per-region A-record propagation check.

use std::net::IpAddr;

use futures::future::join_all;
use tokio::time::timeout;

use crate::config::{CheckerOptions, Region, RegionTable};
use crate::traits::DnsClient;
use crate::types::{PropagationEntry, PropagationReport, RecordKind, RecordValue};

/// Query the A record of `domain` through every region's nameserver.
///
/// Regions are queried concurrently; the report keeps table order and has
/// exactly one entry per region.
pub async fn check_propagation<C: DnsClient + ?Sized>(
    client: &C,
    domain: &str,
    canonical: Option<&str>,
    regions: &RegionTable,
    options: &CheckerOptions,
) -> PropagationReport {
    // Nameserver resolution and the A query each get their own budget
    let slot = options.query_timeout.saturating_mul(2);

    let futures: Vec<_> = regions
        .iter()
        .map(|region| async move {
            match timeout(slot, query_region(client, domain, region)).await {
                Ok(value) => {
                    PropagationEntry::classify(&region.region, &region.nameserver, value, canonical)
                }
                Err(_) => {
                    log::warn!(
                        "{} ({}): no answer within {}s",
                        region.region,
                        region.nameserver,
                        slot.as_secs()
                    );
                    PropagationEntry::failure(&region.region, &region.nameserver)
                }
            }
        })
        .collect();

    PropagationReport::new(join_all(futures).await)
}

/// A records of `domain` as seen by one region's nameserver.
async fn query_region<C: DnsClient + ?Sized>(
    client: &C,
    domain: &str,
    region: &Region,
) -> RecordValue {
    let nameserver_ip = if region.nameserver.parse::<IpAddr>().is_ok() {
        region.nameserver.clone()
    } else {
        match client.resolve_address(&region.nameserver).await.first() {
            Some(ip) => ip.to_string(),
            None => {
                log::warn!(
                    "{}: cannot resolve nameserver {}",
                    region.region,
                    region.nameserver
                );
                return RecordValue::Missing;
            }
        }
    };

    client
        .resolve_record(domain, RecordKind::A, Some(&nameserver_ip))
        .await
}
