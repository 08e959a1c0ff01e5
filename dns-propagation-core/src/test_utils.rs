//! Test helpers: a canned-answer [`DnsClient`] and fixture factories.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::traits::DnsClient;
use crate::types::{RecordKind, RecordValue};

// ===== StubDnsClient =====

/// Key of a canned record answer: (owner name, kind, pinned nameserver).
type RecordKey = (String, RecordKind, Option<String>);

/// Answers from in-memory tables; anything not configured is `Missing`.
#[derive(Default)]
pub struct StubDnsClient {
    addresses: HashMap<String, String>,
    ptrs: HashMap<String, String>,
    records: HashMap<RecordKey, Vec<String>>,
    /// Nameservers whose queries never complete.
    hanging: HashSet<String>,
    calls: RwLock<Vec<String>>,
}

impl StubDnsClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_address(mut self, host: &str, ip: &str) -> Self {
        self.addresses.insert(host.to_string(), ip.to_string());
        self
    }

    pub fn with_ptr(mut self, ip: &str, host: &str) -> Self {
        self.ptrs.insert(ip.to_string(), host.to_string());
        self
    }

    pub fn with_record(
        mut self,
        name: &str,
        kind: RecordKind,
        nameserver: Option<&str>,
        values: &[&str],
    ) -> Self {
        self.records.insert(
            (name.to_string(), kind, nameserver.map(str::to_string)),
            values.iter().map(|v| (*v).to_string()).collect(),
        );
        self
    }

    pub fn with_hanging_nameserver(mut self, nameserver: &str) -> Self {
        self.hanging.insert(nameserver.to_string());
        self
    }

    /// Every call made so far, formatted `"<method> <args>"`.
    pub async fn calls(&self) -> Vec<String> {
        self.calls.read().await.clone()
    }

    async fn record_call(&self, call: String) {
        self.calls.write().await.push(call);
    }
}

#[async_trait]
impl DnsClient for StubDnsClient {
    async fn resolve_address(&self, host: &str) -> RecordValue {
        self.record_call(format!("address {host}")).await;
        if self.hanging.contains(host) {
            std::future::pending::<()>().await;
        }
        self.addresses
            .get(host)
            .map_or(RecordValue::Missing, RecordValue::single)
    }

    async fn reverse_lookup(&self, address: &str) -> RecordValue {
        self.record_call(format!("ptr {address}")).await;
        self.ptrs
            .get(address)
            .map_or(RecordValue::Missing, RecordValue::single)
    }

    async fn resolve_record(
        &self,
        name: &str,
        kind: RecordKind,
        nameserver: Option<&str>,
    ) -> RecordValue {
        match nameserver {
            Some(ns) => self.record_call(format!("record {kind} {name} @{ns}")).await,
            None => self.record_call(format!("record {kind} {name}")).await,
        }
        if nameserver.is_some_and(|ns| self.hanging.contains(ns)) {
            std::future::pending::<()>().await;
        }
        self.records
            .get(&(name.to_string(), kind, nameserver.map(str::to_string)))
            .map_or(RecordValue::Missing, |values| {
                RecordValue::from_values(values.iter().cloned())
            })
    }
}

// ===== Factories =====

/// `example.com` fully configured for the system resolver.
pub fn example_com_client() -> StubDnsClient {
    StubDnsClient::new()
        .with_address("example.com", "93.184.216.34")
        .with_ptr("93.184.216.34", "example.com")
        .with_record(
            "example.com",
            RecordKind::Ns,
            None,
            &["a.iana-servers.net", "b.iana-servers.net"],
        )
        .with_record("example.com", RecordKind::A, None, &["93.184.216.34"])
        .with_record("example.com", RecordKind::Mx, None, &["10 mail.example.com"])
        .with_record("example.com", RecordKind::Txt, None, &["v=spf1 mx a -all"])
        .with_record("www.example.com", RecordKind::A, None, &["93.184.216.34"])
        .with_record("mail.example.com", RecordKind::A, None, &["93.184.216.34"])
}
