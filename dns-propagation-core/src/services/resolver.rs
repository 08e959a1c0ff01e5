//! Hickory-backed DNS client and resolver construction helpers.

use std::net::IpAddr;

use async_trait::async_trait;
use hickory_resolver::{
    config::{NameServerConfigGroup, ResolverConfig, ResolverOpts},
    name_server::TokioConnectionProvider,
    proto::{
        op::ResponseCode,
        rr::{RData, RecordType},
        ProtoErrorKind,
    },
    ResolveError, TokioResolver,
};
use tokio::time::timeout;

use crate::config::CheckerOptions;
use crate::error::LookupError;
use crate::traits::DnsClient;
use crate::types::{RecordKind, RecordValue};

/// [`DnsClient`] performing real lookups.
///
/// Holds one system resolver for default queries; every nameserver override
/// gets a freshly built resolver pinned to that server.
pub struct HickoryDnsClient {
    system: TokioResolver,
    options: CheckerOptions,
}

impl HickoryDnsClient {
    pub fn new(options: CheckerOptions) -> Self {
        log::debug!(
            "DNS client ready (system nameservers: {}, query timeout: {}s)",
            system_dns_label(),
            options.query_timeout.as_secs()
        );
        Self {
            system: build_system_resolver(&options),
            options,
        }
    }

    async fn lookup_address(&self, host: &str) -> Result<Vec<String>, LookupError> {
        // Literal addresses resolve to themselves.
        if let Ok(ip) = host.parse::<IpAddr>() {
            return Ok(vec![ip.to_string()]);
        }

        let response = timeout(self.options.query_timeout, self.system.lookup_ip(host))
            .await
            .map_err(|_| self.timed_out())?
            .map_err(|e| classify_resolve_error(&e))?;

        let ips: Vec<IpAddr> = response.iter().collect();
        let chosen = ips
            .iter()
            .find(|ip| ip.is_ipv4())
            .or_else(|| ips.first())
            .ok_or_else(|| LookupError::NameResolution(format!("no addresses for {host}")))?;
        Ok(vec![chosen.to_string()])
    }

    async fn lookup_reverse(&self, address: &str) -> Result<Vec<String>, LookupError> {
        let ip: IpAddr = address
            .parse()
            .map_err(|_| LookupError::Configuration(format!("not an IP address: {address}")))?;

        let response = timeout(self.options.query_timeout, self.system.reverse_lookup(ip))
            .await
            .map_err(|_| self.timed_out())?
            .map_err(|e| classify_resolve_error(&e))?;

        Ok(response
            .iter()
            .next()
            .map(|ptr| strip_root(&ptr.to_string()))
            .into_iter()
            .collect())
    }

    async fn lookup_record(
        &self,
        name: &str,
        kind: RecordKind,
        nameserver: Option<&str>,
    ) -> Result<Vec<String>, LookupError> {
        let pinned = match nameserver {
            Some(ns) => Some(build_resolver_for_ns(self.nameserver_ip(ns).await?, &self.options)),
            None => None,
        };
        let resolver = pinned.as_ref().unwrap_or(&self.system);

        let lookup = timeout(
            self.options.query_timeout,
            resolver.lookup(name, record_type(kind)),
        )
        .await
        .map_err(|_| self.timed_out())?
        .map_err(|e| classify_resolve_error(&e))?;

        Ok(lookup
            .iter()
            .filter_map(|rdata| render_rdata(kind, rdata))
            .collect())
    }

    /// Turn a configured nameserver (hostname or IP) into a literal address.
    async fn nameserver_ip(&self, nameserver: &str) -> Result<IpAddr, LookupError> {
        if let Ok(ip) = nameserver.parse::<IpAddr>() {
            return Ok(ip);
        }
        self.lookup_address(nameserver)
            .await
            .ok()
            .and_then(|ips| ips.first().and_then(|ip| ip.parse().ok()))
            .ok_or_else(|| {
                LookupError::Configuration(format!("cannot resolve nameserver {nameserver}"))
            })
    }

    fn timed_out(&self) -> LookupError {
        LookupError::Transport(format!(
            "query timed out after {}s",
            self.options.query_timeout.as_secs()
        ))
    }
}

impl Default for HickoryDnsClient {
    fn default() -> Self {
        Self::new(CheckerOptions::default())
    }
}

#[async_trait]
impl DnsClient for HickoryDnsClient {
    async fn resolve_address(&self, host: &str) -> RecordValue {
        settle(&format!("address of {host}"), self.lookup_address(host).await)
    }

    async fn reverse_lookup(&self, address: &str) -> RecordValue {
        settle(&format!("PTR of {address}"), self.lookup_reverse(address).await)
    }

    async fn resolve_record(
        &self,
        name: &str,
        kind: RecordKind,
        nameserver: Option<&str>,
    ) -> RecordValue {
        let what = match nameserver {
            Some(ns) => format!("{kind} of {name} @{ns}"),
            None => format!("{kind} of {name}"),
        };
        settle(&what, self.lookup_record(name, kind, nameserver).await)
    }
}

/// Collapse a lookup outcome into a [`RecordValue`], logging failures.
fn settle(what: &str, result: Result<Vec<String>, LookupError>) -> RecordValue {
    match result {
        Ok(values) => {
            log::debug!("{what}: {} value(s)", values.len());
            RecordValue::from_values(values)
        }
        Err(e) if e.is_no_data() => {
            log::debug!("{what}: {e}");
            RecordValue::Missing
        }
        Err(e) => {
            log::warn!("{what}: {e}");
            RecordValue::Missing
        }
    }
}

fn record_type(kind: RecordKind) -> RecordType {
    match kind {
        RecordKind::A => RecordType::A,
        RecordKind::Ns => RecordType::NS,
        RecordKind::Mx => RecordType::MX,
        RecordKind::Txt => RecordType::TXT,
    }
}

/// Render one answer record as display text, skipping records of other types
/// (e.g. CNAMEs in the answer chain).
fn render_rdata(kind: RecordKind, rdata: &RData) -> Option<String> {
    match (kind, rdata) {
        (RecordKind::A, RData::A(a)) => Some(a.to_string()),
        (RecordKind::Ns, RData::NS(ns)) => Some(strip_root(&ns.to_string())),
        (RecordKind::Mx, RData::MX(mx)) => Some(format!(
            "{} {}",
            mx.preference(),
            strip_root(&mx.exchange().to_string())
        )),
        (RecordKind::Txt, RData::TXT(txt)) => Some(
            txt.iter()
                .map(|data| String::from_utf8_lossy(data).to_string())
                .collect::<String>(),
        ),
        _ => None,
    }
}

/// Drop the trailing root label dot of a host name.
fn strip_root(name: &str) -> String {
    name.strip_suffix('.').unwrap_or(name).to_string()
}

/// Map a resolver error onto the lookup failure taxonomy.
///
/// Negative answers are told apart by their response code: NXDOMAIN and
/// NOERROR/NODATA are "no data", SERVFAIL is a server fault, REFUSED is
/// treated as the server being unreachable for us.
fn classify_resolve_error(e: &ResolveError) -> LookupError {
    let msg = e.to_string();
    let Some(proto) = e.proto() else {
        return LookupError::ServerFailure(msg);
    };
    match proto.kind() {
        ProtoErrorKind::NoRecordsFound { response_code, .. } => match *response_code {
            ResponseCode::NXDomain | ResponseCode::NoError => LookupError::NameResolution(msg),
            ResponseCode::Refused => LookupError::Transport(msg),
            _ => LookupError::ServerFailure(msg),
        },
        ProtoErrorKind::Timeout | ProtoErrorKind::Io(_) => LookupError::Transport(msg),
        _ => LookupError::ServerFailure(msg),
    }
}

/// Options shared by every resolver: one attempt, per-query timeout, no
/// search-domain expansion, no response cache.
fn resolver_opts(options: &CheckerOptions) -> ResolverOpts {
    let mut opts = ResolverOpts::default();
    opts.timeout = options.query_timeout;
    opts.attempts = 1;
    opts.ndots = 0;
    opts.cache_size = 0;
    opts
}

/// Nameservers the system resolver will use, for the startup log line.
fn system_dns_label() -> String {
    #[cfg(any(unix, target_os = "windows"))]
    let config = hickory_resolver::system_conf::read_system_conf()
        .map_or_else(|_| ResolverConfig::default(), |(config, _)| config);
    #[cfg(not(any(unix, target_os = "windows")))]
    let config = ResolverConfig::default();

    let ips = dedup_ips(&config);
    if ips.is_empty() {
        "Default".to_string()
    } else {
        ips.join(", ")
    }
}

/// Nameserver IPs of `config`, first occurrence order, no repeats.
fn dedup_ips(config: &ResolverConfig) -> Vec<String> {
    config
        .name_servers()
        .iter()
        .map(|ns| ns.socket_addr.ip().to_string())
        .fold(Vec::new(), |mut ips, ip| {
            if !ips.contains(&ip) {
                ips.push(ip);
            }
            ips
        })
}

/// Build a resolver that queries exactly `ns_ip` on port 53.
pub(crate) fn build_resolver_for_ns(ns_ip: IpAddr, options: &CheckerOptions) -> TokioResolver {
    let config = ResolverConfig::from_parts(
        None,
        vec![],
        NameServerConfigGroup::from_ips_clear(&[ns_ip], 53, true),
    );
    TokioResolver::builder_with_config(config, TokioConnectionProvider::default())
        .with_options(resolver_opts(options))
        .build()
}

/// Build a resolver using the host system DNS configuration (with fallback).
fn build_system_resolver(options: &CheckerOptions) -> TokioResolver {
    #[cfg(any(unix, target_os = "windows"))]
    {
        match TokioResolver::builder_tokio() {
            Ok(mut builder) => {
                *builder.options_mut() = resolver_opts(options);
                return builder.build();
            }
            Err(e) => {
                log::warn!(
                    "Failed to load system DNS configuration, falling back to defaults: {e}"
                );
            }
        }
    }

    TokioResolver::builder_with_config(
        ResolverConfig::default(),
        TokioConnectionProvider::default(),
    )
    .with_options(resolver_opts(options))
    .build()
}
