//! Resolver abstraction trait definition

mod dns_client;

pub use dns_client::DnsClient;
