//! Unified error type definitions

use serde::Serialize;
use thiserror::Error;

/// Configuration and validation errors raised while building a checker.
///
/// Lookups themselves never surface an error to callers; see [`LookupError`].
#[derive(Error, Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "code", content = "details")]
pub enum CheckError {
    /// Validation error (region table, options)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Serialization error (malformed configuration document)
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for CheckError {
    fn from(e: serde_json::Error) -> Self {
        Self::SerializationError(e.to_string())
    }
}

/// Check `Result` type alias
pub type CheckResult<T> = std::result::Result<T, CheckError>;

/// Why a single DNS query produced no usable data.
///
/// Every variant collapses to [`RecordValue::Missing`](crate::RecordValue::Missing)
/// (or a failed propagation entry) at the [`DnsClient`](crate::DnsClient) boundary.
/// The distinction only feeds logging.
#[derive(Error, Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "code", content = "details")]
pub enum LookupError {
    /// NXDOMAIN, no records of the requested type, or an empty answer.
    #[error("Name resolution failure: {0}")]
    NameResolution(String),

    /// Timeout, refused connection or unreachable nameserver.
    #[error("Transport failure: {0}")]
    Transport(String),

    /// SERVFAIL or a malformed response.
    #[error("Server failure: {0}")]
    ServerFailure(String),

    /// The nameserver to query could not itself be resolved or parsed.
    #[error("Configuration failure: {0}")]
    Configuration(String),
}

impl LookupError {
    /// Whether this is an expected "no data" outcome rather than a fault.
    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NameResolution(_))
    }
}
