//! Scan target resolution.
//!
//! A `Target` pairs the operator-supplied host string with the single
//! address every probe connects to. Hostnames resolve through the system
//! resolver once, before any port is touched; a resolution failure is
//! terminal for the whole scan.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};
use trust_dns_resolver::TokioAsyncResolver;

/// A scan target that has been resolved to an IP address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    /// The original input (hostname or IP string).
    pub original: String,
    /// The resolved IP address.
    pub ip: IpAddr,
}

/// Error type for target resolution.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TargetError {
    #[error("failed to resolve host '{host}': {reason}")]
    ResolutionFailed { host: String, reason: String },
    #[error("no addresses found for host '{0}'")]
    NoAddresses(String),
}

impl Target {
    /// Resolve a hostname or literal IP to a connectable target.
    ///
    /// Literal addresses short-circuit without a DNS query. Hostnames take
    /// the first address the resolver returns. No retries; DNS failure is
    /// a terminal condition for a scan.
    pub async fn resolve(host: &str) -> Result<Self, TargetError> {
        let host = host.trim();

        if let Ok(ip) = host.parse::<IpAddr>() {
            return Ok(Self {
                original: host.to_string(),
                ip,
            });
        }

        let resolver =
            TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default());

        let response = resolver
            .lookup_ip(host)
            .await
            .map_err(|e| TargetError::ResolutionFailed {
                host: host.to_string(),
                reason: e.to_string(),
            })?;

        let ip = response
            .iter()
            .next()
            .ok_or_else(|| TargetError::NoAddresses(host.to_string()))?;

        Ok(Self {
            original: host.to_string(),
            ip,
        })
    }

    /// Whether the original input was already a literal address.
    pub fn is_literal(&self) -> bool {
        self.original == self.ip.to_string()
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_literal() {
            write!(f, "{}", self.ip)
        } else {
            write!(f, "{} ({})", self.original, self.ip)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[tokio::test]
    async fn test_resolve_literal_v4() {
        let target = Target::resolve("127.0.0.1").await.unwrap();
        assert_eq!(target.ip, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert!(target.is_literal());
    }

    #[tokio::test]
    async fn test_resolve_literal_v6() {
        let target = Target::resolve("::1").await.unwrap();
        assert_eq!(target.ip, IpAddr::V6(Ipv6Addr::LOCALHOST));
        assert!(target.is_literal());
    }

    #[tokio::test]
    async fn test_resolve_trims_input() {
        let target = Target::resolve("  10.0.0.1  ").await.unwrap();
        assert_eq!(target.original, "10.0.0.1");
    }

    #[test]
    fn test_display_literal() {
        let target = Target {
            original: "127.0.0.1".to_string(),
            ip: IpAddr::V4(Ipv4Addr::LOCALHOST),
        };
        assert_eq!(target.to_string(), "127.0.0.1");
    }

    #[test]
    fn test_display_hostname() {
        let target = Target {
            original: "localhost".to_string(),
            ip: IpAddr::V4(Ipv4Addr::LOCALHOST),
        };
        assert_eq!(target.to_string(), "localhost (127.0.0.1)");
    }
}
