//! Single-port probing.
//!
//! One TCP connect per port, bounded by the scan timeout, followed by an
//! optional banner read. Failures are classified into an outcome, never
//! propagated: a port that cannot be reached is data, not an error.

use crate::banner::read_banner;
use crate::types::Port;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Longest error message recorded for an anomalous probe failure.
const MAX_ERROR_LEN: usize = 30;

/// What a single probe learned about one port.
///
/// Exactly one outcome is recorded per port per scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ProbeOutcome {
    /// The port accepted a TCP connection.
    Open {
        /// Text the service volunteered right after accepting, if any.
        #[serde(skip_serializing_if = "Option::is_none")]
        banner: Option<String>,
        observed_at: DateTime<Utc>,
    },
    /// The connection was refused, timed out, or the host was unreachable.
    Closed,
    /// The connect failed in a way that fits neither bucket.
    Errored { message: String },
}

impl ProbeOutcome {
    /// An open outcome stamped with the current wall-clock time.
    pub fn open_now(banner: Option<String>) -> Self {
        Self::Open {
            banner,
            observed_at: Utc::now(),
        }
    }

    /// An errored outcome; the message is truncated to keep reports tidy.
    pub fn errored(message: impl Into<String>) -> Self {
        let message: String = message.into().chars().take(MAX_ERROR_LEN).collect();
        Self::Errored { message }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }

    /// The stored banner, if this outcome is open and one was captured.
    pub fn banner(&self) -> Option<&str> {
        match self {
            Self::Open { banner, .. } => banner.as_deref(),
            _ => None,
        }
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open { .. } => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
            Self::Errored { .. } => write!(f, "error"),
        }
    }
}

/// The probing seam.
///
/// The engine only sees this trait, so tests can swap in a scripted
/// prober and exercise the worker pool without touching the network.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Probe a single port. Must not panic; every failure mode is an
    /// outcome.
    async fn probe(&self, port: Port) -> ProbeOutcome;
}

/// Full TCP connect prober.
///
/// Completes the three-way handshake through the OS socket API, so no
/// elevated privileges are required.
pub struct TcpProber {
    addr: IpAddr,
    timeout: Duration,
    grab_banners: bool,
}

impl TcpProber {
    pub fn new(addr: IpAddr, timeout: Duration, grab_banners: bool) -> Self {
        Self {
            addr,
            timeout,
            grab_banners,
        }
    }
}

#[async_trait]
impl Probe for TcpProber {
    async fn probe(&self, port: Port) -> ProbeOutcome {
        let sockaddr = SocketAddr::new(self.addr, port.as_u16());

        match timeout(self.timeout, TcpStream::connect(sockaddr)).await {
            Ok(Ok(mut stream)) => {
                let banner = if self.grab_banners {
                    read_banner(&mut stream, self.timeout).await
                } else {
                    None
                };
                // Stream drops here, closing the socket.
                ProbeOutcome::open_now(banner)
            }
            Ok(Err(e)) => classify(port, &e),
            Err(_) => {
                tracing::debug!(port = port.as_u16(), "connect timed out");
                ProbeOutcome::Closed
            }
        }
    }
}

/// Map a connect error onto an outcome.
///
/// Refusals, timeouts, and unreachable hosts all read as closed; anything
/// stranger is recorded verbatim (truncated) so it surfaces in the report
/// without stopping the scan.
fn classify(port: Port, err: &io::Error) -> ProbeOutcome {
    match err.kind() {
        io::ErrorKind::ConnectionRefused => ProbeOutcome::Closed,
        io::ErrorKind::TimedOut => {
            tracing::debug!(port = port.as_u16(), "connect timed out at socket level");
            ProbeOutcome::Closed
        }
        _ => {
            let text = err.to_string();
            if text.to_lowercase().contains("unreachable") {
                tracing::debug!(port = port.as_u16(), error = %text, "target unreachable");
                ProbeOutcome::Closed
            } else {
                tracing::debug!(port = port.as_u16(), error = %text, "anomalous connect error");
                ProbeOutcome::errored(text)
            }
        }
    }
}
