//! Final scan records.
//!
//! A `ScanReport` is assembled once, after every worker has stopped, and
//! is the only thing presentation and export code ever sees. Assembly is
//! pure computation over the completed outcome map; no I/O happens here.

use crate::scanner::ProbeOutcome;
use crate::types::{PortSpec, Target};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::IpAddr;
use std::time::Duration;

/// The frozen result of one scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// Operator-supplied target string.
    pub target: String,
    /// Address every probe connected to.
    pub resolved_address: IpAddr,
    /// The requested range.
    pub port_spec: PortSpec,
    /// One outcome per scanned port, keyed by port number.
    pub outcomes: BTreeMap<u16, ProbeOutcome>,
    pub open_count: usize,
    pub closed_count: usize,
    pub errored_count: usize,
    /// Ports actually probed; less than the range size only when the
    /// scan was interrupted.
    pub total_ports: usize,
    pub duration_ms: u64,
    pub started_at: DateTime<Utc>,
    /// True when the operator cancelled mid-scan.
    pub interrupted: bool,
}

impl ScanReport {
    /// Count the outcomes and freeze the final record.
    pub fn assemble(
        target: Target,
        port_spec: PortSpec,
        outcomes: BTreeMap<u16, ProbeOutcome>,
        started_at: DateTime<Utc>,
        elapsed: Duration,
        interrupted: bool,
    ) -> Self {
        let mut open_count = 0;
        let mut closed_count = 0;
        let mut errored_count = 0;
        for outcome in outcomes.values() {
            match outcome {
                ProbeOutcome::Open { .. } => open_count += 1,
                ProbeOutcome::Closed => closed_count += 1,
                ProbeOutcome::Errored { .. } => errored_count += 1,
            }
        }

        Self {
            target: target.original,
            resolved_address: target.ip,
            port_spec,
            total_ports: outcomes.len(),
            outcomes,
            open_count,
            closed_count,
            errored_count,
            duration_ms: elapsed.as_millis() as u64,
            started_at,
            interrupted,
        }
    }

    /// Open ports in ascending order with their outcomes.
    pub fn open_ports(&self) -> impl Iterator<Item = (u16, &ProbeOutcome)> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| outcome.is_open())
            .map(|(port, outcome)| (*port, outcome))
    }

    /// One-line summary of the scan.
    pub fn summary(&self) -> String {
        format!(
            "{} ({}) - {} open, {} closed, {} errored [{:.2}s]",
            self.target,
            self.resolved_address,
            self.open_count,
            self.closed_count,
            self.errored_count,
            self.duration_ms as f64 / 1000.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Port;
    use std::net::Ipv4Addr;

    fn target() -> Target {
        Target {
            original: "example.com".to_string(),
            ip: IpAddr::V4(Ipv4Addr::new(93, 184, 216, 34)),
        }
    }

    fn spec(start: u16, end: u16) -> PortSpec {
        PortSpec::new(Port::new(start).unwrap(), Port::new(end).unwrap()).unwrap()
    }

    #[test]
    fn test_assemble_counts_outcomes() {
        let mut outcomes = BTreeMap::new();
        outcomes.insert(80, ProbeOutcome::open_now(Some("nginx".into())));
        outcomes.insert(81, ProbeOutcome::Closed);
        outcomes.insert(82, ProbeOutcome::Closed);
        outcomes.insert(83, ProbeOutcome::errored("weird"));

        let report = ScanReport::assemble(
            target(),
            spec(80, 83),
            outcomes,
            Utc::now(),
            Duration::from_millis(1500),
            false,
        );

        assert_eq!(report.open_count, 1);
        assert_eq!(report.closed_count, 2);
        assert_eq!(report.errored_count, 1);
        assert_eq!(report.total_ports, 4);
        assert_eq!(report.duration_ms, 1500);
        assert!(!report.interrupted);
    }

    #[test]
    fn test_open_ports_iterates_opens_only() {
        let mut outcomes = BTreeMap::new();
        outcomes.insert(443, ProbeOutcome::open_now(None));
        outcomes.insert(444, ProbeOutcome::Closed);
        outcomes.insert(445, ProbeOutcome::open_now(None));

        let report = ScanReport::assemble(
            target(),
            spec(443, 445),
            outcomes,
            Utc::now(),
            Duration::from_secs(1),
            false,
        );

        let opens: Vec<u16> = report.open_ports().map(|(port, _)| port).collect();
        assert_eq!(opens, vec![443, 445]);
    }

    #[test]
    fn test_summary_format() {
        let report = ScanReport::assemble(
            target(),
            spec(1, 10),
            BTreeMap::new(),
            Utc::now(),
            Duration::from_millis(2500),
            false,
        );
        assert_eq!(
            report.summary(),
            "example.com (93.184.216.34) - 0 open, 0 closed, 0 errored [2.50s]"
        );
    }

    #[test]
    fn test_serialization_roundtrip() {
        let mut outcomes = BTreeMap::new();
        outcomes.insert(22, ProbeOutcome::open_now(Some("OpenSSH".into())));

        let report = ScanReport::assemble(
            target(),
            spec(22, 22),
            outcomes,
            Utc::now(),
            Duration::from_secs(1),
            false,
        );

        let json = serde_json::to_string(&report).unwrap();
        let parsed: ScanReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.target, report.target);
        assert_eq!(parsed.open_count, 1);
        assert!(parsed.outcomes[&22].is_open());
    }
}
