//! JSON export of scan reports.
//!
//! The export document carries full detail for open ports plus summary
//! counts; closed and errored ports fold into counts so a full-range scan
//! stays small on disk.

use crate::report::ScanReport;
use crate::scanner::ProbeOutcome;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::net::IpAddr;
use std::path::Path;

#[derive(Debug, Serialize)]
struct ExportDocument<'a> {
    target: &'a str,
    resolved_address: IpAddr,
    start_port: u16,
    end_port: u16,
    open_ports: BTreeMap<u16, &'a ProbeOutcome>,
    open_count: usize,
    closed_count: usize,
    errored_count: usize,
    total_ports_scanned: usize,
    duration_ms: u64,
    started_at: DateTime<Utc>,
    interrupted: bool,
}

impl<'a> ExportDocument<'a> {
    fn from_report(report: &'a ScanReport) -> Self {
        Self {
            target: &report.target,
            resolved_address: report.resolved_address,
            start_port: report.port_spec.start().as_u16(),
            end_port: report.port_spec.end().as_u16(),
            open_ports: report.open_ports().collect(),
            open_count: report.open_count,
            closed_count: report.closed_count,
            errored_count: report.errored_count,
            total_ports_scanned: report.total_ports,
            duration_ms: report.duration_ms,
            started_at: report.started_at,
            interrupted: report.interrupted,
        }
    }
}

/// Write `report` to `path` as pretty-printed JSON.
///
/// Parent directories are created as needed. A failure here never undoes
/// the scan; callers surface it as a warning.
pub fn export_json(report: &ScanReport, path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let document = ExportDocument::from_report(report);
    let json = serde_json::to_string_pretty(&document)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    fs::write(path, json)
}
