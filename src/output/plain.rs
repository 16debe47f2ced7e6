//! Human-readable report rendering.
//!
//! Produces the scan header and the final summary with colors and
//! formatting via `console`.

use crate::report::ScanReport;
use crate::scanner::ProbeOutcome;
use crate::services::service_label;
use console::{style, Style};
use std::io::{self, Write};

/// Longest banner fragment shown in the summary table. Stored banners
/// are not truncated, only their rendering.
const BANNER_DISPLAY_LEN: usize = 50;

/// Print a scan header before scanning begins.
pub fn print_scan_header(target: &str, ip: &str, ports: usize, workers: usize) {
    println!();
    println!(
        "{} {} v{}",
        style("Starting").cyan(),
        style("trawl").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(
        "{} Target: {} ({})",
        style("•").dim(),
        style(target).white().bold(),
        ip
    );
    println!(
        "{} Scanning {} ports with {} workers...",
        style("•").dim(),
        style(ports).white().bold(),
        workers
    );
    println!();
}

/// Print the final scan summary.
pub fn print_report(report: &ScanReport, show_closed: bool) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let rule = style("═══════════════════════════════════════════════════════════").cyan();
    let headline = if report.interrupted {
        style("SCAN INTERRUPTED (partial results)").yellow().bold()
    } else {
        style("SCAN COMPLETE").cyan().bold()
    };

    writeln!(out)?;
    writeln!(out, "{rule}")?;
    writeln!(out, "  {headline}")?;
    writeln!(out, "{rule}")?;
    writeln!(
        out,
        "  {} {} ({})",
        style("Target:").bold(),
        report.target,
        report.resolved_address
    )?;
    writeln!(
        out,
        "  {} {}",
        style("Port range:").bold(),
        report.port_spec
    )?;
    writeln!(
        out,
        "  {} {} ports in {:.2}s",
        style("Scanned:").bold(),
        report.total_ports,
        report.duration_ms as f64 / 1000.0
    )?;
    writeln!(
        out,
        "               {} open, {} closed, {} errored",
        style(report.open_count).green().bold(),
        style(report.closed_count).red(),
        style(report.errored_count).yellow()
    )?;
    writeln!(out)?;

    let rows: Vec<(u16, &ProbeOutcome)> = if show_closed {
        report.outcomes.iter().map(|(p, o)| (*p, o)).collect()
    } else {
        report.open_ports().collect()
    };

    if rows.is_empty() {
        writeln!(out, "  {}", style("No open ports found.").dim())?;
    } else {
        writeln!(
            out,
            "  {:>6}  {:^8}  {:<15}  {}",
            style("PORT").bold(),
            style("STATE").bold(),
            style("SERVICE").bold(),
            style("BANNER").bold()
        )?;
        for (port, outcome) in rows {
            let state_style = match outcome {
                ProbeOutcome::Open { .. } => Style::new().green().bold(),
                ProbeOutcome::Closed => Style::new().red(),
                ProbeOutcome::Errored { .. } => Style::new().yellow(),
            };
            let detail = match outcome {
                ProbeOutcome::Errored { message } => message.clone(),
                _ => outcome
                    .banner()
                    .map(|b| truncate(b, BANNER_DISPLAY_LEN))
                    .unwrap_or_default(),
            };
            writeln!(
                out,
                "  {:>6}  {:^8}  {:<15}  {}",
                port,
                state_style.apply_to(outcome.to_string()),
                service_label(port),
                style(detail).dim()
            )?;
        }
    }

    writeln!(out)?;
    writeln!(out, "{rule}")?;
    writeln!(out)?;

    Ok(())
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}

/// Print a success message.
pub fn print_success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}

/// Truncate a string to a maximum length, adding ellipsis if truncated.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
