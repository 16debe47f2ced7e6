//! Command-line interface definitions for trawl.
//!
//! Uses `clap` derive macros for declarative argument parsing.

use clap::Parser;
use std::path::PathBuf;

/// A concurrent TCP connect port scanner.
#[derive(Parser, Debug)]
#[command(name = "trawl")]
#[command(author = "HueCodes <huecodes@proton.me>")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Scan a host for open TCP ports", long_about = None)]
pub struct Args {
    /// Target IP address or hostname to scan
    #[arg(value_name = "TARGET")]
    pub target: String,

    /// Inclusive port range to scan, e.g. "1-1000"
    #[arg(short, long, value_name = "START-END")]
    pub ports: String,

    /// Connection timeout in seconds
    #[arg(short = 't', long, default_value = "1.0", env = "TRAWL_TIMEOUT")]
    pub timeout: f64,

    /// Number of concurrent scan workers
    #[arg(short = 'w', long, default_value = "100", env = "TRAWL_WORKERS")]
    pub workers: usize,

    /// Write results to a JSON file
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Show closed and errored ports in the summary table
    #[arg(long)]
    pub show_closed: bool,

    /// Skip the banner read on open ports
    #[arg(long)]
    pub no_banner: bool,

    /// Suppress the progress bar and live open-port lines
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let args = Args::try_parse_from(["trawl", "example.com", "-p", "1-100"]).unwrap();
        assert_eq!(args.target, "example.com");
        assert_eq!(args.ports, "1-100");
        assert_eq!(args.workers, 100);
        assert!(!args.no_banner);
        assert!(args.output.is_none());
    }

    #[test]
    fn test_ports_required() {
        assert!(Args::try_parse_from(["trawl", "example.com"]).is_err());
    }

    #[test]
    fn test_output_path() {
        let args =
            Args::try_parse_from(["trawl", "10.0.0.1", "-p", "1-1024", "-o", "out.json"]).unwrap();
        assert_eq!(args.output, Some(PathBuf::from("out.json")));
    }
}
