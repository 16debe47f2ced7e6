//! # Trawl - A Concurrent TCP Connect Scanner
//!
//! Trawl drags a fixed pool of async workers across a port range to find
//! out which ports accept TCP connections, optionally capturing the
//! banner each service volunteers.
//!
//! ## Features
//!
//! - **Bounded Concurrency**: a worker pool of configurable size drains a
//!   shared port sequence; every port is probed exactly once
//! - **Banner Grabbing**: a single passive read on each open port for
//!   lightweight service identification
//! - **Cooperative Cancellation**: Ctrl-C stops dispatch promptly and the
//!   partial results still print
//! - **Structured Export**: JSON document with per-port detail
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use trawl::scanner::{ScanEngine, ScanOptions};
//! use trawl::types::PortSpec;
//!
//! #[tokio::main]
//! async fn main() {
//!     let spec: PortSpec = "1-1024".parse().unwrap();
//!     let engine = ScanEngine::new(ScanOptions::default());
//!
//!     let report = engine.execute("127.0.0.1", spec).await.unwrap();
//!     println!("{}", report.summary());
//! }
//! ```
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`types`] - Core type definitions with newtype patterns for type safety
//! - [`scanner`] - The scan engine, worker pool, and probe implementations
//! - [`report`] - Final scan records and aggregation
//! - [`output`] - Terminal rendering and JSON export
//! - [`error`] - Fatal error types
//! - [`banner`] - Banner capture
//! - [`services`] - Well-known service labels

pub mod banner;
pub mod cli;
pub mod error;
pub mod output;
pub mod report;
pub mod scanner;
pub mod services;
pub mod types;

// Re-export commonly used types
pub use error::{ScanError, ScanResult};
pub use report::ScanReport;
pub use scanner::{Probe, ProbeOutcome, ProgressEvent, ScanEngine, ScanOptions, TcpProber};
pub use types::{Port, PortSpec, Target};
