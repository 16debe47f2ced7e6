//! Error types for trawl.
//!
//! Uses `thiserror` for ergonomic error definitions. Only fatal
//! conditions live here; per-port failures are recorded as outcomes in
//! the report, never raised.

use crate::types::{PortSpecError, TargetError};
use thiserror::Error;

/// Fatal scan errors.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The port specification failed validation; nothing was scanned.
    #[error("invalid port specification: {0}")]
    InvalidPortSpec(#[from] PortSpecError),

    /// The target could not be resolved; nothing was scanned.
    #[error(transparent)]
    Resolution(#[from] TargetError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;
