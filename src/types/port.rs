//! Port types with validation and parsing.
//!
//! The `Port` newtype ensures values are always valid port numbers (1-65535).
//! `PortSpec` is the inclusive range a scan walks, parsed from the textual
//! `start-end` form.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A validated network port number (1-65535).
///
/// Using a newtype prevents accidental misuse of raw u16 values
/// and ensures port numbers are always valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Port(u16);

impl Port {
    /// Minimum valid port number.
    pub const MIN: u16 = 1;
    /// Maximum valid port number.
    pub const MAX: u16 = 65535;

    /// Create a new Port from a u16, returning None if invalid.
    #[inline]
    pub const fn new(port: u16) -> Option<Self> {
        if port >= Self::MIN {
            Some(Self(port))
        } else {
            None
        }
    }

    /// Create a Port without validation. Use only when the value is known valid.
    #[inline]
    pub const fn new_unchecked(port: u16) -> Self {
        Self(port)
    }

    /// Get the raw port number.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Port> for u16 {
    fn from(port: Port) -> Self {
        port.0
    }
}

/// Why a port specification was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortSpecError {
    #[error("expected a port range of the form start-end, got '{0}'")]
    MissingRange(String),
    #[error("discrete port lists are not supported; give a single range like 1-1000")]
    DiscreteListUnsupported,
    #[error("'{0}' is not a port number")]
    NotANumber(String),
    #[error("start port {0} is below the minimum (1)")]
    BelowMinimum(u32),
    #[error("end port {0} is above the maximum (65535)")]
    AboveMaximum(u32),
    #[error("start port {0} is greater than end port {1}")]
    Inverted(u32, u32),
}

/// The inclusive port range a scan covers.
///
/// Invariant: `start <= end`, both within `[1, 65535]`. Constructed once
/// from operator input and read-only afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortSpec {
    start: Port,
    end: Port,
}

impl PortSpec {
    /// Create a new port range.
    pub fn new(start: Port, end: Port) -> Result<Self, PortSpecError> {
        if start.0 > end.0 {
            Err(PortSpecError::Inverted(start.0 as u32, end.0 as u32))
        } else {
            Ok(Self { start, end })
        }
    }

    /// First port in the range.
    pub const fn start(&self) -> Port {
        self.start
    }

    /// Last port in the range.
    pub const fn end(&self) -> Port {
        self.end
    }

    /// Number of ports in the range.
    pub const fn len(&self) -> usize {
        (self.end.0 - self.start.0 + 1) as usize
    }

    /// A valid PortSpec always holds at least one port.
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Iterate over every port in the range, in order.
    pub fn iter(&self) -> impl Iterator<Item = Port> {
        (self.start.0..=self.end.0).map(Port::new_unchecked)
    }
}

impl FromStr for PortSpec {
    type Err = PortSpecError;

    /// Parse the `start-end` form. Validation order: both sides are
    /// integers, `start >= 1`, `end <= 65535`, `start <= end`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        // A comma means the discrete-list form, which this parser
        // deliberately rejects rather than half-supporting.
        if s.contains(',') {
            return Err(PortSpecError::DiscreteListUnsupported);
        }

        let (lhs, rhs) = s
            .split_once('-')
            .ok_or_else(|| PortSpecError::MissingRange(s.to_string()))?;

        let parse_bound = |field: &str| -> Result<u32, PortSpecError> {
            field
                .trim()
                .parse()
                .map_err(|_| PortSpecError::NotANumber(field.trim().to_string()))
        };
        let start = parse_bound(lhs)?;
        let end = parse_bound(rhs)?;

        if start < Port::MIN as u32 {
            return Err(PortSpecError::BelowMinimum(start));
        }
        if end > Port::MAX as u32 {
            return Err(PortSpecError::AboveMaximum(end));
        }
        if start > end {
            return Err(PortSpecError::Inverted(start, end));
        }

        Ok(Self {
            start: Port::new_unchecked(start as u16),
            end: Port::new_unchecked(end as u16),
        })
    }
}

impl fmt::Display for PortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_validation() {
        assert!(Port::new(0).is_none());
        assert!(Port::new(1).is_some());
        assert!(Port::new(80).is_some());
        assert!(Port::new(65535).is_some());
    }

    #[test]
    fn test_parse_range() {
        let spec: PortSpec = "80-82".parse().unwrap();
        assert_eq!(spec.start().as_u16(), 80);
        assert_eq!(spec.end().as_u16(), 82);
        assert_eq!(spec.len(), 3);
    }

    #[test]
    fn test_parse_full_range() {
        let spec: PortSpec = "1-65535".parse().unwrap();
        assert_eq!(spec.len(), 65535);
    }

    #[test]
    fn test_parse_tolerates_whitespace() {
        let spec: PortSpec = " 80 - 82 ".parse().unwrap();
        assert_eq!(spec.len(), 3);
    }

    #[test]
    fn test_single_port_rejected() {
        assert!(matches!(
            "80".parse::<PortSpec>(),
            Err(PortSpecError::MissingRange(_))
        ));
    }

    #[test]
    fn test_discrete_list_rejected() {
        assert_eq!(
            "22,80,443".parse::<PortSpec>(),
            Err(PortSpecError::DiscreteListUnsupported)
        );
    }

    #[test]
    fn test_start_below_minimum() {
        assert_eq!(
            "0-10".parse::<PortSpec>(),
            Err(PortSpecError::BelowMinimum(0))
        );
    }

    #[test]
    fn test_end_above_maximum() {
        assert_eq!(
            "10-65536".parse::<PortSpec>(),
            Err(PortSpecError::AboveMaximum(65536))
        );
    }

    #[test]
    fn test_inverted_range() {
        assert_eq!(
            "90-80".parse::<PortSpec>(),
            Err(PortSpecError::Inverted(90, 80))
        );
    }

    #[test]
    fn test_not_a_number() {
        assert!(matches!(
            "abc-10".parse::<PortSpec>(),
            Err(PortSpecError::NotANumber(_))
        ));
    }

    #[test]
    fn test_iter_yields_every_port() {
        let spec: PortSpec = "8000-8004".parse().unwrap();
        let ports: Vec<u16> = spec.iter().map(Port::as_u16).collect();
        assert_eq!(ports, vec![8000, 8001, 8002, 8003, 8004]);
    }
}
