//! Error types for state_lattice_graph

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Main error type for lattice graph construction and expansion
#[derive(Debug, Error)]
pub enum LatticeError {
    /// Wrong motion model or invalid search configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// Primitive library could not be read
    #[error("File error: could not read {}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Required field missing or malformed in the primitive library
    #[error("Format error: {0}")]
    Format(String),
    /// Queried heading has no bin in the motion table
    #[error("Lookup error: no motion primitives start at heading {heading}")]
    Lookup { heading: f64 },
}

impl From<serde_json::Error> for LatticeError {
    fn from(e: serde_json::Error) -> Self {
        LatticeError::Format(e.to_string())
    }
}

/// Result type alias for lattice operations
pub type LatticeResult<T> = Result<T, LatticeError>;

/// Non-fatal geometry condition, reported through the logger.
///
/// Raised when a projected heading leaves `[0, number_of_headings)` and the
/// table is configured to keep headings unwrapped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryWarning {
    pub heading: f64,
    pub number_of_headings: u32,
}

impl fmt::Display for GeometryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Geometry warning: heading {} outside canonical range [0, {})",
            self.heading, self.number_of_headings
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LatticeError::Lookup { heading: 3.0 };
        assert_eq!(
            format!("{}", err),
            "Lookup error: no motion primitives start at heading 3"
        );
    }

    #[test]
    fn test_lookup_error_keeps_full_precision() {
        // A heading just off a bin must not print as the bin itself
        let err = LatticeError::Lookup { heading: 1.000000001 };
        let message = format!("{}", err);
        assert!(!message.ends_with("heading 1"));
        assert!(message.ends_with("heading 1.000000001"));
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: LatticeError = json_err.into();
        assert!(matches!(err, LatticeError::Format(_)));
    }

    #[test]
    fn test_file_error_keeps_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = LatticeError::File {
            path: PathBuf::from("missing.json"),
            source: io_err,
        };
        assert!(std::error::Error::source(&err).is_some());
        assert!(format!("{}", err).contains("missing.json"));
    }

    #[test]
    fn test_geometry_warning_display() {
        let warning = GeometryWarning {
            heading: 17.0,
            number_of_headings: 16,
        };
        assert!(format!("{}", warning).contains("[0, 16)"));
    }
}
