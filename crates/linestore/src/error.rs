//! Error types for linestore

use std::fmt;
use std::io;

/// Result type alias for line lookups
pub type Result<T> = std::result::Result<T, Error>;

/// Outcome of a failed line lookup
#[derive(Debug)]
pub enum Error {
    /// Requested line is below 1 or past the end of the dataset
    NotFound(u64),

    /// Dataset could not be opened or failed mid-scan
    SourceUnavailable(io::Error),

    /// Dataset identifier cannot be mapped to a file
    InvalidIdentifier(String),
}

impl Error {
    /// True for an out-of-range line, as opposed to an I/O failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotFound(line) => write!(f, "Line {} not found", line),
            Error::SourceUnavailable(e) => write!(f, "Source unavailable: {}", e),
            Error::InvalidIdentifier(id) => write!(f, "Invalid dataset identifier: {:?}", id),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::SourceUnavailable(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::SourceUnavailable(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Error::NotFound(7).to_string(), "Line 7 not found");

        let err = Error::from(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        assert!(err.to_string().starts_with("Source unavailable"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_source_chain() {
        use std::error::Error as _;

        let err = Error::from(io::Error::new(io::ErrorKind::Other, "disk gone"));
        assert!(err.source().is_some());
        assert!(Error::NotFound(1).source().is_none());
    }
}
